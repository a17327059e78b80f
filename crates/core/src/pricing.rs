//! Order line-item pricing.
//!
//! Prices arrive with the order request and are recorded as a snapshot; they
//! are not re-checked against the catalog. The total is always derived here
//! and never taken from the client.

use rust_decimal::Decimal;

use crate::{ErrorKind, ProductId};

/// Largest amount a `NUMERIC(12,2)` column holds: `9_999_999_999.99`.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

/// Decimal places kept for monetary amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Whether `amount` is stored without rounding: at most two decimal places
/// and no larger than [`MAX_AMOUNT`] in magnitude.
#[must_use]
pub fn is_storable_amount(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_SCALE && amount.abs() <= MAX_AMOUNT
}

/// A requested line item before pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// A validated line item with its computed subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedItem {
    pub product_id: ProductId,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// All line items of an order plus their sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub items: Vec<PricedItem>,
    pub total: Decimal,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("an order needs at least one item")]
    NoItems,

    #[error("item {index}: quantity must be positive")]
    InvalidQuantity { index: usize },

    #[error("item {index}: price must be positive")]
    InvalidPrice { index: usize },

    #[error("item {index}: price has more than two decimal places")]
    TooPrecise { index: usize },

    #[error("amount exceeds 9999999999.99")]
    Overflow,
}

impl PricingError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::ValidationError
    }
}

/// Validate the requested items and compute every subtotal and the total.
///
/// # Errors
///
/// Fails on an empty item list, a non-positive quantity or price, a price
/// with sub-cent precision, or a price, subtotal or total above
/// [`MAX_AMOUNT`].
pub fn price_items(items: &[NewOrderItem]) -> Result<PricedOrder, PricingError> {
    if items.is_empty() {
        return Err(PricingError::NoItems);
    }

    let mut priced = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for (index, item) in items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(PricingError::InvalidQuantity { index });
        }
        if item.price <= Decimal::ZERO {
            return Err(PricingError::InvalidPrice { index });
        }
        if item.price.normalize().scale() > AMOUNT_SCALE {
            return Err(PricingError::TooPrecise { index });
        }

        let subtotal = Decimal::from(item.quantity)
            .checked_mul(item.price)
            .filter(|subtotal| *subtotal <= MAX_AMOUNT)
            .ok_or(PricingError::Overflow)?;
        total = total
            .checked_add(subtotal)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or(PricingError::Overflow)?;

        priced.push(PricedItem {
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.price,
            subtotal,
        });
    }

    Ok(PricedOrder {
        items: priced,
        total,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn item(product: i32, quantity: i32, price: &str) -> NewOrderItem {
        NewOrderItem {
            product_id: ProductId::new(product),
            quantity,
            price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let order = price_items(&[item(1, 2, "10.50"), item(2, 3, "0.10")]).unwrap();

        assert_eq!(order.items[0].subtotal, Decimal::from_str("21.00").unwrap());
        assert_eq!(order.items[1].subtotal, Decimal::from_str("0.30").unwrap());
        assert_eq!(order.total, Decimal::from_str("21.30").unwrap());

        let sum: Decimal = order.items.iter().map(|i| i.subtotal).sum();
        assert_eq!(order.total, sum);
    }

    #[test]
    fn test_decimal_arithmetic_is_exact() {
        // 0.1 + 0.2 style sums must not drift
        let order = price_items(&[item(1, 1, "0.1"), item(2, 1, "0.2")]).unwrap();
        assert_eq!(order.total, Decimal::from_str("0.3").unwrap());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(price_items(&[]), Err(PricingError::NoItems));
    }

    #[test]
    fn test_rejects_non_positive_quantity() {
        assert_eq!(
            price_items(&[item(1, 1, "1.00"), item(2, 0, "1.00")]),
            Err(PricingError::InvalidQuantity { index: 1 })
        );
        assert_eq!(
            price_items(&[item(1, -3, "1.00")]),
            Err(PricingError::InvalidQuantity { index: 0 })
        );
    }

    #[test]
    fn test_rejects_non_positive_price() {
        assert_eq!(
            price_items(&[item(1, 1, "0")]),
            Err(PricingError::InvalidPrice { index: 0 })
        );
        assert_eq!(
            price_items(&[item(1, 1, "-2.50")]),
            Err(PricingError::InvalidPrice { index: 0 })
        );
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = NewOrderItem {
            product_id: ProductId::new(1),
            quantity: i32::MAX,
            price: Decimal::MAX,
        };
        assert_eq!(price_items(&[huge]), Err(PricingError::Overflow));
        assert_eq!(PricingError::Overflow.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn test_max_amount_matches_column() {
        assert_eq!(MAX_AMOUNT, Decimal::from_str("9999999999.99").unwrap());
        assert!(is_storable_amount(MAX_AMOUNT));
        assert!(!is_storable_amount(MAX_AMOUNT + Decimal::new(1, 2)));
        assert!(is_storable_amount(Decimal::from_str("10.500").unwrap()));
        assert!(!is_storable_amount(Decimal::from_str("0.005").unwrap()));
    }

    #[test]
    fn test_rejects_sub_cent_prices() {
        // would round to 0.01 each in storage while the total rounds to 0.01
        assert_eq!(
            price_items(&[item(1, 1, "0.005"), item(2, 1, "0.005")]),
            Err(PricingError::TooPrecise { index: 0 })
        );
        assert_eq!(
            price_items(&[item(1, 1, "1.00"), item(2, 1, "0.001")]),
            Err(PricingError::TooPrecise { index: 1 })
        );

        // trailing zeros are not extra precision
        let order = price_items(&[item(1, 2, "1.500")]).unwrap();
        assert_eq!(order.total, Decimal::from_str("3").unwrap());
    }

    #[test]
    fn test_rejects_amounts_above_column_limit() {
        assert_eq!(
            price_items(&[item(1, 1, "99999999999")]),
            Err(PricingError::Overflow)
        );
        // each subtotal fits, the total does not
        assert_eq!(
            price_items(&[item(1, 1, "9999999999.99"), item(2, 1, "0.01")]),
            Err(PricingError::Overflow)
        );
        assert_eq!(
            price_items(&[item(1, 2, "5000000000.00")]),
            Err(PricingError::Overflow)
        );
        assert!(price_items(&[item(1, 1, "9999999999.99")]).is_ok());
    }
}
