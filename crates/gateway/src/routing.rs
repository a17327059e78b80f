//! Path-prefix routing table.

use serde::Serialize;

/// A service behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Upstream {
    Users,
    Catalog,
    Orders,
}

impl Upstream {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Catalog => "catalog",
            Self::Orders => "orders",
        }
    }
}

/// Prefixes owned by each upstream. A prefix matches itself and anything
/// below it (`/v1/user`, `/v1/user/`, `/v1/user/7`), never `/v1/users`.
pub const ROUTES: [(&str, Upstream); 6] = [
    ("/v1/auth", Upstream::Users),
    ("/v1/user", Upstream::Users),
    ("/v1/category", Upstream::Catalog),
    ("/v1/product", Upstream::Catalog),
    ("/v1/catalog", Upstream::Catalog),
    ("/v1/order", Upstream::Orders),
];

/// The upstream that owns `path`, if any.
#[must_use]
pub fn resolve(path: &str) -> Option<Upstream> {
    ROUTES.iter().find_map(|&(prefix, upstream)| {
        path.strip_prefix(prefix)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .map(|_| upstream)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_prefixes() {
        assert_eq!(resolve("/v1/auth/login"), Some(Upstream::Users));
        assert_eq!(resolve("/v1/user/"), Some(Upstream::Users));
        assert_eq!(resolve("/v1/user"), Some(Upstream::Users));
        assert_eq!(resolve("/v1/category/3"), Some(Upstream::Catalog));
        assert_eq!(resolve("/v1/product/category/3"), Some(Upstream::Catalog));
        assert_eq!(resolve("/v1/catalog/anything"), Some(Upstream::Catalog));
        assert_eq!(resolve("/v1/order/9/status"), Some(Upstream::Orders));
    }

    #[test]
    fn test_resolve_requires_segment_boundary() {
        assert_eq!(resolve("/v1/users"), None);
        assert_eq!(resolve("/v1/orders/1"), None);
        assert_eq!(resolve("/v2/user/1"), None);
        assert_eq!(resolve("/"), None);
        assert_eq!(resolve(""), None);
    }
}
