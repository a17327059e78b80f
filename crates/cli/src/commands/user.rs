//! Principal management commands.
//!
//! ```bash
//! bazaar-cli user create -e admin@example.com -p 's3cret' -n admin
//! ```
//!
//! Connects with `USERS_DATABASE_URL` (or `DATABASE_URL`).

use bazaar_users::db::PgUserStore;
use bazaar_users::models::CreateUserRequest;
use bazaar_users::services::UserService;
use bazaar_web::config::get_database_url;
use bazaar_web::db::create_pool;

use super::CliError;

/// Create an active principal. The password is stored as an Argon2 hash.
///
/// Returns the new principal's id.
///
/// # Errors
///
/// Returns error for an invalid email, an empty password, a taken email or
/// a database failure.
pub async fn create(email: &str, password: &str, user_name: Option<String>) -> Result<i32, CliError> {
    let database_url = get_database_url("USERS_DATABASE_URL")?;
    let pool = create_pool(&database_url).await?;
    let store = PgUserStore::new(pool);

    let request = CreateUserRequest {
        user_name,
        email: email.to_string(),
        password: password.to_string(),
        first_name: None,
        last_name: None,
        status: None,
    };
    let user = UserService::new(&store).create(request, Some(true)).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Created user");
    Ok(user.id.as_i32())
}
