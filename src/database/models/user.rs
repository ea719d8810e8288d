use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Mirror of the external identity provider's user record. Authentication
/// itself happens elsewhere; this row exists so contexts can carry author
/// names and guards can check staff/superuser flags.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}
