use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::role::UserRole;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub user_id: i64,
    pub role: UserRole,
    /// Expiry as a Unix timestamp.
    pub exp: usize,
    /// Issue time as a Unix timestamp.
    pub iat: usize,
}
