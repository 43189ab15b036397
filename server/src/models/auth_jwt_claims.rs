use serde::{Deserialize, Serialize};

use crate::models::authenticated_user::Role;

/// JWT claims structure that will be encoded/decoded for authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Account role
    pub role: Role,
    /// Expiration time (as UTC timestamp)
    pub exp: usize,
    /// Issued at (as UTC timestamp)
    pub iat: usize,
    /// Issuer
    pub iss: String,
}
