pub mod credentials;
pub mod jwt;
pub mod session_cookie;

pub use credentials::CredentialService;
pub use jwt::{IssuedToken, TokenService};
pub use session_cookie::{removal_cookie, session_cookie, ACCESS_TOKEN_COOKIE};
