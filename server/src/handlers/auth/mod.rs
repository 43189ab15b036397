pub mod login_handler;
pub mod logout_handler;
pub mod session_handler;

pub use login_handler::login;
pub use logout_handler::logout;
pub use session_handler::verify_session;
