pub mod error_handling;
pub mod gym_api_client;

pub use error_handling::map_server_error;
pub use gym_api_client::GymApiClient;
