pub mod auth_client;
pub mod functions_client;
pub mod rest;
pub mod table_store;

pub use auth_client::{AuthClient, AuthSession, AuthUser, SignUpOutcome};
pub use functions_client::FunctionsClient;
pub use table_store::TableStore;
