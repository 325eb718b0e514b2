mod rest_client_builder;
mod rest_client_error;
mod rest_client_handle;

pub use rest_client_builder::*;
pub use rest_client_error::*;
pub use rest_client_handle::*;
