pub mod api;
#[cfg(target_arch = "wasm32")]
pub mod api_client;
#[cfg(test)]
pub(crate) mod mock;

pub use api::*;
#[cfg(target_arch = "wasm32")]
pub use api_client::ApiClient;
