#[cfg(feature = "server")]
pub mod server;
pub mod service;

pub use service::{Admitted, RelayBody, RelayResponse, RelayService, TransformationRequest};
