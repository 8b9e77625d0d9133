//! Photo restyling through a hosted generative image model.
//!
//! A caller encodes a photo ([`encoder`]), sends it with a [`Style`] through
//! the [`RelayClient`], and the [`RelayService`] forwards it to the model with
//! the style's fixed instruction text.

pub mod client;
pub mod config;
pub mod encoder;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod relay;

pub use client::RelayClient;
pub use config::{ApiKey, ClientConfig, Config, GeminiConfig};
pub use error::{RestyleError, Result};
pub use gemini::{GeminiClient, ImageModel, ModelPart, ModelRequest, ModelResponse};
pub use models::{ImagePayload, MediaType, Style};
pub use relay::{RelayResponse, RelayService};
