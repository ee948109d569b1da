pub mod config;
pub mod error;
pub mod types;

pub use config::CodecConfig;
pub use error::{DecodeError, DecodeResult};
pub use types::EnvelopeFlags;
