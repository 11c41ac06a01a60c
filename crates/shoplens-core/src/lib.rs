//! Shoplens Core - retail customer segmentation from a single photo.
//!
//! The heavy lifting is done by a hosted multimodal model. This crate builds
//! the request, sends it, and turns the reply into a validated label.
//!
//! ```text
//! Image bytes → data URL → chat-completions POST → choices[0].message.content → Label
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use shoplens_core::{Classifier, Config, ImageAsset};
//!
//! #[tokio::main]
//! async fn main() -> shoplens_core::Result<()> {
//!     let config = Config::load()?;
//!     let classifier = Classifier::from_config(&config);
//!     let key = config.api.resolved_api_key().unwrap_or_default();
//!
//!     let image = ImageAsset::from_path("./customer.jpg".as_ref())?;
//!     let result = classifier.classify(&image, &key).await?;
//!     println!("Segment: {}", result.label);
//!     Ok(())
//! }
//! ```

pub mod asset;
pub mod classifier;
pub mod config;
pub mod discovery;
pub mod engagement;
pub mod error;
pub mod output;
pub mod request;
pub mod segment;
pub mod types;

pub use asset::{ImageAsset, ImageFormat, MediaTypePolicy};
pub use classifier::{classify, ChatTransport, Classification, Classifier, HttpTransport};
pub use config::Config;
pub use discovery::FileDiscovery;
pub use engagement::{GuessOutcome, SegmentShare, SegmentTally};
pub use error::{ClassificationError, ClassificationResult, ConfigError, Result, ShoplensError};
pub use output::{OutputFormat, OutputWriter};
pub use request::ClassificationRequest;
pub use segment::{Label, Segment};
pub use types::SegmentRecord;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
