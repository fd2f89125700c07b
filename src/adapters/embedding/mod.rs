//! Embedding host notifier adapters.
//!
//! - `HttpEmbeddingNotifier` - Posts JSON messages to the host origin
//! - `LoggingEmbeddingNotifier` - Used when checkout is not embedded

mod http_notifier;
mod logging_notifier;

pub use http_notifier::HttpEmbeddingNotifier;
pub use logging_notifier::LoggingEmbeddingNotifier;
