//! Tower middleware layers for [`HyperTransport`](crate::HyperTransport).
//!
//! Layers are added through [`HyperTransportBuilder::layer`](crate::HyperTransportBuilder::layer)
//! or one of its helpers. The last layer added is the first to see a request.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `middleware-logging` | [`LoggingLayer`] and the `.with_logging()` helper |
//!
//! # Example
//!
//! ```ignore
//! use tether::HyperTransport;
//! use tether::middleware::{ConcurrencyLimitLayer, LoggingLayer};
//!
//! let transport = HyperTransport::builder()
//!     .layer(ConcurrencyLimitLayer::new(16))
//!     .layer(LoggingLayer::new())
//!     .build();
//! ```

#[cfg(feature = "middleware-logging")]
mod logging;

#[cfg(feature = "middleware-logging")]
pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience (always available)
pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::{Layer, ServiceBuilder};
