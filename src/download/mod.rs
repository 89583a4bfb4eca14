//! Audio acquisition and delivery

pub mod artifact;
pub mod backend;
pub mod pipeline;

pub use artifact::ArtifactScope;
pub use backend::{AudioBackend, YtDlpBackend};
pub use pipeline::{fulfill, FulfillmentContext, FulfillmentFailure, FulfillmentReport};
