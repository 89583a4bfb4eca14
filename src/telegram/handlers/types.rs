//! Handler types and dependencies

use std::sync::Arc;

use crate::download::pipeline::FulfillmentContext;
use crate::lyrics::LyricsClient;
use crate::storage::ResultStore;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub store: Arc<ResultStore>,
    pub fulfillment: Arc<FulfillmentContext>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(store: Arc<ResultStore>, fulfillment: Arc<FulfillmentContext>) -> Self {
        Self { store, fulfillment }
    }

    /// Lyrics client shared with the fulfillment pipeline
    pub fn lyrics(&self) -> &LyricsClient {
        &self.fulfillment.lyrics
    }
}
