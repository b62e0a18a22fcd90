//! Application state.

use txgraph_core::{create_broadcast_channel, BroadcastSender, Stores};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub tx: BroadcastSender,
}

impl AppState {
    pub fn new(stores: Stores) -> Self {
        Self {
            stores,
            tx: create_broadcast_channel(),
        }
    }
}
