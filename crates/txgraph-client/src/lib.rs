//! # txgraph-client
//!
//! Live view of the transaction graph: subscribes to the push channel,
//! keeps a local copy of nodes and edges, lays out new nodes incrementally
//! and fades highlights on recently changed edges and rows.

pub mod highlight;
pub mod layout;
pub mod live;
pub mod style;
pub mod table;
pub mod view;

pub use highlight::{HighlightTracker, HIGHLIGHT_WINDOW};
pub use layout::{ForceLayout, Point};
pub use live::{LiveClient, LiveConfig, LiveError, ReconnectPolicy, ViewEvent};
pub use table::{TableRow, TransactionTable};
pub use view::{GraphView, PositionedNode, SnapshotOutcome, ViewState};
