//! WebSocket subscription feeding a [`GraphView`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};
use txgraph_core::PushMessage;
use txgraph_graph::Transaction;

use crate::view::GraphView;

#[derive(Error, Debug)]
pub enum LiveError {
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Reconnection with a fixed delay and a bounded number of attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            max_attempts: 5,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), or `None` once
    /// the attempts are used up.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        (attempt >= 1 && attempt <= self.max_attempts).then_some(self.delay)
    }
}

#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// e.g. `ws://127.0.0.1:3000/ws`
    pub url: String,
    pub reconnect: ReconnectPolicy,
    /// Highlight re-render cadence.
    pub tick: Duration,
}

impl LiveConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect: ReconnectPolicy::default(),
            tick: Duration::from_millis(100),
        }
    }

    /// `ws://` push URL for an `http://` API base URL.
    pub fn for_api(api_url: &str) -> Self {
        let base = api_url.trim_end_matches('/');
        let ws = if let Some(rest) = base.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = base.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            base.to_string()
        };
        Self::new(format!("{}/ws", ws))
    }
}

/// Something the renderer should react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Connected,
    InitialData { nodes: usize, edges: usize },
    GraphUpdate { new_transaction: Transaction, new_nodes: usize },
    /// Highlights are still fading; redraw.
    Tick,
    Disconnected,
    /// Reconnect attempts exhausted; the client is idle.
    GaveUp,
}

/// Live subscription. Background tasks are aborted when this is dropped.
pub struct LiveClient {
    view: Arc<Mutex<GraphView>>,
    events: mpsc::UnboundedReceiver<ViewEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl LiveClient {
    /// Start the connection and tick tasks.
    pub fn spawn(config: LiveConfig) -> Self {
        let view = Arc::new(Mutex::new(GraphView::new()));
        let (events_tx, events) = mpsc::unbounded_channel();

        let connection = tokio::spawn(run_connection(config.clone(), Arc::clone(&view), events_tx.clone()));
        let ticker = tokio::spawn(run_ticker(config.tick, Arc::clone(&view), events_tx));

        Self {
            view,
            events,
            tasks: vec![connection, ticker],
        }
    }

    pub fn view(&self) -> Arc<Mutex<GraphView>> {
        Arc::clone(&self.view)
    }

    /// Next event, or `None` once the background tasks are gone.
    pub async fn next_event(&mut self) -> Option<ViewEvent> {
        self.events.recv().await
    }

    pub fn shutdown(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for LiveClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_connection(config: LiveConfig, view: Arc<Mutex<GraphView>>, events: mpsc::UnboundedSender<ViewEvent>) {
    let mut attempts = 0u32;
    loop {
        match connect_async(config.url.as_str()).await {
            Ok((stream, _)) => {
                attempts = 0;
                info!(url = %config.url, "WebSocket connected");
                let _ = events.send(ViewEvent::Connected);

                if let Err(e) = handle_stream(stream, &view, &events).await {
                    warn!(error = %e, "WebSocket connection lost");
                }
                info!("WebSocket disconnected");
                let _ = events.send(ViewEvent::Disconnected);
            }
            Err(e) => {
                error!(url = %config.url, error = %e, "WebSocket connection error");
            }
        }

        attempts += 1;
        match config.reconnect.next_delay(attempts) {
            Some(delay) => {
                debug!(attempt = attempts, "Reconnecting");
                sleep(delay).await;
            }
            None => {
                warn!(attempts = attempts - 1, "Giving up on WebSocket reconnection");
                let _ = events.send(ViewEvent::GaveUp);
                return;
            }
        }
    }
}

async fn handle_stream<S>(
    mut stream: S,
    view: &Arc<Mutex<GraphView>>,
    events: &mpsc::UnboundedSender<ViewEvent>,
) -> Result<(), LiveError>
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg) = stream.next().await {
        match msg.map_err(|e| LiveError::ConnectionError(e.to_string()))? {
            Message::Text(text) => match serde_json::from_str::<PushMessage>(text.as_str()) {
                Ok(push) => {
                    let event = apply_push(&mut *view.lock().await, push, Instant::now());
                    let _ = events.send(event);
                }
                Err(e) => warn!(error = %e, "Failed to parse push message"),
            },
            Message::Close(_) => {
                debug!("WebSocket closed by server");
                return Ok(());
            }
            _ => {}
        }
    }
    Ok(())
}

/// Apply one push message to `view`.
pub fn apply_push(view: &mut GraphView, push: PushMessage, now: Instant) -> ViewEvent {
    match push {
        PushMessage::InitialData(graph) => {
            let (nodes, edges) = (graph.nodes.len(), graph.edges.len());
            view.apply_snapshot(graph.nodes, graph.edges, None, now);
            ViewEvent::InitialData { nodes, edges }
        }
        PushMessage::GraphUpdate(update) => {
            let outcome = view.apply_snapshot(update.nodes, update.edges, Some(&update.new_transaction), now);
            ViewEvent::GraphUpdate {
                new_transaction: update.new_transaction,
                new_nodes: outcome.new_nodes,
            }
        }
    }
}

async fn run_ticker(period: Duration, view: Arc<Mutex<GraphView>>, events: mpsc::UnboundedSender<ViewEvent>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        ticker.tick().await;
        let redraw = {
            let mut view = view.lock().await;
            if view.has_active_highlights() {
                view.tick(Instant::now());
                true
            } else {
                false
            }
        };
        if redraw && events.send(ViewEvent::Tick).is_err() {
            return;
        }
    }
}
