//! Async runtime and task management for the TUI
//!
//! This module implements the dual-channel event-driven architecture:
//! - Input channel (priority): User input events that are never dropped
//! - Data channel: Fetch results from the single fetcher task
//!
//! Fetches are serialized: the app and the optional refresh timers push
//! [`FetchRequest`]s onto a small queue and one task works through them in
//! order, so a new result never races an older one.
//!
//! The main loop uses `tokio::select!` with bias toward the input channel
//! to prevent input starvation under heavy data update loads.

use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::api::{DashboardClient, FetchError, JobScope};
use crate::tui::app::App;
use crate::tui::event::{DataEvent, DataSource, EventResult, FetchRequest, InputEvent};

/// Channel capacities
const INPUT_CHANNEL_CAPACITY: usize = 16;
const DATA_CHANNEL_CAPACITY: usize = 32;
const REQUEST_CHANNEL_CAPACITY: usize = 4;

/// Turn a fetch result into the event the app consumes.
fn fetch_event<T>(
    result: Result<T, FetchError>,
    source: DataSource,
    success_event: impl FnOnce(T) -> DataEvent,
) -> DataEvent {
    match result {
        Ok(data) => success_event(data),
        Err(e) => {
            tracing::warn!(%source, error = %e, "fetch failed");
            DataEvent::FetchError {
                source,
                error: e.to_string(),
            }
        }
    }
}

/// TUI runtime managing all background tasks
pub struct TuiRuntime {
    cancel_token: CancellationToken,
    task_handles: Vec<JoinHandle<()>>,
}

impl TuiRuntime {
    /// Create a new TUI runtime
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_handles: Vec::new(),
        }
    }

    /// Get a clone of the cancellation token for spawning tasks
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Add a task handle to track
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.task_handles.push(handle);
    }

    /// Signal shutdown and wait for tasks to complete
    pub async fn shutdown(self) {
        self.cancel_token.cancel();

        let shutdown = async {
            for handle in self.task_handles {
                let _ = handle.await;
            }
        };

        tokio::select! {
            _ = shutdown => {}
            _ = tokio::time::sleep(Duration::from_secs(2)) => {
                // Tasks did not stop in time; they will be dropped
            }
        }
    }
}

/// Spawn the input event reader task
pub fn spawn_input_task(tx: mpsc::Sender<InputEvent>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = EventStream::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            let input_event = match event {
                                Event::Key(key) => Some(InputEvent::Key(key)),
                                Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
                                _ => None,
                            };

                            if let Some(evt) = input_event
                                && tx.send(evt).await.is_err()
                            {
                                break; // Receiver dropped
                            }
                        }
                        Some(Err(e)) => {
                            // Check for fatal terminal errors that should trigger shutdown
                            let is_fatal = matches!(
                                e.kind(),
                                std::io::ErrorKind::BrokenPipe
                                    | std::io::ErrorKind::ConnectionReset
                                    | std::io::ErrorKind::UnexpectedEof
                            );

                            if is_fatal {
                                tracing::info!("Terminal disconnected: {:?}", e);
                                break;
                            } else {
                                tracing::warn!("Terminal event read error: {:?}", e);
                            }
                        }
                        None => break, // Stream ended
                    }
                }
            }
        }
    })
}

/// Spawn the fetcher task.
///
/// Requests are handled one at a time in arrival order. The task ends when
/// cancelled or when every request sender is dropped.
pub fn spawn_fetcher(
    client: DashboardClient,
    scope: JobScope,
    mut requests: mpsc::Receiver<FetchRequest>,
    tx: mpsc::Sender<DataEvent>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let request = tokio::select! {
                _ = cancel.cancelled() => break,
                request = requests.recv() => match request {
                    Some(request) => request,
                    None => break,
                },
            };

            let event = tokio::select! {
                _ = cancel.cancelled() => break,
                event = fetch(&client, scope, request) => event,
            };

            if tx.send(event).await.is_err() {
                break; // Receiver dropped
            }
        }
    })
}

async fn fetch(client: &DashboardClient, scope: JobScope, request: FetchRequest) -> DataEvent {
    tracing::debug!(source = %request.source, background = request.background, "fetch started");
    match request.source {
        DataSource::Jobs => fetch_event(client.fetch_jobs(scope).await, request.source, |jobs| {
            DataEvent::JobsUpdated {
                jobs,
                fetched_at: Local::now(),
                background: request.background,
            }
        }),
        DataSource::Nodes => fetch_event(client.fetch_nodes().await, request.source, |nodes| {
            DataEvent::NodesUpdated {
                nodes,
                fetched_at: Local::now(),
            }
        }),
    }
}

/// Spawn a timer that asks for a background refresh of `source` every
/// `interval`.
///
/// A tick is skipped while the queue is full; the queued request will
/// bring the data up to date anyway.
pub fn spawn_refresh_timer(
    requests: mpsc::Sender<FetchRequest>,
    source: DataSource,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; the initial fetch is requested by the app
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    match requests.try_send(FetchRequest::background(source)) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            tracing::debug!(%source, "refresh already queued, skipping tick");
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => break,
                    }
                }
            }
        }
    })
}

/// Run the main TUI event loop
pub async fn run_event_loop(
    mut app: App,
    mut input_rx: mpsc::Receiver<InputEvent>,
    mut data_rx: mpsc::Receiver<DataEvent>,
    mut render_fn: impl FnMut(&App) -> Result<()>,
) -> Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            render_fn(&app)?;
            needs_render = false;
        }

        if !app.running {
            break;
        }

        tokio::select! {
            // Bias toward input channel to prevent input starvation
            biased;

            Some(input) = input_rx.recv() => {
                match app.handle_input(input) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            Some(data) = data_rx.recv() => {
                match app.handle_data(data) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            else => break,
        }
    }

    Ok(())
}

/// Create the dual channels for the TUI
pub fn create_channels() -> (
    mpsc::Sender<InputEvent>,
    mpsc::Receiver<InputEvent>,
    mpsc::Sender<DataEvent>,
    mpsc::Receiver<DataEvent>,
) {
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let (data_tx, data_rx) = mpsc::channel(DATA_CHANNEL_CAPACITY);
    (input_tx, input_rx, data_tx, data_rx)
}

/// Create the queue feeding the fetcher task
pub fn create_request_channel() -> (mpsc::Sender<FetchRequest>, mpsc::Receiver<FetchRequest>) {
    mpsc::channel(REQUEST_CHANNEL_CAPACITY)
}
