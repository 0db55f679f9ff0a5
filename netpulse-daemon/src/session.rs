//! Capture session -- owned state, tick clock, and read-side API.
//!
//! The [`Session`] is the central coordinator of `netpulse-daemon`.
//! It owns all mutable pipeline state (packet buffer, running stats,
//! interface registry) behind a single lock, drives the generation
//! clock, and exposes consistent read-only views to the presentation
//! layer.
//!
//! # Tick Pipeline (one atomic step per tick)
//!
//! 1. PacketFactory::generate_batch (batch size uniform in the
//!    configured range)
//! 2. PacketBuffer::append (FIFO eviction past capacity)
//! 3. TrafficAggregator::on_batch (same batch, all-time counters)
//! 4. InterfaceRegistry::tick (synthetic throughput refresh)
//!
//! All four run under one write guard, so observers never see a
//! partial tick. Readers clone state under a read guard and never
//! block the clock beyond that copy.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use netpulse_analysis::{ExportDocument, FilterEngine, FilterSpec, ThreatEngine};
use netpulse_core::config::NetpulseConfig;
use netpulse_core::error::NetpulseError;
use netpulse_core::types::{Packet, Snapshot, ThreatAlert};
use netpulse_traffic_engine::{InterfaceRegistry, PacketBuffer, PacketFactory, TrafficAggregator};

/// Mutable pipeline state, guarded by a single lock so that the tick
/// pipeline and `clear()` are atomic with respect to readers.
struct SessionState {
    buffer: PacketBuffer,
    aggregator: TrafficAggregator,
    interfaces: InterfaceRegistry,
}

/// Handle to the running clock task.
struct ClockHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// A capture session.
///
/// Constructed at session start and torn down at session end; all
/// state is owned here -- there are no hidden process-wide statics
/// beyond the packet id counter.
pub struct Session {
    config: NetpulseConfig,
    session_id: String,
    factory: PacketFactory,
    engine: ThreatEngine,
    state: Arc<RwLock<SessionState>>,
    filter: RwLock<FilterSpec>,
    capturing: AtomicBool,
    clock: Mutex<Option<ClockHandle>>,
}

impl Session {
    /// Build a session from a validated configuration.
    pub fn new(config: NetpulseConfig) -> Self {
        let session_id = uuid::Uuid::new_v4().to_string();
        let state = SessionState {
            buffer: PacketBuffer::new(config.capture.buffer_capacity),
            aggregator: TrafficAggregator::new(),
            interfaces: InterfaceRegistry::new(),
        };
        let engine = ThreatEngine::new(&config.analysis);

        tracing::info!(
            session_id = session_id.as_str(),
            buffer_capacity = config.capture.buffer_capacity,
            tick_interval_ms = config.capture.tick_interval_ms,
            "capture session created"
        );

        Self {
            config,
            session_id,
            factory: PacketFactory::new(),
            engine,
            state: Arc::new(RwLock::new(state)),
            filter: RwLock::new(FilterSpec::all()),
            capturing: AtomicBool::new(false),
            clock: Mutex::new(None),
        }
    }

    /// Session identifier (for log correlation).
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Whether the clock is currently running.
    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::SeqCst)
    }

    /// Start the generation clock.
    ///
    /// A no-op when capture is already active. The clock is a single
    /// task that owns timing; each tick runs the full pipeline as one
    /// atomic step.
    pub async fn start(&self) {
        if self.capturing.swap(true, Ordering::SeqCst) {
            tracing::debug!("start ignored, capture already active");
            return;
        }

        let cancel = CancellationToken::new();
        let task = spawn_clock(
            Arc::clone(&self.state),
            self.factory.clone(),
            self.config.clone(),
            cancel.clone(),
        );

        *self.clock.lock().await = Some(ClockHandle { cancel, task });
        tracing::info!("capture started");
    }

    /// Stop the generation clock.
    ///
    /// A no-op when capture is not active. Stopping prevents future
    /// ticks from firing; the last completed tick is never rolled back.
    pub async fn stop(&self) {
        if !self.capturing.swap(false, Ordering::SeqCst) {
            tracing::debug!("stop ignored, capture not active");
            return;
        }

        if let Some(handle) = self.clock.lock().await.take() {
            handle.cancel.cancel();
            if let Err(e) = handle.task.await {
                tracing::warn!(error = %e, "clock task did not shut down cleanly");
            }
        }
        tracing::info!("capture stopped");
    }

    /// Reset the buffer and running stats together, atomically with
    /// respect to any in-flight read.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.buffer.clear();
        state.aggregator.reset();
        tracing::info!("session cleared");
    }

    /// A consistent point-in-time view of the whole session.
    pub async fn current_snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            packets: state.buffer.snapshot(),
            stats: state.aggregator.stats(),
            interfaces: state.interfaces.records(),
        }
    }

    /// Replace the active filter spec.
    pub async fn set_filter(&self, spec: FilterSpec) {
        *self.filter.write().await = spec;
    }

    /// The active filter spec.
    pub async fn filter(&self) -> FilterSpec {
        self.filter.read().await.clone()
    }

    /// The buffer contents with the active filter applied.
    pub async fn filtered_view(&self) -> Vec<Packet> {
        let view = {
            let state = self.state.read().await;
            state.buffer.snapshot()
        };
        let spec = self.filter.read().await;
        FilterEngine::apply(&view, &spec)
    }

    /// Threat alerts computed over the current filtered view.
    pub async fn threat_alerts(&self) -> Vec<ThreatAlert> {
        let view = self.filtered_view().await;
        self.engine.analyze(&view)
    }

    /// Flip the enabled state of one capture interface.
    ///
    /// Unknown ids are silently ignored.
    pub async fn toggle_interface(&self, id: &str) {
        let mut state = self.state.write().await;
        state.interfaces.toggle(id);
    }

    /// Serialize the current filtered view into a dated export
    /// document. An empty view produces an empty document.
    pub async fn export_filtered_view(&self) -> Result<ExportDocument, NetpulseError> {
        let view = self.filtered_view().await;
        let document = ExportDocument::render(&view)?;
        tracing::info!(
            file_name = document.file_name.as_str(),
            records = view.len(),
            "filtered view exported"
        );
        Ok(document)
    }
}

/// Spawn the clock task: a fixed-interval ticker cancelled through the
/// token. Each tick runs the pipeline under one write guard.
fn spawn_clock(
    state: Arc<RwLock<SessionState>>,
    factory: PacketFactory,
    config: NetpulseConfig,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.capture.tick_interval());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    run_tick(&state, &factory, &config).await;
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("clock task shutting down");
                    break;
                }
            }
        }
    })
}

/// One tick of the generation pipeline.
async fn run_tick(
    state: &Arc<RwLock<SessionState>>,
    factory: &PacketFactory,
    config: &NetpulseConfig,
) {
    let batch_size =
        rand::thread_rng().gen_range(config.capture.batch_min..=config.capture.batch_max);
    let batch = factory.generate_batch(batch_size);

    let mut state = state.write().await;
    let evicted = state.buffer.append(&batch);
    let stats = state.aggregator.on_batch(&batch);
    state.interfaces.tick();

    tracing::trace!(
        batch = batch_size,
        evicted,
        total_packets = stats.total_packets,
        "tick completed"
    );
}
