//! Update loop
//!
//! A single consumer loop recomputes the sensor on a periodic timer and on
//! upstream change notifications. Notifications are debounced, updates run
//! one at a time, and a result overtaken by a newer notification is dropped
//! instead of published.

use crate::config::Config;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::publish::SnapshotWriter;
use crate::sensor::{PriceSensor, PriceSnapshot};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval, sleep_until};

/// Source of the current time
pub type Clock = Arc<dyn Fn() -> DateTime<Tz> + Send + Sync>;

/// Handle used to drive and observe a running [`PriceService`]
#[derive(Clone)]
pub struct ServiceHandle {
    trigger_tx: Arc<watch::Sender<u64>>,
    shutdown_tx: mpsc::UnboundedSender<()>,
    snapshot_rx: watch::Receiver<Arc<PriceSnapshot>>,
}

impl ServiceHandle {
    /// Signal that the upstream price source changed
    pub fn notify_source_changed(&self) {
        self.trigger_tx.send_modify(|generation| *generation += 1);
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        self.shutdown_tx.send(()).ok();
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<PriceSnapshot>> {
        self.snapshot_rx.clone()
    }

    pub fn latest(&self) -> Arc<PriceSnapshot> {
        self.snapshot_rx.borrow().clone()
    }
}

/// Periodic and change-driven recomputation of one [`PriceSensor`]
pub struct PriceService {
    sensor: Arc<PriceSensor>,
    scan_interval: Duration,
    debounce: Duration,
    clock: Clock,
    writer: Option<SnapshotWriter>,
    trigger_rx: watch::Receiver<u64>,
    shutdown_rx: mpsc::UnboundedReceiver<()>,
    snapshot_tx: watch::Sender<Arc<PriceSnapshot>>,
    last_update: Option<Instant>,
    logger: StructuredLogger,
}

impl PriceService {
    /// Build the service. With an output file configured, the last written
    /// snapshot is republished as unavailable until the first update lands.
    pub fn new(sensor: PriceSensor) -> (Self, ServiceHandle) {
        let logger = get_logger("service");
        let config: &Config = sensor.config();
        let writer = config.output.file.as_ref().map(SnapshotWriter::new);
        let initial = match writer.as_ref().map(SnapshotWriter::load) {
            Some(Ok(Some(previous))) => previous.as_unavailable(),
            Some(Err(e)) => {
                logger.warn(&format!("Ignoring unreadable snapshot file: {}", e));
                PriceSnapshot::pending(config)
            }
            _ => PriceSnapshot::pending(config),
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(initial));
        let (trigger_tx, trigger_rx) = watch::channel(0u64);
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel();

        let tz = sensor.timezone();
        let clock: Clock = Arc::new(move || Utc::now().with_timezone(&tz));

        let service = Self {
            scan_interval: Duration::from_secs(config.update.scan_interval_secs.max(1)),
            debounce: Duration::from_millis(config.update.debounce_ms),
            sensor: Arc::new(sensor),
            clock,
            writer,
            trigger_rx,
            shutdown_rx,
            snapshot_tx,
            last_update: None,
            logger,
        };
        let handle = ServiceHandle {
            trigger_tx: Arc::new(trigger_tx),
            shutdown_tx,
            snapshot_rx,
        };
        (service, handle)
    }

    /// Replace the wall clock, e.g. to pin "now" in tests
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Run the update loop until shutdown is requested
    pub async fn run(mut self) -> Result<()> {
        self.logger.info(&format!(
            "Starting price update loop (every {}s, debounce {}ms)",
            self.scan_interval.as_secs(),
            self.debounce.as_millis()
        ));

        let mut scan = interval(self.scan_interval);
        scan.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut debounce_deadline: Option<Instant> = None;
        let mut triggers_open = true;

        loop {
            tokio::select! {
                _ = scan.tick() => {
                    debounce_deadline = None;
                    if !self.update_cycle().await {
                        break;
                    }
                }
                changed = self.trigger_rx.changed(), if triggers_open => {
                    if changed.is_err() {
                        self.logger.debug("Change notifications closed");
                        triggers_open = false;
                        continue;
                    }
                    let earliest = self
                        .last_update
                        .map_or_else(Instant::now, |last| last + self.debounce);
                    if earliest <= Instant::now() {
                        debounce_deadline = None;
                        if !self.update_cycle().await {
                            break;
                        }
                    } else if debounce_deadline.is_none() {
                        debounce_deadline = Some(earliest);
                    }
                }
                _ = sleep_until(debounce_deadline.unwrap_or_else(Instant::now)), if debounce_deadline.is_some() => {
                    debounce_deadline = None;
                    if !self.update_cycle().await {
                        break;
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    self.logger.info("Shutdown signal received");
                    break;
                }
            }
        }

        self.logger.info("Price update loop stopped");
        Ok(())
    }

    /// Run one update and publish its outcome. Returns `false` when a
    /// shutdown request arrived while the update was still running.
    async fn update_cycle(&mut self) -> bool {
        // Mark every notification seen so far as handled by this update
        let generation = *self.trigger_rx.borrow_and_update();
        self.last_update = Some(Instant::now());
        let now = (self.clock)();

        let sensor = Arc::clone(&self.sensor);
        let result = tokio::select! {
            result = async move { sensor.update(now).await } => result,
            _ = self.shutdown_rx.recv() => {
                self.logger.info("Shutdown signal received, abandoning running update");
                return false;
            }
        };

        match result {
            Ok(snapshot) => {
                if self.trigger_rx.has_changed().unwrap_or(false) {
                    self.logger.debug(&format!(
                        "Discarding result of generation {}, newer change pending",
                        generation
                    ));
                    return true;
                }
                self.publish(snapshot);
            }
            Err(e) => {
                if e.is_setup_error() {
                    self.logger.error(&format!("Invalid tariff schedule: {}", e));
                } else {
                    self.logger.error(&format!("Price update failed: {}", e));
                }
                let previous = self.snapshot_tx.borrow().as_unavailable();
                self.publish(previous);
            }
        }
        true
    }

    fn publish(&self, snapshot: PriceSnapshot) {
        if let Some(writer) = &self.writer
            && let Err(e) = writer.write(&snapshot)
        {
            self.logger.warn(&format!("Failed to write snapshot: {}", e));
        }
        self.snapshot_tx.send_replace(Arc::new(snapshot));
    }
}

/// Notify `handle` whenever the modification time of `path` changes.
///
/// Stops once the service has gone away.
pub fn spawn_file_watcher(path: PathBuf, poll: Duration, handle: ServiceHandle) -> JoinHandle<()> {
    let logger = get_logger("watcher");
    tokio::spawn(async move {
        let mut ticker = interval(poll);
        let mut last_seen: Option<SystemTime> = None;
        loop {
            ticker.tick().await;
            if handle.trigger_tx.is_closed() {
                break;
            }
            let modified = match tokio::fs::metadata(&path).await {
                Ok(meta) => meta.modified().ok(),
                Err(_) => None,
            };
            if modified.is_some() && modified != last_seen {
                if last_seen.is_some() {
                    logger.debug(&format!("{} changed", path.display()));
                    handle.notify_source_changed();
                }
                last_seen = modified;
            }
        }
    })
}
