//! Periodic driver for the lifecycle sweeps.
//!
//! The scheduler is a plainly constructed object owned by the composition
//! root and passed to whatever needs trigger access; there is no global
//! instance. Each sweep kind runs on its own interval and never overlaps
//! itself; the two kinds run independently and may overlap each other.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::SchedulerConfig;
use crate::domain::foundation::Timestamp;

use super::{ExpirationSweep, ReminderSweep, SweepReport};

/// Operator-visible scheduler state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerStatus {
    pub is_running: bool,
    pub next_expiration_check_at: Option<Timestamp>,
    pub next_reminder_check_at: Option<Timestamp>,
}

/// Drives the expiration and reminder sweeps on independent cadences.
pub struct LifecycleScheduler {
    expiration_sweep: Arc<ExpirationSweep>,
    reminder_sweep: Arc<ReminderSweep>,
    config: SchedulerConfig,

    running: AtomicBool,
    stop_flag: Arc<AtomicBool>,
    // Per-sweep-kind guards; a held guard means that kind is mid-run.
    expiration_guard: Mutex<()>,
    reminder_guard: Mutex<()>,
    next_expiration_check: RwLock<Option<Timestamp>>,
    next_reminder_check: RwLock<Option<Timestamp>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    shutdown: Mutex<Option<watch::Sender<bool>>>,
}

impl LifecycleScheduler {
    pub fn new(
        expiration_sweep: Arc<ExpirationSweep>,
        reminder_sweep: Arc<ReminderSweep>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            expiration_sweep,
            reminder_sweep,
            config,
            running: AtomicBool::new(false),
            stop_flag: Arc::new(AtomicBool::new(false)),
            expiration_guard: Mutex::new(()),
            reminder_guard: Mutex::new(()),
            next_expiration_check: RwLock::new(None),
            next_reminder_check: RwLock::new(None),
            tasks: Mutex::new(Vec::new()),
            shutdown: Mutex::new(None),
        }
    }

    /// Starts the periodic sweep tasks. Calling on a running scheduler is
    /// a no-op.
    pub async fn start(self: &Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        self.stop_flag.store(false, Ordering::SeqCst);
        info!(
            expiration_interval_secs = self.config.expiration_check_interval_secs,
            reminder_interval_secs = self.config.reminder_check_interval_secs,
            "lifecycle scheduler starting"
        );

        let (tx, rx) = watch::channel(false);
        *self.shutdown.lock().await = Some(tx);
        let mut tasks = self.tasks.lock().await;
        tasks.push(self.spawn_expiration_loop(rx.clone()));
        tasks.push(self.spawn_reminder_loop(rx));
    }

    /// Stops the periodic tasks and waits for them to wind down. The item
    /// a sweep is working on completes; no further items start. Calling on
    /// a stopped scheduler is a no-op.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(tx) = self.shutdown.lock().await.take() {
            let _ = tx.send(true);
        }

        for task in self.tasks.lock().await.drain(..) {
            let _ = task.await;
        }
        // The flag only governs the loops just stopped; manual triggers on
        // a stopped scheduler still process items.
        self.stop_flag.store(false, Ordering::SeqCst);
        *self.next_expiration_check.write().await = None;
        *self.next_reminder_check.write().await = None;
        info!("lifecycle scheduler stopped");
    }

    pub async fn status(&self) -> SchedulerStatus {
        SchedulerStatus {
            is_running: self.running.load(Ordering::SeqCst),
            next_expiration_check_at: *self.next_expiration_check.read().await,
            next_reminder_check_at: *self.next_reminder_check.read().await,
        }
    }

    /// Runs the expiration sweep now, unless one is already mid-run.
    pub async fn trigger_expiration_check(&self) -> SweepReport {
        let Ok(_guard) = self.expiration_guard.try_lock() else {
            info!("expiration sweep already running, trigger skipped");
            return SweepReport::default();
        };
        self.expiration_sweep
            .run(Timestamp::now(), &self.stop_flag)
            .await
    }

    /// Runs the reminder sweep now, unless one is already mid-run.
    pub async fn trigger_reminder_check(&self) -> SweepReport {
        let Ok(_guard) = self.reminder_guard.try_lock() else {
            info!("reminder sweep already running, trigger skipped");
            return SweepReport::default();
        };
        self.reminder_sweep
            .run(Timestamp::now(), &self.stop_flag)
            .await
    }

    /// Runs both sweeps concurrently, returning both reports.
    pub async fn run_all_processes(&self) -> (SweepReport, SweepReport) {
        tokio::join!(self.trigger_expiration_check(), self.trigger_reminder_check())
    }

    fn spawn_expiration_loop(self: &Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        let interval_secs = self.config.expiration_check_interval_secs;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            // The first tick fires immediately; sweep right away on start.
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown.changed() => break,
                }
                *scheduler.next_expiration_check.write().await =
                    Some(Timestamp::now().add_secs(interval_secs as i64));
                scheduler.trigger_expiration_check().await;
                if *shutdown.borrow() {
                    break;
                }
            }
        })
    }

    fn spawn_reminder_loop(self: &Arc<Self>, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        let scheduler = Arc::clone(self);
        let interval_secs = self.config.reminder_check_interval_secs;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown.changed() => break,
                }
                *scheduler.next_reminder_check.write().await =
                    Some(Timestamp::now().add_secs(interval_secs as i64));
                scheduler.trigger_reminder_check().await;
                if *shutdown.borrow() {
                    break;
                }
            }
        })
    }
}
