//! Lifecycle orchestration: periodic sweeps and their scheduler.

mod expiration_sweep;
mod reminder_sweep;
mod scheduler;
mod sweep_report;

pub use expiration_sweep::ExpirationSweep;
pub use reminder_sweep::ReminderSweep;
pub use scheduler::{LifecycleScheduler, SchedulerStatus};
pub use sweep_report::SweepReport;
