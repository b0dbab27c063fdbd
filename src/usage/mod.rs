//! Usage oracle: process CPU time, peak RSS and system-wide CPU ticks.
//!
//! [`UsageOracle`] is the seam between the instrumenter and the operating
//! system. [`OsUsage`] is the real implementation; tests substitute fakes to
//! get deterministic snapshots.
//!
//! The two delta helpers define their degenerate cases as `0.0`: no elapsed
//! wall time for [`delta_cpu_percent`], no elapsed ticks for
//! [`delta_system_cpu_percent`].

pub mod monitor;
pub mod os;

use std::io;
use std::time::Duration;

pub use monitor::{MonitorReport, RssMonitor, RssSample};
pub use os::OsUsage;

/// CPU time consumed by the current process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCpu {
    pub user: Duration,
    pub system: Duration,
}

/// Cumulative CPU tick counters for one CPU or for the whole machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl SystemTicks {
    /// Sum of every counter.
    pub fn total(&self) -> u64 {
        [
            self.nice,
            self.system,
            self.idle,
            self.iowait,
            self.irq,
            self.softirq,
            self.steal,
        ]
        .iter()
        .fold(self.user, |acc, &t| acc.saturating_add(t))
    }
}

/// Counters read at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageSnapshot {
    pub process: ProcessCpu,
    /// Peak resident set size of the process so far, in KiB.
    pub peak_rss_kb: u64,
    /// Machine-wide ticks (the aggregate of all CPUs).
    pub system: SystemTicks,
    /// Per-CPU ticks, in CPU index order. Empty where not available.
    pub per_core: Vec<SystemTicks>,
}

/// Read-only source of usage snapshots.
pub trait UsageOracle {
    fn snapshot(&self) -> io::Result<UsageSnapshot>;
}

impl<O: UsageOracle + ?Sized> UsageOracle for &O {
    fn snapshot(&self) -> io::Result<UsageSnapshot> {
        (**self).snapshot()
    }
}

/// Process CPU utilisation over a wall-clock interval, in percent.
///
/// `100 × (Δuser + Δsystem) / elapsed_secs`; `0.0` when `elapsed_secs` is
/// not positive. Values above 100 are possible for multi-threaded processes.
pub fn delta_cpu_percent(before: &UsageSnapshot, after: &UsageSnapshot, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 || !elapsed_secs.is_finite() {
        return 0.0;
    }
    let user = after.process.user.saturating_sub(before.process.user);
    let system = after.process.system.saturating_sub(before.process.system);
    100.0 * (user + system).as_secs_f64() / elapsed_secs
}

/// Machine-wide CPU utilisation between two snapshots, in percent.
///
/// `100 × (Δuser_ticks + Δsystem_ticks) / Δtotal_ticks`; `0.0` when no
/// ticks elapsed.
pub fn delta_system_cpu_percent(before: &UsageSnapshot, after: &UsageSnapshot) -> f64 {
    let total = after.system.total().saturating_sub(before.system.total());
    if total == 0 {
        return 0.0;
    }
    let user = after.system.user.saturating_sub(before.system.user);
    let system = after.system.system.saturating_sub(before.system.system);
    100.0 * user.saturating_add(system) as f64 / total as f64
}
