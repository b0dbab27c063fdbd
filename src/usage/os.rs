//! Usage oracle backed by `getrusage(2)` and `/proc`.
//!
//! Process counters come from `getrusage(RUSAGE_SELF)` on every Unix target.
//! Tick counters and per-process RSS are read from procfs where the build
//! script detected one (`cfg(has_procfs)`); elsewhere ticks are zero, which
//! makes the system CPU percentage degrade to `0.0`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use nix::sys::resource::{getrusage, UsageWho};
use nix::sys::time::TimeVal;

use super::{ProcessCpu, SystemTicks, UsageOracle, UsageSnapshot};

/// The operating system's counters.
#[derive(Debug, Clone)]
pub struct OsUsage {
    proc_root: PathBuf,
}

impl Default for OsUsage {
    fn default() -> Self {
        OsUsage {
            proc_root: PathBuf::from("/proc"),
        }
    }
}

impl OsUsage {
    pub fn new() -> Self {
        OsUsage::default()
    }

    /// Reads procfs files below `root` instead of `/proc`.
    pub fn with_proc_root(root: impl Into<PathBuf>) -> Self {
        OsUsage {
            proc_root: root.into(),
        }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    /// Current resident set size of `pid`, in bytes.
    #[cfg(has_procfs)]
    pub fn resident_bytes(&self, pid: u32) -> io::Result<u64> {
        let statm = fs::read_to_string(self.proc_root.join(pid.to_string()).join("statm"))?;
        let pages = parse_statm_resident(&statm).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "malformed statm")
        })?;
        Ok(pages * page_size())
    }

    #[cfg(not(has_procfs))]
    pub fn resident_bytes(&self, _pid: u32) -> io::Result<u64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "per-process RSS sampling requires procfs",
        ))
    }

    fn system_ticks(&self) -> io::Result<(SystemTicks, Vec<SystemTicks>)> {
        if cfg!(has_procfs) {
            let text = fs::read_to_string(self.proc_root.join("stat"))?;
            Ok(parse_proc_stat(&text))
        } else {
            Ok((SystemTicks::default(), Vec::new()))
        }
    }
}

impl UsageOracle for OsUsage {
    fn snapshot(&self) -> io::Result<UsageSnapshot> {
        let usage = getrusage(UsageWho::RUSAGE_SELF).map_err(io::Error::from)?;
        let process = ProcessCpu {
            user: timeval_to_duration(usage.user_time()),
            system: timeval_to_duration(usage.system_time()),
        };
        let (system, per_core) = self.system_ticks()?;
        Ok(UsageSnapshot {
            process,
            peak_rss_kb: max_rss_to_kb(usage.max_rss() as i64),
            system,
            per_core,
        })
    }
}

fn timeval_to_duration(tv: TimeVal) -> Duration {
    let secs = tv.tv_sec().max(0) as u64;
    let micros = tv.tv_usec().clamp(0, 999_999) as u32;
    Duration::new(secs, micros * 1000)
}

// ru_maxrss is in bytes on Apple platforms and in KiB everywhere else.
#[cfg(any(target_os = "macos", target_os = "ios"))]
fn max_rss_to_kb(max_rss: i64) -> u64 {
    (max_rss.max(0) as u64) / 1024
}

#[cfg(not(any(target_os = "macos", target_os = "ios")))]
fn max_rss_to_kb(max_rss: i64) -> u64 {
    max_rss.max(0) as u64
}

#[cfg(has_procfs)]
fn page_size() -> u64 {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        4096
    }
}

/// Parses the `cpu` and `cpuN` lines of `/proc/stat`.
///
/// Returns the aggregate counters and the per-CPU counters in index order.
/// Missing trailing fields (older kernels) read as zero; unparsable lines
/// are skipped.
pub fn parse_proc_stat(text: &str) -> (SystemTicks, Vec<SystemTicks>) {
    let mut aggregate = SystemTicks::default();
    let mut per_core: Vec<(usize, SystemTicks)> = Vec::new();

    for line in text.lines() {
        let mut fields = line.split_whitespace();
        let label = match fields.next() {
            Some(l) if l.starts_with("cpu") => l,
            _ => continue,
        };
        let values: Vec<u64> = fields.map_while(|f| f.parse().ok()).collect();
        if values.len() < 4 {
            continue;
        }
        let at = |i: usize| values.get(i).copied().unwrap_or(0);
        let ticks = SystemTicks {
            user: at(0),
            nice: at(1),
            system: at(2),
            idle: at(3),
            iowait: at(4),
            irq: at(5),
            softirq: at(6),
            steal: at(7),
        };
        match &label[3..] {
            "" => aggregate = ticks,
            index => {
                if let Ok(i) = index.parse::<usize>() {
                    per_core.push((i, ticks));
                }
            }
        }
    }

    per_core.sort_by_key(|(i, _)| *i);
    (aggregate, per_core.into_iter().map(|(_, t)| t).collect())
}

/// Resident page count: the second field of `/proc/<pid>/statm`.
pub fn parse_statm_resident(text: &str) -> Option<u64> {
    text.split_whitespace().nth(1)?.parse().ok()
}
