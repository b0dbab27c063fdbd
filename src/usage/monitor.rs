//! Background RSS sampling of a process.
//!
//! The monitor thread polls the target once per period and records a sample
//! only when the resident size changed since the previous poll. It stops when
//! [`RssMonitor::stop`] is called, when the handle is dropped, or when the
//! target can no longer be sampled (the process exited).

use std::io;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};

use super::OsUsage;
use crate::displaylevel;

/// One observed change of resident size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RssSample {
    pub pid: u32,
    pub resident_bytes: u64,
    /// Offset from the start of monitoring.
    pub at: Duration,
}

/// Everything the monitor thread saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorReport {
    pub pid: u32,
    pub samples: Vec<RssSample>,
    pub peak_bytes: u64,
    /// `true` when sampling ended because the target went away.
    pub target_gone: bool,
}

impl MonitorReport {
    pub fn peak_kb(&self) -> u64 {
        self.peak_bytes / 1024
    }
}

/// Handle to a running monitor thread.
pub struct RssMonitor {
    stop_tx: Option<Sender<()>>,
    samples_rx: Receiver<RssSample>,
    handle: Option<JoinHandle<MonitorReport>>,
}

impl RssMonitor {
    /// Starts sampling `pid` through procfs every `period`.
    pub fn spawn(pid: u32, period: Duration) -> io::Result<RssMonitor> {
        let oracle = OsUsage::new();
        RssMonitor::spawn_with(pid, period, move |pid| oracle.resident_bytes(pid))
    }

    /// Starts sampling `pid` with a custom sampler. A sampler error ends
    /// monitoring and marks the target as gone.
    pub fn spawn_with<F>(pid: u32, period: Duration, sampler: F) -> io::Result<RssMonitor>
    where
        F: FnMut(u32) -> io::Result<u64> + Send + 'static,
    {
        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let (samples_tx, samples_rx) = unbounded();
        let period = period.max(Duration::from_millis(1));
        let handle = thread::Builder::new()
            .name(format!("rss-monitor-{}", pid))
            .spawn(move || monitor_loop(pid, period, sampler, stop_rx, samples_tx))?;
        Ok(RssMonitor {
            stop_tx: Some(stop_tx),
            samples_rx,
            handle: Some(handle),
        })
    }

    /// Live feed of recorded samples, in order.
    pub fn samples(&self) -> &Receiver<RssSample> {
        &self.samples_rx
    }

    /// Returns `true` once the monitor thread has ended on its own.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Asks the thread to stop and waits for its report.
    pub fn stop(mut self) -> io::Result<MonitorReport> {
        self.shutdown()
    }

    /// Waits for the target to go away without asking the thread to stop.
    pub fn join(mut self) -> io::Result<MonitorReport> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("rss monitor thread panicked")),
            None => Ok(MonitorReport::default()),
        }
    }

    fn shutdown(&mut self) -> io::Result<MonitorReport> {
        if let Some(tx) = self.stop_tx.take() {
            // The thread may already have exited and dropped its receiver.
            let _ = tx.try_send(());
        }
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("rss monitor thread panicked")),
            None => Ok(MonitorReport::default()),
        }
    }
}

impl Drop for RssMonitor {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn monitor_loop<F>(
    pid: u32,
    period: Duration,
    mut sampler: F,
    stop_rx: Receiver<()>,
    samples_tx: Sender<RssSample>,
) -> MonitorReport
where
    F: FnMut(u32) -> io::Result<u64>,
{
    let ticker = tick(period);
    let start = Instant::now();
    let mut report = MonitorReport {
        pid,
        ..MonitorReport::default()
    };
    let mut last: Option<u64> = None;

    loop {
        match sampler(pid) {
            Ok(bytes) => {
                if last != Some(bytes) {
                    let sample = RssSample {
                        pid,
                        resident_bytes: bytes,
                        at: start.elapsed(),
                    };
                    displaylevel!(4, "rss: pid {} at {} bytes\n", pid, bytes);
                    report.peak_bytes = report.peak_bytes.max(bytes);
                    report.samples.push(sample);
                    let _ = samples_tx.send(sample);
                    last = Some(bytes);
                }
            }
            Err(e) => {
                displaylevel!(3, "rss: stopped sampling pid {}: {}\n", pid, e);
                report.target_gone = true;
                break;
            }
        }

        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => {}
        }
    }

    report
}
