// Usage oracles with known answers.

use std::cell::Cell;
use std::io;
use std::time::Duration;

use brbench::usage::{ProcessCpu, SystemTicks, UsageOracle, UsageSnapshot};

/// Always reports the same counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frozen;

impl UsageOracle for Frozen {
    fn snapshot(&self) -> io::Result<UsageSnapshot> {
        Ok(UsageSnapshot {
            peak_rss_kb: 2048,
            ..UsageSnapshot::default()
        })
    }
}

/// Each snapshot adds 20 ms of user time, 5 ms of system time and 100 busy
/// ticks out of 400.
#[derive(Debug, Default)]
pub struct Ticking {
    calls: Cell<u64>,
}

impl UsageOracle for Ticking {
    fn snapshot(&self) -> io::Result<UsageSnapshot> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        Ok(UsageSnapshot {
            process: ProcessCpu {
                user: Duration::from_millis(20 * n),
                system: Duration::from_millis(5 * n),
            },
            peak_rss_kb: 4096 + n,
            system: SystemTicks {
                user: 60 * n,
                system: 40 * n,
                idle: 300 * n,
                ..SystemTicks::default()
            },
            per_core: vec![SystemTicks::default(); 2],
        })
    }
}
