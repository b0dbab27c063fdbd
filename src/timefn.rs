// timefn — monotonic timestamps and per-phase time accounting.
//
// `std::time::Instant` is monotonic and MT-safe on all supported platforms.
// The driver brackets its sub-steps with a `StepProbe`; `PhaseClock` is the
// probe that turns those brackets into accumulated durations.

use std::time::Instant;

/// Nanosecond duration type.
pub type DurationNs = u64;

/// Opaque timestamp. Only meaningful relative to another `TimeT`.
#[derive(Clone, Copy, Debug)]
pub struct TimeT {
    pub(crate) t: Instant,
}

impl TimeT {
    pub fn new() -> Self {
        TimeT { t: Instant::now() }
    }
}

impl Default for TimeT {
    fn default() -> Self {
        TimeT::new()
    }
}

/// Returns current monotonic timestamp.
pub fn get_time() -> TimeT {
    TimeT { t: Instant::now() }
}

/// Returns the nanosecond duration between `clock_start` and `clock_end`.
/// Saturates to 0 if `clock_end` precedes `clock_start`.
pub fn span_ns(clock_start: TimeT, clock_end: TimeT) -> DurationNs {
    clock_end
        .t
        .saturating_duration_since(clock_start.t)
        .as_nanos() as DurationNs
}

/// Measures nanoseconds elapsed since `clock_start`.
pub fn clock_span_ns(clock_start: TimeT) -> DurationNs {
    clock_start.t.elapsed().as_nanos() as DurationNs
}

/// Converts nanoseconds to fractional seconds.
#[inline]
pub fn ns_to_secs(ns: DurationNs) -> f64 {
    ns as f64 / 1e9
}

// ── Phases ────────────────────────────────────────────────────────────────────

/// Sub-steps of one driver invocation that can be timed individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Filling the input chunk from the source stream.
    Read,
    /// Time spent strictly inside compress/decompress steps.
    Codec,
    /// Flushing produced output to the destination stream.
    Write,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Read, Phase::Codec, Phase::Write];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Read => "read",
            Phase::Codec => "codec",
            Phase::Write => "write",
        }
    }

    fn index(self) -> usize {
        match self {
            Phase::Read => 0,
            Phase::Codec => 1,
            Phase::Write => 2,
        }
    }
}

/// Hook invoked around every driver sub-step.
///
/// `enter` and `exit` always come in matched pairs for the same phase and
/// never nest.
pub trait StepProbe {
    fn enter(&mut self, phase: Phase);
    fn exit(&mut self, phase: Phase);
}

/// The no-op probe.
impl StepProbe for () {
    #[inline]
    fn enter(&mut self, _phase: Phase) {}
    #[inline]
    fn exit(&mut self, _phase: Phase) {}
}

impl<P: StepProbe + ?Sized> StepProbe for &mut P {
    #[inline]
    fn enter(&mut self, phase: Phase) {
        (**self).enter(phase)
    }
    #[inline]
    fn exit(&mut self, phase: Phase) {
        (**self).exit(phase)
    }
}

/// Named sub-timings of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimes {
    /// Wall time of the whole driver call.
    pub total_ns: DurationNs,
    phases: [DurationNs; 3],
}

impl PhaseTimes {
    pub fn get(&self, phase: Phase) -> DurationNs {
        self.phases[phase.index()]
    }

    pub fn set(&mut self, phase: Phase, ns: DurationNs) {
        self.phases[phase.index()] = ns;
    }

    pub fn total_secs(&self) -> f64 {
        ns_to_secs(self.total_ns)
    }

    pub fn secs(&self, phase: Phase) -> f64 {
        ns_to_secs(self.get(phase))
    }

    /// `(name, nanoseconds)` pairs, total first.
    pub fn named(&self) -> Vec<(&'static str, DurationNs)> {
        let mut out = vec![("total", self.total_ns)];
        out.extend(Phase::ALL.iter().map(|p| (p.name(), self.get(*p))));
        out
    }
}

/// Probe that accumulates the time spent in each phase.
#[derive(Debug, Default)]
pub struct PhaseClock {
    times: PhaseTimes,
    open: Option<(Phase, TimeT)>,
    calls: [u64; 3],
}

impl PhaseClock {
    pub fn new() -> Self {
        PhaseClock::default()
    }

    /// Number of completed brackets for `phase`.
    pub fn count(&self, phase: Phase) -> u64 {
        self.calls[phase.index()]
    }

    /// Consumes the clock, stamping `total_ns` onto the accumulated phases.
    pub fn finish(self, total_ns: DurationNs) -> PhaseTimes {
        let mut times = self.times;
        times.total_ns = total_ns;
        times
    }
}

impl StepProbe for PhaseClock {
    fn enter(&mut self, phase: Phase) {
        debug_assert!(self.open.is_none(), "nested probe bracket");
        self.open = Some((phase, get_time()));
    }

    fn exit(&mut self, phase: Phase) {
        if let Some((open_phase, start)) = self.open.take() {
            debug_assert_eq!(open_phase, phase);
            let idx = phase.index();
            self.times.phases[idx] += clock_span_ns(start);
            self.calls[idx] += 1;
        }
    }
}
