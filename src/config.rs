// config.rs — Compile-time configuration constants.
//
// Runtime knobs live in small option structs next to the code that consumes
// them (`stream::StreamOptions`, `bench::BatchConfig`); the values here are
// their defaults and the codec's accepted parameter ranges.

// ── Size multipliers ──────────────────────────────────────────────────────────
pub const KB: usize = 1 << 10;

// Capacity of the input and output chunks fed through the codec.
// Can be overridden with `--chunk-size` on the command line.
pub const CHUNK_SIZE_DEFAULT: usize = 16 * KB;

// ── Encoder parameter ranges ──────────────────────────────────────────────────

// Quality: 0 (fastest) to 11 (densest).
pub const QUALITY_MIN: u32 = 0;
pub const QUALITY_MAX: u32 = 11;
pub const QUALITY_DEFAULT: u32 = 6;

// Sliding window size in bits (window = 2^bits − 16 bytes).
// Large-window mode (up to 30 bits) is not a stream-compatible format and is not offered.
pub const WINDOW_BITS_MIN: u32 = 10;
pub const WINDOW_BITS_MAX: u32 = 24;
pub const WINDOW_BITS_DEFAULT: u32 = 16;

// ── Dictionary limits ─────────────────────────────────────────────────────────

/// Largest distance the format can express.
pub const BROTLI_MAX_DISTANCE: usize = 0x3FF_FFFC;

/// Largest backward reference for a window of `bits`.
pub const fn max_backward_limit(bits: u32) -> usize {
    (1usize << bits) - 16
}

/// Largest raw dictionary accepted for attachment to a session.
pub const MAX_DICTIONARY_SIZE: usize = BROTLI_MAX_DISTANCE - max_backward_limit(WINDOW_BITS_MAX);

// ── File naming ───────────────────────────────────────────────────────────────

/// Suffix appended to compressed files.
pub const BROTLI_EXTENSION: &str = ".br";

/// Prefix given to decompressed copies.
pub const DECOMPRESSED_PREFIX: &str = "d-";

/// Default sampling period of the RSS monitor.
pub const MONITOR_PERIOD_MS_DEFAULT: u64 = 100;
