// brbench — streaming Brotli driver with time, CPU and RSS instrumentation
// and CSV comparison reports.

pub mod bench;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod report;
pub mod stream;
pub mod timefn;
pub mod usage;
pub mod util;

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use bench::{Instrumenter, MetricsRecord};
pub use codec::{Brotli, Codec, EncoderParams, PreparedDictionary};
pub use error::{CodecError, Error, Result};
pub use stream::{decode_stream, encode_stream, StreamOptions, StreamStats};
pub use usage::{OsUsage, UsageOracle};
