//! Filesystem helpers shared by the batch runner and the CLI.
//!
//! - [`file_size`] — sizes of regular files
//! - [`file_list`] — directory expansion with `walkdir`
//! - [`bucket`]    — power-of-two size buckets and corpus segregation
//! - [`digest`]    — XXH64 content digests for round-trip verification

pub mod bucket;
pub mod digest;
pub mod file_list;
pub mod file_size;

// ── Re-exports at `util::` level ─────────────────────────────────────────────

pub use bucket::{segregate, size_bucket, SegregateSummary};
pub use digest::{hash_file, hash_reader, HashingWriter};
pub use file_list::{create_file_list, list_top_level_files, relative_identity};
pub use file_size::{get_file_size, get_total_file_size};
