//! Command-line interface for the `brbench` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity, the process-wide display level and the display macros. |
//! | [`args`]      | `clap` definitions of the subcommands and their flags. |
//! | [`op_mode`]   | `Mode` of a single-file run and its inference from the file extension. |
//! | [`paths`]     | Output paths derived from input paths (`.br`, `d-` prefix). |

pub mod args;
pub mod constants;
pub mod op_mode;
pub mod paths;
