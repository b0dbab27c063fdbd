//! Error taxonomy for the driver, the instrumenter and the report layer.
//!
//! Every failure is local to one file operation. Nothing here is retried;
//! the caller decides whether a batch stops or continues.

use std::fmt;
use std::io;

/// Encoder parameter names, used in [`CodecError::ParameterRejected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderParameter {
    Quality,
    WindowBits,
}

impl fmt::Display for EncoderParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncoderParameter::Quality => f.write_str("quality"),
            EncoderParameter::WindowBits => f.write_str("window bits"),
        }
    }
}

/// Failures reported by, or on behalf of, the codec session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The library could not allocate a session.
    SessionCreate,
    /// A parameter lies outside the range the encoder accepts.
    ParameterRejected { parameter: EncoderParameter, value: u32 },
    /// A dictionary with no content was supplied.
    DictionaryEmpty,
    /// The dictionary exceeds the largest size the format can reference.
    DictionaryTooLarge { size: usize, max: usize },
    /// The session refused the prepared dictionary.
    DictionaryAttach,
    /// A compress or decompress step reported an error state.
    StreamFailed,
    /// A step neither consumed input nor produced output while more work was pending.
    Stalled,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::SessionCreate => f.write_str("failed to create codec session"),
            CodecError::ParameterRejected { parameter, value } => {
                write!(f, "{} {} rejected by encoder", parameter, value)
            }
            CodecError::DictionaryEmpty => f.write_str("dictionary is empty"),
            CodecError::DictionaryTooLarge { size, max } => {
                write!(f, "dictionary is larger than maximum allowed: {} > {}", size, max)
            }
            CodecError::DictionaryAttach => f.write_str("failed to attach dictionary"),
            CodecError::StreamFailed => f.write_str("codec reported an error state"),
            CodecError::Stalled => f.write_str("codec made no progress"),
        }
    }
}

impl std::error::Error for CodecError {}

/// Crate-wide error type.
#[derive(Debug)]
pub enum Error {
    /// A stream could not be opened, read or written.
    Io { context: String, source: io::Error },
    /// The codec failed; the session has already been released.
    Codec(CodecError),
    /// The compressed input ended before the decoder signalled completion.
    Truncated { bytes_in: u64 },
    /// A report could not be parsed, was empty, or could not be written.
    Report { context: String },
}

impl Error {
    /// Wraps an I/O error with a short description of what was being done.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io { context: context.into(), source }
    }

    pub fn report(context: impl Into<String>) -> Self {
        Error::Report { context: context.into() }
    }

    /// Returns the codec error if this is one.
    pub fn as_codec(&self) -> Option<&CodecError> {
        match self {
            Error::Codec(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::Truncated { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { context, source } => write!(f, "{}: {}", context, source),
            Error::Codec(e) => write!(f, "codec error: {}", e),
            Error::Truncated { bytes_in } => write!(
                f,
                "compressed stream truncated: input ended after {} bytes before end of stream",
                bytes_in
            ),
            Error::Report { context } => write!(f, "report error: {}", context),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Error::Codec(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Report { context: e.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
