//! Error types for objwire

use std::path::PathBuf;

use thiserror::Error;

use crate::obj::RecordTag;

/// Main error type for parsing and rasterization
#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Read(#[from] std::io::Error),

    #[error("line {line}: malformed {tag} record: {reason}")]
    MalformedRecord {
        line: usize,
        tag: RecordTag,
        reason: String,
    },

    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    #[error("a {width}x{height} buffer with {channels} channels is too large to allocate")]
    BufferTooLarge {
        width: usize,
        height: usize,
        channels: usize,
    },

    #[error("expected {expected} channel values, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("face {face} references vertex {index}, but only {vertices} vertices exist")]
    FaceIndex {
        face: usize,
        index: u32,
        vertices: usize,
    },
}

/// Result type alias for objwire operations
pub type Result<T> = std::result::Result<T, Error>;
