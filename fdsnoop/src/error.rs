//! Errors that abort a descriptor snapshot.
//!
//! A descriptor whose target no longer exists, or whose fdinfo record has no
//! flags line, is not an error and never shows up here.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectError {
    /// The per-process descriptor directory could not be listed.
    #[error("cannot list descriptors of pid {pid} in {}", .path.display())]
    NotAccessible {
        pid: u32,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor symlink could not be read.
    #[error("cannot resolve descriptor link {}", .path.display())]
    LinkResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The fdinfo record could not be opened or read to the end.
    #[error("cannot read flags record {}", .path.display())]
    FlagsRecordUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The flags line did not hold a base-8 integer.
    #[error("malformed flags value {text:?} in {}", .path.display())]
    MalformedOctal {
        path: PathBuf,
        text: String,
        #[source]
        source: ParseIntError,
    },
}
