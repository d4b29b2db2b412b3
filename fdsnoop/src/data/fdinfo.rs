use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use libc::c_int;

use super::flags::OpenFlags;
use crate::error::InspectError;

/// Prefix of the line carrying the open-mode bitmask in /proc/<pid>/fdinfo/<fd>.
pub const FLAGS_PREFIX: &str = "flags:";

/// Read the open-mode flags of one descriptor from its fdinfo record.
///
/// The file is closed when this returns, on success and on error alike.
pub fn read_flags(path: &Path) -> Result<OpenFlags, InspectError> {
    let file = File::open(path).map_err(|source| InspectError::FlagsRecordUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_flags(BufReader::new(file), path)
}

/// Scan a record for its flags line and decode the octal mask.
///
/// A record without a flags line yields an empty mask. `path` is only used
/// for error context.
pub fn parse_flags<R: BufRead>(reader: R, path: &Path) -> Result<OpenFlags, InspectError> {
    for line in reader.lines() {
        let line = line.map_err(|source| InspectError::FlagsRecordUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(rest) = line.strip_prefix(FLAGS_PREFIX) {
            let text = rest.trim();
            let bits = c_int::from_str_radix(text, 8).map_err(|source| {
                InspectError::MalformedOctal {
                    path: path.to_path_buf(),
                    text: text.to_string(),
                    source,
                }
            })?;
            return Ok(OpenFlags::from_bits(bits));
        }
    }
    Ok(OpenFlags::default())
}
