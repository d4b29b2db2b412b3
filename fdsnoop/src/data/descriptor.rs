use std::fs::{self, ReadDir};
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::PathBuf;

use super::fdinfo;
use super::flags::OpenFlags;
use crate::config::Config;
use crate::error::InspectError;

const PERMS_HINT: &str = "insufficient permissions: run as root or grant cap_sys_ptrace";

/// One open descriptor of the inspected process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorRecord {
    pub fd: RawFd,
    pub path: PathBuf,
    pub flags: OpenFlags,
}

impl DescriptorRecord {
    /// Write the `FD:`/`Path:`/`Flags:` block, newline terminated.
    ///
    /// The path goes out as raw bytes; link targets need not be UTF-8.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "FD: {}\nPath: ", self.fd)?;
        out.write_all(self.path.as_os_str().as_bytes())?;
        writeln!(out, "\nFlags: {}", self.flags)
    }
}

/// stdin, stdout and stderr are never reported.
pub fn is_std_stream(fd: RawFd) -> bool {
    (0..=2).contains(&fd)
}

/// Wrap a listing error, replacing PermissionDenied with a helpful message.
fn check_perms(err: io::Error) -> io::Error {
    if err.kind() == io::ErrorKind::PermissionDenied {
        let euid = nix::unistd::geteuid();
        io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("{PERMS_HINT} (running as uid {euid})"),
        )
    } else {
        err
    }
}

/// Snapshot of one process's descriptor table.
pub struct Inspector {
    pid: u32,
    fd_dir: PathBuf,
    fdinfo_dir: PathBuf,
}

impl Inspector {
    pub fn new(config: &Config, pid: u32) -> Self {
        Self {
            pid,
            fd_dir: config.fd_dir(pid),
            fdinfo_dir: config.fdinfo_dir(pid),
        }
    }

    /// Open the descriptor directory and return a lazy record sequence.
    ///
    /// Fails up front if the process is gone or not ours to inspect.
    pub fn records(&self) -> Result<Records<'_>, InspectError> {
        let entries = fs::read_dir(&self.fd_dir).map_err(|e| self.not_accessible(e))?;
        Ok(Records {
            inspector: self,
            entries,
        })
    }

    fn not_accessible(&self, err: io::Error) -> InspectError {
        InspectError::NotAccessible {
            pid: self.pid,
            path: self.fd_dir.clone(),
            source: check_perms(err),
        }
    }

    /// Resolve and annotate a single descriptor.
    ///
    /// `Ok(None)` means the descriptor points at something that no longer
    /// exists (deleted file, socket, pipe, anon inode) and is skipped.
    pub fn inspect(&self, fd: RawFd) -> Result<Option<DescriptorRecord>, InspectError> {
        let link = self.fd_dir.join(fd.to_string());
        let target = fs::read_link(&link).map_err(|source| InspectError::LinkResolution {
            path: link.clone(),
            source,
        })?;

        if let Err(e) = fs::metadata(&target) {
            if e.kind() == io::ErrorKind::NotFound {
                log::debug!("fd {fd}: target {} not found, skipping", target.display());
                return Ok(None);
            }
        }

        let flags = fdinfo::read_flags(&self.fdinfo_dir.join(fd.to_string()))?;
        log::debug!("fd {fd}: flags {:#o}", flags.bits());
        Ok(Some(DescriptorRecord {
            fd,
            path: target,
            flags,
        }))
    }
}

/// Records in directory listing order. Callers stop at the first error;
/// the remaining entries are still reachable if they keep pulling.
pub struct Records<'a> {
    inspector: &'a Inspector,
    entries: ReadDir,
}

impl Iterator for Records<'_> {
    type Item = Result<DescriptorRecord, InspectError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(self.inspector.not_accessible(e))),
            };

            let name = entry.file_name();
            let fd: RawFd = match name.to_str().and_then(|s| s.parse().ok()) {
                Some(fd) if fd >= 0 => fd,
                _ => {
                    log::debug!("ignoring non-descriptor entry {name:?}");
                    continue;
                }
            };
            if is_std_stream(fd) {
                continue;
            }

            match self.inspector.inspect(fd) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
