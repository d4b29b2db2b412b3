use std::fmt;

use libc::c_int;

/// Open-mode flags that fdsnoop knows how to name.
///
/// Values come from the platform's libc, so they follow whatever the
/// running kernel reports in `/proc/<pid>/fdinfo`.
pub static FLAG_TABLE: [(c_int, &str); 16] = [
    (libc::O_RDONLY, "O_RDONLY"),
    (libc::O_WRONLY, "O_WRONLY"),
    (libc::O_CREAT, "O_CREAT"),
    (libc::O_EXCL, "O_EXCL"),
    (libc::O_NOCTTY, "O_NOCTTY"),
    (libc::O_TRUNC, "O_TRUNC"),
    (libc::O_APPEND, "O_APPEND"),
    (libc::O_NONBLOCK, "O_NONBLOCK"),
    (libc::O_DSYNC, "O_DSYNC"),
    (libc::O_SYNC, "O_SYNC"),
    (libc::O_ASYNC, "O_ASYNC"),
    (libc::O_NOFOLLOW, "O_NOFOLLOW"),
    (libc::O_DIRECT, "O_DIRECT"),
    (libc::O_DIRECTORY, "O_DIRECTORY"),
    (libc::O_NOATIME, "O_NOATIME"),
    (libc::O_CLOEXEC, "O_CLOEXEC"),
];

/// Raw open-mode bitmask of a descriptor, as found in its fdinfo record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags(c_int);

impl OpenFlags {
    pub fn from_bits(bits: c_int) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> c_int {
        self.0
    }

    /// Symbolic names of every table entry sharing at least one bit with
    /// the mask, ordered by pattern value.
    ///
    /// Multi-bit patterns match on any overlap: a mask holding only
    /// `O_DSYNC` also reports `O_SYNC`, and `O_RDONLY` (zero) never shows.
    pub fn names(&self) -> Vec<&'static str> {
        let mut hits: Vec<(c_int, &'static str)> = FLAG_TABLE
            .iter()
            .filter(|(pattern, _)| pattern & self.0 != 0)
            .copied()
            .collect();
        // Stable sort keeps table order for equal patterns
        hits.sort_by_key(|(pattern, _)| *pattern as u32);
        hits.into_iter().map(|(_, name)| name).collect()
    }
}

impl fmt::Display for OpenFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(" "))
    }
}
