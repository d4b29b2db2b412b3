use std::path::PathBuf;

/// Runtime configuration for a snapshot.
///
/// fdsnoop reads no configuration file or environment; everything here is
/// either compiled in or taken from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Mount point of procfs.
    pub proc_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
        }
    }
}

fn default_proc_root() -> PathBuf {
    PathBuf::from("/proc")
}

impl Config {
    /// Directory of descriptor symlinks for `pid`.
    pub fn fd_dir(&self, pid: u32) -> PathBuf {
        self.pid_dir(pid).join("fd")
    }

    /// Directory of per-descriptor status records for `pid`.
    pub fn fdinfo_dir(&self, pid: u32) -> PathBuf {
        self.pid_dir(pid).join("fdinfo")
    }

    fn pid_dir(&self, pid: u32) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_live_under_proc() {
        let config = Config::default();
        assert_eq!(config.fd_dir(42), PathBuf::from("/proc/42/fd"));
        assert_eq!(config.fdinfo_dir(42), PathBuf::from("/proc/42/fdinfo"));
    }
}
