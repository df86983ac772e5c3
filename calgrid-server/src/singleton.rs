//! One calgrid-server per machine, enforced with an exclusive `fs2` lock.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

const LOCK_FILE: &str = "server.lock";

/// Held for the lifetime of the server; dropping it releases the lock.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `$XDG_RUNTIME_DIR/calgrid`, or the cache directory where there is no runtime dir.
pub fn default_lock_dir() -> Result<PathBuf> {
    dirs::runtime_dir()
        .or_else(dirs::cache_dir)
        .map(|dir| dir.join("calgrid"))
        .ok_or_else(|| anyhow::anyhow!("Could not determine runtime directory"))
}

/// Take the lock in `dir` and record our pid in it.
pub fn acquire_lock(dir: &Path) -> Result<LockGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create lock directory {}", dir.display()))?;
    let path = dir.join(LOCK_FILE);

    // Not truncated on open: a running holder's pid must survive our failed attempt
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .context("Failed to open lock file")?;

    if file.try_lock_exclusive().is_err() {
        let mut holder = String::new();
        let _ = file.read_to_string(&mut holder);
        let holder = holder.trim();
        anyhow::bail!(
            "Another calgrid-server instance is already running{}.\n\
            If you believe this is an error, remove: {}",
            if holder.is_empty() {
                String::new()
            } else {
                format!(" (pid {holder})")
            },
            path.display()
        );
    }

    file.set_len(0)?;
    file.rewind()?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()?;

    Ok(LockGuard { _file: file, path })
}
