use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;

const MAX_RETRIES: usize = 10;
const RETRY_MS: u64 = 100;

#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

/// Append-only JSON Lines file. Each `append` writes one serialized record
/// followed by `\n` while holding an exclusive lock; the file is created
/// with owner-only permissions on Unix.
#[derive(Debug, Clone)]
pub struct JsonlAppender {
    path: PathBuf,
}

impl JsonlAppender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append<T: Serialize>(&self, rec: &T) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() { std::fs::create_dir_all(parent)?; }

        let mut opts = OpenOptions::new();
        opts.create(true).append(true).read(true);
        #[cfg(unix)]
        { opts.mode(0o600); }
        let mut file = opts.open(&self.path)?;
        ensure_owner_only_permissions(&file)?;
        lock_exclusive_with_retry(&file)?;

        let mut line = serde_json::to_string(rec)
            .map_err(|e| std::io::Error::other(format!("serialize jsonl record failed: {e}")))?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        file.flush()?;
        FileExt::unlock(&file)?;
        Ok(())
    }

    /// Read back every line that parses as `T`; malformed lines are skipped.
    /// A missing file reads as empty.
    pub fn read_all<T: DeserializeOwned>(&self) -> std::io::Result<Vec<T>> {
        let file = match OpenOptions::new().read(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        lock_shared_with_retry(&file)?;
        let reader = BufReader::new(&file);
        let mut out = Vec::new();
        for line in reader.lines() {
            let Ok(s) = line else { continue };
            let Ok(rec) = serde_json::from_str::<T>(&s) else { continue };
            out.push(rec);
        }
        FileExt::unlock(&file)?;
        Ok(out)
    }
}

#[cfg(unix)]
fn ensure_owner_only_permissions(file: &std::fs::File) -> std::io::Result<()> {
    let meta = file.metadata()?;
    let mode = meta.permissions().mode() & 0o777;
    if mode != 0o600 {
        let mut p = meta.permissions();
        p.set_mode(0o600);
        file.set_permissions(p)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_owner_only_permissions(_file: &std::fs::File) -> std::io::Result<()> { Ok(()) }

fn lock_exclusive_with_retry(file: &std::fs::File) -> std::io::Result<()> {
    for _ in 0..MAX_RETRIES {
        match FileExt::try_lock_exclusive(file) {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(std::time::Duration::from_millis(RETRY_MS));
            }
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(std::io::ErrorKind::WouldBlock, "jsonl: lock timeout"))
}

fn lock_shared_with_retry(file: &std::fs::File) -> std::io::Result<()> {
    for _ in 0..MAX_RETRIES {
        match FileExt::try_lock_shared(file) {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(std::time::Duration::from_millis(RETRY_MS));
            }
            Err(e) => return Err(e),
        }
    }
    Err(std::io::Error::new(std::io::ErrorKind::WouldBlock, "jsonl: lock timeout"))
}
