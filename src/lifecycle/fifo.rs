//! Named channel (FIFO) preparation and opening.

use std::ffi::CString;
use std::fs;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::net::unix::pipe;

use crate::config::ChannelConfig;

/// Permission bits for a new FIFO, before umask.
const FIFO_MODE: libc::mode_t = 0o666;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to remove stale channel {path}: {source}")]
    RemoveStale { path: PathBuf, source: io::Error },

    #[error("failed to create channel directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to create FIFO {path}: {source}")]
    Create { path: PathBuf, source: io::Error },

    #[error("failed to open channel {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
}

/// Replace whatever is at `path` with a fresh FIFO, creating parent directories.
pub fn prepare_channel(path: &Path) -> Result<(), ChannelError> {
    if fs::symlink_metadata(path).is_ok() {
        tracing::debug!(path = %path.display(), "Removing stale channel");
        fs::remove_file(path).map_err(|source| ChannelError::RemoveStale {
            path: path.to_path_buf(),
            source,
        })?;
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ChannelError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    mkfifo(path).map_err(|source| ChannelError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), "Channel created");
    Ok(())
}

fn mkfifo(path: &Path) -> io::Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `c_path` is a NUL-terminated string that outlives the call.
    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), FIFO_MODE) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// Open the channel for reading. Must be called inside a Tokio runtime.
///
/// With `hold_open` on Linux the FIFO is opened read-write, so the reader
/// keeps a writer reference and never sees end-of-stream between proxy writes.
pub fn open_channel(config: &ChannelConfig) -> Result<pipe::Receiver, ChannelError> {
    let path = Path::new(&config.path);
    let mut options = pipe::OpenOptions::new();

    #[cfg(target_os = "linux")]
    options.read_write(config.hold_open);

    if cfg!(not(target_os = "linux")) && config.hold_open {
        tracing::warn!("channel.hold_open is only supported on Linux; ignoring");
    }

    options
        .open_receiver(path)
        .map_err(|source| ChannelError::Open {
            path: path.to_path_buf(),
            source,
        })
}
