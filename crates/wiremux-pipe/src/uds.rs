use std::os::unix::fs::FileTypeExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{PipeError, Result};

/// Unix domain socket endpoint for packet streams.
///
/// Stale socket files at the bind path are removed; the path is cleaned up
/// again when the endpoint drops.
pub struct UdsEndpoint {
    listener: UnixListener,
    path: PathBuf,
}

impl UdsEndpoint {
    /// Bind and listen on a filesystem-path socket.
    ///
    /// An existing file at `path` is removed first if it is a socket;
    /// anything else fails the bind.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if path.exists() {
            let metadata = std::fs::symlink_metadata(&path)?;
            if metadata.file_type().is_socket() {
                debug!(?path, "removing stale socket");
                std::fs::remove_file(&path)?;
            } else {
                return Err(PipeError::Io(std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "existing path is not a unix socket",
                )));
            }
        }

        let listener = UnixListener::bind(&path)?;
        info!(?path, "listening on unix domain socket");
        Ok(Self { listener, path })
    }

    /// Accept an incoming connection (blocking).
    pub fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self.listener.accept()?;
        debug!("accepted connection");
        Ok(stream)
    }

    /// The path this endpoint is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for UdsEndpoint {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Connect to a listening endpoint (blocking).
pub fn connect(path: impl AsRef<Path>) -> Result<UnixStream> {
    let path = path.as_ref();
    let stream = UnixStream::connect(path)?;
    debug!(?path, "connected to unix domain socket");
    Ok(stream)
}
