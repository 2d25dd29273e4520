//! Bounded-time reads of asset file bytes.
//!
//! Packs are often loaded from network shares or removable media, where a
//! single stalled read would otherwise hang the whole output step. Each read
//! runs on its own worker thread; the caller waits on a channel for at most
//! the configured timeout. A read that times out is abandoned, not
//! cancelled: its thread finishes (or stays blocked) in the background.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use crate::model::{BlobContent, NamedBlob};

/// Failure to produce a blob's bytes.
#[derive(Debug, Error)]
pub enum BlobReadError {
    #[error("reading {} timed out after {}ms", path.display(), timeout.as_millis())]
    Timeout { path: PathBuf, timeout: Duration },

    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reader thread for {} exited without a result", path.display())]
    Disconnected { path: PathBuf },
}

/// Read the whole file at `path`, giving up after `timeout`.
///
/// # Errors
/// Returns [`BlobReadError::Timeout`] if no result arrives in time and
/// [`BlobReadError::Io`] if the read itself fails.
pub fn read_with_timeout(path: &Path, timeout: Duration) -> Result<Vec<u8>, BlobReadError> {
    let (tx, rx) = mpsc::channel();
    let owned = path.to_owned();
    let spawned = thread::Builder::new()
        .name("blob-read".to_owned())
        .spawn(move || {
            let _ = tx.send(std::fs::read(owned));
        });
    if let Err(source) = spawned {
        return Err(BlobReadError::Io {
            path: path.to_owned(),
            source,
        });
    }

    match rx.recv_timeout(timeout) {
        Ok(Ok(bytes)) => {
            debug!(path = %path.display(), len = bytes.len(), "read blob");
            Ok(bytes)
        }
        Ok(Err(source)) => Err(BlobReadError::Io {
            path: path.to_owned(),
            source,
        }),
        Err(RecvTimeoutError::Timeout) => Err(BlobReadError::Timeout {
            path: path.to_owned(),
            timeout,
        }),
        Err(RecvTimeoutError::Disconnected) => Err(BlobReadError::Disconnected {
            path: path.to_owned(),
        }),
    }
}

/// The bytes of `blob`, reading from disk for path-backed blobs.
///
/// # Errors
/// See [`read_with_timeout`]; in-memory blobs never fail.
pub fn read_blob(blob: &NamedBlob, timeout: Duration) -> Result<Vec<u8>, BlobReadError> {
    match &blob.content {
        BlobContent::Bytes(bytes) => Ok(bytes.clone()),
        BlobContent::Path(path) => read_with_timeout(path, timeout),
    }
}
