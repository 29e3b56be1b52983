//! Uploaded recordings.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use domain::AUDIO_FILE_SUFFIX;

/// Encoded audio submitted with a query.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AudioClip {
    bytes: Vec<u8>,
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl AudioClip {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Read a recording from disk.
    pub async fn from_file(path: &Path) -> io::Result<Self> {
        tokio::fs::read(path).await.map(Self::new)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Write the clip to a temporary `.wav` file on the blocking pool.
    ///
    /// The file is removed when the returned handle is dropped.
    pub async fn persist(self) -> io::Result<NamedTempFile> {
        tokio::task::spawn_blocking(move || write_temp_wav(&self.bytes))
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
    }
}

fn write_temp_wav(bytes: &[u8]) -> io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("healthatlas-")
        .suffix(AUDIO_FILE_SUFFIX)
        .tempfile()?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(file)
}
