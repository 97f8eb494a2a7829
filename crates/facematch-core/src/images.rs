use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Raw image bytes as read from disk. The contents are never decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl ImageBuffer {
    pub fn new(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn load_image(path: &Path) -> AppResult<ImageBuffer> {
    let read_error = |source| AppError::ImageRead {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_error)?;
    let size = file.metadata().map_err(read_error)?.len();

    let mut bytes = vec![0u8; size as usize];
    file.read_exact(&mut bytes).map_err(read_error)?;

    debug!(path = %path.display(), bytes = bytes.len(), "loaded image");
    Ok(ImageBuffer::new(path, bytes))
}
