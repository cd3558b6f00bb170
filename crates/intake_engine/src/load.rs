use std::io::ErrorKind;
use std::sync::Arc;

use engine_logging::engine_debug;

use crate::{FileSource, IngestError};

#[derive(Debug, Clone, Default)]
pub struct LoadSettings {
    pub max_bytes: Option<u64>,
}

/// Produces the full byte buffer of a submitted file.
#[async_trait::async_trait]
pub trait FileLoader: Send + Sync {
    async fn load(&self, source: &FileSource) -> Result<Arc<[u8]>, IngestError>;
}

#[derive(Debug, Clone, Default)]
pub struct LocalFileLoader {
    settings: LoadSettings,
}

impl LocalFileLoader {
    pub fn new(settings: LoadSettings) -> Self {
        Self { settings }
    }

    fn check_size(&self, len: u64) -> Result<(), IngestError> {
        match self.settings.max_bytes {
            Some(max_bytes) if len > max_bytes => Err(IngestError::read(format!(
                "file is {len} bytes, limit is {max_bytes}"
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl FileLoader for LocalFileLoader {
    async fn load(&self, source: &FileSource) -> Result<Arc<[u8]>, IngestError> {
        match source {
            FileSource::Memory(bytes) => {
                self.check_size(bytes.len() as u64)?;
                Ok(bytes.clone())
            }
            FileSource::Path(path) => {
                let meta = tokio::fs::metadata(path).await.map_err(map_io_error)?;
                if !meta.is_file() {
                    return Err(IngestError::read(format!(
                        "{} is not a regular file",
                        path.display()
                    )));
                }
                self.check_size(meta.len())?;
                let bytes = tokio::fs::read(path).await.map_err(map_io_error)?;
                engine_debug!("Loaded {} bytes from {}", bytes.len(), path.display());
                Ok(bytes.into())
            }
        }
    }
}

fn map_io_error(err: std::io::Error) -> IngestError {
    match err.kind() {
        ErrorKind::NotFound => IngestError::read("file not found"),
        ErrorKind::PermissionDenied => IngestError::read("permission denied"),
        _ => IngestError::read(err.to_string()),
    }
}
