//! Where the bytes come from. Loading is the only step of the pipeline that waits.

use std::path::PathBuf;

use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::Error;

pub enum Source {
    Bytes(Vec<u8>),
    /// Text, encoded as UTF-8 before parsing.
    Text(String),
    /// Local file, read asynchronously.
    Path(PathBuf),
    /// Anything async-readable, read to the end before parsing starts.
    Reader(Box<dyn AsyncRead + Send + Unpin>),
}

impl Source {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }

    /// Resolves the source into the byte buffer handed to the parser.
    pub async fn load(self) -> Result<Vec<u8>, Error> {
        match self {
            Source::Bytes(bytes) => Ok(bytes),
            Source::Text(text) => Ok(text.into_bytes()),
            Source::Path(path) => {
                debug!("reading {}", path.display());
                Ok(tokio::fs::read(&path).await?)
            }
            Source::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes).await?;
                Ok(bytes)
            }
        }
    }
}

impl From<Vec<u8>> for Source {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for Source {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Source {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}
