//! Inputs of the multi-source tree iterator.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DataIoError, Result};

/// One input of a [MultiTreeSourceIter](crate::stream::MultiTreeSourceIter).
///
/// A `Reader` is used as given; pass `&mut reader` to keep ownership of a
/// stream. A `Path` is opened only when the iterator reaches it and is
/// closed when the iterator moves on or is dropped.
pub enum TreeSource<'a> {
    Reader(Box<dyn BufRead + 'a>),
    Path(PathBuf),
}

impl<'a> TreeSource<'a> {
    /// Source reading from an open stream.
    pub fn reader<R: BufRead + 'a>(reader: R) -> Self {
        TreeSource::Reader(Box::new(reader))
    }

    /// Source reading from the file at `path`.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        TreeSource::Path(path.into())
    }

    /// Turns this source into a readable stream, opening files.
    ///
    /// # Errors
    /// [DataIoError::OpenSource] if the file cannot be opened.
    pub(crate) fn open(self) -> Result<Box<dyn BufRead + 'a>> {
        match self {
            TreeSource::Reader(reader) => Ok(reader),
            TreeSource::Path(path) => {
                debug!(path = %path.display(), "Opening tree source");
                match File::open(&path) {
                    Ok(file) => Ok(Box::new(BufReader::new(file))),
                    Err(source) => Err(DataIoError::OpenSource { path, source }),
                }
            }
        }
    }
}

impl From<PathBuf> for TreeSource<'_> {
    fn from(path: PathBuf) -> Self {
        TreeSource::Path(path)
    }
}

impl From<&Path> for TreeSource<'_> {
    fn from(path: &Path) -> Self {
        TreeSource::Path(path.to_path_buf())
    }
}

impl fmt::Debug for TreeSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeSource::Reader(_) => f.write_str("TreeSource::Reader(..)"),
            TreeSource::Path(path) => f.debug_tuple("TreeSource::Path").field(path).finish(),
        }
    }
}
