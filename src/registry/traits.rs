//! Capabilities a format can register: factories for readers, writers and
//! raw tree streams, plus the reader and writer contracts.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{DataIoError, Result};
use crate::model::{DataSet, Tree};
use crate::registry::config::{ReaderConfig, WriterConfig};

/// Lazy per-tree sequence produced by a format, one item per tree position
/// in file order. `Ok(None)` marks a position that holds no usable tree
/// (a malformed or intentionally skipped tree).
pub type RawTreeIter<'a> = Box<dyn Iterator<Item = Result<Option<Tree>>> + 'a>;

// =#========================================================================#=
// FACTORIES (Traits)
// =#========================================================================T=
/// Constructs [DataReader]s of one format.
pub trait ReaderFactory: Send + Sync {
    fn new_reader(&self, config: ReaderConfig) -> Result<Box<dyn DataReader>>;
}

/// Constructs [DataWriter]s of one format.
pub trait WriterFactory: Send + Sync {
    fn new_writer(&self, config: WriterConfig) -> Result<Box<dyn DataWriter>>;
}

/// Produces raw tree streams of one format.
pub trait TreeStreamFactory: Send + Sync {
    /// Returns a lazy sequence over the trees in `stream`.
    ///
    /// Nothing beyond what is needed to start may be read here; errors in
    /// the data surface as items of the sequence.
    fn tree_source_iter<'a>(
        &self,
        stream: Box<dyn BufRead + 'a>,
        config: &ReaderConfig,
    ) -> Result<RawTreeIter<'a>>;
}

/// Functions and closures with the right signature are reader factories.
impl<F> ReaderFactory for F
where
    F: Fn(ReaderConfig) -> Result<Box<dyn DataReader>> + Send + Sync,
{
    fn new_reader(&self, config: ReaderConfig) -> Result<Box<dyn DataReader>> {
        self(config)
    }
}

/// Functions and closures with the right signature are writer factories.
impl<F> WriterFactory for F
where
    F: Fn(WriterConfig) -> Result<Box<dyn DataWriter>> + Send + Sync,
{
    fn new_writer(&self, config: WriterConfig) -> Result<Box<dyn DataWriter>> {
        self(config)
    }
}

// =#========================================================================#=
// READER / WRITER (Traits)
// =#========================================================================T=
/// Reads a complete [DataSet] from a stream.
pub trait DataReader {
    /// Reads all data of the stream into a dataset.
    fn read(&mut self, stream: &mut dyn BufRead) -> Result<DataSet>;

    /// Opens the file at `path` and reads it.
    fn read_path(&mut self, path: &Path) -> Result<DataSet> {
        let file = File::open(path).map_err(|source| DataIoError::OpenSource {
            path: path.to_path_buf(),
            source,
        })?;
        self.read(&mut BufReader::new(file))
    }
}

/// Writes a [DataSet] to a sink.
pub trait DataWriter {
    /// The dataset given at construction, if any.
    fn default_dataset(&self) -> Option<&DataSet>;

    /// Writes `dataset` to `sink`.
    fn write_dataset(&self, dataset: &DataSet, sink: &mut dyn Write) -> Result<()>;

    /// Writes the dataset given at construction.
    ///
    /// # Errors
    /// [DataIoError::MissingDataSet] if the writer was built without one.
    fn write(&self, sink: &mut dyn Write) -> Result<()> {
        let dataset = self.default_dataset().ok_or(DataIoError::MissingDataSet)?;
        self.write_dataset(dataset, sink)
    }

    /// Creates (or truncates) the file at `path` and writes the dataset
    /// given at construction to it.
    fn write_path(&self, path: &Path) -> Result<()> {
        let mut sink = BufWriter::new(File::create(path)?);
        self.write(&mut sink)?;
        sink.flush()?;
        Ok(())
    }
}
