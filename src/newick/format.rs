//! Newick reader, writer and the registrable [NewickFormat].

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{DataIoError, Result};
use crate::model::{DataSet, TaxonNamespace, TreeList};
use crate::newick::parser::{NewickParser, NewickTreeIter};
use crate::newick::writer::{NewickWriteOptions, write_newick};
use crate::parser::ByteParser;
use crate::registry::{
    DataReader, DataWriter, RawTreeIter, ReaderConfig, ReaderFactory, TreeStreamFactory,
    WriterConfig, WriterFactory,
};

/// Builds the parser a reader configuration asks for.
fn configured_parser(config: &ReaderConfig, taxon_namespace: TaxonNamespace) -> NewickParser {
    NewickParser::new(taxon_namespace)
        .with_preserve_underscores(config.preserve_underscores())
        .with_encode_splits(config.encode_splits)
}

// =#========================================================================#=
// NEWICK READER
// =#========================================================================$=
/// Reads a stream of Newick statements into a [DataSet] with one
/// [TreeList]. Empty statements are dropped.
#[derive(Debug, Clone)]
pub struct NewickReader {
    config: ReaderConfig,
}

impl NewickReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }
}

impl DataReader for NewickReader {
    fn read(&mut self, stream: &mut dyn BufRead) -> Result<DataSet> {
        let mut dataset = self.config.dataset.clone().unwrap_or_default();
        let taxa = self.config.taxon_namespace_or_new();
        dataset.add_taxon_namespace(taxa.clone());

        if self.config.exclude_trees {
            return Ok(dataset);
        }

        let parser = configured_parser(&self.config, taxa.clone());
        let mut tree_list = TreeList::new(taxa);
        for item in NewickTreeIter::new(ByteParser::for_reader(stream), parser) {
            if let Some(tree) = item? {
                tree_list.push(tree);
            }
        }

        debug!(trees = tree_list.len(), "Read Newick tree list");
        dataset.add_tree_list(tree_list);
        Ok(dataset)
    }
}

// =#========================================================================#=
// NEWICK WRITER
// =#========================================================================$=
/// Writes all trees of a [DataSet] as Newick statements, one per line,
/// prefixed with `[&R]`/`[&U]` where the rooting is known.
#[derive(Debug, Clone)]
pub struct NewickWriter {
    config: WriterConfig,
}

impl NewickWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    fn write_options(&self) -> NewickWriteOptions {
        NewickWriteOptions::default()
            .with_edge_lengths(!self.config.suppress_edge_lengths())
            .with_internal_labels(!self.config.suppress_internal_labels())
            .with_rooting_comment(true)
    }
}

impl DataWriter for NewickWriter {
    fn default_dataset(&self) -> Option<&DataSet> {
        self.config.dataset.as_ref()
    }

    fn write_dataset(&self, dataset: &DataSet, sink: &mut dyn Write) -> Result<()> {
        if self.config.exclude_trees {
            return Ok(());
        }
        write_newick(sink, dataset.trees(), &self.write_options())?;
        Ok(())
    }
}

// =#========================================================================#=
// NEWICK FORMAT
// =#========================================================================$=
/// The Newick format with all three registry capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewickFormat;

impl ReaderFactory for NewickFormat {
    fn new_reader(&self, config: ReaderConfig) -> Result<Box<dyn DataReader>> {
        Ok(Box::new(NewickReader::new(config)))
    }
}

impl WriterFactory for NewickFormat {
    fn new_writer(&self, config: WriterConfig) -> Result<Box<dyn DataWriter>> {
        Ok(Box::new(NewickWriter::new(config)))
    }
}

impl TreeStreamFactory for NewickFormat {
    fn tree_source_iter<'a>(
        &self,
        stream: Box<dyn BufRead + 'a>,
        config: &ReaderConfig,
    ) -> Result<RawTreeIter<'a>> {
        let parser = configured_parser(config, config.taxon_namespace_or_new());
        let iter = NewickTreeIter::new(ByteParser::for_reader(stream), parser);
        Ok(Box::new(iter.map(|item| item.map_err(DataIoError::from))))
    }
}
