//! Nexus reader, writer and the registrable [NexusFormat].

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{DataIoError, Result};
use crate::model::{DataSet, TaxonNamespace, TreeList};
use crate::newick::NewickParser;
use crate::nexus::parser::{NexusEvent, NexusTreeIter};
use crate::nexus::writer::{NexusWriteOptions, write_nexus};
use crate::parser::ByteParser;
use crate::registry::{
    DataReader, DataWriter, RawTreeIter, ReaderConfig, ReaderFactory, TreeStreamFactory,
    WriterConfig, WriterFactory,
};

fn configured_parser(config: &ReaderConfig, taxon_namespace: TaxonNamespace) -> NewickParser {
    NewickParser::new(taxon_namespace)
        .with_preserve_underscores(config.preserve_underscores())
        .with_encode_splits(config.encode_splits)
}

// =#========================================================================#=
// NEXUS READER
// =#========================================================================$=
/// Reads a NEXUS stream into a [DataSet] with one [TreeList] per `TREES`
/// block. All taxa go into a single namespace per stream.
#[derive(Debug, Clone)]
pub struct NexusReader {
    config: ReaderConfig,
}

impl NexusReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }
}

impl DataReader for NexusReader {
    fn read(&mut self, stream: &mut dyn BufRead) -> Result<DataSet> {
        let mut dataset = self.config.dataset.clone().unwrap_or_default();
        let taxa = self.config.taxon_namespace_or_new();
        dataset.add_taxon_namespace(taxa.clone());

        let mut iter = NexusTreeIter::new(
            ByteParser::for_reader(stream),
            configured_parser(&self.config, taxa.clone()),
        )
        .with_skip_trees(self.config.exclude_trees);

        let mut current: Option<TreeList> = None;
        while let Some(event) = iter.next_event()? {
            match event {
                NexusEvent::TreesBlock => {
                    if let Some(tree_list) = current.replace(TreeList::new(taxa.clone())) {
                        dataset.add_tree_list(tree_list);
                    }
                }
                NexusEvent::Tree(Some(tree)) => {
                    if let Some(tree_list) = current.as_mut() {
                        tree_list.push(tree);
                    }
                }
                NexusEvent::Tree(None) => {}
            }
        }
        if let Some(tree_list) = current {
            dataset.add_tree_list(tree_list);
        }

        debug!(
            taxa = taxa.len(),
            tree_lists = dataset.tree_lists().len(),
            "Read Nexus data"
        );
        Ok(dataset)
    }
}

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================$=
/// Writes a [DataSet] as a NEXUS file with `TAXA` and `TREES` blocks.
#[derive(Debug, Clone)]
pub struct NexusWriter {
    config: WriterConfig,
}

impl NexusWriter {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    fn write_options(&self) -> NexusWriteOptions {
        NexusWriteOptions::default()
            .with_translate(self.config.translate())
            .with_edge_lengths(!self.config.suppress_edge_lengths())
            .with_internal_labels(!self.config.suppress_internal_labels())
    }
}

impl DataWriter for NexusWriter {
    fn default_dataset(&self) -> Option<&DataSet> {
        self.config.dataset.as_ref()
    }

    fn write_dataset(&self, dataset: &DataSet, sink: &mut dyn Write) -> Result<()> {
        if self.config.exclude_trees {
            let mut taxa_only = DataSet::new();
            for taxon_namespace in dataset.taxon_namespaces() {
                taxa_only.add_taxon_namespace(taxon_namespace.clone());
            }
            write_nexus(sink, &taxa_only, &self.write_options())?;
        } else {
            write_nexus(sink, dataset, &self.write_options())?;
        }
        Ok(())
    }
}

// =#========================================================================#=
// NEXUS FORMAT
// =#========================================================================$=
/// The Nexus format with all three registry capabilities.
#[derive(Debug, Clone, Copy, Default)]
pub struct NexusFormat;

impl ReaderFactory for NexusFormat {
    fn new_reader(&self, config: ReaderConfig) -> Result<Box<dyn DataReader>> {
        Ok(Box::new(NexusReader::new(config)))
    }
}

impl WriterFactory for NexusFormat {
    fn new_writer(&self, config: WriterConfig) -> Result<Box<dyn DataWriter>> {
        Ok(Box::new(NexusWriter::new(config)))
    }
}

impl TreeStreamFactory for NexusFormat {
    fn tree_source_iter<'a>(
        &self,
        stream: Box<dyn BufRead + 'a>,
        config: &ReaderConfig,
    ) -> Result<RawTreeIter<'a>> {
        let parser = configured_parser(config, config.taxon_namespace_or_new());
        let iter = NexusTreeIter::new(ByteParser::for_reader(stream), parser);
        Ok(Box::new(iter.map(|item| item.map_err(DataIoError::from))))
    }
}
