//! Stub formats shared by the integration tests.
#![allow(dead_code)]

use std::io::{BufRead, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use phyloio::model::{DataSet, TaxonNamespace, Tree, TreeList};
use phyloio::registry::{
    DataReader, DataWriter, RawTreeIter, ReaderConfig, ReaderFactory, TreeStreamFactory,
    WriterConfig, WriterFactory,
};
use phyloio::{DataIoError, Result};

/// Path of a file in `tests/fixtures/`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Builds a star tree named `name` with one leaf per label.
pub fn star_tree(name: &str, labels: &[&str], taxa: &TaxonNamespace) -> Tree {
    let mut tree = Tree::new(taxa.clone()).with_name(name);
    let leaves = labels
        .iter()
        .map(|label| tree.add_leaf(Some(taxa.require_taxon(label)), None))
        .collect();
    let root = tree.add_internal(leaves, None, None);
    tree.set_root(root);
    tree
}

/// Parses one line of the "lines" stub format:
/// * `name: A B C` - a star tree named `name` over taxa A, B, C
/// * `-` - a placeholder
/// * `!` - a format error
fn parse_line(line: &str, taxa: &TaxonNamespace) -> Result<Option<Tree>> {
    match line.trim() {
        "-" => Ok(None),
        "!" => Err(DataIoError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "bad tree line",
        ))),
        line => {
            let (name, labels) = line.split_once(':').unwrap_or((line, ""));
            let labels: Vec<&str> = labels.split_whitespace().collect();
            Ok(Some(star_tree(name.trim(), &labels, taxa)))
        }
    }
}

// =#========================================================================#=
// LINES FORMAT (one tree per non-empty line)
// =#========================================================================$=
#[derive(Debug, Clone, Copy, Default)]
pub struct LinesFormat;

impl TreeStreamFactory for LinesFormat {
    fn tree_source_iter<'a>(
        &self,
        stream: Box<dyn BufRead + 'a>,
        config: &ReaderConfig,
    ) -> Result<RawTreeIter<'a>> {
        let taxa = config.taxon_namespace_or_new();
        Ok(Box::new(
            stream
                .lines()
                .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
                .map(move |line| parse_line(&line?, &taxa)),
        ))
    }
}

pub struct LinesReader {
    config: ReaderConfig,
}

impl DataReader for LinesReader {
    fn read(&mut self, stream: &mut dyn BufRead) -> Result<DataSet> {
        let taxa = self.config.taxon_namespace_or_new();
        let mut list = TreeList::new(taxa.clone()).with_label("lines");
        let mut content = String::new();
        stream.read_to_string(&mut content)?;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            if let Some(tree) = parse_line(line, &taxa)? {
                list.push(tree);
            }
        }
        let mut dataset = DataSet::new();
        dataset.add_tree_list(list);
        Ok(dataset)
    }
}

impl ReaderFactory for LinesFormat {
    fn new_reader(&self, config: ReaderConfig) -> Result<Box<dyn DataReader>> {
        Ok(Box::new(LinesReader { config }))
    }
}

pub struct LinesWriter {
    config: WriterConfig,
}

impl DataWriter for LinesWriter {
    fn default_dataset(&self) -> Option<&DataSet> {
        self.config.dataset.as_ref()
    }

    fn write_dataset(&self, dataset: &DataSet, sink: &mut dyn Write) -> Result<()> {
        for tree in dataset.trees() {
            writeln!(
                sink,
                "{}: {}",
                tree.name().unwrap_or_default(),
                tree.leaf_labels().join(" ")
            )?;
        }
        Ok(())
    }
}

impl WriterFactory for LinesFormat {
    fn new_writer(&self, config: WriterConfig) -> Result<Box<dyn DataWriter>> {
        Ok(Box::new(LinesWriter { config }))
    }
}

// =#========================================================================#=
// COUNTING FORMAT (infinite, counts pulled items)
// =#========================================================================$=
/// Stream format producing an endless sequence of trees `t0, t1, ...`,
/// ignoring the stream and counting how many items were pulled.
#[derive(Debug, Clone, Default)]
pub struct CountingFormat {
    pub pulled: Arc<AtomicUsize>,
}

impl CountingFormat {
    pub fn pulled(&self) -> usize {
        self.pulled.load(Ordering::SeqCst)
    }
}

impl TreeStreamFactory for CountingFormat {
    fn tree_source_iter<'a>(
        &self,
        _stream: Box<dyn BufRead + 'a>,
        config: &ReaderConfig,
    ) -> Result<RawTreeIter<'a>> {
        let taxa = config.taxon_namespace_or_new();
        let pulled = Arc::clone(&self.pulled);
        Ok(Box::new((0..).map(move |i: usize| -> Result<Option<Tree>> {
            pulled.fetch_add(1, Ordering::SeqCst);
            Ok(Some(star_tree(&format!("t{i}"), &["A", "B"], &taxa)))
        })))
    }
}

/// Collects the names of trees, panicking on errors.
pub fn names<I: Iterator<Item = Result<Tree>>>(iter: I) -> Vec<String> {
    iter.map(|tree| tree.unwrap().name().unwrap_or_default().to_string())
        .collect()
}
