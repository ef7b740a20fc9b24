//! Concatenated tree streams over several sources.

use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::model::{TaxonNamespace, Tree};
use crate::registry::{ProgressFn, StreamConfig, TreeStreamFactory};
use crate::stream::source::TreeSource;
use crate::stream::tree_source::TreeSourceIter;

// =#========================================================================#=
// MULTI TREE SOURCE ITERATOR
// =#========================================================================$=
/// Trees of several sources, one source after the other.
///
/// Each source is turned into a [TreeSourceIter] with the same offset and
/// reader configuration once the previous one is exhausted, so files are
/// opened lazily and at most one is open at a time.
///
/// * Unless the reader configuration has a shared taxon namespace, every
///   source gets a fresh one.
/// * Progress messages are prefixed with `"Tree source {i} of {n}: "`.
/// * The first error (including a failure to open a path) is yielded and
///   ends the whole sequence.
pub struct MultiTreeSourceIter<'a> {
    factory: Arc<dyn TreeStreamFactory>,
    sources: std::vec::IntoIter<TreeSource<'a>>,
    num_sources: usize,
    /// 1-based index of the current source; 0 before the first
    source_index: usize,
    config: StreamConfig,
    current: Option<TreeSourceIter<'a>>,
    finished: bool,
}

impl<'a> MultiTreeSourceIter<'a> {
    pub(crate) fn new(
        factory: Arc<dyn TreeStreamFactory>,
        sources: Vec<TreeSource<'a>>,
        config: StreamConfig,
    ) -> Self {
        Self {
            factory,
            num_sources: sources.len(),
            sources: sources.into_iter(),
            source_index: 0,
            config,
            current: None,
            finished: false,
        }
    }

    /// 1-based index of the source currently read, 0 before the first.
    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Total number of sources.
    pub fn num_sources(&self) -> usize {
        self.num_sources
    }

    fn open_next(&mut self, source: TreeSource<'a>) -> Result<TreeSourceIter<'a>> {
        self.source_index += 1;
        debug!(
            source = self.source_index,
            of = self.num_sources,
            "Starting tree source"
        );

        let stream = source.open()?;

        let mut reader = self.config.reader.clone();
        if reader.taxon_namespace.is_none() {
            reader.taxon_namespace = Some(TaxonNamespace::new());
        }

        let progress = self.config.progress.as_ref().map(|parent| {
            let parent = Arc::clone(parent);
            let prefix = format!(
                "Tree source {} of {}: ",
                self.source_index, self.num_sources
            );
            Arc::new(move |message: &str| parent(&format!("{}{}", prefix, message))) as ProgressFn
        });

        let raw = self.factory.tree_source_iter(stream, &reader)?;
        Ok(TreeSourceIter::new(raw, self.config.tree_offset, progress))
    }
}

impl Iterator for MultiTreeSourceIter<'_> {
    type Item = Result<Tree>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }

            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(Ok(tree)) => return Some(Ok(tree)),
                    Some(Err(err)) => {
                        self.finished = true;
                        self.current = None;
                        return Some(Err(err));
                    }
                    None => {
                        debug!(source = self.source_index, "Tree source exhausted");
                        self.current = None;
                    }
                }
            }

            match self.sources.next() {
                None => self.finished = true,
                Some(source) => match self.open_next(source) {
                    Ok(iter) => self.current = Some(iter),
                    Err(err) => {
                        self.finished = true;
                        return Some(Err(err));
                    }
                },
            }
        }
    }
}
