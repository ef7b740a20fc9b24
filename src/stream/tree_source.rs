//! Offset and progress handling on top of a raw tree sequence.

use tracing::trace;

use crate::error::{DataIoError, Result};
use crate::model::Tree;
use crate::registry::{ProgressFn, RawTreeIter};

// =#========================================================================#=
// TREE SOURCE ITERATOR
// =#========================================================================$=
/// Trees of one source, starting at a given offset.
///
/// Pulls one raw item per call to the format's sequence and counts raw
/// positions (placeholders included) from 0:
/// * a tree at a position `>= tree_offset` is yielded and reported as
///   `"Processing tree at index {i}"`,
/// * a placeholder, or a tree before the offset, is dropped and reported as
///   `"Skipping tree at index {i}"`,
/// * an error is yielded once and ends the sequence.
///
/// If the source ends before any position after the offset was seen
/// (`tree_offset > 0` and at most `tree_offset` positions), a final
/// [DataIoError::OffsetOutOfRange] is yielded. Dropping the iterator early
/// never produces it.
pub struct TreeSourceIter<'a> {
    raw: RawTreeIter<'a>,
    tree_offset: usize,
    progress: Option<ProgressFn>,
    /// Raw positions consumed so far
    count: usize,
    finished: bool,
}

impl<'a> TreeSourceIter<'a> {
    /// Wraps a raw tree sequence.
    pub fn new(raw: RawTreeIter<'a>, tree_offset: usize, progress: Option<ProgressFn>) -> Self {
        Self {
            raw,
            tree_offset,
            progress,
            count: 0,
            finished: false,
        }
    }

    /// Number of raw tree positions consumed so far.
    pub fn positions_seen(&self) -> usize {
        self.count
    }

    fn report(&self, message: &str) {
        if let Some(progress) = &self.progress {
            progress(message);
        }
    }
}

impl Iterator for TreeSourceIter<'_> {
    type Item = Result<Tree>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.raw.next() {
                Some(Ok(Some(tree))) if self.count >= self.tree_offset => {
                    trace!(index = self.count, "Yielding tree");
                    self.report(&format!("Processing tree at index {}", self.count));
                    self.count += 1;
                    return Some(Ok(tree));
                }
                Some(Ok(_)) => {
                    trace!(index = self.count, "Skipping tree");
                    self.report(&format!("Skipping tree at index {}", self.count));
                    self.count += 1;
                }
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(err));
                }
                None => {
                    self.finished = true;
                    if self.tree_offset > 0 && self.count <= self.tree_offset {
                        return Some(Err(DataIoError::OffsetOutOfRange {
                            offset: self.tree_offset,
                            found: self.count,
                        }));
                    }
                    return None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaxonNamespace;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn named(name: &str) -> Tree {
        Tree::new(TaxonNamespace::new()).with_name(name)
    }

    fn raw(items: Vec<Result<Option<Tree>>>) -> RawTreeIter<'static> {
        Box::new(items.into_iter())
    }

    fn names(iter: TreeSourceIter<'_>) -> Vec<String> {
        iter.map(|t| t.unwrap().name().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_placeholders_occupy_positions() {
        let items = vec![
            Ok(Some(named("t0"))),
            Ok(None),
            Ok(Some(named("t2"))),
            Ok(None),
        ];
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        let progress: ProgressFn = Arc::new(move |m: &str| sink.lock().push(m.to_string()));

        let iter = TreeSourceIter::new(raw(items), 1, Some(progress));
        assert_eq!(names(iter), vec!["t2"]);
        assert_eq!(
            *messages.lock(),
            vec![
                "Skipping tree at index 0",
                "Skipping tree at index 1",
                "Processing tree at index 2",
                "Skipping tree at index 3",
            ]
        );
    }

    #[test]
    fn test_error_ends_sequence() {
        let items = vec![
            Ok(Some(named("t0"))),
            Err(DataIoError::MissingDataSet),
            Ok(Some(named("t2"))),
        ];
        let mut iter = TreeSourceIter::new(raw(items), 0, None);
        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(iter.next(), Some(Err(DataIoError::MissingDataSet))));
        assert!(iter.next().is_none());
        assert_eq!(iter.positions_seen(), 1);
    }

    #[test]
    fn test_offset_at_end_is_out_of_range() {
        let items = vec![Ok(Some(named("t0"))), Ok(Some(named("t1")))];
        let mut iter = TreeSourceIter::new(raw(items), 2, None);
        match iter.next() {
            Some(Err(DataIoError::OffsetOutOfRange { offset, found })) => {
                assert_eq!((offset, found), (2, 2));
            }
            other => panic!("expected out of range error, got {:?}", other.map(|r| r.is_ok())),
        }
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_zero_offset_on_empty_source() {
        let mut iter = TreeSourceIter::new(raw(Vec::new()), 0, None);
        assert!(iter.next().is_none());
    }
}
