//! Lazy tree streaming over one or several sources.
//!
//! Layers, from the format up:
//! * [RawTreeIter](crate::registry::RawTreeIter): one item per tree
//!   position as reported by the format,
//! * [TreeSourceIter]: offset skipping, progress reporting and out-of-range
//!   detection for one source,
//! * [MultiTreeSourceIter]: concatenation over several sources with
//!   per-source taxon namespaces and progress prefixes.
//!
//! The functions here mirror the methods of
//! [SchemaRegistry](crate::registry::SchemaRegistry).

pub mod multi_source;
pub mod source;
pub mod tree_source;

pub use multi_source::MultiTreeSourceIter;
pub use source::TreeSource;
pub use tree_source::TreeSourceIter;

use std::io::BufRead;

use crate::error::Result;
use crate::registry::{RawTreeIter, ReaderConfig, SchemaRegistry, StreamConfig};

/// See [SchemaRegistry::tree_source_iter_raw].
pub fn tree_source_iter_raw<'a, R: BufRead + 'a>(
    registry: &SchemaRegistry,
    stream: R,
    schema: &str,
    config: &ReaderConfig,
) -> Result<RawTreeIter<'a>> {
    registry.tree_source_iter_raw(stream, schema, config)
}

/// See [SchemaRegistry::tree_source_iter].
pub fn tree_source_iter<'a, R: BufRead + 'a>(
    registry: &SchemaRegistry,
    stream: R,
    schema: &str,
    config: StreamConfig,
) -> Result<TreeSourceIter<'a>> {
    registry.tree_source_iter(stream, schema, config)
}

/// See [SchemaRegistry::multi_tree_source_iter].
pub fn multi_tree_source_iter<'a, I>(
    registry: &SchemaRegistry,
    sources: I,
    schema: &str,
    config: StreamConfig,
) -> Result<MultiTreeSourceIter<'a>>
where
    I: IntoIterator<Item = TreeSource<'a>>,
{
    registry.multi_tree_source_iter(sources, schema, config)
}
