//! NEXUS format parser and writer for phylogenetic trees.
//!
//! This module provides the lazy [NexusTreeIter], the [write_nexus]
//! function, and the registrable [NexusFormat] with its [NexusReader] and
//! [NexusWriter].
//!
//! # Quick API
//! * [`parse_str`] - parses all trees of a NEXUS string into a new namespace
//!
//! # Format
//! A NEXUS file starts with `#NEXUS` and consists of blocks
//! `BEGIN <name>; <commands> END;` (or `ENDBLOCK;`). Keywords are
//! case-insensitive and comments in square brackets may occur between
//! tokens. Handled are:
//! * `TAXA` blocks with `DIMENSIONS NTAX=<n>;` and `TAXLABELS <label>*;`;
//!   all labels go into one namespace, in order of appearance
//! * `TREES` blocks with
//!   - `TRANSLATE <key> <label>, ...;` mapping tokens of tree statements
//!     to taxa until the end of the block
//!   - `TREE [*] <name> = [&R|&U] <newick>;` (and `UTREE`, unrooted)
//! * all other blocks (e.g. `DATA`, `CHARACTERS`, `ASSUMPTIONS`) are skipped
//!
//! Labels follow the Newick rules: single-quoted labels are verbatim with
//! `''` as an escaped quote, and underscores in unquoted labels (and
//! translate keys) stand for spaces.

mod defs;
pub mod format;
pub mod parser;
pub mod writer;

pub use defs::NexusBlock;
pub use format::{NexusFormat, NexusReader, NexusWriter};
pub use parser::NexusTreeIter;
pub use writer::{NexusWriteOptions, write_nexus};

use crate::model::{TaxonNamespace, Tree};
use crate::newick::NewickParser;
use crate::parser::ByteParser;
use crate::parser::ParsingError;

/// Parses all trees of the NEXUS string `input` into a fresh
/// [TaxonNamespace]; `TREE` commands without tree are dropped.
///
/// # Example
/// ```
/// let input = "#NEXUS
/// BEGIN TAXA; TAXLABELS Kea Kaka; END;
/// BEGIN TREES; TREE t1 = (Kea,Kaka); TREE t2 = (Kaka,Kea); END;";
/// let trees = phyloio::nexus::parse_str(input).unwrap();
/// assert_eq!(trees.len(), 2);
/// assert_eq!(trees[1].leaf_labels(), vec!["Kaka", "Kea"]);
/// assert_eq!(trees[0].taxon_namespace().labels(), vec!["Kea", "Kaka"]);
/// ```
pub fn parse_str(input: &str) -> Result<Vec<Tree>, ParsingError> {
    let parser = NewickParser::new(TaxonNamespace::new());
    NexusTreeIter::new(ByteParser::for_str(input), parser)
        .filter_map(Result::transpose)
        .collect()
}
