//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [NewickParser] to parse Newick tree statements
//! into [Tree]s, the lazy [NewickTreeIter], and the registrable
//! [NewickFormat] with its [NewickReader] and [NewickWriter]. The parser is
//! also used for the tree statements of Nexus files.
//!
//! # Quick API
//! * [`parse_str`] - parses all trees of a string into a new namespace
//!
//! # Format
//! The Newick format has the following grammar:
//! * `tree ::= [rooting] [vertex] ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [label] [branch_length]`
//! * `leaf ::= [label] [branch_length]`
//! * `branch_length ::= ':' number`
//! * `rooting ::= '[&R]' | '[&U]'`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Comments are square brackets and can occur anywhere where whitespace is allowed
//! * Labels in single quotes are taken verbatim (`''` is an escaped quote);
//!   underscores in unquoted labels stand for spaces
//! * A bare `;` is an empty statement and holds no tree

mod defs;
pub mod format;
pub mod parser;
pub mod writer;

pub use format::{NewickFormat, NewickReader, NewickWriter};
pub use parser::{NewickParser, NewickTreeIter};
pub use writer::{NewickStyle, NewickWriteOptions, tree_to_newick, write_newick};

use crate::model::{TaxonNamespace, Tree};
use crate::parser::ByteParser;
use crate::parser::ParsingError;

/// Parses all Newick trees of `input` into a fresh [TaxonNamespace].
///
/// # Example
/// ```
/// let trees = phyloio::newick::parse_str("(A,B);\n(A,(B,C));").unwrap();
/// assert_eq!(trees.len(), 2);
/// assert!(trees[0].taxon_namespace().same_as(trees[1].taxon_namespace()));
/// ```
pub fn parse_str(input: &str) -> Result<Vec<Tree>, ParsingError> {
    NewickParser::new(TaxonNamespace::new()).parse_all(&mut ByteParser::for_str(input))
}
