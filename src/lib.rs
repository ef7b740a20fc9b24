//! Phyloio is a library to read, write and stream phylogenetic trees
//! through a registry of data formats.
//!
//! This crate decouples code working with taxa, trees and datasets from
//! the format-specific parsers and writers. Core functionality provided:
//! - Schema registry: [SchemaRegistry] maps format identifiers such as
//!   `"newick"` or `"nexus"` to reader, writer and tree stream factories.
//!   Lookups of unknown formats or capabilities fail right away with
//!   [DataIoError::UnsupportedFormat].
//! - Tree streaming: [TreeSourceIter] lazily yields the trees of a source,
//!   optionally starting at a tree offset and reporting progress;
//!   [MultiTreeSourceIter] concatenates several sources (open streams or
//!   paths), each with its own taxon namespace unless a shared one is
//!   configured.
//! - Data model: [TaxonNamespace], [Tree] (arena of vertices with
//!   arbitrary arity, branch lengths and split bitmasks) and [DataSet].
//! - Formats: Newick and Nexus readers, writers and lazy tree parsers,
//!   registered by [SchemaRegistry::with_builtin_formats].
//!
//! Limitations:
//! - Only taxa and trees are modelled; character blocks are skipped
//! - No logging subscriber is installed; events are emitted via `tracing`
//!
//! # Usage patterns
//! 1. Use the [default_registry] with the built-in formats.
//! 2. Build an own [SchemaRegistry] and register further formats with
//!    [SchemaRegistry::register] or [SchemaRegistry::register_format].
//!
//! ## Example Streaming
//! ```
//! use phyloio::{StreamConfig, TreeSource, default_registry};
//!
//! let burnin = "(A,B);\n".as_bytes();
//! let sample = "((A,B),C);\n(A,(B,C));\n".as_bytes();
//! let sources = vec![TreeSource::reader(burnin), TreeSource::reader(sample)];
//!
//! let trees = default_registry()
//!     .multi_tree_source_iter(sources, "newick", StreamConfig::new())
//!     .unwrap()
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! assert_eq!(trees.len(), 3);
//! assert!(!trees[0].taxon_namespace().same_as(trees[1].taxon_namespace()));
//! ```
//!
//! ## Example Reading & Writing
//! ```
//! use phyloio::{ReaderConfig, WriterConfig, default_registry};
//!
//! let nexus = "#NEXUS
//! BEGIN TREES;
//!     TREE rails = [&R] ((Pukeko:1,Takahe:1):2,Weka:3);
//! END;";
//! let dataset = default_registry()
//!     .get_reader("nexus", ReaderConfig::new())
//!     .unwrap()
//!     .read(&mut nexus.as_bytes())
//!     .unwrap();
//! assert_eq!(dataset.num_trees(), 1);
//!
//! let mut out = Vec::new();
//! default_registry()
//!     .get_writer("newick", WriterConfig::new())
//!     .unwrap()
//!     .write_dataset(&dataset, &mut out)
//!     .unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "[&R] ((Pukeko:1,Takahe:1):2,Weka:3);\n");
//! ```

pub mod error;
pub mod model;
pub mod newick;
pub mod nexus;
pub mod parser;
pub mod registry;
pub mod stream;

pub use crate::error::{DataIoError, Result};
pub use crate::model::{DataSet, TaxonNamespace, Tree, TreeList};
pub use crate::parser::ParsingError;
pub use crate::registry::{
    DuplicatePolicy, Operation, ReaderConfig, SchemaRegistry, StreamConfig, WriterConfig,
    default_registry,
};
pub use crate::stream::{MultiTreeSourceIter, TreeSource, TreeSourceIter};
