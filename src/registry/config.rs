//! Configuration records handed to format factories and stream iterators.
//!
//! Each record has named fields for the options every format understands
//! and an extension bag of [FormatOption]s for format-specific settings.
//! Unknown extension options are passed through untouched; interpreting
//! them is up to the format.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::model::{DataSet, TaxonNamespace};

/// Keep underscores of unquoted labels instead of turning them into spaces
/// (Newick and Nexus readers).
pub const OPT_PRESERVE_UNDERSCORES: &str = "preserve_underscores";
/// Omit branch lengths when writing (Newick and Nexus writers).
pub const OPT_SUPPRESS_EDGE_LENGTHS: &str = "suppress_edge_lengths";
/// Omit labels of internal vertices when writing (Newick and Nexus writers).
pub const OPT_SUPPRESS_INTERNAL_LABELS: &str = "suppress_internal_labels";
/// Write a TRANSLATE command and refer to taxa by number (Nexus writer).
pub const OPT_TRANSLATE: &str = "translate";

/// Callback receiving progress messages of a tree stream.
pub type ProgressFn = Arc<dyn Fn(&str) + Send + Sync>;

// =#========================================================================#=
// FORMAT OPTION
// =#========================================================================$=
/// Value of a format-specific extension option.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatOption {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FormatOption {
    /// Returns the value if this is a [FormatOption::Bool].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormatOption::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the value if this is a [FormatOption::Int].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FormatOption::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value if this is a [FormatOption::Float] (or an Int).
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FormatOption::Float(f) => Some(*f),
            FormatOption::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the value if this is a [FormatOption::Text].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormatOption::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FormatOption {
    fn from(value: bool) -> Self {
        FormatOption::Bool(value)
    }
}

impl From<i64> for FormatOption {
    fn from(value: i64) -> Self {
        FormatOption::Int(value)
    }
}

impl From<f64> for FormatOption {
    fn from(value: f64) -> Self {
        FormatOption::Float(value)
    }
}

impl From<&str> for FormatOption {
    fn from(value: &str) -> Self {
        FormatOption::Text(value.to_string())
    }
}

impl From<String> for FormatOption {
    fn from(value: String) -> Self {
        FormatOption::Text(value)
    }
}

impl fmt::Display for FormatOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatOption::Bool(b) => write!(f, "{}", b),
            FormatOption::Int(i) => write!(f, "{}", i),
            FormatOption::Float(x) => write!(f, "{}", x),
            FormatOption::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Extension options by name.
pub type FormatOptions = BTreeMap<String, FormatOption>;

fn flag(options: &FormatOptions, key: &str, default: bool) -> bool {
    options
        .get(key)
        .and_then(FormatOption::as_bool)
        .unwrap_or(default)
}

// =#========================================================================#=
// READER CONFIG
// =#========================================================================$=
/// Configuration for readers and raw tree streams.
///
/// # Example
/// ```
/// use phyloio::model::TaxonNamespace;
/// use phyloio::registry::ReaderConfig;
///
/// let shared = TaxonNamespace::new();
/// let config = ReaderConfig::new()
///     .with_taxon_namespace(shared.clone())
///     .with_encode_splits(true)
///     .with_option("preserve_underscores", true);
/// assert!(config.preserve_underscores());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReaderConfig {
    /// Dataset to read into; a fresh one is used when `None`
    pub dataset: Option<DataSet>,
    /// Namespace to resolve all taxa into; a fresh one per source when `None`
    pub taxon_namespace: Option<TaxonNamespace>,
    /// Skip tree data
    pub exclude_trees: bool,
    /// Skip character data
    pub exclude_chars: bool,
    /// Compute splits of every tree read
    pub encode_splits: bool,
    /// Format-specific extension options
    pub options: FormatOptions,
}

impl ReaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, dataset: DataSet) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn with_taxon_namespace(mut self, taxon_namespace: TaxonNamespace) -> Self {
        self.taxon_namespace = Some(taxon_namespace);
        self
    }

    pub fn with_exclude_trees(mut self, exclude_trees: bool) -> Self {
        self.exclude_trees = exclude_trees;
        self
    }

    pub fn with_exclude_chars(mut self, exclude_chars: bool) -> Self {
        self.exclude_chars = exclude_chars;
        self
    }

    pub fn with_encode_splits(mut self, encode_splits: bool) -> Self {
        self.encode_splits = encode_splits;
        self
    }

    /// Sets an extension option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<FormatOption>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Returns the extension option with the given key.
    pub fn option(&self, key: &str) -> Option<&FormatOption> {
        self.options.get(key)
    }

    /// Value of [OPT_PRESERVE_UNDERSCORES], default `false`.
    pub fn preserve_underscores(&self) -> bool {
        flag(&self.options, OPT_PRESERVE_UNDERSCORES, false)
    }

    /// The configured namespace, or a new one.
    pub fn taxon_namespace_or_new(&self) -> TaxonNamespace {
        self.taxon_namespace.clone().unwrap_or_default()
    }
}

// =#========================================================================#=
// WRITER CONFIG
// =#========================================================================$=
/// Configuration for writers.
#[derive(Debug, Clone, Default)]
pub struct WriterConfig {
    /// Dataset written by [DataWriter::write](crate::registry::DataWriter::write)
    pub dataset: Option<DataSet>,
    /// Do not write tree data
    pub exclude_trees: bool,
    /// Do not write character data
    pub exclude_chars: bool,
    /// Format-specific extension options
    pub options: FormatOptions,
}

impl WriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, dataset: DataSet) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn with_exclude_trees(mut self, exclude_trees: bool) -> Self {
        self.exclude_trees = exclude_trees;
        self
    }

    pub fn with_exclude_chars(mut self, exclude_chars: bool) -> Self {
        self.exclude_chars = exclude_chars;
        self
    }

    /// Sets an extension option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<FormatOption>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Returns the extension option with the given key.
    pub fn option(&self, key: &str) -> Option<&FormatOption> {
        self.options.get(key)
    }

    /// Value of [OPT_SUPPRESS_EDGE_LENGTHS], default `false`.
    pub fn suppress_edge_lengths(&self) -> bool {
        flag(&self.options, OPT_SUPPRESS_EDGE_LENGTHS, false)
    }

    /// Value of [OPT_SUPPRESS_INTERNAL_LABELS], default `false`.
    pub fn suppress_internal_labels(&self) -> bool {
        flag(&self.options, OPT_SUPPRESS_INTERNAL_LABELS, false)
    }

    /// Value of [OPT_TRANSLATE], default `true`.
    pub fn translate(&self) -> bool {
        flag(&self.options, OPT_TRANSLATE, true)
    }
}

// =#========================================================================#=
// STREAM CONFIG
// =#========================================================================$=
/// Configuration for [tree_source_iter](crate::registry::SchemaRegistry::tree_source_iter)
/// and [multi_tree_source_iter](crate::registry::SchemaRegistry::multi_tree_source_iter).
///
/// `tree_offset` and `progress` are consumed by the stream layer; only
/// `reader` is passed on to the format.
#[derive(Clone, Default)]
pub struct StreamConfig {
    /// 0-based index of the first tree to yield (per source)
    pub tree_offset: usize,
    /// Receives a message for every tree position processed or skipped
    pub progress: Option<ProgressFn>,
    /// Configuration forwarded to the format
    pub reader: ReaderConfig,
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tree_offset(mut self, tree_offset: usize) -> Self {
        self.tree_offset = tree_offset;
        self
    }

    /// Sets the progress callback.
    pub fn with_progress<F>(mut self, progress: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(progress));
        self
    }

    pub fn with_reader_config(mut self, reader: ReaderConfig) -> Self {
        self.reader = reader;
        self
    }
}

impl fmt::Debug for StreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamConfig")
            .field("tree_offset", &self.tree_offset)
            .field("progress", &self.progress.as_ref().map(|_| "Fn(&str)"))
            .field("reader", &self.reader)
            .finish()
    }
}
