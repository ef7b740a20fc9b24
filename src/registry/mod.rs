//! Schema registry: maps format identifiers to format capabilities.
//!
//! A [SchemaRegistry] decouples generic consumers of datasets and trees
//! from format-specific code. Formats register up to three capabilities
//! under an identifier such as `"newick"`:
//! * a [ReaderFactory] building [DataReader]s,
//! * a [WriterFactory] building [DataWriter]s,
//! * a [TreeStreamFactory] producing lazy raw tree sequences.
//!
//! Consumers then ask the registry for a reader, writer or tree stream by
//! identifier and get [DataIoError::UnsupportedFormat] right away if the
//! format or capability is unknown.
//!
//! # Example
//! ```
//! use phyloio::registry::{SchemaRegistry, StreamConfig};
//!
//! let registry = SchemaRegistry::with_builtin_formats();
//! let data = "(A,B);\n((A,B),C);\n".as_bytes();
//! let trees: Vec<_> = registry
//!     .tree_source_iter(data, "newick", StreamConfig::new().with_tree_offset(1))
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(trees.len(), 1);
//! assert_eq!(trees[0].num_leaves(), 3);
//! ```

pub mod config;
pub mod traits;

pub use config::{
    FormatOption, FormatOptions, OPT_PRESERVE_UNDERSCORES, OPT_SUPPRESS_EDGE_LENGTHS,
    OPT_SUPPRESS_INTERNAL_LABELS, OPT_TRANSLATE, ProgressFn, ReaderConfig, StreamConfig,
    WriterConfig,
};
pub use traits::{
    DataReader, DataWriter, RawTreeIter, ReaderFactory, TreeStreamFactory, WriterFactory,
};

use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::error::{DataIoError, Result};
use crate::newick::NewickFormat;
use crate::nexus::NexusFormat;
use crate::stream::{MultiTreeSourceIter, TreeSource, TreeSourceIter};

/// Identifier of the built-in Newick format.
pub const NEWICK: &str = "newick";
/// Identifier of the built-in Nexus format.
pub const NEXUS: &str = "nexus";

// =#========================================================================#=
// OPERATION & POLICY
// =#========================================================================$=
/// Capability requested from a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
    TreeStream,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read => write!(f, "reading"),
            Operation::Write => write!(f, "writing"),
            Operation::TreeStream => write!(f, "tree streaming"),
        }
    }
}

/// What [SchemaRegistry::register] does with an identifier that is already
/// registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Replace the existing entry (last registration wins).
    #[default]
    Overwrite,
    /// Keep the existing entry and fail with [DataIoError::DuplicateSchema].
    Reject,
}

// =#========================================================================#=
// SCHEMA ENTRY
// =#========================================================================$=
/// Capabilities registered for one format; each may be absent.
#[derive(Clone, Default)]
pub struct SchemaEntry {
    pub reader: Option<Arc<dyn ReaderFactory>>,
    pub writer: Option<Arc<dyn WriterFactory>>,
    pub tree_stream: Option<Arc<dyn TreeStreamFactory>>,
}

impl SchemaEntry {
    /// Returns whether the capability is present.
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::Read => self.reader.is_some(),
            Operation::Write => self.writer.is_some(),
            Operation::TreeStream => self.tree_stream.is_some(),
        }
    }
}

impl fmt::Debug for SchemaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaEntry")
            .field("reader", &self.reader.is_some())
            .field("writer", &self.writer.is_some())
            .field("tree_stream", &self.tree_stream.is_some())
            .finish()
    }
}

// =#========================================================================#=
// SCHEMA REGISTRY
// =#========================================================================$=
/// Lookup and dispatch of format capabilities by identifier.
///
/// Identifiers are case-sensitive and used as given. Registration needs
/// `&mut self`; lookups only `&self`, so a fully set up registry can be
/// shared between threads.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: HashMap<String, SchemaEntry>,
    duplicate_policy: DuplicatePolicy,
}

impl SchemaRegistry {
    /// Creates an empty registry with [DuplicatePolicy::Overwrite].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in `"newick"` and `"nexus"` formats.
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_formats();
        registry
    }

    /// Sets the policy for re-registering an identifier.
    pub fn with_duplicate_policy(mut self, duplicate_policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = duplicate_policy;
        self
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    fn register_builtin_formats(&mut self) {
        for (schema, entry) in [
            (NEWICK, SchemaEntry::from_format(NewickFormat)),
            (NEXUS, SchemaEntry::from_format(NexusFormat)),
        ] {
            self.entries.insert(schema.to_string(), entry);
        }
    }

    // ========================================================================
    // Registration
    // ========================================================================
    /// Registers the given capabilities under `schema`.
    ///
    /// No factory is invoked or validated here.
    ///
    /// # Errors
    /// * [DataIoError::EmptySchema] if `schema` is empty
    /// * [DataIoError::DuplicateSchema] if `schema` is taken and the policy
    ///   is [DuplicatePolicy::Reject]
    pub fn register(
        &mut self,
        schema: &str,
        reader: Option<Arc<dyn ReaderFactory>>,
        writer: Option<Arc<dyn WriterFactory>>,
        tree_stream: Option<Arc<dyn TreeStreamFactory>>,
    ) -> Result<()> {
        self.insert(
            schema,
            SchemaEntry {
                reader,
                writer,
                tree_stream,
            },
        )
    }

    /// Registers one value providing all three capabilities.
    pub fn register_format<F>(&mut self, schema: &str, format: F) -> Result<()>
    where
        F: ReaderFactory + WriterFactory + TreeStreamFactory + 'static,
    {
        self.insert(schema, SchemaEntry::from_format(format))
    }

    fn insert(&mut self, schema: &str, entry: SchemaEntry) -> Result<()> {
        if schema.is_empty() {
            return Err(DataIoError::EmptySchema);
        }

        if self.entries.contains_key(schema) {
            match self.duplicate_policy {
                DuplicatePolicy::Reject => {
                    debug!(schema, "Rejecting duplicate format registration");
                    return Err(DataIoError::DuplicateSchema(schema.to_string()));
                }
                DuplicatePolicy::Overwrite => {
                    warn!(schema, "Overwriting registered format");
                }
            }
        }

        debug!(schema, ?entry, "Registering format");
        self.entries.insert(schema.to_string(), entry);
        Ok(())
    }

    // ========================================================================
    // Lookup
    // ========================================================================
    /// Returns whether `schema` is registered.
    pub fn contains(&self, schema: &str) -> bool {
        self.entries.contains_key(schema)
    }

    /// Returns whether `schema` is registered with the given capability.
    pub fn supports(&self, schema: &str, operation: Operation) -> bool {
        self.entries
            .get(schema)
            .is_some_and(|entry| entry.supports(operation))
    }

    /// Returns the registered identifiers, sorted.
    pub fn schemas(&self) -> Vec<&str> {
        let mut schemas: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        schemas.sort_unstable();
        schemas
    }

    /// Returns the entry registered for `schema`.
    pub fn entry(&self, schema: &str) -> Option<&SchemaEntry> {
        self.entries.get(schema)
    }

    fn unsupported(schema: &str, operation: Operation) -> DataIoError {
        debug!(schema, %operation, "Format lookup failed");
        DataIoError::UnsupportedFormat {
            schema: schema.to_string(),
            operation,
        }
    }

    /// Builds a reader for `schema` from the configuration.
    ///
    /// # Errors
    /// [DataIoError::UnsupportedFormat] if no reader is registered; errors
    /// of the factory are returned unchanged.
    pub fn get_reader(&self, schema: &str, config: ReaderConfig) -> Result<Box<dyn DataReader>> {
        let factory = self
            .entries
            .get(schema)
            .and_then(|entry| entry.reader.as_ref())
            .ok_or_else(|| Self::unsupported(schema, Operation::Read))?;
        factory.new_reader(config)
    }

    /// Builds a writer for `schema` from the configuration.
    ///
    /// # Errors
    /// [DataIoError::UnsupportedFormat] if no writer is registered; errors
    /// of the factory are returned unchanged.
    pub fn get_writer(&self, schema: &str, config: WriterConfig) -> Result<Box<dyn DataWriter>> {
        let factory = self
            .entries
            .get(schema)
            .and_then(|entry| entry.writer.as_ref())
            .ok_or_else(|| Self::unsupported(schema, Operation::Write))?;
        factory.new_writer(config)
    }

    /// Returns the tree stream factory of `schema`.
    pub(crate) fn tree_stream_factory(&self, schema: &str) -> Result<&Arc<dyn TreeStreamFactory>> {
        self.entries
            .get(schema)
            .and_then(|entry| entry.tree_stream.as_ref())
            .ok_or_else(|| Self::unsupported(schema, Operation::TreeStream))
    }

    // ========================================================================
    // Streaming
    // ========================================================================
    /// Returns the raw tree sequence of `schema` over `stream`, without
    /// offset or progress handling.
    ///
    /// # Errors
    /// [DataIoError::UnsupportedFormat] if `schema` cannot stream trees.
    pub fn tree_source_iter_raw<'a, R>(
        &self,
        stream: R,
        schema: &str,
        config: &ReaderConfig,
    ) -> Result<RawTreeIter<'a>>
    where
        R: BufRead + 'a,
    {
        self.tree_stream_factory(schema)?
            .tree_source_iter(Box::new(stream), config)
    }

    /// Returns the trees of `stream`, starting at `config.tree_offset` and
    /// reporting progress to `config.progress`.
    ///
    /// See [TreeSourceIter] for the exact semantics.
    pub fn tree_source_iter<'a, R>(
        &self,
        stream: R,
        schema: &str,
        config: StreamConfig,
    ) -> Result<TreeSourceIter<'a>>
    where
        R: BufRead + 'a,
    {
        let raw = self.tree_source_iter_raw(stream, schema, &config.reader)?;
        Ok(TreeSourceIter::new(raw, config.tree_offset, config.progress))
    }

    /// Returns the trees of all `sources` in order.
    ///
    /// See [MultiTreeSourceIter] for the exact semantics.
    pub fn multi_tree_source_iter<'a, I>(
        &self,
        sources: I,
        schema: &str,
        config: StreamConfig,
    ) -> Result<MultiTreeSourceIter<'a>>
    where
        I: IntoIterator<Item = TreeSource<'a>>,
    {
        let factory = Arc::clone(self.tree_stream_factory(schema)?);
        Ok(MultiTreeSourceIter::new(
            factory,
            sources.into_iter().collect(),
            config,
        ))
    }
}

impl SchemaEntry {
    /// Entry with all three capabilities provided by `format`.
    pub fn from_format<F>(format: F) -> Self
    where
        F: ReaderFactory + WriterFactory + TreeStreamFactory + 'static,
    {
        let format = Arc::new(format);
        SchemaEntry {
            reader: Some(format.clone()),
            writer: Some(format.clone()),
            tree_stream: Some(format),
        }
    }
}

/// Process-wide registry with the built-in formats.
///
/// Initialized on first use and read-only afterwards; register custom
/// formats on an owned [SchemaRegistry] instead.
pub fn default_registry() -> &'static SchemaRegistry {
    static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
    REGISTRY.get_or_init(SchemaRegistry::with_builtin_formats)
}
