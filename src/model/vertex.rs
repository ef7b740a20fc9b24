//! Vertex module for phylogenetic tree representation.

use crate::model::taxon::TaxonIndex;
use std::fmt;
use std::ops::Deref;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// Vertices live in the arena of a [Tree](crate::model::Tree) and refer to
/// each other by [VertexIndex]. A vertex can have any number of children;
/// a vertex without children is a leaf.
///
/// # Invariants
/// - `index` is the position of this vertex in the arena
/// - `parent` is `None` only for the root (and during construction)
/// - Leaves normally carry a taxon; internal vertices may carry a plain
///   label (e.g. a support value or clade name)
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    /// Index of this vertex in the tree arena
    index: VertexIndex,
    /// Index of the parent vertex
    parent: Option<VertexIndex>,
    /// Indices of the child vertices, in file order
    children: Vec<VertexIndex>,
    /// Length of the incoming branch
    branch_length: Option<BranchLength>,
    /// Taxon this vertex represents, index into the tree's namespace
    taxon: Option<TaxonIndex>,
    /// Label that did not resolve to a taxon (internal vertices)
    label: Option<String>,
}

impl Vertex {
    /// Creates a new leaf vertex.
    pub fn new_leaf(
        index: VertexIndex,
        taxon: Option<TaxonIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children: Vec::new(),
            branch_length,
            taxon,
            label: None,
        }
    }

    /// Creates a new internal vertex over the given children.
    pub fn new_internal(
        index: VertexIndex,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children,
            branch_length,
            taxon: None,
            label,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the parent index, `None` for the root.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: VertexIndex) {
        self.parent = Some(parent);
    }

    /// Returns the children indices in file order.
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns whether this vertex has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns whether this vertex has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns the length of the incoming branch, if known.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Returns the taxon index, if this vertex represents a taxon.
    pub fn taxon(&self) -> Option<TaxonIndex> {
        self.taxon
    }

    /// Returns the plain label of this vertex, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================$=
/// Length of the branch leading into a vertex.
///
/// Wrapper around `f64`; dereferences to the value. Negative lengths are
/// kept as given, since some inference methods produce them.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    pub fn new(length: f64) -> Self {
        BranchLength(length)
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl From<f64> for BranchLength {
    fn from(value: f64) -> Self {
        BranchLength::new(value)
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
