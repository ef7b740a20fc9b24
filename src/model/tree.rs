//! Provides the tree representation.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [Tree] - Main tree structure using the arena pattern, with leaves
//!   referring to taxa of a shared [TaxonNamespace]
//! * [PreOrderIter] and [PostOrderIter] for traversals

use crate::model::split::SplitBitmask;
use crate::model::taxon::{TaxonIndex, TaxonNamespace};
use crate::model::vertex::{BranchLength, Vertex, VertexIndex};
use crate::newick;
use crate::newick::{NewickStyle, NewickWriteOptions};

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A phylogenetic tree of arbitrary arity represented using the arena
/// pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Leaves refer to taxa by [TaxonIndex] into the tree's
/// [TaxonNamespace], which is typically shared by all trees read from the
/// same source.
///
/// # Construction
/// Add vertices bottom-up with [Tree::add_leaf] and [Tree::add_internal],
/// then mark the root with [Tree::set_root].
///
/// ```
/// use phyloio::model::{BranchLength, TaxonNamespace, Tree};
///
/// let taxa = TaxonNamespace::new();
/// let mut tree = Tree::new(taxa.clone());
/// let a = tree.add_leaf(Some(taxa.require_taxon("A")), Some(BranchLength::new(1.0)));
/// let b = tree.add_leaf(Some(taxa.require_taxon("B")), Some(BranchLength::new(2.0)));
/// let root = tree.add_internal(vec![a, b], None, None);
/// tree.set_root(root);
///
/// assert_eq!(tree.num_leaves(), 2);
/// assert_eq!(tree.total_branch_length(), 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree, once set
    root: Option<VertexIndex>,

    /// Name of tree; optional, e.g. when parsed from Nexus file
    name: Option<String>,

    /// Rooting state as stated in the source (`[&R]` / `[&U]`)
    is_rooted: Option<bool>,

    /// Namespace the taxon indices of the leaves refer to
    taxon_namespace: TaxonNamespace,

    /// Split of every vertex, by vertex index; filled by `encode_splits`
    splits: Option<Vec<SplitBitmask>>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new, empty tree over the given namespace.
    pub fn new(taxon_namespace: TaxonNamespace) -> Self {
        Tree {
            vertices: Vec::new(),
            root: None,
            name: None,
            is_rooted: None,
            taxon_namespace,
            splits: None,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a leaf, assigning a unique index, which gets returned.
    pub fn add_leaf(
        &mut self,
        taxon: Option<TaxonIndex>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, taxon, branch_length));
        self.splits = None;
        index
    }

    /// Adds an internal vertex over the given children, assigning a unique
    /// index, which gets returned. Parents of the children are set.
    ///
    /// # Panics
    /// Panics if a child index is not in the arena.
    pub fn add_internal(
        &mut self,
        children: Vec<VertexIndex>,
        branch_length: Option<BranchLength>,
        label: Option<String>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self.vertices[child].set_parent(index);
        }
        self.vertices
            .push(Vertex::new_internal(index, children, branch_length, label));
        self.splits = None;
        index
    }

    /// Marks the vertex at `index` as root.
    pub fn set_root(&mut self, index: VertexIndex) {
        self.root = Some(index);
    }

    /// Returns the root vertex, or `None` for an empty tree.
    pub fn root(&self) -> Option<&Vertex> {
        self.root.map(|r| &self.vertices[r])
    }

    /// Returns the index of the root vertex, if set.
    pub fn root_index(&self) -> Option<VertexIndex> {
        self.root
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Rooting state: `Some(true)` for rooted, `Some(false)` for unrooted,
    /// `None` if the source did not say.
    pub fn is_rooted(&self) -> Option<bool> {
        self.is_rooted
    }

    /// Sets the rooting state.
    pub fn set_rooted(&mut self, is_rooted: Option<bool>) {
        self.is_rooted = is_rooted;
    }

    /// Returns the namespace the leaves refer to.
    pub fn taxon_namespace(&self) -> &TaxonNamespace {
        &self.taxon_namespace
    }

    /// Returns the vertex at `index`, or `None` if out of range.
    pub fn vertex(&self, index: VertexIndex) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    /// Returns all vertices in arena order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of leaves.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices (including the root).
    pub fn num_internal(&self) -> usize {
        self.num_vertices() - self.num_leaves()
    }

    /// Returns whether the tree has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the taxon labels of the leaves in pre-order (file order).
    ///
    /// Leaves without taxon are skipped.
    pub fn leaf_labels(&self) -> Vec<String> {
        self.pre_order_iter()
            .filter(|v| v.is_leaf())
            .filter_map(|v| v.taxon())
            .filter_map(|t| self.taxon_namespace.label_of(t))
            .collect()
    }

    /// Returns the label of the taxon or plain label of the vertex.
    pub fn vertex_label(&self, vertex: &Vertex) -> Option<String> {
        match vertex.taxon() {
            Some(taxon) => self.taxon_namespace.label_of(taxon),
            None => vertex.label().map(str::to_string),
        }
    }

    /// Sum of all known branch lengths.
    pub fn total_branch_length(&self) -> f64 {
        self.vertices
            .iter()
            .filter_map(|v| v.branch_length())
            .map(|b| *b)
            .sum()
    }

    /// Returns whether every non-root vertex has a [BranchLength].
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices
            .iter()
            .filter(|v| Some(v.index()) != self.root)
            .all(|v| v.has_branch_length())
    }

    /// Newick string of this tree (terminated by `;`).
    pub fn to_newick(&self, style: NewickStyle) -> String {
        newick::writer::tree_to_newick(self, &NewickWriteOptions::default().with_style(style))
    }
}

// ============================================================================
// Splits
// ============================================================================
impl Tree {
    /// Computes the split of every vertex, i.e. the set of taxa below it.
    ///
    /// Leaves without taxon contribute nothing. The encoding is dropped
    /// again when the tree is modified.
    pub fn encode_splits(&mut self) {
        let mut splits = vec![SplitBitmask::new(); self.vertices.len()];
        let order: Vec<VertexIndex> = self.post_order_iter().map(|v| v.index()).collect();
        for index in order {
            let vertex = &self.vertices[index];
            let mut split = match vertex.taxon() {
                Some(taxon) => SplitBitmask::singleton(taxon),
                None => SplitBitmask::new(),
            };
            for &child in vertex.children() {
                split.union_with(&splits[child]);
            }
            splits[index] = split;
        }
        self.splits = Some(splits);
    }

    /// Returns whether splits are currently encoded.
    pub fn has_splits(&self) -> bool {
        self.splits.is_some()
    }

    /// Returns the split of the vertex at `index`, if splits are encoded.
    pub fn split_bitmask(&self, index: VertexIndex) -> Option<&SplitBitmask> {
        self.splits.as_ref()?.get(index)
    }

    /// Returns the splits of all non-leaf, non-root vertices, if encoded.
    pub fn internal_splits(&self) -> Option<Vec<&SplitBitmask>> {
        let splits = self.splits.as_ref()?;
        Some(
            self.vertices
                .iter()
                .filter(|v| !v.is_leaf() && Some(v.index()) != self.root)
                .map(|v| &splits[v.index()])
                .collect(),
        )
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Useful for aggregating data from leaves upward (e.g. splits).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Leaves are visited in file order.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        PostOrderIter {
            tree,
            stack: tree.root.map(|r| (r, false)).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so the first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        PreOrderIter {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];
        self.stack.extend(vertex.children().iter().rev());
        Some(vertex)
    }
}
