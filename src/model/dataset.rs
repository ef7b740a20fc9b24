//! Collections of trees: [TreeList] and [DataSet].

use crate::model::taxon::TaxonNamespace;
use crate::model::tree::Tree;

// =#========================================================================#=
// TREE LIST
// =#========================================================================$=
/// An ordered list of trees over one taxon namespace, e.g. the trees of
/// one Nexus TREES block.
#[derive(Debug, Clone)]
pub struct TreeList {
    label: Option<String>,
    taxon_namespace: TaxonNamespace,
    trees: Vec<Tree>,
}

impl TreeList {
    /// Creates an empty tree list over the given namespace.
    pub fn new(taxon_namespace: TaxonNamespace) -> Self {
        Self {
            label: None,
            taxon_namespace,
            trees: Vec::new(),
        }
    }

    /// Attaches a label (e.g. the title of a TREES block).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn taxon_namespace(&self) -> &TaxonNamespace {
        &self.taxon_namespace
    }

    /// Appends a tree.
    pub fn push(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tree> {
        self.trees.iter()
    }
}

impl<'a> IntoIterator for &'a TreeList {
    type Item = &'a Tree;
    type IntoIter = std::slice::Iter<'a, Tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.trees.iter()
    }
}

// =#========================================================================#=
// DATA SET
// =#========================================================================$=
/// Top-level container produced by readers and consumed by writers.
///
/// Holds the taxon namespaces and tree lists of a data source. Namespaces
/// are deduplicated by identity, so a namespace shared by several tree
/// lists is stored once.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    taxon_namespaces: Vec<TaxonNamespace>,
    tree_lists: Vec<TreeList>,
}

impl DataSet {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a namespace unless this very namespace is already present.
    pub fn add_taxon_namespace(&mut self, taxon_namespace: TaxonNamespace) {
        if !self
            .taxon_namespaces
            .iter()
            .any(|ns| ns.same_as(&taxon_namespace))
        {
            self.taxon_namespaces.push(taxon_namespace);
        }
    }

    /// Adds a tree list and registers its namespace.
    pub fn add_tree_list(&mut self, tree_list: TreeList) {
        self.add_taxon_namespace(tree_list.taxon_namespace().clone());
        self.tree_lists.push(tree_list);
    }

    pub fn taxon_namespaces(&self) -> &[TaxonNamespace] {
        &self.taxon_namespaces
    }

    pub fn tree_lists(&self) -> &[TreeList] {
        &self.tree_lists
    }

    /// Iterates over the trees of all tree lists in order.
    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.tree_lists.iter().flat_map(|list| list.iter())
    }

    /// Total number of trees over all tree lists.
    pub fn num_trees(&self) -> usize {
        self.tree_lists.iter().map(TreeList::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.taxon_namespaces.is_empty() && self.tree_lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_deduplicated_by_identity() {
        let shared = TaxonNamespace::new();
        let mut dataset = DataSet::new();
        dataset.add_tree_list(TreeList::new(shared.clone()));
        dataset.add_tree_list(TreeList::new(shared.clone()).with_label("second"));
        dataset.add_taxon_namespace(shared.clone());
        assert_eq!(dataset.taxon_namespaces().len(), 1);

        dataset.add_taxon_namespace(TaxonNamespace::new());
        assert_eq!(dataset.taxon_namespaces().len(), 2);
        assert_eq!(dataset.tree_lists()[1].label(), Some("second"));
    }

    #[test]
    fn test_trees_spans_all_lists() {
        let taxa = TaxonNamespace::new();
        let mut first = TreeList::new(taxa.clone());
        first.push(Tree::new(taxa.clone()).with_name("t1"));
        first.push(Tree::new(taxa.clone()).with_name("t2"));
        let mut second = TreeList::new(taxa.clone());
        second.push(Tree::new(taxa.clone()).with_name("t3"));

        let mut dataset = DataSet::new();
        dataset.add_tree_list(first);
        dataset.add_tree_list(second);

        let names: Vec<_> = dataset.trees().filter_map(|t| t.name()).collect();
        assert_eq!(names, vec!["t1", "t2", "t3"]);
        assert_eq!(dataset.num_trees(), 3);
    }
}
