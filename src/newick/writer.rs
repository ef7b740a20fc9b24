//! Newick format writing.

use crate::model::{BranchLength, Tree, VertexIndex};
use crate::newick::defs::{BUFFER_CHARS, ROOTED_COMMENT, UNROOTED_COMMENT};
use crate::parser::utils::escape_label;
use std::io::{self, Write};

/// Style for serializing tree to Newick format,
/// controlling how leaf labels are represented in the output string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// Use full (escaped) taxon labels
    #[default]
    Label,
    /// Use 0-based taxon indices (0, 1, 2, ...)
    ZeroIndexed,
    /// Use 1-based taxon indices (1, 2, 3, ...) (as in Nexus files)
    OneIndexed,
}

/// Options for rendering trees as Newick strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewickWriteOptions {
    pub style: NewickStyle,
    pub edge_lengths: bool,
    pub internal_labels: bool,
    pub rooting_comment: bool,
}

impl Default for NewickWriteOptions {
    fn default() -> Self {
        Self {
            style: NewickStyle::Label,
            edge_lengths: true,
            internal_labels: true,
            rooting_comment: false,
        }
    }
}

impl NewickWriteOptions {
    pub fn with_style(mut self, style: NewickStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_edge_lengths(mut self, edge_lengths: bool) -> Self {
        self.edge_lengths = edge_lengths;
        self
    }

    pub fn with_internal_labels(mut self, internal_labels: bool) -> Self {
        self.internal_labels = internal_labels;
        self
    }

    /// Prefix trees with known rooting state with `[&R] ` / `[&U] `.
    pub fn with_rooting_comment(mut self, rooting_comment: bool) -> Self {
        self.rooting_comment = rooting_comment;
        self
    }
}

/// Writes the given trees in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick<'a, I>(sink: &mut dyn Write, trees: I, options: &NewickWriteOptions) -> io::Result<()>
where
    I: IntoIterator<Item = &'a Tree>,
{
    for tree in trees {
        sink.write_all(tree_to_newick(tree, options).as_bytes())?;
        sink.write_all(b"\n")?;
    }
    Ok(())
}

/// Returns the Newick representation of a tree with closing semicolon.
///
/// # Example
/// ```
/// use phyloio::model::{BranchLength, TaxonNamespace, Tree};
/// use phyloio::newick::{NewickStyle, NewickWriteOptions, tree_to_newick};
///
/// let taxa = TaxonNamespace::new();
/// let mut tree = Tree::new(taxa.clone());
/// let a = tree.add_leaf(Some(taxa.require_taxon("Little Spotted Kiwi")), Some(BranchLength::new(1.0)));
/// let b = tree.add_leaf(Some(taxa.require_taxon("Okarito")), Some(BranchLength::new(1.5)));
/// let root = tree.add_internal(vec![a, b], None, None);
/// tree.set_root(root);
///
/// let options = NewickWriteOptions::default();
/// assert_eq!(tree_to_newick(&tree, &options), "(Little_Spotted_Kiwi:1,Okarito:1.5);");
/// let options = options.with_style(NewickStyle::OneIndexed).with_edge_lengths(false);
/// assert_eq!(tree_to_newick(&tree, &options), "(1,2);");
/// ```
pub fn tree_to_newick(tree: &Tree, options: &NewickWriteOptions) -> String {
    let mut newick = String::with_capacity(estimate_newick_len(tree));

    if options.rooting_comment {
        match tree.is_rooted() {
            Some(true) => newick.push_str(&format!("[{}] ", ROOTED_COMMENT)),
            Some(false) => newick.push_str(&format!("[{}] ", UNROOTED_COMMENT)),
            None => {}
        }
    }

    if let Some(root) = tree.root_index() {
        build_newick(tree, &mut newick, root, options);
    }
    newick.push(';');
    newick
}

/// Steps of the Newick serialization, run from an explicit stack.
enum Step {
    Open(VertexIndex),
    Comma,
    Close(VertexIndex),
}

// Helper building the Newick string of the subtree at `root`
fn build_newick(tree: &Tree, newick: &mut String, root: VertexIndex, options: &NewickWriteOptions) {
    let mut steps = vec![Step::Open(root)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Open(index) => {
                let vertex = &tree[index];
                if vertex.is_leaf() {
                    push_vertex_suffix(tree, newick, index, options);
                    continue;
                }
                newick.push('(');
                steps.push(Step::Close(index));
                // Pushed in reverse, so the first child is written first
                for (i, &child) in vertex.children().iter().enumerate().rev() {
                    steps.push(Step::Open(child));
                    if i > 0 {
                        steps.push(Step::Comma);
                    }
                }
            }
            Step::Comma => newick.push(','),
            Step::Close(index) => {
                newick.push(')');
                push_vertex_suffix(tree, newick, index, options);
            }
        }
    }
}

/// Label (or taxon) and branch length written after a vertex.
fn push_vertex_suffix(tree: &Tree, newick: &mut String, index: VertexIndex, options: &NewickWriteOptions) {
    let vertex = &tree[index];
    match vertex.taxon() {
        Some(taxon) => match options.style {
            NewickStyle::Label => {
                if let Some(label) = tree.taxon_namespace().label_of(taxon) {
                    newick.push_str(&escape_label(&label));
                }
            }
            NewickStyle::ZeroIndexed => newick.push_str(&taxon.to_string()),
            NewickStyle::OneIndexed => newick.push_str(&(taxon + 1).to_string()),
        },
        None => {
            if let Some(label) = vertex.label().filter(|_| options.internal_labels) {
                newick.push_str(&escape_label(label));
            }
        }
    }

    if options.edge_lengths {
        push_branch_length(newick, vertex.branch_length());
    }
}

fn push_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
    if let Some(branch_length) = branch_length {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }
}

/// Rough capacity estimate: labels, branch lengths and punctuation.
fn estimate_newick_len(tree: &Tree) -> usize {
    tree.num_vertices() * (BUFFER_CHARS + 2) + BUFFER_CHARS
}
