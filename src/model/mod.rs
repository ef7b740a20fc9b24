//! Data model: taxon namespaces, trees and datasets.
pub mod dataset;
pub mod split;
pub mod taxon;
pub mod tree;
pub mod vertex;

pub use dataset::{DataSet, TreeList};
pub use split::SplitBitmask;
pub use taxon::{TaxonIndex, TaxonNamespace};
pub use tree::{PostOrderIter, PreOrderIter, Tree};
pub use vertex::{BranchLength, Vertex, VertexIndex};
