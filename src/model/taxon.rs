//! Shared taxon namespaces.
//!
//! A [TaxonNamespace] maps taxon labels to dense, stable [TaxonIndex]
//! values. Trees refer to taxa by index, so all trees resolved against the
//! same namespace are directly comparable (e.g. via their splits).
//!
//! The namespace is a cheap-to-clone handle: clones refer to the same
//! underlying label table, and identity (not content) decides whether two
//! handles are "the same" namespace.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Index of a taxon within its [TaxonNamespace].
pub type TaxonIndex = usize;

/// Source of process-unique namespace ids.
static NEXT_NAMESPACE_ID: AtomicU64 = AtomicU64::new(0);

// =#========================================================================#=
// TAXON NAMESPACE
// =#========================================================================$=
/// Shared, growable table of taxon labels.
///
/// # Invariants
/// - Labels are unique within a namespace.
/// - Indices are assigned in insertion order starting at 0 and never change.
///
/// # Example
/// ```
/// use phyloio::model::TaxonNamespace;
///
/// let taxa = TaxonNamespace::new();
/// let shared = taxa.clone();
/// let a = taxa.require_taxon("Apteryx");
/// assert_eq!(shared.require_taxon("Apteryx"), a);
/// assert_eq!(shared.len(), 1);
/// assert!(taxa.same_as(&shared));
/// assert!(!taxa.same_as(&TaxonNamespace::new()));
/// ```
#[derive(Clone)]
pub struct TaxonNamespace {
    id: u64,
    inner: Arc<RwLock<NamespaceInner>>,
}

#[derive(Debug, Default)]
struct NamespaceInner {
    label: Option<String>,
    labels: Vec<String>,
    index_of: HashMap<String, TaxonIndex>,
}

impl TaxonNamespace {
    /// Creates a new, empty and unlabelled namespace.
    pub fn new() -> Self {
        Self {
            id: NEXT_NAMESPACE_ID.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(RwLock::new(NamespaceInner::default())),
        }
    }

    /// Attaches a label (e.g. the title of a Nexus TAXA block).
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.inner.write().label = Some(label.into());
        self
    }

    /// Returns the label of this namespace, if any.
    pub fn label(&self) -> Option<String> {
        self.inner.read().label.clone()
    }

    /// Returns the index of the taxon with the given label, adding a new
    /// taxon if none exists yet.
    pub fn require_taxon(&self, label: &str) -> TaxonIndex {
        if let Some(&index) = self.inner.read().index_of.get(label) {
            return index;
        }

        let mut inner = self.inner.write();
        // Another handle may have inserted it between the two locks
        if let Some(&index) = inner.index_of.get(label) {
            return index;
        }
        let index = inner.labels.len();
        inner.labels.push(label.to_string());
        inner.index_of.insert(label.to_string(), index);
        index
    }

    /// Returns the index of the taxon with the given label, if present.
    pub fn get_index(&self, label: &str) -> Option<TaxonIndex> {
        self.inner.read().index_of.get(label).copied()
    }

    /// Returns the label of the taxon at `index`, if present.
    pub fn label_of(&self, index: TaxonIndex) -> Option<String> {
        self.inner.read().labels.get(index).cloned()
    }

    /// Returns a snapshot of all labels in index order.
    pub fn labels(&self) -> Vec<String> {
        self.inner.read().labels.clone()
    }

    /// Number of taxa in this namespace.
    pub fn len(&self) -> usize {
        self.inner.read().labels.len()
    }

    /// Returns whether this namespace has no taxa.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Process-unique id of this namespace; shared by all its clones.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns whether both handles refer to the same namespace.
    pub fn same_as(&self, other: &TaxonNamespace) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for TaxonNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaxonNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("TaxonNamespace")
            .field("id", &self.id)
            .field("label", &inner.label)
            .field("labels", &inner.labels)
            .finish()
    }
}

// =#========================================================================#=
// TESTS - TAXON NAMESPACE
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_dense_and_stable() {
        let taxa = TaxonNamespace::new();
        assert!(taxa.is_empty());
        assert_eq!(taxa.require_taxon("Kea"), 0);
        assert_eq!(taxa.require_taxon("Kaka"), 1);
        assert_eq!(taxa.require_taxon("Kea"), 0);
        assert_eq!(taxa.get_index("Kaka"), Some(1));
        assert_eq!(taxa.get_index("Kakapo"), None);
        assert_eq!(taxa.label_of(1).as_deref(), Some("Kaka"));
        assert_eq!(taxa.label_of(2), None);
        assert_eq!(taxa.labels(), vec!["Kea", "Kaka"]);
    }

    #[test]
    fn test_identity_not_content() {
        let a = TaxonNamespace::new().with_label("birds");
        let b = TaxonNamespace::new().with_label("birds");
        a.require_taxon("Takahe");
        b.require_taxon("Takahe");
        assert!(!a.same_as(&b));
        assert_ne!(a.id(), b.id());

        let a2 = a.clone();
        assert!(a.same_as(&a2));
        assert_eq!(a.id(), a2.id());
        assert_eq!(a2.label().as_deref(), Some("birds"));
    }

    #[test]
    fn test_shared_across_threads() {
        let taxa = TaxonNamespace::new();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let taxa = taxa.clone();
                std::thread::spawn(move || {
                    for label in ["A", "B", "C"] {
                        taxa.require_taxon(label);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(taxa.len(), 3);
    }
}
