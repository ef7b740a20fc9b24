//! Split encoding of tree vertices.
//!
//! The split of a vertex is the set of taxa below it. Representing it as a
//! bitmask over the taxon namespace makes splits of different trees over the
//! same namespace directly comparable.

use crate::model::taxon::TaxonIndex;

const WORD_BITS: usize = u64::BITS as usize;

/// Set of taxon indices stored as a growable bitmask.
///
/// Trailing zero words are never stored, so two masks with the same taxa
/// compare equal regardless of how large the namespace was when they were
/// built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SplitBitmask {
    words: Vec<u64>,
}

impl SplitBitmask {
    /// Creates an empty split.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the split containing exactly one taxon.
    pub fn singleton(taxon: TaxonIndex) -> Self {
        let mut split = Self::new();
        split.insert(taxon);
        split
    }

    /// Adds a taxon to this split.
    pub fn insert(&mut self, taxon: TaxonIndex) {
        let word = taxon / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (taxon % WORD_BITS);
    }

    /// Returns whether the taxon is part of this split.
    pub fn contains(&self, taxon: TaxonIndex) -> bool {
        self.words
            .get(taxon / WORD_BITS)
            .is_some_and(|w| w & (1 << (taxon % WORD_BITS)) != 0)
    }

    /// Adds all taxa of `other` to this split.
    pub fn union_with(&mut self, other: &SplitBitmask) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (mine, theirs) in self.words.iter_mut().zip(&other.words) {
            *mine |= theirs;
        }
    }

    /// Number of taxa in this split.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Returns whether this split has no taxa.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over the taxon indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = TaxonIndex> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &bits)| {
            (0..WORD_BITS)
                .filter(move |b| bits & (1 << b) != 0)
                .map(move |b| w * WORD_BITS + b)
        })
    }

    /// Renders the split as a string of `0`/`1` over the first `num_taxa`
    /// taxa, highest index first (the usual split notation).
    pub fn to_bit_string(&self, num_taxa: usize) -> String {
        (0..num_taxa)
            .rev()
            .map(|i| if self.contains(i) { '1' } else { '0' })
            .collect()
    }
}
