//! NEXUS format constants and definitions.
//!
//! This module contains byte string constants for parsing and writing
//! phylogenetic tree files in NEXUS format, as well as the enum of NEXUS blocks.

/// NEXUS label delimiters: comma, semicolon, comment, whitespace
pub(crate) const NEXUS_LABEL_DELIMITERS: &[u8] = b" ,;\t\n\r[";

/// Delimiters of tree names in TREE commands
pub(crate) const TREE_NAME_DELIMITERS: &[u8] = b" =;\t\n\r[";

/// Delimiters of command words and keys
pub(crate) const WORD_DELIMITERS: &[u8] = b" =;\t\n\r[";

/// NEXUS file header "#NEXUS"
pub(crate) const NEXUS_HEADER: &[u8] = b"#NEXUS";

/// NEXUS block begin keyword
pub(crate) const BLOCK_BEGIN: &str = "BEGIN";

/// NEXUS block end keywords (followed by a semicolon)
pub(crate) const BLOCK_END: &str = "END";
pub(crate) const BLOCK_END_ALT: &str = "ENDBLOCK";

/// Block title command "TITLE"
pub(crate) const TITLE: &str = "TITLE";

// Taxa block keywords
/// TAXA block dimensions command "DIMENSIONS"
pub(crate) const DIMENSIONS: &str = "DIMENSIONS";

/// Number of taxa parameter "NTAX"
pub(crate) const NTAX: &str = "NTAX";

/// Tax labels command "TAXLABELS"
pub(crate) const TAXLABELS: &str = "TAXLABELS";

// Trees block keywords
/// TREES block translate command "TRANSLATE"
pub(crate) const TRANSLATE: &str = "TRANSLATE";

/// Tree command "TREE"
pub(crate) const TREE: &str = "TREE";

/// Unrooted tree command "UTREE"
pub(crate) const UTREE: &str = "UTREE";

/// Indentation of commands within blocks when writing
pub(crate) const INDENT: &str = "    ";

/// NEXUS block types
#[derive(Debug, PartialEq, Clone)]
pub enum NexusBlock {
    Taxa,
    Trees,
    Data,
    Characters,
    Distances,
    Sets,
    Assumptions,
    UnknownBlock(String),
}

impl NexusBlock {
    /// Parse a block name (case-insensitive) into a NexusBlock variant
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "taxa" => NexusBlock::Taxa,
            "trees" => NexusBlock::Trees,
            "data" => NexusBlock::Data,
            "characters" => NexusBlock::Characters,
            "distances" => NexusBlock::Distances,
            "sets" => NexusBlock::Sets,
            "assumptions" => NexusBlock::Assumptions,
            _ => NexusBlock::UnknownBlock(name.to_string()),
        }
    }
}
