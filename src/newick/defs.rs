//! Constants and definitions for Newick parser.

/// Newick label delimiters: parentheses, comma, colon, semicolon, comment
/// brackets, whitespace
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"([,:; \n\t\r)]";

/// Comment marking a tree as rooted
pub(crate) const ROOTED_COMMENT: &str = "&R";

/// Comment marking a tree as unrooted
pub(crate) const UNROOTED_COMMENT: &str = "&U";

/// Extra buffer in Newick string length/capacity estimate
pub(crate) const BUFFER_CHARS: usize = 10;
