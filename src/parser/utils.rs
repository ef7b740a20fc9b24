//! Utility functions for label escaping and unescaping in phylogenetic tree formats.
//!
//! Labels written to Newick and Nexus must not contain unprotected
//! delimiters. The functions here decide when a label has to be wrapped in
//! single quotes and reverse that when a raw label is read back.

/// Characters that force a label into single quotes when written.
const SPECIAL_CHARS: &[char] = &[
    ',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\'', '=',
];

/// Checks if a label is already escaped:
/// - wrapped in single quotes and each internal single quote doubled, or
/// - no space and special characters
///
/// # Examples
/// ```
/// # use phyloio::parser::utils::is_escaped;
/// assert_eq!(is_escaped("Pukeko"), true);
/// assert_eq!(is_escaped("Pu[ke]ko"), false);
/// assert_eq!(is_escaped("Australasian Swamphen"), false);
/// assert_eq!(is_escaped("Australasian_Swamphen"), true);
/// assert_eq!(is_escaped("'Australasian Swamphen'"), true);
/// assert_eq!(is_escaped("'Baillon''s_Crake'"), true);
/// assert_eq!(is_escaped("'Baillon's Crake'"), false);
/// ```
pub fn is_escaped(label: &str) -> bool {
    if is_single_quoted(label) {
        let inner = &label[1..label.len() - 1];
        let mut pending_quote = false;
        for ch in inner.chars() {
            if pending_quote {
                if ch != '\'' {
                    return false;
                }
                pending_quote = false;
            } else if ch == '\'' {
                pending_quote = true;
            }
        }
        !pending_quote
    } else {
        !label.is_empty() && !label.chars().any(|c| c == ' ' || SPECIAL_CHARS.contains(&c))
    }
}

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use phyloio::parser::utils::is_single_quoted;
/// assert_eq!(is_single_quoted("Pukeko"), false);
/// assert_eq!(is_single_quoted("'Swamp hen'"), true);
/// assert_eq!(is_single_quoted("'"), false);
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.len() >= 2 && label.starts_with('\'') && label.ends_with('\'')
}

/// Wraps a label in single quotes, doubling internal single quotes.
///
/// # Examples
/// ```
/// # use phyloio::parser::utils::quote_label;
/// assert_eq!(quote_label("Baillon's Crake"), "'Baillon''s Crake'");
/// assert_eq!(quote_label(""), "''");
/// ```
pub fn quote_label(label: &str) -> String {
    format!("'{}'", label.replace('\'', "''"))
}

/// Escapes a model label for safe use in Nexus and Newick output.
///
/// Plain labels are returned unchanged and spaces become underscores.
/// Labels that contain special characters or literal underscores, and
/// empty labels, are single quoted so they read back unchanged.
///
/// # Examples
/// ```
/// # use phyloio::parser::utils::escape_label;
/// assert_eq!(escape_label("Pukeko"), "Pukeko");
/// assert_eq!(escape_label("Pu[ke]ko"), "'Pu[ke]ko'");
/// assert_eq!(escape_label("Australasian Swamphen"), "Australasian_Swamphen");
/// assert_eq!(escape_label("Porphyrio_melanotus"), "'Porphyrio_melanotus'");
/// assert_eq!(escape_label("Baillon's Crake"), "'Baillon''s Crake'");
/// ```
pub fn escape_label(label: &str) -> String {
    if label.is_empty() || label.contains('_') || label.chars().any(|c| SPECIAL_CHARS.contains(&c))
    {
        quote_label(label)
    } else {
        label.replace(' ', "_")
    }
}

/// Unescapes a raw label as found in Nexus/Newick text.
///
/// Quoted labels lose their quotes and doubled quotes are collapsed; their
/// underscores are kept. In unquoted labels underscores become spaces
/// unless `preserve_underscores` is set.
///
/// # Examples
/// ```
/// # use phyloio::parser::utils::unescape_label;
/// assert_eq!(unescape_label("Australasian_Swamphen", false), "Australasian Swamphen");
/// assert_eq!(unescape_label("Australasian_Swamphen", true), "Australasian_Swamphen");
/// assert_eq!(unescape_label("'Baillon''s_Crake'", false), "Baillon's_Crake");
/// ```
pub fn unescape_label(label: &str, preserve_underscores: bool) -> String {
    if is_single_quoted(label) {
        label[1..label.len() - 1].replace("''", "'")
    } else if preserve_underscores {
        label.to_string()
    } else {
        label.replace('_', " ")
    }
}
