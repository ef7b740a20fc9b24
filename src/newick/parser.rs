//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which parses single tree
//! statements, as well as lazy parsing of whole streams via a
//! [NewickTreeIter].

use crate::model::{BranchLength, TaxonIndex, TaxonNamespace, Tree, VertexIndex};
use crate::newick::defs::{NEWICK_LABEL_DELIMITERS, ROOTED_COMMENT, UNROOTED_COMMENT};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use std::collections::HashMap;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick tree statements of arbitrary arity.
///
/// Leaf labels are resolved to taxa of the parser's [TaxonNamespace]:
/// first through the translation table (as set up by a Nexus `TRANSLATE`
/// command), otherwise by label, adding taxa as needed. Labels after a
/// closing parenthesis are kept as plain labels of internal vertices.
///
/// # Configuration
/// * [`with_preserve_underscores()`](Self::with_preserve_underscores)
///     - Keep underscores in unquoted labels; by default they become spaces.
/// * [`with_encode_splits()`](Self::with_encode_splits)
///     - Compute the splits of every parsed tree.
///
/// # Example
/// ```
/// use phyloio::model::TaxonNamespace;
/// use phyloio::newick::NewickParser;
/// use phyloio::parser::ByteParser;
///
/// let taxa = TaxonNamespace::new();
/// let mut parser = NewickParser::new(taxa.clone());
/// let mut input = ByteParser::for_str("[&R] ((Apteryx_haastii:1,A._owenii:1)kiwi:0.5,Casuarius:2);");
///
/// let tree = parser.parse_tree(&mut input).unwrap().unwrap();
/// assert_eq!(tree.is_rooted(), Some(true));
/// assert_eq!(tree.leaf_labels(), vec!["Apteryx haastii", "A. owenii", "Casuarius"]);
/// assert_eq!(taxa.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    taxon_namespace: TaxonNamespace,
    translation: HashMap<String, TaxonIndex>,
    preserve_underscores: bool,
    encode_splits: bool,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] resolving taxa into `taxon_namespace`.
    pub fn new(taxon_namespace: TaxonNamespace) -> Self {
        Self {
            taxon_namespace,
            translation: HashMap::new(),
            preserve_underscores: false,
            encode_splits: false,
        }
    }

    /// Keep underscores of unquoted labels.
    pub fn with_preserve_underscores(mut self, preserve_underscores: bool) -> Self {
        self.preserve_underscores = preserve_underscores;
        self
    }

    /// Compute the splits of every parsed tree.
    pub fn with_encode_splits(mut self, encode_splits: bool) -> Self {
        self.encode_splits = encode_splits;
        self
    }

    /// Returns the namespace taxa are resolved into.
    pub fn taxon_namespace(&self) -> &TaxonNamespace {
        &self.taxon_namespace
    }

    /// Whether unquoted underscores are kept.
    pub fn preserve_underscores(&self) -> bool {
        self.preserve_underscores
    }

    /// Maps a token (e.g. `1` from a `TRANSLATE` command) to a taxon.
    pub(crate) fn add_translation(&mut self, token: String, taxon: TaxonIndex) {
        self.translation.insert(token, taxon);
    }

    /// Removes all token mappings.
    pub(crate) fn clear_translation(&mut self) {
        self.translation.clear();
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses one tree statement, including leading `[&R]`/`[&U]` comments
    /// and the terminating `;`.
    ///
    /// # Returns
    /// * `Ok(Some(tree))` - The parsed tree
    /// * `Ok(None)` - An empty statement (a bare `;`)
    /// * `Err(ParsingError)` - If the Newick string is invalid
    pub fn parse_tree<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<Tree>, ParsingError> {
        let rooting = self.parse_rooting_comments(parser)?;
        self.parse_tree_body(parser, rooting)
    }

    /// Parses all tree statements until EOF; empty statements are skipped.
    pub fn parse_all<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<Vec<Tree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            let rooting = self.parse_rooting_comments(parser)?;
            if parser.is_eof() {
                break;
            }
            if let Some(tree) = self.parse_tree_body(parser, rooting)? {
                trees.push(tree);
            }
        }
        Ok(trees)
    }

    /// Consumes whitespace and comments in front of a tree statement and
    /// returns the rooting state they declare, if any.
    pub(crate) fn parse_rooting_comments<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<bool>, ParsingError> {
        let mut rooting = None;
        loop {
            parser.skip_whitespace();
            match parser.read_comment()? {
                Some(comment) => {
                    let comment = comment.trim();
                    if comment.eq_ignore_ascii_case(ROOTED_COMMENT) {
                        rooting = Some(true);
                    } else if comment.eq_ignore_ascii_case(UNROOTED_COMMENT) {
                        rooting = Some(false);
                    }
                }
                None => return Ok(rooting),
            }
        }
    }

    /// Parses a tree statement whose leading comments were consumed already.
    pub(crate) fn parse_tree_body<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        rooting: Option<bool>,
    ) -> Result<Option<Tree>, ParsingError> {
        if parser.consume_if(b';') {
            return Ok(None);
        }
        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        let mut tree = Tree::new(self.taxon_namespace.clone());
        tree.set_rooted(rooting);

        let root = self.parse_vertex(parser, &mut tree)?;
        tree.set_root(root);

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            let next_char = parser.peek().map(char::from);
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", next_char),
            ));
        }

        if self.encode_splits {
            tree.encode_splits();
        }
        Ok(Some(tree))
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses a vertex with its whole subtree and returns its index.
    ///
    /// Nesting is tracked on an explicit stack of open internal vertices
    /// (their children collected so far), so depth is bounded by memory
    /// only. Vertices are added to the tree in post-order:
    /// - `(child[,child]*)[label][:branch_length]` for internal vertices
    /// - `[label][:branch_length]` for leaves
    fn parse_vertex<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        let mut open: Vec<Vec<VertexIndex>> = Vec::new();
        loop {
            // Descend to the next leaf, opening internal vertices on the way
            parser.skip_comment_and_whitespace()?;
            if parser.consume_if(b'(') {
                open.push(Vec::new());
                continue;
            }
            let mut vertex = self.parse_leaf(parser, tree)?;

            // Attach the finished vertex and close parents ended by ')'
            loop {
                let Some(mut children) = open.pop() else {
                    return Ok(vertex);
                };
                children.push(vertex);

                parser.skip_comment_and_whitespace()?;
                match parser.peek() {
                    Some(b',') => {
                        parser.next_byte();
                        open.push(children);
                        break;
                    }
                    Some(b')') => {
                        parser.next_byte();
                        let label = self.parse_vertex_label(parser)?;
                        let branch_length = self.parse_branch_length(parser)?;
                        vertex = tree.add_internal(children, branch_length, label);
                    }
                    Some(b) => {
                        return Err(ParsingError::invalid_newick_string(
                            parser,
                            format!("Expected ',' or ')' after child but found {:?}", char::from(b)),
                        ));
                    }
                    None => return Err(ParsingError::unexpected_eof(parser)),
                }
            }
        }
    }

    /// Parses leaf vertex and adds it to tree:
    /// - `[label][:branch_length]`
    /// - An empty label gives a leaf without taxon
    fn parse_leaf<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
        tree: &mut Tree,
    ) -> Result<VertexIndex, ParsingError> {
        let taxon = self
            .parse_vertex_label(parser)?
            .map(|label| self.resolve_taxon(label));
        let branch_length = self.parse_branch_length(parser)?;
        Ok(tree.add_leaf(taxon, branch_length))
    }

    /// Parses an optional (quoted or unquoted) vertex label.
    fn parse_vertex_label<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<String>, ParsingError> {
        let label = self.parse_label_token(parser, NEWICK_LABEL_DELIMITERS)?;
        Ok((!label.is_empty()).then_some(label))
    }

    /// Parses a quoted or unquoted label ending at one of `delimiters`.
    ///
    /// Unquoted underscores become spaces unless configured otherwise;
    /// quoted labels are taken verbatim. Returns an empty string if there
    /// is no label at the current position.
    pub(crate) fn parse_label_token<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
        delimiters: &[u8],
    ) -> Result<String, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.peek() == Some(b'\'') {
            return parser.parse_quoted_label();
        }

        let raw = parser.parse_unquoted_label(delimiters)?;
        Ok(if self.preserve_underscores {
            raw
        } else {
            raw.replace('_', " ")
        })
    }

    /// Resolves a leaf label to a taxon, via translation table or namespace.
    fn resolve_taxon(&self, label: String) -> TaxonIndex {
        match self.translation.get(&label) {
            Some(&taxon) => taxon,
            None => self.taxon_namespace.require_taxon(&label),
        }
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    fn parse_branch_length<B: ByteSource>(
        &self,
        parser: &mut ByteParser<B>,
    ) -> Result<Option<BranchLength>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        // Find end of branch length substring
        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                branch_length_str.push(char::from(b));
                parser.next_byte();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {:?}", branch_length_str),
            )
        })?;
        Ok(Some(BranchLength::new(value)))
    }
}

// =#========================================================================#=
// NEWICK TREE ITERATOR (lazy parser)
// =#========================================================================$=
/// Iterator parsing one Newick tree statement per call from a byte source.
///
/// Yields one item per statement: `Ok(Some(tree))` for a tree, `Ok(None)`
/// for an empty statement. The first error is yielded and ends iteration.
pub struct NewickTreeIter<B: ByteSource> {
    byte_parser: ByteParser<B>,
    parser: NewickParser,
    done: bool,
}

impl<B: ByteSource> NewickTreeIter<B> {
    /// Creates an iterator over the statements of `byte_parser`.
    pub fn new(byte_parser: ByteParser<B>, parser: NewickParser) -> Self {
        Self {
            byte_parser,
            parser,
            done: false,
        }
    }

    fn next_statement(&mut self) -> Result<Option<Option<Tree>>, ParsingError> {
        let rooting = self.parser.parse_rooting_comments(&mut self.byte_parser)?;
        if self.byte_parser.is_eof() {
            if let Some(err) = self.byte_parser.take_io_error() {
                return Err(ParsingError::from_parser(
                    ParsingErrorType::IoError(err.to_string()),
                    &mut self.byte_parser,
                ));
            }
            return Ok(None);
        }
        self.parser
            .parse_tree_body(&mut self.byte_parser, rooting)
            .map(Some)
    }
}

impl<B: ByteSource> Iterator for NewickTreeIter<B> {
    type Item = Result<Option<Tree>, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.next_statement() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
