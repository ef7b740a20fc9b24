//! Lazy parsing of NEXUS files.
//!
//! [NexusTreeIter] walks a NEXUS stream block by block. `TAXA` blocks
//! populate the taxon namespace, `TREES` blocks are parsed one `TREE`
//! command at a time, and all other blocks are skipped.

use crate::model::{TaxonNamespace, Tree};
use crate::newick::NewickParser;
use crate::nexus::defs::{
    BLOCK_BEGIN, BLOCK_END, BLOCK_END_ALT, DIMENSIONS, NEXUS_HEADER, NEXUS_LABEL_DELIMITERS, NTAX,
    NexusBlock, TAXLABELS, TITLE, TRANSLATE, TREE, TREE_NAME_DELIMITERS, UTREE, WORD_DELIMITERS,
};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParsingError, ParsingErrorType};
use tracing::{debug, trace};

/// Events of a NEXUS stream as seen by readers that group trees by block.
#[derive(Debug)]
pub(crate) enum NexusEvent {
    /// A `TREES` block begins.
    TreesBlock,
    /// A `TREE` command; `None` for a command without tree (`TREE t = ;`).
    Tree(Option<Tree>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Header,
    Blocks,
    Trees,
    Done,
}

// =#========================================================================#=
// NEXUS TREE ITERATOR
// =#========================================================================$=
/// Iterator parsing a NEXUS stream lazily, one `TREE` command per call.
///
/// Yields `Ok(Some(tree))` per tree and `Ok(None)` for a `TREE` command
/// without tree. Trees of all `TREES` blocks are yielded in file order.
/// The first error is yielded and ends iteration.
///
/// Taxa are resolved into the namespace of the [NewickParser] handed in:
/// labels of `TAXLABELS` and `TRANSLATE` are added to it in order, and the
/// keys of a `TRANSLATE` command apply until the end of their block.
///
/// # Example
/// ```
/// use phyloio::model::TaxonNamespace;
/// use phyloio::newick::NewickParser;
/// use phyloio::nexus::NexusTreeIter;
/// use phyloio::parser::ByteParser;
///
/// let input = "#NEXUS
/// BEGIN TREES;
///     TRANSLATE 1 Apteryx_rowi, 2 'Apteryx haastii', 3 Casuarius;
///     TREE first = [&R] ((1,2),3);
/// END;";
/// let taxa = TaxonNamespace::new();
/// let mut iter = NexusTreeIter::new(ByteParser::for_str(input), NewickParser::new(taxa.clone()));
///
/// let tree = iter.next().unwrap().unwrap().unwrap();
/// assert_eq!(tree.name(), Some("first"));
/// assert_eq!(tree.leaf_labels(), vec!["Apteryx rowi", "Apteryx haastii", "Casuarius"]);
/// assert!(iter.next().is_none());
/// ```
pub struct NexusTreeIter<B: ByteSource> {
    byte_parser: ByteParser<B>,
    newick: NewickParser,
    state: State,
    skip_trees: bool,
    num_trees_blocks: usize,
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl<B: ByteSource> NexusTreeIter<B> {
    /// Creates an iterator over the trees of `byte_parser`, parsing tree
    /// statements (and resolving taxa) with `newick`.
    pub fn new(byte_parser: ByteParser<B>, newick: NewickParser) -> Self {
        Self {
            byte_parser,
            newick,
            state: State::Header,
            skip_trees: false,
            num_trees_blocks: 0,
        }
    }

    /// Skip `TREES` blocks like unknown blocks; only taxa are read.
    pub fn with_skip_trees(mut self, skip_trees: bool) -> Self {
        self.skip_trees = skip_trees;
        self
    }

    /// Returns the namespace taxa are resolved into.
    pub fn taxon_namespace(&self) -> &TaxonNamespace {
        self.newick.taxon_namespace()
    }

    /// Number of `TREES` blocks entered so far.
    pub fn num_trees_blocks(&self) -> usize {
        self.num_trees_blocks
    }
}

// ============================================================================
// Event loop (crate)
// ============================================================================
impl<B: ByteSource> NexusTreeIter<B> {
    /// Advances to the next event; `Ok(None)` at the end of the stream.
    pub(crate) fn next_event(&mut self) -> Result<Option<NexusEvent>, ParsingError> {
        loop {
            match self.state {
                State::Done => return Ok(None),
                State::Header => {
                    self.parse_nexus_header()?;
                    self.state = State::Blocks;
                }
                State::Blocks => {
                    self.byte_parser.skip_comment_and_whitespace()?;
                    if self.byte_parser.is_eof() {
                        self.check_io_error()?;
                        self.state = State::Done;
                        return Ok(None);
                    }

                    match self.detect_next_block()? {
                        NexusBlock::Taxa => self.parse_taxa_block()?,
                        NexusBlock::Trees if !self.skip_trees => {
                            self.num_trees_blocks += 1;
                            debug!(block = self.num_trees_blocks, "Entering TREES block");
                            self.state = State::Trees;
                            return Ok(Some(NexusEvent::TreesBlock));
                        }
                        block => {
                            trace!(?block, "Skipping block");
                            self.skip_block()?;
                        }
                    }
                }
                State::Trees => {
                    if let Some(tree) = self.parse_trees_command()? {
                        return Ok(Some(NexusEvent::Tree(tree)));
                    }
                }
            }
        }
    }

    fn check_io_error(&mut self) -> Result<(), ParsingError> {
        match self.byte_parser.take_io_error() {
            Some(err) => Err(ParsingError::from_parser(
                ParsingErrorType::IoError(err.to_string()),
                &mut self.byte_parser,
            )),
            None => Ok(()),
        }
    }
}

impl<B: ByteSource> Iterator for NexusTreeIter<B> {
    type Item = Result<Option<Tree>, ParsingError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.next_event() {
                Ok(Some(NexusEvent::Tree(tree))) => return Some(Ok(tree)),
                Ok(Some(NexusEvent::TreesBlock)) => continue,
                Ok(None) => return None,
                Err(err) => {
                    self.state = State::Done;
                    return Some(Err(err));
                }
            }
        }
    }
}

// ============================================================================
// Header & Blocks
// ============================================================================
impl<B: ByteSource> NexusTreeIter<B> {
    /// Checks for the `#NEXUS` header (case-insensitive), which may be
    /// preceded by whitespace and comments.
    fn parse_nexus_header(&mut self) -> Result<(), ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        if !self.byte_parser.consume_if_sequence(NEXUS_HEADER) {
            self.check_io_error()?;
            return Err(ParsingError::missing_nexus_header(&mut self.byte_parser));
        }
        Ok(())
    }

    /// Parses `BEGIN <name>;` and returns the block type.
    fn detect_next_block(&mut self) -> Result<NexusBlock, ParsingError> {
        let word = self.read_word()?;
        if !word.eq_ignore_ascii_case(BLOCK_BEGIN) {
            return Err(ParsingError::invalid_block(
                &mut self.byte_parser,
                format!("Expected '{BLOCK_BEGIN}' but found {:?}", word),
            ));
        }

        let name = self.read_word()?;
        self.expect_semicolon(|parser, msg| ParsingError::invalid_block(parser, msg))?;
        Ok(NexusBlock::from_name(&name))
    }

    /// Skips commands until `END;` or `ENDBLOCK;`.
    fn skip_block(&mut self) -> Result<(), ParsingError> {
        loop {
            let word = self.read_word()?;
            if is_block_end(&word) {
                return self.expect_semicolon(|parser, msg| ParsingError::invalid_block(parser, msg));
            }
            self.skip_command()?;
        }
    }

    /// Consumes everything up to and including the next `;` that is neither
    /// quoted nor inside a comment.
    fn skip_command(&mut self) -> Result<(), ParsingError> {
        loop {
            match self.byte_parser.peek() {
                Some(b';') => {
                    self.byte_parser.next_byte();
                    return Ok(());
                }
                Some(b'\'') => {
                    self.byte_parser.parse_quoted_label()?;
                }
                Some(b'[') => {
                    self.byte_parser.skip_comment()?;
                }
                Some(_) => {
                    self.byte_parser.next_byte();
                }
                None => {
                    self.check_io_error()?;
                    return Err(ParsingError::unexpected_eof(&mut self.byte_parser));
                }
            }
        }
    }
}

// ============================================================================
// Taxa block
// ============================================================================
impl<B: ByteSource> NexusTreeIter<B> {
    /// Parses a `TAXA` block: `DIMENSIONS NTAX=n;` and `TAXLABELS ...;`.
    /// If a dimension is given, it has to match the number of labels.
    fn parse_taxa_block(&mut self) -> Result<(), ParsingError> {
        let mut ntax = None;
        let mut num_labels = 0;

        loop {
            let word = self.read_word()?;
            if is_block_end(&word) {
                self.expect_semicolon(|parser, msg| ParsingError::invalid_taxa_block(parser, msg))?;
                break;
            } else if word.eq_ignore_ascii_case(DIMENSIONS) {
                ntax = self.parse_taxa_dimensions()?.or(ntax);
            } else if word.eq_ignore_ascii_case(TAXLABELS) {
                num_labels += self.parse_taxa_labels()?;
            } else if word.is_empty() {
                return Err(self.unexpected_char(|parser, msg| {
                    ParsingError::invalid_taxa_block(parser, msg)
                }));
            } else {
                self.skip_command()?;
            }
        }

        if let Some(ntax) = ntax.filter(|&ntax| ntax != num_labels) {
            return Err(ParsingError::invalid_taxa_block(
                &mut self.byte_parser,
                format!("Declared {NTAX}={ntax} but found {num_labels} labels"),
            ));
        }

        debug!(taxa = num_labels, "Parsed TAXA block");
        Ok(())
    }

    /// Parses the rest of a `DIMENSIONS` command, returning `NTAX` if given.
    fn parse_taxa_dimensions(&mut self) -> Result<Option<usize>, ParsingError> {
        let mut ntax = None;
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.consume_if(b';') {
                return Ok(ntax);
            }

            let key = self.read_word()?;
            if key.is_empty() {
                return Err(self.unexpected_char(|parser, msg| {
                    ParsingError::invalid_taxa_block(parser, msg)
                }));
            }
            self.byte_parser.skip_comment_and_whitespace()?;
            if !self.byte_parser.consume_if(b'=') {
                continue;
            }

            let value = self.read_word()?;
            if key.eq_ignore_ascii_case(NTAX) {
                let parsed = value.parse::<usize>().map_err(|_| {
                    ParsingError::invalid_taxa_block(
                        &mut self.byte_parser,
                        format!("Invalid {NTAX} value {:?}", value),
                    )
                })?;
                ntax = Some(parsed);
            }
        }
    }

    /// Parses the labels of a `TAXLABELS` command into the namespace and
    /// returns their number.
    fn parse_taxa_labels(&mut self) -> Result<usize, ParsingError> {
        let mut count = 0;
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.consume_if(b';') {
                return Ok(count);
            }

            let label = self
                .newick
                .parse_label_token(&mut self.byte_parser, NEXUS_LABEL_DELIMITERS)?;
            if label.is_empty() {
                return Err(self.unexpected_char(|parser, msg| {
                    ParsingError::invalid_taxa_block(parser, msg)
                }));
            }
            self.newick.taxon_namespace().require_taxon(&label);
            count += 1;
        }
    }
}

// ============================================================================
// Trees block
// ============================================================================
impl<B: ByteSource> NexusTreeIter<B> {
    /// Parses the next command of a `TREES` block.
    ///
    /// # Returns
    /// * `Ok(Some(tree))` - A `TREE` command was parsed
    /// * `Ok(None)` - Another command (or the block end) was consumed
    fn parse_trees_command(&mut self) -> Result<Option<Option<Tree>>, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        if self.byte_parser.consume_if(b';') {
            return Ok(None);
        }

        let word = self.read_word()?;
        if is_block_end(&word) {
            self.expect_semicolon(|parser, msg| ParsingError::invalid_trees_block(parser, msg))?;
            self.newick.clear_translation();
            self.state = State::Blocks;
            Ok(None)
        } else if word.eq_ignore_ascii_case(TREE) {
            self.parse_single_tree(false).map(Some)
        } else if word.eq_ignore_ascii_case(UTREE) {
            self.parse_single_tree(true).map(Some)
        } else if word.eq_ignore_ascii_case(TRANSLATE) {
            self.parse_tree_block_translate()?;
            Ok(None)
        } else if word.is_empty() {
            Err(self.unexpected_char(|parser, msg| ParsingError::invalid_trees_block(parser, msg)))
        } else {
            if !word.eq_ignore_ascii_case(TITLE) {
                trace!(command = %word, "Skipping command in TREES block");
            }
            self.skip_command()?;
            Ok(None)
        }
    }

    /// Parses `TRANSLATE key label, key label, ...;`.
    ///
    /// Keys are read like leaf labels, so that they match the tokens of the
    /// tree statements that follow. Labels are resolved to taxa right away.
    fn parse_tree_block_translate(&mut self) -> Result<(), ParsingError> {
        let mut count = 0;
        loop {
            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.consume_if(b';') {
                break;
            }

            let key = self
                .newick
                .parse_label_token(&mut self.byte_parser, NEXUS_LABEL_DELIMITERS)?;
            let label = self
                .newick
                .parse_label_token(&mut self.byte_parser, NEXUS_LABEL_DELIMITERS)?;
            if key.is_empty() || label.is_empty() {
                return Err(self.unexpected_char(|parser, msg| {
                    ParsingError::invalid_trees_block(parser, msg)
                }));
            }

            let taxon = self.newick.taxon_namespace().require_taxon(&label);
            self.newick.add_translation(key, taxon);
            count += 1;

            self.byte_parser.skip_comment_and_whitespace()?;
            if self.byte_parser.consume_if(b';') {
                break;
            }
            if !self.byte_parser.consume_if(b',') {
                return Err(self.unexpected_char(|parser, msg| {
                    ParsingError::invalid_trees_block(parser, msg)
                }));
            }
        }

        debug!(entries = count, "Parsed TRANSLATE command");
        Ok(())
    }

    /// Parses the rest of `TREE [*] name = [&R] newick;`.
    fn parse_single_tree(&mut self, unrooted_command: bool) -> Result<Option<Tree>, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        self.byte_parser.consume_if(b'*');

        let name = self
            .newick
            .parse_label_token(&mut self.byte_parser, TREE_NAME_DELIMITERS)?;
        self.byte_parser.skip_comment_and_whitespace()?;
        if !self.byte_parser.consume_if(b'=') {
            return Err(ParsingError::invalid_trees_block(
                &mut self.byte_parser,
                format!("Expected '=' after tree name {:?}", name),
            ));
        }

        let mut tree = self.newick.parse_tree(&mut self.byte_parser)?;
        if let Some(tree) = tree.as_mut() {
            if !name.is_empty() {
                tree.set_name(name);
            }
            if unrooted_command && tree.is_rooted().is_none() {
                tree.set_rooted(Some(false));
            }
        }
        Ok(tree)
    }
}

// ============================================================================
// Helpers
// ============================================================================
impl<B: ByteSource> NexusTreeIter<B> {
    /// Reads the next command word (skipping whitespace and comments).
    /// Returns an empty string if the next character cannot start a word.
    fn read_word(&mut self) -> Result<String, ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        if self.byte_parser.is_eof() {
            self.check_io_error()?;
            return Err(ParsingError::unexpected_eof(&mut self.byte_parser));
        }
        self.byte_parser.parse_label(WORD_DELIMITERS)
    }

    fn expect_semicolon(
        &mut self,
        error: impl FnOnce(&mut ByteParser<B>, String) -> ParsingError,
    ) -> Result<(), ParsingError> {
        self.byte_parser.skip_comment_and_whitespace()?;
        if self.byte_parser.consume_if(b';') {
            return Ok(());
        }
        let next_char = self.byte_parser.peek().map(char::from);
        Err(error(
            &mut self.byte_parser,
            format!("Expected ';' but found {:?}", next_char),
        ))
    }

    fn unexpected_char(
        &mut self,
        error: impl FnOnce(&mut ByteParser<B>, String) -> ParsingError,
    ) -> ParsingError {
        match self.byte_parser.peek() {
            Some(b) => error(
                &mut self.byte_parser,
                format!("Unexpected character {:?}", char::from(b)),
            ),
            None => ParsingError::unexpected_eof(&mut self.byte_parser),
        }
    }
}

fn is_block_end(word: &str) -> bool {
    word.eq_ignore_ascii_case(BLOCK_END) || word.eq_ignore_ascii_case(BLOCK_END_ALT)
}
