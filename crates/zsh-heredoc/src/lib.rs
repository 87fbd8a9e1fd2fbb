//! Here-document collector for the Zsh scanner.
//!
//! Here-document bodies span parser invocations: the `<<WORD` operator and
//! the delimiter word arrive on one line, the body and terminator on later
//! ones, possibly interleaved with expansions the grammar parses in between.
//! This module holds the state that bridges those invocations — a queue of
//! pending [`Heredoc`] records — and the scanning routines that move each
//! record from pending to in-body to closed.

use tracing::trace;
use zsh_lexer::chars::is_space;
use zsh_lexer::word::advance_word;
use zsh_lexer::Lexer;
use zsh_token::TokenKind;

/// One pending or in-progress here-document.
#[derive(Debug, Clone, Default)]
pub struct Heredoc {
    /// Delimiter was quoted; the body is literal, no expansions inside.
    pub is_raw: bool,
    /// Body scanning has begun; continuation chunks from here on.
    pub started: bool,
    /// The `<<-` form: leading whitespace is stripped before delimiter
    /// comparison.
    pub allows_indent: bool,
    /// Captured bytes of the terminator word.
    pub delimiter: Vec<u8>,
    /// Scratch for end-of-body detection; rebuilt on every attempt.
    current_leading_word: Vec<u8>,
}

// The scratch buffer is working storage, not state: two records that differ
// only in it are the same here-document.
impl PartialEq for Heredoc {
    fn eq(&self, other: &Heredoc) -> bool {
        self.is_raw == other.is_raw
            && self.started == other.started
            && self.allows_indent == other.allows_indent
            && self.delimiter == other.delimiter
    }
}

impl Eq for Heredoc {}

impl Heredoc {
    /// Record for the plain `<<` form.
    pub fn new() -> Heredoc {
        Heredoc::default()
    }

    /// Record for the `<<-` form.
    pub fn with_indent() -> Heredoc {
        Heredoc { allows_indent: true, ..Heredoc::default() }
    }

    /// Clear the record back to a freshly queued one.
    pub fn reset(&mut self) {
        self.is_raw = false;
        self.started = false;
        self.allows_indent = false;
        self.delimiter.clear();
    }

    /// Capture the delimiter word after the `<<` operator.
    ///
    /// Emits `HeredocStart`. An empty capture fails and leaves the
    /// delimiter cleared.
    pub fn scan_start<L: Lexer>(&mut self, lexer: &mut L) -> bool {
        while is_space(lexer.lookahead()) {
            lexer.skip();
        }

        lexer.set_result(TokenKind::HeredocStart);
        self.is_raw = matches!(lexer.lookahead(), b'\'' | b'"' | b'\\');

        if !advance_word(lexer, &mut self.delimiter) {
            self.delimiter.clear();
            return false;
        }
        lexer.mark_end();
        trace!(delimiter = ?String::from_utf8_lossy(&self.delimiter), raw = self.is_raw, "heredoc delimiter captured");
        true
    }

    /// Match the line under the cursor byte-exact against the delimiter,
    /// consuming up to `delimiter.len()` bytes.
    pub fn scan_end_identifier<L: Lexer>(&mut self, lexer: &mut L) -> bool {
        self.current_leading_word.clear();
        while lexer.lookahead() != 0
            && lexer.lookahead() != b'\n'
            && self.current_leading_word.len() < self.delimiter.len()
            && self.delimiter[self.current_leading_word.len()] == lexer.lookahead()
        {
            self.current_leading_word.push(lexer.lookahead());
            lexer.consume();
        }
        !self.delimiter.is_empty() && self.current_leading_word == self.delimiter
    }
}

/// Queue of pending here-documents.
///
/// Records append as `<<` operators are scanned; body and end scanning
/// target the back — the most recently opened — record only, and a record
/// is removed once its terminator matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeredocRegistry {
    records: Vec<Heredoc>,
}

impl HeredocRegistry {
    /// An empty registry.
    pub fn new() -> HeredocRegistry {
        HeredocRegistry::default()
    }

    /// Number of pending records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no here-document is pending.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All pending records, oldest first.
    pub fn records(&self) -> &[Heredoc] {
        &self.records
    }

    /// Drop all pending records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Queue a record for a just-scanned `<<`/`<<-` operator.
    pub fn push(&mut self, heredoc: Heredoc) {
        trace!(pending = self.records.len() + 1, allows_indent = heredoc.allows_indent, "heredoc queued");
        self.records.push(heredoc);
    }

    /// Remove and return the active (most recently opened) record.
    pub fn pop(&mut self) -> Option<Heredoc> {
        let record = self.records.pop();
        if record.is_some() {
            trace!(pending = self.records.len(), "heredoc closed");
        }
        record
    }

    /// The active record.
    pub fn back(&self) -> Option<&Heredoc> {
        self.records.last()
    }

    /// Whether the active record's body has begun.
    pub fn back_started(&self) -> bool {
        self.records.last().is_some_and(|heredoc| heredoc.started)
    }

    /// Capture the delimiter word into the active record.
    pub fn scan_start<L: Lexer>(&mut self, lexer: &mut L) -> bool {
        match self.records.last_mut() {
            Some(heredoc) => heredoc.scan_start(lexer),
            None => false,
        }
    }

    /// Try to match the end delimiter at the cursor; on success the active
    /// record is closed and `HeredocEnd` emitted.
    pub fn scan_end<L: Lexer>(&mut self, lexer: &mut L) -> bool {
        let Some(heredoc) = self.records.last_mut() else {
            return false;
        };
        if heredoc.scan_end_identifier(lexer) {
            self.pop();
            lexer.set_result(TokenKind::HeredocEnd);
            lexer.mark_end();
            return true;
        }
        false
    }

    /// Scan one chunk of the active record's body.
    ///
    /// `middle` and `end` select the first-chunk pair
    /// (`HeredocBodyBeginning` / `SimpleHeredocBody`) or the continuation
    /// pair (`HeredocContent` / `HeredocEnd`). The chunk ends at an
    /// expansion-introducing `$`, at a line that matches the delimiter, or
    /// at end of input once at least one byte was consumed — an
    /// unterminated here-document still closes at EOF.
    pub fn scan_content<L: Lexer>(&mut self, lexer: &mut L, middle: TokenKind, end: TokenKind) -> bool {
        if self.records.is_empty() {
            return false;
        }
        let mut did_advance = false;

        loop {
            match lexer.lookahead() {
                0 => {
                    if lexer.eof() && did_advance {
                        lexer.set_result(end);
                        lexer.mark_end();
                        self.pop();
                        return true;
                    }
                    return false;
                }

                // A backslash consumes the next byte unconditionally.
                b'\\' => {
                    did_advance = true;
                    lexer.consume();
                    lexer.consume();
                }

                b'$' => {
                    let Some(heredoc) = self.records.last_mut() else {
                        return false;
                    };
                    if heredoc.is_raw {
                        did_advance = true;
                        lexer.consume();
                    } else if did_advance {
                        lexer.mark_end();
                        lexer.set_result(middle);
                        heredoc.started = true;
                        lexer.consume();
                        if lexer.lookahead().is_ascii_alphabetic()
                            || lexer.lookahead() == b'{'
                            || lexer.lookahead() == b'('
                        {
                            return true;
                        }
                    } else if middle == TokenKind::HeredocBodyBeginning && lexer.column() == 0 {
                        lexer.set_result(middle);
                        heredoc.started = true;
                        lexer.mark_end();
                        return true;
                    } else {
                        return false;
                    }
                }

                b'\n' => {
                    if did_advance {
                        lexer.consume();
                    } else {
                        lexer.skip();
                    }
                    did_advance = true;
                    let symbol;
                    let matched;
                    {
                        let Some(heredoc) = self.records.last_mut() else {
                            return false;
                        };
                        if heredoc.allows_indent {
                            while is_space(lexer.lookahead()) {
                                lexer.consume();
                            }
                        }
                        symbol = if heredoc.started { middle } else { end };
                        lexer.set_result(symbol);
                        lexer.mark_end();
                        matched = heredoc.scan_end_identifier(lexer);
                    }
                    if matched {
                        if symbol == TokenKind::HeredocEnd {
                            self.pop();
                        }
                        return true;
                    }
                }

                _ => {
                    if lexer.column() == 0 {
                        while is_space(lexer.lookahead()) {
                            if did_advance {
                                lexer.consume();
                            } else {
                                lexer.skip();
                            }
                        }
                        let Some(heredoc) = self.records.last_mut() else {
                            return false;
                        };
                        if end != TokenKind::SimpleHeredocBody {
                            lexer.set_result(middle);
                            if heredoc.scan_end_identifier(lexer) {
                                return true;
                            }
                        } else {
                            lexer.set_result(end);
                            lexer.mark_end();
                            if heredoc.scan_end_identifier(lexer) {
                                return true;
                            }
                        }
                    }
                    did_advance = true;
                    lexer.consume();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zsh_lexer::SliceLexer;

    fn registry_with_one(allows_indent: bool) -> HeredocRegistry {
        let mut registry = HeredocRegistry::new();
        registry.push(if allows_indent { Heredoc::with_indent() } else { Heredoc::new() });
        registry
    }

    #[test]
    fn start_captures_bare_delimiter() {
        let mut registry = registry_with_one(false);
        let mut lexer = SliceLexer::new(b"EOF\nbody\n");
        lexer.begin_token();
        assert!(registry.scan_start(&mut lexer));
        assert_eq!(lexer.result(), Some(TokenKind::HeredocStart));
        let back = registry.back().map(|h| h.delimiter.clone());
        assert_eq!(back.as_deref(), Some(&b"EOF"[..]));
        assert!(!registry.back().is_some_and(|h| h.is_raw));
    }

    #[test]
    fn quoted_delimiter_is_raw() {
        let mut registry = registry_with_one(false);
        let mut lexer = SliceLexer::new(b"'EOF'\n");
        lexer.begin_token();
        assert!(registry.scan_start(&mut lexer));
        assert!(registry.back().is_some_and(|h| h.is_raw));
        assert_eq!(registry.back().map(|h| h.delimiter.clone()).as_deref(), Some(&b"EOF"[..]));
    }

    #[test]
    fn empty_delimiter_fails() {
        let mut registry = registry_with_one(false);
        let mut lexer = SliceLexer::new(b"\n");
        lexer.begin_token();
        assert!(!registry.scan_start(&mut lexer));
        assert!(registry.back().is_some_and(|h| h.delimiter.is_empty()));
    }

    #[test]
    fn simple_body_runs_to_delimiter_line() {
        let mut registry = registry_with_one(false);
        let mut lexer = SliceLexer::new(b"EOF\nhello\nEOF\n");
        lexer.begin_token();
        assert!(registry.scan_start(&mut lexer));
        lexer.seek(lexer.token_end());

        lexer.begin_token();
        assert!(registry.scan_content(
            &mut lexer,
            TokenKind::HeredocBodyBeginning,
            TokenKind::SimpleHeredocBody
        ));
        assert_eq!(lexer.result(), Some(TokenKind::SimpleHeredocBody));
        assert_eq!(lexer.token_bytes(), b"hello\n");
        // Record stays queued until the end delimiter is scanned as its own
        // token.
        assert_eq!(registry.len(), 1);

        lexer.seek(lexer.token_end());
        lexer.begin_token();
        assert!(registry.scan_end(&mut lexer));
        assert_eq!(lexer.result(), Some(TokenKind::HeredocEnd));
        assert_eq!(lexer.token_bytes(), b"EOF");
        assert!(registry.is_empty());
    }

    #[test]
    fn indented_delimiter_matches_with_dash_form() {
        let mut registry = registry_with_one(true);
        let mut lexer = SliceLexer::new(b"EOF\n\thello\n\tEOF\n");
        lexer.begin_token();
        assert!(registry.scan_start(&mut lexer));
        lexer.seek(lexer.token_end());

        lexer.begin_token();
        assert!(registry.scan_content(
            &mut lexer,
            TokenKind::HeredocBodyBeginning,
            TokenKind::SimpleHeredocBody
        ));
        assert_eq!(lexer.result(), Some(TokenKind::SimpleHeredocBody));
        // The terminator line's own indent is consumed with the body chunk;
        // the end token that follows covers just the delimiter word.
        assert_eq!(lexer.token_bytes(), b"\thello\n\t");

        lexer.seek(lexer.token_end());
        lexer.begin_token();
        assert!(registry.scan_end(&mut lexer));
        assert_eq!(lexer.token_bytes(), b"EOF");
        assert!(registry.is_empty());
    }

    #[test]
    fn dollar_splits_interpolated_body() {
        let mut registry = registry_with_one(false);
        let mut lexer = SliceLexer::new(b"EOF\nhi $name\nEOF\n");
        lexer.begin_token();
        assert!(registry.scan_start(&mut lexer));
        lexer.seek(lexer.token_end());

        lexer.begin_token();
        assert!(registry.scan_content(
            &mut lexer,
            TokenKind::HeredocBodyBeginning,
            TokenKind::SimpleHeredocBody
        ));
        assert_eq!(lexer.result(), Some(TokenKind::HeredocBodyBeginning));
        assert_eq!(lexer.token_bytes(), b"hi ");
        assert!(registry.back_started());
    }

    #[test]
    fn raw_body_treats_dollar_as_literal() {
        let mut registry = registry_with_one(false);
        let mut lexer = SliceLexer::new(b"'EOF'\nhi $name\nEOF\n");
        lexer.begin_token();
        assert!(registry.scan_start(&mut lexer));
        lexer.seek(lexer.token_end());

        lexer.begin_token();
        assert!(registry.scan_content(
            &mut lexer,
            TokenKind::HeredocBodyBeginning,
            TokenKind::SimpleHeredocBody
        ));
        assert_eq!(lexer.result(), Some(TokenKind::SimpleHeredocBody));
        assert_eq!(lexer.token_bytes(), b"hi $name\n");
    }

    #[test]
    fn unterminated_body_closes_at_eof() {
        let mut registry = registry_with_one(false);
        let mut lexer = SliceLexer::new(b"EOF\nno terminator here");
        lexer.begin_token();
        assert!(registry.scan_start(&mut lexer));
        lexer.seek(lexer.token_end());

        lexer.begin_token();
        assert!(registry.scan_content(
            &mut lexer,
            TokenKind::HeredocBodyBeginning,
            TokenKind::SimpleHeredocBody
        ));
        assert_eq!(lexer.result(), Some(TokenKind::SimpleHeredocBody));
        assert!(registry.is_empty(), "EOF closes the record");
    }

    #[test]
    fn end_identifier_matches_up_to_delimiter_length() {
        let mut heredoc = Heredoc::new();
        heredoc.delimiter = b"EOF".to_vec();

        let mut lexer = SliceLexer::new(b"EOF\n");
        assert!(heredoc.scan_end_identifier(&mut lexer));

        // Comparison stops at the delimiter's length; trailing bytes are the
        // next token's problem.
        let mut lexer = SliceLexer::new(b"EOFX\n");
        assert!(heredoc.scan_end_identifier(&mut lexer));

        let mut lexer = SliceLexer::new(b"EO\n");
        assert!(!heredoc.scan_end_identifier(&mut lexer));

        let mut lexer = SliceLexer::new(b"EOX\n");
        assert!(!heredoc.scan_end_identifier(&mut lexer));
    }

    #[test]
    fn end_identifier_with_empty_delimiter_never_matches() {
        let mut heredoc = Heredoc::new();
        let mut lexer = SliceLexer::new(b"\n");
        assert!(!heredoc.scan_end_identifier(&mut lexer));
    }

    #[test]
    fn scratch_does_not_affect_equality() {
        let mut left = Heredoc::new();
        left.delimiter = b"EOF".to_vec();
        let mut right = left.clone();

        let mut lexer = SliceLexer::new(b"EO");
        let _ = right.scan_end_identifier(&mut lexer);
        assert_eq!(left, right);
    }
}
