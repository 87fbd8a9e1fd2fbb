//! Shared driver for scanner behavior tests
//!
//! Plays the host parser's role: hands the scanner a lexer positioned at
//! the cursor and a valid-symbol set, resumes at the token end on success,
//! and rolls the cursor back on failure — the same boundary rules a real
//! host applies.

// Not every test binary uses every helper.
#![allow(dead_code)]

use zsh_lexer::SliceLexer;
use zsh_scanner::{Scanner, TokenKind, ValidSymbols};

pub struct Session<'a> {
    pub scanner: Scanner,
    pub lexer: SliceLexer<'a>,
}

impl<'a> Session<'a> {
    pub fn new(source: &'a [u8]) -> Session<'a> {
        Session { scanner: Scanner::new(), lexer: SliceLexer::new(source) }
    }

    /// One scan accepting `kinds`; returns the produced kind and its bytes.
    pub fn scan(&mut self, kinds: &[TokenKind]) -> Option<(TokenKind, Vec<u8>)> {
        let start = self.lexer.position();
        self.lexer.begin_token();
        if self.scanner.scan(&mut self.lexer, ValidSymbols::from_kinds(kinds)) {
            let kind = self.lexer.result()?;
            let text = self.lexer.token_bytes().to_vec();
            self.lexer.seek(self.lexer.token_end());
            Some((kind, text))
        } else {
            self.lexer.seek(start);
            None
        }
    }

    /// Scan and assert kind and token text in one step.
    #[track_caller]
    pub fn expect(&mut self, kinds: &[TokenKind], kind: TokenKind, text: &[u8]) {
        match self.scan(kinds) {
            Some((produced, bytes)) => {
                assert_eq!(produced, kind, "wrong kind for {:?}", String::from_utf8_lossy(text));
                assert_eq!(
                    bytes,
                    text,
                    "wrong bytes for {kind:?}: got {:?}",
                    String::from_utf8_lossy(&bytes)
                );
            }
            None => panic!("expected {kind:?} ({:?}), got no token", String::from_utf8_lossy(text)),
        }
    }

    /// Simulate the grammar consuming `count` bytes itself.
    pub fn grammar_consumes(&mut self, count: usize) {
        let position = self.lexer.position();
        self.lexer.seek(position + count);
    }
}
