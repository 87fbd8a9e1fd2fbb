//! Expansion-word and brace-range subscanners
//!
//! The expansion-word arm consumes the opaque chunks the grammar cannot
//! type inside `${…}` and `$(…)`: everything up to a quote, a context
//! closer, a pattern operator in operator position, or a `$` that opens a
//! nested expansion. An embedded `(…)` group is consumed transparently.
//! The brace-range arm recognizes the `{N..M}` shape but hands everything
//! after the `{` back to the grammar.

use zsh_lexer::chars::is_space;
use zsh_lexer::Lexer;
use zsh_token::{TokenKind, ValidSymbols};

use crate::Scanner;

impl Scanner {
    /// `None` means expansion words are not wanted here and the cascade
    /// falls through to the brace-range arm.
    pub(crate) fn scan_expansion_word<L: Lexer>(
        &mut self,
        lexer: &mut L,
        valid: ValidSymbols,
        was_variable_name: bool,
    ) -> Option<bool> {
        if !valid.contains(TokenKind::ExpansionWord) {
            return None;
        }
        // Directly after a variable name, `#` and `%` are the suffix/prefix
        // operators, not word content.
        if was_variable_name && matches!(lexer.lookahead(), b'#' | b'%') {
            return Some(false);
        }

        let mut advanced_once = false;
        let mut advanced_space = false;
        loop {
            if lexer.lookahead() == b'"' {
                return Some(false);
            }
            if lexer.lookahead() == b'$' {
                lexer.mark_end();
                lexer.consume();
                if matches!(lexer.lookahead(), b'{' | b'(' | b'\'')
                    || lexer.lookahead().is_ascii_alphanumeric()
                {
                    lexer.set_result(TokenKind::ExpansionWord);
                    return Some(true);
                }
                advanced_once = true;
            }

            if lexer.lookahead() == b'/' && self.context.stops_at_pattern_slash() {
                lexer.mark_end();
                lexer.set_result(TokenKind::ExpansionWord);
                return Some(true);
            }

            if lexer.lookahead() == b'}' && self.context.in_parameter_expansion() {
                lexer.mark_end();
                lexer.set_result(TokenKind::ExpansionWord);
                return Some(true);
            }

            if lexer.lookahead() == b'(' && !(advanced_once || advanced_space) {
                // A parenthesised sub-expression embedded in the word is
                // consumed transparently; nested `$` openers still end the
                // whole word.
                lexer.mark_end();
                lexer.consume();
                while lexer.lookahead() != b')' && !lexer.eof() {
                    if lexer.lookahead() == b'$' {
                        lexer.mark_end();
                        lexer.consume();
                        if matches!(lexer.lookahead(), b'{' | b'(' | b'\'')
                            || lexer.lookahead().is_ascii_alphanumeric()
                        {
                            lexer.set_result(TokenKind::ExpansionWord);
                            return Some(true);
                        }
                        advanced_once = true;
                    } else {
                        if self.context.in_parameter_expansion()
                            && matches!(lexer.lookahead(), b']' | b'#' | b'%' | b':')
                        {
                            lexer.mark_end();
                            lexer.set_result(TokenKind::ExpansionWord);
                            return Some(true);
                        }
                        advanced_once = advanced_once || !is_space(lexer.lookahead());
                        advanced_space = advanced_space || is_space(lexer.lookahead());
                        lexer.consume();
                    }
                }
                lexer.mark_end();
                if lexer.lookahead() == b')' {
                    advanced_once = true;
                    lexer.consume();
                    lexer.mark_end();
                } else {
                    return Some(false);
                }
            }

            if lexer.lookahead() == b'\'' {
                return Some(false);
            }
            if lexer.eof() {
                return Some(false);
            }

            if self.context.in_parameter_expansion() {
                if lexer.lookahead() == b']' {
                    // Subscript close belongs to the grammar.
                    lexer.mark_end();
                    lexer.set_result(TokenKind::ExpansionWord);
                    return Some(true);
                }
                if lexer.lookahead() == b'/'
                    && self.context.stops_at_pattern_slash()
                    && !advanced_once
                {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::ExpansionWord);
                    return Some(true);
                }
            }

            advanced_once = advanced_once || !is_space(lexer.lookahead());
            advanced_space = advanced_space || is_space(lexer.lookahead());
            lexer.consume();
        }
    }

    /// Recognize a `{N..M}` brace range, consuming only the opening `{`.
    pub(crate) fn scan_brace_range<L: Lexer>(
        &mut self,
        lexer: &mut L,
        valid: ValidSymbols,
    ) -> bool {
        if !valid.contains(TokenKind::BraceStart) || valid.in_error_recovery() {
            return false;
        }
        while is_space(lexer.lookahead()) {
            lexer.skip();
        }
        if lexer.lookahead() != b'{' {
            return false;
        }
        lexer.consume();
        lexer.mark_end();

        while lexer.lookahead().is_ascii_digit() {
            lexer.consume();
        }
        if lexer.lookahead() != b'.' {
            return false;
        }
        lexer.consume();
        if lexer.lookahead() != b'.' {
            return false;
        }
        lexer.consume();
        while lexer.lookahead().is_ascii_digit() {
            lexer.consume();
        }
        if lexer.lookahead() != b'}' {
            return false;
        }
        lexer.set_result(TokenKind::BraceStart);
        true
    }
}
