//! Regex operand subscanner
//!
//! Scans the right-hand side of `=~` in its three shapes. Three balanced
//! depths are tracked independently for `()`, `[]`, and `{}`; an unescaped
//! single quote suspends balancing until its partner. The live variant
//! decides termination: `Regex` ends on an unbalanced close or whitespace
//! outside parentheses, `RegexNoSlash` additionally on an unescaped `/`,
//! and `RegexNoSpace` needs at least one non-word character before
//! whitespace at depth zero can end it.

use zsh_lexer::chars::is_space;
use zsh_lexer::Lexer;
use zsh_token::{TokenKind, ValidSymbols};

use crate::Scanner;

#[derive(Default)]
struct RegexState {
    done: bool,
    advanced_once: bool,
    found_non_word: bool,
    last_was_escape: bool,
    in_single_quote: bool,
    paren_depth: u32,
    bracket_depth: u32,
    brace_depth: u32,
}

impl Scanner {
    /// `None` means no regex variant applies at this position and the
    /// cascade falls through to the extglob arm.
    pub(crate) fn scan_regex<L: Lexer>(
        &mut self,
        lexer: &mut L,
        valid: ValidSymbols,
    ) -> Option<bool> {
        let any_variant = valid.contains(TokenKind::Regex)
            || valid.contains(TokenKind::RegexNoSlash)
            || valid.contains(TokenKind::RegexNoSpace);
        if !any_variant || valid.in_error_recovery() {
            return None;
        }

        if valid.contains(TokenKind::Regex) || valid.contains(TokenKind::RegexNoSpace) {
            while is_space(lexer.lookahead()) {
                lexer.skip();
            }
        }

        let first = lexer.lookahead();
        let enters = (first != b'"' && first != b'\'')
            || ((first == b'$' || first == b'\'') && valid.contains(TokenKind::RegexNoSlash))
            || (first == b'\'' && valid.contains(TokenKind::RegexNoSpace));
        if !enters {
            return None;
        }

        if lexer.lookahead() == b'$' && valid.contains(TokenKind::RegexNoSlash) {
            lexer.mark_end();
            lexer.consume();
            // `$(` is a command substitution, not regex content.
            if lexer.lookahead() == b'(' {
                return Some(false);
            }
        }

        lexer.mark_end();

        let mut state = RegexState::default();
        while !state.done {
            if state.in_single_quote && lexer.lookahead() == b'\'' {
                state.in_single_quote = false;
                lexer.consume();
                lexer.mark_end();
            }

            if lexer.lookahead() == 0 {
                return Some(false);
            }

            // Balancing is suspended inside a single-quoted stretch; quoted
            // brackets are plain content.
            if !state.in_single_quote {
                match lexer.lookahead() {
                    b'\\' => state.last_was_escape = true,
                    b'(' => {
                        state.paren_depth += 1;
                        state.last_was_escape = false;
                    }
                    b'[' => {
                        state.bracket_depth += 1;
                        state.last_was_escape = false;
                    }
                    b'{' => {
                        if !state.last_was_escape {
                            state.brace_depth += 1;
                        }
                        state.last_was_escape = false;
                    }
                    b')' => {
                        if state.paren_depth == 0 {
                            state.done = true;
                        } else {
                            state.paren_depth -= 1;
                        }
                        state.last_was_escape = false;
                    }
                    b']' => {
                        if state.bracket_depth == 0 {
                            state.done = true;
                        } else {
                            state.bracket_depth -= 1;
                        }
                        state.last_was_escape = false;
                    }
                    b'}' => {
                        if state.brace_depth == 0 {
                            state.done = true;
                        } else {
                            state.brace_depth -= 1;
                        }
                        state.last_was_escape = false;
                    }
                    b'\'' => {
                        state.in_single_quote = true;
                        lexer.consume();
                        state.advanced_once = true;
                        state.last_was_escape = false;
                        continue;
                    }
                    _ => state.last_was_escape = false,
                }
            }

            if state.done {
                break;
            }

            if valid.contains(TokenKind::Regex) {
                let was_space = !state.in_single_quote && is_space(lexer.lookahead());
                lexer.consume();
                state.advanced_once = true;
                if !was_space || state.paren_depth > 0 {
                    lexer.mark_end();
                }
            } else if valid.contains(TokenKind::RegexNoSlash) {
                if lexer.lookahead() == b'/' {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::RegexNoSlash);
                    return Some(state.advanced_once);
                }
                if lexer.lookahead() == b'\\' {
                    lexer.consume();
                    state.advanced_once = true;
                    if !lexer.eof() && lexer.lookahead() != b'[' && lexer.lookahead() != b'/' {
                        lexer.consume();
                        lexer.mark_end();
                    }
                } else {
                    let was_space = !state.in_single_quote && is_space(lexer.lookahead());
                    lexer.consume();
                    state.advanced_once = true;
                    if !was_space {
                        lexer.mark_end();
                    }
                }
            } else if valid.contains(TokenKind::RegexNoSpace) {
                if lexer.lookahead() == b'\\' {
                    state.found_non_word = true;
                    lexer.consume();
                    if !lexer.eof() {
                        lexer.consume();
                    }
                } else if lexer.lookahead() == b'$' {
                    lexer.mark_end();
                    lexer.consume();
                    if lexer.lookahead() == b'(' {
                        return Some(false);
                    }
                    // A trailing `$` anchor always reads as regex.
                    if is_space(lexer.lookahead()) {
                        lexer.set_result(TokenKind::RegexNoSpace);
                        lexer.mark_end();
                        return Some(true);
                    }
                } else {
                    let was_space = !state.in_single_quote && is_space(lexer.lookahead());
                    if was_space && state.paren_depth == 0 {
                        lexer.mark_end();
                        lexer.set_result(TokenKind::RegexNoSpace);
                        return Some(state.found_non_word);
                    }
                    if !lexer.lookahead().is_ascii_alphanumeric()
                        && !matches!(lexer.lookahead(), b'$' | b'-' | b'_')
                    {
                        state.found_non_word = true;
                    }
                    lexer.consume();
                }
            }
        }

        lexer.set_result(if valid.contains(TokenKind::RegexNoSlash) {
            TokenKind::RegexNoSlash
        } else if valid.contains(TokenKind::RegexNoSpace) {
            TokenKind::RegexNoSpace
        } else {
            TokenKind::Regex
        });
        if valid.contains(TokenKind::Regex) && !state.advanced_once {
            return Some(false);
        }
        Some(true)
    }
}
