//! Extended-glob subscanner
//!
//! Scans one alternative of an extended glob such as `@(a|b)` or `!(x)`.
//! Balanced `()` / `[]` / `{}` depths are tracked; `|` at depth zero ends
//! the alternative, and the paren depth is carried on the scanner so the
//! next invocation resumes inside the same group. The word `esac` followed
//! by whitespace is refused so case branches are not mis-lexed.

use zsh_lexer::chars::is_space;
use zsh_lexer::Lexer;
use zsh_token::{TokenKind, ValidSymbols};

use crate::Scanner;

struct GlobState {
    done: bool,
    saw_non_word: bool,
    paren_depth: u32,
    bracket_depth: u32,
    brace_depth: u32,
}

impl Scanner {
    /// `None` means the extglob arm does not apply here and the cascade
    /// falls through to the expansion-word arm.
    pub(crate) fn scan_extglob<L: Lexer>(
        &mut self,
        lexer: &mut L,
        valid: ValidSymbols,
    ) -> Option<bool> {
        // Never inside `${…}` — expansion words own those bytes.
        if self.context.in_parameter_expansion() && valid.contains(TokenKind::ExtglobPattern) {
            return Some(false);
        }
        if !valid.contains(TokenKind::ExtglobPattern)
            || valid.in_error_recovery()
            || valid.contains(TokenKind::Regex)
            || valid.contains(TokenKind::RegexNoSlash)
            || valid.contains(TokenKind::RegexNoSpace)
        {
            return None;
        }

        while is_space(lexer.lookahead()) {
            lexer.skip();
        }

        let first = lexer.lookahead();
        let enters = matches!(
            first,
            b'?' | b'*' | b'+' | b'@' | b'!' | b'-' | b')' | b'\\' | b'.' | b'['
        ) || first.is_ascii_alphabetic();
        if !enters {
            self.last_glob_paren_depth = 0;
            return Some(false);
        }

        if lexer.lookahead() == b'\\' {
            lexer.consume();
            if (is_space(lexer.lookahead()) || lexer.lookahead() == b'"')
                && lexer.lookahead() != b'\r'
                && lexer.lookahead() != b'\n'
            {
                lexer.consume();
            } else {
                return Some(false);
            }
        }

        if lexer.lookahead() == b')' && self.last_glob_paren_depth == 0 {
            lexer.mark_end();
            lexer.consume();
            if is_space(lexer.lookahead()) {
                return Some(false);
            }
        }

        lexer.mark_end();
        let was_non_alpha = !lexer.lookahead().is_ascii_alphabetic();
        if lexer.lookahead() != b'[' {
            if lexer.lookahead() == b'e' {
                // Do not swallow `esac`.
                lexer.mark_end();
                lexer.consume();
                if lexer.lookahead() == b's' {
                    lexer.consume();
                    if lexer.lookahead() == b'a' {
                        lexer.consume();
                        if lexer.lookahead() == b'c' {
                            lexer.consume();
                            if is_space(lexer.lookahead()) {
                                return Some(false);
                            }
                        }
                    }
                }
            } else {
                lexer.consume();
            }
        }

        // `-word` alone is just a word; look for something more glob-like.
        if lexer.lookahead() == b'-' {
            lexer.mark_end();
            lexer.consume();
            while lexer.lookahead().is_ascii_alphanumeric() {
                lexer.consume();
            }
            if matches!(lexer.lookahead(), b')' | b'\\' | b'.') {
                return Some(false);
            }
            lexer.mark_end();
        }

        // Case items like `-)` and `*)`.
        if lexer.lookahead() == b')' && self.last_glob_paren_depth == 0 {
            lexer.mark_end();
            lexer.consume();
            if is_space(lexer.lookahead()) {
                lexer.set_result(TokenKind::ExtglobPattern);
                return Some(was_non_alpha);
            }
        }

        if is_space(lexer.lookahead()) {
            lexer.mark_end();
            lexer.set_result(TokenKind::ExtglobPattern);
            self.last_glob_paren_depth = 0;
            return Some(true);
        }

        if lexer.lookahead() == b'$' {
            lexer.mark_end();
            lexer.consume();
            if lexer.lookahead() == b'{' || lexer.lookahead() == b'(' {
                lexer.set_result(TokenKind::ExtglobPattern);
                return Some(true);
            }
        }

        if lexer.lookahead() == b'|' {
            lexer.mark_end();
            lexer.consume();
            lexer.set_result(TokenKind::ExtglobPattern);
            return Some(true);
        }

        if !lexer.lookahead().is_ascii_alphanumeric()
            && !matches!(
                lexer.lookahead(),
                b'(' | b'"' | b'[' | b'?' | b'/' | b'\\' | b'_' | b'*'
            )
        {
            return Some(false);
        }

        let mut state = GlobState {
            done: false,
            saw_non_word: was_non_alpha,
            paren_depth: u32::from(self.last_glob_paren_depth),
            bracket_depth: 0,
            brace_depth: 0,
        };
        while !state.done {
            match lexer.lookahead() {
                0 => return Some(false),
                b'(' => state.paren_depth += 1,
                b'[' => state.bracket_depth += 1,
                b'{' => state.brace_depth += 1,
                b')' => {
                    if state.paren_depth == 0 {
                        state.done = true;
                    } else {
                        state.paren_depth -= 1;
                    }
                }
                b']' => {
                    if state.bracket_depth == 0 {
                        state.done = true;
                    } else {
                        state.bracket_depth -= 1;
                    }
                }
                b'}' => {
                    if state.brace_depth == 0 {
                        state.done = true;
                    } else {
                        state.brace_depth -= 1;
                    }
                }
                _ => {}
            }

            if lexer.lookahead() == b'|' {
                lexer.mark_end();
                lexer.consume();
                if state.paren_depth == 0 && state.bracket_depth == 0 && state.brace_depth == 0 {
                    lexer.set_result(TokenKind::ExtglobPattern);
                    return Some(true);
                }
            }

            if !state.done {
                let was_space = is_space(lexer.lookahead());
                if lexer.lookahead() == b'$' {
                    lexer.mark_end();
                    state.saw_non_word = true;
                    lexer.consume();
                    if lexer.lookahead() == b'(' || lexer.lookahead() == b'{' {
                        // Resume this group in a later invocation, once the
                        // expansion has been parsed.
                        lexer.set_result(TokenKind::ExtglobPattern);
                        self.last_glob_paren_depth = state.paren_depth as u8;
                        return Some(state.saw_non_word);
                    }
                }
                if was_space {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::ExtglobPattern);
                    self.last_glob_paren_depth = 0;
                    return Some(state.saw_non_word);
                }
                if lexer.lookahead() == b'"' {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::ExtglobPattern);
                    self.last_glob_paren_depth = 0;
                    return Some(state.saw_non_word);
                }
                if lexer.lookahead() == b'\\' {
                    lexer.consume();
                    if is_space(lexer.lookahead()) || lexer.lookahead() == b'"' {
                        lexer.consume();
                    }
                } else {
                    if !lexer.lookahead().is_ascii_alphabetic()
                        && lexer.lookahead() != b'.'
                        && lexer.lookahead() != b'\\'
                    {
                        state.saw_non_word = true;
                    }
                    lexer.consume();
                }
                if !was_space {
                    lexer.mark_end();
                }
            }
        }

        lexer.set_result(TokenKind::ExtglobPattern);
        self.last_glob_paren_depth = 0;
        Some(state.saw_non_word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use zsh_lexer::SliceLexer;

    fn scan(source: &[u8]) -> (Option<bool>, Vec<u8>, Scanner) {
        let mut scanner = Scanner::new();
        let mut lexer = SliceLexer::new(source);
        lexer.begin_token();
        let outcome =
            scanner.scan_extglob(&mut lexer, ValidSymbols::from_kinds(&[TokenKind::ExtglobPattern]));
        (outcome, lexer.token_bytes().to_vec(), scanner)
    }

    #[test]
    fn group_pattern_ends_at_whitespace() {
        let (outcome, bytes, _) = scan(b"?(a) x");
        assert_eq!(outcome, Some(true));
        assert_eq!(bytes, b"?(a)");
    }

    #[test]
    fn alternative_ends_at_pipe() {
        // The `|` is consumed tentatively; the token stops before it.
        let (outcome, bytes, _) = scan(b"ab|c) ");
        assert_eq!(outcome, Some(true));
        assert_eq!(bytes, b"ab");
    }

    #[test]
    fn unbalanced_close_ends_the_pattern() {
        let (outcome, bytes, _) = scan(b"a*b) ");
        assert_eq!(outcome, Some(true));
        assert_eq!(bytes, b"a*b");
    }

    #[test]
    fn plain_word_before_close_is_not_a_pattern() {
        // An all-alphabetic case item like `ab)` is the grammar's word.
        let (outcome, _, _) = scan(b"ab) ");
        assert_eq!(outcome, Some(false));
    }

    #[test]
    fn esac_is_refused() {
        let (outcome, _, _) = scan(b"esac\n");
        assert_eq!(outcome, Some(false));
    }

    #[test]
    fn esac_prefix_still_scans() {
        let (outcome, bytes, _) = scan(b"esack* x");
        assert_eq!(outcome, Some(true));
        assert_eq!(bytes, b"esack*");
    }

    #[test]
    fn group_depth_carries_across_invocations() {
        let (outcome, _, scanner) = scan(b"@(a$(b)");
        assert_eq!(outcome, Some(true));
        assert_eq!(
            scanner.last_glob_paren_depth, 1,
            "still one group deep when the expansion interrupts"
        );
    }

    #[test]
    fn refused_inside_parameter_expansion() {
        let mut scanner = Scanner::new();
        scanner.context.push(crate::ContextKind::Parameter);
        let mut lexer = SliceLexer::new(b"*.txt ");
        lexer.begin_token();
        let outcome =
            scanner.scan_extglob(&mut lexer, ValidSymbols::from_kinds(&[TokenKind::ExtglobPattern]));
        assert_eq!(outcome, Some(false));
    }

    #[test]
    fn falls_through_when_regex_is_requested() {
        let mut scanner = Scanner::new();
        let mut lexer = SliceLexer::new(b"*.txt ");
        lexer.begin_token();
        let valid =
            ValidSymbols::from_kinds(&[TokenKind::ExtglobPattern, TokenKind::Regex]);
        assert_eq!(scanner.scan_extglob(&mut lexer, valid), None);
    }

    #[test]
    fn unlikely_lookahead_declines() {
        let (outcome, _, _) = scan(b"%foo");
        assert_eq!(outcome, Some(false));
    }
}
