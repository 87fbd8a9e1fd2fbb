//! Unquoted word capture
//!
//! Consumes a word in POSIX parlance and returns it unquoted. This is an
//! approximate reading: it performs no substitution and assumes the default
//! IFS, which is all the here-document delimiter grammar needs.

use crate::chars::is_space;
use crate::Lexer;

/// Consume one word, appending its unquoted bytes to `unquoted_word`.
///
/// A leading `'` or `"` switches to quoted capture, ended by the matching
/// quote or a line break; a backslash always captures the following byte.
/// Returns false when nothing was captured or the input ended mid-escape
/// (the buffer may hold a partial word then; callers reset it).
pub fn advance_word<L: Lexer>(lexer: &mut L, unquoted_word: &mut Vec<u8>) -> bool {
    let mut empty = true;

    let mut quote = 0u8;
    if lexer.lookahead() == b'\'' || lexer.lookahead() == b'"' {
        quote = lexer.lookahead();
        lexer.consume();
    }

    loop {
        let byte = lexer.lookahead();
        if byte == 0 {
            break;
        }
        let at_terminator = if quote != 0 {
            byte == quote || byte == b'\r' || byte == b'\n'
        } else {
            is_space(byte)
        };
        if at_terminator {
            break;
        }
        if byte == b'\\' {
            lexer.consume();
            if lexer.lookahead() == 0 {
                return false;
            }
        }
        empty = false;
        unquoted_word.push(lexer.lookahead());
        lexer.consume();
    }

    if quote != 0 && lexer.lookahead() == quote {
        lexer.consume();
    }

    !empty
}
