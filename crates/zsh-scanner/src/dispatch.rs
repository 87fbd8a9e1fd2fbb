//! The disambiguation cascade
//!
//! One ordered sequence of arms, each gated on the valid-symbol set and a
//! little lookahead. An arm that matches consumes, records its token kind,
//! and returns immediately; an arm that declines leaves the rest of the
//! cascade to try. Order is load-bearing: earlier arms win ties.
//!
//! The cascade tail — regex, extglob, expansion word, brace range — keeps
//! the fall-through reachability of the original dispatch: an arm that
//! declines without producing falls into the next, and several earlier arms
//! jump into the tail midway.

use std::mem;

use tracing::trace;
use zsh_heredoc::Heredoc;
use zsh_lexer::chars::{is_space, is_special_variable, is_word_continue, is_word_start};
use zsh_lexer::Lexer;
use zsh_token::{TokenKind, ValidSymbols};

use crate::context::ContextKind;
use crate::Scanner;

/// Flag characters of a `(#…)` extended-glob group:
/// `[.iqbmnsBINUXcelfaCo0-9]`.
fn is_glob_flag(byte: u8) -> bool {
    byte.is_ascii_digit()
        || matches!(
            byte,
            b'.' | b'i'
                | b'q'
                | b'b'
                | b'm'
                | b'n'
                | b's'
                | b'B'
                | b'I'
                | b'N'
                | b'U'
                | b'X'
                | b'c'
                | b'e'
                | b'l'
                | b'f'
                | b'a'
                | b'C'
                | b'o'
        )
}

/// Scan a `$` standing alone, valid only before whitespace, EOF, or a
/// double quote.
fn scan_lone_dollar<L: Lexer>(lexer: &mut L) -> bool {
    while is_space(lexer.lookahead()) && lexer.lookahead() != b'\n' && !lexer.eof() {
        lexer.skip();
    }

    if lexer.lookahead() == b'$' {
        lexer.consume();
        lexer.set_result(TokenKind::BareDollar);
        lexer.mark_end();
        return is_space(lexer.lookahead()) || lexer.eof() || lexer.lookahead() == b'"';
    }

    false
}

impl Scanner {
    /// Decide whether the upcoming bytes form one of the tokens in `valid`;
    /// on success the kind is recorded in the lexer and the token's byte
    /// range delimited with its end mark.
    pub fn scan<L: Lexer>(&mut self, lexer: &mut L, valid: ValidSymbols) -> bool {
        // Capture and clear the cross-invocation flags; the arm that emits
        // the relevant token re-arms them for the next call.
        let was_variable_name = mem::take(&mut self.just_returned_variable_name);
        let was_bare_dollar = mem::take(&mut self.just_returned_bare_dollar);

        trace!(lookahead = lexer.lookahead(), "scan");

        // Absorb a run of newlines into a single token.
        if valid.contains(TokenKind::Newline)
            && !valid.in_error_recovery()
            && lexer.lookahead() == b'\n'
        {
            while lexer.lookahead() == b'\n' {
                lexer.skip();
            }
            lexer.mark_end();
            lexer.set_result(TokenKind::Newline);
            return true;
        }

        // `}` closing the parameter expansion the cursor is inside. The
        // pattern payload and its underlying parameter context close on the
        // same brace. A brace-expansion `}` is the grammar's token, not
        // ours.
        if lexer.lookahead() == b'}'
            && valid.contains(TokenKind::ClosingBrace)
            && !valid.in_error_recovery()
        {
            let active = self.context.current();
            if active.is_parameter_expansion() {
                self.context.pop_expect(active);
                if active != ContextKind::Parameter
                    && self.context.current() == ContextKind::Parameter
                {
                    self.context.pop();
                }
                lexer.set_result(TokenKind::ClosingBrace);
                lexer.consume();
                lexer.mark_end();
                return true;
            }
        }

        if valid.contains(TokenKind::Concat) && !valid.in_error_recovery() {
            let context = self.context.current();
            let la = lexer.lookahead();
            let separates = la == 0
                || is_space(la)
                || la == b'>'
                || la == b'<'
                || (la == b')' && valid.contains(TokenKind::ClosingParen))
                || la == b'('
                || la == b';'
                || la == b'&'
                || la == b'|'
                || (la == b'}' && context.is_brace_delimited())
                || (la == b']' && valid.contains(TokenKind::ClosingBracket))
                || (la == b'[' && was_variable_name);
            if !separates {
                lexer.set_result(TokenKind::Concat);
                // For a`b` the concat is real only when the closing
                // backtick is followed by whitespace.
                if la == b'`' {
                    lexer.mark_end();
                    lexer.consume();
                    while lexer.lookahead() != b'`' && !lexer.eof() {
                        lexer.consume();
                    }
                    if lexer.eof() {
                        return false;
                    }
                    if lexer.lookahead() == b'`' {
                        lexer.consume();
                    }
                    return is_space(lexer.lookahead()) || lexer.eof();
                }
                // Escaped quotes and backslashes inside expansion-bearing
                // strings still concatenate.
                if la == b'\\' {
                    lexer.mark_end();
                    lexer.consume();
                    if matches!(lexer.lookahead(), b'"' | b'\'' | b'\\') {
                        return true;
                    }
                    if lexer.eof() {
                        return false;
                    }
                } else {
                    return true;
                }
            }
            if is_space(lexer.lookahead())
                && context.is_brace_delimited()
                && !valid.contains(TokenKind::ExpansionWord)
            {
                lexer.set_result(TokenKind::Concat);
                return true;
            }
        }

        if valid.contains(TokenKind::BareDollar) && !valid.in_error_recovery() {
            // Skip blanks only when actually present; whitespace stays
            // significant for concatenation.
            while matches!(lexer.lookahead(), b' ' | b'\t') && !lexer.eof() {
                lexer.skip();
            }

            if lexer.lookahead() == b'$' {
                lexer.consume();
                if lexer.lookahead() != b'"' {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::BareDollar);
                    self.just_returned_bare_dollar = true;
                    return true;
                }
                return false;
            }
        }

        // Must come after the consuming dollar arm.
        if valid.contains(TokenKind::PeekBareDollar)
            && !valid.in_error_recovery()
            && lexer.lookahead() == b'$'
        {
            lexer.set_result(TokenKind::PeekBareDollar);
            lexer.mark_end();
            return true;
        }

        if valid.contains(TokenKind::BraceStart)
            && !valid.in_error_recovery()
            && lexer.lookahead() == b'{'
            && was_bare_dollar
        {
            lexer.consume();
            lexer.set_result(TokenKind::BraceStart);
            lexer.mark_end();
            self.context.push(ContextKind::Parameter);
            return true;
        }

        if (valid.contains(TokenKind::OpeningParen)
            || valid.contains(TokenKind::DoubleOpeningParen)
            || valid.contains(TokenKind::ZshExtendedGlobFlags))
            && !valid.in_error_recovery()
        {
            while is_space(lexer.lookahead()) {
                lexer.skip();
            }
            if lexer.lookahead() == b'(' {
                lexer.consume();
                lexer.mark_end();

                if was_bare_dollar {
                    if lexer.lookahead() == b'('
                        && valid.contains(TokenKind::DoubleOpeningParen)
                    {
                        lexer.consume();
                        lexer.mark_end();
                        self.context.push(ContextKind::Arithmetic);
                        lexer.set_result(TokenKind::DoubleOpeningParen);
                        return true;
                    }
                    if valid.contains(TokenKind::OpeningParen) {
                        self.context.push(ContextKind::Command);
                        lexer.set_result(TokenKind::OpeningParen);
                        return true;
                    }
                } else if valid.contains(TokenKind::OpeningParen)
                    || valid.contains(TokenKind::ZshExtendedGlobFlags)
                {
                    if lexer.lookahead() == b'#'
                        && valid.contains(TokenKind::ZshExtendedGlobFlags)
                    {
                        lexer.consume();
                        let mut found_flags = false;
                        while lexer.lookahead() != 0 && is_glob_flag(lexer.lookahead()) {
                            found_flags = true;
                            lexer.consume();
                        }
                        if found_flags && lexer.lookahead() == b')' {
                            lexer.consume();
                            lexer.mark_end();
                            lexer.set_result(TokenKind::ZshExtendedGlobFlags);
                            return true;
                        }
                        // Not a flag group after all.
                        return false;
                    }
                    if valid.contains(TokenKind::OpeningParen) {
                        lexer.set_result(TokenKind::OpeningParen);
                        return true;
                    }
                }
            }
        }

        if (valid.contains(TokenKind::OpeningBracket)
            || valid.contains(TokenKind::TestCommandStart))
            && !valid.in_error_recovery()
        {
            while is_space(lexer.lookahead()) {
                lexer.skip();
            }
            if lexer.lookahead() == b'[' {
                lexer.consume();
                if lexer.lookahead() == b'[' && valid.contains(TokenKind::TestCommandStart) {
                    lexer.consume();
                    lexer.set_result(TokenKind::TestCommandStart);
                    lexer.mark_end();
                    self.context.push(ContextKind::Test);
                    return true;
                }
                if was_bare_dollar && valid.contains(TokenKind::OpeningBracket) {
                    // `$[…]` arithmetic.
                    lexer.set_result(TokenKind::OpeningBracket);
                    lexer.mark_end();
                    self.context.push(ContextKind::Arithmetic);
                    return true;
                }
                if valid.contains(TokenKind::OpeningBracket) {
                    lexer.set_result(TokenKind::OpeningBracket);
                    lexer.mark_end();
                    return true;
                }
            }
        }

        if (valid.contains(TokenKind::TestCommandEnd)
            || valid.contains(TokenKind::ClosingBracket))
            && !valid.in_error_recovery()
        {
            while is_space(lexer.lookahead()) {
                lexer.skip();
            }
            if lexer.lookahead() == b']' {
                lexer.consume();
                if lexer.lookahead() == b']' && valid.contains(TokenKind::TestCommandEnd) {
                    lexer.consume();
                    lexer.set_result(TokenKind::TestCommandEnd);
                    lexer.mark_end();
                    self.context.pop_expect(ContextKind::Test);
                    return true;
                }
                if valid.contains(TokenKind::ClosingBracket) {
                    lexer.set_result(TokenKind::ClosingBracket);
                    lexer.mark_end();
                    return true;
                }
                return false;
            }
        }

        if (valid.contains(TokenKind::ClosingParen)
            || valid.contains(TokenKind::ClosingDoubleParen))
            && !valid.in_error_recovery()
        {
            while is_space(lexer.lookahead()) {
                lexer.skip();
            }
            if lexer.lookahead() == b')' {
                lexer.consume();
                if lexer.lookahead() == b')' && valid.contains(TokenKind::ClosingDoubleParen) {
                    lexer.consume();
                    lexer.set_result(TokenKind::ClosingDoubleParen);
                    lexer.mark_end();
                    self.context.pop_expect(ContextKind::Arithmetic);
                    return true;
                }
                if valid.contains(TokenKind::ClosingParen) {
                    lexer.set_result(TokenKind::ClosingParen);
                    lexer.mark_end();
                    // Command substitutions and subscripts close on the
                    // same token.
                    self.context.pop_expect(ContextKind::Arithmetic);
                    return true;
                }
                return false;
            }
        }

        // Zero-width pattern openers, emitted between a pattern operator
        // and its payload. Skipped when the expansion is about to end.
        if valid.contains(TokenKind::PatternStart)
            && !valid.in_error_recovery()
            && self.context.current() == ContextKind::Parameter
            && lexer.lookahead() != b'}'
        {
            self.context.push(ContextKind::ParamPatternSubstitute);
            lexer.set_result(TokenKind::PatternStart);
            lexer.mark_end();
            return true;
        }

        if valid.contains(TokenKind::PatternSuffixStart)
            && !valid.in_error_recovery()
            && self.context.current() == ContextKind::Parameter
            && lexer.lookahead() != b'}'
        {
            self.context.push(ContextKind::ParamPatternSuffix);
            lexer.set_result(TokenKind::PatternSuffixStart);
            lexer.mark_end();
            return true;
        }

        // Colon operators inside `${…}`: consumed and declined; the
        // grammar owns the `:-` / `:=` / `:?` / `:+` forms.
        if self.context.in_parameter_expansion()
            && lexer.lookahead() == b':'
            && !valid.in_error_recovery()
        {
            lexer.consume();
            return false;
        }

        if self.context.in_parameter_expansion()
            && lexer.lookahead() == b'#'
            && !valid.in_error_recovery()
        {
            lexer.consume();
            if lexer.lookahead() == b'#' {
                if valid.contains(TokenKind::DoubleHashPattern) {
                    lexer.consume();
                    lexer.set_result(TokenKind::DoubleHashPattern);
                    lexer.mark_end();
                    return true;
                }
            } else if valid.contains(TokenKind::HashPattern) {
                lexer.set_result(TokenKind::HashPattern);
                lexer.mark_end();
                return true;
            }
            return false;
        }

        if valid.contains(TokenKind::ImmediateDoubleHash)
            && !valid.in_error_recovery()
            && lexer.lookahead() == b'#'
        {
            lexer.mark_end();
            lexer.consume();
            if lexer.lookahead() == b'#' {
                lexer.consume();
                if lexer.lookahead() != b'}' {
                    lexer.set_result(TokenKind::ImmediateDoubleHash);
                    lexer.mark_end();
                    return true;
                }
            }
        }

        // Array subscript operators `${arr[*]}` / `${arr[@]}`; `*` yields
        // to the regex arms when those are also requested.
        if (valid.contains(TokenKind::ArrayStarToken) || valid.contains(TokenKind::ArrayAtToken))
            && !valid.in_error_recovery()
        {
            let regex_requested = valid.contains(TokenKind::Regex)
                || valid.contains(TokenKind::RegexNoSlash)
                || valid.contains(TokenKind::RegexNoSpace);
            if lexer.lookahead() == b'*'
                && valid.contains(TokenKind::ArrayStarToken)
                && !regex_requested
            {
                lexer.set_result(TokenKind::ArrayStarToken);
                lexer.consume();
                lexer.mark_end();
                return true;
            }
            if lexer.lookahead() == b'@' && valid.contains(TokenKind::ArrayAtToken) {
                lexer.set_result(TokenKind::ArrayAtToken);
                lexer.consume();
                lexer.mark_end();
                return true;
            }
        }

        if valid.contains(TokenKind::EmptyValue)
            && (is_space(lexer.lookahead())
                || lexer.eof()
                || lexer.lookahead() == b';'
                || lexer.lookahead() == b'&')
        {
            lexer.set_result(TokenKind::EmptyValue);
            lexer.mark_end();
            return true;
        }

        if (valid.contains(TokenKind::HeredocBodyBeginning)
            || valid.contains(TokenKind::SimpleHeredocBody))
            && !self.heredocs.is_empty()
            && !self.heredocs.back_started()
            && !valid.in_error_recovery()
        {
            return self.heredocs.scan_content(
                lexer,
                TokenKind::HeredocBodyBeginning,
                TokenKind::SimpleHeredocBody,
            );
        }

        if valid.contains(TokenKind::HeredocEnd)
            && !self.heredocs.is_empty()
            && self.heredocs.scan_end(lexer)
        {
            return true;
        }

        if valid.contains(TokenKind::HeredocContent)
            && !self.heredocs.is_empty()
            && self.heredocs.back_started()
            && !valid.in_error_recovery()
        {
            return self
                .heredocs
                .scan_content(lexer, TokenKind::HeredocContent, TokenKind::HeredocEnd);
        }

        if valid.contains(TokenKind::HeredocStart)
            && !valid.in_error_recovery()
            && !self.heredocs.is_empty()
        {
            return self.heredocs.scan_start(lexer);
        }

        if valid.contains(TokenKind::TestOperator) && !valid.contains(TokenKind::ExpansionWord) {
            while is_space(lexer.lookahead()) && lexer.lookahead() != b'\n' {
                lexer.skip();
            }

            if lexer.lookahead() == b'\\' {
                if valid.contains(TokenKind::ExtglobPattern) {
                    return self.tail_from_extglob(lexer, valid, was_variable_name);
                }
                if valid.contains(TokenKind::RegexNoSpace) {
                    return self.tail_from_regex(lexer, valid, was_variable_name);
                }
                lexer.skip();

                if lexer.eof() {
                    return false;
                }

                // Line continuation: backslash-newline disappears entirely.
                if lexer.lookahead() == b'\r' {
                    lexer.skip();
                    if lexer.lookahead() == b'\n' {
                        lexer.skip();
                    }
                } else if lexer.lookahead() == b'\n' {
                    lexer.skip();
                } else {
                    return false;
                }

                while is_space(lexer.lookahead()) {
                    lexer.skip();
                }
            }

            if lexer.lookahead() == b'\n' && !valid.contains(TokenKind::Newline) {
                lexer.skip();

                while is_space(lexer.lookahead()) {
                    lexer.skip();
                }
            }

            if lexer.lookahead() == b'-' {
                lexer.consume();

                let mut advanced_once = false;
                while lexer.lookahead().is_ascii_alphabetic() {
                    advanced_once = true;
                    lexer.consume();
                }

                if is_space(lexer.lookahead()) && advanced_once {
                    lexer.mark_end();
                    lexer.consume();
                    if lexer.lookahead() == b'}' && self.context.in_parameter_expansion() {
                        // `${x:-f }` — the letters were a default value,
                        // not a test operator.
                        if valid.contains(TokenKind::ExpansionWord) {
                            lexer.mark_end();
                            lexer.set_result(TokenKind::ExpansionWord);
                            return true;
                        }
                        return false;
                    }
                    lexer.set_result(TokenKind::TestOperator);
                    return true;
                }
                if is_space(lexer.lookahead()) && valid.contains(TokenKind::ExtglobPattern) {
                    lexer.set_result(TokenKind::ExtglobPattern);
                    lexer.mark_end();
                    return true;
                }
            }

            if valid.contains(TokenKind::RawDollar)
                && !valid.in_error_recovery()
                && scan_lone_dollar(lexer)
            {
                return true;
            }
        }

        if valid.contains(TokenKind::SimpleVariableName) && !valid.in_error_recovery() {
            while is_space(lexer.lookahead()) {
                lexer.skip();
            }
            if is_word_start(lexer.lookahead()) {
                while is_word_continue(lexer.lookahead()) {
                    lexer.consume();
                }
                lexer.mark_end();
                lexer.set_result(TokenKind::SimpleVariableName);
                return true;
            }
        }

        if valid.contains(TokenKind::SpecialVariableName) && !valid.in_error_recovery() {
            while is_space(lexer.lookahead()) {
                lexer.skip();
            }
            if is_special_variable(lexer.lookahead()) {
                // Inside `${…}`, `#` and `!` are flag operators, not names.
                let flag_char = matches!(lexer.lookahead(), b'#' | b'!');
                let in_param = self.context.in_parameter_expansion();
                lexer.consume();
                if in_param && flag_char {
                    return false;
                }
                lexer.mark_end();
                lexer.set_result(TokenKind::SpecialVariableName);
                return true;
            }
        }

        if (valid.contains(TokenKind::VariableName)
            || valid.contains(TokenKind::FileDescriptor)
            || valid.contains(TokenKind::HeredocArrow))
            && !valid.contains(TokenKind::RegexNoSlash)
            && !valid.in_error_recovery()
        {
            loop {
                let la = lexer.lookahead();
                let skippable = la == b' '
                    || la == b'\t'
                    || la == b'\r'
                    || (la == b'\n' && !valid.contains(TokenKind::Newline));
                if skippable && !valid.contains(TokenKind::ExpansionWord) {
                    lexer.skip();
                } else if la == b'\\' {
                    lexer.skip();

                    if lexer.eof() {
                        lexer.mark_end();
                        lexer.set_result(TokenKind::VariableName);
                        self.just_returned_variable_name = true;
                        return true;
                    }

                    if lexer.lookahead() == b'\r' {
                        lexer.skip();
                    }
                    if lexer.lookahead() == b'\n' {
                        lexer.skip();
                    } else {
                        if lexer.lookahead() == b'\\' && valid.contains(TokenKind::ExpansionWord)
                        {
                            return self.tail_from_expansion_word(lexer, valid, was_variable_name);
                        }
                        return false;
                    }
                } else {
                    break;
                }
            }

            // Leading special characters that may still become other
            // tokens.
            if !valid.contains(TokenKind::ExpansionWord)
                && matches!(lexer.lookahead(), b'*' | b'@' | b'?' | b'-' | b'0' | b'_' | b'#')
            {
                lexer.mark_end();
                lexer.consume();
                if matches!(lexer.lookahead(), b'=' | b'[' | b':' | b'-' | b'%' | b'/') {
                    return false;
                }
                if valid.contains(TokenKind::ExtglobPattern) && is_space(lexer.lookahead()) {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::ExtglobPattern);
                    return true;
                }
            }

            if valid.contains(TokenKind::HeredocArrow) && lexer.lookahead() == b'<' {
                lexer.consume();
                if lexer.lookahead() == b'<' {
                    lexer.consume();
                    if lexer.lookahead() == b'-' {
                        lexer.consume();
                        self.heredocs.push(Heredoc::with_indent());
                        lexer.set_result(TokenKind::HeredocArrowDash);
                    } else if lexer.lookahead() == b'<' || lexer.lookahead() == b'=' {
                        // `<<<` herestrings and `<<=` are the grammar's.
                        return false;
                    } else {
                        self.heredocs.push(Heredoc::new());
                        lexer.set_result(TokenKind::HeredocArrow);
                    }
                    lexer.mark_end();
                    return true;
                }
                return false;
            }

            let mut is_number = true;
            if lexer.lookahead().is_ascii_digit() {
                lexer.consume();
            } else if is_word_start(lexer.lookahead()) {
                is_number = false;
                lexer.consume();
            } else {
                if lexer.lookahead() == b'{' {
                    return self.scan_brace_range(lexer, valid);
                }
                if valid.contains(TokenKind::ExpansionWord) {
                    return self.tail_from_expansion_word(lexer, valid, was_variable_name);
                }
                if valid.contains(TokenKind::ExtglobPattern) {
                    return self.tail_from_extglob(lexer, valid, was_variable_name);
                }
                return false;
            }

            loop {
                if lexer.lookahead().is_ascii_digit() {
                    lexer.consume();
                } else if is_word_start(lexer.lookahead()) {
                    is_number = false;
                    lexer.consume();
                } else {
                    break;
                }
            }

            if is_number
                && valid.contains(TokenKind::FileDescriptor)
                && matches!(lexer.lookahead(), b'>' | b'<')
            {
                lexer.set_result(TokenKind::FileDescriptor);
                lexer.mark_end();
                return true;
            }

            if valid.contains(TokenKind::VariableName) {
                if lexer.lookahead() == b'+' {
                    lexer.mark_end();
                    lexer.consume();
                    if lexer.lookahead() == b'='
                        || lexer.lookahead() == b':'
                        || self.context.in_parameter_expansion()
                    {
                        lexer.set_result(TokenKind::VariableName);
                        self.just_returned_variable_name = true;
                        return true;
                    }
                    return false;
                }
                let la = lexer.lookahead();
                if la == b'='
                    || la == b'['
                    || la == b'%'
                    || la == b'/'
                    || (la == b'#' && !is_number)
                    || la == b'@'
                    || (la == b'-' && self.context.in_parameter_expansion())
                {
                    lexer.mark_end();
                    lexer.set_result(TokenKind::VariableName);
                    self.just_returned_variable_name = true;
                    return true;
                }
                if la == b'?' {
                    lexer.mark_end();
                    lexer.consume();
                    lexer.set_result(TokenKind::VariableName);
                    let produced = lexer.lookahead().is_ascii_alphabetic();
                    self.just_returned_variable_name = produced;
                    return produced;
                }
            }

            return false;
        }

        if valid.contains(TokenKind::BareDollar)
            && !valid.in_error_recovery()
            && scan_lone_dollar(lexer)
        {
            return true;
        }

        self.tail_from_regex(lexer, valid, was_variable_name)
    }

    /// Cascade tail entered at the regex arm.
    fn tail_from_regex<L: Lexer>(
        &mut self,
        lexer: &mut L,
        valid: ValidSymbols,
        was_variable_name: bool,
    ) -> bool {
        if let Some(produced) = self.scan_regex(lexer, valid) {
            return produced;
        }
        self.tail_from_extglob(lexer, valid, was_variable_name)
    }

    /// Cascade tail entered at the extglob arm.
    fn tail_from_extglob<L: Lexer>(
        &mut self,
        lexer: &mut L,
        valid: ValidSymbols,
        was_variable_name: bool,
    ) -> bool {
        if let Some(produced) = self.scan_extglob(lexer, valid) {
            return produced;
        }
        self.tail_from_expansion_word(lexer, valid, was_variable_name)
    }

    /// Cascade tail entered at the expansion-word arm.
    fn tail_from_expansion_word<L: Lexer>(
        &mut self,
        lexer: &mut L,
        valid: ValidSymbols,
        was_variable_name: bool,
    ) -> bool {
        if let Some(produced) = self.scan_expansion_word(lexer, valid, was_variable_name) {
            return produced;
        }
        self.scan_brace_range(lexer, valid)
    }
}
