//! Context-aware external scanner for the Zsh grammar
//!
//! Much of the Z-shell command language cannot be tokenized by a
//! context-free grammar: whether `}` closes a parameter expansion, whether a
//! line belongs to a here-document body, whether `-f` is a test operator —
//! all depend on lexical context the grammar cannot see. The host parser
//! delegates those positions to this scanner: it hands over a lexer cursor
//! and the set of token kinds it would accept, and the scanner either
//! produces exactly one token or declines.
//!
//! # Architecture
//!
//! - **Context stack**: [`ContextStack`] tracks which nested construct
//!   (`${…}`, `$(…)`, `$((…))`, `[[ … ]]`, pattern payloads) the cursor is
//!   inside; dispatch arms consult the top of the stack.
//! - **Here-document registry**: a queue of pending here-documents whose
//!   bodies span parser invocations, re-exported from `zsh_heredoc`.
//! - **Dispatch cascade**: one ordered sequence of arms, each gated on the
//!   valid-symbol set and lookahead; earlier arms win ties. The tail of the
//!   cascade holds the regex, extended-glob, and expansion-word subscanners.
//! - **State snapshots**: [`Scanner::serialize`] / [`Scanner::deserialize`]
//!   capture and restore every field that crosses invocations, so the host
//!   can checkpoint the scanner for incremental re-parsing.
//!
//! # Usage
//!
//! ```rust
//! use zsh_lexer::SliceLexer;
//! use zsh_scanner::Scanner;
//! use zsh_token::{TokenKind, ValidSymbols};
//!
//! let mut scanner = Scanner::new();
//! let mut lexer = SliceLexer::new(b"$foo");
//! let valid = ValidSymbols::from_kinds(&[TokenKind::BareDollar]);
//!
//! assert!(scanner.scan(&mut lexer, valid));
//! assert_eq!(lexer.result(), Some(TokenKind::BareDollar));
//! ```
//!
//! The scan path never fails and never panics; its only signals are the
//! boolean return and the token recorded in the lexer handle. A `false`
//! return leaves scanner flags reset but consumes nothing the host keeps —
//! the parser falls back to its context-free rules.

#![warn(clippy::all)]
#![allow(
    // The dispatch cascade is one long ordered sequence on purpose.
    clippy::too_many_lines,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::struct_excessive_bools
)]

pub mod context;
mod dispatch;
mod expansion;
mod extglob;
mod regex;
pub mod state;

pub use context::{ContextKind, ContextStack};
pub use state::{StateError, SERIALIZATION_BUFFER_SIZE};
pub use zsh_heredoc::{Heredoc, HeredocRegistry};
pub use zsh_lexer::Lexer;
pub use zsh_token::{TokenKind, ValidSymbols};

/// The external scanner.
///
/// One value per parse; all state that must survive between `scan` calls
/// lives here. Create with [`Scanner::new`], snapshot with
/// [`serialize`](Scanner::serialize), restore (or reset, with an empty
/// buffer) with [`deserialize`](Scanner::deserialize). Everything is plain
/// owned data, so the value is cheap to move and safe to send across
/// threads, but a single instance must not be scanned from two threads at
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scanner {
    /// Paren depth carried between invocations of the extglob subscanner,
    /// so `@(a|b|c)` can be scanned one alternative at a time.
    last_glob_paren_depth: u8,
    /// Serialized for wire compatibility; no dispatch arm reads it.
    ext_was_in_double_quote: bool,
    /// Serialized for wire compatibility; no dispatch arm reads it.
    ext_saw_outside_quote: bool,
    context: ContextStack,
    /// A `VariableName` was just emitted; the next invocation suppresses
    /// `Concat` before `[` and hands `#`/`%` to the operator arms.
    just_returned_variable_name: bool,
    /// A `BareDollar` was just emitted; the next invocation routes `{`,
    /// `(`, `((`, `[` into the matching expansion opener.
    just_returned_bare_dollar: bool,
    heredocs: HeredocRegistry,
}

impl Scanner {
    /// A zero-initialized scanner.
    pub fn new() -> Scanner {
        Scanner::default()
    }

    /// Clear all state back to a freshly created scanner.
    pub fn reset(&mut self) {
        self.last_glob_paren_depth = 0;
        self.ext_was_in_double_quote = false;
        self.ext_saw_outside_quote = false;
        self.context.clear();
        self.just_returned_variable_name = false;
        self.just_returned_bare_dollar = false;
        self.heredocs.clear();
    }

    /// The context stack, for host-side inspection.
    pub fn context(&self) -> &ContextStack {
        &self.context
    }

    /// The pending here-document queue, for host-side inspection.
    pub fn heredocs(&self) -> &HeredocRegistry {
        &self.heredocs
    }
}
