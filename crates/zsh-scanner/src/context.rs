//! Nested-construct tracking
//!
//! The scanner needs to know which shell construct the cursor is lexically
//! inside: `}` closes a parameter expansion only inside `${…}`, `/` is a
//! pattern separator only inside `${var/…/…}`, and so on. A plain stack of
//! tags is enough — openers push, closers pop, and the top tag answers every
//! question dispatch asks.

use tracing::trace;

/// Tag for one nested shell construct.
///
/// Discriminants are the serialization wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ContextKind {
    /// Not inside any tracked construct.
    #[default]
    None = 0,
    /// Parameter expansion: `${…}`
    Parameter = 1,
    /// Arithmetic expansion: `$((…))` or `$[…]`
    Arithmetic = 2,
    /// Command substitution: `$(…)`
    Command = 3,
    /// Test command: `[[ … ]]`
    Test = 4,
    /// Brace expansion: `{a..b}`
    BraceExpansion = 5,
    /// Suffix/prefix removal pattern: `${var#…}` / `${var%…}`
    ParamPatternSuffix = 6,
    /// Substitution pattern: `${var/…/…}`
    ParamPatternSubstitute = 7,
}

impl ContextKind {
    /// Decode a serialized tag byte.
    pub fn from_wire(tag: u8) -> Option<ContextKind> {
        Some(match tag {
            0 => ContextKind::None,
            1 => ContextKind::Parameter,
            2 => ContextKind::Arithmetic,
            3 => ContextKind::Command,
            4 => ContextKind::Test,
            5 => ContextKind::BraceExpansion,
            6 => ContextKind::ParamPatternSuffix,
            7 => ContextKind::ParamPatternSubstitute,
            _ => return None,
        })
    }

    /// Inside `${…}`, including its pattern payloads.
    pub fn is_parameter_expansion(self) -> bool {
        matches!(
            self,
            ContextKind::Parameter
                | ContextKind::ParamPatternSuffix
                | ContextKind::ParamPatternSubstitute
        )
    }

    /// Construct whose word region a bare `}` terminates.
    pub fn is_brace_delimited(self) -> bool {
        self.is_parameter_expansion() || self == ContextKind::BraceExpansion
    }

    /// Inside an expansion proper (not a pattern payload).
    pub fn is_expansion(self) -> bool {
        matches!(self, ContextKind::Parameter | ContextKind::Arithmetic | ContextKind::Command)
    }
}

/// Stack of construct tags; the top is the innermost enclosing construct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextStack {
    tags: Vec<ContextKind>,
}

impl ContextStack {
    /// An empty stack.
    pub fn new() -> ContextStack {
        ContextStack::default()
    }

    /// The innermost construct, or `None` outside all of them.
    pub fn current(&self) -> ContextKind {
        self.tags.last().copied().unwrap_or(ContextKind::None)
    }

    /// Nesting depth.
    pub fn depth(&self) -> usize {
        self.tags.len()
    }

    /// Whether the cursor is outside all tracked constructs.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// All tags, outermost first.
    pub fn tags(&self) -> &[ContextKind] {
        &self.tags
    }

    /// Drop every tag.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Enter a construct.
    pub fn push(&mut self, kind: ContextKind) {
        trace!(?kind, depth = self.tags.len() + 1, "enter context");
        self.tags.push(kind);
    }

    /// Leave the innermost construct; no-op on an empty stack.
    pub fn pop(&mut self) {
        if let Some(kind) = self.tags.pop() {
            trace!(?kind, depth = self.tags.len(), "exit context");
        }
    }

    /// Leave the innermost construct, which the caller expects to be
    /// `expected`. A mismatch still pops — the parser probes the scanner
    /// during error recovery and the stack must never wedge.
    pub fn pop_expect(&mut self, expected: ContextKind) {
        if !self.tags.is_empty() {
            if self.current() != expected {
                trace!(expected = ?expected, actual = ?self.current(), "mismatched context close");
            }
            self.pop();
        }
    }

    /// Inside `${…}` or one of its pattern payloads.
    pub fn in_parameter_expansion(&self) -> bool {
        self.current().is_parameter_expansion()
    }

    /// Whether an unescaped `/` ends the current word (substitution
    /// patterns only).
    pub fn stops_at_pattern_slash(&self) -> bool {
        self.current() == ContextKind::ParamPatternSubstitute
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_stack_reads_none() {
        let stack = ContextStack::new();
        assert_eq!(stack.current(), ContextKind::None);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn push_and_pop_track_innermost() {
        let mut stack = ContextStack::new();
        stack.push(ContextKind::Parameter);
        stack.push(ContextKind::ParamPatternSubstitute);
        assert_eq!(stack.current(), ContextKind::ParamPatternSubstitute);
        assert!(stack.in_parameter_expansion());
        assert!(stack.stops_at_pattern_slash());

        stack.pop();
        assert_eq!(stack.current(), ContextKind::Parameter);
        assert!(!stack.stops_at_pattern_slash());
    }

    #[test]
    fn pop_on_empty_is_idempotent() {
        let mut stack = ContextStack::new();
        stack.pop();
        stack.pop_expect(ContextKind::Test);
        assert_eq!(stack.current(), ContextKind::None);
    }

    #[test]
    fn mismatched_pop_expect_still_pops() {
        let mut stack = ContextStack::new();
        stack.push(ContextKind::Command);
        stack.pop_expect(ContextKind::Arithmetic);
        assert!(stack.is_empty());
    }

    #[test]
    fn predicates() {
        assert!(ContextKind::Parameter.is_parameter_expansion());
        assert!(ContextKind::ParamPatternSuffix.is_parameter_expansion());
        assert!(!ContextKind::Arithmetic.is_parameter_expansion());
        assert!(ContextKind::BraceExpansion.is_brace_delimited());
        assert!(!ContextKind::Test.is_brace_delimited());
        assert!(ContextKind::Command.is_expansion());
        assert!(!ContextKind::ParamPatternSubstitute.is_expansion());
    }

    #[test]
    fn wire_round_trip() {
        for tag in 0u8..=7 {
            let kind = ContextKind::from_wire(tag);
            assert!(kind.is_some_and(|kind| kind as u8 == tag));
        }
        assert_eq!(ContextKind::from_wire(8), None);
    }
}
