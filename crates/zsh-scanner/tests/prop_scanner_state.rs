//! Property tests: snapshot round-trips over arbitrary reachable states,
//! and dispatch totality over arbitrary inputs and valid sets.

use proptest::prelude::*;
use zsh_lexer::SliceLexer;
use zsh_scanner::{Scanner, TokenKind, ValidSymbols, SERIALIZATION_BUFFER_SIZE};

/// Wire image of an arbitrary scanner state, built the way `serialize`
/// lays one out.
fn wire_image() -> impl Strategy<Value = Vec<u8>> {
    let header = (any::<u8>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>());
    let contexts = proptest::collection::vec(0u8..=7, 0..6);
    let heredocs = proptest::collection::vec(
        (any::<bool>(), any::<bool>(), any::<bool>(), proptest::collection::vec(any::<u8>(), 0..12)),
        0..4,
    );
    (header, contexts, heredocs).prop_map(|(header, contexts, heredocs)| {
        let (glob_depth, was_quote, saw_outside, was_name, was_dollar) = header;
        let mut image = vec![
            glob_depth,
            was_quote as u8,
            saw_outside as u8,
            contexts.len() as u8,
            heredocs.len() as u8,
            was_name as u8,
            was_dollar as u8,
        ];
        image.extend_from_slice(&contexts);
        for (is_raw, started, allows_indent, delimiter) in heredocs {
            image.push(is_raw as u8);
            image.push(started as u8);
            image.push(allows_indent as u8);
            image.extend_from_slice(&(delimiter.len() as u32).to_le_bytes());
            image.extend_from_slice(&delimiter);
        }
        image
    })
}

fn token_subset() -> impl Strategy<Value = Vec<TokenKind>> {
    proptest::collection::vec(0..TokenKind::COUNT, 0..12).prop_map(|indices| {
        indices.into_iter().filter_map(TokenKind::from_index).collect()
    })
}

proptest! {
    /// Deserialize-then-serialize reproduces every valid image bit-exact,
    /// and deserializing twice lands on the same state.
    #[test]
    fn wire_round_trip_is_identity(image in wire_image()) {
        let mut scanner = Scanner::new();
        prop_assert!(scanner.deserialize(&image).is_ok());

        let mut buffer = [0u8; SERIALIZATION_BUFFER_SIZE];
        let written = scanner.serialize(&mut buffer);
        prop_assert_eq!(&buffer[..written], &image[..]);

        let mut again = Scanner::new();
        prop_assert!(again.deserialize(&buffer[..written]).is_ok());
        prop_assert_eq!(again, scanner);
    }

    /// Arbitrary byte soup never panics the restore path; it either loads
    /// or reports a structured error.
    #[test]
    fn deserialize_is_total(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let mut scanner = Scanner::new();
        let _ = scanner.deserialize(&bytes);
    }

    /// The dispatch is total: any input with any valid set terminates
    /// without panicking, and a failed scan can always be rolled back.
    #[test]
    fn scan_is_total(
        source in proptest::collection::vec(any::<u8>(), 0..48),
        kinds in token_subset(),
    ) {
        let mut scanner = Scanner::new();
        let mut lexer = SliceLexer::new(&source);
        lexer.begin_token();
        let produced = scanner.scan(&mut lexer, ValidSymbols::from_kinds(&kinds));
        if produced {
            prop_assert!(lexer.result().is_some(), "a produced token must carry its kind");
            prop_assert!(lexer.token_end() <= source.len());
        }
    }

    /// Scanning shell-ish text with the full token set enabled stays within
    /// bounds and keeps serializability.
    #[test]
    fn scan_preserves_serializability(source in "[ -~]{0,40}") {
        let mut scanner = Scanner::new();
        let mut lexer = SliceLexer::new(source.as_bytes());
        for _ in 0..8 {
            lexer.begin_token();
            let all: Vec<_> = TokenKind::ALL
                .iter()
                .copied()
                .filter(|kind| *kind != TokenKind::ErrorRecovery)
                .collect();
            if scanner.scan(&mut lexer, ValidSymbols::from_kinds(&all)) {
                lexer.seek(lexer.token_end());
            }
            let mut buffer = [0u8; SERIALIZATION_BUFFER_SIZE];
            let written = scanner.serialize(&mut buffer);
            if written > 0 {
                let mut restored = Scanner::new();
                prop_assert!(restored.deserialize(&buffer[..written]).is_ok());
                prop_assert_eq!(&restored, &scanner);
            }
        }
    }
}

// Longer adversarial runs, opt-in.
#[cfg(feature = "slow_tests")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(4096))]

    #[test]
    fn scan_is_total_slow(
        source in proptest::collection::vec(any::<u8>(), 0..256),
        kinds in token_subset(),
    ) {
        let mut scanner = Scanner::new();
        let mut lexer = SliceLexer::new(&source);
        lexer.begin_token();
        let _ = scanner.scan(&mut lexer, ValidSymbols::from_kinds(&kinds));
    }
}
