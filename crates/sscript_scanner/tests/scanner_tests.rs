//! Scanner integration tests covering the checkpoint and token-info
//! surfaces used by the parser.

use sscript_ast::syntax_kind::SyntaxKind;
use sscript_ast::types::TokenFlags;
use sscript_scanner::Scanner;

#[test]
fn token_info_snapshot() {
    let mut scanner = Scanner::new("let answer = 42;");
    scanner.scan();
    scanner.scan();
    let info = scanner.token_info();
    assert_eq!(info.kind, SyntaxKind::Identifier);
    assert_eq!(info.text, "answer");
    assert_eq!(info.pos, 4);
    assert_eq!(info.end, 10);
    assert_eq!(info.len(), 6);
    assert!(!info.has_preceding_line_break());
}

#[test]
fn checkpoint_restores_every_field() {
    let mut scanner = Scanner::new("alpha\nbeta gamma");
    scanner.scan(); // alpha
    let saved = scanner.save_state();

    scanner.scan(); // beta (on a new line)
    assert_eq!(scanner.token_value(), "beta");
    assert!(scanner.has_preceding_line_break());
    scanner.scan(); // gamma

    scanner.restore_state(saved);
    assert_eq!(scanner.token(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "alpha");
    assert!(!scanner.has_preceding_line_break());

    // Scanning resumes exactly where the checkpoint was taken.
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "beta");
}

#[test]
fn unicode_escapes_decode() {
    let mut scanner = Scanner::new(r#""\x41é""#);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "Aé");
    assert!(!scanner.diagnostics().has_errors());
}

#[test]
fn numeric_flags_record_base_and_separators() {
    let mut scanner = Scanner::new("0xFF_FF 0b11 0o7 1e9");
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::HEX_SPECIFIER));
    assert!(scanner.token_flags().contains(TokenFlags::CONTAINS_SEPARATOR));
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::BINARY_SPECIFIER));
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::OCTAL_SPECIFIER));
    scanner.scan();
    assert!(scanner.token_flags().contains(TokenFlags::SCIENTIFIC));
}

#[test]
fn multibyte_source_positions_are_character_offsets() {
    let mut scanner = Scanner::new("let é = 1;");
    assert_eq!(scanner.scan(), SyntaxKind::LetKeyword);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.token_value(), "é");
    assert_eq!(scanner.token_start(), 4);
    assert_eq!(scanner.token_end(), 5);
    assert_eq!(scanner.scan(), SyntaxKind::EqualsToken);
}
