//! sscript_scanner: the tokenizer.
//!
//! Converts source text into a token stream with one-token lookahead, a
//! single-slot checkpoint for speculative parsing, and newline tracking
//! for semicolon-insertion decisions.

pub mod char_codes;
mod scanner;
mod token;

pub use scanner::{Scanner, ScannerState};
pub use token::TokenInfo;
