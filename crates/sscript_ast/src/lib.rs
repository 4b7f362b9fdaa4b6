//! sscript_ast: syntax kinds and AST node definitions.

pub mod node;
pub mod syntax_kind;
pub mod types;

pub use syntax_kind::SyntaxKind;
