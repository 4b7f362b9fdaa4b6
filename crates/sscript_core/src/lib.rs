//! sscript_core: shared building blocks for the sscript front-end.
//!
//! Provides source text positions and ranges, line maps for diagnostics,
//! identifier interning, and numeric literal decoding. Every other crate
//! in the workspace builds on these types.

pub mod intern;
pub mod numeric;
pub mod text;
