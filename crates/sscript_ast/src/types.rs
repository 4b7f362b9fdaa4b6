//! Flag types and small identifiers shared by the AST.

use std::fmt;

bitflags::bitflags! {
    /// Flags recorded on tokens by the scanner.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u16 {
        const NONE               = 0;
        /// A line break appeared between the previous token and this one.
        const PRECEDING_LINE_BREAK = 1 << 0;
        const HEX_SPECIFIER      = 1 << 1;
        const BINARY_SPECIFIER   = 1 << 2;
        const OCTAL_SPECIFIER    = 1 << 3;
        const CONTAINS_SEPARATOR = 1 << 4;
        const SCIENTIFIC         = 1 << 5;
        const UNTERMINATED       = 1 << 6;
    }
}

bitflags::bitflags! {
    /// Declaration modifier flags resolved from leading modifier keywords.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CommonFlags: u16 {
        const NONE      = 0;
        const EXPORT    = 1 << 0;
        const DECLARE   = 1 << 1;
        const CONST     = 1 << 2;
        const LET       = 1 << 3;
        const VAR       = 1 << 4;
        const PUBLIC    = 1 << 5;
        const PRIVATE   = 1 << 6;
        const PROTECTED = 1 << 7;
        const STATIC    = 1 << 8;
        const ABSTRACT  = 1 << 9;
        const GET       = 1 << 10;
        const SET       = 1 << 11;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        const ACCESSOR = Self::GET.bits() | Self::SET.bits();
    }
}

/// The kind of a declaration modifier keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Export,
    Declare,
    Const,
    Public,
    Private,
    Protected,
    Static,
    Abstract,
    Get,
    Set,
}

impl ModifierKind {
    pub fn text(self) -> &'static str {
        match self {
            ModifierKind::Export => "export",
            ModifierKind::Declare => "declare",
            ModifierKind::Const => "const",
            ModifierKind::Public => "public",
            ModifierKind::Private => "private",
            ModifierKind::Protected => "protected",
            ModifierKind::Static => "static",
            ModifierKind::Abstract => "abstract",
            ModifierKind::Get => "get",
            ModifierKind::Set => "set",
        }
    }

    pub fn to_flag(self) -> CommonFlags {
        match self {
            ModifierKind::Export => CommonFlags::EXPORT,
            ModifierKind::Declare => CommonFlags::DECLARE,
            ModifierKind::Const => CommonFlags::CONST,
            ModifierKind::Public => CommonFlags::PUBLIC,
            ModifierKind::Private => CommonFlags::PRIVATE,
            ModifierKind::Protected => CommonFlags::PROTECTED,
            ModifierKind::Static => CommonFlags::STATIC,
            ModifierKind::Abstract => CommonFlags::ABSTRACT,
            ModifierKind::Get => CommonFlags::GET,
            ModifierKind::Set => CommonFlags::SET,
        }
    }
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Identifies a Source within a Program, in parse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

impl SourceId {
    pub const INVALID: SourceId = SourceId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
