//! sscript_diagnostics: diagnostic messages and error reporting.
//!
//! Diagnostic codes are borrowed from TypeScript's standard code set so
//! that editors and tooling built around those codes keep working. Emission
//! is append-only: recording a diagnostic never fails and never throws.

use sscript_core::text::TextSpan;
use std::fmt;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Info,
    Warning,
    Error,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Info => write!(f, "info"),
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message template with a code and category. The template may
/// contain `{0}`, `{1}`, … placeholders.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The normalized path of the source this diagnostic points into.
    pub file: Option<String>,
    /// The source span this diagnostic covers.
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a diagnostic pointing at a span whose file is not yet known.
    /// The scanner uses this; the parser fills in the file when it drains
    /// scanner diagnostics.
    pub fn at_span(span: TextSpan, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a diagnostic pointing at a span in a file.
    pub fn with_location(
        file: String,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file),
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            f.write_str(file)?;
            if let Some(span) = self.span {
                write!(f, ":{}", span.start)?;
            }
            f.write_str(" - ")?;
        }
        write!(f, "{} TS{}: {}", self.category, self.code, self.message_text)
    }
}

/// Substitute `{0}`, `{1}`, … placeholders in a single pass over the
/// template. A placeholder with no matching argument is kept verbatim.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let placeholder = &rest[open..];
        let Some(close) = placeholder[1..].find('}') else {
            result.push_str(placeholder);
            return result;
        };
        let argument = placeholder[1..close + 1]
            .parse::<usize>()
            .ok()
            .and_then(|index| args.get(index));
        match argument {
            Some(argument) => result.push_str(argument),
            None => result.push_str(&placeholder[..close + 2]),
        }
        rest = &placeholder[close + 2..];
    }
    result.push_str(rest);
    result
}

/// An append-only collection of diagnostics accumulated during a job.
/// A running error count avoids rescanning the list on every
/// `has_errors` query.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.is_error() {
            self.errors += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Move another collection's diagnostics to the end of this one.
    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.errors += other.errors;
        self.diagnostics.extend(other.diagnostics);
    }

    /// Discard diagnostics recorded after `len`. Used to roll back the
    /// side effects of a failed speculative parse.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.diagnostics.len() {
            return;
        }
        for removed in self.diagnostics.drain(len..) {
            if removed.is_error() {
                self.errors -= 1;
            }
        }
    }

    /// Fill in the file of any diagnostic that does not have one yet.
    pub fn assign_file(&mut self, file: &str) {
        for diagnostic in &mut self.diagnostics {
            if diagnostic.file.is_none() {
                diagnostic.file = Some(file.to_string());
            }
        }
    }
}

// ============================================================================
// Diagnostic messages - the subset of TypeScript's codes this parser emits
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
        ($code:expr, Info, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Info, message: $msg }
        };
    }

    // Scanner errors
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1003, Error, "Identifier expected.");
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1005, Error, "'{0}' expected.");
    pub const ASTERISK_SLASH_EXPECTED: DiagnosticMessage = diag!(1010, Error, "'*/' expected.");
    pub const A_REST_PARAMETER_MUST_BE_LAST: DiagnosticMessage = diag!(1014, Error, "A rest parameter must be last in a parameter list.");
    pub const DIGIT_EXPECTED: DiagnosticMessage = diag!(1124, Error, "Digit expected.");
    pub const HEXADECIMAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1125, Error, "Hexadecimal digit expected.");
    pub const UNEXPECTED_END_OF_TEXT: DiagnosticMessage = diag!(1126, Error, "Unexpected end of text.");
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1127, Error, "Invalid character.");
    pub const UNTERMINATED_REGULAR_EXPRESSION_LITERAL: DiagnosticMessage = diag!(1161, Error, "Unterminated regular expression literal.");
    pub const BINARY_DIGIT_EXPECTED: DiagnosticMessage = diag!(1177, Error, "Binary digit expected.");
    pub const OCTAL_DIGIT_EXPECTED: DiagnosticMessage = diag!(1178, Error, "Octal digit expected.");
    pub const UNTERMINATED_UNICODE_ESCAPE_SEQUENCE: DiagnosticMessage = diag!(1199, Error, "Unterminated Unicode escape sequence.");

    // Parser errors
    pub const INITIALIZERS_ARE_NOT_ALLOWED_IN_AMBIENT_CONTEXTS: DiagnosticMessage = diag!(1039, Error, "Initializers are not allowed in ambient contexts.");
    pub const _0_MODIFIER_CANNOT_BE_USED_HERE: DiagnosticMessage = diag!(1042, Error, "'{0}' modifier cannot be used here.");
    pub const TYPE_PARAMETER_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1098, Error, "Type parameter list cannot be empty.");
    pub const TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY: DiagnosticMessage = diag!(1099, Error, "Type argument list cannot be empty.");
    pub const A_RETURN_STATEMENT_CAN_ONLY_BE_USED_WITHIN_A_FUNCTION_BODY: DiagnosticMessage = diag!(1108, Error, "A 'return' statement can only be used within a function body.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1109, Error, "Expression expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage = diag!(1110, Error, "Type expected.");
    pub const DECLARATION_OR_STATEMENT_EXPECTED: DiagnosticMessage = diag!(1128, Error, "Declaration or statement expected.");
    pub const CASE_OR_DEFAULT_EXPECTED: DiagnosticMessage = diag!(1130, Error, "'case' or 'default' expected.");
    pub const STRING_LITERAL_EXPECTED: DiagnosticMessage = diag!(1141, Error, "String literal expected.");
    pub const LINE_BREAK_NOT_PERMITTED_HERE: DiagnosticMessage = diag!(1142, Warning, "Line break not permitted here.");
    pub const AN_IMPLEMENTATION_CANNOT_BE_DECLARED_IN_AMBIENT_CONTEXTS: DiagnosticMessage = diag!(1183, Error, "An implementation cannot be declared in ambient contexts.");
    pub const DECORATORS_ARE_NOT_VALID_HERE: DiagnosticMessage = diag!(1206, Error, "Decorators are not valid here.");
    pub const FUNCTION_IMPLEMENTATION_IS_MISSING: DiagnosticMessage = diag!(1252, Error, "Function implementation is missing or not immediately following the declaration.");

    // Front-end specific (below the TypeScript 1000+ range)
    pub const NOT_IMPLEMENTED_0: DiagnosticMessage = diag!(100, Error, "Not implemented: {0}.");

    // Grammar errors shared with the checker's range
    pub const THE_OPERAND_OF_AN_INCREMENT_OR_DECREMENT_OPERATOR_MUST_BE_A_VARIABLE_OR_A_PROPERTY_ACCESS: DiagnosticMessage = diag!(2357, Error, "The operand of an increment or decrement operator must be a variable or a property access.");
}
