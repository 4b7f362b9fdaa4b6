//! The sscript parser implementation.
//!
//! A recursive descent parser over the scanner's token stream, building
//! arena-allocated AST nodes. Recoverable problems are reported and
//! parsing continues with a best-effort node; unrecoverable problems
//! return `None`, which propagates to the top-level statement loop and
//! aborts the file (already-parsed siblings are kept).

use bumpalo::Bump;
use sscript_ast::node::*;
use sscript_ast::syntax_kind::SyntaxKind;
use sscript_ast::types::{CommonFlags, ModifierKind};
use sscript_core::intern::Interner;
use sscript_core::numeric;
use sscript_core::text::{TextRange, TextSpan};
use sscript_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use sscript_scanner::Scanner;

use crate::precedence::{
    is_right_associative, of_binary_operator, of_unary_prefix_operator, Precedence,
};

/// Maximum recursion depth, bounding deeply nested input.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Allocate a Vec into the arena as a slice.
fn alloc_vec<'a, T>(arena: &'a Bump, vec: Vec<T>) -> &'a [T] {
    if vec.is_empty() {
        return &[];
    }
    arena.alloc_slice_fill_iter(vec)
}

/// The parser produces the top-level statements of one compilation unit.
pub struct Parser<'a> {
    arena: &'a Bump,
    scanner: Scanner,
    /// The unit's normalized path, used for diagnostics and import
    /// resolution.
    file_name: String,
    interner: Interner,
    diagnostics: DiagnosticCollection,
    /// Tracks recursion depth to bound deeply nested input.
    recursion_depth: u32,
    /// Whether we are inside a `declare` (ambient) declaration.
    ambient: bool,
    /// End offset of the most recently consumed token.
    prev_end: u32,
    /// Reused allocation for modifier accumulation.
    reusable_modifiers: Option<Vec<Modifier>>,
}

impl<'a> Parser<'a> {
    pub fn new(
        arena: &'a Bump,
        interner: Interner,
        normalized_path: &str,
        source_text: &str,
    ) -> Self {
        Self {
            arena,
            scanner: Scanner::new(source_text),
            file_name: normalized_path.to_string(),
            interner,
            diagnostics: DiagnosticCollection::new(),
            recursion_depth: 0,
            ambient: false,
            prev_end: 0,
            reusable_modifiers: None,
        }
    }

    /// Parse the unit's top-level statements. An unrecoverable failure
    /// aborts the loop; everything parsed so far is returned along with
    /// the accumulated diagnostics.
    pub fn parse_statements(mut self) -> (Vec<Statement<'a>>, DiagnosticCollection) {
        self.bump();
        let mut statements = Vec::new();
        while self.current() != SyntaxKind::EndOfFileToken {
            match self.parse_top_level_statement() {
                Some(statement) => statements.push(statement),
                None => break,
            }
        }
        let mut diagnostics = self.scanner.take_diagnostics();
        diagnostics.assign_file(&self.file_name);
        diagnostics.extend(self.diagnostics);
        (statements, diagnostics)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current(&self) -> SyntaxKind {
        self.scanner.token()
    }

    #[inline]
    fn token_pos(&self) -> u32 {
        self.scanner.token_start() as u32
    }

    #[inline]
    fn token_end(&self) -> u32 {
        self.scanner.token_end() as u32
    }

    /// Advance to the next token, remembering where the consumed one ended.
    fn bump(&mut self) {
        self.prev_end = self.token_end();
        self.scanner.scan();
    }

    /// Consume the current token iff it matches.
    fn skip(&mut self, kind: SyntaxKind) -> bool {
        if self.current() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Require and consume a token, or report `'{0}' expected` and fail.
    fn expect(&mut self, kind: SyntaxKind) -> Option<()> {
        if self.current() == kind {
            self.bump();
            Some(())
        } else {
            self.error(&messages::_0_EXPECTED, &[kind.token_text()]);
            None
        }
    }

    /// Consume an optional statement-terminating semicolon.
    fn parse_expected_semicolon(&mut self) {
        self.skip(SyntaxKind::SemicolonToken);
    }

    /// Peek at the token after the current one without advancing.
    fn peek(&mut self) -> (SyntaxKind, bool) {
        self.scanner.peek()
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    fn error(&mut self, message: &DiagnosticMessage, args: &[&str]) {
        let span = TextSpan::from_bounds(self.token_pos(), self.token_end());
        self.emit(span, message, args);
    }

    fn error_at(&mut self, range: TextRange, message: &DiagnosticMessage, args: &[&str]) {
        self.emit(range.to_span(), message, args);
    }

    fn emit(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        self.diagnostics.add(Diagnostic::with_location(
            self.file_name.clone(),
            span,
            message,
            args,
        ));
    }

    // ========================================================================
    // Identifiers
    // ========================================================================

    fn make_identifier(&self) -> Identifier {
        let text_name = self.scanner.token_value().to_string();
        Identifier::new(
            self.token_pos(),
            self.token_end(),
            self.interner.intern(&text_name),
            text_name,
        )
    }

    fn parse_identifier(&mut self) -> Option<Identifier> {
        if self.current() == SyntaxKind::Identifier {
            let identifier = self.make_identifier();
            self.bump();
            Some(identifier)
        } else {
            self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            None
        }
    }

    /// Parse a member name, also accepting keywords (`get`, `default`, ...).
    fn parse_member_name(&mut self) -> Option<Identifier> {
        if self.current() == SyntaxKind::Identifier || self.current().is_keyword() {
            let identifier = self.make_identifier();
            self.bump();
            Some(identifier)
        } else {
            self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            None
        }
    }

    fn synthesize_identifier(&self, text: &'static str, pos: u32, end: u32) -> Identifier {
        Identifier::new(pos, end, self.interner.intern(text), text.to_string())
    }

    // ========================================================================
    // Modifier accumulation
    // ========================================================================

    fn take_modifier_list(&mut self) -> Vec<Modifier> {
        match self.reusable_modifiers.take() {
            Some(mut list) => {
                list.clear();
                list
            }
            None => Vec::new(),
        }
    }

    fn return_modifier_list(&mut self, list: Vec<Modifier>) {
        self.reusable_modifiers = Some(list);
    }

    fn push_modifier(&mut self, list: &mut Vec<Modifier>, kind: ModifierKind) {
        let data = NodeData::new(SyntaxKind::Modifier, self.token_pos(), self.token_end());
        list.push(Modifier { data, kind });
        self.bump();
    }

    fn fold_modifiers(list: &[Modifier]) -> CommonFlags {
        list.iter()
            .fold(CommonFlags::NONE, |flags, m| flags | m.kind.to_flag())
    }

    // ========================================================================
    // Top level
    // ========================================================================

    fn parse_top_level_statement(&mut self) -> Option<Statement<'a>> {
        let mut decorators: Vec<Decorator<'a>> = Vec::new();
        while self.current() == SyntaxKind::AtToken {
            decorators.push(self.parse_decorator()?);
        }

        let mut modifiers = self.take_modifier_list();
        loop {
            match self.current() {
                SyntaxKind::ExportKeyword => {
                    if modifiers.iter().any(|m| m.kind == ModifierKind::Export) {
                        self.error(&messages::_0_MODIFIER_CANNOT_BE_USED_HERE, &["export"]);
                        self.bump();
                    } else {
                        self.push_modifier(&mut modifiers, ModifierKind::Export);
                    }
                }
                SyntaxKind::DeclareKeyword => {
                    if modifiers.iter().any(|m| m.kind == ModifierKind::Declare) {
                        self.error(&messages::_0_MODIFIER_CANNOT_BE_USED_HERE, &["declare"]);
                        self.bump();
                    } else {
                        self.push_modifier(&mut modifiers, ModifierKind::Declare);
                        if self.scanner.has_preceding_line_break() {
                            self.error(&messages::LINE_BREAK_NOT_PERMITTED_HERE, &[]);
                        }
                    }
                }
                _ => break,
            }
        }
        let flags = Self::fold_modifiers(&modifiers);
        self.return_modifier_list(modifiers);

        let was_ambient = self.ambient;
        self.ambient = was_ambient || flags.contains(CommonFlags::DECLARE);

        let statement = match self.current() {
            SyntaxKind::ConstKeyword => {
                if self.peek().0 == SyntaxKind::EnumKeyword {
                    self.bump(); // const
                    self.parse_enum(flags | CommonFlags::CONST)
                } else {
                    self.parse_variable_statement(flags | CommonFlags::CONST, true)
                }
            }
            SyntaxKind::LetKeyword => {
                self.parse_variable_statement(flags | CommonFlags::LET, true)
            }
            SyntaxKind::VarKeyword => self.parse_variable_statement(flags | CommonFlags::VAR, true),
            SyntaxKind::EnumKeyword => self.parse_enum(flags),
            SyntaxKind::FunctionKeyword => {
                let consumed = std::mem::take(&mut decorators);
                self.parse_function(flags, consumed)
            }
            SyntaxKind::AbstractKeyword if self.peek().0 == SyntaxKind::ClassKeyword => {
                self.bump(); // abstract
                let consumed = std::mem::take(&mut decorators);
                self.parse_class(flags | CommonFlags::ABSTRACT, consumed)
            }
            SyntaxKind::ClassKeyword => {
                let consumed = std::mem::take(&mut decorators);
                self.parse_class(flags, consumed)
            }
            SyntaxKind::ImportKeyword => {
                if flags.contains(CommonFlags::EXPORT) {
                    self.parse_export_import(flags)
                } else {
                    self.parse_import()
                }
            }
            SyntaxKind::TypeKeyword => {
                // Reserved: type aliases are recognized but not supported.
                self.error(&messages::NOT_IMPLEMENTED_0, &["type aliases"]);
                None
            }
            _ if flags.contains(CommonFlags::EXPORT) => self.parse_export(flags),
            _ => {
                if flags.contains(CommonFlags::DECLARE) {
                    self.error(&messages::_0_MODIFIER_CANNOT_BE_USED_HERE, &["declare"]);
                }
                self.parse_statement(true)
            }
        };
        self.ambient = was_ambient;

        for decorator in &decorators {
            self.error_at(
                decorator.data.range,
                &messages::DECORATORS_ARE_NOT_VALID_HERE,
                &[],
            );
        }

        statement
    }

    fn parse_decorator(&mut self) -> Option<Decorator<'a>> {
        let pos = self.token_pos();
        self.bump(); // @
        let identifier = self.parse_identifier()?;
        let mut name = Expression::Identifier(identifier);
        while self.current() == SyntaxKind::DotToken {
            self.bump();
            let member = self.parse_identifier()?;
            let range = name.range();
            name = Expression::PropertyAccess(PropertyAccessExpression {
                data: NodeData::new(
                    SyntaxKind::PropertyAccessExpression,
                    range.pos,
                    self.prev_end,
                ),
                expression: self.arena.alloc(name),
                name: member,
            });
        }
        let arguments = if self.current() == SyntaxKind::OpenParenToken {
            self.parse_argument_list()?
        } else {
            Vec::new()
        };
        Some(Decorator {
            data: NodeData::new(SyntaxKind::Decorator, pos, self.prev_end),
            name,
            arguments: alloc_vec(self.arena, arguments),
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self, top_level: bool) -> Option<Statement<'a>> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.error(&messages::EXPRESSION_EXPECTED, &[]);
            self.recursion_depth -= 1;
            return None;
        }
        let result = self.parse_statement_inner(top_level);
        self.recursion_depth -= 1;
        result
    }

    fn parse_statement_inner(&mut self, top_level: bool) -> Option<Statement<'a>> {
        match self.current() {
            SyntaxKind::OpenBraceToken => Some(Statement::Block(self.parse_block(top_level)?)),
            SyntaxKind::SemicolonToken => {
                let pos = self.token_pos();
                let end = self.token_end();
                self.bump();
                Some(Statement::Empty(NodeData::new(
                    SyntaxKind::EmptyStatement,
                    pos,
                    end,
                )))
            }
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue()
            }
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(top_level),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::ConstKeyword => {
                self.parse_variable_statement(CommonFlags::CONST, true)
            }
            SyntaxKind::LetKeyword => self.parse_variable_statement(CommonFlags::LET, true),
            SyntaxKind::VarKeyword => self.parse_variable_statement(CommonFlags::VAR, true),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self, top_level: bool) -> Option<Block<'a>> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut statements = Vec::new();
        while self.current() != SyntaxKind::CloseBraceToken {
            if self.current() == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &["}"]);
                return None;
            }
            statements.push(self.parse_statement(top_level)?);
        }
        self.bump(); // }
        Some(Block {
            data: NodeData::new(SyntaxKind::Block, pos, self.prev_end),
            statements: alloc_vec(self.arena, statements),
        })
    }

    fn parse_break_or_continue(&mut self) -> Option<Statement<'a>> {
        let kind = self.current();
        let pos = self.token_pos();
        self.bump();
        // A label only attaches on the same logical line.
        let label = if self.current() == SyntaxKind::Identifier
            && !self.scanner.has_preceding_line_break()
        {
            let identifier = self.make_identifier();
            self.bump();
            Some(identifier)
        } else {
            None
        };
        self.parse_expected_semicolon();
        let statement = if kind == SyntaxKind::BreakKeyword {
            Statement::Break(BreakStatement {
                data: NodeData::new(SyntaxKind::BreakStatement, pos, self.prev_end),
                label,
            })
        } else {
            Statement::Continue(ContinueStatement {
                data: NodeData::new(SyntaxKind::ContinueStatement, pos, self.prev_end),
                label,
            })
        };
        Some(statement)
    }

    fn parse_do_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // do
        let statement = self.parse_statement(false)?;
        self.expect(SyntaxKind::WhileKeyword)?;
        self.expect(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression(Precedence::Comma)?;
        self.expect(SyntaxKind::CloseParenToken)?;
        self.parse_expected_semicolon();
        Some(Statement::Do(DoStatement {
            data: NodeData::new(SyntaxKind::DoStatement, pos, self.prev_end),
            statement: self.arena.alloc(statement),
            condition: self.arena.alloc(condition),
        }))
    }

    fn parse_for_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // for
        self.expect(SyntaxKind::OpenParenToken)?;

        let initializer = if self.skip(SyntaxKind::SemicolonToken) {
            None
        } else if matches!(
            self.current(),
            SyntaxKind::ConstKeyword | SyntaxKind::LetKeyword | SyntaxKind::VarKeyword
        ) {
            let flags = match self.current() {
                SyntaxKind::ConstKeyword => CommonFlags::CONST,
                SyntaxKind::LetKeyword => CommonFlags::LET,
                _ => CommonFlags::VAR,
            };
            let statement = self.parse_variable_statement(flags, false)?;
            self.expect(SyntaxKind::SemicolonToken)?;
            Some(&*self.arena.alloc(statement))
        } else {
            // Only an expression or a variable statement may appear here.
            match self.parse_expression_statement_for_header() {
                Some(statement) => {
                    self.expect(SyntaxKind::SemicolonToken)?;
                    Some(&*self.arena.alloc(statement))
                }
                None => {
                    // Recover by skipping to the initializer's terminator.
                    while !matches!(
                        self.current(),
                        SyntaxKind::SemicolonToken
                            | SyntaxKind::CloseParenToken
                            | SyntaxKind::EndOfFileToken
                    ) {
                        self.bump();
                    }
                    self.skip(SyntaxKind::SemicolonToken);
                    None
                }
            }
        };

        let condition = if self.current() == SyntaxKind::SemicolonToken {
            None
        } else {
            let condition = self.parse_expression(Precedence::Comma)?;
            Some(&*self.arena.alloc(condition))
        };
        self.expect(SyntaxKind::SemicolonToken)?;

        let incrementor = if self.current() == SyntaxKind::CloseParenToken {
            None
        } else {
            let incrementor = self.parse_expression(Precedence::Comma)?;
            Some(&*self.arena.alloc(incrementor))
        };
        self.expect(SyntaxKind::CloseParenToken)?;

        let statement = self.parse_statement(false)?;
        Some(Statement::For(ForStatement {
            data: NodeData::new(SyntaxKind::ForStatement, pos, self.prev_end),
            initializer,
            condition,
            incrementor,
            statement: self.arena.alloc(statement),
        }))
    }

    fn parse_expression_statement_for_header(&mut self) -> Option<Statement<'a>> {
        let expression = self.parse_expression(Precedence::Comma)?;
        let range = expression.range();
        Some(Statement::Expression(ExpressionStatement {
            data: NodeData::new(SyntaxKind::ExpressionStatement, range.pos, range.end),
            expression,
        }))
    }

    fn parse_if_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // if
        self.expect(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression(Precedence::Comma)?;
        self.expect(SyntaxKind::CloseParenToken)?;
        let if_true = self.parse_statement(false)?;
        let if_false = if self.skip(SyntaxKind::ElseKeyword) {
            let statement = self.parse_statement(false)?;
            Some(&*self.arena.alloc(statement))
        } else {
            None
        };
        Some(Statement::If(IfStatement {
            data: NodeData::new(SyntaxKind::IfStatement, pos, self.prev_end),
            condition,
            if_true: self.arena.alloc(if_true),
            if_false,
        }))
    }

    fn parse_return_statement(&mut self, top_level: bool) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        if top_level {
            self.error(
                &messages::A_RETURN_STATEMENT_CAN_ONLY_BE_USED_WITHIN_A_FUNCTION_BODY,
                &[],
            );
        }
        self.bump(); // return
        let expression = if matches!(
            self.current(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.scanner.has_preceding_line_break()
        {
            None
        } else {
            Some(self.parse_expression(Precedence::Comma)?)
        };
        self.parse_expected_semicolon();
        Some(Statement::Return(ReturnStatement {
            data: NodeData::new(SyntaxKind::ReturnStatement, pos, self.prev_end),
            expression,
        }))
    }

    fn parse_switch_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // switch
        self.expect(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression(Precedence::Comma)?;
        self.expect(SyntaxKind::CloseParenToken)?;
        self.expect(SyntaxKind::OpenBraceToken)?;

        let mut cases = Vec::new();
        while self.current() != SyntaxKind::CloseBraceToken {
            let case_pos = self.token_pos();
            let label = match self.current() {
                SyntaxKind::CaseKeyword => {
                    self.bump();
                    let label = self.parse_expression(Precedence::Comma)?;
                    self.expect(SyntaxKind::ColonToken)?;
                    Some(label)
                }
                SyntaxKind::DefaultKeyword => {
                    self.bump();
                    self.expect(SyntaxKind::ColonToken)?;
                    None
                }
                _ => {
                    self.error(&messages::CASE_OR_DEFAULT_EXPECTED, &[]);
                    return None;
                }
            };
            let mut statements = Vec::new();
            while !matches!(
                self.current(),
                SyntaxKind::CaseKeyword
                    | SyntaxKind::DefaultKeyword
                    | SyntaxKind::CloseBraceToken
            ) {
                if self.current() == SyntaxKind::EndOfFileToken {
                    self.error(&messages::_0_EXPECTED, &["}"]);
                    return None;
                }
                statements.push(self.parse_statement(false)?);
            }
            cases.push(SwitchCase {
                data: NodeData::new(SyntaxKind::CaseClause, case_pos, self.prev_end),
                label,
                statements: alloc_vec(self.arena, statements),
            });
        }
        self.bump(); // }
        Some(Statement::Switch(SwitchStatement {
            data: NodeData::new(SyntaxKind::SwitchStatement, pos, self.prev_end),
            condition,
            cases: alloc_vec(self.arena, cases),
        }))
    }

    fn parse_throw_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // throw
        let expression = self.parse_expression(Precedence::Comma)?;
        self.parse_expected_semicolon();
        Some(Statement::Throw(ThrowStatement {
            data: NodeData::new(SyntaxKind::ThrowStatement, pos, self.prev_end),
            expression,
        }))
    }

    fn parse_try_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // try
        let block = self.parse_block(false)?;

        let catch_clause = if self.current() == SyntaxKind::CatchKeyword {
            let catch_pos = self.token_pos();
            self.bump();
            self.expect(SyntaxKind::OpenParenToken)?;
            let variable = self.parse_identifier()?;
            self.expect(SyntaxKind::CloseParenToken)?;
            let catch_block = self.parse_block(false)?;
            Some(CatchClause {
                data: NodeData::new(SyntaxKind::CatchClause, catch_pos, self.prev_end),
                variable,
                block: catch_block,
            })
        } else {
            None
        };

        let finally_block = if self.skip(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block(false)?)
        } else {
            None
        };

        if catch_clause.is_none() && finally_block.is_none() {
            self.error(&messages::_0_EXPECTED, &["catch"]);
        }

        Some(Statement::Try(TryStatement {
            data: NodeData::new(SyntaxKind::TryStatement, pos, self.prev_end),
            block,
            catch_clause,
            finally_block,
        }))
    }

    fn parse_while_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // while
        self.expect(SyntaxKind::OpenParenToken)?;
        let condition = self.parse_expression(Precedence::Comma)?;
        self.expect(SyntaxKind::CloseParenToken)?;
        let statement = self.parse_statement(false)?;
        Some(Statement::While(WhileStatement {
            data: NodeData::new(SyntaxKind::WhileStatement, pos, self.prev_end),
            condition,
            statement: self.arena.alloc(statement),
        }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        let expression = self.parse_expression(Precedence::Comma)?;
        self.parse_expected_semicolon();
        Some(Statement::Expression(ExpressionStatement {
            data: NodeData::new(SyntaxKind::ExpressionStatement, pos, self.prev_end),
            expression,
        }))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_variable_statement(
        &mut self,
        flags: CommonFlags,
        parse_semicolon: bool,
    ) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // const / let / var

        let mut declarations = Vec::new();
        loop {
            let decl_pos = self.token_pos();
            let name = self.parse_identifier()?;
            let type_node = if self.skip(SyntaxKind::ColonToken) {
                Some(self.parse_type(true)?)
            } else {
                None
            };
            let initializer = if self.skip(SyntaxKind::EqualsToken) {
                if self.ambient {
                    self.error(
                        &messages::INITIALIZERS_ARE_NOT_ALLOWED_IN_AMBIENT_CONTEXTS,
                        &[],
                    );
                }
                Some(self.parse_expression(Precedence::Comma.next())?)
            } else {
                None
            };
            if type_node.is_none() && initializer.is_none() {
                self.error_at(name.data.range, &messages::TYPE_EXPECTED, &[]);
            }
            declarations.push(VariableDeclaration {
                data: NodeData::with_flags(
                    SyntaxKind::VariableDeclaration,
                    decl_pos,
                    self.prev_end,
                    flags,
                ),
                name,
                type_node,
                initializer,
            });
            if !self.skip(SyntaxKind::CommaToken) {
                break;
            }
        }
        if parse_semicolon {
            self.parse_expected_semicolon();
        }
        Some(Statement::Variable(VariableStatement {
            data: NodeData::with_flags(SyntaxKind::VariableStatement, pos, self.prev_end, flags),
            declarations: alloc_vec(self.arena, declarations),
        }))
    }

    fn parse_enum(&mut self, flags: CommonFlags) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // enum
        let name = self.parse_identifier()?;
        self.expect(SyntaxKind::OpenBraceToken)?;

        let mut values = Vec::new();
        while self.current() != SyntaxKind::CloseBraceToken {
            if self.current() == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &["}"]);
                return None;
            }
            let value_pos = self.token_pos();
            let value_name = self.parse_identifier()?;
            let initializer = if self.skip(SyntaxKind::EqualsToken) {
                Some(self.parse_expression(Precedence::Comma.next())?)
            } else {
                None
            };
            values.push(EnumValueDeclaration {
                data: NodeData::new(SyntaxKind::EnumValueDeclaration, value_pos, self.prev_end),
                name: value_name,
                initializer,
            });
            if !self.skip(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        self.parse_expected_semicolon();
        Some(Statement::Enum(EnumDeclaration {
            data: NodeData::with_flags(SyntaxKind::EnumDeclaration, pos, self.prev_end, flags),
            name,
            values: alloc_vec(self.arena, values),
        }))
    }

    fn parse_function(
        &mut self,
        flags: CommonFlags,
        decorators: Vec<Decorator<'a>>,
    ) -> Option<Statement<'a>> {
        // The declaration's range starts at its first decorator, so that
        // every child node stays covered.
        let pos = decorators
            .first()
            .map(|d| d.data.range.pos)
            .unwrap_or_else(|| self.token_pos());
        self.bump(); // function
        let name = self.parse_identifier()?;
        let type_parameters = if self.current() == SyntaxKind::LessThanToken {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };
        let parameters = self.parse_parameters()?;
        let return_type = if self.skip(SyntaxKind::ColonToken) {
            Some(self.parse_type(true)?)
        } else {
            self.error(&messages::TYPE_EXPECTED, &[]);
            None
        };
        let body = self.parse_function_body()?;
        self.parse_expected_semicolon();
        Some(Statement::Function(FunctionDeclaration {
            data: NodeData::with_flags(SyntaxKind::FunctionDeclaration, pos, self.prev_end, flags),
            name,
            type_parameters: alloc_vec(self.arena, type_parameters),
            parameters: alloc_vec(self.arena, parameters),
            return_type,
            body,
            decorators: alloc_vec(self.arena, decorators),
        }))
    }

    /// Parse an optional function or method body, reporting the ambient
    /// mismatches: a body inside `declare`, or a missing body outside it.
    fn parse_function_body(&mut self) -> Option<Option<Block<'a>>> {
        if self.current() == SyntaxKind::OpenBraceToken {
            if self.ambient {
                self.error(
                    &messages::AN_IMPLEMENTATION_CANNOT_BE_DECLARED_IN_AMBIENT_CONTEXTS,
                    &[],
                );
            }
            Some(Some(self.parse_block(false)?))
        } else {
            if !self.ambient {
                self.error(&messages::FUNCTION_IMPLEMENTATION_IS_MISSING, &[]);
            }
            Some(None)
        }
    }

    fn parse_type_parameters(&mut self) -> Option<Vec<TypeParameter>> {
        self.bump(); // <
        let mut parameters = Vec::new();
        if self.current() == SyntaxKind::GreaterThanToken {
            self.error(&messages::TYPE_PARAMETER_LIST_CANNOT_BE_EMPTY, &[]);
            self.bump();
            return Some(parameters);
        }
        loop {
            let pos = self.token_pos();
            let name = self.parse_identifier()?;
            parameters.push(TypeParameter {
                data: NodeData::new(SyntaxKind::TypeParameter, pos, self.prev_end),
                name,
            });
            if !self.skip(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::GreaterThanToken)?;
        Some(parameters)
    }

    fn parse_parameters(&mut self) -> Option<Vec<Parameter<'a>>> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut parameters = Vec::new();
        while self.current() != SyntaxKind::CloseParenToken {
            if self.current() == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &[")"]);
                return None;
            }
            let pos = self.token_pos();
            let is_rest = self.skip(SyntaxKind::DotDotDotToken);
            let name = self.parse_identifier()?;
            let type_node = if self.skip(SyntaxKind::ColonToken) {
                Some(self.parse_type(true)?)
            } else {
                self.error_at(name.data.range, &messages::TYPE_EXPECTED, &[]);
                None
            };
            let initializer = if self.skip(SyntaxKind::EqualsToken) {
                Some(self.parse_expression(Precedence::Comma.next())?)
            } else {
                None
            };
            parameters.push(Parameter {
                data: NodeData::new(SyntaxKind::Parameter, pos, self.prev_end),
                name,
                type_node,
                initializer,
                is_rest,
            });
            if !self.skip(SyntaxKind::CommaToken) {
                break;
            }
            if is_rest {
                self.error(&messages::A_REST_PARAMETER_MUST_BE_LAST, &[]);
            }
        }
        self.expect(SyntaxKind::CloseParenToken)?;
        Some(parameters)
    }

    fn parse_class(
        &mut self,
        flags: CommonFlags,
        decorators: Vec<Decorator<'a>>,
    ) -> Option<Statement<'a>> {
        let pos = decorators
            .first()
            .map(|d| d.data.range.pos)
            .unwrap_or_else(|| self.token_pos());
        self.bump(); // class
        let name = self.parse_identifier()?;
        let type_parameters = if self.current() == SyntaxKind::LessThanToken {
            self.parse_type_parameters()?
        } else {
            Vec::new()
        };
        let extends_type = if self.skip(SyntaxKind::ExtendsKeyword) {
            Some(self.parse_type(false)?)
        } else {
            None
        };
        let mut implements_types = Vec::new();
        if self.skip(SyntaxKind::ImplementsKeyword) {
            loop {
                implements_types.push(self.parse_type(false)?);
                if !self.skip(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while self.current() != SyntaxKind::CloseBraceToken {
            if self.current() == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &["}"]);
                return None;
            }
            members.push(self.parse_class_member()?);
        }
        self.bump(); // }
        Some(Statement::Class(ClassDeclaration {
            data: NodeData::with_flags(SyntaxKind::ClassDeclaration, pos, self.prev_end, flags),
            name,
            type_parameters: alloc_vec(self.arena, type_parameters),
            extends_type,
            implements_types: alloc_vec(self.arena, implements_types),
            members: alloc_vec(self.arena, members),
            decorators: alloc_vec(self.arena, decorators),
        }))
    }

    /// Whether the current modifier-like keyword really is a modifier, as
    /// opposed to a member named like one (`get: i32`).
    fn continues_member_after_modifier(&mut self) -> bool {
        let (kind, _) = self.peek();
        kind == SyntaxKind::Identifier
            || matches!(
                kind,
                SyntaxKind::PublicKeyword
                    | SyntaxKind::PrivateKeyword
                    | SyntaxKind::ProtectedKeyword
                    | SyntaxKind::StaticKeyword
                    | SyntaxKind::AbstractKeyword
                    | SyntaxKind::GetKeyword
                    | SyntaxKind::SetKeyword
            )
    }

    fn parse_class_member(&mut self) -> Option<ClassMember<'a>> {
        let pos = self.token_pos();
        let mut flags = CommonFlags::NONE;

        // Modifiers in order: accessibility, then static/abstract, then
        // get/set.
        if matches!(
            self.current(),
            SyntaxKind::PublicKeyword | SyntaxKind::PrivateKeyword | SyntaxKind::ProtectedKeyword
        ) && self.continues_member_after_modifier()
        {
            flags |= match self.current() {
                SyntaxKind::PublicKeyword => CommonFlags::PUBLIC,
                SyntaxKind::PrivateKeyword => CommonFlags::PRIVATE,
                _ => CommonFlags::PROTECTED,
            };
            self.bump();
        }
        if matches!(
            self.current(),
            SyntaxKind::StaticKeyword | SyntaxKind::AbstractKeyword
        ) && self.continues_member_after_modifier()
        {
            flags |= if self.current() == SyntaxKind::StaticKeyword {
                CommonFlags::STATIC
            } else {
                CommonFlags::ABSTRACT
            };
            self.bump();
        }
        if matches!(self.current(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.continues_member_after_modifier()
        {
            flags |= if self.current() == SyntaxKind::GetKeyword {
                CommonFlags::GET
            } else {
                CommonFlags::SET
            };
            self.bump();
        }

        let name = self.parse_member_name()?;

        if matches!(
            self.current(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            // Method
            let type_parameters = if self.current() == SyntaxKind::LessThanToken {
                self.parse_type_parameters()?
            } else {
                Vec::new()
            };
            let parameters = self.parse_parameters()?;
            let return_type = if self.skip(SyntaxKind::ColonToken) {
                Some(self.parse_type(true)?)
            } else {
                self.error(&messages::TYPE_EXPECTED, &[]);
                None
            };
            let body = if self.current() == SyntaxKind::OpenBraceToken {
                if self.ambient {
                    self.error(
                        &messages::AN_IMPLEMENTATION_CANNOT_BE_DECLARED_IN_AMBIENT_CONTEXTS,
                        &[],
                    );
                }
                Some(self.parse_block(false)?)
            } else {
                if !self.ambient && !flags.contains(CommonFlags::ABSTRACT) {
                    self.error(&messages::FUNCTION_IMPLEMENTATION_IS_MISSING, &[]);
                }
                None
            };
            self.parse_expected_semicolon();
            Some(ClassMember::Method(MethodDeclaration {
                data: NodeData::with_flags(
                    SyntaxKind::MethodDeclaration,
                    pos,
                    self.prev_end,
                    flags,
                ),
                name,
                type_parameters: alloc_vec(self.arena, type_parameters),
                parameters: alloc_vec(self.arena, parameters),
                return_type,
                body,
            }))
        } else {
            // Field
            for (flag, text) in [
                (CommonFlags::ABSTRACT, "abstract"),
                (CommonFlags::GET, "get"),
                (CommonFlags::SET, "set"),
            ] {
                if flags.contains(flag) {
                    self.error_at(
                        name.data.range,
                        &messages::_0_MODIFIER_CANNOT_BE_USED_HERE,
                        &[text],
                    );
                }
            }
            let type_node = if self.skip(SyntaxKind::ColonToken) {
                Some(self.parse_type(true)?)
            } else {
                self.error_at(name.data.range, &messages::TYPE_EXPECTED, &[]);
                None
            };
            let initializer = if self.skip(SyntaxKind::EqualsToken) {
                if self.ambient {
                    self.error(
                        &messages::INITIALIZERS_ARE_NOT_ALLOWED_IN_AMBIENT_CONTEXTS,
                        &[],
                    );
                }
                Some(self.parse_expression(Precedence::Comma.next())?)
            } else {
                None
            };
            self.parse_expected_semicolon();
            Some(ClassMember::Field(FieldDeclaration {
                data: NodeData::with_flags(
                    SyntaxKind::FieldDeclaration,
                    pos,
                    self.prev_end,
                    flags,
                ),
                name,
                type_node,
                initializer,
            }))
        }
    }

    // ========================================================================
    // Modules
    // ========================================================================

    fn parse_import(&mut self) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // import
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while self.current() != SyntaxKind::CloseBraceToken {
            if self.current() == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &["}"]);
                return None;
            }
            let member_pos = self.token_pos();
            let external_name = self.parse_identifier()?;
            let name = if self.skip(SyntaxKind::AsKeyword) {
                self.parse_identifier()?
            } else {
                external_name.clone()
            };
            members.push(ImportDeclaration {
                data: NodeData::new(SyntaxKind::ImportDeclaration, member_pos, self.prev_end),
                external_name,
                name,
            });
            if !self.skip(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        self.expect(SyntaxKind::FromKeyword)?;
        let path = self.parse_string_literal()?;
        let internal_path = sscript_path::resolve_relative(&path.value, &self.file_name);
        self.parse_expected_semicolon();
        Some(Statement::Import(ImportStatement {
            data: NodeData::new(SyntaxKind::ImportStatement, pos, self.prev_end),
            members: alloc_vec(self.arena, members),
            path,
            internal_path,
        }))
    }

    fn parse_export(&mut self, flags: CommonFlags) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.expect(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while self.current() != SyntaxKind::CloseBraceToken {
            if self.current() == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &["}"]);
                return None;
            }
            let member_pos = self.token_pos();
            let local_name = self.parse_identifier()?;
            let exported_name = if self.skip(SyntaxKind::AsKeyword) {
                self.parse_identifier()?
            } else {
                local_name.clone()
            };
            members.push(ExportMember {
                data: NodeData::new(SyntaxKind::ExportMember, member_pos, self.prev_end),
                local_name,
                exported_name,
            });
            if !self.skip(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken)?;
        let path = if self.skip(SyntaxKind::FromKeyword) {
            Some(self.parse_string_literal()?)
        } else {
            None
        };
        let internal_path = path
            .as_ref()
            .map(|p| sscript_path::resolve_relative(&p.value, &self.file_name));
        self.parse_expected_semicolon();
        Some(Statement::Export(ExportStatement {
            data: NodeData::with_flags(SyntaxKind::ExportStatement, pos, self.prev_end, flags),
            members: alloc_vec(self.arena, members),
            path,
            internal_path,
        }))
    }

    fn parse_export_import(&mut self, flags: CommonFlags) -> Option<Statement<'a>> {
        let pos = self.token_pos();
        self.bump(); // import
        let name = self.parse_identifier()?;
        self.expect(SyntaxKind::EqualsToken)?;
        let external_name = self.parse_identifier()?;
        self.parse_expected_semicolon();
        Some(Statement::ExportImport(ExportImportStatement {
            data: NodeData::with_flags(
                SyntaxKind::ExportImportStatement,
                pos,
                self.prev_end,
                flags,
            ),
            name,
            external_name,
        }))
    }

    fn parse_string_literal(&mut self) -> Option<StringLiteral> {
        if self.current() == SyntaxKind::StringLiteral {
            let literal = StringLiteral {
                data: NodeData::new(SyntaxKind::StringLiteral, self.token_pos(), self.token_end()),
                value: self.scanner.token_value().to_string(),
            };
            self.bump();
            Some(literal)
        } else {
            self.error(&messages::STRING_LITERAL_EXPECTED, &[]);
            None
        }
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// Parse a type annotation. A parenthesized type is accepted at the
    /// outermost recursion only.
    fn parse_type(&mut self, accept_parenthesized: bool) -> Option<TypeNode<'a>> {
        let pos = self.token_pos();
        let mut ty = match self.current() {
            SyntaxKind::VoidKeyword => self.parse_named_keyword_type("void"),
            SyntaxKind::ThisKeyword => self.parse_named_keyword_type("this"),
            // `true` / `false` in type position denote `bool`.
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                self.parse_named_keyword_type("bool")
            }
            // A string literal in type position denotes `string`.
            SyntaxKind::StringLiteral => self.parse_named_keyword_type("string"),
            SyntaxKind::Identifier => {
                let name = self.make_identifier();
                self.bump();
                let mut type_arguments = Vec::new();
                if self.skip(SyntaxKind::LessThanToken) {
                    if self.current() == SyntaxKind::GreaterThanToken {
                        self.error(&messages::TYPE_ARGUMENT_LIST_CANNOT_BE_EMPTY, &[]);
                    } else {
                        loop {
                            type_arguments.push(self.parse_type(true)?);
                            if !self.skip(SyntaxKind::CommaToken) {
                                break;
                            }
                        }
                    }
                    self.expect(SyntaxKind::GreaterThanToken)?;
                }
                TypeNode {
                    data: NodeData::new(SyntaxKind::TypeName, pos, self.prev_end),
                    name,
                    type_arguments: alloc_vec(self.arena, type_arguments),
                    is_nullable: false,
                }
            }
            SyntaxKind::OpenParenToken if accept_parenthesized => {
                self.bump();
                let mut inner = self.parse_type(false)?;
                self.expect(SyntaxKind::CloseParenToken)?;
                inner.data.range = TextRange::new(pos, self.prev_end);
                inner
            }
            _ => {
                self.error(&messages::TYPE_EXPECTED, &[]);
                return None;
            }
        };

        // `[]` wraps into Array<...>; `| null` marks the current level
        // nullable, after which no further `[]` wrapping is accepted.
        loop {
            match self.current() {
                SyntaxKind::OpenBracketToken if !ty.is_nullable => {
                    self.bump();
                    self.expect(SyntaxKind::CloseBracketToken)?;
                    ty = TypeNode {
                        data: NodeData::new(SyntaxKind::TypeName, pos, self.prev_end),
                        name: self.synthesize_identifier("Array", pos, self.prev_end),
                        type_arguments: alloc_vec(self.arena, vec![ty]),
                        is_nullable: false,
                    };
                }
                SyntaxKind::BarToken => {
                    self.bump();
                    if self.current() == SyntaxKind::NullKeyword {
                        self.bump();
                    } else {
                        self.error(&messages::_0_EXPECTED, &["null"]);
                    }
                    ty.is_nullable = true;
                    ty.data.range = TextRange::new(pos, self.prev_end);
                }
                _ => break,
            }
        }
        Some(ty)
    }

    fn parse_named_keyword_type(&mut self, name: &'static str) -> TypeNode<'a> {
        let pos = self.token_pos();
        let end = self.token_end();
        self.bump();
        TypeNode {
            data: NodeData::new(SyntaxKind::TypeName, pos, end),
            name: self.synthesize_identifier(name, pos, end),
            type_arguments: &[],
            is_nullable: false,
        }
    }

    /// Speculatively parse `<T, ...>` iff it is followed by `(`, which
    /// disambiguates `f<T>(x)` from `a < b > c`. On failure the scanner
    /// state, diagnostics, and range bookkeeping are all rolled back.
    fn try_parse_type_arguments_before_arguments(&mut self) -> Option<Vec<TypeNode<'a>>> {
        if self.current() != SyntaxKind::LessThanToken {
            return None;
        }
        let state = self.scanner.save_state();
        let diagnostics_len = self.diagnostics.len();
        let prev_end = self.prev_end;

        self.bump(); // <
        let mut type_arguments = Vec::new();
        let accepted = loop {
            if self.current() == SyntaxKind::GreaterThanToken {
                break !type_arguments.is_empty();
            }
            match self.parse_type(true) {
                Some(ty) => type_arguments.push(ty),
                None => break false,
            }
            if !self.skip(SyntaxKind::CommaToken) {
                break self.current() == SyntaxKind::GreaterThanToken
                    && !type_arguments.is_empty();
            }
        };
        if accepted {
            self.bump(); // >
            if self.current() == SyntaxKind::OpenParenToken {
                return Some(type_arguments);
            }
        }
        self.scanner.restore_state(state);
        self.diagnostics.truncate(diagnostics_len);
        self.prev_end = prev_end;
        None
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Parse an expression at the given precedence threshold.
    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression<'a>> {
        self.recursion_depth += 1;
        if self.recursion_depth > MAX_RECURSION_DEPTH {
            self.error(&messages::EXPRESSION_EXPECTED, &[]);
            self.recursion_depth -= 1;
            return None;
        }
        let result = self.parse_expression_inner(precedence);
        self.recursion_depth -= 1;
        result
    }

    fn parse_expression_inner(&mut self, precedence: Precedence) -> Option<Expression<'a>> {
        let mut expr = self.parse_expression_prefix()?;
        let pos = expr.range().pos;

        // Immediate call suffixes: `f(x)`, `f<T>(x)`, chained `f(x)(y)`.
        loop {
            let type_arguments = self.try_parse_type_arguments_before_arguments();
            if type_arguments.is_none() && self.current() != SyntaxKind::OpenParenToken {
                break;
            }
            let arguments = self.parse_argument_list()?;
            expr = Expression::Call(CallExpression {
                data: NodeData::new(SyntaxKind::CallExpression, pos, self.prev_end),
                expression: self.arena.alloc(expr),
                type_arguments: alloc_vec(self.arena, type_arguments.unwrap_or_default()),
                arguments: alloc_vec(self.arena, arguments),
            });
        }

        // Precedence climbing.
        loop {
            if self.current() == SyntaxKind::GreaterThanToken {
                self.scanner.rescan_greater_than_token();
            }
            let token = self.current();
            let token_precedence = of_binary_operator(token);
            if token_precedence == Precedence::Invalid || token_precedence < precedence {
                break;
            }
            match token {
                SyntaxKind::AsKeyword => {
                    self.bump();
                    let to_type = self.parse_type(true)?;
                    expr = Expression::Assertion(AssertionExpression {
                        data: NodeData::new(SyntaxKind::AssertionExpression, pos, self.prev_end),
                        assertion_kind: AssertionKind::As,
                        expression: self.arena.alloc(expr),
                        to_type: self.arena.alloc(to_type),
                    });
                }
                SyntaxKind::OpenBracketToken => {
                    self.bump();
                    // The inner expression resets precedence.
                    let argument = self.parse_expression(Precedence::Comma)?;
                    self.expect(SyntaxKind::CloseBracketToken)?;
                    expr = Expression::ElementAccess(ElementAccessExpression {
                        data: NodeData::new(
                            SyntaxKind::ElementAccessExpression,
                            pos,
                            self.prev_end,
                        ),
                        expression: self.arena.alloc(expr),
                        argument_expression: self.arena.alloc(argument),
                    });
                }
                SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                    if !expr.is_assignable_target() {
                        self.error_at(
                            expr.range(),
                            &messages::THE_OPERAND_OF_AN_INCREMENT_OR_DECREMENT_OPERATOR_MUST_BE_A_VARIABLE_OR_A_PROPERTY_ACCESS,
                            &[],
                        );
                    }
                    self.bump();
                    expr = Expression::UnaryPostfix(UnaryPostfixExpression {
                        data: NodeData::new(
                            SyntaxKind::UnaryPostfixExpression,
                            pos,
                            self.prev_end,
                        ),
                        operator: token,
                        operand: self.arena.alloc(expr),
                    });
                }
                SyntaxKind::QuestionToken => {
                    self.bump();
                    let when_true = self.parse_expression(Precedence::Comma.next())?;
                    self.expect(SyntaxKind::ColonToken)?;
                    let when_false = self.parse_expression(if precedence > Precedence::Comma {
                        Precedence::Comma.next()
                    } else {
                        Precedence::Comma
                    })?;
                    expr = Expression::Select(SelectExpression {
                        data: NodeData::new(SyntaxKind::SelectExpression, pos, self.prev_end),
                        condition: self.arena.alloc(expr),
                        when_true: self.arena.alloc(when_true),
                        when_false: self.arena.alloc(when_false),
                    });
                }
                SyntaxKind::DotToken => {
                    self.bump();
                    let name = self.parse_identifier()?;
                    expr = Expression::PropertyAccess(PropertyAccessExpression {
                        data: NodeData::new(
                            SyntaxKind::PropertyAccessExpression,
                            pos,
                            self.prev_end,
                        ),
                        expression: self.arena.alloc(expr),
                        name,
                    });
                }
                SyntaxKind::OpenParenToken => {
                    let arguments = self.parse_argument_list()?;
                    expr = Expression::Call(CallExpression {
                        data: NodeData::new(SyntaxKind::CallExpression, pos, self.prev_end),
                        expression: self.arena.alloc(expr),
                        type_arguments: &[],
                        arguments: alloc_vec(self.arena, arguments),
                    });
                }
                SyntaxKind::LessThanToken => {
                    // `a.b<T>(x)` method call, or a plain comparison.
                    if let Some(type_arguments) = self.try_parse_type_arguments_before_arguments()
                    {
                        let arguments = self.parse_argument_list()?;
                        expr = Expression::Call(CallExpression {
                            data: NodeData::new(SyntaxKind::CallExpression, pos, self.prev_end),
                            expression: self.arena.alloc(expr),
                            type_arguments: alloc_vec(self.arena, type_arguments),
                            arguments: alloc_vec(self.arena, arguments),
                        });
                    } else {
                        expr = self.parse_binary_rest(expr, token, token_precedence)?;
                    }
                }
                _ => {
                    expr = self.parse_binary_rest(expr, token, token_precedence)?;
                }
            }
        }
        Some(expr)
    }

    fn parse_binary_rest(
        &mut self,
        left: Expression<'a>,
        operator: SyntaxKind,
        operator_precedence: Precedence,
    ) -> Option<Expression<'a>> {
        let pos = left.range().pos;
        self.bump();
        let next_precedence = if is_right_associative(operator) {
            operator_precedence
        } else {
            operator_precedence.next()
        };
        let right = self.parse_expression(next_precedence)?;
        Some(Expression::Binary(BinaryExpression {
            data: NodeData::new(SyntaxKind::BinaryExpression, pos, self.prev_end),
            operator,
            left: self.arena.alloc(left),
            right: self.arena.alloc(right),
        }))
    }

    fn parse_expression_prefix(&mut self) -> Option<Expression<'a>> {
        let pos = self.token_pos();
        let end = self.token_end();
        match self.current() {
            SyntaxKind::NullKeyword => {
                self.bump();
                Some(Expression::NullLiteral(NodeData::new(
                    SyntaxKind::NullKeyword,
                    pos,
                    end,
                )))
            }
            SyntaxKind::TrueKeyword => {
                self.bump();
                Some(Expression::TrueLiteral(NodeData::new(
                    SyntaxKind::TrueKeyword,
                    pos,
                    end,
                )))
            }
            SyntaxKind::FalseKeyword => {
                self.bump();
                Some(Expression::FalseLiteral(NodeData::new(
                    SyntaxKind::FalseKeyword,
                    pos,
                    end,
                )))
            }
            SyntaxKind::Identifier => {
                let identifier = self.make_identifier();
                self.bump();
                Some(Expression::Identifier(identifier))
            }
            // `this` and `super` read as plain identifier expressions.
            SyntaxKind::ThisKeyword | SyntaxKind::SuperKeyword => {
                let identifier = self.make_identifier();
                self.bump();
                Some(Expression::Identifier(identifier))
            }
            SyntaxKind::IntegerLiteral => {
                let value =
                    numeric::parse_integer(self.scanner.token_value()).unwrap_or(u64::MAX);
                self.bump();
                Some(Expression::IntegerLiteral(IntegerLiteral {
                    data: NodeData::new(SyntaxKind::IntegerLiteral, pos, end),
                    value,
                }))
            }
            SyntaxKind::FloatLiteral => {
                let value = numeric::parse_float(self.scanner.token_value()).unwrap_or(0.0);
                self.bump();
                Some(Expression::FloatLiteral(FloatLiteral {
                    data: NodeData::new(SyntaxKind::FloatLiteral, pos, end),
                    value,
                }))
            }
            SyntaxKind::StringLiteral => {
                let value = self.scanner.token_value().to_string();
                self.bump();
                Some(Expression::StringLiteral(StringLiteral {
                    data: NodeData::new(SyntaxKind::StringLiteral, pos, end),
                    value,
                }))
            }
            // A slash in prefix position starts a regexp literal.
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.scanner.rescan_slash_token();
                let pattern = self.scanner.token_value().to_string();
                let flags = self.scanner.token_regexp_flags().to_string();
                let end = self.token_end();
                self.bump();
                Some(Expression::RegexpLiteral(RegexpLiteral {
                    data: NodeData::new(SyntaxKind::RegularExpressionLiteral, pos, end),
                    pattern,
                    flags,
                }))
            }
            SyntaxKind::OpenParenToken => {
                self.bump();
                let inner = self.parse_expression(Precedence::Comma)?;
                self.expect(SyntaxKind::CloseParenToken)?;
                Some(Expression::Parenthesized(ParenthesizedExpression {
                    data: NodeData::new(SyntaxKind::ParenthesizedExpression, pos, self.prev_end),
                    expression: self.arena.alloc(inner),
                }))
            }
            SyntaxKind::OpenBracketToken => {
                self.bump();
                let mut elements: Vec<Option<Expression<'a>>> = Vec::new();
                loop {
                    match self.current() {
                        SyntaxKind::CloseBracketToken => break,
                        // Elision: adjacent commas produce null slots.
                        SyntaxKind::CommaToken => {
                            elements.push(None);
                            self.bump();
                        }
                        _ => {
                            elements
                                .push(Some(self.parse_expression(Precedence::Comma.next())?));
                            if !self.skip(SyntaxKind::CommaToken) {
                                break;
                            }
                        }
                    }
                }
                self.expect(SyntaxKind::CloseBracketToken)?;
                Some(Expression::ArrayLiteral(ArrayLiteralExpression {
                    data: NodeData::new(SyntaxKind::ArrayLiteralExpression, pos, self.prev_end),
                    elements: alloc_vec(self.arena, elements),
                }))
            }
            // `<T>expr` assertion: `<` in prefix position cannot be a
            // comparison.
            SyntaxKind::LessThanToken => {
                self.bump();
                let to_type = self.parse_type(true)?;
                self.expect(SyntaxKind::GreaterThanToken)?;
                let operand = self.parse_expression(Precedence::Call)?;
                Some(Expression::Assertion(AssertionExpression {
                    data: NodeData::new(SyntaxKind::AssertionExpression, pos, self.prev_end),
                    assertion_kind: AssertionKind::Prefix,
                    expression: self.arena.alloc(operand),
                    to_type: self.arena.alloc(to_type),
                }))
            }
            SyntaxKind::NewKeyword => self.parse_new_expression(),
            token if of_unary_prefix_operator(token) != Precedence::Invalid => {
                self.bump();
                let operand = self.parse_expression(Precedence::UnaryPrefix)?;
                if matches!(token, SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken)
                    && !operand.is_assignable_target()
                {
                    self.error_at(
                        operand.range(),
                        &messages::THE_OPERAND_OF_AN_INCREMENT_OR_DECREMENT_OPERATOR_MUST_BE_A_VARIABLE_OR_A_PROPERTY_ACCESS,
                        &[],
                    );
                }
                Some(Expression::UnaryPrefix(UnaryPrefixExpression {
                    data: NodeData::new(SyntaxKind::UnaryPrefixExpression, pos, self.prev_end),
                    operator: token,
                    operand: self.arena.alloc(operand),
                }))
            }
            _ => {
                self.error(&messages::EXPRESSION_EXPECTED, &[]);
                None
            }
        }
    }

    /// Parse `new Operand`, where the operand is an identifier possibly
    /// extended by property accesses, optionally followed by type
    /// arguments (validated and dropped) and an argument list.
    fn parse_new_expression(&mut self) -> Option<Expression<'a>> {
        let pos = self.token_pos();
        self.bump(); // new
        if self.current() != SyntaxKind::Identifier {
            self.error(&messages::IDENTIFIER_EXPECTED, &[]);
            return None;
        }
        let identifier = self.make_identifier();
        self.bump();
        let mut operand = Expression::Identifier(identifier);
        while self.skip(SyntaxKind::DotToken) {
            let name = self.parse_identifier()?;
            let range = operand.range();
            operand = Expression::PropertyAccess(PropertyAccessExpression {
                data: NodeData::new(
                    SyntaxKind::PropertyAccessExpression,
                    range.pos,
                    self.prev_end,
                ),
                expression: self.arena.alloc(operand),
                name,
            });
        }
        let type_arguments = self.try_parse_type_arguments_before_arguments();
        let arguments = if type_arguments.is_some() || self.current() == SyntaxKind::OpenParenToken
        {
            Some(alloc_vec(self.arena, self.parse_argument_list()?))
        } else {
            None
        };
        Some(Expression::New(NewExpression {
            data: NodeData::new(SyntaxKind::NewExpression, pos, self.prev_end),
            expression: self.arena.alloc(operand),
            arguments,
        }))
    }

    /// Parse `( expr, ... )` with arguments above comma precedence.
    fn parse_argument_list(&mut self) -> Option<Vec<Expression<'a>>> {
        self.expect(SyntaxKind::OpenParenToken)?;
        let mut arguments = Vec::new();
        while self.current() != SyntaxKind::CloseParenToken {
            if self.current() == SyntaxKind::EndOfFileToken {
                self.error(&messages::_0_EXPECTED, &[")"]);
                return None;
            }
            arguments.push(self.parse_expression(Precedence::Comma.next())?);
            if !self.skip(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseParenToken)?;
        Some(arguments)
    }
}
