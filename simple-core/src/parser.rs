//! Recursive-descent parser for the Simple language.
//!
//! The parser never fails. A missing required token is reported once and
//! replaced by a zero-length token of the expected kind, and an unexpected
//! token in expression position is consumed and wrapped as a name.
//! Blocks and expressions nested deeper than [`MAX_NESTING`] are reported
//! and skipped as one placeholder node.

use log::debug;

use crate::ast::{
    Assignment, Block, ClauseGuard, Declaration, Expr, ForStatement, IfChain, IfClause,
    IfStatement, Parameter, ProcedureDeclaration, Program, ReturnStatement, Stmt,
    VariableDeclaration, WhileStatement,
};
use crate::diagnostic::{Diagnostic, DiagnosticBag};
use crate::lexer::{Token, TokenKind, lex};
use crate::span::Span;
use crate::text::SourceText;

/// Deepest combined nesting of blocks and expressions the parser descends into.
pub const MAX_NESTING: usize = 128;

/// Result of parsing: the program plus every lexical and syntactic
/// diagnostic, lexical ones first.
#[derive(Debug)]
pub struct ParseResult {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a source string into a [`Program`].
pub fn parse(source: &str) -> ParseResult {
    let lexed = lex(source);
    debug!(
        "lexed {} tokens with {} diagnostics",
        lexed.tokens.len(),
        lexed.diagnostics.len()
    );

    let mut diagnostics = DiagnosticBag::new();
    diagnostics.extend(lexed.diagnostics);

    let mut parser = Parser {
        tokens: lexed.tokens,
        position: 0,
        depth: 0,
        diagnostics,
    };
    let program = parser.parse_program();
    debug!(
        "parsed {} declarations, {} diagnostics so far",
        program.declarations.len(),
        parser.diagnostics.len()
    );

    ParseResult {
        program,
        diagnostics: parser.diagnostics.into_vec(),
    }
}

/// A parsed source text together with its diagnostics.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub text: SourceText,
    pub root: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl SyntaxTree {
    pub fn parse(text: impl Into<SourceText>) -> Self {
        let text = text.into();
        let ParseResult {
            program,
            diagnostics,
        } = parse(text.as_str());
        SyntaxTree {
            text,
            root: program,
            diagnostics,
        }
    }
}

struct Parser {
    /// Always non-empty; the last token is `Eof`.
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    diagnostics: DiagnosticBag,
}

impl Parser {
    fn parse_program(&mut self) -> Program {
        let mut declarations = Vec::new();
        while self.current().kind != TokenKind::Eof {
            declarations.push(self.parse_declaration());
        }

        let span = match (declarations.first(), declarations.last()) {
            (Some(first), Some(last)) => first.span().cover(last.span()),
            _ => Span::empty(0),
        };
        Program { declarations, span }
    }

    fn parse_declaration(&mut self) -> Declaration {
        let name = self.expect(TokenKind::Identifier, "PAR001", "Expected identifier.");
        let marker = self.parse_marker();
        let type_name = self.parse_type_name();

        if self.current().kind == TokenKind::LParen {
            return Declaration::Procedure(self.parse_procedure(name, marker, type_name));
        }

        let equals = self.expect(
            TokenKind::Equal,
            "PAR002",
            "Expected '=' for variable declaration.",
        );
        let initializer = self.parse_expression();
        Declaration::Variable(VariableDeclaration {
            span: name.span.cover(initializer.span),
            name,
            marker,
            type_name,
            equals,
            initializer,
        })
    }

    fn parse_procedure(
        &mut self,
        name: Token,
        marker: Token,
        return_type: Token,
    ) -> ProcedureDeclaration {
        let open_paren = self.expect(
            TokenKind::LParen,
            "PAR003",
            "Expected '(' after return type.",
        );

        let mut parameters = Vec::new();
        if self.current().kind != TokenKind::RParen {
            loop {
                let param_name =
                    self.expect(TokenKind::Identifier, "PAR004", "Expected parameter name.");
                let param_marker = self.parse_marker();
                let param_type = self.parse_type_name();
                parameters.push(Parameter {
                    span: param_name.span.cover(param_type.span),
                    name: param_name,
                    marker: param_marker,
                    type_name: param_type,
                });

                if self.current().kind != TokenKind::Comma {
                    break;
                }
                self.bump();
            }
        }

        let close_paren = self.expect(
            TokenKind::RParen,
            "PAR005",
            "Expected ')' after parameters.",
        );
        let body = self.parse_block();

        ProcedureDeclaration {
            span: name.span.cover(body.span),
            name,
            marker,
            return_type,
            open_paren,
            parameters,
            close_paren,
            body,
        }
    }

    fn parse_marker(&mut self) -> Token {
        match self.current().kind {
            TokenKind::Colon | TokenKind::DoubleColon => self.bump(),
            _ => self.expect(TokenKind::Colon, "PAR015", "Expected ':' or '::'."),
        }
    }

    fn parse_type_name(&mut self) -> Token {
        self.expect(TokenKind::Identifier, "PAR006", "Expected type name.")
    }

    fn parse_block(&mut self) -> Block {
        if self.depth >= MAX_NESTING {
            return self.skip_deep_block();
        }
        self.nested(Self::parse_block_contents)
    }

    fn parse_block_contents(&mut self) -> Block {
        let open_brace = self.expect(TokenKind::LBrace, "PAR007", "Expected '{'.");

        let mut statements = Vec::new();
        loop {
            while self.current().kind == TokenKind::Semi {
                self.bump();
            }
            if matches!(self.current().kind, TokenKind::RBrace | TokenKind::Eof) {
                break;
            }
            statements.push(self.parse_statement());
        }

        let close_brace = self.expect(TokenKind::RBrace, "PAR008", "Expected '}'.");
        Block {
            span: open_brace.span.cover(close_brace.span),
            open_brace,
            statements,
            close_brace,
        }
    }

    fn parse_statement(&mut self) -> Stmt {
        let current = self.current().kind;
        let next = self.peek(1).kind;

        match current {
            TokenKind::Return => Stmt::Return(self.parse_return()),
            TokenKind::While => Stmt::While(self.parse_while()),
            TokenKind::For => Stmt::For(self.parse_for()),
            TokenKind::Break => Stmt::Break(self.bump()),
            TokenKind::Skip => Stmt::Skip(self.bump()),
            TokenKind::PipeArrow => Stmt::IfChain(self.parse_if_chain()),
            TokenKind::LBrace => Stmt::Block(self.parse_block()),
            TokenKind::Identifier
                if matches!(next, TokenKind::Colon | TokenKind::DoubleColon) =>
            {
                Stmt::VariableDeclaration(self.parse_local_declaration())
            }
            TokenKind::Identifier if next.is_assignment_operator() => {
                Stmt::Assignment(self.parse_assignment())
            }
            _ => {
                let expr = self.parse_expression();
                if self.current().kind == TokenKind::LBrace {
                    let body = self.parse_block();
                    Stmt::If(IfStatement {
                        span: expr.span.cover(body.span),
                        condition: expr,
                        body,
                    })
                } else {
                    Stmt::Expression(expr)
                }
            }
        }
    }

    /// Statement forms allowed in a `for` header.
    fn parse_simple_statement(&mut self) -> Stmt {
        let next = self.peek(1).kind;
        if self.current().kind == TokenKind::Identifier {
            if matches!(next, TokenKind::Colon | TokenKind::DoubleColon) {
                return Stmt::VariableDeclaration(self.parse_local_declaration());
            }
            if next.is_assignment_operator() {
                return Stmt::Assignment(self.parse_assignment());
            }
        }
        Stmt::Expression(self.parse_expression())
    }

    fn parse_local_declaration(&mut self) -> VariableDeclaration {
        let name = self.expect(TokenKind::Identifier, "PAR009", "Expected identifier.");
        let marker = self.parse_marker();
        let type_name = self.parse_type_name();
        let equals = self.expect(
            TokenKind::Equal,
            "PAR010",
            "Expected '=' for variable declaration.",
        );
        let initializer = self.parse_expression();
        VariableDeclaration {
            span: name.span.cover(initializer.span),
            name,
            marker,
            type_name,
            equals,
            initializer,
        }
    }

    fn parse_assignment(&mut self) -> Assignment {
        // Dispatch already saw `identifier <assign-op>`.
        let target = self.bump();
        let operator = self.bump();
        let value = self.parse_expression();
        Assignment {
            span: target.span.cover(value.span),
            target,
            operator,
            value,
        }
    }

    fn parse_return(&mut self) -> ReturnStatement {
        let keyword = self.bump();
        let value = match self.current().kind {
            TokenKind::RBrace | TokenKind::Semi | TokenKind::Eof => None,
            _ => Some(self.parse_expression()),
        };
        let span = match &value {
            Some(expr) => keyword.span.cover(expr.span),
            None => keyword.span,
        };
        ReturnStatement {
            keyword,
            value,
            span,
        }
    }

    fn parse_while(&mut self) -> WhileStatement {
        let keyword = self.bump();
        let condition = self.parse_expression();
        let body = self.parse_block();
        WhileStatement {
            span: keyword.span.cover(body.span),
            keyword,
            condition,
            body,
        }
    }

    fn parse_for(&mut self) -> ForStatement {
        let keyword = self.bump();
        let open_paren = self.expect(TokenKind::LParen, "PAR016", "Expected '(' after 'for'.");

        let initializer = if self.current().kind == TokenKind::Semi {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()))
        };
        let first_semi = self.expect(TokenKind::Semi, "PAR017", "Expected ';' in for header.");

        let condition = if matches!(self.current().kind, TokenKind::Semi | TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression())
        };
        let second_semi = self.expect(TokenKind::Semi, "PAR017", "Expected ';' in for header.");

        let increment = if self.current().kind == TokenKind::RParen {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()))
        };
        let close_paren = self.expect(
            TokenKind::RParen,
            "PAR018",
            "Expected ')' after for header.",
        );
        let body = self.parse_block();

        ForStatement {
            span: keyword.span.cover(body.span),
            keyword,
            open_paren,
            initializer,
            first_semi,
            condition,
            second_semi,
            increment,
            close_paren,
            body,
        }
    }

    fn parse_if_chain(&mut self) -> IfChain {
        let mut clauses = Vec::new();
        while self.current().kind == TokenKind::PipeArrow {
            let arrow = self.bump();
            let guard = if self.current().kind == TokenKind::Default {
                ClauseGuard::Default(self.bump())
            } else {
                ClauseGuard::Condition(self.parse_expression())
            };
            let body = self.parse_block();
            clauses.push(IfClause {
                span: arrow.span.cover(body.span),
                arrow,
                guard,
                body,
            });
        }

        let span = match (clauses.first(), clauses.last()) {
            (Some(first), Some(last)) => first.span.cover(last.span),
            _ => Span::empty(self.current().span.start),
        };
        IfChain { clauses, span }
    }

    fn parse_expression(&mut self) -> Expr {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, parent_precedence: u8) -> Expr {
        if self.depth >= MAX_NESTING {
            return self.skip_deep_expression();
        }
        self.nested(|parser| parser.parse_binary_operand(parent_precedence))
    }

    /// Precedence climbing; equal precedence associates to the left.
    fn parse_binary_operand(&mut self, parent_precedence: u8) -> Expr {
        let unary = self.current().kind.unary_precedence();
        let mut left = if unary != 0 && unary >= parent_precedence {
            let operator = self.bump();
            let operand = self.parse_binary(unary);
            Expr::unary(operator, operand)
        } else {
            self.parse_postfix()
        };

        loop {
            let precedence = self.current().kind.binary_precedence();
            if precedence == 0 || precedence <= parent_precedence {
                break;
            }
            let operator = self.bump();
            let right = self.parse_binary(precedence);
            left = Expr::binary(left, operator, right);
        }

        left
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();

        while self.current().kind == TokenKind::LParen {
            let open_paren = self.bump();
            let mut args = Vec::new();
            if self.current().kind != TokenKind::RParen {
                loop {
                    args.push(self.parse_expression());
                    if self.current().kind != TokenKind::Comma {
                        break;
                    }
                    self.bump();
                }
            }
            let close_paren = self.expect(
                TokenKind::RParen,
                "PAR012",
                "Expected ')' after arguments.",
            );
            expr = Expr::call(expr, open_paren, args, close_paren);
        }

        expr
    }

    fn parse_primary(&mut self) -> Expr {
        match self.current().kind {
            TokenKind::LParen => {
                let open_paren = self.bump();
                let inner = self.parse_expression();
                let close_paren = self.expect(
                    TokenKind::RParen,
                    "PAR013",
                    "Expected ')' after expression.",
                );
                Expr::parenthesized(open_paren, inner, close_paren)
            }
            TokenKind::IntLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::CharLiteral
            | TokenKind::True
            | TokenKind::False => Expr::literal(self.bump()),
            TokenKind::Identifier => Expr::name(self.bump()),
            _ => {
                let unexpected = self.bump();
                self.diagnostics.report(
                    "PAR014",
                    unexpected.span,
                    "Unexpected token in expression.",
                );
                Expr::name(Token {
                    kind: TokenKind::Identifier,
                    text: unexpected.text,
                    value: None,
                    span: unexpected.span,
                })
            }
        }
    }

    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> T) -> T {
        self.depth += 1;
        let node = parse(self);
        self.depth -= 1;
        node
    }

    fn skip_deep_expression(&mut self) -> Expr {
        let span = self.current().span;
        self.diagnostics
            .report("PAR019", span, "Expression is nested too deeply.");
        let first = self.current().clone();
        while self.current().kind.unary_precedence() != 0 {
            self.bump();
        }
        let (_, last) = self.skip_group();
        Expr::name(Token {
            kind: TokenKind::Identifier,
            span: first.span.cover(last.span),
            text: first.text,
            value: None,
        })
    }

    fn skip_deep_block(&mut self) -> Block {
        let span = self.current().span;
        self.diagnostics
            .report("PAR019", span, "Block is nested too deeply.");
        if self.current().kind != TokenKind::LBrace {
            return Block {
                open_brace: Token::missing(TokenKind::LBrace, span.start),
                statements: Vec::new(),
                close_brace: Token::missing(TokenKind::RBrace, span.start),
                span: Span::empty(span.start),
            };
        }

        let (open_brace, last) = self.skip_group();
        let close_brace = if last.kind == TokenKind::RBrace {
            last
        } else {
            Token::missing(TokenKind::RBrace, self.current().span.start)
        };
        Block {
            span: open_brace.span.cover(close_brace.span),
            open_brace,
            statements: Vec::new(),
            close_brace,
        }
    }

    /// Consume the current token and, if it opens a bracket, everything up
    /// to its matching close. Returns the first and last consumed tokens.
    fn skip_group(&mut self) -> (Token, Token) {
        let first = self.bump();
        let mut last = first.clone();
        let mut open = usize::from(opens_group(first.kind));
        while open > 0 && self.current().kind != TokenKind::Eof {
            last = self.bump();
            if opens_group(last.kind) {
                open += 1;
            } else if closes_group(last.kind) {
                open -= 1;
            }
        }
        (first, last)
    }

    /// Consume a token of `kind`, or report `code` and synthesize an empty
    /// one at the current position.
    fn expect(&mut self, kind: TokenKind, code: &'static str, message: &'static str) -> Token {
        if self.current().kind == kind {
            return self.bump();
        }
        let span = self.current().span;
        self.diagnostics.report(code, span, message);
        Token::missing(kind, span.start)
    }

    /// Consume the current token. `Eof` is never consumed.
    fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if self.position + 1 < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.position + offset).min(last)]
    }
}

fn opens_group(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket
    )
}

fn closes_group(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;

    fn parse_clean(source: &str) -> Program {
        let result = parse(source);
        assert!(
            result.diagnostics.is_empty(),
            "unexpected diagnostics: {:?}",
            result.diagnostics
        );
        result.program
    }

    fn main_body(program: &Program) -> &[Stmt] {
        match &program.declarations[0] {
            Declaration::Procedure(proc) => &proc.body.statements,
            other => panic!("expected procedure, got {other:?}"),
        }
    }

    fn codes(source: &str) -> Vec<&'static str> {
        parse(source).diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn parses_global_variable() {
        let program = parse_clean("x : i32 = 10");
        assert_eq!(program.declarations.len(), 1);
        let Declaration::Variable(decl) = &program.declarations[0] else {
            panic!("expected variable declaration");
        };
        assert_eq!(decl.name.text, "x");
        assert_eq!(decl.type_name.text, "i32");
        assert!(!decl.is_read_only());
    }

    #[test]
    fn parses_procedure_with_return() {
        let program = parse_clean("main : i32 () { return 0 }");
        assert_eq!(program.declarations.len(), 1);
        let body = main_body(&program);
        assert_eq!(body.len(), 1);
        assert!(matches!(body[0], Stmt::Return(ReturnStatement { value: Some(_), .. })));
    }

    #[test]
    fn parses_parameters_and_read_only_marker() {
        let program = parse_clean("add :: i32 (a : i32, b :: i32) { return a + b }");
        let Declaration::Procedure(proc) = &program.declarations[0] else {
            panic!("expected procedure");
        };
        assert_eq!(proc.parameters.len(), 2);
        assert!(!proc.parameters[0].is_read_only());
        assert!(proc.parameters[1].is_read_only());
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let program = parse_clean("x : i32 = 1 + 2 * 3");
        let Declaration::Variable(decl) = &program.declarations[0] else {
            panic!("expected variable declaration");
        };
        let ExprKind::Binary {
            operator, right, ..
        } = &decl.initializer.kind
        else {
            panic!("expected binary expression");
        };
        assert_eq!(operator.kind, TokenKind::Plus);
        assert!(matches!(right.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn equal_precedence_is_left_associative() {
        let program = parse_clean("x : i32 = 10 - 4 - 3");
        let Declaration::Variable(decl) = &program.declarations[0] else {
            panic!("expected variable declaration");
        };
        let ExprKind::Binary { left, right, .. } = &decl.initializer.kind else {
            panic!("expected binary expression");
        };
        assert!(matches!(left.kind, ExprKind::Binary { .. }));
        assert!(matches!(right.kind, ExprKind::Literal(_)));
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        let program = parse_clean("x : bool = !a == b");
        let Declaration::Variable(decl) = &program.declarations[0] else {
            panic!("expected variable declaration");
        };
        let ExprKind::Binary { left, operator, .. } = &decl.initializer.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(operator.kind, TokenKind::EqualEqual);
        assert!(matches!(left.kind, ExprKind::Unary { .. }));
    }

    #[test]
    fn chains_calls_onto_primaries() {
        let program = parse_clean("main : i32 () { f(1, 2)(3) }");
        let Stmt::Expression(expr) = &main_body(&program)[0] else {
            panic!("expected expression statement");
        };
        let ExprKind::Call { callee, args, .. } = &expr.kind else {
            panic!("expected call");
        };
        assert_eq!(args.len(), 1);
        assert!(matches!(callee.kind, ExprKind::Call { .. }));
    }

    #[test]
    fn dispatches_statement_forms() {
        let program = parse_clean(
            "main : i32 () {
                x : i32 = 0;
                x += 1
                { print(\"nested\") }
                x < 3 { x = 3 }
                while x > 0 { x -= 1; skip }
                for (i : i32 = 0; i < 10; i = i + 1) { break }
                |> x == 0 { print(\"zero\") }
                |> default { print(\"other\") }
                return
            }",
        );
        let body = main_body(&program);
        assert!(matches!(body[0], Stmt::VariableDeclaration(_)));
        assert!(matches!(body[1], Stmt::Assignment(_)));
        assert!(matches!(body[2], Stmt::Block(_)));
        assert!(matches!(body[3], Stmt::If(_)));
        assert!(matches!(body[4], Stmt::While(_)));
        assert!(matches!(body[5], Stmt::For(_)));
        let Stmt::IfChain(chain) = &body[6] else {
            panic!("expected if chain");
        };
        assert_eq!(chain.clauses.len(), 2);
        assert!(matches!(chain.clauses[1].guard, ClauseGuard::Default(_)));
        assert!(matches!(body[7], Stmt::Return(ReturnStatement { value: None, .. })));
    }

    #[test]
    fn for_header_parts_are_optional() {
        let program = parse_clean("main : i32 () { for (;;) { break } return 0 }");
        let Stmt::For(stmt) = &main_body(&program)[0] else {
            panic!("expected for statement");
        };
        assert!(stmt.initializer.is_none());
        assert!(stmt.condition.is_none());
        assert!(stmt.increment.is_none());
    }

    #[test]
    fn return_stops_at_semicolon() {
        let program = parse_clean("f : void () { return; print(\"after\") }");
        let body = main_body(&program);
        assert_eq!(body.len(), 2);
        assert!(matches!(body[0], Stmt::Return(ReturnStatement { value: None, .. })));
    }

    #[test]
    fn missing_close_brace_keeps_collected_statements() {
        let result = parse("main : i32 () { x : i32 = 1");
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, ["PAR008"]);
        assert_eq!(main_body(&result.program).len(), 1);
    }

    #[test]
    fn reports_missing_tokens_with_codes() {
        assert_eq!(codes("x i32 = 1"), ["PAR015"]);
        assert_eq!(codes("x : i32 1"), ["PAR002"]);
        assert_eq!(codes("x : = 1"), ["PAR006"]);
        assert_eq!(codes("main : i32 () { f(1 }"), ["PAR012"]);
        assert_eq!(codes("x : i32 = (1 + 2"), ["PAR013"]);
        assert_eq!(codes("main : i32 (a : i32 { }"), ["PAR005"]);
        assert_eq!(codes("main : i32 () return 0"), ["PAR007", "PAR008"]);
        assert_eq!(codes("main : i32 () { for i = 0; ; ) { } }"), ["PAR016"]);
        assert_eq!(codes("main : i32 () { for (;) { } }"), ["PAR017"]);
    }

    #[test]
    fn missing_token_is_zero_length_at_current_position() {
        let result = parse("x : i32 1");
        let Declaration::Variable(decl) = &result.program.declarations[0] else {
            panic!("expected variable declaration");
        };
        assert_eq!(decl.equals.kind, TokenKind::Equal);
        assert_eq!(decl.equals.span, Span::empty(8));
        assert_eq!(result.diagnostics[0].span, Span::new(8, 1));
    }

    #[test]
    fn unexpected_token_becomes_name() {
        let result = parse("x : i32 = )");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, "PAR014");
        let Declaration::Variable(decl) = &result.program.declarations[0] else {
            panic!("expected variable declaration");
        };
        let ExprKind::Name(token) = &decl.initializer.kind else {
            panic!("expected placeholder name");
        };
        assert_eq!(token.text, ")");
    }

    #[test]
    fn lexical_diagnostics_come_first() {
        let result = parse("x : i32 = $ 1 +");
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, ["LEX001", "PAR014"]);
    }

    #[test]
    fn deep_expression_nesting_is_reported_once() {
        let depth = 20_000;
        let source = format!("x : i32 = {}1{}", "(".repeat(depth), ")".repeat(depth));
        let result = parse(&source);
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, ["PAR019"]);
        assert_eq!(result.program.declarations.len(), 1);
        assert_eq!(result.program.span.end(), source.len() as u32);
    }

    #[test]
    fn deep_unary_chain_is_reported() {
        let source = format!("x : bool = {}true", "!".repeat(20_000));
        let codes: Vec<_> = parse(&source).diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, ["PAR019"]);
    }

    #[test]
    fn deep_block_nesting_is_reported_once() {
        let depth = 20_000;
        let source = format!(
            "main : i32 () {}{}\nf : void () {{ }}",
            "{".repeat(depth),
            "}".repeat(depth)
        );
        let result = parse(&source);
        let codes: Vec<_> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, ["PAR019"]);
        assert_eq!(result.program.declarations.len(), 2);
    }

    #[test]
    fn nesting_below_the_limit_is_accepted() {
        let depth = MAX_NESTING / 2;
        parse_clean(&format!(
            "x : i32 = {}1{}",
            "(".repeat(depth),
            ")".repeat(depth)
        ));
    }

    #[test]
    fn syntax_tree_keeps_text() {
        let tree = SyntaxTree::parse("x : i32 = 1\r\ny : i32 = 2");
        assert_eq!(tree.root.declarations.len(), 2);
        assert_eq!(tree.text.line_count(), 2);
        assert!(tree.diagnostics.is_empty());
    }
}
