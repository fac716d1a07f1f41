use tracing::trace;

use crate::{
    ast::{
        ast::Stmt,
        statements::{
            BlockStmt, BreakStmt, ContinueStmt, EmptyStmt, ExpressionStmt, FnDeclStmt, ForStmt,
            IfStmt, ReturnStmt, VarDeclStmt, VarKind, WhileStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    stack::ensure_sufficient_stack,
    Span,
};

use super::{expr::parse_function_def, parser::Parser};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    ensure_sufficient_stack(|| {
        let kind = parser.current_token_kind();
        if let Some(stmt_fn) = parser.get_stmt_lookup().get(&kind).copied() {
            trace!(token = %kind, "statement");
            return stmt_fn(parser);
        }

        let expression = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Semicolon)?;

        Ok(Stmt::Expression(ExpressionStmt {
            span: Span::new(expression.get_span().start.clone(), parser.previous_end()),
            expression,
        }))
    })
}

/// Parses `let|const|var name (= value)?` without the trailing `;`.
fn parse_var_decl(parser: &mut Parser) -> Result<VarDeclStmt, Error> {
    let start_token = parser.advance().clone();
    let kind = match start_token.kind {
        TokenKind::Const => VarKind::Const,
        TokenKind::Var => VarKind::Var,
        _ => VarKind::Let,
    };

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("expected identifier during variable declaration"),
        },
        parser.get_position(),
    );
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    if kind == VarKind::Const && assigned_value.is_none() {
        return Err(Error::new(
            ErrorImpl::MissingConstInitializer {
                variable: identifier,
            },
            parser.get_position(),
        ));
    }

    if kind == VarKind::Var {
        parser.declare_var(&identifier);
    }

    Ok(VarDeclStmt {
        span: Span::new(start_token.span.start, parser.previous_end()),
        kind,
        identifier,
        assigned_value,
    })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let mut declaration = parse_var_decl(parser)?;
    parser.expect(TokenKind::Semicolon)?;
    declaration.span.end = parser.previous_end();

    Ok(Stmt::VarDecl(declaration))
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: parser.current_token().value.clone(),
            message: String::from("function declarations require a name"),
        },
        parser.get_position(),
    );
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?.value;

    let definition = parse_function_def(parser, start, Some(identifier.clone()))?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        span: definition.span.clone(),
        identifier,
        definition,
    }))
}

/// Parses `{ statements }` into a BlockStmt.
pub fn parse_block_body(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?.span.start;

    let mut body = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly && parser.has_tokens() {
        body.push(parse_stmt(parser)?);
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(BlockStmt {
        body,
        span: Span::new(start, end),
    })
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::Block(parse_block_body(parser)?))
}

fn parse_condition(parser: &mut Parser) -> Result<crate::ast::ast::Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(condition)
}

/// Parses the body of an `if`, `else` or loop. Declarations there must be
/// wrapped in a block.
fn parse_body_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.current_token();
    if matches!(
        token.kind,
        TokenKind::Function | TokenKind::Let | TokenKind::Const
    ) {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from("a declaration cannot be the body of a statement"),
            },
            token.span.start.clone(),
        ));
    }

    parse_stmt(parser)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let then_body = Box::new(parse_body_stmt(parser)?);

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(Box::new(parse_body_stmt(parser)?))
    } else {
        None
    };

    Ok(Stmt::If(IfStmt {
        condition,
        then_body,
        else_body,
        span: Span::new(start, parser.previous_end()),
    }))
}

/// Parses a loop body with `break`/`continue` allowed.
fn parse_loop_body(parser: &mut Parser) -> Result<Box<Stmt>, Error> {
    parser.enter_loop();
    let body = parse_body_stmt(parser);
    parser.exit_loop();
    Ok(Box::new(body?))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_condition(parser)?;
    let body = parse_loop_body(parser)?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: Span::new(start, parser.previous_end()),
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parser.expect(TokenKind::OpenParen)?;

    let init = match parser.current_token_kind() {
        TokenKind::Semicolon => None,
        TokenKind::Let | TokenKind::Const | TokenKind::Var => {
            Some(Box::new(Stmt::VarDecl(parse_var_decl(parser)?)))
        }
        _ => {
            let expression = parse_expr(parser, BindingPower::Default)?;
            Some(Box::new(Stmt::Expression(ExpressionStmt {
                span: expression.get_span().clone(),
                expression,
            })))
        }
    };
    parser.expect(TokenKind::Semicolon)?;

    let condition = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::Semicolon)?;

    let update = if parser.current_token_kind() != TokenKind::CloseParen {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };
    parser.expect(TokenKind::CloseParen)?;

    let body = parse_loop_body(parser)?;

    Ok(Stmt::For(ForStmt {
        init,
        condition,
        update,
        body,
        span: Span::new(start, parser.previous_end()),
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();

    if !parser.in_function() {
        return Err(Error::new(ErrorImpl::IllegalReturn, start_token.span.start));
    }

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span::new(start_token.span.start, parser.previous_end()),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    if !parser.in_loop() {
        return Err(Error::new(ErrorImpl::IllegalBreak, start));
    }
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Break(BreakStmt {
        span: Span::new(start, parser.previous_end()),
    }))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    if !parser.in_loop() {
        return Err(Error::new(ErrorImpl::IllegalContinue, start));
    }
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Continue(ContinueStmt {
        span: Span::new(start, parser.previous_end()),
    }))
}

pub fn parse_empty_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let span = parser.advance().span.clone();
    Ok(Stmt::Empty(EmptyStmt { span }))
}
