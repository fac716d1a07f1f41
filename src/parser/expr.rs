use std::rc::Rc;

use crate::{
    ast::{
        ast::Expr,
        expressions::{
            ArrayExpr, ArrowFunctionExpr, AssignOp, AssignmentExpr, BinaryExpr, BinaryOp,
            CallExpr, FunctionBody, FunctionDef, FunctionExpr, Literal, LiteralExpr, LogicalExpr,
            LogicalOp, MemberExpr, ObjectExpr, SymbolExpr, UnaryExpr, UnaryOp,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    stack::ensure_sufficient_stack,
    Position, Span,
};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block_body};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    ensure_sufficient_stack(|| parse_expr_inner(parser, bp))
}

fn parse_expr_inner(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud_fn(parser)?;

    // While the next operator binds tighter than the caller, keep extending lhs
    loop {
        let token_kind = parser.current_token_kind();
        let next_bp = *parser
            .get_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);

        if next_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        left = led_fn(parser, left, next_bp)?;
    }

    Ok(left)
}

fn literal(value: Literal, span: Span) -> Expr {
    Expr::Literal(LiteralExpr { value, span })
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    let value = match token.kind {
        TokenKind::Number => match token.value.parse::<f64>() {
            Ok(number) => Literal::Number(number),
            Err(_) => {
                return Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                ))
            }
        },
        TokenKind::String => Literal::String(Rc::from(token.value.as_str())),
        TokenKind::True => Literal::Boolean(true),
        TokenKind::False => Literal::Boolean(false),
        TokenKind::Null => Literal::Null,
        TokenKind::Undefined => Literal::Undefined,
        _ => {
            return Err(Error::new(
                ErrorImpl::UnexpectedToken { token: token.value },
                token.span.start,
            ))
        }
    };

    Ok(literal(value, token.span))
}

/// An identifier, or the single parameter of `name => body`.
pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.peek_kind(1) == TokenKind::FatArrow {
        let start = parser.get_position();
        let param = parser.advance().value.clone();
        return parse_arrow_rest(parser, start, vec![param]);
    }

    let token = parser.advance();
    Ok(Expr::Symbol(SymbolExpr {
        value: token.value.clone(),
        span: token.span.clone(),
    }))
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(operator) = BinaryOp::from_token(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken { token: operator_token.value },
            operator_token.span.start,
        ));
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_logical_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator = match parser.advance().kind {
        TokenKind::And => LogicalOp::And,
        _ => LogicalOp::Or,
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Logical(LogicalExpr {
        span: left.get_span().to(right.get_span()),
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Not => UnaryOp::Not,
        TokenKind::Dash => UnaryOp::Negate,
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Typeof => UnaryOp::Typeof,
        TokenKind::PlusPlus => UnaryOp::Increment,
        _ => UnaryOp::Decrement,
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    if operator.is_update() && !operand.is_assignable() {
        return Err(Error::new(
            ErrorImpl::InvalidUpdateTarget {
                operator: operator.to_string(),
            },
            operand.get_span().start.clone(),
        ));
    }

    Ok(Expr::Unary(UnaryExpr {
        span: Span::new(operator_token.span.start, operand.get_span().end.clone()),
        operator,
        operand: Box::new(operand),
        prefix: true,
    }))
}

pub fn parse_postfix_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::PlusPlus => UnaryOp::Increment,
        _ => UnaryOp::Decrement,
    };

    if !left.is_assignable() {
        return Err(Error::new(
            ErrorImpl::InvalidUpdateTarget {
                operator: operator.to_string(),
            },
            operator_token.span.start,
        ));
    }

    Ok(Expr::Unary(UnaryExpr {
        span: Span::new(left.get_span().start.clone(), operator_token.span.end),
        operator,
        operand: Box::new(left),
        prefix: false,
    }))
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    if !left.is_assignable() {
        return Err(Error::new(
            ErrorImpl::InvalidAssignmentTarget,
            left.get_span().start.clone(),
        ));
    }

    let operator = AssignOp::from_token(operator_token.kind).unwrap_or(AssignOp::Assign);

    // Right-associative: `a = b = c` is `a = (b = c)`
    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Assignment(AssignmentExpr {
        span: left.get_span().to(value.get_span()),
        assignee: Box::new(left),
        operator,
        value: Box::new(value),
    }))
}

/// A parenthesized expression, or the parameter list of an arrow function
/// when the matching `)` is followed by `=>`.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if is_arrow_ahead(parser) {
        return parse_arrow_params(parser);
    }

    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Reports whether the current `(` opens an arrow parameter list: nothing
/// but identifiers and commas up to a `)` followed by `=>`. The scan stops
/// at the first other token, so nested groups are never rescanned.
fn is_arrow_ahead(parser: &Parser) -> bool {
    let mut offset = 1;

    loop {
        match parser.peek_kind(offset) {
            TokenKind::Identifier | TokenKind::Comma => offset += 1,
            TokenKind::CloseParen => return parser.peek_kind(offset + 1) == TokenKind::FatArrow,
            _ => return false,
        }
    }
}

fn parse_arrow_params(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;

    let params = parse_param_list(parser)?;

    parse_arrow_rest(parser, start, params)
}

/// Parses identifiers up to and including the closing `)`.
fn parse_param_list(parser: &mut Parser) -> Result<Vec<String>, Error> {
    let mut params = Vec::new();

    while parser.current_token_kind() != TokenKind::CloseParen {
        let error = Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected parameter name"),
            },
            parser.get_position(),
        );
        params.push(parser.expect_error(TokenKind::Identifier, Some(error))?.value);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok(params)
}

/// Parses `=> body` once the parameters are known.
fn parse_arrow_rest(parser: &mut Parser, start: Position, params: Vec<String>) -> Result<Expr, Error> {
    parser.expect(TokenKind::FatArrow)?;

    let saved = parser.enter_function();
    let body = if parser.current_token_kind() == TokenKind::OpenCurly {
        parse_block_body(parser).map(FunctionBody::Block)
    } else {
        parse_expr(parser, BindingPower::Default).map(|expr| FunctionBody::Expression(Box::new(expr)))
    };
    let var_names = parser.exit_function(saved);
    let body = body?;

    let span = Span::new(start, parser.previous_end());
    let definition = Rc::new(FunctionDef {
        name: None,
        params,
        body,
        var_names,
        is_arrow: true,
        span: span.clone(),
    });

    Ok(Expr::ArrowFunction(ArrowFunctionExpr { definition, span }))
}

/// Parses `(params) { body }` for both declarations and expressions.
pub fn parse_function_def(
    parser: &mut Parser,
    start: Position,
    name: Option<String>,
) -> Result<Rc<FunctionDef>, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let params = parse_param_list(parser)?;

    let saved = parser.enter_function();
    let body = parse_block_body(parser);
    let var_names = parser.exit_function(saved);
    let body = body?;

    Ok(Rc::new(FunctionDef {
        name,
        params,
        body: FunctionBody::Block(body),
        var_names,
        is_arrow: false,
        span: Span::new(start, parser.previous_end()),
    }))
}

pub fn parse_function_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let name = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.advance().value.clone())
    } else {
        None
    };

    let definition = parse_function_def(parser, start, name)?;

    Ok(Expr::Function(FunctionExpr {
        span: definition.span.clone(),
        definition,
    }))
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    reject_postfix_update(parser, &left)?;
    parser.advance();

    let mut arguments = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        arguments.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: Span::new(left.get_span().start.clone(), parser.previous_end()),
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    reject_postfix_update(parser, &left)?;
    parser.advance();

    // Keywords are valid property names: `obj.if`
    let token = parser.current_token();
    if token.kind != TokenKind::Identifier && !token.kind.is_reserved() {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: token.value.clone(),
                message: String::from("expected property name after `.`"),
            },
            token.span.start.clone(),
        ));
    }

    let token = parser.advance().clone();
    let property = literal(Literal::String(Rc::from(token.value.as_str())), token.span.clone());

    Ok(Expr::Member(MemberExpr {
        span: Span::new(left.get_span().start.clone(), token.span.end),
        object: Box::new(left),
        property: Box::new(property),
        computed: false,
    }))
}

pub fn parse_computed_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    reject_postfix_update(parser, &left)?;
    parser.advance();

    let property = parse_expr(parser, BindingPower::Default)?;
    let end = parser.expect(TokenKind::CloseBracket)?.span.end;

    Ok(Expr::Member(MemberExpr {
        span: Span::new(left.get_span().start.clone(), end),
        object: Box::new(left),
        property: Box::new(property),
        computed: true,
    }))
}

/// `x++ ++`, `x++.y` and `x++()` are all rejected: a postfix update is
/// applied at most once and ends the chain.
fn reject_postfix_update(parser: &Parser, left: &Expr) -> Result<(), Error> {
    if left.is_postfix_update() {
        return Err(parser.unexpected());
    }
    Ok(())
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let mut elements = vec![];

    while parser.current_token_kind() != TokenKind::CloseBracket {
        elements.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let end = parser.expect(TokenKind::CloseBracket)?.span.end;

    Ok(Expr::Array(ArrayExpr {
        elements,
        span: Span::new(start, end),
    }))
}

/// `{ key: value, shorthand, "quoted": value, 1: value }`
pub fn parse_object_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();

    let mut properties = vec![];

    while parser.current_token_kind() != TokenKind::CloseCurly {
        let key_token = parser.current_token().clone();
        let valid_key = matches!(
            key_token.kind,
            TokenKind::Identifier | TokenKind::String | TokenKind::Number
        ) || key_token.kind.is_reserved();

        if !valid_key {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: key_token.value,
                    message: String::from("expected property name"),
                },
                key_token.span.start,
            ));
        }
        parser.advance();

        let shorthand = key_token.kind == TokenKind::Identifier
            && matches!(
                parser.current_token_kind(),
                TokenKind::Comma | TokenKind::CloseCurly
            );

        let value = if shorthand {
            Expr::Symbol(SymbolExpr {
                value: key_token.value.clone(),
                span: key_token.span.clone(),
            })
        } else {
            parser.expect(TokenKind::Colon)?;
            parse_expr(parser, BindingPower::Default)?
        };

        properties.push((key_token.value, value));

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else {
            break;
        }
    }

    let end = parser.expect(TokenKind::CloseCurly)?.span.end;

    Ok(Expr::Object(ObjectExpr {
        properties,
        span: Span::new(start, end),
    }))
}
