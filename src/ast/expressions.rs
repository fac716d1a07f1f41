use std::{fmt::Display, rc::Rc};

use crate::{lexer::tokens::TokenKind, Span};

use super::{ast::Expr, statements::BlockStmt};

// LITERALS

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(Rc<str>),
    Boolean(bool),
    Null,
    Undefined,
}

/// Literal Expression
/// Represents a number, string, boolean, `null` or `undefined` literal.
#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: Literal,
    pub span: Span,
}

/// Symbol Expression
/// Represents a reference to a variable.
#[derive(Debug, Clone)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

// OPERATORS

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    StrictEqual,
    StrictNotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Subtract,
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::Slash => BinaryOp::Divide,
            TokenKind::Percent => BinaryOp::Modulo,
            TokenKind::Equals => BinaryOp::Equal,
            TokenKind::NotEquals => BinaryOp::NotEqual,
            TokenKind::StrictEquals => BinaryOp::StrictEqual,
            TokenKind::StrictNotEquals => BinaryOp::StrictNotEqual,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEquals => BinaryOp::LessEqual,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEquals => BinaryOp::GreaterEqual,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::StrictEqual => "===",
            BinaryOp::StrictNotEqual => "!==",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    Typeof,
    Increment,
    Decrement,
}

impl UnaryOp {
    pub fn is_update(&self) -> bool {
        matches!(self, UnaryOp::Increment | UnaryOp::Decrement)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Typeof => "typeof",
            UnaryOp::Increment => "++",
            UnaryOp::Decrement => "--",
        }
    }
}

/// `=` or one of the compound assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl AssignOp {
    pub fn from_token(kind: TokenKind) -> Option<AssignOp> {
        Some(match kind {
            TokenKind::Assignment => AssignOp::Assign,
            TokenKind::PlusEquals => AssignOp::Add,
            TokenKind::MinusEquals => AssignOp::Subtract,
            TokenKind::StarEquals => AssignOp::Multiply,
            TokenKind::SlashEquals => AssignOp::Divide,
            TokenKind::PercentEquals => AssignOp::Modulo,
            _ => return None,
        })
    }

    /// The binary operator a compound assignment applies.
    pub fn binary(&self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Subtract => Some(BinaryOp::Subtract),
            AssignOp::Multiply => Some(BinaryOp::Multiply),
            AssignOp::Divide => Some(BinaryOp::Divide),
            AssignOp::Modulo => Some(BinaryOp::Modulo),
        }
    }
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),*) => {
        $(impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_via_as_str!(BinaryOp, LogicalOp, UnaryOp);

// COMPOUND EXPRESSIONS

/// Binary Expression
/// Arithmetic, comparison and equality operators.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Logical Expression
/// `&&` and `||`, which short-circuit.
#[derive(Debug, Clone)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub operator: LogicalOp,
    pub right: Box<Expr>,
    pub span: Span,
}

/// Unary Expression
/// Prefix operators, and `++`/`--` in either position.
#[derive(Debug, Clone)]
pub struct UnaryExpr {
    pub operator: UnaryOp,
    pub operand: Box<Expr>,
    pub prefix: bool,
    pub span: Span,
}

/// Assignment Expression
/// The assignee is always a symbol or a member expression.
#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub assignee: Box<Expr>,
    pub operator: AssignOp,
    pub value: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// Member Expression
/// `object.name` (with `property` a string literal) or `object[property]`.
#[derive(Debug, Clone)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: Box<Expr>,
    pub computed: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// Object Expression
/// Properties in source order. A repeated key keeps its first position and
/// its last value.
#[derive(Debug, Clone)]
pub struct ObjectExpr {
    pub properties: Vec<(String, Expr)>,
    pub span: Span,
}

// FUNCTIONS

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Block(BlockStmt),
    /// Concise arrow body, e.g. `x => x + 1`.
    Expression(Box<Expr>),
}

/// A function's parameters and body, shared between the tree and every
/// closure created from it.
#[derive(Debug)]
pub struct FunctionDef {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: FunctionBody,
    /// `var` names declared anywhere in the body outside nested functions.
    pub var_names: Vec<String>,
    pub is_arrow: bool,
    pub span: Span,
}

/// Function Expression
/// `function name?(params) { ... }` in expression position.
#[derive(Debug, Clone)]
pub struct FunctionExpr {
    pub definition: Rc<FunctionDef>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ArrowFunctionExpr {
    pub definition: Rc<FunctionDef>,
    pub span: Span,
}
