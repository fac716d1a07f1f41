use std::{rc::Rc, slice::Iter};

use crate::Span;

use super::{
    ast::{Expr, Stmt},
    expressions::FunctionDef,
};

/// Block Statement
/// Represents a block of statements in the AST.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl BlockStmt {
    pub fn iter(&self) -> Iter<'_, Stmt> {
        self.body.iter()
    }
}

/// Expression Statement
/// Represents an expression evaluated for its effects.
#[derive(Debug, Clone)]
pub struct ExpressionStmt {
    pub expression: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Let,
    Const,
    Var,
}

/// Variable Declaration Statement
/// `let`, `const` or `var`, with an optional initializer (required for
/// `const`).
#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub kind: VarKind,
    pub identifier: String,
    pub assigned_value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Box<Stmt>,
    pub else_body: Option<Box<Stmt>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// For Statement
/// Every clause of the head is optional; `init` is a declaration or an
/// expression statement.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
    pub span: Span,
}

/// Function Declaration Statement
#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub identifier: String,
    pub definition: Rc<FunctionDef>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub span: Span,
}

/// A lone `;`.
#[derive(Debug, Clone)]
pub struct EmptyStmt {
    pub span: Span,
}
