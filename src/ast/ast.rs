use crate::Span;

use super::{
    expressions::{
        ArrayExpr, ArrowFunctionExpr, AssignmentExpr, BinaryExpr, CallExpr, FunctionExpr,
        LiteralExpr, LogicalExpr, MemberExpr, ObjectExpr, SymbolExpr, UnaryExpr,
    },
    statements::{
        BlockStmt, BreakStmt, ContinueStmt, EmptyStmt, ExpressionStmt, FnDeclStmt, ForStmt,
        IfStmt, ReturnStmt, VarDeclStmt, WhileStmt,
    },
};

/// Statement Types
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum StmtType {
    ExpressionStmt,
    BlockStmt,
    VarDeclStmt,
    FnDeclStmt,
    IfStmt,
    WhileStmt,
    ForStmt,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    EmptyStmt,
}

/// Statement
///
/// Every statement kind in the AST, each wrapping a payload struct that
/// carries its own span.
#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(ExpressionStmt),
    Block(BlockStmt),
    VarDecl(VarDeclStmt),
    FnDecl(FnDeclStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    Empty(EmptyStmt),
}

impl Stmt {
    /// Returns the type of the statement.
    pub fn get_stmt_type(&self) -> StmtType {
        match self {
            Stmt::Expression(_) => StmtType::ExpressionStmt,
            Stmt::Block(_) => StmtType::BlockStmt,
            Stmt::VarDecl(_) => StmtType::VarDeclStmt,
            Stmt::FnDecl(_) => StmtType::FnDeclStmt,
            Stmt::If(_) => StmtType::IfStmt,
            Stmt::While(_) => StmtType::WhileStmt,
            Stmt::For(_) => StmtType::ForStmt,
            Stmt::Return(_) => StmtType::ReturnStmt,
            Stmt::Break(_) => StmtType::BreakStmt,
            Stmt::Continue(_) => StmtType::ContinueStmt,
            Stmt::Empty(_) => StmtType::EmptyStmt,
        }
    }

    /// Returns the span of the statement.
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::Block(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::While(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Break(stmt) => &stmt.span,
            Stmt::Continue(stmt) => &stmt.span,
            Stmt::Empty(stmt) => &stmt.span,
        }
    }
}

/// Expression
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(LiteralExpr),
    Symbol(SymbolExpr),
    Assignment(AssignmentExpr),
    Logical(LogicalExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Call(CallExpr),
    Member(MemberExpr),
    Array(ArrayExpr),
    Object(ObjectExpr),
    Function(FunctionExpr),
    ArrowFunction(ArrowFunctionExpr),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Literal(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Logical(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Unary(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::Array(expr) => &expr.span,
            Expr::Object(expr) => &expr.span,
            Expr::Function(expr) => &expr.span,
            Expr::ArrowFunction(expr) => &expr.span,
        }
    }

    /// Whether the expression can appear on the left of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Expr::Symbol(_) | Expr::Member(_))
    }

    /// Whether the expression is a postfix `++`/`--`.
    pub fn is_postfix_update(&self) -> bool {
        matches!(self, Expr::Unary(unary) if !unary.prefix && unary.operator.is_update())
    }
}

/// A parsed source file.
#[derive(Debug, Clone)]
pub struct Program {
    pub body: Vec<Stmt>,
    /// Every `var` declared at the top level, outside any function.
    pub var_names: Vec<String>,
    pub span: Span,
}
