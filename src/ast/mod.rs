/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The `Expr` and `Stmt` enums and the parsed `Program`
/// - expressions: Payloads for each expression kind, plus operators
/// - statements: Payloads for each statement kind
pub mod ast;
pub mod expressions;
pub mod statements;
