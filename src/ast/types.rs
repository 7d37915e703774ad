//! The C AST shape Ward consumes from the external preprocessor/parser
//! (`spec.md` §1, §6), restricted to exactly the constructs §4.2's lowering
//! table enumerates. Anything else (types, most declarations, most of the
//! C grammar) is simply not represented here — it would contribute no
//! calls and so has no reason to exist in this tree.

use serde::{Deserialize, Serialize};

/// A position in a translation unit's source text, including the
/// originating path — diagnostics need `path:line:` (§4.6), and a single
/// analysis run spans many translation units at once.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(path: impl Into<String>, line: usize, column: usize, offset: usize) -> Self {
        Self { path: path.into(), line, column, offset }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path, self.line)
    }
}

/// A span in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Storage class of a declaration, as far as Ward cares: only whether it is
/// file-local (`static`) and therefore subject to §4.1's renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageClass {
    Static,
    Extern,
}

/// Binary/assignment operators. Ward does not interpret operator semantics —
/// only the left-to-right evaluation order of the two operands matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Assign,
    Other,
}

/// Who is being called at a call expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Callee {
    /// `f(...)` with `f` a named identifier.
    Ident(String),
    /// `f(...)` with `f` a non-identifier expression (indirect call).
    Indirect(Box<Expr>),
}

/// Expressions, restricted to the constructs `spec.md` §4.2 lowers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// `expr_1, expr_2, ...`
    Comma(Vec<Expr>),
    /// `a = b` / `a op b` — operands lower left-to-right; Ward does not
    /// distinguish which operator was used.
    BinOp(BinOp, Box<Expr>, Box<Expr>),
    /// `a[b]`
    Index(Box<Expr>, Box<Expr>),
    /// `a?.m` / `a.m` / `a->m` member access.
    Member(Box<Expr>, String),
    /// `f(a1, ..., an)`, named or indirect.
    Call { callee: Callee, args: Vec<Expr> },
    /// `a ? b : c`
    Ternary(Box<Expr>, Box<Expr>, Box<Expr>),
    /// `sizeof`, string/integer constants, `&&label` — contribute no calls.
    Atom,
    /// Compound literal / designated initializer list — all initializer
    /// expressions are lowered.
    CompoundLiteral(Vec<Expr>),
    /// Statement expression `({ ... })` — contained statements are lowered.
    StatementExpr(Vec<Stmt>),
}

/// Statements, restricted to the constructs `spec.md` §4.2 lowers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(Expr),
    /// `return expr;` — the natural extension of "statements reduce to
    /// linear composition of call sites" to the one expression a return
    /// statement carries (not itself named in §4.2's table, whose listed
    /// constructs are all expression-level or control-flow; a bare
    /// statement kind that evaluates an expression falls under the same
    /// "lower operands left-to-right" rule as any other expression
    /// statement).
    Return(Option<Expr>),
    /// `{ s1; s2; ... }`
    Compound(Vec<Stmt>),
    /// `if (a) s1 else s2`
    If { cond: Expr, then_branch: Box<Stmt>, else_branch: Option<Box<Stmt>> },
    /// `switch (a) body` — no branching introduced at lowering; cases
    /// contribute to the linear sequence.
    Switch { cond: Expr, body: Box<Stmt> },
    /// `while (c) s`
    While { cond: Expr, body: Box<Stmt> },
    /// `for (init; c; step) s`
    For { init: Option<Expr>, cond: Option<Expr>, step: Option<Expr>, body: Box<Stmt> },
    /// `do s while (c)`
    DoWhile { body: Box<Stmt>, cond: Expr },
    /// `goto label;` — contributes no calls.
    Goto(String),
    /// `continue;` — contributes no calls.
    Continue,
    /// `break;` — contributes no calls.
    Break,
    /// Inline `asm(...)` — contributes no calls.
    Asm(String),
    /// A nested function definition — not modelled; contributes no calls.
    NestedFunctionDef,
}

/// A function body: a flat list of top-level statements (the outermost
/// compound statement's contents).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionBody {
    pub statements: Vec<Stmt>,
}

/// A single declared/defined function, at the abstraction level the rest of
/// the pipeline needs: identity, storage class, raw `ward(...)`-shaped
/// attribute texts (parsed by `crate::attrs`), and an optional body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub name: String,
    pub hash: u64,
    pub position: Position,
    pub storage: StorageClass,
    /// Raw attribute-expression texts, e.g. `"ward(need(lock))"`. Unparsed
    /// here — extraction and validation happen in `crate::attrs` (§4.3).
    pub attributes: Vec<String>,
    pub body: Option<FunctionBody>,
}

/// One translation unit: a path and its ordered declaration list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub path: String,
    pub declarations: Vec<Declaration>,
}
