//! Static-name disambiguation (`spec.md` §4.1).
//!
//! Renames every `static`-storage function defined in a translation unit to
//! `` `path`name `` (via [`crate::ident::static_prefixed_name`]), and
//! rewrites every `Call` site inside that translation unit's bodies that
//! references one of its own static names to match. Non-static definitions
//! and references to externally-visible functions are untouched. Once every
//! unit has been processed, their declaration lists are concatenated into
//! the single flat list `namemap` construction expects.

use std::collections::HashSet;

use crate::ast::types::{Callee, Declaration, Expr, FunctionBody, Stmt, StorageClass, TranslationUnit};
use crate::ident::static_prefixed_name;

/// Disambiguate and concatenate a set of translation units, in order, into
/// a single declaration list fit for [`crate::namemap::build_name_map`].
pub fn concatenate_translation_units(units: &[TranslationUnit]) -> Vec<Declaration> {
    units.iter().flat_map(|tu| disambiguate(tu)).collect()
}

fn disambiguate(tu: &TranslationUnit) -> Vec<Declaration> {
    let statics: HashSet<&str> = tu
        .declarations
        .iter()
        .filter(|d| d.storage == StorageClass::Static)
        .map(|d| d.name.as_str())
        .collect();

    if statics.is_empty() {
        return tu.declarations.clone();
    }

    tu.declarations
        .iter()
        .map(|decl| {
            let mut decl = decl.clone();
            if decl.storage == StorageClass::Static {
                decl.name = static_prefixed_name(&tu.path, &decl.name);
            }
            if let Some(body) = &mut decl.body {
                rewrite_body(body, &tu.path, &statics);
            }
            decl
        })
        .collect()
}

fn rewrite_body(body: &mut FunctionBody, path: &str, statics: &HashSet<&str>) {
    for stmt in &mut body.statements {
        rewrite_stmt(stmt, path, statics);
    }
}

fn rewrite_stmt(stmt: &mut Stmt, path: &str, statics: &HashSet<&str>) {
    match stmt {
        Stmt::Expr(e) => rewrite_expr(e, path, statics),
        Stmt::Return(Some(e)) => rewrite_expr(e, path, statics),
        Stmt::Return(None) => {}
        Stmt::Compound(stmts) => stmts.iter_mut().for_each(|s| rewrite_stmt(s, path, statics)),
        Stmt::If { cond, then_branch, else_branch } => {
            rewrite_expr(cond, path, statics);
            rewrite_stmt(then_branch, path, statics);
            if let Some(e) = else_branch {
                rewrite_stmt(e, path, statics);
            }
        }
        Stmt::Switch { cond, body } => {
            rewrite_expr(cond, path, statics);
            rewrite_stmt(body, path, statics);
        }
        Stmt::While { cond, body } => {
            rewrite_expr(cond, path, statics);
            rewrite_stmt(body, path, statics);
        }
        Stmt::For { init, cond, step, body } => {
            if let Some(e) = init {
                rewrite_expr(e, path, statics);
            }
            if let Some(e) = cond {
                rewrite_expr(e, path, statics);
            }
            if let Some(e) = step {
                rewrite_expr(e, path, statics);
            }
            rewrite_stmt(body, path, statics);
        }
        Stmt::DoWhile { body, cond } => {
            rewrite_stmt(body, path, statics);
            rewrite_expr(cond, path, statics);
        }
        Stmt::Goto(_) | Stmt::Continue | Stmt::Break | Stmt::Asm(_) | Stmt::NestedFunctionDef => {}
    }
}

fn rewrite_expr(expr: &mut Expr, path: &str, statics: &HashSet<&str>) {
    match expr {
        Expr::Comma(exprs) | Expr::CompoundLiteral(exprs) => {
            exprs.iter_mut().for_each(|e| rewrite_expr(e, path, statics))
        }
        Expr::BinOp(_, a, b) | Expr::Index(a, b) => {
            rewrite_expr(a, path, statics);
            rewrite_expr(b, path, statics);
        }
        Expr::Member(a, _) => rewrite_expr(a, path, statics),
        Expr::Call { callee, args } => {
            match callee {
                Callee::Ident(name) if statics.contains(name.as_str()) => {
                    *name = static_prefixed_name(path, name);
                }
                Callee::Ident(_) => {}
                Callee::Indirect(inner) => rewrite_expr(inner, path, statics),
            }
            args.iter_mut().for_each(|a| rewrite_expr(a, path, statics));
        }
        Expr::Ternary(cond, then_e, else_e) => {
            rewrite_expr(cond, path, statics);
            rewrite_expr(then_e, path, statics);
            rewrite_expr(else_e, path, statics);
        }
        Expr::Atom => {}
        Expr::StatementExpr(stmts) => stmts.iter_mut().for_each(|s| rewrite_stmt(s, path, statics)),
    }
}
