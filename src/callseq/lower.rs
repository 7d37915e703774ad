//! Lowering C function bodies to [`CallSequence`]s (`spec.md` §4.2).
//!
//! Preserves left-to-right C evaluation order for the constructs Ward
//! models; everything else contributes no calls. Structural warnings
//! (indirect calls, nested function definitions) are collected alongside
//! the lowered sequence rather than raised as errors — lowering always
//! succeeds.

use crate::ast::types::{Callee, Expr, FunctionBody, Position, Stmt};
use crate::callseq::tree::{CallSequence, CallTree};
use crate::diagnostics::entry::DiagnosticEntry;

/// Lower a function body to its call sequence, simplified per §4.2's
/// post-construction pass. `at` is used to position any structural
/// warnings raised during lowering (the source AST here carries no
/// finer-grained per-statement positions than the enclosing declaration).
pub fn lower_function(body: &FunctionBody, at: &Position) -> (CallSequence, Vec<DiagnosticEntry>) {
    let mut warnings = Vec::new();
    let mut seq = CallSequence::empty();
    for stmt in &body.statements {
        seq.extend(lower_stmt(stmt, at, &mut warnings));
    }
    (seq.simplify(), warnings)
}

fn lower_stmt(stmt: &Stmt, at: &Position, warnings: &mut Vec<DiagnosticEntry>) -> CallSequence {
    match stmt {
        Stmt::Expr(e) => lower_expr(e, at, warnings),
        Stmt::Return(Some(e)) => lower_expr(e, at, warnings),
        Stmt::Return(None) => CallSequence::empty(),
        Stmt::Compound(stmts) => {
            let mut seq = CallSequence::empty();
            for s in stmts {
                seq.extend(lower_stmt(s, at, warnings));
            }
            seq
        }
        Stmt::If { cond, then_branch, else_branch } => {
            let header = lower_expr(cond, at, warnings);
            let then_seq = lower_stmt(then_branch, at, warnings);
            let else_seq = match else_branch {
                Some(s) => lower_stmt(s, at, warnings),
                None => CallSequence::empty(),
            };
            header.then(CallSequence::single(CallTree::Choice(then_seq, else_seq)))
        }
        Stmt::Switch { cond, body } => {
            // Conservative: no branching introduced, cases contribute
            // linearly (§4.2, §9).
            lower_expr(cond, at, warnings).then(lower_stmt(body, at, warnings))
        }
        Stmt::While { cond, body } => {
            let header = lower_expr(cond, at, warnings);
            let body_seq = lower_stmt(body, at, warnings);
            header.then(CallSequence::single(CallTree::Choice(body_seq, CallSequence::empty())))
        }
        Stmt::For { init, cond, step, body } => {
            let mut header = CallSequence::empty();
            if let Some(e) = init {
                header.extend(lower_expr(e, at, warnings));
            }
            if let Some(e) = cond {
                header.extend(lower_expr(e, at, warnings));
            }
            let mut iteration = lower_stmt(body, at, warnings);
            if let Some(e) = step {
                iteration.extend(lower_expr(e, at, warnings));
            }
            header.then(CallSequence::single(CallTree::Choice(iteration, CallSequence::empty())))
        }
        Stmt::DoWhile { body, cond } => {
            lower_stmt(body, at, warnings).then(lower_expr(cond, at, warnings))
        }
        Stmt::Goto(_) | Stmt::Continue | Stmt::Break | Stmt::Asm(_) => CallSequence::empty(),
        Stmt::NestedFunctionDef => {
            warnings.push(DiagnosticEntry::warning(at.clone(), "nested function definition encountered; not modelled".to_string()));
            CallSequence::empty()
        }
    }
}

fn lower_expr(expr: &Expr, at: &Position, warnings: &mut Vec<DiagnosticEntry>) -> CallSequence {
    match expr {
        Expr::Comma(exprs) => {
            let mut seq = CallSequence::empty();
            for e in exprs {
                seq.extend(lower_expr(e, at, warnings));
            }
            seq
        }
        Expr::BinOp(_, a, b) => lower_expr(a, at, warnings).then(lower_expr(b, at, warnings)),
        Expr::Index(a, b) => lower_expr(a, at, warnings).then(lower_expr(b, at, warnings)),
        Expr::Member(a, _) => lower_expr(a, at, warnings),
        Expr::Call { callee: Callee::Ident(name), args } => {
            let mut seq = lower_args(args, at, warnings);
            seq.push(CallTree::Call(name.clone()));
            seq
        }
        Expr::Call { callee: Callee::Indirect(inner), args } => {
            let mut seq = lower_args(args, at, warnings);
            seq.extend(lower_expr(inner, at, warnings));
            warnings.push(DiagnosticEntry::warning(at.clone(), "indirect call site; not resolved, skipped".to_string()));
            seq
        }
        Expr::Ternary(cond, then_e, else_e) => {
            let header = lower_expr(cond, at, warnings);
            let then_seq = lower_expr(then_e, at, warnings);
            let else_seq = lower_expr(else_e, at, warnings);
            header.then(CallSequence::single(CallTree::Choice(then_seq, else_seq)))
        }
        Expr::Atom => CallSequence::empty(),
        Expr::CompoundLiteral(exprs) => {
            let mut seq = CallSequence::empty();
            for e in exprs {
                seq.extend(lower_expr(e, at, warnings));
            }
            seq
        }
        Expr::StatementExpr(stmts) => {
            let mut seq = CallSequence::empty();
            for s in stmts {
                seq.extend(lower_stmt(s, at, warnings));
            }
            seq
        }
    }
}

fn lower_args(args: &[Expr], at: &Position, warnings: &mut Vec<DiagnosticEntry>) -> CallSequence {
    let mut seq = CallSequence::empty();
    for a in args {
        seq.extend(lower_expr(a, at, warnings));
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{call_stmt, if_stmt};

    fn body(statements: Vec<Stmt>) -> FunctionBody {
        FunctionBody { statements }
    }

    #[test]
    fn sequential_calls_lower_in_order() {
        let (seq, warnings) = lower_function(&body(vec![call_stmt("a"), call_stmt("b")]), &Position::default());
        assert!(warnings.is_empty());
        assert_eq!(seq, CallSequence::call("a").then(CallSequence::call("b")));
    }

    #[test]
    fn if_without_else_has_empty_arm() {
        let (seq, _) = lower_function(&body(vec![if_stmt(vec![call_stmt("f")], vec![])]), &Position::default());
        assert_eq!(seq, CallSequence::single(CallTree::Choice(CallSequence::call("f"), CallSequence::empty())));
    }

    #[test]
    fn indirect_call_warns_and_is_skipped() {
        let stmt = Stmt::Expr(Expr::Call {
            callee: Callee::Indirect(Box::new(Expr::Atom)),
            args: vec![],
        });
        let (seq, warnings) = lower_function(&body(vec![stmt]), &Position::default());
        assert!(seq.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn while_loop_is_zero_or_one_choice() {
        let stmt = Stmt::While { cond: Expr::Atom, body: Box::new(call_stmt("work")) };
        let (seq, _) = lower_function(&body(vec![stmt]), &Position::default());
        assert_eq!(seq, CallSequence::single(CallTree::Choice(CallSequence::call("work"), CallSequence::empty())));
    }

    #[test]
    fn goto_continue_break_asm_contribute_nothing() {
        let stmts = vec![
            Stmt::Goto("done".into()),
            Stmt::Continue,
            Stmt::Break,
            Stmt::Asm("nop".into()),
        ];
        let (seq, warnings) = lower_function(&body(stmts), &Position::default());
        assert!(seq.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn nested_function_warns() {
        let (seq, warnings) = lower_function(&body(vec![Stmt::NestedFunctionDef]), &Position::default());
        assert!(seq.is_empty());
        assert_eq!(warnings.len(), 1);
    }
}
