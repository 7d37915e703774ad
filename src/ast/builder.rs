//! Programmatic AST construction, used by tests (and by anything driving
//! Ward as a library without going through the JSON ingest format).

use super::types::{Callee, Declaration, Expr, FunctionBody, Position, Stmt, StorageClass, TranslationUnit};

/// Builds a [`TranslationUnit`] declaration-by-declaration.
#[derive(Debug, Default)]
pub struct TranslationUnitBuilder {
    path: String,
    declarations: Vec<Declaration>,
}

impl TranslationUnitBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), declarations: Vec::new() }
    }

    pub fn declare(mut self, decl: Declaration) -> Self {
        self.declarations.push(decl);
        self
    }

    pub fn build(self) -> TranslationUnit {
        TranslationUnit { path: self.path, declarations: self.declarations }
    }
}

/// Builds a single [`Declaration`], defaulting to an extern, bodyless
/// prototype until [`FunctionBuilder::body`] or [`FunctionBuilder::extern_only`]
/// is applied.
#[derive(Debug)]
pub struct FunctionBuilder {
    name: String,
    hash: u64,
    position: Position,
    storage: StorageClass,
    attributes: Vec<String>,
    body: Option<FunctionBody>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>, hash: u64) -> Self {
        Self {
            name: name.into(),
            hash,
            position: Position::default(),
            storage: StorageClass::Extern,
            attributes: Vec::new(),
            body: Some(FunctionBody::default()),
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Position::new(self.position.path.clone(), line, column, 0);
        self
    }

    pub fn static_local(mut self) -> Self {
        self.storage = StorageClass::Static;
        self
    }

    pub fn attr(mut self, raw: impl Into<String>) -> Self {
        self.attributes.push(raw.into());
        self
    }

    pub fn needs(self, perm: &str) -> Self {
        self.attr(format!("ward(need({perm}))"))
    }

    pub fn uses(self, perm: &str) -> Self {
        self.attr(format!("ward(use({perm}))"))
    }

    pub fn grants(self, perm: &str) -> Self {
        self.attr(format!("ward(grant({perm}))"))
    }

    pub fn revokes(self, perm: &str) -> Self {
        self.attr(format!("ward(revoke({perm}))"))
    }

    pub fn denies(self, perm: &str) -> Self {
        self.attr(format!("ward(deny({perm}))"))
    }

    pub fn waives(self, perm: &str) -> Self {
        self.attr(format!("ward(waive({perm}))"))
    }

    pub fn calling(mut self, names: &[&str]) -> Self {
        let body = self.body.get_or_insert_with(FunctionBody::default);
        for name in names {
            body.statements.push(Stmt::Expr(Expr::Call {
                callee: Callee::Ident((*name).to_string()),
                args: Vec::new(),
            }));
        }
        self
    }

    pub fn body(mut self, body: FunctionBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn extern_only(mut self) -> Self {
        self.body = None;
        self
    }

    pub fn build(self) -> Declaration {
        Declaration {
            name: self.name,
            hash: self.hash,
            position: self.position,
            storage: self.storage,
            attributes: self.attributes,
            body: self.body,
        }
    }
}

/// Lower a simple call expression statement, for hand-written test bodies.
pub fn call_stmt(name: &str) -> Stmt {
    Stmt::Expr(Expr::Call { callee: Callee::Ident(name.to_string()), args: Vec::new() })
}

/// `if (<opaque>) then_ else else_` with no call condition, for test bodies.
pub fn if_stmt(then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Stmt {
    Stmt::If {
        cond: Expr::Atom,
        then_branch: Box::new(Stmt::Compound(then_branch)),
        else_branch: if else_branch.is_empty() {
            None
        } else {
            Some(Box::new(Stmt::Compound(else_branch)))
        },
    }
}
