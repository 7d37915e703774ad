//! Hand-written recursive-descent parser for the config DSL (`SPEC_FULL.md`
//! §4.8), producing the [`Config`] value `spec.md` §3 describes.
//!
//! ```text
//! decl        := perm_name string? restriction* ';'
//! restriction := '->' expr string? (',' expr string?)*
//! implicit    := 'implicit' perm_name ';'
//! enforce     := 'enforce' enforce_target ';'
//! enforce_target := string | ident | string ident
//! expr        := or_expr
//! or_expr     := and_expr ('||' and_expr)*
//! and_expr    := unary ('&&' unary)*
//! unary       := '!' unary | atom
//! atom        := perm_name | '(' expr ')'
//! ```

use crate::ast::types::Position;
use crate::config::types::{Config, Declaration, Enforcement, Expression, Restriction};
use crate::errors::SetupError;
use crate::ident::PermName;
use crate::permission::lattice::{Capability, PermissionPresence};

struct Parser<'a> {
    path: String,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Ident(&'a str),
    Str(String),
    Arrow,
    Semi,
    Comma,
    LParen,
    RParen,
    AndAnd,
    OrOr,
    Bang,
    Implicit,
    Enforce,
}

/// Parse a complete config document, merging `errors.rs`-style failure
/// into a single [`SetupError::Config`].
pub fn parse_config(path: &str, text: &str) -> Result<Config, SetupError> {
    let tokens = tokenize(path, text)?;
    let mut parser = Parser { path: path.to_string(), tokens, pos: 0 };
    parser.parse_document()
}

fn tokenize<'a>(path: &str, text: &'a str) -> Result<Vec<Token<'a>>, SetupError> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '#' {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        match c {
            ';' => {
                tokens.push(Token::Semi);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '!' => {
                tokens.push(Token::Bang);
                i += 1;
            }
            '-' if bytes.get(i + 1) == Some(&b'>') => {
                tokens.push(Token::Arrow);
                i += 2;
            }
            '&' if bytes.get(i + 1) == Some(&b'&') => {
                tokens.push(Token::AndAnd);
                i += 2;
            }
            '|' if bytes.get(i + 1) == Some(&b'|') => {
                tokens.push(Token::OrOr);
                i += 2;
            }
            '"' => {
                let start = i + 1;
                let mut j = start;
                while j < bytes.len() && bytes[j] != b'"' {
                    j += 1;
                }
                if j >= bytes.len() {
                    return Err(unterminated_string(path));
                }
                tokens.push(Token::Str(text[start..j].to_string()));
                i = j + 1;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < bytes.len() && ((bytes[i] as char).is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let word = &text[start..i];
                tokens.push(match word {
                    "implicit" => Token::Implicit,
                    "enforce" => Token::Enforce,
                    _ => Token::Ident(word),
                });
            }
            _ => return Err(unexpected_char(path, c)),
        }
    }
    Ok(tokens)
}

fn unterminated_string(path: &str) -> SetupError {
    SetupError::Config { position: Position::new(path, 0, 0, 0), message: "unterminated string literal".into() }
}

fn unexpected_char(path: &str, c: char) -> SetupError {
    SetupError::Config { position: Position::new(path, 0, 0, 0), message: format!("unexpected character '{c}'") }
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> SetupError {
        SetupError::Config { position: Position::new(self.path.clone(), 0, 0, 0), message: message.into() }
    }

    fn peek(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let t = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        t
    }

    fn expect(&mut self, expected: &Token<'a>) -> Result<(), SetupError> {
        match self.bump() {
            Some(ref t) if t == expected => Ok(()),
            other => Err(self.error(format!("expected {expected:?}, found {other:?}"))),
        }
    }

    fn parse_document(&mut self) -> Result<Config, SetupError> {
        let mut config = Config::new();
        while let Some(tok) = self.peek().cloned() {
            match tok {
                Token::Implicit => self.parse_implicit(&mut config)?,
                Token::Enforce => self.parse_enforce(&mut config)?,
                Token::Ident(_) => self.parse_decl(&mut config)?,
                other => return Err(self.error(format!("expected a declaration, 'implicit', or 'enforce', found {other:?}"))),
            }
        }
        Ok(config)
    }

    fn parse_implicit(&mut self, config: &mut Config) -> Result<(), SetupError> {
        self.bump();
        let name = self.expect_ident()?;
        self.expect(&Token::Semi)?;
        let decl = Declaration { implicit: true, description: None, restrictions: vec![] };
        merge_into(config, name, decl);
        Ok(())
    }

    fn parse_enforce(&mut self, config: &mut Config) -> Result<(), SetupError> {
        self.bump();
        let enforcement = match self.bump() {
            Some(Token::Str(s)) => match self.peek() {
                Some(Token::Ident(_)) => {
                    let name = self.expect_ident()?;
                    Enforcement::EnforcePathFunction(s, name)
                }
                _ => Enforcement::EnforcePath(s),
            },
            Some(Token::Ident(n)) => Enforcement::EnforceFunction(n.to_string()),
            other => return Err(self.error(format!("expected a string or identifier after 'enforce', found {other:?}"))),
        };
        self.expect(&Token::Semi)?;
        config.enforcements.push(enforcement);
        Ok(())
    }

    fn parse_decl(&mut self, config: &mut Config) -> Result<(), SetupError> {
        let name = self.expect_ident()?;
        let description = match self.peek() {
            Some(Token::Str(_)) => match self.bump() {
                Some(Token::Str(s)) => Some(s),
                _ => unreachable!(),
            },
            _ => None,
        };
        let mut restrictions = Vec::new();
        while matches!(self.peek(), Some(Token::Arrow)) {
            self.bump();
            loop {
                let expr = self.parse_or()?;
                let desc = match self.peek() {
                    Some(Token::Str(_)) => match self.bump() {
                        Some(Token::Str(s)) => Some(s),
                        _ => unreachable!(),
                    },
                    _ => None,
                };
                restrictions.push(Restriction { name: PermName::new(&name), expression: expr, description: desc });
                if matches!(self.peek(), Some(Token::Comma)) {
                    self.bump();
                    continue;
                }
                break;
            }
        }
        self.expect(&Token::Semi)?;
        merge_into(config, name, Declaration { implicit: false, description, restrictions });
        Ok(())
    }

    fn parse_or(&mut self) -> Result<Expression, SetupError> {
        let mut lhs = self.parse_and()?;
        while matches!(self.peek(), Some(Token::OrOr)) {
            self.bump();
            let rhs = self.parse_and()?;
            lhs = Expression::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expression, SetupError> {
        let mut lhs = self.parse_unary()?;
        while matches!(self.peek(), Some(Token::AndAnd)) {
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = Expression::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expression, SetupError> {
        if matches!(self.peek(), Some(Token::Bang)) {
            self.bump();
            return Ok(Expression::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expression, SetupError> {
        match self.bump() {
            Some(Token::Ident(name)) => {
                Ok(Expression::Context(PermName::new(name), PermissionPresence::has(Capability::CapHas)))
            }
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            other => Err(self.error(format!("expected a permission name or '(', found {other:?}"))),
        }
    }

    fn expect_ident(&mut self) -> Result<String, SetupError> {
        match self.bump() {
            Some(Token::Ident(s)) => Ok(s.to_string()),
            other => Err(self.error(format!("expected an identifier, found {other:?}"))),
        }
    }
}

fn merge_into(config: &mut Config, name: String, decl: Declaration) {
    let perm = PermName::new(&name);
    match config.declarations.shift_remove(&perm) {
        Some(existing) => {
            config.declarations.insert(perm, existing.merge(decl));
        }
        None => {
            config.declarations.insert(perm, decl);
        }
    }
}
