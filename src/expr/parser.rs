//! Recursive-descent parser over the mini-language's token stream.
//!
//! A parse failure at any point degrades the whole expression to
//! `Symbol::Unknown` rather than raising — callers (the tree decoder) must
//! tolerate unparseable call-site text without aborting the tree. Unlike
//! the tree decoder and path walker, this recursion is bounded by
//! expression nesting in hand-written call-site source text, not by
//! untrusted document depth, so plain recursive descent is appropriate
//! here.

use super::lexer::{lex, Token};
use crate::model::symbol::{Range, Symbol};

/// Parse `src` into a `Symbol`, returning `Symbol::Unknown` on any failure.
pub fn parse(src: &str) -> Symbol {
    let tokens = lex(src);
    let mut p = Parser { tokens, pos: 0 };
    match p.expression() {
        Some(sym) if p.pos == p.tokens.len() => sym,
        _ => Symbol::Unknown,
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Binary operators grouped by precedence, lowest first. Parsed
/// left-associatively via precedence climbing.
const PRECEDENCE: &[&[&str]] = &[
    &["||"],
    &["&&"],
    &["|"],
    &["^"],
    &["&"],
    &["==", "!="],
    &["<", "<=", ">", ">="],
    &["<<", ">>"],
    &["+", "-"],
    &["*", "/", "%"],
];

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn eat(&mut self, want: &Token) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// `expression := binary | binary '@=' '{' constraint_list '}'`
    fn expression(&mut self) -> Option<Symbol> {
        let target = self.binary(0)?;
        if self.eat(&Token::ConstraintOp) {
            if !self.eat(&Token::LBrace) {
                return None;
            }
            let ranges = self.constraint_list()?;
            if !self.eat(&Token::RBrace) {
                return None;
            }
            return Some(Symbol::Constraint {
                target: Box::new(target),
                ranges,
            });
        }
        Some(target)
    }

    fn constraint_list(&mut self) -> Option<Vec<Range>> {
        let mut out = vec![self.constraint()?];
        while self.eat(&Token::Comma) {
            out.push(self.constraint()?);
        }
        Some(out)
    }

    /// `constraint := '[' sint ',' sint ']'`
    fn constraint(&mut self) -> Option<Range> {
        if !self.eat(&Token::LBracket) {
            return None;
        }
        let lo = self.sint()?;
        if !self.eat(&Token::Comma) {
            return None;
        }
        let hi = self.sint()?;
        if !self.eat(&Token::RBracket) {
            return None;
        }
        Some((lo, hi))
    }

    /// `sint := INT | '-' INT`
    fn sint(&mut self) -> Option<i64> {
        let neg = self.eat(&Token::Op("-"));
        match self.advance()? {
            Token::Int(v) => Some(if neg { -v } else { v }),
            _ => None,
        }
    }

    /// Precedence-climbing binary parse starting at precedence level `level`.
    fn binary(&mut self, level: usize) -> Option<Symbol> {
        if level >= PRECEDENCE.len() {
            return self.cast();
        }
        let mut lhs = self.binary(level + 1)?;
        loop {
            let op = match self.peek() {
                Some(Token::Op(s)) if PRECEDENCE[level].contains(s) => *s,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.binary(level + 1)?;
            lhs = Symbol::BinaryOp {
                lhs: Box::new(lhs),
                op: op.to_string(),
                rhs: Box::new(rhs),
            };
        }
        Some(lhs)
    }

    /// `cast := unary` — no explicit C-style cast syntax in this grammar;
    /// kept as its own production to mirror the precedence table's shape.
    fn cast(&mut self) -> Option<Symbol> {
        self.unary()
    }

    /// `unary := postfix | '&' postfix` — address-of is absorbed as a no-op.
    fn unary(&mut self) -> Option<Symbol> {
        if self.eat(&Token::Op("&")) {
            return self.postfix();
        }
        self.postfix()
    }

    /// `postfix := primary (-> ID | '[' expression ']' | '(' arg_list ')')*`
    fn postfix(&mut self) -> Option<Symbol> {
        let mut sym = self.primary()?;
        loop {
            if self.eat(&Token::Arrow) {
                let member = match self.advance()? {
                    Token::Ident(name) => name,
                    _ => return None,
                };
                sym = Symbol::Field { base: Box::new(sym), member };
            } else if self.eat(&Token::LBracket) {
                let index = self.expression()?;
                if !self.eat(&Token::RBracket) {
                    return None;
                }
                sym = Symbol::Array { base: Box::new(sym), index: Box::new(index) };
            } else if self.eat(&Token::LParen) {
                let args = self.arg_list()?;
                if !self.eat(&Token::RParen) {
                    return None;
                }
                sym = Symbol::Call { callee: Box::new(sym), args };
            } else {
                break;
            }
        }
        Some(sym)
    }

    /// `arg_list := ε | expression (',' expression)*`
    fn arg_list(&mut self) -> Option<Vec<Symbol>> {
        if matches!(self.peek(), Some(Token::RParen)) {
            return Some(vec![]);
        }
        let mut out = vec![self.expression()?];
        while self.eat(&Token::Comma) {
            out.push(self.expression()?);
        }
        Some(out)
    }

    /// `primary := ID | sint | STRING | '(' expression ')'`
    fn primary(&mut self) -> Option<Symbol> {
        match self.peek()?.clone() {
            Token::Ident(name) => {
                self.pos += 1;
                Some(Symbol::Id(name))
            }
            Token::Int(_) | Token::Op("-") => {
                let v = self.sint()?;
                Some(Symbol::ConcreteInt(v))
            }
            Token::Str(text) => {
                self.pos += 1;
                Some(Symbol::StringLiteral(text))
            }
            Token::LParen => {
                self.pos += 1;
                let inner = self.expression()?;
                if !self.eat(&Token::RParen) {
                    return None;
                }
                Some(inner)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_call_with_binary_arg() {
        let sym = parse("f(x * 2)");
        assert_eq!(sym.to_string(), "f(x * 2)");
    }

    #[test]
    fn parses_field_and_array() {
        let sym = parse("p->len");
        assert_eq!(sym.to_string(), "p->len");
        let sym = parse("arr[idx]");
        assert_eq!(sym.to_string(), "arr[idx]");
    }

    #[test]
    fn parses_constraint_literal() {
        let sym = parse("x @= { [0,10], [20,30] }");
        match &sym {
            Symbol::Constraint { ranges, .. } => {
                assert_eq!(ranges, &vec![(0, 10), (20, 30)]);
            }
            other => panic!("expected Constraint, got {other:?}"),
        }
    }

    #[test]
    fn precedence_matches_c() {
        // '*' binds tighter than '+'.
        let sym = parse("1 + 2 * 3");
        assert_eq!(sym.to_string(), "1 + 2 * 3");
        match sym {
            Symbol::BinaryOp { op, rhs, .. } => {
                assert_eq!(op, "+");
                assert!(matches!(*rhs, Symbol::BinaryOp { .. }));
            }
            other => panic!("expected BinaryOp, got {other:?}"),
        }
    }

    #[test]
    fn round_trips_through_canonical_form() {
        let sym = parse("malloc(256)->field[1]");
        let reparsed = parse(&sym.to_string());
        assert_eq!(sym, reparsed);
    }

    #[test]
    fn garbage_degrades_to_unknown() {
        assert_eq!(parse("(((("), Symbol::Unknown);
        assert_eq!(parse(""), Symbol::Unknown);
    }

    #[test]
    fn unary_address_of_is_absorbed() {
        let sym = parse("&x");
        assert_eq!(sym, Symbol::Id("x".into()));
    }
}
