//! Lexer and parser for the literal syntax of structural descriptions.
//!
//! Each line of a description is a literal built from integers, quoted
//! strings, bare identifiers, tuples `( … )` and lists `[ … ]`. A line holding
//! several comma-separated expressions is read as a tuple, so
//! `[(-2,-1)],[(-2,-1)]` is a tuple of two one-element lists. `(x)` is plain
//! grouping and `(x,)` is a one-element tuple.

use bddlay_source::Span;
use serde::Serialize;
use std::fmt;

/// A parsed literal value with its location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Literal {
    /// The value.
    pub kind: LiteralKind,
    /// Where it was written.
    pub span: Span,
}

/// The shape of a literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralKind {
    /// A signed integer.
    Int(i64),
    /// A quoted string.
    Str(String),
    /// A bare identifier such as `a` or `None`.
    Ident(String),
    /// `( … )` with a comma, or a bare comma-separated line.
    Tuple(Vec<Literal>),
    /// `[ … ]`.
    List(Vec<Literal>),
}

impl Literal {
    /// Returns the integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            LiteralKind::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of a tuple or list.
    pub fn elements(&self) -> Option<&[Literal]> {
        match &self.kind {
            LiteralKind::Tuple(items) | LiteralKind::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Literal]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{item}")?;
            }
            Ok(())
        }
        match &self.kind {
            LiteralKind::Int(v) => write!(f, "{v}"),
            LiteralKind::Str(s) => write!(f, "{s:?}"),
            LiteralKind::Ident(s) => write!(f, "{s}"),
            LiteralKind::Tuple(items) => {
                write!(f, "(")?;
                join(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            LiteralKind::List(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
        }
    }
}

/// A syntax error inside one literal.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralError {
    /// What was wrong.
    pub message: String,
    /// Location of the offending token.
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Minus,
    Int(i64),
    Str(String),
    Ident(String),
    Eof,
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::LParen => write!(f, "`(`"),
            Tok::RParen => write!(f, "`)`"),
            Tok::LBracket => write!(f, "`[`"),
            Tok::RBracket => write!(f, "`]`"),
            Tok::Comma => write!(f, "`,`"),
            Tok::Minus => write!(f, "`-`"),
            Tok::Int(v) => write!(f, "integer `{v}`"),
            Tok::Str(s) => write!(f, "string {s:?}"),
            Tok::Ident(s) => write!(f, "identifier `{s}`"),
            Tok::Eof => write!(f, "end of line"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    tok: Tok,
    span: Span,
}

/// Parses one line of text. `base` is the byte offset of `text` in the
/// document, so the returned spans are document-absolute.
pub fn parse_literal(text: &str, base: u32) -> Result<Literal, LiteralError> {
    let tokens = lex(text, base)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_top()
}

fn lex(text: &str, base: u32) -> Result<Vec<Token>, LiteralError> {
    let bytes = text.as_bytes();
    let mut pos = 0usize;
    let mut tokens = Vec::new();
    let span = |start: usize, end: usize| Span::new(base + start as u32, base + end as u32);

    while pos < bytes.len() {
        let b = bytes[pos];
        if b.is_ascii_whitespace() {
            pos += 1;
            continue;
        }
        let start = pos;
        let tok = match b {
            b'(' => {
                pos += 1;
                Tok::LParen
            }
            b')' => {
                pos += 1;
                Tok::RParen
            }
            b'[' => {
                pos += 1;
                Tok::LBracket
            }
            b']' => {
                pos += 1;
                Tok::RBracket
            }
            b',' => {
                pos += 1;
                Tok::Comma
            }
            b'-' => {
                pos += 1;
                Tok::Minus
            }
            b'0'..=b'9' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'_') {
                    pos += 1;
                }
                let digits: String = text[start..pos].chars().filter(|&c| c != '_').collect();
                let value = digits.parse::<i64>().map_err(|_| LiteralError {
                    message: format!("integer `{}` does not fit in 64 bits", &text[start..pos]),
                    span: span(start, pos),
                })?;
                Tok::Int(value)
            }
            b'\'' | b'"' => {
                let quote = b;
                pos += 1;
                let mut value = String::new();
                loop {
                    let Some(&c) = bytes.get(pos) else {
                        return Err(LiteralError {
                            message: "unterminated string".into(),
                            span: span(start, pos),
                        });
                    };
                    if c == quote {
                        pos += 1;
                        break;
                    }
                    if c == b'\\' {
                        let escaped = bytes.get(pos + 1).copied().ok_or_else(|| LiteralError {
                            message: "unterminated string".into(),
                            span: span(start, pos + 1),
                        })?;
                        value.push(match escaped {
                            b'n' => '\n',
                            b't' => '\t',
                            other => other as char,
                        });
                        pos += 2;
                        continue;
                    }
                    let ch = text[pos..].chars().next().unwrap_or('\u{fffd}');
                    value.push(ch);
                    pos += ch.len_utf8();
                }
                Tok::Str(value)
            }
            c if c == b'_' || c.is_ascii_alphabetic() => {
                while pos < bytes.len() && (bytes[pos] == b'_' || bytes[pos].is_ascii_alphanumeric())
                {
                    pos += 1;
                }
                Tok::Ident(text[start..pos].to_string())
            }
            _ => {
                let ch = text[pos..].chars().next().unwrap_or('\u{fffd}');
                return Err(LiteralError {
                    message: format!("unexpected character `{ch}`"),
                    span: span(start, start + ch.len_utf8()),
                });
            }
        };
        tokens.push(Token {
            tok,
            span: span(start, pos),
        });
    }
    tokens.push(Token {
        tok: Tok::Eof,
        span: span(bytes.len(), bytes.len()),
    });
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if &self.peek().tok == tok {
            self.bump();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> LiteralError {
        let found = self.peek();
        LiteralError {
            message: format!("expected {expected}, found {}", found.tok),
            span: found.span,
        }
    }

    fn parse_top(&mut self) -> Result<Literal, LiteralError> {
        let first = self.parse_expr()?;
        if self.peek().tok == Tok::Eof {
            return Ok(first);
        }
        if self.peek().tok != Tok::Comma {
            return Err(self.unexpected("`,` or end of line"));
        }
        let mut span = first.span;
        let mut items = vec![first];
        while self.eat(&Tok::Comma) {
            if self.peek().tok == Tok::Eof {
                break;
            }
            let item = self.parse_expr()?;
            span = span.merge(item.span);
            items.push(item);
        }
        if self.peek().tok != Tok::Eof {
            return Err(self.unexpected("`,` or end of line"));
        }
        Ok(Literal {
            kind: LiteralKind::Tuple(items),
            span,
        })
    }

    fn parse_expr(&mut self) -> Result<Literal, LiteralError> {
        let token = self.bump();
        match token.tok {
            Tok::Int(v) => Ok(Literal {
                kind: LiteralKind::Int(v),
                span: token.span,
            }),
            Tok::Minus => {
                let next = self.bump();
                match next.tok {
                    Tok::Int(v) => Ok(Literal {
                        kind: LiteralKind::Int(-v),
                        span: token.span.merge(next.span),
                    }),
                    other => Err(LiteralError {
                        message: format!("expected integer after `-`, found {other}"),
                        span: next.span,
                    }),
                }
            }
            Tok::Str(s) => Ok(Literal {
                kind: LiteralKind::Str(s),
                span: token.span,
            }),
            Tok::Ident(s) => Ok(Literal {
                kind: LiteralKind::Ident(s),
                span: token.span,
            }),
            Tok::LBracket => {
                let items = self.parse_sequence(&Tok::RBracket, "`]`")?;
                let close = self.bump();
                Ok(Literal {
                    kind: LiteralKind::List(items),
                    span: token.span.merge(close.span),
                })
            }
            Tok::LParen => self.parse_paren(token.span),
            other => Err(LiteralError {
                message: format!("expected a value, found {other}"),
                span: token.span,
            }),
        }
    }

    /// Parses the body of `( … )` after the opening parenthesis.
    fn parse_paren(&mut self, open: Span) -> Result<Literal, LiteralError> {
        if self.peek().tok == Tok::RParen {
            let close = self.bump();
            return Ok(Literal {
                kind: LiteralKind::Tuple(Vec::new()),
                span: open.merge(close.span),
            });
        }
        let first = self.parse_expr()?;
        if self.peek().tok == Tok::RParen {
            let close = self.bump();
            return Ok(Literal {
                kind: first.kind,
                span: open.merge(close.span),
            });
        }
        if !self.eat(&Tok::Comma) {
            return Err(self.unexpected("`,` or `)`"));
        }
        let mut items = vec![first];
        items.extend(self.parse_sequence(&Tok::RParen, "`)`")?);
        let close = self.bump();
        Ok(Literal {
            kind: LiteralKind::Tuple(items),
            span: open.merge(close.span),
        })
    }

    /// Parses `expr, expr, …` up to (not including) `close`, allowing a
    /// trailing comma. Leaves `close` as the next token.
    fn parse_sequence(&mut self, close: &Tok, close_name: &str) -> Result<Vec<Literal>, LiteralError> {
        let mut items = Vec::new();
        loop {
            if &self.peek().tok == close {
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            if &self.peek().tok == close {
                return Ok(items);
            }
            if !self.eat(&Tok::Comma) {
                return Err(self.unexpected(&format!("`,` or {close_name}")));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Literal {
        parse_literal(text, 0).unwrap()
    }

    fn err(text: &str) -> LiteralError {
        parse_literal(text, 0).unwrap_err()
    }

    #[test]
    fn list_of_pairs() {
        let lit = parse("[(0,1),(-1,2)]");
        let items = lit.elements().unwrap();
        assert_eq!(items.len(), 2);
        let second = items[1].elements().unwrap();
        assert_eq!(second[0].as_int(), Some(-1));
        assert_eq!(second[1].as_int(), Some(2));
        assert!(matches!(lit.kind, LiteralKind::List(_)));
    }

    #[test]
    fn bare_commas_make_a_tuple() {
        let lit = parse("[(-2,-1)],[(-2,-1)]");
        match &lit.kind {
            LiteralKind::Tuple(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[0].kind, LiteralKind::List(_)));
            }
            other => panic!("expected tuple, got {other:?}"),
        }
        assert_eq!(lit.span, Span::new(0, 19));
    }

    #[test]
    fn grouping_versus_one_tuple() {
        assert_eq!(parse("(5)").as_int(), Some(5));
        let one = parse("(5,)");
        assert_eq!(one.elements().unwrap().len(), 1);
        assert!(matches!(one.kind, LiteralKind::Tuple(_)));
        assert_eq!(parse("()").elements().unwrap().len(), 0);
    }

    #[test]
    fn trailing_commas_allowed() {
        assert_eq!(parse("[1, 2, ]").elements().unwrap().len(), 2);
        assert_eq!(parse("(1, 2,)").elements().unwrap().len(), 2);
        assert_eq!(parse("[0],").elements().unwrap().len(), 1);
    }

    #[test]
    fn strings_and_identifiers() {
        let lit = parse("['a', \"b\", c]");
        let items = lit.elements().unwrap();
        assert_eq!(items[0].kind, LiteralKind::Str("a".into()));
        assert_eq!(items[1].kind, LiteralKind::Str("b".into()));
        assert_eq!(items[2].kind, LiteralKind::Ident("c".into()));
    }

    #[test]
    fn spans_are_offset_by_base() {
        let lit = parse_literal("[7]", 100).unwrap();
        assert_eq!(lit.span, Span::new(100, 103));
        assert_eq!(lit.elements().unwrap()[0].span, Span::new(101, 102));
    }

    #[test]
    fn negative_span_covers_sign() {
        let lit = parse("- 3");
        assert_eq!(lit.as_int(), Some(-3));
        assert_eq!(lit.span, Span::new(0, 3));
    }

    #[test]
    fn display_roundtrips_shape() {
        assert_eq!(parse("[(0,1), [5], (2,)]").to_string(), "[(0, 1), [5], (2,)]");
    }

    #[test]
    fn unbalanced_bracket() {
        let e = err("[(0,1)");
        assert!(e.message.contains("expected"), "{}", e.message);
        assert_eq!(e.span, Span::new(6, 6));
    }

    #[test]
    fn missing_comma() {
        let e = err("[(0 1)]");
        assert_eq!(e.message, "expected `,` or `)`, found integer `1`");
        assert_eq!(e.span, Span::new(4, 5));
    }

    #[test]
    fn unexpected_character() {
        let e = err("[0; 1]");
        assert_eq!(e.message, "unexpected character `;`");
        assert_eq!(e.span, Span::new(2, 3));
    }

    #[test]
    fn minus_needs_integer() {
        assert!(err("[-a]").message.starts_with("expected integer after `-`"));
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(err("['abc").message, "unterminated string");
    }

    #[test]
    fn overflowing_integer() {
        assert!(err("[99999999999999999999]").message.contains("does not fit"));
    }

    #[test]
    fn stray_closer() {
        assert!(err("[0]]").message.starts_with("expected `,` or end of line"));
    }
}
