//! Hand-written lexer for the call-site expression mini-language.
//!
//! Illegal characters are logged and dropped rather than raising — the
//! parser built on top of this must still be able to recover a partial
//! token stream and fall back to `Symbol::Unknown` (see `expr::parser`).

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(i64),
    Str(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Arrow,
    ConstraintOp,
    Op(&'static str),
}

/// Tokenizes `src`, silently dropping any byte that doesn't start a
/// recognized token (logged by the caller if it wants to).
pub fn lex(src: &str) -> Vec<Token> {
    let bytes = src.as_bytes();
    let mut i = 0usize;
    let mut out = Vec::new();

    while i < bytes.len() {
        let c = bytes[i] as char;

        if c == ' ' || c == '\t' {
            i += 1;
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' || c == '$' {
            let start = i;
            i += 1;
            while i < bytes.len() {
                let ch = bytes[i] as char;
                if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
                    i += 1;
                } else {
                    break;
                }
            }
            out.push(Token::Ident(src[start..i].to_string()));
            continue;
        }

        if c.is_ascii_digit() {
            let start = i;
            i += 1;
            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }
            let digits = &src[start..i];
            // Consume (and discard) a standard C integer suffix:
            // u, U, l, L, ul, UL, ll, LL and combinations thereof.
            while i < bytes.len() {
                match bytes[i] as char {
                    'u' | 'U' | 'l' | 'L' => i += 1,
                    _ => break,
                }
            }
            if let Ok(v) = digits.parse::<i64>() {
                out.push(Token::Int(v));
            }
            continue;
        }

        if c == '"' {
            let start = i;
            i += 1;
            let mut text = String::new();
            while i < bytes.len() && bytes[i] as char != '"' {
                let ch = bytes[i] as char;
                if ch == '\\' && i + 1 < bytes.len() {
                    let esc = bytes[i + 1] as char;
                    text.push(match esc {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        other => other,
                    });
                    i += 2;
                } else {
                    text.push(ch);
                    i += 1;
                }
            }
            if i < bytes.len() {
                i += 1; // closing quote
                out.push(Token::Str(text));
            } else {
                // Unterminated string: drop what we lexed, resume past it.
                i = start + 1;
            }
            continue;
        }

        // Multi-character punctuation/operators, longest match first.
        let rest = &src[i..];
        if let Some(tok) = match_multi(rest) {
            let (token, len) = tok;
            out.push(token);
            i += len;
            continue;
        }

        match c {
            '(' => out.push(Token::LParen),
            ')' => out.push(Token::RParen),
            '[' => out.push(Token::LBracket),
            ']' => out.push(Token::RBracket),
            '{' => out.push(Token::LBrace),
            '}' => out.push(Token::RBrace),
            ',' => out.push(Token::Comma),
            ':' => out.push(Token::Colon),
            '+' => out.push(Token::Op("+")),
            '-' => out.push(Token::Op("-")),
            '*' => out.push(Token::Op("*")),
            '/' => out.push(Token::Op("/")),
            '%' => out.push(Token::Op("%")),
            '|' => out.push(Token::Op("|")),
            '&' => out.push(Token::Op("&")),
            '~' => out.push(Token::Op("~")),
            '^' => out.push(Token::Op("^")),
            '<' => out.push(Token::Op("<")),
            '>' => out.push(Token::Op(">")),
            '!' => out.push(Token::Op("!")),
            '=' => {} // lone '=' is not part of this grammar; dropped
            _ => {}   // illegal character: dropped
        }
        i += 1;
    }

    out
}

fn match_multi(rest: &str) -> Option<(Token, usize)> {
    const MULTI: &[(&str, Token)] = &[
        ("->", Token::Arrow),
        ("@=", Token::ConstraintOp),
        ("<<", Token::Op("<<")),
        (">>", Token::Op(">>")),
        ("||", Token::Op("||")),
        ("&&", Token::Op("&&")),
        ("<=", Token::Op("<=")),
        (">=", Token::Op(">=")),
        ("==", Token::Op("==")),
        ("!=", Token::Op("!=")),
    ];
    for (prefix, token) in MULTI {
        if rest.starts_with(prefix) {
            return Some((token.clone(), prefix.len()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexes_suffixed_integer() {
        let toks = lex("256ULL");
        assert_eq!(toks, vec![Token::Int(256)]);
    }

    #[test]
    fn lexes_call_expression() {
        let toks = lex("malloc(256)");
        assert_eq!(
            toks,
            vec![
                Token::Ident("malloc".into()),
                Token::LParen,
                Token::Int(256),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn lexes_constraint_literal() {
        let toks = lex("x @= { [0,10], [20,30] }");
        assert_eq!(
            toks,
            vec![
                Token::Ident("x".into()),
                Token::ConstraintOp,
                Token::LBrace,
                Token::LBracket,
                Token::Int(0),
                Token::Comma,
                Token::Int(10),
                Token::RBracket,
                Token::Comma,
                Token::LBracket,
                Token::Int(20),
                Token::Comma,
                Token::Int(30),
                Token::RBracket,
                Token::RBrace,
            ]
        );
    }
}
