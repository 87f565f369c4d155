use crate::ast::Token;

/// An input character that is neither reserved nor part of an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal character '{ch}' at position {position}")]
pub struct LexError {
    pub ch: char,
    pub position: usize,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_ident_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let token = match self.current_char() {
            None => return Ok(Token::Eof),
            Some(ch) if is_ident_char(ch) => {
                let raw = self.read_identifier();
                return Ok(Token::Ident(unescape(raw)));
            }
            Some('&') => Token::Ampersand,
            Some('|') => Token::Pipe,
            Some(';') => Token::Semicolon,
            Some('(') => Token::LParen,
            Some(')') => Token::RParen,
            Some('[') => Token::LBracket,
            Some(']') => Token::RBracket,
            Some(',') => Token::Comma,
            Some('=') => Token::Equal,
            Some('/') => Token::Slash,
            Some('?') => Token::Question,
            Some('@') => Token::At,
            Some(' ') => Token::Space,
            Some(ch) => {
                return Err(LexError {
                    ch,
                    position: self.position,
                });
            }
        };
        self.advance();
        Ok(token)
    }

    /// Scans the whole input. The trailing [`Token::Eof`] is not included.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            match self.next_token()? {
                Token::Eof => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }
}

pub fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '*' | '_' | '%' | '+' | '-' | '.')
}

/// Query-unescapes an identifier.
///
/// `+` means space in a query string, so an identifier starting with `+` is a
/// sort-ascending marker and is kept as is. Malformed escapes are kept as is too.
fn unescape(raw: String) -> String {
    if raw.starts_with('+') {
        return raw;
    }
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

#[test]
fn test_reserved_and_identifiers() {
    let mut lexer = Lexer::new("eq(price,10)&a=b");
    assert_eq!(lexer.next_token(), Ok(Token::Ident("eq".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.next_token(), Ok(Token::Ident("price".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Comma));
    assert_eq!(lexer.next_token(), Ok(Token::Ident("10".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.next_token(), Ok(Token::Ampersand));
    assert_eq!(lexer.next_token(), Ok(Token::Ident("a".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Equal));
    assert_eq!(lexer.next_token(), Ok(Token::Ident("b".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_unescape_keeps_sort_marker() {
    assert_eq!(unescape("+price".to_string()), "+price");
    assert_eq!(unescape("john+wick".to_string()), "john wick");
    assert_eq!(unescape("50%25".to_string()), "50%");
}
