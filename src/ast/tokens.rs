use std::fmt;

/// Lexical tokens produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Field name, operator name or literal value.
    ///
    /// Already URL-unescaped, except for values starting with `+` which keep
    /// their sort-direction marker.
    ///
    /// # Examples
    /// ```text
    /// price
    /// john%20wick
    /// +created_at
    /// ```
    Ident(String),

    /// Logical AND combinator (`&`)
    Ampersand,

    /// Logical OR combinator (`|`)
    Pipe,

    /// Alternative OR combinator (`;`)
    Semicolon,

    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Left bracket opening an array group
    LBracket,

    /// Right bracket
    RBracket,

    /// Separates function arguments and array members
    Comma,

    /// Equality shorthand (`field=value`, `field=op=value`)
    Equal,

    /// Reserved, no grammar role
    Slash,

    /// Reserved, no grammar role
    Question,

    /// Reserved, no grammar role
    At,

    /// Raw space; an escaped one (`+`, `%20`) stays inside its identifier
    Space,

    /// End of input
    Eof,
}

impl Token {
    /// Text of the token as it appeared in the query (after unescaping).
    pub fn text(&self) -> &str {
        match self {
            Token::Ident(s) => s,
            Token::Ampersand => "&",
            Token::Pipe => "|",
            Token::Semicolon => ";",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::Comma => ",",
            Token::Equal => "=",
            Token::Slash => "/",
            Token::Question => "?",
            Token::At => "@",
            Token::Space => " ",
            Token::Eof => "",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "<eof>"),
            other => write!(f, "'{}'", other.text()),
        }
    }
}
