// tests/lexer_tests.rs

use rql::ast::Token;
use rql::lexer::{LexError, Lexer};

fn ident(s: &str) -> Token {
    Token::Ident(s.to_string())
}

// ============================================================================
// Reserved Tokens
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("&", Token::Ampersand),
        ("|", Token::Pipe),
        (";", Token::Semicolon),
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        (",", Token::Comma),
        ("=", Token::Equal),
        ("/", Token::Slash),
        ("?", Token::Question),
        ("@", Token::At),
        (" ", Token::Space),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("");
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    assert_eq!(lexer.next_token().unwrap(), Token::Eof);
}

// ============================================================================
// Identifiers
// ============================================================================

#[test]
fn test_identifier_maximal_munch() {
    let tokens = Lexer::new("price.amount_2*-x").tokenize().unwrap();
    assert_eq!(tokens, vec![ident("price.amount_2*-x")]);
}

#[test]
fn test_function_call_tokens() {
    let tokens = Lexer::new("lt(price,10.5)").tokenize().unwrap();
    assert_eq!(
        tokens,
        vec![
            ident("lt"),
            Token::LParen,
            ident("price"),
            Token::Comma,
            ident("10.5"),
            Token::RParen,
        ]
    );
}

#[test]
fn test_identifiers_are_unescaped() {
    let tokens = Lexer::new("name=john+wick&city=New%20York").tokenize().unwrap();
    assert_eq!(tokens[2], ident("john wick"));
    assert_eq!(tokens[6], ident("New York"));
}

#[test]
fn test_sort_marker_is_not_unescaped() {
    let tokens = Lexer::new("sort(+price,-name)").tokenize().unwrap();
    assert_eq!(tokens[2], ident("+price"));
    assert_eq!(tokens[4], ident("-name"));
}

#[test]
fn test_malformed_escape_kept_verbatim() {
    let tokens = Lexer::new("a=100%").tokenize().unwrap();
    assert_eq!(tokens[2], ident("100%"));
}

#[test]
fn test_escaped_reserved_char_stays_in_identifier() {
    let tokens = Lexer::new("eq(a,x%2Cy)").tokenize().unwrap();
    assert_eq!(tokens[4], ident("x,y"));
    assert_eq!(tokens.len(), 6);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_illegal_character() {
    let err = Lexer::new("eq(a,b)!").tokenize().unwrap_err();
    assert_eq!(err, LexError { ch: '!', position: 7 });
    assert_eq!(err.to_string(), "illegal character '!' at position 7");
}

#[test]
fn test_illegal_non_ascii_character() {
    let err = Lexer::new("name=café").tokenize().unwrap_err();
    assert_eq!(err.ch, 'é');
    assert_eq!(err.position, 8);
}
