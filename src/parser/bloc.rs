//! Recursive bloc resolution.
//!
//! A token span is unwrapped from redundant parentheses, split on the
//! combinator found at nesting depth 0, and otherwise classified as one of the
//! bloc shapes below. Function arguments recurse into the same procedure.

use crate::ast::{Arg, GROUP_OP, Node, Token};

use super::ParseError;

/// Shapes a span without top-level combinators can take.
#[derive(Debug)]
enum Bloc<'a> {
    /// `value`
    Value(&'a str),
    /// `op(arg,arg)`
    Function { op: &'a str, args: &'a [Token] },
    /// `field,[v1,v2]`; `members` is what sits between the brackets
    Group { field: &'a str, members: &'a [Token] },
    /// `field=value` or `$op=v1,v2`
    SimpleEqual { field: &'a str, values: &'a [Token] },
    /// `field=op=value` or `field=op=(v1,v2)`
    DoubleEqual {
        field: &'a str,
        op: &'a str,
        value: &'a [Token],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    And,
    Or,
}

impl Combinator {
    fn of(token: &Token) -> Option<Self> {
        match token {
            Token::Ampersand => Some(Combinator::And),
            Token::Pipe | Token::Semicolon => Some(Combinator::Or),
            _ => None,
        }
    }

    fn op(self) -> &'static str {
        match self {
            Combinator::And => "AND",
            Combinator::Or => "OR",
        }
    }
}

/// Parses a whole query. An empty query has no predicate.
pub(crate) fn parse_query(tokens: &[Token]) -> Result<Option<Node>, ParseError> {
    if tokens.is_empty() {
        return Ok(None);
    }
    match parse(tokens)? {
        Arg::Node(node) => Ok(Some(node)),
        Arg::Value(v) => Err(ParseError::BareValue(v.to_string())),
    }
}

/// Parses a span into either a nested node or a lifted literal.
pub(crate) fn parse(tokens: &[Token]) -> Result<Arg, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyExpression(String::new()));
    }

    if tokens[0] == Token::LParen {
        let close = matching_paren(tokens, 0)
            .ok_or_else(|| ParseError::UnbalancedParenthesis(text(tokens)))?;
        if close == 1 {
            return Err(ParseError::EmptyExpression(text(tokens)));
        }
        if close == tokens.len() - 1 {
            return parse(&tokens[1..close]);
        }
    }

    if let Some((combinator, operands)) = split_by_combinator(tokens)? {
        let mut node = Node::new(combinator.op(), Vec::with_capacity(operands.len()));
        for operand in operands {
            if operand.is_empty() {
                return Err(ParseError::EmptyExpression(text(tokens)));
            }
            node.args.push(parse(operand)?);
        }
        return Ok(Arg::Node(node));
    }

    let bloc = classify(tokens)?;
    tracing::trace!(?bloc, "classified bloc");
    build(bloc, tokens)
}

/// Splits on the depth-0 combinator, if there is one.
///
/// `&` binds the span if present, then `|`/`;`. Both kinds at the same depth
/// are rejected instead of silently preferring one.
fn split_by_combinator(tokens: &[Token]) -> Result<Option<(Combinator, Vec<&[Token]>)>, ParseError> {
    let mut depth = 0usize;
    let mut found: Option<Combinator> = None;
    let mut positions = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RParen | Token::RBracket => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::UnbalancedParenthesis(text(tokens)))?;
            }
            _ if depth == 0 => {
                if let Some(c) = Combinator::of(token) {
                    match found {
                        Some(prev) if prev != c => {
                            return Err(ParseError::AmbiguousCombinators(text(tokens)));
                        }
                        _ => found = Some(c),
                    }
                    positions.push(i);
                }
            }
            _ => {}
        }
    }

    let Some(combinator) = found else {
        return Ok(None);
    };
    Ok(Some((combinator, split_at(tokens, &positions))))
}

fn classify(tokens: &[Token]) -> Result<Bloc<'_>, ParseError> {
    match tokens {
        [Token::Ident(value)] => Ok(Bloc::Value(value)),
        [Token::Ident(op), Token::LParen, ..] => {
            let close = matching_paren(tokens, 1)
                .ok_or_else(|| ParseError::UnbalancedParenthesis(text(tokens)))?;
            if let Some(next) = tokens.get(close + 1) {
                return Err(ParseError::TrailingTokens {
                    bloc: text(&tokens[..=close]),
                    found: next.text().to_string(),
                });
            }
            Ok(Bloc::Function {
                op,
                args: &tokens[2..close],
            })
        }
        [Token::Ident(field), Token::Comma, Token::LBracket, inner @ ..] => match inner {
            [members @ .., Token::RBracket]
                if !members
                    .iter()
                    .any(|t| matches!(t, Token::LBracket | Token::RBracket)) =>
            {
                Ok(Bloc::Group { field, members })
            }
            _ => Err(ParseError::MalformedGroup(text(tokens))),
        },
        [Token::Ident(field), Token::Equal, Token::Ident(op), Token::Equal, value @ ..] => {
            Ok(Bloc::DoubleEqual { field, op, value })
        }
        [Token::Ident(field), Token::Equal, values @ ..] => {
            Ok(Bloc::SimpleEqual { field, values })
        }
        _ => Err(ParseError::UnrecognizedBloc(text(tokens))),
    }
}

fn build(bloc: Bloc<'_>, tokens: &[Token]) -> Result<Arg, ParseError> {
    let node = match bloc {
        Bloc::Value(value) => return Ok(Arg::literal(value)),
        Bloc::Function { op, args } => Node::new(op, parse_func_args(args)?),
        Bloc::Group { field, members } => group_node(field, members, tokens)?,
        Bloc::SimpleEqual { field, values } => {
            let values = comma_separated_values(values)
                .ok_or_else(|| ParseError::UnrecognizedBloc(text(tokens)))?;
            match field.strip_prefix('$') {
                Some("") => return Err(ParseError::UnrecognizedBloc(text(tokens))),
                Some(op) => Node::new(op, values),
                None => {
                    let mut args = vec![Arg::literal(field)];
                    args.extend(values);
                    Node::new("eq", args)
                }
            }
        }
        Bloc::DoubleEqual { field, op, value } => {
            let mut args = vec![Arg::literal(field)];
            match value {
                [] => args.push(Arg::literal("")),
                [Token::Ident(v)] => args.push(Arg::literal(v.as_str())),
                [Token::LParen, inner @ .., Token::RParen] => {
                    let values = comma_separated_values(inner)
                        .ok_or_else(|| ParseError::UnrecognizedBloc(text(tokens)))?;
                    args.extend(values);
                }
                _ => return Err(ParseError::UnrecognizedBloc(text(tokens))),
            }
            Node::new(op, args)
        }
    };
    Ok(Arg::Node(node))
}

fn parse_func_args(tokens: &[Token]) -> Result<Vec<Arg>, ParseError> {
    if tokens.is_empty() {
        return Ok(vec![]);
    }

    // op(field,[v1,v2]) keeps the field in front of its group
    if let [Token::Ident(field), Token::Comma, Token::LBracket, ..] = tokens {
        return Ok(vec![Arg::literal(field.as_str()), parse(tokens)?]);
    }

    let mut args = vec![];
    for part in split_at(tokens, &depth_zero_commas(tokens)) {
        if part.is_empty() {
            args.push(Arg::literal(""));
        } else {
            args.push(parse(part)?);
        }
    }
    Ok(args)
}

fn group_node(field: &str, members: &[Token], tokens: &[Token]) -> Result<Node, ParseError> {
    let mut args = vec![Arg::literal(field)];
    if members.is_empty() {
        return Ok(Node::new(GROUP_OP, args));
    }
    for part in split_at(members, &depth_zero_commas(members)) {
        match part {
            [] => args.push(Arg::literal("")),
            [Token::Ident(v)] => args.push(Arg::literal(v.as_str())),
            _ => return Err(ParseError::MalformedGroup(text(tokens))),
        }
    }
    Ok(Node::new(GROUP_OP, args))
}

/// `v1,v2,v3` as literals; `None` if the span is anything else.
fn comma_separated_values(tokens: &[Token]) -> Option<Vec<Arg>> {
    if tokens.is_empty() {
        return Some(vec![Arg::literal("")]);
    }
    let mut values = vec![];
    for (i, token) in tokens.iter().enumerate() {
        match (i % 2, token) {
            (0, Token::Ident(v)) => values.push(Arg::literal(v.as_str())),
            (1, Token::Comma) if i + 1 < tokens.len() => {}
            _ => return None,
        }
    }
    Some(values)
}

/// Index of the parenthesis closing the one at `open`.
fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn depth_zero_commas(tokens: &[Token]) -> Vec<usize> {
    let mut depth = 0usize;
    let mut positions = vec![];
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen | Token::LBracket => depth += 1,
            Token::RParen | Token::RBracket => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => positions.push(i),
            _ => {}
        }
    }
    positions
}

fn split_at<'a>(tokens: &'a [Token], positions: &[usize]) -> Vec<&'a [Token]> {
    let mut parts = Vec::with_capacity(positions.len() + 1);
    let mut last = 0;
    for &p in positions {
        parts.push(&tokens[last..p]);
        last = p + 1;
    }
    parts.push(&tokens[last..]);
    parts
}

pub(crate) fn text(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().unwrap()
    }

    #[test]
    fn test_matching_paren_skips_nested() {
        let ts = tokens("a(b(c),d)");
        assert_eq!(matching_paren(&ts, 1), Some(8));
        assert_eq!(matching_paren(&ts, 3), Some(5));
    }

    #[test]
    fn test_commas_inside_parens_are_not_split_points() {
        let ts = tokens("a,f(b,c),[d,e]");
        assert_eq!(depth_zero_commas(&ts), vec![1, 8]);
    }

    #[test]
    fn test_comma_separated_values_rejects_trailing_comma() {
        assert!(comma_separated_values(&tokens("a,b")).is_some());
        assert!(comma_separated_values(&tokens("a,")).is_none());
        assert!(comma_separated_values(&tokens("a b")).is_none());
    }
}
