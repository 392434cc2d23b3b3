use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::{LocatingSlice, Location};
use winnow::token::{any, one_of, take_till, take_while};

use crate::error::SyntaxError;
use crate::scanner::token::{Span, Token, TokenKind, keyword_kind};

type Input<'a> = LocatingSlice<&'a str>;

fn whitespace<'a>(input: &mut Input<'a>) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

/// `"[^"]*"` or `'[^']*'`; the lexeme keeps both quotes.
fn string_literal<'a>(input: &mut Input<'a>) -> ModalResult<Token> {
    let start = input.current_token_start();
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let body: &str = take_till(0.., quote).parse_next(input)?;
    let mut closing = quote;
    closing
        .parse_next(input)
        .map_err(|_: ErrMode<ContextError>| ErrMode::Cut(ContextError::new()))?;

    let mut lexeme = String::with_capacity(body.len() + 2);
    lexeme.push(quote);
    lexeme.push_str(body);
    lexeme.push(quote);
    let end = input.current_token_start();
    Ok(Token::new(
        TokenKind::String,
        lexeme,
        Span::new(start, end - start),
    ))
}

fn digits<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)
}

fn decimal_point<'a>(input: &mut Input<'a>) -> ModalResult<char> {
    '.'.parse_next(input)
}

fn exponent_marker<'a>(input: &mut Input<'a>) -> ModalResult<char> {
    one_of(['e', 'E']).parse_next(input)
}

fn sign<'a>(input: &mut Input<'a>) -> ModalResult<char> {
    one_of(['+', '-']).parse_next(input)
}

/// Decimal literal: `INT`, `INT.`, `INT.INT` or `.INT`, with an optional
/// exponent. An `e` not followed by digits is left for the next token.
fn number_literal<'a>(input: &mut Input<'a>) -> ModalResult<Token> {
    let start = input.current_token_start();
    let mut lexeme = String::new();

    let whole = opt(digits).parse_next(input)?;
    if let Some(whole) = whole {
        lexeme.push_str(whole);
    }

    let checkpoint = input.checkpoint();
    if opt(decimal_point).parse_next(input)?.is_some() {
        match opt(digits).parse_next(input)? {
            Some(frac) => {
                lexeme.push('.');
                lexeme.push_str(frac);
            }
            None if whole.is_some() => lexeme.push('.'),
            None => input.reset(&checkpoint),
        }
    }

    if lexeme.is_empty() {
        return Err(ErrMode::Backtrack(ContextError::new()));
    }

    let checkpoint = input.checkpoint();
    if let Some(e) = opt(exponent_marker).parse_next(input)? {
        let exp_sign = opt(sign).parse_next(input)?;
        match opt(digits).parse_next(input)? {
            Some(exp) => {
                lexeme.push(e);
                if let Some(s) = exp_sign {
                    lexeme.push(s);
                }
                lexeme.push_str(exp);
            }
            None => input.reset(&checkpoint),
        }
    }

    let end = input.current_token_start();
    Ok(Token::new(
        TokenKind::Number,
        lexeme,
        Span::new(start, end - start),
    ))
}

fn name_or_keyword<'a>(input: &mut Input<'a>) -> ModalResult<Token> {
    let start = input.current_token_start();
    let first: char = any
        .verify(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .parse_next(input)?;
    let rest: &str =
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_').parse_next(input)?;
    let end = input.current_token_start();
    let mut lexeme = String::with_capacity(1 + rest.len());
    lexeme.push(first);
    lexeme.push_str(rest);
    let kind = keyword_kind(&lexeme).unwrap_or(TokenKind::Name);
    Ok(Token::new(kind, lexeme, Span::new(start, end - start)))
}

fn single_char_token<'a>(input: &mut Input<'a>) -> ModalResult<Token> {
    let start = input.current_token_start();
    let c = any
        .verify(|c: &char| "()-+/*=".contains(*c))
        .parse_next(input)?;
    let kind = match c {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        '-' => TokenKind::Minus,
        '+' => TokenKind::Plus,
        '/' => TokenKind::Slash,
        '*' => TokenKind::Star,
        '=' => TokenKind::Equal,
        _ => unreachable!("verify guarantees valid char"),
    };
    Ok(Token::new(kind, c.to_string(), Span::new(start, 1)))
}

fn scan_token<'a>(input: &mut Input<'a>) -> ModalResult<Token> {
    alt((
        string_literal,
        number_literal,
        name_or_keyword,
        single_char_token,
    ))
    .parse_next(input)
}

/// Scan a whole line, stopping at the first character that starts no token.
pub fn scan_all(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();

    loop {
        if whitespace(&mut input).is_err() || input.is_empty() {
            break;
        }
        let checkpoint = input.checkpoint();
        match scan_token(&mut input) {
            Ok(token) => tokens.push(token),
            Err(_) => {
                input.reset(&checkpoint);
                let offset = input.current_token_start();
                let ch = any::<_, ContextError>.parse_next(&mut input).unwrap_or('?');
                let error = if ch == '"' || ch == '\'' {
                    SyntaxError::new(
                        format!("unterminated string literal starting with {ch}"),
                        offset,
                        source.len() - offset,
                    )
                } else {
                    SyntaxError::new(
                        format!("unexpected character '{ch}'"),
                        offset,
                        ch.len_utf8(),
                    )
                };
                return Err(error);
            }
        }
    }

    let eof_offset = source.len();
    tokens.push(Token::new(TokenKind::Eof, "", Span::new(eof_offset, 0)));
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn scan_ok(source: &str) -> Vec<Token> {
        scan_all(source).expect("scan should succeed")
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn single_char_tokens() {
        let tokens = scan_ok("()-+/*=");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::Minus,
                TokenKind::Plus,
                TokenKind::Slash,
                TokenKind::Star,
                TokenKind::Equal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn declaration_tokens() {
        let tokens = scan_ok("int x = 5");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Int,
                TokenKind::Name,
                TokenKind::Equal,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_a_name() {
        let tokens = scan_ok("integer int_x int");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Name,
                TokenKind::Name,
                TokenKind::Int,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn string_literals_keep_quotes() {
        let tokens = scan_ok("'Hola mundo' \"dos\"");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "'Hola mundo'");
        assert_eq!(tokens[1].lexeme, "\"dos\"");
    }

    #[test]
    fn string_may_hold_the_other_quote() {
        let tokens = scan_ok("\"it's\"");
        assert_eq!(tokens[0].lexeme, "\"it's\"");
    }

    #[test]
    fn no_escape_processing() {
        let tokens = scan_ok(r#""a\nb""#);
        assert_eq!(tokens[0].lexeme, r#""a\nb""#);
    }

    #[rstest]
    #[case("42", "42")]
    #[case("3.14", "3.14")]
    #[case("5.", "5.")]
    #[case(".5", ".5")]
    #[case("1e3", "1e3")]
    #[case("2.5E-1", "2.5E-1")]
    #[case("7e+2", "7e+2")]
    fn number_forms(#[case] source: &str, #[case] lexeme: &str) {
        let tokens = scan_ok(source);
        assert_eq!(kinds(&tokens), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(tokens[0].lexeme, lexeme);
    }

    #[test]
    fn exponent_without_digits_is_a_name() {
        let tokens = scan_ok("2e");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Number, TokenKind::Name, TokenKind::Eof]
        );
        assert_eq!(tokens[0].lexeme, "2");
        assert_eq!(tokens[1].lexeme, "e");
    }

    #[test]
    fn spans_are_correct() {
        let tokens = scan_ok("int x = 42");
        assert_eq!(tokens[0].span, Span::new(0, 3)); // int
        assert_eq!(tokens[1].span, Span::new(4, 1)); // x
        assert_eq!(tokens[2].span, Span::new(6, 1)); // =
        assert_eq!(tokens[3].span, Span::new(8, 2)); // 42
        assert_eq!(tokens[4].span, Span::new(10, 0)); // EOF
    }

    #[test]
    fn whitespace_is_discarded() {
        let tokens = scan_ok("  \t1 +\t2  ");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn empty_line_is_only_eof() {
        assert_eq!(kinds(&scan_ok("")), vec![TokenKind::Eof]);
    }

    #[test]
    fn unexpected_character_error() {
        let err = scan_all("x = 1 @ 2").unwrap_err();
        assert!(err.to_string().contains('@'));
        assert_eq!(err.offset(), 6);
    }

    #[rstest]
    #[case("'unterminated")]
    #[case("x = \"open")]
    fn unterminated_string_error(#[case] source: &str) {
        let err = scan_all(source).unwrap_err();
        assert!(
            err.message.contains("unterminated string"),
            "unexpected message: {}",
            err.message
        );
    }
}
