// ABOUTME: Reader module for parsing Lisp source text into Values, using nom combinators

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace1},
    IResult,
};

use crate::error::ParseError;
use crate::value::{SpecialForm, Value};

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ';' | '\'' | '`' | ',')
}

/// Skips whitespace and `;` line comments.
fn skip_trivia(mut input: &str) -> &str {
    loop {
        if let Ok((rest, _)) = multispace1::<_, nom::error::Error<&str>>(input) {
            input = rest;
            continue;
        }
        if let Some(rest) = input.strip_prefix(';') {
            let end = rest.find('\n').unwrap_or(rest.len());
            input = &rest[end..];
            continue;
        }
        return input;
    }
}

fn parse_token(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_delimiter(c))(input)
}

fn is_integer_literal(tok: &str) -> bool {
    let body = tok.strip_prefix('-').unwrap_or(tok);
    !body.is_empty() && body.chars().all(|c| c.is_ascii_digit())
}

fn is_float_literal(tok: &str) -> bool {
    let body = tok.strip_prefix('-').unwrap_or(tok);
    if body.is_empty() || !body.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return false;
    }
    (body.contains('.') || body.contains('e') || body.contains('E')) && tok.parse::<f64>().is_ok()
}

fn classify_token(tok: &str) -> Value {
    if tok == "nil" {
        return Value::Nil;
    }
    if tok.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if tok.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if is_integer_literal(tok) {
        if let Ok(n) = tok.parse::<i64>() {
            return Value::Integer(n);
        }
    }
    if is_float_literal(tok) {
        if let Ok(n) = tok.parse::<f64>() {
            return Value::Float(n);
        }
    }
    if let Some(tag) = SpecialForm::from_keyword(tok) {
        return Value::Builtin(tag);
    }
    Value::symbol(tok)
}

/// Parses a string literal's contents, handling `\n \t \r \\ \"` and passing
/// any other escape through as a literal backslash followed by the character.
fn parse_string_literal(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('"')(input)?;
    let mut text = String::new();
    let mut chars = input.char_indices();

    loop {
        match chars.next() {
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Eof,
                )))
            }
            Some((idx, '"')) => {
                let rest = &input[idx + 1..];
                return Ok((rest, Value::string(text)));
            }
            Some((_, '\\')) => match chars.next() {
                None => {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Eof,
                    )))
                }
                Some((_, 'n')) => text.push('\n'),
                Some((_, 't')) => text.push('\t'),
                Some((_, 'r')) => text.push('\r'),
                Some((_, '\\')) => text.push('\\'),
                Some((_, '"')) => text.push('"'),
                Some((_, other)) => {
                    text.push('\\');
                    text.push(other);
                }
            },
            Some((_, c)) => text.push(c),
        }
    }
}

/// Rewrites `(.method obj args…)`, `(.-field obj)`, `(. method obj args…)`
/// and `(.- field obj)` heads into explicit DOT/DOT_FIELD builtin calls.
fn apply_dotted_sugar(mut items: Vec<Value>) -> Vec<Value> {
    let Some(Value::Symbol(head)) = items.first().cloned() else {
        return items;
    };
    let head: &str = &head;

    if head == "." || head == ".-" {
        if items.len() >= 3 {
            items[0] = Value::Builtin(if head == "." {
                SpecialForm::Dot
            } else {
                SpecialForm::DotField
            });
        }
        return items;
    }

    if let Some(field) = head.strip_prefix(".-") {
        if !field.is_empty() {
            let rest = items.split_off(1);
            let mut rewritten = vec![Value::Builtin(SpecialForm::DotField), Value::symbol(field)];
            rewritten.extend(rest);
            return rewritten;
        }
    }

    if let Some(method) = head.strip_prefix('.') {
        if !method.is_empty() {
            let rest = items.split_off(1);
            let mut rewritten = vec![Value::Builtin(SpecialForm::Dot), Value::symbol(method)];
            rewritten.extend(rest);
            return rewritten;
        }
    }

    items
}

fn parse_list(input: &str) -> IResult<&str, Value> {
    let (mut input, _) = char('(')(input)?;
    let mut items = Vec::new();

    loop {
        input = skip_trivia(input);
        if let Ok((rest, _)) = char::<_, nom::error::Error<&str>>(')')(input) {
            let items = apply_dotted_sugar(items);
            return Ok((rest, Value::list(items.into_iter())));
        }
        if input.is_empty() {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Eof,
            )));
        }
        let (rest, expr) = parse_expr(input)?;
        items.push(expr);
        input = rest;
    }
}

fn parse_quote(input: &str) -> IResult<&str, Value> {
    let (input, _) = char('\'')(input)?;
    let (input, expr) = parse_expr(input)?;
    Ok((input, Value::list(vec![Value::symbol("quote"), expr].into_iter())))
}

fn parse_atom(input: &str) -> IResult<&str, Value> {
    let (input, tok) = parse_token(input)?;
    Ok((input, classify_token(tok)))
}

fn parse_expr(input: &str) -> IResult<&str, Value> {
    let input = skip_trivia(input);
    if input.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        )));
    }
    match input.chars().next().unwrap() {
        '(' => parse_list(input),
        ')' => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        ))),
        '\'' => parse_quote(input),
        '"' => parse_string_literal(input),
        _ => parse_atom(input),
    }
}

/// Reads exactly one top-level form, returning it together with the unread
/// remainder of `input` so callers can stream multiple forms out of one
/// string (a whole file, or pasted REPL history).
pub fn read(input: &str) -> Result<(Value, &str), ParseError> {
    parse_expr(input)
        .map(|(rest, value)| (value, rest))
        .map_err(|e| ParseError::new(describe_nom_error(input, e)))
}

fn describe_nom_error(original: &str, err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            if e.input.is_empty() {
                "unexpected end of input".to_string()
            } else {
                format!("unexpected input near '{}'", truncate(e.input))
            }
        }
        nom::Err::Incomplete(_) => format!("incomplete input: '{}'", truncate(original)),
    }
}

fn truncate(s: &str) -> &str {
    let end = s.char_indices().nth(20).map(|(i, _)| i).unwrap_or(s.len());
    &s[..end]
}

/// Returns `true` once only whitespace and comments remain.
pub fn is_exhausted(input: &str) -> bool {
    skip_trivia(input).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_one(src: &str) -> Value {
        read(src).unwrap().0
    }

    #[test]
    fn reads_integers_and_floats_distinctly() {
        assert!(matches!(read_one("42"), Value::Integer(42)));
        assert!(matches!(read_one("-42"), Value::Integer(-42)));
        assert!(matches!(read_one("2.5"), Value::Float(f) if f == 2.5));
        assert!(matches!(read_one("-2.5"), Value::Float(f) if f == -2.5));
    }

    #[test]
    fn reads_nil_true_false() {
        assert!(matches!(read_one("nil"), Value::Nil));
        assert!(matches!(read_one("true"), Value::Bool(true)));
        assert!(matches!(read_one("FALSE"), Value::Bool(false)));
    }

    #[test]
    fn reads_keyword_atoms_as_builtins() {
        assert!(matches!(read_one("+"), Value::Builtin(SpecialForm::Add)));
        assert!(matches!(read_one("if"), Value::Builtin(SpecialForm::If)));
    }

    #[test]
    fn reads_plain_symbols() {
        assert!(matches!(read_one("foo-bar?"), Value::Symbol(s) if &*s == "foo-bar?"));
    }

    #[test]
    fn reads_strings_with_escapes() {
        assert!(matches!(read_one(r#""a\nb""#), Value::Str(s) if &*s == "a\nb"));
        assert!(matches!(read_one(r#""say \"hi\"""#), Value::Str(s) if &*s == "say \"hi\""));
        assert!(matches!(read_one(r#""\x""#), Value::Str(s) if &*s == "\\x"));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        assert!(read(r#""abc"#).is_err());
    }

    #[test]
    fn empty_list_is_nil() {
        assert!(matches!(read_one("()"), Value::Nil));
    }

    #[test]
    fn proper_list_builds_right_to_left() {
        let list = read_one("(1 2 3)");
        assert_eq!(list.to_vec().unwrap().len(), 3);
        assert_eq!(list.to_printing_string(), "(1 2 3)");
    }

    #[test]
    fn unclosed_list_is_an_error() {
        assert!(read("(1 2").is_err());
    }

    #[test]
    fn quote_sugar_expands_to_quote_form() {
        let form = read_one("'x");
        assert_eq!(form.to_printing_string(), "(quote x)");
    }

    #[test]
    fn trailing_quote_is_an_error() {
        assert!(read("'").is_err());
    }

    #[test]
    fn residual_input_is_returned_for_streaming() {
        let (first, rest) = read("(+ 1 2) (+ 3 4)").unwrap();
        assert_eq!(first.to_printing_string(), "(+ 1 2)");
        let (second, rest) = read(rest).unwrap();
        assert_eq!(second.to_printing_string(), "(+ 3 4)");
        assert!(is_exhausted(rest));
    }

    #[test]
    fn dot_method_sugar_is_rewritten() {
        let form = read_one("(.push lst 1)");
        assert_eq!(form.to_printing_string(), "(. push lst 1)");
    }

    #[test]
    fn dot_field_sugar_is_rewritten() {
        let form = read_one("(.-name obj)");
        assert_eq!(form.to_printing_string(), "(.- name obj)");
    }

    #[test]
    fn bare_dot_list_shorter_than_three_is_not_rewritten() {
        let form = read_one("(. x)");
        assert_eq!(form.to_printing_string(), "(. x)");
    }

    #[test]
    fn comments_are_skipped() {
        let form = read_one("; leading comment\n42");
        assert!(matches!(form, Value::Integer(42)));
    }
}
