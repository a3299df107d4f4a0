//SPDX-License-Identifier: MIT OR Apache-2.0

use proc_macro::{TokenStream, TokenTree};
use std::collections::VecDeque;

/// One `key = value` pair from an attribute argument list.
pub struct KeyValue {
    pub key: String,
    /// The value expression, re-emitted as source.
    pub value: String,
}

/// Parses a key, consuming tokens through the `=`.
///
/// The key must be a single identifier.
fn parse_key(input: &mut VecDeque<TokenTree>) -> Result<Option<String>, TokenStream> {
    let key = match input.pop_front() {
        None => return Ok(None),
        Some(TokenTree::Ident(i)) => i.to_string(),
        Some(other) => {
            return Err(compile_error(&format!("expected an identifier, found `{}`", other)));
        }
    };
    match input.pop_front() {
        Some(TokenTree::Punct(p)) if p.as_char() == '=' => Ok(Some(key)),
        _ => Err(compile_error(&format!("expected `=` after `{}`", key))),
    }
}

/// Parses a value expression, consuming tokens through the next top-level `,` or the end.
///
/// Commas nested in groups belong to the group token, so `f(a, b)` stays one value. Commas
/// between the generic arguments of a turbofish (`HashMap::<u8, u8>::new()`) are not
/// separators either; outside a turbofish `<` and `>` are comparisons. The tokens are
/// collected as a stream rather than concatenated, so `x as u64` keeps its spaces.
fn parse_value(input: &mut VecDeque<TokenTree>) -> String {
    let mut value: Vec<TokenTree> = Vec::new();
    let mut angle_depth = 0usize;
    while let Some(token) = input.pop_front() {
        if let TokenTree::Punct(p) = &token {
            match p.as_char() {
                ',' if angle_depth == 0 => break,
                '<' if angle_depth > 0 || follows_path_separator(&value) => angle_depth += 1,
                // `->` in `Fn(u8) -> u8` closes nothing
                '>' if angle_depth > 0 && !follows(&value, '-') => angle_depth -= 1,
                _ => {}
            }
        }
        value.push(token);
    }
    value.into_iter().collect::<TokenStream>().to_string()
}

fn follows(value: &[TokenTree], c: char) -> bool {
    matches!(value.last(), Some(TokenTree::Punct(p)) if p.as_char() == c)
}

fn follows_path_separator(value: &[TokenTree]) -> bool {
    matches!(
        value,
        [.., TokenTree::Punct(a), TokenTree::Punct(b)] if a.as_char() == ':' && b.as_char() == ':'
    )
}

/// Parses `key = value, key = value, ...` (a trailing comma is fine).
///
/// Pairs come back in source order; the builder they feed lets a later duplicate win.
pub fn parse_kvs(attr: TokenStream) -> Result<Vec<KeyValue>, TokenStream> {
    let mut input: VecDeque<TokenTree> = attr.into_iter().collect();
    let mut kvs = Vec::new();
    while let Some(key) = parse_key(&mut input)? {
        let value = parse_value(&mut input);
        if value.is_empty() {
            return Err(compile_error(&format!("missing value for `{}`", key)));
        }
        kvs.push(KeyValue { key, value });
    }
    Ok(kvs)
}

pub fn compile_error(message: &str) -> TokenStream {
    format!("compile_error!({:?});", message).parse().unwrap()
}
