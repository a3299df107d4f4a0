//SPDX-License-Identifier: MIT OR Apache-2.0
use crate::args::{compile_error, parse_kvs};
use proc_macro::{Delimiter, TokenStream, TokenTree};

/// Implementation of the `#[scoped_info]` attribute macro.
///
/// Rewrites the function body so that it runs inside an ephemeral info scope. Argument
/// expressions are evaluated on entry, so they may refer to the function's parameters.
pub fn scoped_info_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let kvs = match parse_kvs(attr) {
        Ok(kvs) => kvs,
        Err(e) => return e,
    };

    let mut tokens: Vec<TokenTree> = item.into_iter().collect();

    // `async` and `fn` come before the body; a body is always the final brace group
    let mut saw_fn = false;
    let mut is_async = false;
    for token in &tokens {
        if let TokenTree::Ident(ident) = token {
            match ident.to_string().as_str() {
                "async" if !saw_fn => is_async = true,
                "fn" => {
                    saw_fn = true;
                    break;
                }
                _ => {}
            }
        }
    }
    if !saw_fn {
        return compile_error("#[scoped_info] can only be applied to functions");
    }

    let original_body = match tokens.last() {
        Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Brace => g.stream(),
        _ => return compile_error("#[scoped_info] requires a function with a body"),
    };

    let mut builder = String::from("goodlog::EphemeralInfo::new()");
    for kv in &kvs {
        // cloned so the body can still use a parameter named in a value
        builder.push_str(&format!(
            ".with({:?}, ::core::clone::Clone::clone(&({})))",
            kv.key, kv.value
        ));
    }

    let new_body_src = if is_async {
        format!(
            r#"{{
                {builder}.in_scope(async move {{ {original_body} }}).await
            }}"#
        )
    } else {
        format!(
            r#"{{
                let _goodlog_scope_guard = {builder}.enter();
                {{ {original_body} }}
            }}"#
        )
    };

    let new_body: TokenStream = new_body_src.parse().unwrap();
    let new_body_group = new_body.into_iter().next().unwrap();

    let last = tokens.len() - 1;
    tokens[last] = new_body_group;

    tokens.into_iter().collect()
}
