//SPDX-License-Identifier: MIT OR Apache-2.0

//! # goodlog procedural macros
//!
//! This crate provides the `#[scoped_info]` attribute for goodlog. Use it through the
//! re-export, `goodlog::scoped_info`.
//!
//! The attribute rewrites a function body so that it runs inside an ephemeral info scope:
//!
//! ```ignore
//! # // ignore because: shows the expansion, not runnable code
//! #[goodlog::scoped_info(request_id = id, stage = "parse")]
//! fn handle(id: u64) { /* body */ }
//!
//! // expands to approximately:
//! fn handle(id: u64) {
//!     let _goodlog_scope_guard = goodlog::EphemeralInfo::new()
//!         .with("request_id", id.clone())
//!         .with("stage", "parse".clone())
//!         .enter();
//!     { /* body */ }
//! }
//! ```
//!
//! For an `async fn`, the body is wrapped in `EphemeralInfo::in_scope` instead, so the
//! scope follows the future across polls and threads.
//!
//! The crate has no dependencies; arguments are parsed directly from the token stream.

mod args;
mod scoped_attr;

use proc_macro::TokenStream;

/// Runs the annotated function inside an ephemeral info scope.
///
/// Arguments are `key = expression` pairs. Expressions are evaluated when the function is
/// entered and may refer to its parameters; each value is cloned, so the body can still use
/// the parameter. Works on free functions and methods, sync or `async`.
///
/// # Examples
///
/// ```
/// #[goodlog::scoped_info(user = user, action = "delete")]
/// fn delete_account(user: &str) -> String {
///     goodlog::get_info()["action"].to_string()
/// }
///
/// assert_eq!(delete_account("alice"), "delete");
/// assert!(goodlog::get_info().get("user").is_none());
/// ```
///
/// ```
/// #[goodlog::scoped_info(job = job_id)]
/// async fn run(job_id: u32) -> Option<goodlog::InfoValue> {
///     goodlog::get_info().get("job").cloned()
/// }
/// # async fn example() {
/// assert_eq!(run(4).await, Some(goodlog::InfoValue::UInt(4)));
/// # }
/// ```
#[proc_macro_attribute]
pub fn scoped_info(attr: TokenStream, item: TokenStream) -> TokenStream {
    scoped_attr::scoped_info_impl(attr, item)
}
