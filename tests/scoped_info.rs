// SPDX-License-Identifier: MIT OR Apache-2.0

use goodlog::{InfoValue, get_info, scoped_info};
use std::sync::{Mutex, MutexGuard};

#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

static TEST_GUARD: Mutex<()> = Mutex::new(());

fn isolated() -> MutexGuard<'static, ()> {
    let guard = TEST_GUARD.lock().unwrap_or_else(|e| e.into_inner());
    goodlog::reset();
    guard
}

#[scoped_info(request_id = id, stage = "parse")]
fn parse(id: u64) -> (Option<InfoValue>, Option<InfoValue>) {
    (get_info().get("request_id").cloned(), get_info().get("stage").cloned())
}

#[scoped_info(user = user)]
fn greet(user: String) -> String {
    // the attribute clones its values, so the parameter is still ours
    format!("hello {user}")
}

#[scoped_info(depth = 1u8)]
fn outer() -> Vec<Option<InfoValue>> {
    let mut seen = vec![get_info().get("depth").cloned()];
    seen.push(inner());
    seen.push(get_info().get("depth").cloned());
    seen
}

#[scoped_info(depth = 2u8)]
fn inner() -> Option<InfoValue> {
    get_info().get("depth").cloned()
}

#[scoped_info(attempt = n)]
fn early_return(n: i32) -> Result<(), String> {
    if n > 0 {
        return Err(get_info()["attempt"].to_string());
    }
    Ok(())
}

#[scoped_info(
    sizes = std::collections::HashMap::<u8, u8>::new().len(),
    boxed = Vec::<Box<dyn Fn(u8, u8) -> u8>>::with_capacity(0).len(),
    ordered = 1 < 2,
)]
fn generic_values() -> (Option<InfoValue>, Option<InfoValue>, Option<InfoValue>) {
    let info = get_info();
    (
        info.get("sizes").cloned(),
        info.get("boxed").cloned(),
        info.get("ordered").cloned(),
    )
}

struct Handler {
    name: &'static str,
}

impl Handler {
    #[scoped_info(handler = self.name, key = format!("{}-{}", self.name, n))]
    fn handle(&self, n: u8) -> String {
        get_info()["key"].to_string()
    }

    #[scoped_info(handler = self.name)]
    async fn handle_async(&self) -> Option<InfoValue> {
        get_info().get("handler").cloned()
    }
}

#[scoped_info(job = job)]
async fn run_job(job: u32) -> Vec<Option<InfoValue>> {
    let mut seen = vec![get_info().get("job").cloned()];
    YieldOnce(false).await;
    seen.push(get_info().get("job").cloned());
    seen
}

struct YieldOnce(bool);

impl std::future::Future for YieldOnce {
    type Output = ();
    fn poll(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<()> {
        if self.0 {
            std::task::Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            std::task::Poll::Pending
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn sync_fn_sees_its_arguments() {
    let _guard = isolated();
    assert_eq!(
        parse(9),
        (Some(InfoValue::UInt(9)), Some(InfoValue::from("parse")))
    );
    assert!(get_info().is_empty());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn owned_parameter_stays_usable() {
    let _guard = isolated();
    assert_eq!(greet("ana".to_string()), "hello ana");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn nested_functions_restore_outer_scope() {
    let _guard = isolated();
    assert_eq!(
        outer(),
        vec![
            Some(InfoValue::UInt(1)),
            Some(InfoValue::UInt(2)),
            Some(InfoValue::UInt(1))
        ]
    );
    assert!(get_info().get("depth").is_none());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn early_return_restores() {
    let _guard = isolated();
    assert_eq!(early_return(3), Err("3".to_string()));
    assert_eq!(early_return(0), Ok(()));
    assert!(get_info().is_empty());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn methods_can_use_self() {
    let _guard = isolated();
    let handler = Handler { name: "upload" };
    assert_eq!(handler.handle(4), "upload-4");
    assert!(get_info().is_empty());
}

#[test_executors::async_test]
async fn async_fn_scope_spans_awaits() {
    let _guard = isolated();
    assert_eq!(
        run_job(5).await,
        vec![Some(InfoValue::UInt(5)), Some(InfoValue::UInt(5))]
    );
    assert!(get_info().get("job").is_none());

    let handler = Handler { name: "download" };
    assert_eq!(handler.handle_async().await, Some(InfoValue::from("download")));
}

#[test]
fn async_fn_scope_is_not_visible_while_suspended() {
    let _guard = isolated();
    let mut fut = std::pin::pin!(run_job(1));
    let mut cx = std::task::Context::from_waker(std::task::Waker::noop());

    assert!(fut.as_mut().poll(&mut cx).is_pending());
    assert!(get_info().get("job").is_none());
    assert!(fut.as_mut().poll(&mut cx).is_ready());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test::wasm_bindgen_test)]
fn turbofish_commas_stay_inside_the_value() {
    let _guard = isolated();
    assert_eq!(
        generic_values(),
        (
            Some(InfoValue::UInt(0)),
            Some(InfoValue::UInt(0)),
            Some(InfoValue::Bool(true))
        )
    );
}
