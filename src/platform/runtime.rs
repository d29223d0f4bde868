use std::future::Future;

/// Spawns a task on the browser event loop without waiting for it.
pub fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}
