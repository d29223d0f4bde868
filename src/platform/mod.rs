#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub mod browser;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub mod runtime;
