//! Browser-only helpers shared by the wasm implementations of the dashboard seams.

pub mod gapi;
