#![doc = include_str!("RUSTDOC.md")]

pub mod auth;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logger;
pub mod management;
pub mod platform;
pub mod presenter;
pub mod token;

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub mod web;

#[cfg(test)]
pub mod test_support;

pub use config::{DashboardSettings, EmbedConfig, ValidatedConfig};
pub use dashboard::{Dashboard, DashboardOutcome, Stage};
pub use error::{EmbedError, EmbedResult};
