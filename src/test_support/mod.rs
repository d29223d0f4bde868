//! Test doubles shared across crate-level unit tests.

pub mod fakes;

pub use fakes::{
    dashboard_document, RecordingAuthorizer, RecordingRenderer, StaticManagement, StaticTokenSource,
};
