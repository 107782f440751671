#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default
)]

//! Supervised gateway between an autonomous agent and the moltbook feed.
//!
//! Four cooperating mechanisms form one trust boundary: a persisted
//! permission [`mode`](security::mode) that decides what the agent may do
//! at all, a [`sanitizer`](security::sanitizer) that annotates untrusted
//! feed text without ever blocking it, an approval
//! [gate](security::engagement) that holds outbound actions as inert
//! drafts until a human says yes, and a credential
//! [store](security::credentials) whose key never appears in any output.

pub mod api;
pub mod app;
pub mod cli;
pub mod error;
pub mod feed;
pub mod security;
pub mod settings;
pub mod ui;

pub use error::{MoltgateError, Result};
pub use settings::Settings;
