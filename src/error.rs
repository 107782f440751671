use thiserror::Error;

use crate::security::mode::{Action, Mode};

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `moltgate`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum MoltgateError {
    // ── Credential store ─────────────────────────────────────────────────
    #[error("credentials: {0}")]
    Credential(#[from] CredentialError),

    // ── Mode / permission checks ─────────────────────────────────────────
    #[error("permission: {0}")]
    Permission(#[from] PermissionError),

    // ── Drafts / approval gate ───────────────────────────────────────────
    #[error("engagement: {0}")]
    Engagement(#[from] EngagementError),

    // ── moltbook API ─────────────────────────────────────────────────────
    #[error("api: {0}")]
    Api(#[from] ApiError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Credential store errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed credential file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid mode {value:?} (expected lurk, engage, or active)")]
    InvalidMode { value: String },

    #[error("no credentials stored; run `moltgate register` first")]
    NotRegistered,
}

// ─── Permission errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("unknown action {value:?} (expected read, upvote, comment, or post)")]
    UnknownAction { value: String },

    #[error("{action} is not permitted in {mode} mode")]
    NotPermitted { mode: Mode, action: Action },
}

// ─── Engagement / draft errors ──────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EngagementError {
    #[error("no draft with id {draft_id}")]
    UnknownDraft { draft_id: String },

    #[error("draft {draft_id} was already resolved; drafts execute at most once")]
    AlreadyExecuted { draft_id: String },

    #[error("{action} requires human approval in the current mode; draft it instead")]
    ApprovalRequired { action: Action },

    #[error("{action} carries content and cannot run as a bare action")]
    ContentRequired { action: Action },
}

// ─── moltbook API errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication failed (401): check the stored API key")]
    Auth,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited (429), retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("moltbook returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, MoltgateError>;
