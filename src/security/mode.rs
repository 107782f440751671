//! Permission modes and the action matrix.
//!
//! A mode decides which action categories may even be attempted; the
//! approval gate decides whether an attempted action actually executes.
//! There are no automatic transitions between modes. The only way the
//! current mode changes is an explicit, human-confirmed mode change
//! persisted through the credential store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CredentialError, PermissionError};

// ─── Modes ──────────────────────────────────────────────────────────────────

/// How much of moltbook the agent may touch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Read-only: observe the feed, never act on it.
    #[default]
    Lurk,
    /// Upvotes freely; comments and posts need human approval.
    Engage,
    /// Upvotes and comments freely; posts still need human approval.
    Active,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Lurk, Mode::Engage, Mode::Active];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Lurk => "lurk",
            Mode::Engage => "engage",
            Mode::Active => "active",
        }
    }

    /// One-line description for `moltgate mode` output.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Mode::Lurk => "read-only; no upvotes, comments, or posts",
            Mode::Engage => "upvote freely; comments and posts require approval",
            Mode::Active => "upvote and comment freely; posts require approval",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lurk" => Ok(Mode::Lurk),
            "engage" => Ok(Mode::Engage),
            "active" => Ok(Mode::Active),
            other => Err(CredentialError::InvalidMode {
                value: other.to_string(),
            }),
        }
    }
}

// ─── Actions ────────────────────────────────────────────────────────────────

/// The closed set of things the agent can ask to do on moltbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Fetch feed, submolt, or post content.
    Read,
    /// Upvote an existing post.
    Upvote,
    /// Comment on an existing post.
    Comment,
    /// Publish a new post to a submolt.
    Post,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Upvote => "upvote",
            Action::Comment => "comment",
            Action::Post => "post",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            "upvote" => Ok(Action::Upvote),
            "comment" => Ok(Action::Comment),
            "post" => Ok(Action::Post),
            other => Err(PermissionError::UnknownAction {
                value: other.to_string(),
            }),
        }
    }
}

// ─── Permission checks ──────────────────────────────────────────────────────

/// Outcome of checking one action against the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionVerdict {
    pub action: Action,
    pub allowed: bool,
    pub requires_approval: bool,
}

/// Evaluates the fixed `(mode, action)` matrix.
///
/// Holds the mode it was constructed with; callers that must not act on a
/// stale mode (the approval gate) build a fresh enforcer from the credential
/// store per operation.
#[derive(Debug, Clone, Copy)]
pub struct ModeEnforcer {
    mode: Mode,
}

impl ModeEnforcer {
    #[must_use]
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Pure function of `(mode, action)`. The match is exhaustive so adding
    /// a mode or action forces every row to be reconsidered.
    #[must_use]
    pub fn check(&self, action: Action) -> PermissionVerdict {
        let (allowed, requires_approval) = match (self.mode, action) {
            // Reading is permitted in every mode and touches nothing.
            (_, Action::Read) => (true, false),

            (Mode::Lurk, Action::Upvote | Action::Comment | Action::Post) => (false, false),

            (Mode::Engage, Action::Upvote) => (true, false),
            (Mode::Engage, Action::Comment) => (true, true),

            (Mode::Active, Action::Upvote | Action::Comment) => (true, false),

            // Publishing is irreversible. Posts require a human in every
            // mode that allows them at all.
            (Mode::Engage | Mode::Active, Action::Post) => (true, true),
        };
        PermissionVerdict {
            action,
            allowed,
            requires_approval,
        }
    }

    /// Convenience: error out unless the action is allowed at all.
    pub fn require_allowed(&self, action: Action) -> Result<PermissionVerdict, PermissionError> {
        let verdict = self.check(action);
        if verdict.allowed {
            Ok(verdict)
        } else {
            Err(PermissionError::NotPermitted {
                mode: self.mode,
                action,
            })
        }
    }
}
