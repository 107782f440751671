//! The approval gate: turns requested actions into immediate execution,
//! a pending draft, or a refusal.
//!
//! Every outbound write funnels through here. The current mode is re-read
//! from the credential store per operation, so a mode change between calls
//! is always honored. High-impact actions become inert drafts; nothing
//! leaves the machine until a human approves the exact draft, and each
//! draft reaches the network at most once.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use strum::Display;
use uuid::Uuid;

use crate::api::MoltbookApi;
use crate::error::{EngagementError, Result};
use crate::security::credentials::CredentialStore;
use crate::security::mode::{Action, Mode, ModeEnforcer, PermissionVerdict};
use crate::security::sanitizer::{ContentSanitizer, ScanResult};

// ─── Drafts ─────────────────────────────────────────────────────────────────

/// Lifecycle of a draft. `Pending` is the only state that can execute;
/// everything else is terminal. `Approved` marks a draft consumed by an
/// approval whose network call never confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DraftStatus {
    Pending,
    Approved,
    Rejected,
    Executed,
}

/// An action prepared but not yet executed. `content` is immutable after
/// creation; approval changes only `status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionDraft {
    pub id: String,
    pub action: Action,
    /// Post id for comments/upvotes, submolt name for new posts.
    pub target: String,
    pub title: Option<String>,
    pub content: String,
    pub url: Option<String>,
    /// Scan over everything untrusted that went into composing the draft.
    pub scan_result: ScanResult,
    pub status: DraftStatus,
    pub created_at: DateTime<Utc>,
}

/// How an approval round ended. Human rejection is a normal outcome, not
/// an error.
#[derive(Debug, Clone)]
pub enum ExecutionOutcome {
    Executed(Value),
    Rejected,
}

// ─── Manager ────────────────────────────────────────────────────────────────

pub struct EngagementManager {
    store: CredentialStore,
    sanitizer: ContentSanitizer,
    api: Arc<dyn MoltbookApi>,
    drafts: HashMap<String, ActionDraft>,
}

impl EngagementManager {
    pub fn new(store: CredentialStore, api: Arc<dyn MoltbookApi>) -> Self {
        Self {
            store,
            sanitizer: ContentSanitizer::new(),
            api,
            drafts: HashMap::new(),
        }
    }

    fn enforcer(&self) -> Result<ModeEnforcer> {
        Ok(ModeEnforcer::new(self.store.current_mode()?))
    }

    pub fn current_mode(&self) -> Result<Mode> {
        Ok(self.store.current_mode()?)
    }

    /// Fresh verdict for an action under the current mode.
    pub fn verdict_for(&self, action: Action) -> Result<PermissionVerdict> {
        Ok(self.enforcer()?.check(action))
    }

    // ── Low-impact path ─────────────────────────────────────────────────

    /// Runs an action that needs no approval under the current mode.
    /// Content-carrying actions are refused here; they go through drafts
    /// or [`comment_direct`](Self::comment_direct).
    pub async fn perform_low_impact(&self, action: Action, target: &str) -> Result<Value> {
        let verdict = self.enforcer()?.require_allowed(action)?;
        if verdict.requires_approval {
            return Err(EngagementError::ApprovalRequired { action }.into());
        }
        match action {
            Action::Read | Action::Upvote => self.send(action, target, None, "", None).await,
            Action::Comment | Action::Post => {
                Err(EngagementError::ContentRequired { action }.into())
            }
        }
    }

    /// The no-approval comment path. Content is still scanned and the
    /// annotation returned alongside the result.
    pub async fn comment_direct(&self, post_id: &str, content: &str) -> Result<(Value, ScanResult)> {
        let verdict = self.enforcer()?.require_allowed(Action::Comment)?;
        if verdict.requires_approval {
            return Err(EngagementError::ApprovalRequired {
                action: Action::Comment,
            }
            .into());
        }

        let scan = self.sanitizer.scan(content);
        if scan.flagged {
            tracing::warn!(
                post_id,
                categories = %scan.category_list(),
                "outbound comment content flagged"
            );
        }

        let result = self.api.comment(post_id, content).await?;
        Ok((result, scan))
    }

    // ── Draft path ──────────────────────────────────────────────────────

    /// Prepares an action for human review. Fails only when the mode
    /// disallows the action outright; a flagged scan never blocks a draft,
    /// it informs the human deciding on it.
    pub fn draft(
        &mut self,
        action: Action,
        target: &str,
        title: Option<&str>,
        content: &str,
        url: Option<&str>,
        untrusted_inputs: &[&str],
    ) -> Result<ActionDraft> {
        self.enforcer()?.require_allowed(action)?;
        if action == Action::Post && title.is_none() {
            return Err(EngagementError::ContentRequired { action }.into());
        }

        // One combined scan document: the composed content plus every
        // piece of quoted source material.
        let mut scan_document = String::new();
        if let Some(title) = title {
            scan_document.push_str(title);
            scan_document.push('\n');
        }
        scan_document.push_str(content);
        for quoted in untrusted_inputs {
            scan_document.push('\n');
            scan_document.push_str(quoted);
        }
        let scan_result = self.sanitizer.scan(&scan_document);
        if scan_result.flagged {
            tracing::warn!(
                %action,
                target,
                categories = %scan_result.category_list(),
                "draft content flagged"
            );
        }

        let draft = ActionDraft {
            id: Uuid::new_v4().to_string(),
            action,
            target: target.to_string(),
            title: title.map(str::to_string),
            content: content.to_string(),
            url: url.map(str::to_string),
            scan_result,
            status: DraftStatus::Pending,
            created_at: Utc::now(),
        };
        let snapshot = draft.clone();
        self.drafts.insert(draft.id.clone(), draft);
        tracing::info!(draft_id = %snapshot.id, %action, target, "draft registered");
        Ok(snapshot)
    }

    pub fn draft_comment(&mut self, post_id: &str, content: &str) -> Result<ActionDraft> {
        self.draft(Action::Comment, post_id, None, content, None, &[])
    }

    pub fn draft_post(
        &mut self,
        submolt: &str,
        title: &str,
        content: Option<&str>,
        url: Option<&str>,
    ) -> Result<ActionDraft> {
        self.draft(
            Action::Post,
            submolt,
            Some(title),
            content.unwrap_or_default(),
            url,
            &[],
        )
    }

    /// Resolves a pending draft with the human's decision.
    ///
    /// Approval consumes the draft before the network call goes out, so a
    /// transport failure can never lead to a duplicate outbound action. A
    /// mode that no longer permits the action fails the attempt but leaves
    /// the draft pending for a later round.
    pub async fn execute_with_approval(
        &mut self,
        draft_id: &str,
        approved: bool,
    ) -> Result<ExecutionOutcome> {
        let mode = self.store.current_mode()?;

        let Some(draft) = self.drafts.get_mut(draft_id) else {
            return Err(EngagementError::UnknownDraft {
                draft_id: draft_id.to_string(),
            }
            .into());
        };
        if draft.status != DraftStatus::Pending {
            return Err(EngagementError::AlreadyExecuted {
                draft_id: draft_id.to_string(),
            }
            .into());
        }

        if !approved {
            draft.status = DraftStatus::Rejected;
            tracing::info!(draft_id, action = %draft.action, "draft rejected by human");
            return Ok(ExecutionOutcome::Rejected);
        }

        // The mode may have changed since drafting; never act on a stale
        // verdict. Failure here leaves the draft pending.
        ModeEnforcer::new(mode).require_allowed(draft.action)?;

        draft.status = DraftStatus::Approved;
        let action = draft.action;
        let target = draft.target.clone();
        let title = draft.title.clone();
        let content = draft.content.clone();
        let url = draft.url.clone();
        tracing::info!(draft_id, %action, "draft approved; executing");

        let result = self
            .send(action, &target, title.as_deref(), &content, url.as_deref())
            .await?;

        if let Some(draft) = self.drafts.get_mut(draft_id) {
            draft.status = DraftStatus::Executed;
        }
        Ok(ExecutionOutcome::Executed(result))
    }

    /// Read-only view of a registered draft.
    #[must_use]
    pub fn draft_snapshot(&self, draft_id: &str) -> Option<&ActionDraft> {
        self.drafts.get(draft_id)
    }

    pub fn pending_drafts(&self) -> impl Iterator<Item = &ActionDraft> {
        self.drafts
            .values()
            .filter(|draft| draft.status == DraftStatus::Pending)
    }

    /// The single dispatch point to the network for every action shape.
    async fn send(
        &self,
        action: Action,
        target: &str,
        title: Option<&str>,
        content: &str,
        url: Option<&str>,
    ) -> Result<Value> {
        match action {
            Action::Read => {
                let post = self.api.fetch_post(target).await?;
                Ok(serde_json::to_value(post).context("serializing fetched post")?)
            }
            Action::Upvote => Ok(self.api.upvote(target).await?),
            Action::Comment => Ok(self.api.comment(target, content).await?),
            Action::Post => {
                let Some(title) = title else {
                    return Err(EngagementError::ContentRequired { action }.into());
                };
                let content = (!content.is_empty()).then_some(content);
                Ok(self.api.create_post(target, title, content, url).await?)
            }
        }
    }
}
