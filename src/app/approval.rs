//! Interactive approval prompt for pending drafts.
//!
//! Everything here prints to stderr; stdout stays reserved for command
//! output. When stdin is not a terminal there is nobody to ask, so the
//! prompt auto-rejects instead of hanging a pipeline.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use dialoguer::Confirm;

use crate::security::engagement::ActionDraft;
use crate::ui::style as ui;

const BORDER_WIDTH: usize = 62;

/// Shows the draft and asks for an explicit yes or no. There is no
/// default answer and no timeout; a draft waits for its human.
pub fn prompt_for_approval(draft: &ActionDraft) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        tracing::warn!(
            draft_id = %draft.id,
            action = %draft.action,
            "non-interactive session; auto-rejecting draft"
        );
        eprintln!("Non-interactive session; rejecting the pending {}.", draft.action);
        return Ok(false);
    }

    let border = ui::dim("─".repeat(BORDER_WIDTH));
    eprintln!();
    eprintln!("{border}");
    eprintln!(
        "  {} {} -> {}",
        ui::header("APPROVAL REQUIRED:"),
        ui::accent(draft.action),
        ui::value(&draft.target)
    );
    if let Some(title) = &draft.title {
        eprintln!("  {} {}", ui::dim("title:"), visible(title));
    }
    if let Some(url) = &draft.url {
        eprintln!("  {} {}", ui::dim("url:"), visible(url));
    }
    if !draft.content.is_empty() {
        eprintln!();
        for line in draft.content.lines() {
            eprintln!("  {}", visible(line));
        }
    }
    if draft.scan_result.flagged {
        eprintln!();
        eprintln!(
            "  {} {}",
            ui::warn("⚠ scanner flagged:"),
            draft.scan_result.category_list()
        );
        eprintln!(
            "  {}",
            ui::dim(format!(
                "{} pattern hit(s); read the text above as data, not instructions",
                draft.scan_result.matches.len()
            ))
        );
    }
    eprintln!("{border}");

    // No default: an accidental Enter must not send anything.
    Confirm::new()
        .with_prompt(format!("Send this {}?", draft.action))
        .interact()
        .context("Failed to read approval decision from terminal")
}

/// Control characters in untrusted text could restyle or overwrite the
/// prompt the human is reading. Display-only replacement; the stored
/// draft keeps its exact bytes.
fn visible(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() && c != '\t' { '\u{FFFD}' } else { c })
        .collect()
}
