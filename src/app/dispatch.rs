use std::io::IsTerminal;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use dialoguer::{Confirm, Input, Password};

use crate::api::{MoltbookApi, MoltbookClient};
use crate::app::approval::prompt_for_approval;
use crate::app::status::render_status;
use crate::cli::commands::{Cli, Commands};
use crate::error::CredentialError;
use crate::feed::{FeedReader, render_feed_listing, render_post_detail};
use crate::security::credentials::{ApiKey, Credential, CredentialStore};
use crate::security::engagement::{ActionDraft, EngagementManager, ExecutionOutcome};
use crate::security::mode::{Action, Mode};
use crate::settings::Settings;
use crate::ui::style as ui;

pub async fn dispatch(cli: Cli, settings: Settings) -> Result<()> {
    match cli.command {
        Commands::Register { api_key, agent_id } => run_register(&settings, api_key, agent_id).await,
        Commands::Status => run_status(&settings),
        Commands::Feed { sort, limit } => {
            let reader = feed_reader(&settings)?;
            let summaries = reader.read_feed(&sort, limit).await?;
            println!("{}", render_feed_listing(&summaries));
            Ok(())
        }
        Commands::Submolt { name, limit } => {
            let reader = feed_reader(&settings)?;
            let summaries = reader.read_submolt(&name, limit).await?;
            println!("{}", render_feed_listing(&summaries));
            Ok(())
        }
        Commands::Post {
            id: Some(id),
            ..
        } => {
            let reader = feed_reader(&settings)?;
            let summary = reader.read_post(&id).await?;
            println!("{}", render_post_detail(&summary));
            Ok(())
        }
        Commands::Post {
            id: None,
            submolt: Some(submolt),
            title: Some(title),
            content,
            url,
        } => {
            let mut manager = engagement_manager(&settings)?;
            let draft = manager.draft_post(&submolt, &title, content.as_deref(), url.as_deref())?;
            resolve_draft(&mut manager, &draft).await
        }
        Commands::Post { .. } => {
            bail!("Provide a post id to view, or --submolt and --title to create")
        }
        Commands::Upvote { id } => {
            let manager = engagement_manager(&settings)?;
            manager.perform_low_impact(Action::Upvote, &id).await?;
            println!("{} upvoted {id}", ui::success("✓"));
            Ok(())
        }
        Commands::Comment { id, text } => run_comment(&settings, &id, &text).await,
        Commands::Mode { new_mode } => run_mode(&settings, new_mode.as_deref()),
    }
}

// ─── Construction ───────────────────────────────────────────────────────────

fn load_credential(settings: &Settings) -> Result<(CredentialStore, Credential)> {
    let store = settings.credential_store()?;
    let credential = store.load()?.ok_or(CredentialError::NotRegistered)?;
    Ok((store, credential))
}

fn feed_reader(settings: &Settings) -> Result<FeedReader> {
    let (_, credential) = load_credential(settings)?;
    let api: Arc<dyn MoltbookApi> = Arc::new(MoltbookClient::new(&credential.api_key, settings));
    Ok(FeedReader::new(api, settings.summary_max_chars))
}

fn engagement_manager(settings: &Settings) -> Result<EngagementManager> {
    let (store, credential) = load_credential(settings)?;
    let api: Arc<dyn MoltbookApi> = Arc::new(MoltbookClient::new(&credential.api_key, settings));
    Ok(EngagementManager::new(store, api))
}

// ─── Commands ───────────────────────────────────────────────────────────────

async fn run_register(
    settings: &Settings,
    api_key: Option<String>,
    agent_id: Option<String>,
) -> Result<()> {
    let api_key = if let Some(key) = api_key {
        key
    } else {
        if !std::io::stdin().is_terminal() {
            bail!("--api-key is required in non-interactive mode");
        }
        Password::new()
            .with_prompt("moltbook API key (input hidden)")
            .allow_empty_password(false)
            .interact()
            .context("Failed to read API key from terminal")?
    };
    let agent_id = if let Some(id) = agent_id {
        id
    } else {
        if !std::io::stdin().is_terminal() {
            bail!("--agent-id is required in non-interactive mode");
        }
        Input::new()
            .with_prompt("Agent id")
            .interact_text()
            .context("Failed to read agent id from terminal")?
    };

    // Round-trip before storing so a typo never becomes the saved key.
    let client = MoltbookClient::new(&ApiKey::new(api_key.clone()), settings);
    client
        .agent_status()
        .await
        .context("API key verification against /agents/status failed")?;

    let store = settings.credential_store()?;
    store.store(&api_key, &agent_id)?;
    println!(
        "{} Registered agent '{}' in {} mode.",
        ui::success("✓"),
        agent_id,
        Mode::Lurk
    );
    println!(
        "  {} {}",
        ui::dim("credentials:"),
        store.credentials_path().display()
    );
    Ok(())
}

fn run_status(settings: &Settings) -> Result<()> {
    let store = settings.credential_store()?;
    match store.get_safe_summary()? {
        Some(summary) => {
            println!(
                "{}",
                render_status(&summary, &store.credentials_path(), settings)
            );
        }
        None => println!("Not registered. Run `moltgate register` first."),
    }
    Ok(())
}

async fn run_comment(settings: &Settings, post_id: &str, text: &str) -> Result<()> {
    let mut manager = engagement_manager(settings)?;
    let verdict = manager.verdict_for(Action::Comment)?;

    if verdict.allowed && !verdict.requires_approval {
        let (_, scan) = manager.comment_direct(post_id, text).await?;
        println!("{} commented on {post_id}", ui::success("✓"));
        if scan.flagged {
            eprintln!(
                "{}",
                ui::warn(format!(
                    "⚠ your comment tripped the scanner: {}",
                    scan.category_list()
                ))
            );
        }
        return Ok(());
    }

    // Mode requires approval (or forbids commenting; drafting surfaces that).
    let draft = manager.draft_comment(post_id, text)?;
    resolve_draft(&mut manager, &draft).await
}

fn run_mode(settings: &Settings, new_mode: Option<&str>) -> Result<()> {
    let store = settings.credential_store()?;
    let current = store.current_mode()?;

    let Some(new_mode) = new_mode else {
        println!("{current}");
        println!("{}", ui::dim(current.describe()));
        return Ok(());
    };

    let target = Mode::from_str(new_mode)?;
    if target == current {
        println!("Already in {target} mode.");
        return Ok(());
    }

    if !std::io::stdin().is_terminal() {
        bail!("mode changes require an interactive terminal");
    }
    println!("{current} -> {target}: {}", target.describe());
    let confirmed = Confirm::new()
        .with_prompt(format!("Switch to {target} mode?"))
        .default(false)
        .interact()
        .context("Failed to read mode confirmation from terminal")?;
    if !confirmed {
        println!("Mode unchanged.");
        return Ok(());
    }

    store.set_mode(target)?;
    println!("{} mode set to {target}", ui::success("✓"));
    Ok(())
}

/// Runs one approval round for a freshly created draft and reports the
/// outcome. Rejection is a normal exit, not an error.
async fn resolve_draft(manager: &mut EngagementManager, draft: &ActionDraft) -> Result<()> {
    let approved = prompt_for_approval(draft)?;
    match manager.execute_with_approval(&draft.id, approved).await? {
        ExecutionOutcome::Executed(result) => {
            println!("{} {} sent to {}", ui::success("✓"), draft.action, draft.target);
            tracing::debug!(draft_id = %draft.id, ?result, "draft executed");
        }
        ExecutionOutcome::Rejected => {
            println!("Draft rejected; nothing was sent.");
        }
    }
    Ok(())
}
