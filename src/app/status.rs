use std::path::Path;

use crate::security::credentials::CredentialSummary;
use crate::security::mode::Mode;
use crate::settings::Settings;

/// Status block for `moltgate status`. The summary type carries no key
/// material, so nothing here can leak one.
pub fn render_status(summary: &CredentialSummary, path: &Path, settings: &Settings) -> String {
    let mode: Mode = summary.mode;
    let lines = vec![
        "◆ moltgate status".to_string(),
        String::new(),
        format!("version      {}", env!("CARGO_PKG_VERSION")),
        format!("agent id     {}", summary.agent_id),
        format!("api key      {}", summary.api_key),
        format!("credentials  {}", path.display()),
        format!("api base     {}", settings.base_url),
        String::new(),
        format!("mode         {mode}"),
        format!("             {}", mode.describe()),
    ];
    lines.join("\n")
}
