//! Runtime settings, sourced from environment variables.
//!
//! The credential file is the only persisted state this tool keeps, so
//! everything tunable lives in `MOLTGATE_*` variables over built-in
//! defaults. Unset or unparseable variables fall back silently.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CredentialError;
use crate::security::credentials::CredentialStore;

/// Always the `www` host: bare-host requests get redirected and the
/// Authorization header does not survive the hop.
pub const DEFAULT_BASE_URL: &str = "https://www.moltbook.com/api/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 300;

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Override for the credential directory; `None` means the fixed
    /// per-user location.
    pub credential_dir: Option<PathBuf>,
    /// Truncation length for post bodies in feed summaries.
    pub summary_max_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            credential_dir: None,
            summary_max_chars: DEFAULT_SUMMARY_MAX_CHARS,
        }
    }
}

impl Settings {
    #[must_use]
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MOLTGATE_BASE_URL")
            && !url.is_empty()
        {
            self.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(secs) = std::env::var("MOLTGATE_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
            && secs > 0
        {
            self.request_timeout = Duration::from_secs(secs);
        }

        if let Ok(secs) = std::env::var("MOLTGATE_CONNECT_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
            && secs > 0
        {
            self.connect_timeout = Duration::from_secs(secs);
        }

        if let Ok(dir) = std::env::var("MOLTGATE_CREDENTIALS_DIR")
            && !dir.is_empty()
        {
            self.credential_dir = Some(PathBuf::from(dir));
        }

        if let Ok(chars) = std::env::var("MOLTGATE_SUMMARY_CHARS")
            && let Ok(chars) = chars.parse::<usize>()
            && chars > 0
        {
            self.summary_max_chars = chars;
        }
    }

    /// Credential store at the configured (or default per-user) location.
    pub fn credential_store(&self) -> Result<CredentialStore, CredentialError> {
        match &self.credential_dir {
            Some(dir) => Ok(CredentialStore::new(dir)),
            None => CredentialStore::open_default(),
        }
    }
}
