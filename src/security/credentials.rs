//! Credential storage for the moltbook API key, agent identity, and mode.
//!
//! One record per installation, kept as JSON at
//! `~/.config/moltbook/credentials.json` with owner-only permissions. The
//! plaintext key is reachable only through [`CredentialStore::load`], and the
//! only caller of `load` outside this module is the HTTP client construction
//! path. Everything that echoes credential state back to the agent goes
//! through [`CredentialStore::get_safe_summary`], which redacts the key.

use std::fmt;
use std::fs;
use std::io::{self, Write as _};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::CredentialError;
use crate::security::mode::Mode;

/// Marker substituted for the key in every agent-visible view.
pub const REDACTED: &str = "[REDACTED]";

const CREDENTIALS_FILE: &str = "credentials.json";

// ─── Records ────────────────────────────────────────────────────────────────

/// Bearer token for the moltbook API.
///
/// `Debug` redacts, and there is no `Display` impl, so the token cannot
/// drift into logs or error chains through formatting.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The plaintext token. Callers outside the HTTP client construction
    /// path have no business with this.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey({REDACTED})")
    }
}

/// The stored record: exactly one per installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub api_key: ApiKey,
    pub agent_id: String,
    #[serde(default)]
    pub mode: Mode,
}

/// Redacted view, the only credential-derived value allowed to reach
/// agent-visible output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSummary {
    pub agent_id: String,
    pub mode: Mode,
    pub api_key: &'static str,
}

impl CredentialSummary {
    fn from_credential(credential: &Credential) -> Self {
        Self {
            agent_id: credential.agent_id.clone(),
            mode: credential.mode,
            api_key: REDACTED,
        }
    }
}

// ─── Store ──────────────────────────────────────────────────────────────────

/// File-backed store, single writer per installation.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the fixed per-user location.
    pub fn open_default() -> Result<Self, CredentialError> {
        let dir = Self::default_dir().ok_or_else(|| {
            CredentialError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine home directory",
            ))
        })?;
        Ok(Self::new(dir))
    }

    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".config").join("moltbook"))
    }

    #[must_use]
    pub fn credentials_path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    /// Writes or overwrites the record. Re-registering starts over in the
    /// most restricted mode.
    pub fn store(&self, api_key: &str, agent_id: &str) -> Result<(), CredentialError> {
        let credential = Credential {
            api_key: ApiKey::new(api_key),
            agent_id: agent_id.to_string(),
            mode: Mode::default(),
        };
        self.persist(&credential)
    }

    /// Full record including the plaintext key; `None` when not registered.
    pub fn load(&self) -> Result<Option<Credential>, CredentialError> {
        let path = self.credentials_path();
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let credential: Credential = serde_json::from_str(&contents)?;
        Ok(Some(credential))
    }

    /// Persists a mode change. The write goes through the same atomic
    /// temp-then-rename path as `store`, so a failure part way leaves the
    /// previous record intact.
    pub fn set_mode(&self, mode: Mode) -> Result<(), CredentialError> {
        let mut credential = self.load()?.ok_or(CredentialError::NotRegistered)?;
        credential.mode = mode;
        self.persist(&credential)
    }

    /// Current mode, defaulting to the most restricted when not registered.
    pub fn current_mode(&self) -> Result<Mode, CredentialError> {
        Ok(self.load()?.map(|c| c.mode).unwrap_or_default())
    }

    /// Redacted view of the record; `None` when not registered.
    pub fn get_safe_summary(&self) -> Result<Option<CredentialSummary>, CredentialError> {
        Ok(self
            .load()?
            .map(|credential| CredentialSummary::from_credential(&credential)))
    }

    fn persist(&self, credential: &Credential) -> Result<(), CredentialError> {
        fs::create_dir_all(&self.dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.dir, fs::Permissions::from_mode(0o700))?;
        }

        let json = serde_json::to_string_pretty(credential)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(json.as_bytes())?;

        // Owner-only before the rename, so the key never sits at the final
        // path with looser permissions.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600))?;
        }

        let path = self.credentials_path();
        tmp.persist(&path).map_err(|e| CredentialError::Io(e.error))?;
        tracing::debug!(path = %path.display(), "credentials persisted");
        Ok(())
    }
}
