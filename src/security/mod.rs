//! The trust boundary between the agent and the feed: permission modes,
//! content scanning, credential custody, and the human approval gate.

pub mod credentials;
pub mod engagement;
pub mod mode;
pub mod sanitizer;

pub use credentials::{ApiKey, Credential, CredentialStore, CredentialSummary, REDACTED};
pub use engagement::{ActionDraft, DraftStatus, EngagementManager, ExecutionOutcome};
pub use mode::{Action, Mode, ModeEnforcer, PermissionVerdict};
pub use sanitizer::{ContentSanitizer, PatternHit, RiskCategory, ScanResult};
