use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Runtime configuration for the polling core.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// The application namespace mixed into every action scope.
    pub app_id: String,

    /// The number of historical roots accepted besides the current one.
    pub root_history_size: usize,

    /// The maximum number of choices a poll may carry.
    pub max_vote_options: u32,

    /// The maximum poll question length, in bytes.
    pub max_question_length: usize,

    /// The budget for a single verifier oracle call, in milliseconds.
    /// Enforced by wrapping the oracle in
    /// [`crate::verifier::TimedVerifier`]; a call past the budget
    /// surfaces as a verifier fault, not as a proof failure.
    pub verifier_timeout_ms: u64,
}

impl Default for Config
{
    fn default() -> Config
    {
        Config {
            app_id: "anonypoll".into(),
            root_history_size: 100,
            max_vote_options: 32,
            max_question_length: 256,
            verifier_timeout_ms: 10_000,
        }
    }
}

impl Config
{
    /// Load configuration from a JSON file. Missing fields take their
    /// defaults.
    pub fn from_json_file(path: &Path) -> io::Result<Config>
    {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}
