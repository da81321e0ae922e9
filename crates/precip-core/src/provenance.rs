//! Provenance and schema descriptors attached to run artefacts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{ErrorInfo, PrecipError};

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to every run summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Schema of the enclosing artefact.
    pub schema_version: SchemaVersion,
    /// SHA-256 of the canonical JSON form of the simulation configuration.
    pub config_hash: String,
    /// Master deterministic seed used for all randomness.
    pub seed: u64,
    /// RFC-3339 timestamp recording when the artefact was generated.
    pub created_at: String,
    /// Version map for the crates involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

impl RunProvenance {
    /// Captures provenance for a run over `config` with master `seed`.
    pub fn capture<T: Serialize>(config: &T, seed: u64) -> Result<Self, PrecipError> {
        let mut tool_versions = BTreeMap::new();
        tool_versions.insert(
            env!("CARGO_PKG_NAME").to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Ok(Self {
            schema_version: SchemaVersion::default(),
            config_hash: stable_hash_string(config)?,
            seed,
            created_at: chrono::Utc::now().to_rfc3339(),
            tool_versions,
        })
    }
}

/// Computes a stable hexadecimal hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, PrecipError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|err| PrecipError::Serde(ErrorInfo::new("json-encode", err.to_string())))?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
