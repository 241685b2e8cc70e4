//! Manifest and lockfile I/O operations.

use std::path::Path;

use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::core::{Constraint, Lock, Manifest};
use crate::resolver::encode::{LockFile, ManifestFile};

pub const MANIFEST_NAME: &str = "Gopkg.toml";
pub const LOCK_NAME: &str = "Gopkg.lock";

/// Save a manifest.
pub fn save_manifest(path: &Path, manifest: &Manifest) -> Result<()> {
    ManifestFile::from_manifest(manifest).save(path)
}

/// Save a lock.
pub fn save_lock(path: &Path, lock: &Lock) -> Result<()> {
    LockFile::from_lock(lock).save(path)
}

/// Load a lock from the given path.
pub fn load_lock(path: &Path) -> Result<Option<Lock>> {
    if !path.exists() {
        return Ok(None);
    }

    let lock = LockFile::load(path)?.to_lock()?;
    Ok(Some(lock))
}

/// Compute a hash of the manifest's resolution-affecting fields.
///
/// The normalized form is independent of ignore-list order.
pub fn compute_inputs_digest(manifest: &Manifest) -> String {
    let mut normalized = serde_json::Map::new();

    let constraints: serde_json::Map<String, serde_json::Value> = manifest
        .constraints
        .iter()
        .map(|(root, props)| {
            let constraint = match &props.constraint {
                Some(Constraint::Semver(req)) => serde_json::json!({ "version": req.to_string() }),
                Some(Constraint::Branch(name)) => serde_json::json!({ "branch": name }),
                None => serde_json::Value::Null,
            };
            (
                root.to_string(),
                serde_json::json!({
                    "constraint": constraint,
                    "source": props.source,
                }),
            )
        })
        .collect();
    normalized.insert("constraints".to_string(), constraints.into());

    let mut ignored = manifest.ignored.clone();
    ignored.sort();
    normalized.insert("ignored".to_string(), ignored.into());

    let bytes = serde_json::Value::Object(normalized).to_string();
    hex::encode(Sha256::digest(bytes.as_bytes()))
}
