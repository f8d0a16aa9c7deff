//! The persisted wallet file.
//!
//! The file holds the node endpoint and the encrypted key blob, never a
//! cleartext key. Saving writes a sibling temp file (owner-only permissions
//! on unix) and renames it over the target, so a crash mid-write leaves the
//! previous file intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::WalletError;

/// The top-level wallet file structure, serializable to/from JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletData {
    #[serde(default)]
    pub ws_server: String,
    /// Hex-encoded vault blob.
    #[serde(default, with = "hex_bytes")]
    pub cipher_keys: Vec<u8>,
}

/// Write `data` to `path` through a temp file and an atomic rename.
pub fn save_wallet_data(data: &WalletData, path: &Path) -> Result<(), WalletError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| WalletError::Serialization(format!("wallet JSON encoding failed: {e}")))?;

    let tmp = temp_path(path);
    {
        let mut file = create_private(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    info!(path = %path.display(), "wallet file saved");
    Ok(())
}

/// Read a wallet file. `Ok(None)` if it does not exist.
pub fn load_wallet_data(path: &Path) -> Result<Option<WalletData>, WalletError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)
        .map_err(|e| WalletError::Serialization(format!("invalid wallet file {}: {e}", path.display())))?;
    info!(path = %path.display(), "wallet file loaded");
    Ok(Some(data))
}

/// Copy `src` to `dest`, never overwriting: an existing `dest` gets a `-1`,
/// `-2`, ... suffix before its extension. Returns the path written.
pub fn copy_wallet_file(src: &Path, dest: &Path) -> Result<PathBuf, WalletError> {
    if !src.exists() {
        return Err(WalletError::InvalidState(format!(
            "wallet file {} does not exist",
            src.display()
        )));
    }
    let mut target = dest.to_path_buf();
    let mut suffix = 0u32;
    while target.exists() {
        suffix += 1;
        target = suffixed(dest, suffix);
    }
    let bytes = fs::read(src)?;
    let mut file = create_private(&target)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    info!(path = %target.display(), "wallet file backed up");
    Ok(target)
}

fn suffixed(path: &Path, n: u32) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{n}"),
    };
    path.with_file_name(name)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "wallet".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(unix)]
fn create_private(path: &Path) -> Result<fs::File, WalletError> {
    use std::os::unix::fs::OpenOptionsExt;
    Ok(fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> Result<fs::File, WalletError> {
    Ok(fs::File::create(path)?)
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}
