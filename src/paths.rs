use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::types::KEEPSAKE_DIR;

/// Returns the root Keepsake directory path.
///
/// Resolution order:
/// 1. `KEEPSAKE_ROOT` environment variable (if set)
/// 2. Current working directory + `.keepsake`
pub fn keepsake_root() -> PathBuf {
    match std::env::var("KEEPSAKE_ROOT") {
        Ok(root) if !root.is_empty() => PathBuf::from(root),
        _ => PathBuf::from(KEEPSAKE_DIR),
    }
}

pub fn config_path() -> PathBuf {
    keepsake_root().join("config.yaml")
}

/// Path for messages, relative to the Keepsake root when possible.
pub fn format_relative_path(path: &Path) -> String {
    path.strip_prefix(keepsake_root())
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| path.display().to_string())
}

/// Keep the config (which may hold a token) out of version control.
pub fn ensure_gitignore() -> io::Result<()> {
    let path = keepsake_root().join(".gitignore");
    if path.exists() {
        return Ok(());
    }
    fs::create_dir_all(keepsake_root())?;
    fs::write(path, "config.yaml\n")
}
