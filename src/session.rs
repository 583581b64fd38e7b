// src/session.rs
// =============================================================================
// The little bit of state that outlives a single command: the auth token from
// the last login and the preferred display theme.
//
// It lives in <config dir>/mylink/session.json. The HTTP client receives the
// loaded Session when it is built, so the token is read in exactly one place.
//
// Rust concepts:
// - anyhow::Context: errors name the file they are about
// - #[cfg(unix)]: permission bits only exist on unix
// =============================================================================

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "mylink";
const FILENAME: &str = "session.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub theme: Theme,
}

impl Session {
    /// Default location of the session file.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(FILENAME);
        path
    }

    /// Loads the session, or an empty one if the file does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no session file, starting logged out");
            return Ok(Session::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let session = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file {}", path.display()))?;
        Ok(session)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize session")?;
        let mut file = open_private(path)
            .with_context(|| format!("Failed to open session file {}", path.display()))?;
        file.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write session file {}", path.display()))?;
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

// The file holds the auth token: owner read/write only on unix.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::File::create(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_session_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mylink-test-{}-{}", name, std::process::id()))
            .join(FILENAME)
    }

    #[test]
    fn test_missing_file_is_logged_out() {
        let session = Session::load(&temp_session_path("missing")).unwrap();
        assert!(!session.is_logged_in());
        assert_eq!(session.theme, Theme::Light);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_session_path("roundtrip");
        let session = Session {
            token: Some("abc123".to_string()),
            theme: Theme::Dark,
        };

        session.save(&path).unwrap();
        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded, session);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let session: Session = serde_json::from_str(r#"{"theme": "dark"}"#).unwrap();
        assert_eq!(session.token, None);
        assert_eq!(session.theme, Theme::Dark);
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let path = temp_session_path("perms");
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).unwrap();
        }
        // An older file with loose permissions gets tightened too
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let session = Session {
            token: Some("secret".to_string()),
            theme: Theme::Light,
        };
        session.save(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(Session::load(&path).unwrap(), session);

        if let Some(dir) = path.parent() {
            let _ = fs::remove_dir_all(dir);
        }
    }
}
