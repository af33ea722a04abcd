//! Session storage for persisting login state.
//!
//! Only the API origin and the server-managed cookie jar are written to
//! disk; the access token itself is memory-only by design, so every new
//! invocation re-derives it through the renewal path.

use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use cookie_store::CookieStore;
use directories::ProjectDirs;
use reqwest_cookie_store::CookieStoreMutex;
use serde::{Deserialize, Serialize};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data; deliberately token-free.
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    api: String,
}

/// A loaded session: API origin plus the persisted cookie jar.
pub struct Stored {
    pub api: String,
    pub jar: Arc<CookieStoreMutex>,
}

fn data_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "souq").context("Could not determine config directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.to_path_buf())
}

fn session_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("session.json"))
}

fn cookies_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("cookies.json"))
}

/// Save the session to disk.
pub fn save(api: &str, jar: &CookieStoreMutex) -> Result<()> {
    let stored = StoredSession {
        api: api.to_string(),
    };
    let json = serde_json::to_string_pretty(&stored)?;
    fs::write(session_path()?, &json).context("Failed to write session file")?;

    let path = cookies_path()?;
    let mut writer = fs::File::create(&path)
        .map(BufWriter::new)
        .context("Failed to write cookie jar")?;
    {
        let store = jar.lock().map_err(|_| anyhow!("Cookie jar lock poisoned"))?;
        cookie_store::serde::json::save(&store, &mut writer)
            .map_err(|err| anyhow!("Failed to save cookie jar: {err}"))?;
    }

    // Set restrictive permissions (Unix only)
    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    Ok(())
}

/// Load a session from disk.
pub fn load() -> Result<Option<Stored>> {
    let session_path = session_path()?;
    if !session_path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&session_path).context("Failed to read session file")?;
    let stored: StoredSession = serde_json::from_str(&json).context("Invalid session file")?;

    let cookies_path = cookies_path()?;
    let store = if cookies_path.exists() {
        let reader = fs::File::open(&cookies_path)
            .map(BufReader::new)
            .context("Failed to read cookie jar")?;
        cookie_store::serde::json::load(reader).map_err(|err| anyhow!("Invalid cookie jar: {err}"))?
    } else {
        CookieStore::default()
    };

    Ok(Some(Stored {
        api: stored.api,
        jar: Arc::new(CookieStoreMutex::new(store)),
    }))
}

/// Clear the stored session.
pub fn clear() -> Result<()> {
    for path in [session_path()?, cookies_path()?] {
        if path.exists() {
            fs::remove_file(&path).context("Failed to remove session file")?;
        }
    }
    Ok(())
}
