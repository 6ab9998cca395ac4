//! On-disk state of the Matrix connection.
//!
//! The data directory holds two entries:
//!
//! ```text
//! <data>/
//! ├── session   JSON: access tokens + last sync token
//! └── sqlite/   matrix-sdk state and crypto store, encrypted with the passphrase
//! ```
//!
//! A missing or unreadable `session` file means the bot logs in again with its
//! password; the sync token lets a restarted bot skip the events it already saw.

use log::{debug, trace};
use matrix_sdk::authentication::matrix;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::utils::get_path;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    user_session: matrix::MatrixSession,

    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Session file and sqlite store locations, with the session read at startup.
#[derive(Clone)]
pub struct SessionStore {
    session: Option<StoredSession>,
    sqlite_path: String,
    session_path: String,
}

impl SessionStore {
    /// Opens the store located in `dir_path`, creating the directory if needed
    /// and reading the session if any.
    pub async fn open(dir_path: &str) -> anyhow::Result<SessionStore> {
        fs::create_dir_all(dir_path).await?;

        let sqlite_path = get_path(dir_path, "sqlite");
        let session_path = get_path(dir_path, "session");
        debug!("session store at {session_path}, sqlite store at {sqlite_path}");

        let session = match read_session(&session_path).await {
            Ok(session) => Some(session),
            Err(e) => {
                debug!("no usable session: {e}");
                None
            }
        };

        Ok(SessionStore {
            session,
            sqlite_path,
            session_path,
        })
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn sqlite_path(&self) -> &str {
        &self.sqlite_path
    }

    pub fn user_session(&self) -> Option<&matrix::MatrixSession> {
        self.session.as_ref().map(|s| &s.user_session)
    }

    pub fn sync_token(&self) -> Option<String> {
        self.session.as_ref().and_then(|s| s.sync_token.clone())
    }

    /// Writes `sync_token` next to the persisted user session.
    pub async fn persist_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        trace!("persist sync token {}", sync_token);

        let mut session = read_session(&self.session_path).await?;
        session.sync_token = Some(sync_token);
        fs::write(&self.session_path, serde_json::to_string(&session)?).await?;

        Ok(())
    }

    /// Replaces the persisted session with `user_session`, dropping the sync token.
    pub async fn persist_user_session(
        &self,
        user_session: &matrix::MatrixSession,
    ) -> anyhow::Result<()> {
        trace!("persist user session");

        let session = StoredSession {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&session)?).await?;

        Ok(())
    }
}

async fn read_session(session_path: &str) -> anyhow::Result<StoredSession> {
    let serialized_session = fs::read_to_string(session_path).await?;
    Ok(serde_json::from_str(&serialized_session)?)
}
