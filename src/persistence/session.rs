use super::files::{atomic_write, read_file, remove_file};
use crate::api::Token;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Login state kept between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub username: String,
    pub access_token: String,
    pub token_type: String,
}

impl StoredSession {
    pub fn new(username: &str, token: Token) -> Self {
        Self {
            username: username.to_string(),
            access_token: token.access_token,
            token_type: token.token_type,
        }
    }
}

pub fn load_session<P: AsRef<Path>>(path: P) -> Result<Option<StoredSession>> {
    let content = read_file(&path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let session = serde_json::from_str(&content).context("Failed to parse session file")?;
    Ok(Some(session))
}

pub fn save_session<P: AsRef<Path>>(path: P, session: &StoredSession) -> Result<()> {
    let content = serde_json::to_string_pretty(session)?;
    atomic_write(path, &content)
}

pub fn clear_session<P: AsRef<Path>>(path: P) -> Result<()> {
    remove_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_lifecycle() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        assert_eq!(load_session(&path).unwrap(), None);

        let session = StoredSession::new(
            "lin",
            Token {
                access_token: "abc".to_string(),
                token_type: "bearer".to_string(),
            },
        );
        save_session(&path, &session).unwrap();
        assert_eq!(load_session(&path).unwrap(), Some(session));

        clear_session(&path).unwrap();
        assert_eq!(load_session(&path).unwrap(), None);
    }
}
