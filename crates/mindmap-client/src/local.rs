//! Per-user state kept on the client machine.
//!
//! Collapse state, the support ledger and the vote ledger never travel to
//! the server as separate records; they live as JSON files in the user's
//! config directory and survive restarts.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use mindmap_shared::state::{CollapsedNodes, SupportLedger, VoteLedger};

const COLLAPSED_FILE: &str = "collapsed.json";
const SUPPORT_FILE: &str = "supported.json";
const VOTES_FILE: &str = "votes.json";
const LOGIN_FILE: &str = "login.json";

/// The identity remembered between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedLogin {
    pub user_id: String,
    pub username: String,
    pub is_admin: bool,
}

/// Handle on the client-side state directory.
#[derive(Debug, Clone)]
pub struct LocalState {
    dir: PathBuf,
}

impl LocalState {
    /// Open the per-user state directory, creating it when absent.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("mindmap");
        Self::open_at(dir)
    }

    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context("Could not create config directory")?;
        Ok(Self { dir })
    }

    fn load_file<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Could not read {}", file))?;
        serde_json::from_str(&contents).with_context(|| format!("Could not parse {}", file))
    }

    fn save_file<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(value).with_context(|| format!("Could not serialize {}", file))?;
        fs::write(self.dir.join(file), contents)
            .with_context(|| format!("Could not write {}", file))
    }

    pub fn load_collapsed(&self) -> Result<CollapsedNodes> {
        self.load_file(COLLAPSED_FILE)
    }

    pub fn save_collapsed(&self, collapsed: &CollapsedNodes) -> Result<()> {
        self.save_file(COLLAPSED_FILE, collapsed)
    }

    pub fn load_support(&self) -> Result<SupportLedger> {
        self.load_file(SUPPORT_FILE)
    }

    pub fn save_support(&self, ledger: &SupportLedger) -> Result<()> {
        self.save_file(SUPPORT_FILE, ledger)
    }

    pub fn load_votes(&self) -> Result<VoteLedger> {
        self.load_file(VOTES_FILE)
    }

    pub fn save_votes(&self, ledger: &VoteLedger) -> Result<()> {
        self.save_file(VOTES_FILE, ledger)
    }

    pub fn load_login(&self) -> Result<Option<SavedLogin>> {
        let path = self.dir.join(LOGIN_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path).context("Could not read login file")?;
        let login = serde_json::from_str(&contents).context("Could not parse login file")?;
        Ok(Some(login))
    }

    pub fn save_login(&self, login: &SavedLogin) -> Result<()> {
        self.save_file(LOGIN_FILE, login)
    }

    /// Forget the saved identity, e.g. on logout.
    pub fn clear_login(&self) -> Result<()> {
        let path = self.dir.join(LOGIN_FILE);
        if path.exists() {
            fs::remove_file(&path).context("Could not delete login file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (tempfile::TempDir, LocalState) {
        let dir = tempfile::tempdir().unwrap();
        let state = LocalState::open_at(dir.path()).unwrap();
        (dir, state)
    }

    #[test]
    fn missing_files_load_as_defaults() {
        let (_dir, state) = state();
        assert!(state.load_collapsed().unwrap().is_empty());
        assert!(state.load_login().unwrap().is_none());
    }

    #[test]
    fn collapse_state_round_trips() {
        let (_dir, state) = state();
        let mut collapsed = CollapsedNodes::default();
        collapsed.toggle("gameA", "roadmap", "n-1");
        state.save_collapsed(&collapsed).unwrap();

        let back = state.load_collapsed().unwrap();
        assert!(back.is_collapsed("gameA", "roadmap", "n-1"));
        assert!(!back.is_collapsed("gameA", "roadmap", "n-2"));
    }

    #[test]
    fn login_round_trips_and_clears() {
        let (_dir, state) = state();
        state
            .save_login(&SavedLogin {
                user_id: "u1".into(),
                username: "ann".into(),
                is_admin: false,
            })
            .unwrap();
        assert_eq!(state.load_login().unwrap().unwrap().username, "ann");

        state.clear_login().unwrap();
        assert!(state.load_login().unwrap().is_none());
    }
}
