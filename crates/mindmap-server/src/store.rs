//! File-system backed document store.
//!
//! One directory per project under `projects/`, one `<mindmap>.json` per
//! mindmap, a per-project `onVoting.json` and a global `users.json`. Every
//! save is an unconditional full-document overwrite with no version check:
//! when two clients race, the later-arriving write wins and the earlier
//! one is silently discarded. That is the store's concurrency contract.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use mindmap_shared::api::{AuthResponse, ProjectSummary};
use mindmap_shared::{MindmapDocument, MindmapSummary, User, VotingDocument};
use uuid::Uuid;

use crate::error::AppError;

/// Filenames inside a project directory that are not mindmaps.
const RESERVED_MINDMAPS: &[&str] = &["onVoting", "updateLogs"];

/// Created at startup so a fresh install has somewhere to land.
const DEFAULT_PROJECT: &str = "gameA";

const VOTING_FILE: &str = "onVoting.json";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct UsersFile {
    users: Vec<User>,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (and initializes) the data directory: the projects tree, the
    /// default project and a seeded `admin`/`admin` account.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let store = Self { root: root.into() };
        fs::create_dir_all(store.projects_dir())?;
        fs::create_dir_all(store.project_dir(DEFAULT_PROJECT)?)?;
        store.ensure_admin_account()?;
        Ok(store)
    }

    fn projects_dir(&self) -> PathBuf {
        self.root.join("projects")
    }

    fn users_path(&self) -> PathBuf {
        self.root.join("users.json")
    }

    fn project_dir(&self, project_id: &str) -> Result<PathBuf, AppError> {
        validate_name(project_id)?;
        Ok(self.projects_dir().join(project_id))
    }

    fn mindmap_path(&self, project_id: &str, mindmap_id: &str) -> Result<PathBuf, AppError> {
        validate_name(mindmap_id)?;
        Ok(self.project_dir(project_id)?.join(format!("{mindmap_id}.json")))
    }

    // ===== Projects =====

    pub fn list_projects(&self) -> Result<Vec<ProjectSummary>, AppError> {
        let mut projects = Vec::new();
        for entry in fs::read_dir(self.projects_dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            projects.push(ProjectSummary {
                id: name.clone(),
                name,
            });
        }
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(projects)
    }

    pub fn create_project(&self, name: &str) -> Result<ProjectSummary, AppError> {
        validate_name(name)?;
        if name == "admin" {
            return Err(AppError::Validation("project name may not be 'admin'".into()));
        }
        let dir = self.project_dir(name)?;
        if dir.exists() {
            return Err(AppError::Conflict(format!("project '{name}' already exists")));
        }
        fs::create_dir_all(&dir)?;
        tracing::info!("Created project {}", name);
        Ok(ProjectSummary {
            id: name.to_string(),
            name: name.to_string(),
        })
    }

    pub fn rename_project(&self, project_id: &str, new_name: &str) -> Result<ProjectSummary, AppError> {
        validate_name(new_name)?;
        if new_name == "admin" || project_id == "admin" {
            return Err(AppError::Validation("the 'admin' project name is reserved".into()));
        }
        let old_dir = self.project_dir(project_id)?;
        if !old_dir.exists() {
            return Err(AppError::NotFound);
        }
        if project_id == new_name {
            return Ok(ProjectSummary {
                id: new_name.to_string(),
                name: new_name.to_string(),
            });
        }
        let new_dir = self.project_dir(new_name)?;
        if new_dir.exists() {
            return Err(AppError::Conflict(format!("project '{new_name}' already exists")));
        }
        fs::rename(old_dir, new_dir)?;
        tracing::info!("Renamed project {} -> {}", project_id, new_name);
        Ok(ProjectSummary {
            id: new_name.to_string(),
            name: new_name.to_string(),
        })
    }

    pub fn delete_project(&self, project_id: &str) -> Result<(), AppError> {
        if project_id == "admin" {
            return Err(AppError::Validation("cannot delete the admin project".into()));
        }
        if project_id == DEFAULT_PROJECT {
            return Err(AppError::Validation("cannot delete the default project".into()));
        }
        let dir = self.project_dir(project_id)?;
        if !dir.exists() {
            return Err(AppError::NotFound);
        }
        fs::remove_dir_all(dir)?;
        tracing::info!("Deleted project {}", project_id);
        Ok(())
    }

    // ===== Mindmaps =====

    pub fn list_mindmaps(&self, project_id: &str) -> Result<Vec<MindmapSummary>, AppError> {
        let dir = self.project_dir(project_id)?;
        if !dir.exists() {
            return Err(AppError::NotFound);
        }
        let mut mindmaps = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let Some(stem) = mindmap_stem(&path) else {
                continue;
            };
            if RESERVED_MINDMAPS.contains(&stem) {
                continue;
            }
            // A document that no longer parses is skipped, not fatal.
            match self.read_document(&path) {
                Ok(doc) => mindmaps.push(MindmapSummary {
                    id: stem.to_string(),
                    name: stem.to_string(),
                    created_at: doc.created_at,
                    created_by: doc.created_by,
                }),
                Err(e) => {
                    tracing::warn!("Skipping unreadable mindmap {:?}: {}", path, e);
                }
            }
        }
        mindmaps.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(mindmaps)
    }

    pub fn load_mindmap(&self, project_id: &str, mindmap_id: &str) -> Result<MindmapDocument, AppError> {
        let path = self.mindmap_path(project_id, mindmap_id)?;
        if !path.exists() {
            return Err(AppError::NotFound);
        }
        self.read_document(&path)
    }

    /// Full-document overwrite: the stored file becomes exactly the given
    /// payload plus a fresh `updatedAt` stamp. The project directory is
    /// created when absent. No version token is checked; last write wins.
    pub fn save_mindmap(
        &self,
        project_id: &str,
        mindmap_id: &str,
        mut doc: MindmapDocument,
    ) -> Result<(), AppError> {
        let path = self.mindmap_path(project_id, mindmap_id)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        doc.updated_at = Some(Utc::now());
        fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
        tracing::debug!("Saved mindmap {}/{}", project_id, mindmap_id);
        Ok(())
    }

    pub fn delete_mindmap(&self, project_id: &str, mindmap_id: &str) -> Result<(), AppError> {
        let path = self.mindmap_path(project_id, mindmap_id)?;
        if !path.exists() {
            return Err(AppError::NotFound);
        }
        fs::remove_file(path)?;
        tracing::info!("Deleted mindmap {}/{}", project_id, mindmap_id);
        Ok(())
    }

    fn read_document(&self, path: &Path) -> Result<MindmapDocument, AppError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    // ===== Voting =====

    /// Loads the per-project voting document, materializing an empty one
    /// on first access.
    pub fn load_voting(&self, project_id: &str) -> Result<VotingDocument, AppError> {
        let dir = self.project_dir(project_id)?;
        if !dir.exists() {
            return Err(AppError::NotFound);
        }
        let path = dir.join(VOTING_FILE);
        if !path.exists() {
            let doc = VotingDocument::default();
            fs::write(&path, serde_json::to_string_pretty(&doc)?)?;
            return Ok(doc);
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save_voting(&self, project_id: &str, doc: &VotingDocument) -> Result<(), AppError> {
        let dir = self.project_dir(project_id)?;
        if !dir.exists() {
            return Err(AppError::NotFound);
        }
        fs::write(dir.join(VOTING_FILE), serde_json::to_string_pretty(doc)?)?;
        Ok(())
    }

    // ===== Users =====

    fn ensure_admin_account(&self) -> Result<(), AppError> {
        let mut users = self.load_users()?;
        if !users.users.iter().any(|u| u.id == "admin") {
            users.users.push(User {
                id: "admin".into(),
                username: "admin".into(),
                password: "admin".into(),
                is_admin: true,
                created_at: Utc::now(),
            });
            self.save_users(&users)?;
        }
        Ok(())
    }

    fn load_users(&self) -> Result<UsersFile, AppError> {
        let path = self.users_path();
        if !path.exists() {
            return Ok(UsersFile { users: Vec::new() });
        }
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save_users(&self, users: &UsersFile) -> Result<(), AppError> {
        fs::write(self.users_path(), serde_json::to_string_pretty(users)?)?;
        Ok(())
    }

    pub fn register(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::Validation("username and password are required".into()));
        }
        let mut users = self.load_users()?;
        if users.users.iter().any(|u| u.username == username) {
            return Err(AppError::Validation("Username already exists".into()));
        }
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            // Stored as-is; credential hardening is out of scope.
            password: password.to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };
        let response = AuthResponse {
            user_id: user.id.clone(),
            username: user.username.clone(),
            is_admin: false,
        };
        users.users.push(user);
        self.save_users(&users)?;
        tracing::info!("Registered user {}", username);
        Ok(response)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let users = self.load_users()?;
        let user = users
            .users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .ok_or(AppError::Unauthorized)?;
        Ok(AuthResponse {
            user_id: user.id.clone(),
            username: user.username.clone(),
            is_admin: user.is_admin,
        })
    }
}

/// Project and mindmap ids become file-system names, so they must be a
/// single plain path component.
fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::Validation(format!("invalid name: {name}")));
    }
    Ok(())
}

fn mindmap_stem(path: &Path) -> Option<&str> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return None;
    }
    path.file_stem().and_then(|s| s.to_str())
}
