//! Structured local store for the client.
//!
//! Replaces loose per-field key-value storage with typed records, each
//! persisted as a JSON file under the store directory: the session identity,
//! the cached posting list, the in-progress draft, and per-email photo
//! blobs. Nothing here is the source of truth; everything can be rebuilt
//! from the server except the draft.

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::draft::Draft;
use crate::db::{AccountIdentity, PostingWithAuthor};
use crate::utils::ensure_dir;

const SESSION_FILE: &str = "session.json";
const LISTINGS_FILE: &str = "listings.json";
const DRAFT_FILE: &str = "draft.json";

/// The "current session" is simply the persisted identity; there is no
/// token and no expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: AccountIdentity,
}

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        ensure_dir(&dir.join("photos"))?;
        Ok(Self { dir })
    }

    fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(value))
    }

    fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    fn remove(&self, file: &str) -> Result<()> {
        let path = self.dir.join(file);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    // --- Session ---

    pub fn save_session(&self, session: &Session) -> Result<()> {
        self.write_json(SESSION_FILE, session)
    }

    pub fn load_session(&self) -> Result<Option<Session>> {
        self.read_json(SESSION_FILE)
    }

    pub fn clear_session(&self) -> Result<()> {
        self.remove(SESSION_FILE)
    }

    /// Is someone logged in? The session exists exactly when the identity
    /// file does.
    pub fn has_session(&self) -> bool {
        self.dir.join(SESSION_FILE).exists()
    }

    // --- Cached listing list ---

    pub fn save_listings(&self, postings: &[PostingWithAuthor]) -> Result<()> {
        self.write_json(LISTINGS_FILE, &postings)
    }

    /// Cached postings; an absent file is an empty cache.
    pub fn load_listings(&self) -> Result<Vec<PostingWithAuthor>> {
        Ok(self.read_json(LISTINGS_FILE)?.unwrap_or_default())
    }

    // --- Draft ---

    pub fn save_draft(&self, draft: &Draft) -> Result<()> {
        self.write_json(DRAFT_FILE, draft)
    }

    pub fn load_draft(&self) -> Result<Option<Draft>> {
        self.read_json(DRAFT_FILE)
    }

    pub fn clear_draft(&self) -> Result<()> {
        self.remove(DRAFT_FILE)
    }

    // --- Per-email photo blobs ---

    fn photo_path(&self, email: &str) -> PathBuf {
        // Emails are hex-encoded so any address maps to a safe file name
        self.dir
            .join("photos")
            .join(format!("{}.b64", hex::encode(email)))
    }

    pub fn save_photo(&self, email: &str, data_url: &str) -> Result<()> {
        let path = self.photo_path(email);
        std::fs::write(&path, data_url)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn load_photo(&self, email: &str) -> Result<Option<String>> {
        let path = self.photo_path(email);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    pub fn clear_photo(&self, email: &str) -> Result<()> {
        let path = self.photo_path(email);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        Ok(())
    }

    /// Wipe everything tied to an account: session, draft and photo.
    /// Used on logout and after a confirmed server-side account deletion.
    /// The cached listing list survives; it is shared, not per-account.
    pub fn clear_account(&self, email: &str) -> Result<()> {
        self.clear_session()?;
        self.clear_draft()?;
        self.clear_photo(email)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, LocalStore) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn identity() -> AccountIdentity {
        AccountIdentity {
            nome: "Ana Souza".to_string(),
            email: "a@b.com".to_string(),
            telefone: "(11)98888-7777".to_string(),
        }
    }

    #[test]
    fn session_round_trip() {
        let (_dir, store) = store();
        assert!(!store.has_session());
        assert!(store.load_session().unwrap().is_none());

        let session = Session { user: identity() };
        store.save_session(&session).unwrap();
        assert!(store.has_session());
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert!(!store.has_session());
    }

    #[test]
    fn listings_default_to_empty() {
        let (_dir, store) = store();
        assert!(store.load_listings().unwrap().is_empty());
    }

    #[test]
    fn listings_round_trip() {
        let (_dir, store) = store();
        let postings = vec![PostingWithAuthor {
            id: 1,
            nome_projeto: "Horta".to_string(),
            descricao: "d".to_string(),
            valor: 100.0,
            qtd_pessoas: 2,
            telefone: "(11)98888-7777".to_string(),
            email_autor: "a@b.com".to_string(),
            nome_autor: "Ana".to_string(),
            foto_perfil: None,
        }];

        store.save_listings(&postings).unwrap();
        let loaded = store.load_listings().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].nome_projeto, "Horta");
    }

    #[test]
    fn draft_round_trip_and_clear() {
        let (_dir, store) = store();
        assert!(store.load_draft().unwrap().is_none());

        let draft = Draft::start("Horta", "desc").unwrap();
        store.save_draft(&draft).unwrap();
        assert_eq!(store.load_draft().unwrap(), Some(draft));

        store.clear_draft().unwrap();
        assert!(store.load_draft().unwrap().is_none());
        // Clearing twice is fine
        store.clear_draft().unwrap();
    }

    #[test]
    fn photos_are_stored_per_email() {
        let (_dir, store) = store();
        store.save_photo("a@b.com", "data:image/jpeg;base64,AAA").unwrap();
        store.save_photo("b@c.com", "data:image/jpeg;base64,BBB").unwrap();

        assert_eq!(
            store.load_photo("a@b.com").unwrap().as_deref(),
            Some("data:image/jpeg;base64,AAA")
        );
        assert_eq!(
            store.load_photo("b@c.com").unwrap().as_deref(),
            Some("data:image/jpeg;base64,BBB")
        );
        assert!(store.load_photo("c@d.com").unwrap().is_none());
    }

    #[test]
    fn clear_account_wipes_session_draft_and_photo_but_not_listings() {
        let (_dir, store) = store();
        store.save_session(&Session { user: identity() }).unwrap();
        store
            .save_draft(&Draft::start("Horta", "desc").unwrap())
            .unwrap();
        store.save_photo("a@b.com", "data:image/jpeg;base64,AAA").unwrap();
        store.save_listings(&[]).unwrap();

        store.clear_account("a@b.com").unwrap();

        assert!(!store.has_session());
        assert!(store.load_draft().unwrap().is_none());
        assert!(store.load_photo("a@b.com").unwrap().is_none());
        // Shared cache file still present
        assert!(store.path().join("listings.json").exists());
    }
}
