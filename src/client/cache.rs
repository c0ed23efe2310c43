//! The client's local copy of the posting list.
//!
//! The cache is a read-through copy of `GET /projetos`, refreshed whenever a
//! screen regains focus. It is never the source of truth; every mutation
//! goes to the server first and the cache is updated (or re-fetched) on
//! success. Views over it are recomputed synchronously on every keystroke,
//! which is acceptable at the expected data volume.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ClientError};
use crate::db::PostingWithAuthor;

/// Sort applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Descending by id; ids increase with creation order, so this is the
    /// recency proxy.
    MostRecent,
    HighestValue,
    LowestValue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingCache {
    postings: Vec<PostingWithAuthor>,
}

impl ListingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_postings(postings: Vec<PostingWithAuthor>) -> Self {
        Self { postings }
    }

    pub fn postings(&self) -> &[PostingWithAuthor] {
        &self.postings
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Replace the cached list wholesale (a refresh from the server).
    pub fn replace(&mut self, postings: Vec<PostingWithAuthor>) {
        self.postings = postings;
    }

    /// Re-fetch the full list from the server.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<(), ClientError> {
        self.postings = api.list_postings().await?;
        Ok(())
    }

    /// Drop a posting locally after a confirmed server-side delete.
    pub fn remove(&mut self, id: i64) {
        self.postings.retain(|p| p.id != id);
    }

    /// Postings owned by the given author.
    pub fn by_author<'a>(&'a self, email: &str) -> Vec<&'a PostingWithAuthor> {
        self.postings
            .iter()
            .filter(|p| p.email_autor == email)
            .collect()
    }

    /// Filtered, sorted view: case-insensitive substring match on the
    /// posting name, then the requested sort. An empty search string keeps
    /// everything.
    pub fn view<'a>(&'a self, search: &str, mode: SortMode) -> Vec<&'a PostingWithAuthor> {
        let needle = search.to_lowercase();
        let mut rows: Vec<&PostingWithAuthor> = self
            .postings
            .iter()
            .filter(|p| p.nome_projeto.to_lowercase().contains(&needle))
            .collect();

        match mode {
            SortMode::MostRecent => rows.sort_by(|a, b| b.id.cmp(&a.id)),
            SortMode::HighestValue => rows.sort_by(|a, b| b.valor.total_cmp(&a.valor)),
            SortMode::LowestValue => rows.sort_by(|a, b| a.valor.total_cmp(&b.valor)),
        }

        rows
    }
}
