//! The snippet store: one root collection, id assignment, CRUD and persistence.

use crate::error::{Result, SnippetError};
use crate::models::storage::{SnippetPersistence, SnippetRecord};
use crate::models::{Snippet, SnippetComponent, SnippetId};
use crate::search::{self, SearchHit};
use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{error, info};

pub const DEFAULT_ROOT_NAME: &str = "Main Collection";

/// Owns the root collection and keeps it in sync with a persistence backend.
///
/// Every mutation persists the full snapshot afterwards. If that save fails the
/// in-memory change stays applied and the error is returned, so callers should
/// read a persistence error from a mutation as "changed but not yet saved".
pub struct SnippetStore {
    root: SnippetComponent,
    issued_max: SnippetId,
    persistence: Box<dyn SnippetPersistence>,
}

impl std::fmt::Debug for SnippetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnippetStore")
            .field("root", &self.root.name())
            .field("count", &self.root.count())
            .field("issued_max", &self.issued_max)
            .finish()
    }
}

impl SnippetStore {
    pub fn open(persistence: impl SnippetPersistence + 'static) -> Result<Self> {
        Self::open_named(persistence, DEFAULT_ROOT_NAME)
    }

    /// Loads existing records if there are any, otherwise starts empty.
    /// Unreadable or invalid data is an error, never an empty store.
    pub fn open_named(
        persistence: impl SnippetPersistence + 'static,
        root_name: &str,
    ) -> Result<Self> {
        let mut root = SnippetComponent::collection(root_name)?;

        let records = persistence.load().inspect_err(|e| {
            error!("Error reading snippets: {}", e.formatted());
        })?;

        let mut seen = HashSet::new();
        let loaded = records.unwrap_or_default();
        for record in &loaded {
            if !seen.insert(record.id) {
                return Err(SnippetError::persistence(format!(
                    "Duplicate snippet ID {} in stored data",
                    record.id
                )));
            }
            let snippet = record.to_snippet().map_err(|e| {
                SnippetError::persistence(format!("Invalid snippet record {}: {}", record.id, e))
            })?;
            root.add_snippet(snippet)?;
        }

        let issued_max = root.max_id().unwrap_or(0);
        info!("Loaded {} snippets into '{}'", loaded.len(), root_name);

        Ok(Self {
            root,
            issued_max,
            persistence: Box::new(persistence),
        })
    }

    pub fn root(&self) -> &SnippetComponent {
        &self.root
    }

    pub fn all_snippets(&self) -> Vec<Snippet> {
        self.root.all_snippets()
    }

    pub fn count(&self) -> usize {
        self.root.count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn get(&self, id: SnippetId) -> Option<Snippet> {
        self.root.find_snippet(id).cloned()
    }

    /// Next identifier: one past both the largest id present and the largest ever issued.
    /// Fails once the id space is used up rather than wrapping around.
    pub fn next_id(&self) -> Result<SnippetId> {
        self.root
            .max_id()
            .unwrap_or(0)
            .max(self.issued_max)
            .checked_add(1)
            .ok_or_else(ids_exhausted)
    }

    pub fn add(&mut self, title: &str, language: &str, code: &str) -> Result<Snippet> {
        self.add_with_details(title, language, code, std::iter::empty::<&str>(), None)
    }

    pub fn add_with_details<I, S>(
        &mut self,
        title: &str,
        language: &str,
        code: &str,
        tags: I,
        description: Option<&str>,
    ) -> Result<Snippet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = self.next_id()?;
        let snippet = Snippet::with_details(id, title, language, code, tags, description)
            .inspect_err(|e| error!("Error adding snippet: {}", e.formatted()))?;

        self.root.add_snippet(snippet.clone())?;
        self.issued_max = id;
        self.commit("adding snippet")?;

        info!("Added new snippet: {} (ID {})", snippet.title(), id);
        Ok(snippet)
    }

    /// Appends records under freshly assigned ids. All records are validated first.
    pub fn import(&mut self, records: &[SnippetRecord]) -> Result<Vec<Snippet>> {
        for record in records {
            record.to_snippet()?;
        }
        // the whole batch must fit before anything is appended
        if let Some(extra) = records.len().checked_sub(1) {
            let first = self.next_id()?;
            SnippetId::try_from(extra)
                .ok()
                .and_then(|extra| first.checked_add(extra))
                .ok_or_else(ids_exhausted)?;
        }

        let mut added = Vec::with_capacity(records.len());
        for record in records {
            let id = self.next_id()?;
            let snippet = record.to_snippet_with_id(id)?;
            self.root.add_snippet(snippet.clone())?;
            self.issued_max = id;
            added.push(snippet);
        }
        self.commit("importing snippets")?;

        info!("Imported {} snippets", added.len());
        Ok(added)
    }

    pub fn search(&self, keyword: &str) -> Result<Vec<Snippet>> {
        Ok(self
            .search_detailed(keyword)?
            .into_iter()
            .map(|hit| hit.snippet)
            .collect())
    }

    /// Like [`search`](Self::search), also reporting which field matched.
    pub fn search_detailed(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        let query = search::normalize_query(keyword, "value")?;
        let mut hits = Vec::new();
        self.root.visit(&mut |snippet| {
            if let Some(field) = search::match_keyword(snippet, &query) {
                hits.push(SearchHit {
                    snippet: snippet.clone(),
                    field,
                });
            }
        });
        Ok(hits)
    }

    pub fn search_by_tag(&self, tag: &str) -> Result<Vec<Snippet>> {
        search::normalize_query(tag, "tag")?;
        let mut found = Vec::new();
        self.root.visit(&mut |snippet| {
            if snippet.has_tag(tag) {
                found.push(snippet.clone());
            }
        });
        Ok(found)
    }

    pub fn all_tags(&self) -> BTreeSet<String> {
        let mut tags = BTreeSet::new();
        self.root.visit(&mut |snippet| {
            tags.extend(snippet.tags_ref().iter().cloned());
        });
        tags
    }

    /// Replaces title, language and code. Either all three change or none do.
    pub fn edit(
        &mut self,
        id: SnippetId,
        new_title: &str,
        new_language: &str,
        new_code: &str,
    ) -> Result<()> {
        let snippet = self.snippet_mut(id)?;

        let mut updated = snippet.clone();
        updated.set_title(new_title)?;
        updated.set_language(new_language)?;
        updated.set_code(new_code)?;
        *snippet = updated;

        self.commit("editing snippet")?;
        info!("Edited snippet with ID: {}", id);
        Ok(())
    }

    pub fn add_tag(&mut self, id: SnippetId, tag: &str) -> Result<()> {
        self.snippet_mut(id)?.add_tag(tag);
        self.commit("adding tag")?;
        info!("Added tag '{}' to snippet {}", tag.trim(), id);
        Ok(())
    }

    /// Removes a tag; returns whether the snippet had it.
    pub fn remove_tag(&mut self, id: SnippetId, tag: &str) -> Result<bool> {
        let removed = self.snippet_mut(id)?.remove_tag(tag);
        if removed {
            self.commit("removing tag")?;
            info!("Removed tag '{}' from snippet {}", tag.trim(), id);
        }
        Ok(removed)
    }

    pub fn set_tags<I, S>(&mut self, id: SnippetId, tags: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.snippet_mut(id)?.set_tags(tags);
        self.commit("updating tags")?;
        info!("Replaced tags of snippet {}", id);
        Ok(())
    }

    pub fn set_description(&mut self, id: SnippetId, description: Option<&str>) -> Result<()> {
        self.snippet_mut(id)?.set_description(description);
        self.commit("updating description")?;
        info!("Updated description of snippet {}", id);
        Ok(())
    }

    /// Removes the snippet and returns it.
    pub fn delete(&mut self, id: SnippetId) -> Result<Snippet> {
        let removed = self
            .root
            .take_snippet(id)
            .ok_or_else(|| not_found(id))?;

        self.commit("deleting snippet")?;
        info!("Deleted snippet with ID: {}", id);
        Ok(removed)
    }

    /// Writes the current snapshot to the backend.
    pub fn save(&self) -> Result<()> {
        let records: Vec<SnippetRecord> = self
            .root
            .all_snippets()
            .iter()
            .map(SnippetRecord::from)
            .collect();
        self.persistence.save(&records)
    }

    fn commit(&self, action: &str) -> Result<()> {
        self.save().inspect_err(|e| {
            error!("Error saving after {}: {}", action, e.formatted());
        })
    }

    fn snippet_mut(&mut self, id: SnippetId) -> Result<&mut Snippet> {
        self.root.find_snippet_mut(id).ok_or_else(|| not_found(id))
    }
}

pub(crate) fn not_found(id: SnippetId) -> SnippetError {
    SnippetError::not_found(format!("No snippet found with ID: {}", id))
}

fn ids_exhausted() -> SnippetError {
    SnippetError::persistence("Snippet identifier space exhausted")
}

/// Cloneable handle serializing all access to one store behind a mutex.
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<SnippetStore>>,
}

impl SharedStore {
    pub fn new(store: SnippetStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Runs `f` with exclusive access; id assignment, mutation and save happen as one step.
    pub fn with<R>(&self, f: impl FnOnce(&mut SnippetStore) -> R) -> R {
        f(&mut self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, SnippetStore> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
