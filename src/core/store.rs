use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::core::error::InteractionError;
use crate::models::{CandidateMatch, ListId};

#[derive(Debug, Default)]
struct TrackedList {
    records: Vec<CandidateMatch>,
    /// Position of each id in the last loaded sequence
    ranks: HashMap<String, usize>,
    generation: u64,
    loaded: bool,
    last_error: Option<InteractionError>,
}

impl TrackedList {
    fn rank_of(&self, id: &str) -> usize {
        self.ranks.get(id).copied().unwrap_or(usize::MAX)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

/// A record taken out of one list, with what is needed to put it back
#[derive(Debug, Clone)]
pub struct RemovedEntry {
    pub list: ListId,
    pub position: usize,
    rank: usize,
    generation: u64,
    pub record: CandidateMatch,
}

/// Everything `remove_from_all` took out for one id
#[derive(Debug, Clone)]
pub struct RemovalSnapshot {
    pub target_id: String,
    pub removed: Vec<RemovedEntry>,
}

impl RemovalSnapshot {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn lists(&self) -> Vec<ListId> {
        self.removed.iter().map(|e| e.list).collect()
    }
}

/// In-memory candidate lists keyed by list id
///
/// Each list keeps set semantics by id and preserves server order. Records
/// only stay a subsequence of the last load, which is what lets a rollback
/// put an entry back exactly where it was.
#[derive(Debug, Default)]
pub struct CandidateListStore {
    lists: HashMap<ListId, TrackedList>,
}

impl CandidateListStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, list: ListId) -> Option<&TrackedList> {
        self.lists.get(&list)
    }

    fn list_mut(&mut self, list: ListId) -> &mut TrackedList {
        self.lists.entry(list).or_default()
    }

    /// Replaces the whole list, keeping the first occurrence of any repeated id
    pub fn load(&mut self, list: ListId, records: Vec<CandidateMatch>) -> usize {
        let total = records.len();
        let mut seen = HashSet::with_capacity(total);
        let records: Vec<CandidateMatch> = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();

        if records.len() < total {
            tracing::debug!(
                "Dropped {} duplicate ids while loading {} list",
                total - records.len(),
                list
            );
        }

        let tracked = self.list_mut(list);
        tracked.ranks = records
            .iter()
            .enumerate()
            .map(|(rank, r)| (r.id.clone(), rank))
            .collect();
        tracked.records = records;
        tracked.generation += 1;
        tracked.loaded = true;
        tracked.last_error = None;

        tracing::debug!(
            "Loaded {} records into {} list (generation {})",
            tracked.records.len(),
            list,
            tracked.generation
        );
        tracked.records.len()
    }

    pub fn records(&self, list: ListId) -> &[CandidateMatch] {
        self.list(list).map(|l| l.records.as_slice()).unwrap_or(&[])
    }

    pub fn ids(&self, list: ListId) -> Vec<String> {
        self.records(list).iter().map(|r| r.id.clone()).collect()
    }

    pub fn get(&self, list: ListId, id: &str) -> Option<&CandidateMatch> {
        self.records(list).iter().find(|r| r.id == id)
    }

    pub fn contains(&self, list: ListId, id: &str) -> bool {
        self.get(list, id).is_some()
    }

    pub fn contains_anywhere(&self, id: &str) -> bool {
        ListId::ALL.iter().any(|list| self.contains(*list, id))
    }

    pub fn len(&self, list: ListId) -> usize {
        self.records(list).len()
    }

    pub fn is_empty(&self, list: ListId) -> bool {
        self.len(list) == 0
    }

    pub fn is_loaded(&self, list: ListId) -> bool {
        self.list(list).map(|l| l.loaded).unwrap_or(false)
    }

    pub fn generation(&self, list: ListId) -> u64 {
        self.list(list).map(|l| l.generation).unwrap_or(0)
    }

    /// Removes `id` from one list; absent ids are a no-op
    pub fn remove(&mut self, list: ListId, id: &str) -> Option<CandidateMatch> {
        self.take(list, id).map(|entry| entry.record)
    }

    fn take(&mut self, list: ListId, id: &str) -> Option<RemovedEntry> {
        let tracked = self.lists.get_mut(&list)?;
        let position = tracked.position(id)?;
        let record = tracked.records.remove(position);

        tracing::debug!("Removed {} from {} list at position {}", id, list, position);

        Some(RemovedEntry {
            list,
            position,
            rank: tracked.rank_of(id),
            generation: tracked.generation,
            record,
        })
    }

    /// Removes `id` from every list and returns what was taken
    pub fn remove_from_all(&mut self, id: &str) -> RemovalSnapshot {
        let removed = ListId::ALL
            .iter()
            .filter_map(|list| self.take(*list, id))
            .collect();

        RemovalSnapshot {
            target_id: id.to_string(),
            removed,
        }
    }

    /// Puts back what a snapshot took out, returning how many lists changed
    ///
    /// An entry is skipped when its list was reloaded since the removal (the
    /// newer fetch is authoritative) or when the id is already present again.
    pub fn restore(&mut self, snapshot: RemovalSnapshot) -> usize {
        let mut restored = 0;

        for entry in snapshot.removed {
            let tracked = self.list_mut(entry.list);

            if tracked.generation != entry.generation {
                tracing::debug!(
                    "Skipping restore of {} into {} list: reloaded since removal",
                    entry.record.id,
                    entry.list
                );
                continue;
            }
            if tracked.position(&entry.record.id).is_some() {
                continue;
            }

            let ranks = &tracked.ranks;
            let index = tracked
                .records
                .partition_point(|r| ranks.get(&r.id).copied().unwrap_or(usize::MAX) < entry.rank);
            tracing::debug!(
                "Restored {} into {} list at position {}",
                entry.record.id,
                entry.list,
                index
            );
            tracked.records.insert(index, entry.record);
            restored += 1;
        }

        restored
    }

    /// Notes a failed fetch without touching the current contents
    pub fn record_failure(&mut self, list: ListId, error: InteractionError) {
        self.list_mut(list).last_error = Some(error);
    }

    pub fn last_error(&self, list: ListId) -> Option<&InteractionError> {
        self.list(list).and_then(|l| l.last_error.as_ref())
    }
}

/// The store shared by every component of one controller
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<CandidateListStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self) -> MutexGuard<'_, CandidateListStore> {
        self.inner.lock().await
    }

    /// Owned copy of a list for rendering
    pub async fn snapshot(&self, list: ListId) -> Vec<CandidateMatch> {
        self.inner.lock().await.records(list).to_vec()
    }

    pub async fn ids(&self, list: ListId) -> Vec<String> {
        self.inner.lock().await.ids(list)
    }
}
