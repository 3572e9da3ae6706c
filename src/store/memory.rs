use super::{Datastore, Filter, Record};
use crate::core::error::StoreError;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// In-memory record store using a BTreeMap of key groups behind an RwLock.
///
/// Records are grouped by [`Record::key`]; insertion order is kept within a
/// group. Every read hands out clones so callers cannot reach stored state.
pub struct MemoryStore<T: Record> {
    inner: RwLock<BTreeMap<String, Vec<T>>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        debug!("Initializing {} store", T::KIND);
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }
}

impl<T: Record> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Datastore<T> for MemoryStore<T> {
    fn store(&self, record: T) -> Result<(), StoreError> {
        record.check_integrity()?;

        let mut table = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let group = table.entry(record.key().to_string()).or_default();
        if T::UNIQUE && !group.is_empty() {
            return Err(StoreError::DuplicateKey {
                kind: T::KIND,
                key: record.key().to_string(),
            });
        }
        debug!("{} STORE for key: {}", T::KIND, record.key());
        group.push(record);
        Ok(())
    }

    fn update(&self, record: &T) -> Result<bool, StoreError> {
        T::check_update()?;
        record.check_integrity()?;

        let mut table = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match table.get_mut(record.key()).and_then(|group| group.first_mut()) {
            Some(existing) => {
                existing.apply_update(record)?;
                debug!("{} UPDATE for key: {}", T::KIND, record.key());
                Ok(true)
            }
            None => {
                debug!("{} UPDATE found no match for key: {}", T::KIND, record.key());
                Ok(false)
            }
        }
    }

    fn filter(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        T::check_filter(filter)?;

        let now = Utc::now();
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let matches: Vec<T> = table
            .get(filter.symbol())
            .map(|group| {
                group
                    .iter()
                    .filter(|record| record.matches(filter, now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        debug!("{} FILTER {:?} matched {}", T::KIND, filter, matches.len());
        Ok(matches)
    }

    fn list(&self) -> Vec<T> {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        table.values().flatten().cloned().collect()
    }

    fn count(&self) -> usize {
        let table = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        table.values().map(Vec::len).sum()
    }
}
