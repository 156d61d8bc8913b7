//! In-memory organization directory.
//!
//! Stand-in store for the organization handlers. Names are unique; ids are
//! assigned sequentially from 1.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;

/// One organization record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Organization {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct OrganizationPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("organization name {0:?} is already taken")]
    NameTaken(String),

    #[error("organization {0} does not exist")]
    Missing(u64),
}

/// Concurrent organization store keyed by id, with a unique name index.
#[derive(Debug)]
pub struct OrganizationDirectory {
    records: DashMap<u64, Organization>,
    names: DashMap<String, u64>,
    next_id: AtomicU64,
    // Held by every write that touches the name index
    naming: Mutex<()>,
}

impl Default for OrganizationDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl OrganizationDirectory {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            names: DashMap::new(),
            next_id: AtomicU64::new(1),
            naming: Mutex::new(()),
        }
    }

    fn lock_names(&self) -> MutexGuard<'_, ()> {
        self.naming.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self, name: &str, description: &str) -> Result<Organization, DirectoryError> {
        let _naming = self.lock_names();
        match self.names.entry(name.to_string()) {
            Entry::Occupied(_) => Err(DirectoryError::NameTaken(name.to_string())),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let org = Organization {
                    id,
                    name: name.to_string(),
                    description: description.to_string(),
                    is_active: true,
                };
                slot.insert(id);
                self.records.insert(id, org.clone());
                Ok(org)
            }
        }
    }

    pub fn get(&self, id: u64) -> Option<Organization> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    pub fn find_by_name(&self, name: &str) -> Option<Organization> {
        let id = *self.names.get(name)?;
        self.get(id)
    }

    /// All records ordered by id.
    pub fn list(&self) -> Vec<Organization> {
        let mut all: Vec<Organization> = self.records.iter().map(|r| r.value().clone()).collect();
        all.sort_by_key(|o| o.id);
        all
    }

    /// Apply `patch` to one record.
    ///
    /// A rename compares against the name current under the naming lock, so
    /// the index always maps each live name to exactly one record.
    pub fn update(&self, id: u64, patch: OrganizationPatch) -> Result<Organization, DirectoryError> {
        let _naming = patch.name.is_some().then(|| self.lock_names());

        let mut record = self.records.get_mut(&id).ok_or(DirectoryError::Missing(id))?;

        if let Some(new_name) = patch.name {
            if new_name != record.name {
                match self.names.entry(new_name.clone()) {
                    Entry::Occupied(_) => return Err(DirectoryError::NameTaken(new_name)),
                    Entry::Vacant(slot) => {
                        slot.insert(id);
                    }
                }
                let old_name = std::mem::replace(&mut record.name, new_name);
                self.names.remove(&old_name);
            }
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        if let Some(is_active) = patch.is_active {
            record.is_active = is_active;
        }

        Ok(record.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
