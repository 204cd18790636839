//! Key-value store abstraction

use crate::error::{NotesError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// Minimal capability set the note repository needs from a backing store.
///
/// Single-key reads and writes are expected to be atomic; nothing else is.
pub trait KeyValueStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Remove a key of any kind. Missing keys are not an error.
    fn delete(&self, key: &str) -> Result<()>;

    fn add_to_set(&self, key: &str, member: &str) -> Result<()>;

    fn remove_from_set(&self, key: &str, member: &str) -> Result<()>;

    /// Members of a set key; a missing key is an empty set
    fn members_of(&self, key: &str) -> Result<BTreeSet<String>>;

    /// Read several string keys, one slot per key in input order
    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        keys.iter().map(|key| self.get(key)).collect()
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn add_to_set(&self, key: &str, member: &str) -> Result<()> {
        (**self).add_to_set(key, member)
    }

    fn remove_from_set(&self, key: &str, member: &str) -> Result<()> {
        (**self).remove_from_set(key, member)
    }

    fn members_of(&self, key: &str) -> Result<BTreeSet<String>> {
        (**self).members_of(key)
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).multi_get(keys)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn add_to_set(&self, key: &str, member: &str) -> Result<()> {
        (**self).add_to_set(key, member)
    }

    fn remove_from_set(&self, key: &str, member: &str) -> Result<()> {
        (**self).remove_from_set(key, member)
    }

    fn members_of(&self, key: &str) -> Result<BTreeSet<String>> {
        (**self).members_of(key)
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        (**self).multi_get(keys)
    }
}

/// A single value in a [`Keyspace`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Entry {
    String(String),
    Set(BTreeSet<String>),
}

/// In-memory keyspace with Redis-like typing rules.
///
/// String commands on a set key (and the reverse) fail with
/// [`NotesError::WrongType`]. A set that loses its last member is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyspace {
    entries: BTreeMap<String, Entry>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        // SET overwrites whatever was there, sets included
        self.entries
            .insert(key.to_string(), Entry::String(value.to_string()));
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(Entry::String(value)) => Ok(Some(value.clone())),
            Some(Entry::Set(_)) => Err(NotesError::WrongType(key.to_string())),
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn add_to_set(&mut self, key: &str, member: &str) -> Result<()> {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()));

        match entry {
            Entry::Set(members) => {
                members.insert(member.to_string());
                Ok(())
            }
            Entry::String(_) => Err(NotesError::WrongType(key.to_string())),
        }
    }

    pub fn remove_from_set(&mut self, key: &str, member: &str) -> Result<()> {
        let now_empty = match self.entries.get_mut(key) {
            None => return Ok(()),
            Some(Entry::Set(members)) => {
                members.remove(member);
                members.is_empty()
            }
            Some(Entry::String(_)) => return Err(NotesError::WrongType(key.to_string())),
        };

        if now_empty {
            self.entries.remove(key);
        }
        Ok(())
    }

    pub fn members_of(&self, key: &str) -> Result<BTreeSet<String>> {
        match self.entries.get(key) {
            None => Ok(BTreeSet::new()),
            Some(Entry::Set(members)) => Ok(members.clone()),
            Some(Entry::String(_)) => Err(NotesError::WrongType(key.to_string())),
        }
    }
}

/// Process-local store, shared between threads through a mutex
#[derive(Debug, Default)]
pub struct MemoryStore {
    keyspace: Mutex<Keyspace>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current keyspace
    pub fn snapshot(&self) -> Result<Keyspace> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Keyspace>> {
        self.keyspace
            .lock()
            .map_err(|_| NotesError::StoreUnavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.set(key, value);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.lock()?.get(key)
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.delete(key);
        Ok(())
    }

    fn add_to_set(&self, key: &str, member: &str) -> Result<()> {
        self.lock()?.add_to_set(key, member)
    }

    fn remove_from_set(&self, key: &str, member: &str) -> Result<()> {
        self.lock()?.remove_from_set(key, member)
    }

    fn members_of(&self, key: &str) -> Result<BTreeSet<String>> {
        self.lock()?.members_of(key)
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        let keyspace = self.lock()?;
        keys.iter().map(|key| keyspace.get(key)).collect()
    }
}
