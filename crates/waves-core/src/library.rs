use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::PlayerError;
use crate::media::{MediaEntry, MediaId};

/// Ordered playlist of media entries.
///
/// Insertion order is playback order. Ids are unique at all times.
#[derive(Debug)]
pub struct Library<S> {
    entries: Vec<MediaEntry<S>>,
    rng: StdRng,
}

impl<S> Default for Library<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Library<S> {
    /// Create an empty library with an OS-seeded id generator.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create an empty library with a deterministic id generator.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            entries: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw an id not used by any current entry.
    pub fn new_id(&mut self) -> MediaId {
        loop {
            let id = MediaId::random(&mut self.rng);
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Append entries in the given order. Returns how many were added.
    ///
    /// An entry whose id is already taken gets a fresh id.
    pub fn add(&mut self, entries: impl IntoIterator<Item = MediaEntry<S>>) -> usize {
        let before = self.entries.len();
        for mut entry in entries {
            if self.position(&entry.id).is_some() {
                let fresh = self.new_id();
                tracing::debug!(old = %entry.id, new = %fresh, "Replacing duplicate entry id");
                entry.id = fresh;
            }
            self.entries.push(entry);
        }
        self.entries.len() - before
    }

    /// Remove an entry by id, returning its former index and the entry.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::UnknownEntry`] if no entry has this id.
    pub fn remove(&mut self, id: &MediaId) -> Result<(usize, MediaEntry<S>), PlayerError> {
        let index = self
            .position(id)
            .ok_or_else(|| PlayerError::UnknownEntry(id.clone()))?;
        Ok((index, self.entries.remove(index)))
    }

    /// Remove every entry.
    pub fn clear(&mut self) -> Vec<MediaEntry<S>> {
        std::mem::take(&mut self.entries)
    }

    pub fn get(&self, index: usize) -> Option<&MediaEntry<S>> {
        self.entries.get(index)
    }

    pub fn position(&self, id: &MediaId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MediaEntry<S>> {
        self.entries.iter()
    }
}

impl<'a, S> IntoIterator for &'a Library<S> {
    type Item = &'a MediaEntry<S>;
    type IntoIter = std::slice::Iter<'a, MediaEntry<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
