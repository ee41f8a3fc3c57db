//! Keyed entity container

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::io::{BufRead, Write};

use crate::codec::{TokenReader, TokenWriter};
use crate::{Error, Result};

use super::{Entity, ExportCx, ImportCx};

/// Value carrying its own unique key.
pub trait Keyed {
    /// Key type; total order fixes the canonical stream order.
    type Key: Ord + Clone + Display + Debug;

    /// The value's key.
    fn key(&self) -> &Self::Key;
}

/// Container of uniquely keyed values, iterated in ascending key order.
///
/// Lookup comes in a shared flavor ([`get`](Self::get)) and an exclusive one
/// ([`get_mut`](Self::get_mut)); mutation of a located value always goes
/// through the latter.
#[derive(Debug, Clone)]
pub struct KeyedMap<V: Keyed> {
    entries: BTreeMap<V::Key, V>,
}

impl<V: Keyed> Default for KeyedMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: Keyed> KeyedMap<V> {
    /// Empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the container holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a value with this key is present.
    #[must_use]
    pub fn contains(&self, key: &V::Key) -> bool {
        self.entries.contains_key(key)
    }

    /// Values in ascending key order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    /// Insert a value under its own key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] if the key is already present; the
    /// container is unchanged in that case.
    pub fn add(&mut self, value: V) -> Result<&V> {
        let key = value.key().clone();
        match self.entries.entry(key) {
            Entry::Occupied(slot) => Err(Error::KeyConflict(format!("{}", slot.key()))),
            Entry::Vacant(slot) => Ok(slot.insert(value)),
        }
    }

    /// Shared lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn get(&self, key: &V::Key) -> Result<&V> {
        self.entries
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(format!("{key}")))
    }

    /// Exclusive lookup for in-place mutation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn get_mut(&mut self, key: &V::Key) -> Result<&mut V> {
        self.entries
            .get_mut(key)
            .ok_or_else(|| Error::KeyNotFound(format!("{key}")))
    }

    /// Remove and return the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn remove(&mut self, key: &V::Key) -> Result<V> {
        self.entries
            .remove(key)
            .ok_or_else(|| Error::KeyNotFound(format!("{key}")))
    }

    /// Fold every value of `other` into this container.
    ///
    /// All-or-nothing: every incoming key is checked before anything is
    /// inserted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyConflict`] naming the first colliding key.
    pub fn merge_from(&mut self, other: Self) -> Result<()> {
        if let Some(dup) = other.entries.keys().find(|key| self.entries.contains_key(key)) {
            return Err(Error::KeyConflict(format!("{dup}")));
        }
        self.entries.extend(other.entries);
        Ok(())
    }
}

impl<V: Keyed + Entity> KeyedMap<V> {
    /// Write the element count, then every value with its identity fields,
    /// in ascending key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on write failure and propagates entity export
    /// errors.
    pub fn export_full<W: Write>(&self, w: &mut TokenWriter<W>, cx: &ExportCx<'_>) -> Result<()> {
        w.token(self.len())?;
        w.end_line()?;
        for value in self.values() {
            value.export_full(w, cx, true)?;
            w.end_line()?;
        }
        Ok(())
    }

    /// Read the element count, then reconstruct every value as a brand-new
    /// object, inserting through [`add`](Self::add).
    ///
    /// # Errors
    ///
    /// Propagates entity import errors; duplicate keys inside one serialized
    /// blob surface as [`Error::KeyConflict`].
    pub fn import_full<R: BufRead>(r: &mut TokenReader<R>, cx: &ImportCx<'_>) -> Result<Self> {
        let count = r.next_count("entry count")?;
        let mut map = Self::new();
        for _ in 0..count {
            map.add(V::import_new(r, cx)?)?;
        }
        Ok(map)
    }
}
