//! Name-keyed registries for materials and spectra.
//!
//! Lookups always go through a registry passed explicitly to whoever needs
//! them; there is no process-wide "current material" or managed pool.

use std::collections::BTreeMap;

use crate::error::{ExportError, Result};

/// An object that can be stored in a [`Registry`].
pub trait Named {
    /// Returns the unique name of this object.
    fn name(&self) -> &str;

    /// The error reported when registering a duplicate name.
    fn exists_error(name: String) -> ExportError;

    /// The error reported when looking up a missing name.
    fn not_found_error(name: String) -> ExportError;
}

/// Registry of named objects, iterated in name order.
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: BTreeMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Named> Registry<T> {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object.
    ///
    /// Returns an error if an object with the same name already exists.
    pub fn register(&mut self, item: T) -> Result<()> {
        let name = item.name().to_string();
        if self.entries.contains_key(&name) {
            return Err(T::exists_error(name));
        }
        self.entries.insert(name, item);
        Ok(())
    }

    /// Registers an object, replacing any existing one with the same name.
    pub fn upsert(&mut self, item: T) {
        self.entries.insert(item.name().to_string(), item);
    }

    /// Gets an object by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Gets an object by name, failing with the type's not-found error.
    pub fn require(&self, name: &str) -> Result<&T> {
        self.entries
            .get(name)
            .ok_or_else(|| T::not_found_error(name.to_string()))
    }

    /// Gets a mutable reference to an object by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(name)
    }

    /// Checks if an object with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Removes an object by name.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.entries.remove(name)
    }

    /// Returns the registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns an iterator over all objects.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Returns the number of registered objects.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
