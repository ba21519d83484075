use serde::ser::{Serialize, SerializeMap, Serializer};

/// Read-only, ordered projection over the parser's aggregates.
///
/// Views borrow from the parser and are recomputed on every call, so they
/// always reflect all documents parsed so far.
#[derive(Debug, Clone)]
pub struct View<'a, T> {
    entries: Vec<(&'a str, &'a T)>,
}

impl<'a, T> View<'a, T> {
    pub(crate) fn new(entries: Vec<(&'a str, &'a T)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&'a T> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a T)> {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> Serialize for View<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
