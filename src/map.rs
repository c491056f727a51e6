use crate::tree::{Tree, TreeIterator};
use std::fmt;

/// Persistent map from string keys to values.
///
/// Note that every method does not modify the original map but creates a new
/// one if necessary. Versions share every sub-tree not on the path of a
/// change, so cloning a map or deriving a new version from it is cheap.
///
/// Keys are routed by their 64-bit FNV-1a hashes. Keys with colliding hashes
/// are kept side by side in a single node and compared by value.
pub struct Map<V> {
    tree: Tree<V>,
}

impl<V> Map<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self { tree: Tree::new() }
    }

    /// Returns true if a map is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns a number of entries in a map.
    pub fn len(&self) -> usize {
        self.tree.count()
    }

    /// Finds a value associated with a key.
    pub fn lookup(&self, key: &str) -> Option<&V> {
        self.tree.get(key)
    }

    /// Checks if a key is contained in a map.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Returns true if two maps are the same version or share a root.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.tree.ptr_eq(&other.tree)
    }

    /// Calls a function with every entry in a map.
    ///
    /// The order of entries is unspecified but stable for a map.
    pub fn for_each(&self, mut visit: impl FnMut(&str, &V)) {
        for (key, value) in self {
            visit(key, value);
        }
    }

    /// Returns entries in a map.
    pub fn iter(&self) -> TreeIterator<'_, V> {
        self.into_iter()
    }

    /// Returns keys in a map in iteration order.
    pub fn keys(&self) -> Keys<'_, V> {
        Keys(self.iter())
    }

    /// Returns values in a map in iteration order.
    pub fn values(&self) -> Values<'_, V> {
        Values(self.iter())
    }
}

impl<V: Clone> Map<V> {
    /// Associates a value with a key.
    ///
    /// The key is created if it does not exist. Otherwise, its value is
    /// replaced.
    #[must_use]
    pub fn set(&self, key: impl Into<String>, value: V) -> Self {
        Self {
            tree: self.tree.insert(key.into(), value).0,
        }
    }

    /// Removes a key from a map if any.
    ///
    /// Removing an absent key returns the same version without copying.
    #[must_use]
    pub fn delete(&self, key: &str) -> Self {
        self.tree
            .remove(key)
            .map(|tree| Self { tree })
            .unwrap_or_else(|| self.clone())
    }

    /// Extends a map with an iterator of entries.
    #[must_use]
    pub fn extend<K: Into<String>>(&self, iterator: impl IntoIterator<Item = (K, V)>) -> Self {
        let mut map = self.clone();

        for (key, value) in iterator {
            map = map.set(key, value);
        }

        map
    }
}

impl<V> Clone for Map<V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<V> Default for Map<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for Map<V> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.len() == other.len()
                && self
                    .iter()
                    .all(|(key, value)| other.lookup(key) == Some(value)))
    }
}

impl<V: Eq> Eq for Map<V> {}

impl<V: fmt::Debug> fmt::Debug for Map<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<V: fmt::Display> fmt::Display for Map<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;

        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }

            write!(formatter, "{key}: {value}")?;
        }

        write!(formatter, "}}")
    }
}

impl<K: Into<String>, V: Clone> FromIterator<(K, V)> for Map<V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iterator: T) -> Self {
        Self::new().extend(iterator)
    }
}

impl<'a, V> IntoIterator for &'a Map<V> {
    type IntoIter = TreeIterator<'a, V>;
    type Item = (&'a str, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        (&self.tree).into_iter()
    }
}

/// Iterator over keys of a map.
#[derive(Debug)]
pub struct Keys<'a, V>(TreeIterator<'a, V>);

impl<V> Clone for Keys<'_, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<V> ExactSizeIterator for Keys<'_, V> {}

/// Iterator over values of a map.
#[derive(Debug)]
pub struct Values<'a, V>(TreeIterator<'a, V>);

impl<V> Clone for Values<'_, V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<V> ExactSizeIterator for Values<'_, V> {}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for Map<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.len()))?;

        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }

        map.end()
    }
}

#[cfg(feature = "serde")]
struct MapVisitor<V>(std::marker::PhantomData<V>);

#[cfg(feature = "serde")]
impl<'de, V> serde::de::Visitor<'de> for MapVisitor<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    type Value = Map<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = Map::new();

        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map = map.set(key, value);
        }

        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for Map<V>
where
    V: serde::Deserialize<'de> + Clone,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(MapVisitor(std::marker::PhantomData))
    }
}
