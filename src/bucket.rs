use crate::key_value::KeyValue;
use std::{slice, sync::Arc};

/// Entries whose keys share one full hash.
#[derive(Debug, Eq, PartialEq)]
pub struct Bucket<V>(Arc<Vec<KeyValue<V>>>);

impl<V> Clone for Bucket<V> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<V> Bucket<V> {
    pub fn new(key: String, value: V) -> Self {
        Self(Arc::new(vec![KeyValue::new(key, value)]))
    }

    pub fn find(&self, key: &str) -> Option<&V> {
        self.find_index(key).map(|index| self.0[index].value())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, KeyValue<V>> {
        self.0.iter()
    }

    fn find_index(&self, key: &str) -> Option<usize> {
        self.0.iter().position(|key_value| key_value.key() == key)
    }
}

impl<V: Clone> Bucket<V> {
    /// Returns a bucket with the key associated to the value and whether the
    /// key is new.
    pub fn insert(&self, key: String, value: V) -> (Self, bool) {
        let mut key_values = (*self.0).clone();

        match self.find_index(&key) {
            Some(index) => {
                key_values[index] = KeyValue::new(key, value);
                (Self(Arc::new(key_values)), false)
            }
            None => {
                key_values.push(KeyValue::new(key, value));
                (Self(Arc::new(key_values)), true)
            }
        }
    }

    pub fn remove(&self, key: &str) -> Option<Self> {
        self.find_index(key).map(|index| {
            let mut key_values = (*self.0).clone();
            key_values.remove(index);
            Self(Arc::new(key_values))
        })
    }
}
