use crate::{
    bucket::Bucket,
    hash::{child_index, hash_key, next_digits, CHILD_COUNT},
    key_value::KeyValue,
};
use std::{iter::FusedIterator, slice, sync::Arc};

/// Path-copying tree routed by 3-bit digits of key hashes.
///
/// `Empty` is the canonical empty tree. Every absent child of a node is
/// `Empty`, so descent never needs to handle missing references.
#[derive(Debug)]
pub enum Tree<V> {
    Empty,
    Node(Arc<Node<V>>),
}

impl<V> Clone for Tree<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Node(node) => Self::Node(node.clone()),
        }
    }
}

impl<V> Default for Tree<V> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<V> From<Node<V>> for Tree<V> {
    fn from(node: Node<V>) -> Self {
        Self::Node(node.into())
    }
}

#[derive(Debug)]
pub struct Node<V> {
    // Entries in this bucket and all children.
    count: usize,
    hash: u64,
    bucket: Bucket<V>,
    children: [Tree<V>; CHILD_COUNT],
}

impl<V> Clone for Node<V> {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            hash: self.hash,
            bucket: self.bucket.clone(),
            children: self.children.clone(),
        }
    }
}

impl<V> Node<V> {
    fn leaf(hash: u64, bucket: Bucket<V>) -> Self {
        Self {
            count: bucket.len(),
            hash,
            bucket,
            children: Default::default(),
        }
    }

    fn recount(&mut self) {
        self.count = self.bucket.len() + self.children.iter().map(Tree::count).sum::<usize>();
    }

    fn with_child(&self, index: usize, child: Tree<V>) -> Tree<V> {
        let mut node = self.clone();

        node.children[index] = child;
        node.recount();

        node.into()
    }

    fn with_bucket(&self, bucket: Bucket<V>) -> Tree<V> {
        let mut node = self.clone();

        node.bucket = bucket;
        node.recount();

        node.into()
    }

    // The first child with the most entries, if any child has entries at all.
    fn largest_child(&self) -> Option<usize> {
        let mut largest: Option<(usize, usize)> = None;

        for (index, child) in self.children.iter().enumerate() {
            if child.count() > largest.map_or(0, |(_, count)| count) {
                largest = Some((index, child.count()));
            }
        }

        largest.map(|(index, _)| index)
    }

    /// Replaces this node after its last entry is removed.
    ///
    /// A leaf disappears. Otherwise, the leftmost leaf of the largest child is
    /// detached and its entries take over this position.
    fn without_bucket(&self) -> Tree<V> {
        let Some(index) = self.largest_child() else {
            return Tree::Empty;
        };
        let Tree::Node(donor) = &self.children[index] else {
            unreachable!("non-empty child is not a node")
        };
        let (hash, bucket, rest) = donor.remove_leftmost();

        let mut node = self.clone();

        node.hash = hash;
        node.bucket = bucket;
        node.children[index] = rest;
        node.recount();

        node.into()
    }

    fn remove_leftmost(&self) -> (u64, Bucket<V>, Tree<V>) {
        for (index, child) in self.children.iter().enumerate() {
            if let Tree::Node(child) = child {
                let (hash, bucket, rest) = child.remove_leftmost();

                return (hash, bucket, self.with_child(index, rest));
            }
        }

        (self.hash, self.bucket.clone(), Tree::Empty)
    }
}

impl<V> Tree<V> {
    pub fn new() -> Self {
        Self::Empty
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn count(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Node(node) => node.count,
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Empty, Self::Empty) => true,
            (Self::Node(one), Self::Node(other)) => Arc::ptr_eq(one, other),
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        let hash = hash_key(key);

        self.get_with_hash(key, hash, hash)
    }

    #[cfg(test)]
    fn get_hashed(&self, key: &str, hash: u64) -> Option<&V> {
        self.get_with_hash(key, hash, hash)
    }

    fn get_with_hash(&self, key: &str, remaining: u64, hash: u64) -> Option<&V> {
        match self {
            Self::Empty => None,
            Self::Node(node) => {
                if node.hash == hash {
                    node.bucket.find(key)
                } else {
                    node.children[child_index(remaining)].get_with_hash(
                        key,
                        next_digits(remaining),
                        hash,
                    )
                }
            }
        }
    }
}

impl<V: Clone> Tree<V> {
    /// Returns a tree with the key associated to the value and whether the key
    /// is new.
    #[must_use]
    pub fn insert(&self, key: String, value: V) -> (Self, bool) {
        let hash = hash_key(&key);

        self.insert_with_hash(key, value, hash, hash)
    }

    #[cfg(test)]
    fn insert_hashed(&self, key: &str, value: V, hash: u64) -> Self {
        self.insert_with_hash(key.into(), value, hash, hash).0
    }

    fn insert_with_hash(&self, key: String, value: V, remaining: u64, hash: u64) -> (Self, bool) {
        match self {
            Self::Empty => (Node::leaf(hash, Bucket::new(key, value)).into(), true),
            Self::Node(node) => {
                if node.hash == hash {
                    let (bucket, ok) = node.bucket.insert(key, value);

                    (node.with_bucket(bucket), ok)
                } else {
                    let index = child_index(remaining);
                    let (child, ok) = node.children[index].insert_with_hash(
                        key,
                        value,
                        next_digits(remaining),
                        hash,
                    );

                    (node.with_child(index, child), ok)
                }
            }
        }
    }

    /// Returns a tree without the key, or `None` if the key is absent.
    #[must_use]
    pub fn remove(&self, key: &str) -> Option<Self> {
        let hash = hash_key(key);

        self.remove_with_hash(key, hash, hash)
    }

    #[cfg(test)]
    fn remove_hashed(&self, key: &str, hash: u64) -> Option<Self> {
        self.remove_with_hash(key, hash, hash)
    }

    fn remove_with_hash(&self, key: &str, remaining: u64, hash: u64) -> Option<Self> {
        match self {
            Self::Empty => None,
            Self::Node(node) => {
                if node.hash == hash {
                    let bucket = node.bucket.remove(key)?;

                    Some(if bucket.is_empty() {
                        node.without_bucket()
                    } else {
                        node.with_bucket(bucket)
                    })
                } else {
                    let index = child_index(remaining);
                    let child = node.children[index].remove_with_hash(
                        key,
                        next_digits(remaining),
                        hash,
                    )?;

                    Some(node.with_child(index, child))
                }
            }
        }
    }
}

#[cfg(test)]
impl<V> Tree<V> {
    fn is_normal(&self) -> bool {
        self.is_normal_at(0, 0)
    }

    // Hashes of all nodes under a path share the digits of the path.
    fn is_normal_at(&self, prefix: u64, bits: u32) -> bool {
        match self {
            Self::Empty => true,
            Self::Node(node) => {
                let mask = if bits >= u64::BITS {
                    u64::MAX
                } else {
                    (1 << bits) - 1
                };

                node.hash & mask == prefix
                    && !node.bucket.is_empty()
                    && node.count
                        == node.bucket.len()
                            + node.children.iter().map(Tree::count).sum::<usize>()
                    && node.children.iter().enumerate().all(|(index, child)| {
                        if bits >= u64::BITS {
                            child.is_normal_at(prefix, bits)
                        } else {
                            child.is_normal_at(
                                prefix | ((index as u64) << bits),
                                bits + crate::hash::SHIFT,
                            )
                        }
                    })
            }
        }
    }
}

/// Iterator over entries of a tree in pre-order: entries of a node come
/// before entries of its children.
#[derive(Debug)]
pub struct TreeIterator<'a, V> {
    key_values: slice::Iter<'a, KeyValue<V>>,
    nodes: Vec<&'a Node<V>>,
    remaining: usize,
}

impl<'a, V> IntoIterator for &'a Tree<V> {
    type IntoIter = TreeIterator<'a, V>;
    type Item = (&'a str, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        TreeIterator {
            key_values: Default::default(),
            nodes: match self {
                Tree::Empty => vec![],
                Tree::Node(node) => vec![node.as_ref()],
            },
            remaining: self.count(),
        }
    }
}

impl<V> Clone for TreeIterator<'_, V> {
    fn clone(&self) -> Self {
        Self {
            key_values: self.key_values.clone(),
            nodes: self.nodes.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for TreeIterator<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(key_value) = self.key_values.next() {
                self.remaining -= 1;

                return Some((key_value.key(), key_value.value()));
            }

            let node = self.nodes.pop()?;

            self.key_values = node.bucket.iter();

            for child in node.children.iter().rev() {
                if let Tree::Node(child) = child {
                    self.nodes.push(child);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for TreeIterator<'_, V> {}

impl<V> FusedIterator for TreeIterator<'_, V> {}
