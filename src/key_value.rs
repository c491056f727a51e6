#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyValue<V> {
    key: String,
    value: V,
}

impl<V> KeyValue<V> {
    pub fn new(key: String, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}
