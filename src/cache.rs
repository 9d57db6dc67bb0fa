use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub(crate) struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub(crate) fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let (stored_at, value) = self.entries.get(key)?;
        if now.saturating_duration_since(*stored_at) < self.ttl {
            return Some(value.clone());
        }
        self.entries.remove(key);
        None
    }

    pub(crate) fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (now, value));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
