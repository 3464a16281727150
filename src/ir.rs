use std::collections::BTreeMap;

/// Label → occurrence count, keyed and ordered by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    counts: BTreeMap<String, u64>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for `label`, returning the previous count if any.
    pub fn insert(&mut self, label: impl Into<String>, count: u64) -> Option<u64> {
        self.counts.insert(label.into(), count)
    }

    /// Add `count` occurrences of `label`.
    pub fn add(&mut self, label: impl Into<String>, count: u64) {
        let entry = self.counts.entry(label.into()).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.counts.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    pub fn remove(&mut self, label: &str) -> Option<u64> {
        self.counts.remove(label)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Labels sorted by descending count, ties by ascending label.
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }

    /// Keep only the `limit` highest ranked tags.
    pub fn truncate_to_top(&mut self, limit: usize) {
        if self.counts.len() <= limit {
            return;
        }
        let keep: Vec<(String, u64)> = self
            .ranked()
            .into_iter()
            .take(limit)
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        self.counts = keep.into_iter().collect();
    }

    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.counts.values().copied().min()?;
        let max = self.counts.values().copied().max()?;
        Some((min, max))
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (label, count) in iter {
            set.insert(label, count);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = (&'a String, &'a u64);
    type IntoIter = std::collections::btree_map::Iter<'a, String, u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.counts.iter()
    }
}
