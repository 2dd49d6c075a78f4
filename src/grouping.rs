//! Bucketing flat collections under a parent key.
//!
//! Key order is first-appearance order and member order within a group is
//! input order, kept by pairing a key list with a position index. Grouping
//! is key-agnostic: it never checks whether a key resolves to a real
//! parent; consumers substitute an "Unknown ..." label when a lookup
//! misses.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub struct Groups<K, T> {
    entries: Vec<(K, Vec<T>)>,
    index: HashMap<K, usize>,
}

impl<K, T> Groups<K, T>
where
    K: Eq + Hash + Clone,
{
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&[T]> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Groups in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &[T])> {
        self.entries.iter().map(|(key, members)| (key, members.as_slice()))
    }

    pub fn into_entries(self) -> Vec<(K, Vec<T>)> {
        self.entries
    }

    /// Per-group rollup: folds each member list into a summary, keeping
    /// group order. Groups are never empty, so `fold` always sees at
    /// least one member.
    pub fn summaries<A>(&self, mut fold: impl FnMut(&K, &[T]) -> A) -> Vec<(K, A)> {
        self.entries
            .iter()
            .map(|(key, members)| (key.clone(), fold(key, members)))
            .collect()
    }
}

/// Single pass over the input, appending each member to the list keyed by
/// `key_of`, creating the list on a key's first occurrence.
pub fn group_by<K, T, F>(items: impl IntoIterator<Item = T>, key_of: F) -> Groups<K, T>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut entries: Vec<(K, Vec<T>)> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for item in items {
        let key = key_of(&item);
        match index.get(&key) {
            Some(&pos) => entries[pos].1.push(item),
            None => {
                index.insert(key.clone(), entries.len());
                entries.push((key, vec![item]));
            }
        }
    }

    Groups { entries, index }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Session {
        id: &'static str,
        movie_id: &'static str,
        available: u32,
    }

    fn sessions() -> Vec<Session> {
        vec![
            Session { id: "st1", movie_id: "m1", available: 150 },
            Session { id: "st2", movie_id: "m1", available: 0 },
            Session { id: "st3", movie_id: "m2", available: 175 },
        ]
    }

    #[test]
    fn keys_appear_in_first_occurrence_order() {
        let groups = group_by(sessions(), |s| s.movie_id);
        let keys: Vec<_> = groups.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec!["m1", "m2"]);
        assert_eq!(groups.get(&"m1").unwrap().len(), 2);
        assert_eq!(groups.get(&"m2").unwrap()[0].id, "st3");
    }

    #[test]
    fn grouping_partitions_the_input() {
        let input = sessions();
        let groups = group_by(input.clone(), |s| s.movie_id);

        let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
        assert_eq!(total, input.len());

        // Within-group order is input order; flattening in group order
        // reproduces a permutation of the input.
        let mut seen: Vec<&str> = Vec::new();
        for (_, members) in groups.iter() {
            let mut last_pos = 0;
            for member in members {
                let pos = input.iter().position(|s| s.id == member.id).unwrap();
                assert!(pos >= last_pos);
                last_pos = pos;
                seen.push(member.id);
            }
        }
        seen.sort();
        let mut expected: Vec<&str> = input.iter().map(|s| s.id).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn summaries_roll_up_per_group() {
        let groups = group_by(sessions(), |s| s.movie_id);
        let seats = groups.summaries(|_, members| {
            members.iter().map(|s| s.available).sum::<u32>()
        });
        assert_eq!(seats, vec![("m1", 150), ("m2", 175)]);
    }

    #[test]
    fn unknown_keys_group_without_error() {
        // A dangling foreign key is just another bucket.
        let groups = group_by(
            vec![Session { id: "st9", movie_id: "m_missing", available: 1 }],
            |s| s.movie_id,
        );
        assert_eq!(groups.len(), 1);
        assert!(groups.get(&"m_missing").is_some());
    }
}
