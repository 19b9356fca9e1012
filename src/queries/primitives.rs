//! Group-by and inner-join over borrowed records.

use std::collections::HashMap;
use std::hash::Hash;

/// Records sharing one key. Never empty.
#[derive(Debug)]
pub struct Group<'a, K, T> {
    pub key: K,
    pub members: Vec<&'a T>,
}

impl<'a, K, T> Group<'a, K, T> {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn count_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.members.iter().filter(|m| pred(**m)).count()
    }

    /// Mean of `project` over the members, `None` for an empty group.
    pub fn mean_of(&self, project: impl Fn(&T) -> f64) -> Option<f64> {
        if self.members.is_empty() {
            return None;
        }
        let sum: f64 = self.members.iter().map(|m| project(*m)).sum();
        Some(sum / self.members.len() as f64)
    }
}

/// Partitions `items` by `key_of`.
///
/// Groups come back sorted by key, so a later stable sort on an aggregate
/// breaks ties by key.
pub fn group_by<'a, T, K, I, F>(items: I, key_of: F) -> Vec<Group<'a, K, T>>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash + Ord,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, Vec<&'a T>> = HashMap::new();
    for item in items {
        index.entry(key_of(item)).or_default().push(item);
    }

    let mut groups: Vec<_> = index
        .into_iter()
        .map(|(key, members)| Group { key, members })
        .collect();
    groups.sort_by(|a, b| a.key.cmp(&b.key));
    groups
}

/// Number of items per key.
pub fn count_by<'a, T, K, I, F>(items: I, key_of: F) -> HashMap<K, usize>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    K: Eq + Hash,
    F: Fn(&'a T) -> K,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(key_of(item)).or_insert(0) += 1;
    }
    counts
}

/// Relational inner join on equal keys.
///
/// Output follows `left` order. A left item matching several right items is
/// emitted once per match, in `right` order; unmatched items on either side
/// are dropped.
pub fn inner_join<'l, 'r, L, R, K, IL, IR, FL, FR>(
    left: IL,
    right: IR,
    left_key: FL,
    right_key: FR,
) -> Vec<(&'l L, &'r R)>
where
    L: 'l,
    R: 'r,
    IL: IntoIterator<Item = &'l L>,
    IR: IntoIterator<Item = &'r R>,
    K: Eq + Hash,
    FL: Fn(&'l L) -> K,
    FR: Fn(&'r R) -> K,
{
    let mut index: HashMap<K, Vec<&'r R>> = HashMap::new();
    for r in right {
        index.entry(right_key(r)).or_default().push(r);
    }

    let mut joined = Vec::new();
    for l in left {
        if let Some(matches) = index.get(&left_key(l)) {
            joined.extend(matches.iter().map(|r| (l, *r)));
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_sorted_by_key() {
        let words = ["pear", "apple", "plum", "avocado", "banana"];
        let groups = group_by(&words, |w| w.chars().next().unwrap_or(' '));

        let keys: Vec<char> = groups.iter().map(|g| g.key).collect();
        assert_eq!(keys, vec!['a', 'b', 'p']);
        assert_eq!(groups[2].count(), 2);
        assert_eq!(*groups[2].members[0], "pear");
    }

    #[test]
    fn test_group_mean_and_count_where() {
        let values = [1.0, 2.0, 6.0];
        let groups = group_by(&values, |_| ());
        assert_eq!(groups[0].mean_of(|v| *v), Some(3.0));
        assert_eq!(groups[0].count_where(|v| *v > 1.5), 2);
    }

    #[test]
    fn test_empty_group_has_no_mean() {
        let group: Group<'_, (), f64> = Group {
            key: (),
            members: vec![],
        };
        assert_eq!(group.mean_of(|v| *v), None);
    }

    #[test]
    fn test_group_by_empty_input() {
        let empty: [u32; 0] = [];
        assert!(group_by(&empty, |v| *v).is_empty());
    }

    #[test]
    fn test_count_by() {
        let values = [1, 2, 3, 4, 5];
        let counts = count_by(&values, |v| v % 2 == 0);
        assert_eq!(counts[&true], 2);
        assert_eq!(counts[&false], 3);
    }

    #[test]
    fn test_inner_join_drops_unmatched() {
        let left = [("a", 1), ("b", 2), ("c", 3)];
        let right = [("a", 10), ("c", 30), ("d", 40)];
        let joined = inner_join(&left, &right, |l| l.0, |r| r.0);

        let pairs: Vec<(i32, i32)> = joined.iter().map(|(l, r)| (l.1, r.1)).collect();
        assert_eq!(pairs, vec![(1, 10), (3, 30)]);
    }

    #[test]
    fn test_inner_join_fans_out_on_duplicate_keys() {
        let left = [("a", 1), ("b", 2)];
        let right = [("a", 10), ("a", 11), ("b", 20)];
        let joined = inner_join(&left, &right, |l| l.0, |r| r.0);

        let pairs: Vec<(i32, i32)> = joined.iter().map(|(l, r)| (l.1, r.1)).collect();
        assert_eq!(pairs, vec![(1, 10), (1, 11), (2, 20)]);
    }
}
