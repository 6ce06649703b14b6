use std::collections::HashSet;

/// The set of instance names known to the registry for this run.
///
/// Built once from the registry listing and never mutated afterwards;
/// workers share it behind an `Arc`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstanceSet {
    names: HashSet<String>,
}

impl InstanceSet {
    /// Builds the set from any sequence of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `name` is a known instance.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Keeps the items whose extracted key is a known instance name.
    ///
    /// Relative order of the kept items is unchanged.
    pub fn filter<A, F, I>(&self, key: F, items: I) -> Vec<A>
    where
        I: IntoIterator<Item = A>,
        F: Fn(&A) -> &str,
    {
        items
            .into_iter()
            .filter(|item| self.contains(key(item)))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for InstanceSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_names(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_known_in_order() {
        let set = InstanceSet::from_names(["a", "c", "e"]);
        let items = vec!["e", "b", "a", "d", "c", "a"];

        let kept = set.filter(|s: &&str| *s, items);

        assert_eq!(kept, vec!["e", "a", "c", "a"]);
    }

    #[test]
    fn test_filter_empty_set_drops_everything() {
        let set = InstanceSet::default();
        let kept = set.filter(|s: &String| s.as_str(), vec!["a".to_string()]);

        assert!(kept.is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn test_collect_into_set() {
        let set: InstanceSet = vec!["x.example", "y.example", "x.example"]
            .into_iter()
            .collect();

        assert_eq!(set.len(), 2);
        assert!(set.contains("y.example"));
        assert!(!set.contains("z.example"));
    }
}
