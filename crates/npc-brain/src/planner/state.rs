//! Symbolic World State
//!
//! Text-keyed integer counters searched by the GOAP planner. Keys are
//! lower-cased and zero values are dropped, so an absent key reads as 0 and
//! two states compare equal exactly when their non-zero counters match.

use std::collections::BTreeMap;
use std::fmt;

/// Value-compared, value-hashed set of counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GoapState {
    values: BTreeMap<String, i32>,
}

impl GoapState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from `(key, value)` pairs. Later pairs overwrite earlier ones.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, i32)>) -> Self {
        let mut state = Self::new();
        for (key, value) in pairs {
            state.set(key, value);
        }
        state
    }

    pub fn with(mut self, key: &str, value: i32) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> i32 {
        self.values
            .get(&key.to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn set(&mut self, key: &str, value: i32) {
        let key = key.to_ascii_lowercase();
        if value == 0 {
            self.values.remove(&key);
        } else {
            self.values.insert(key, value);
        }
    }

    /// True when every counter in `required` is met or exceeded here.
    pub fn contains(&self, required: &GoapState) -> bool {
        required
            .values
            .iter()
            .all(|(key, &value)| self.values.get(key).copied().unwrap_or(0) >= value)
    }

    /// Returns a copy with each delta added to the matching counter.
    pub fn apply(&self, delta: &GoapState) -> GoapState {
        let mut next = self.clone();
        for (key, &value) in &delta.values {
            let current = next.values.get(key).copied().unwrap_or(0);
            next.set(key, current.saturating_add(value));
        }
        next
    }

    /// Sum of the shortfalls against `target`.
    pub fn deficit_to(&self, target: &GoapState) -> i64 {
        target
            .values
            .iter()
            .map(|(key, &value)| {
                let current = self.values.get(key).copied().unwrap_or(0);
                (i64::from(value) - i64::from(current)).max(0)
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for GoapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_case_insensitive() {
        let state = GoapState::new().with("Wood", 10);
        assert_eq!(state.get("wood"), 10);
        assert_eq!(state.get("WOOD"), 10);
        assert_eq!(state, GoapState::new().with("wOoD", 10));
    }

    #[test]
    fn test_absent_key_equals_zero() {
        let explicit_zero = GoapState::from_pairs([("wood", 5), ("stone", 0)]);
        let absent = GoapState::from_pairs([("wood", 5)]);
        assert_eq!(explicit_zero, absent);

        let mut visited = HashSet::new();
        visited.insert(explicit_zero);
        assert!(visited.contains(&absent));
    }

    #[test]
    fn test_apply_removes_zeroed_keys() {
        let state = GoapState::from_pairs([("wood", 50), ("house", 1)]);
        let build = GoapState::from_pairs([("wood", -50), ("house", 1)]);
        let next = state.apply(&build);

        assert_eq!(next.get("wood"), 0);
        assert_eq!(next.get("house"), 2);
        assert_eq!(next, GoapState::new().with("house", 2));
    }

    #[test]
    fn test_contains() {
        let state = GoapState::from_pairs([("wood", 60), ("stone", 3)]);
        assert!(state.contains(&GoapState::new()));
        assert!(state.contains(&GoapState::new().with("wood", 50)));
        assert!(!state.contains(&GoapState::new().with("wood", 61)));
        assert!(!state.contains(&GoapState::new().with("house", 1)));
        // A non-positive requirement on a missing key is met
        assert!(state.contains(&GoapState::new().with("food", -2)));
    }

    #[test]
    fn test_deficit_to() {
        let state = GoapState::from_pairs([("wood", 20), ("house", 1)]);
        let target = GoapState::from_pairs([("wood", 50), ("house", 2), ("stone", 0)]);
        assert_eq!(state.deficit_to(&target), 31);
        assert_eq!(target.deficit_to(&state), 0);
    }

    #[test]
    fn test_display() {
        let state = GoapState::from_pairs([("wood", 3), ("house", 1)]);
        assert_eq!(state.to_string(), "{house: 1, wood: 3}");
    }
}
