//! # State Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides the [`WorldState`] property map and the [`Value`] type
//! stored in it. World states describe the current snapshot of an agent, the
//! goal it wants to reach, and the preconditions and effects of its actions.
//!
//! ## Absent versus false
//!
//! A key missing from a `WorldState` means "unconstrained". It is never the same
//! as a key mapped to `false` or `0`: a required key that is absent is not
//! satisfied.
//!
//! ## Basic Usage
//!
//! ```
//! use regoap::WorldState;
//!
//! let current = WorldState::new()
//!     .with("has_weapon", "sword")
//!     .with("at_destination", false);
//!
//! let goal = WorldState::new().with("at_destination", true);
//! assert!(!current.satisfies(&goal));
//!
//! // Only the unmet part of the goal remains
//! let residual = goal.subtract_satisfied(&current);
//! assert_eq!(residual.len(), 1);
//!
//! let moved = current.merge(&WorldState::new().with("at_destination", true));
//! assert!(moved.satisfies(&goal));
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A single concrete value held by a [`WorldState`] slot.
///
/// The planner only ever compares values for equality. Values of different
/// variants are never equal, so `Int(1)` does not match `Float(1.0)`.
///
/// Floats compare by bit pattern, which keeps `Eq` and `Hash` consistent.
///
/// # Examples
///
/// ```
/// use regoap::Value;
///
/// assert_eq!(Value::from(true), Value::Bool(true));
/// assert_eq!(Value::from("open"), Value::Str("open".to_string()));
/// assert_ne!(Value::from(1), Value::from(1.0));
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

/// Represents the state of the world in the GOAP system.
///
/// A `WorldState` is a set of unique keys, each mapped to a [`Value`]. It serves
/// as the current world snapshot, the goal, and the precondition and effect
/// fragments of actions.
///
/// Entries are kept in key order, so iteration, display and hashing are
/// deterministic regardless of the order in which keys were inserted.
///
/// # Examples
///
/// ```
/// use regoap::{Value, WorldState};
///
/// let mut state = WorldState::new();
/// state.set("player_has_key", "golden_key");
/// state.set("door_is_open", false);
///
/// assert_eq!(state.get("player_has_key"), Some(&Value::from("golden_key")));
/// assert_eq!(state.get("door_is_open"), Some(&Value::Bool(false)));
/// assert_eq!(state.get("non_existent_variable"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct WorldState {
    values: BTreeMap<String, Value>,
}

impl WorldState {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Sets a state value for the specified key, replacing any previous value.
    ///
    /// # Examples
    ///
    /// ```
    /// use regoap::{Value, WorldState};
    ///
    /// let mut state = WorldState::new();
    /// state.set("has_ammo", 30);
    /// state.set("has_ammo", 25);
    ///
    /// assert_eq!(state.get("has_ammo"), Some(&Value::Int(25)));
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`WorldState::set`].
    ///
    /// # Examples
    ///
    /// ```
    /// use regoap::WorldState;
    ///
    /// let goal = WorldState::new().with("enemy_dead", true).with("ammo", 0);
    /// assert_eq!(goal.len(), 2);
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Removes a key, returning its previous value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// Gets the value for a key, or `None` if the key is unconstrained.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether `key` is constrained.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of keys in the state.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no key is constrained. An empty goal is satisfied by every state.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.values.iter()
    }

    /// Checks if this state satisfies another state's requirements.
    ///
    /// A state satisfies another if for every key in `other`, this state maps the
    /// same key to an equal value. Keys absent from `self` never satisfy a key
    /// required by `other`. Extra keys in `self` are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use regoap::WorldState;
    ///
    /// let world = WorldState::new()
    ///     .with("has_key", true)
    ///     .with("door_open", false);
    ///
    /// assert!(world.satisfies(&WorldState::new().with("has_key", true)));
    /// assert!(!world.satisfies(&WorldState::new().with("door_open", true)));
    /// assert!(!world.satisfies(&WorldState::new().with("has_map", false)));
    /// assert!(world.satisfies(&WorldState::new()));
    /// ```
    pub fn satisfies(&self, other: &WorldState) -> bool {
        other
            .values
            .iter()
            .all(|(key, value)| self.values.get(key) == Some(value))
    }

    /// Returns a new state equal to `self` with every entry of `other` added or
    /// overwritten (right-biased union).
    ///
    /// # Examples
    ///
    /// ```
    /// use regoap::{Value, WorldState};
    ///
    /// let base = WorldState::new().with("x", false).with("y", 1);
    /// let merged = base.merge(&WorldState::new().with("x", true).with("z", "new"));
    ///
    /// assert_eq!(merged.get("x"), Some(&Value::Bool(true)));
    /// assert_eq!(merged.get("y"), Some(&Value::Int(1)));
    /// assert_eq!(merged.get("z"), Some(&Value::from("new")));
    /// // `base` is untouched
    /// assert_eq!(base.get("x"), Some(&Value::Bool(false)));
    /// ```
    pub fn merge(&self, other: &WorldState) -> WorldState {
        let mut merged = self.clone();
        merged.apply_effects(other);
        merged
    }

    /// Returns the entries of `self` that are not already held, with an equal
    /// value, by `by`.
    ///
    /// # Examples
    ///
    /// ```
    /// use regoap::WorldState;
    ///
    /// let goal = WorldState::new().with("a", true).with("b", true).with("c", 3);
    /// let current = WorldState::new().with("a", true).with("b", false);
    ///
    /// let residual = goal.subtract_satisfied(&current);
    /// assert!(!residual.contains_key("a"));
    /// assert!(residual.contains_key("b"));
    /// assert!(residual.contains_key("c"));
    /// ```
    pub fn subtract_satisfied(&self, by: &WorldState) -> WorldState {
        self.values
            .iter()
            .filter(|(key, value)| by.values.get(key.as_str()) != Some(*value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns true if some key present in both states maps to different values.
    pub fn conflicts_with(&self, other: &WorldState) -> bool {
        self.values
            .iter()
            .any(|(key, value)| matches!(other.values.get(key), Some(v) if v != value))
    }

    /// Applies the effects of another state to this state in place.
    pub fn apply_effects(&mut self, effects: &WorldState) {
        for (key, value) in effects.values.iter() {
            self.values.insert(key.clone(), value.clone());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for WorldState
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a WorldState {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in &self.values {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
            first = false;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_state_is_empty() {
        let state = WorldState::new();
        assert!(state.is_empty());
        assert_eq!(state.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut state = WorldState::new();
        state.set("foo", true);
        assert_eq!(state.get("foo"), Some(&Value::Bool(true)));
        state.set("foo", false);
        assert_eq!(state.get("foo"), Some(&Value::Bool(false)));
        assert_eq!(state.get("bar"), None);
    }

    #[test]
    fn test_remove() {
        let mut state = WorldState::new().with("foo", 1);
        assert_eq!(state.remove("foo"), Some(Value::Int(1)));
        assert_eq!(state.remove("foo"), None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_satisfies() {
        let state = WorldState::new().with("a", true).with("b", false);

        let mut required = WorldState::new();
        assert!(state.satisfies(&required));
        required.set("a", true);
        assert!(state.satisfies(&required));
        required.set("b", false);
        assert!(state.satisfies(&required));
        required.set("b", true);
        assert!(!state.satisfies(&required));
    }

    #[test]
    fn test_absent_key_is_not_false() {
        let state = WorldState::new();
        let required = WorldState::new().with("flag", false);
        assert!(!state.satisfies(&required));
    }

    #[test]
    fn test_values_of_different_kinds_never_match() {
        let state = WorldState::new().with("n", 1);
        assert!(!state.satisfies(&WorldState::new().with("n", 1.0)));
        assert!(!state.satisfies(&WorldState::new().with("n", "1")));
        assert!(state.satisfies(&WorldState::new().with("n", 1i64)));
    }

    #[test]
    fn test_merge_is_right_biased_and_pure() {
        let base = WorldState::new().with("x", false).with("y", false);
        let changes = WorldState::new().with("x", true).with("z", true);

        let merged = base.merge(&changes);
        assert_eq!(merged.get("x"), Some(&Value::Bool(true)));
        assert_eq!(merged.get("y"), Some(&Value::Bool(false)));
        assert_eq!(merged.get("z"), Some(&Value::Bool(true)));
        assert_eq!(base.get("x"), Some(&Value::Bool(false)));
        assert!(!base.contains_key("z"));
    }

    #[test]
    fn test_subtract_satisfied() {
        let goal = WorldState::new()
            .with("same", "v")
            .with("different", 2)
            .with("missing", true);
        let by = WorldState::new().with("same", "v").with("different", 3);

        let residual = goal.subtract_satisfied(&by);
        assert_eq!(residual.len(), 2);
        assert!(residual.get("same").is_none());
        assert_eq!(residual.get("different"), Some(&Value::Int(2)));
        assert_eq!(residual.get("missing"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_conflicts_with() {
        let a = WorldState::new().with("k", true).with("only_a", 1);
        assert!(!a.conflicts_with(&WorldState::new().with("k", true)));
        assert!(!a.conflicts_with(&WorldState::new().with("other", false)));
        assert!(a.conflicts_with(&WorldState::new().with("k", false)));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a = WorldState::new().with("a", 1).with("b", 2);
        let b = WorldState::new().with("b", 2).with("a", 1);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_float_nan_is_hashable_and_equal_to_itself() {
        let a = WorldState::new().with("x", f64::NAN);
        let b = WorldState::new().with("x", f64::NAN);
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_in_key_order() {
        let state = WorldState::new().with("b", 2).with("a", true).with("c", "x");
        assert_eq!(state.to_string(), "{a: true, b: 2, c: x}");
    }

    #[test]
    fn test_from_iterator() {
        let state: WorldState = vec![("a", true), ("b", false)].into_iter().collect();
        assert_eq!(state.len(), 2);
        assert_eq!(state.get("b"), Some(&Value::Bool(false)));
    }
}
