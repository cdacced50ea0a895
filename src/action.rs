//! # Action Module for Goal-Oriented Action Planning (GOAP)
//!
//! This module provides the [`Action`] type and its authoring-time
//! [`ActionBuilder`].
//!
//! An action is pure data: a name, a precondition fragment that must hold
//! immediately before it runs, an effect fragment that holds immediately after,
//! and a non-negative cost. Once built it cannot be changed, so one action set can
//! be reused across planning calls and read from several threads at once.
//!
//! ## Basic Usage
//!
//! ```
//! use regoap::{Action, WorldState};
//!
//! let chop_wood = Action::builder("chop_wood")
//!     .add_precondition("has_axe", true)
//!     .add_precondition("near_tree", true)
//!     .add_effect("has_wood", true)
//!     .cost(2.0)
//!     .build()
//!     .unwrap();
//!
//! let mut state = WorldState::new().with("has_axe", true).with("near_tree", true);
//!
//! if chop_wood.can_perform(&state) {
//!     chop_wood.apply_effects(&mut state);
//!     assert!(state.satisfies(&WorldState::new().with("has_wood", true)));
//! }
//! ```

use crate::{GoapError, Result, Value, WorldState};
use std::fmt;

/// Cost assigned to actions that do not set one explicitly.
pub const DEFAULT_ACTION_COST: f64 = 1.0;

/// Represents an action in the GOAP system.
///
/// Fields are read-only; use [`Action::builder`] to author one.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name: String,
    cost: f64,
    preconditions: WorldState,
    effects: WorldState,
}

impl Action {
    /// Starts authoring a new action with the given name and the default cost.
    pub fn builder(name: impl Into<String>) -> ActionBuilder {
        ActionBuilder::new(name)
    }

    /// Human-readable name; also what `Display` prints.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finite, non-negative cost added to a plan's total when this action is used.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Conditions that must hold, in full, immediately before this action runs.
    pub fn preconditions(&self) -> &WorldState {
        &self.preconditions
    }

    /// Conditions guaranteed to hold immediately after this action runs.
    pub fn effects(&self) -> &WorldState {
        &self.effects
    }

    /// Checks if this action can be performed in the given state.
    ///
    /// # Examples
    ///
    /// ```
    /// use regoap::{Action, WorldState};
    ///
    /// let pick_up = Action::builder("pick_up")
    ///     .add_precondition("item_visible", true)
    ///     .add_precondition("hands_free", true)
    ///     .add_effect("has_item", true)
    ///     .build()
    ///     .unwrap();
    ///
    /// let ready = WorldState::new().with("item_visible", true).with("hands_free", true);
    /// assert!(pick_up.can_perform(&ready));
    ///
    /// let busy = ready.merge(&WorldState::new().with("hands_free", false));
    /// assert!(!pick_up.can_perform(&busy));
    /// ```
    pub fn can_perform(&self, state: &WorldState) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Applies this action's effects to the given state.
    pub fn apply_effects(&self, state: &mut WorldState) {
        state.apply_effects(&self.effects);
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Incrementally accumulates the preconditions, effects and cost of an
/// [`Action`].
///
/// # Examples
///
/// ```
/// use regoap::{Action, GoapError};
///
/// let equip = Action::builder("Equip sword")
///     .add_precondition("pickUpSword", true)
///     .add_effect("equipSword", true)
///     .build()
///     .unwrap();
/// assert_eq!(equip.cost(), 1.0);
///
/// // An action that changes nothing can never be planned
/// let idle = Action::builder("Idle").build();
/// assert!(matches!(idle, Err(GoapError::MissingEffects(_))));
/// ```
#[derive(Debug, Clone)]
pub struct ActionBuilder {
    name: String,
    cost: f64,
    preconditions: WorldState,
    effects: WorldState,
}

impl ActionBuilder {
    /// Starts an action with no preconditions, no effects and
    /// [`DEFAULT_ACTION_COST`].
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cost: DEFAULT_ACTION_COST,
            preconditions: WorldState::new(),
            effects: WorldState::new(),
        }
    }

    /// Requires `key` to equal `value` before the action runs. Setting a key
    /// twice keeps the last value.
    pub fn add_precondition(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.preconditions.set(key, value);
        self
    }

    /// Drops the precondition on `key`, if any.
    pub fn remove_precondition(mut self, key: &str) -> Self {
        self.preconditions.remove(key);
        self
    }

    /// Makes the action set `key` to `value`. Setting a key twice keeps the
    /// last value.
    pub fn add_effect(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.effects.set(key, value);
        self
    }

    /// Drops the effect on `key`, if any.
    pub fn remove_effect(mut self, key: &str) -> Self {
        self.effects.remove(key);
        self
    }

    /// Sets the cost. Validated by [`ActionBuilder::build`].
    pub fn cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Finishes authoring.
    ///
    /// # Errors
    ///
    /// * `GoapError::InvalidActionCost` if the cost is negative, NaN or infinite.
    /// * `GoapError::MissingEffects` if no effect was added.
    pub fn build(self) -> Result<Action> {
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(GoapError::InvalidActionCost);
        }
        if self.effects.is_empty() {
            return Err(GoapError::MissingEffects(self.name));
        }

        Ok(Action {
            name: self.name,
            cost: self.cost,
            preconditions: self.preconditions,
            effects: self.effects,
        })
    }
}
