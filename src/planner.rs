//! # Planner Module for Goal-Oriented Action Planning (GOAP)
//!
//! The planner is the single entry point of the crate. Given the available
//! actions, a snapshot of the current world state, and a goal, it returns the
//! cheapest ordered sequence of actions whose execution turns the current state
//! into one satisfying the goal, or a [`GoapError`] when no such sequence exists.
//!
//! ## Overview
//!
//! Planning runs backward from the goal (regression search):
//! 1. Each condition of the goal not yet true in the current state must be
//!    produced by some action's effects
//! 2. That action's preconditions join the conditions still to justify
//! 3. Actions whose effects would undo a needed condition are never chosen,
//!    including conditions that already hold in the current state
//! 4. The search stops once the current state satisfies everything left
//!
//! A* orders the frontier by path cost plus an estimate that never exceeds the
//! remaining cost, so the plan returned is the cheapest one. Ties are broken by
//! lower path cost and then by the order of the action set, so identical inputs
//! always yield the identical plan.
//!
//! ## Basic Usage
//!
//! ```
//! use regoap::{plan, Action, WorldState};
//!
//! let actions = vec![
//!     Action::builder("Equip sword")
//!         .add_precondition("pickUpSword", true)
//!         .add_effect("equipSword", true)
//!         .build()
//!         .unwrap(),
//!     Action::builder("Attack with sword")
//!         .add_precondition("equipSword", true)
//!         .add_effect("attackWithSword", true)
//!         .build()
//!         .unwrap(),
//!     Action::builder("Pick up sword")
//!         .add_effect("pickUpSword", true)
//!         .build()
//!         .unwrap(),
//! ];
//!
//! let goal = WorldState::new().with("attackWithSword", true);
//! let steps = plan(&actions, &WorldState::new(), &goal).unwrap();
//!
//! let names: Vec<_> = steps.iter().map(|a| a.name()).collect();
//! assert_eq!(names, ["Pick up sword", "Equip sword", "Attack with sword"]);
//! ```
//!
//! ## Bounded latency
//!
//! ```
//! use regoap::{Action, GoapError, Planner, PlannerConfig, WorldState};
//!
//! let step = |from: &str, to: &str| {
//!     Action::builder(format!("{}->{}", from, to))
//!         .add_precondition(from, true)
//!         .add_effect(to, true)
//!         .build()
//!         .unwrap()
//! };
//! let actions = vec![step("a", "b"), step("b", "c"), step("c", "d")];
//! let planner = Planner::with_config(actions, PlannerConfig::default().with_max_expansions(1));
//!
//! let current = WorldState::new().with("a", true);
//! let goal = WorldState::new().with("d", true);
//! assert!(matches!(
//!     planner.plan(&current, &goal),
//!     Err(GoapError::SearchBudgetExhausted(1))
//! ));
//! ```

use crate::search::{AStarSearch, SearchAlgorithm};
use crate::{Action, GoapError, Result, WorldState};

/// Tuning knobs for a [`Planner`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Maximum number of residual goals expanded before giving up.
    /// `None` searches until the frontier is exhausted.
    pub max_expansions: Option<usize>,
}

impl PlannerConfig {
    pub fn with_max_expansions(mut self, max_expansions: usize) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}

/// Plans sequences of actions over a fixed action set.
///
/// The action set is read-only once the planner is built, so a `Planner` can be
/// shared between threads and asked for plans concurrently.
pub struct Planner {
    actions: Vec<Action>,
    search_algorithm: Box<dyn SearchAlgorithm + Send + Sync>,
}

impl Planner {
    /// Creates a planner using A* with the default heuristic and no budget.
    pub fn new(actions: Vec<Action>) -> Self {
        Self::with_config(actions, PlannerConfig::default())
    }

    pub fn with_config(actions: Vec<Action>, config: PlannerConfig) -> Self {
        Self {
            actions,
            search_algorithm: Box::new(
                AStarSearch::default().with_max_expansions(config.max_expansions),
            ),
        }
    }

    /// Creates a planner with a custom search algorithm.
    ///
    /// # Examples
    ///
    /// ```
    /// use regoap::{Action, DijkstraSearch, Planner, WorldState};
    ///
    /// let action = Action::builder("open_door")
    ///     .add_effect("door_open", true)
    ///     .build()
    ///     .unwrap();
    /// let planner = Planner::with_search_algorithm(vec![action], Box::new(DijkstraSearch::default()));
    ///
    /// let goal = WorldState::new().with("door_open", true);
    /// assert_eq!(planner.plan(&WorldState::new(), &goal).unwrap().len(), 1);
    /// ```
    pub fn with_search_algorithm(
        actions: Vec<Action>,
        search_algorithm: Box<dyn SearchAlgorithm + Send + Sync>,
    ) -> Self {
        Self {
            actions,
            search_algorithm,
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Finds the cheapest sequence of actions reaching `goal_state` from
    /// `current_state`.
    ///
    /// # Errors
    ///
    /// * `GoapError::NoPlanFound` if the action set cannot bridge the two states.
    /// * `GoapError::SearchBudgetExhausted` if a configured budget ran out first.
    pub fn plan(&self, current_state: &WorldState, goal_state: &WorldState) -> Result<Vec<Action>> {
        self.search_algorithm
            .search(&self.actions, current_state, goal_state)
    }
}

/// Plans with the default A* search and no budget.
///
/// This is a pure function of its inputs: none of them is modified, and
/// identical inputs always produce the identical plan.
pub fn plan(
    actions: &[Action],
    current_state: &WorldState,
    goal_state: &WorldState,
) -> Result<Vec<Action>> {
    AStarSearch::default().search(actions, current_state, goal_state)
}

/// Simulates `plan` from `current_state` and checks that it reaches the goal.
///
/// Each action's preconditions must hold in the state produced by the actions
/// before it. Returns the final simulated state.
///
/// # Errors
///
/// * `GoapError::PreconditionNotMet` naming the first action that cannot run.
/// * `GoapError::GoalNotReached` if every step runs but the goal is not met.
///
/// # Examples
///
/// ```
/// use regoap::{validate_plan, Action, GoapError, WorldState};
///
/// let attack = Action::builder("attack")
///     .add_precondition("armed", true)
///     .add_effect("enemy_down", true)
///     .build()
///     .unwrap();
/// let goal = WorldState::new().with("enemy_down", true);
///
/// let unarmed = WorldState::new();
/// assert!(matches!(
///     validate_plan(&unarmed, &goal, &[attack.clone()]),
///     Err(GoapError::PreconditionNotMet(_))
/// ));
///
/// let armed = WorldState::new().with("armed", true);
/// assert!(validate_plan(&armed, &goal, &[attack]).is_ok());
/// ```
pub fn validate_plan(
    current_state: &WorldState,
    goal_state: &WorldState,
    plan: &[Action],
) -> Result<WorldState> {
    let mut state = current_state.clone();
    for action in plan {
        if !action.can_perform(&state) {
            return Err(GoapError::PreconditionNotMet(action.name().to_string()));
        }
        action.apply_effects(&mut state);
    }

    if state.satisfies(goal_state) {
        Ok(state)
    } else {
        Err(GoapError::GoalNotReached)
    }
}
