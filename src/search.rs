use crate::{Action, GoapError, Result, WorldState};
use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Trait defining the interface for search algorithms used in GOAP.
///
/// Implementations receive the full action set and both world states and return
/// the actions to execute, in order, to turn `current_state` into a state that
/// satisfies `goal_state`.
///
/// # Examples
///
/// ```
/// use regoap::{Action, GoapError, Result, SearchAlgorithm, WorldState};
///
/// /// Only ever looks for a single action that reaches the goal.
/// struct OneStepSearch;
///
/// impl SearchAlgorithm for OneStepSearch {
///     fn search(
///         &self,
///         actions: &[Action],
///         current_state: &WorldState,
///         goal_state: &WorldState,
///     ) -> Result<Vec<Action>> {
///         actions
///             .iter()
///             .find(|a| a.can_perform(current_state) && current_state.merge(a.effects()).satisfies(goal_state))
///             .map(|a| vec![a.clone()])
///             .ok_or(GoapError::NoPlanFound)
///     }
/// }
/// ```
pub trait SearchAlgorithm {
    /// Finds a sequence of actions that transforms the current state into the goal state.
    ///
    /// # Arguments
    ///
    /// * `actions` - Available actions to consider in the search
    /// * `current_state` - The initial state of the world
    /// * `goal_state` - The target state to achieve
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Action>)` - The actions to execute, in order
    /// * `Err(GoapError)` - If no valid plan can be found
    fn search(
        &self,
        actions: &[Action],
        current_state: &WorldState,
        goal_state: &WorldState,
    ) -> Result<Vec<Action>>;
}

/// Properties of an action set that bound how fast any chain of its actions can
/// resolve outstanding conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionBounds {
    /// Largest number of effects on a single action
    pub max_effects: usize,
    /// Cheapest single action cost
    pub min_cost: f64,
}

impl ActionBounds {
    /// Scans `actions` once. An empty set yields zero for both bounds.
    pub fn from_actions(actions: &[Action]) -> Self {
        let max_effects = actions.iter().map(|a| a.effects().len()).max().unwrap_or(0);
        let min_cost = actions
            .iter()
            .map(Action::cost)
            .min_by(f64::total_cmp)
            .unwrap_or(0.0);
        Self {
            max_effects,
            min_cost,
        }
    }
}

/// A trait for heuristic functions estimating the remaining cost of a residual
/// goal.
pub trait HeuristicStrategy: Send + Sync {
    /// Estimates the cheapest cost of turning `current` into a state that
    /// satisfies `residual`.
    ///
    /// # Arguments
    ///
    /// * `residual` - Conditions the rest of the chain still has to establish
    /// * `current` - The state planning starts from
    /// * `bounds` - Bounds of the action set being searched
    fn calculate(&self, residual: &WorldState, current: &WorldState, bounds: &ActionBounds)
        -> f64;
}

/// Counts the conditions the current state does not already satisfy.
///
/// One action resolves at most `max_effects` of them and costs at least
/// `min_cost`, so the count is scaled to
/// `ceil(unsatisfied / max_effects) * min_cost`. The estimate never exceeds the
/// true remaining cost and drops by at most one action's cost per step.
pub struct DefaultHeuristic;

impl HeuristicStrategy for DefaultHeuristic {
    fn calculate(
        &self,
        residual: &WorldState,
        current: &WorldState,
        bounds: &ActionBounds,
    ) -> f64 {
        let unsatisfied = residual.subtract_satisfied(current).len();
        if unsatisfied == 0 || bounds.max_effects == 0 {
            return 0.0;
        }
        (unsatisfied as f64 / bounds.max_effects as f64).ceil() * bounds.min_cost
    }
}

/// Zero heuristic for algorithms like Dijkstra that don't use heuristics.
pub struct ZeroHeuristic;

impl HeuristicStrategy for ZeroHeuristic {
    fn calculate(
        &self,
        _residual: &WorldState,
        _current: &WorldState,
        _bounds: &ActionBounds,
    ) -> f64 {
        0.0
    }
}

/// A residual goal reached during the backward search.
#[derive(Debug)]
struct Node {
    /// Every condition that must hold before the chain from this node up to the
    /// goal runs, including ones the current state already satisfies
    residual: WorldState,
    parent: Option<usize>,
    /// Index into the action slice of the action that produced this node
    action: Option<usize>,
    g_cost: f64,
    h_cost: f64,
}

impl Node {
    fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

/// Frontier entry. Arena indices grow in insertion order and double as the
/// final tie-break, so equal entries pop in action-set order.
#[derive(Debug, Clone, Copy)]
struct NodeWrapper {
    idx: usize,
    f_cost: f64,
    g_cost: f64,
}

impl PartialEq for NodeWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NodeWrapper {}

impl PartialOrd for NodeWrapper {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NodeWrapper {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_cost
            .total_cmp(&other.f_cost)
            .then_with(|| self.g_cost.total_cmp(&other.g_cost))
            .then_with(|| self.idx.cmp(&other.idx))
    }
}

/// Manages the state of one backward search.
struct SearchContext<'a> {
    heuristic: &'a dyn HeuristicStrategy,
    current: &'a WorldState,
    bounds: ActionBounds,
    nodes: Vec<Node>,
    open_set: BinaryHeap<Reverse<NodeWrapper>>,
    /// Residual goals that have already been expanded
    closed_set: HashSet<WorldState>,
    /// Cheapest path cost seen so far for each residual goal
    best_cost: HashMap<WorldState, f64>,
    expansions: usize,
}

impl<'a> SearchContext<'a> {
    fn new(
        goal: &WorldState,
        current: &'a WorldState,
        actions: &[Action],
        heuristic: &'a dyn HeuristicStrategy,
    ) -> Self {
        let mut context = Self {
            heuristic,
            current,
            bounds: ActionBounds::from_actions(actions),
            nodes: Vec::new(),
            open_set: BinaryHeap::new(),
            closed_set: HashSet::new(),
            best_cost: HashMap::new(),
            expansions: 0,
        };
        context.best_cost.insert(goal.clone(), 0.0);
        context.push(goal.clone(), None, None, 0.0);
        context
    }

    fn push(
        &mut self,
        residual: WorldState,
        parent: Option<usize>,
        action: Option<usize>,
        g_cost: f64,
    ) {
        let h_cost = self
            .heuristic
            .calculate(&residual, self.current, &self.bounds);
        let idx = self.nodes.len();
        self.nodes.push(Node {
            residual,
            parent,
            action,
            g_cost,
            h_cost,
        });
        self.open_set.push(Reverse(NodeWrapper {
            idx,
            f_cost: self.nodes[idx].f_cost(),
            g_cost,
        }));
    }

    /// Pops the cheapest node whose residual goal has not been expanded yet.
    fn next_node(&mut self) -> Option<usize> {
        while let Some(Reverse(wrapper)) = self.open_set.pop() {
            if !self.closed_set.contains(&self.nodes[wrapper.idx].residual) {
                return Some(wrapper.idx);
            }
        }
        None
    }

    /// A node is covering when the current state already holds everything its
    /// chain needs.
    fn is_covered(&self, node_idx: usize) -> bool {
        self.current.satisfies(&self.nodes[node_idx].residual)
    }

    fn mark_visited(&mut self, node_idx: usize) {
        self.closed_set.insert(self.nodes[node_idx].residual.clone());
        self.expansions += 1;
    }

    /// Adds a successor unless its residual was already reached at equal or
    /// lower cost.
    fn process_successor(
        &mut self,
        parent_idx: usize,
        action_idx: usize,
        residual: WorldState,
        g_cost: f64,
    ) {
        if let Some(&best) = self.best_cost.get(&residual) {
            if best <= g_cost {
                return;
            }
        }
        // A cheaper route reopens an already expanded residual
        self.closed_set.remove(&residual);
        self.best_cost.insert(residual.clone(), g_cost);
        self.push(residual, Some(parent_idx), Some(action_idx), g_cost);
    }

    /// Walks parent links from a covering node back to the root.
    ///
    /// The search runs from the goal toward the current state, so the deepest
    /// node holds the first action to execute: leaf-to-root order is already
    /// execution order.
    fn reconstruct_path(&self, node_idx: usize, actions: &[Action]) -> Vec<Action> {
        let mut path = Vec::new();
        let mut current_idx = Some(node_idx);

        while let Some(idx) = current_idx {
            let node = &self.nodes[idx];
            if let Some(action_idx) = node.action {
                path.push(actions[action_idx].clone());
            }
            current_idx = node.parent;
        }

        path
    }
}

/// Regresses a residual goal through an action.
///
/// The residual keeps conditions the current state already satisfies, so an
/// action that would undo one of them is rejected here and a chain that undoes
/// and later restores it is still found.
///
/// Returns `None` when the action is irrelevant (none of its effects resolve a
/// condition of the residual) or conflicting (an effect would undo a condition,
/// or a precondition contradicts one the action leaves untouched).
fn regress(residual: &WorldState, action: &Action) -> Option<WorldState> {
    let effects = action.effects();
    let relevant = residual
        .iter()
        .any(|(key, value)| effects.get(key) == Some(value));
    if !relevant || effects.conflicts_with(residual) {
        return None;
    }

    let unresolved = residual.subtract_satisfied(effects);
    if action.preconditions().conflicts_with(&unresolved) {
        return None;
    }

    Some(unresolved.merge(action.preconditions()))
}

/// A* search working backward from the goal over residual-goal nodes.
pub struct AStarSearch {
    heuristic: Box<dyn HeuristicStrategy>,
    max_expansions: Option<usize>,
}

impl AStarSearch {
    /// Creates an unbounded A* search with the given heuristic.
    pub fn new(heuristic: Box<dyn HeuristicStrategy>) -> Self {
        Self {
            heuristic,
            max_expansions: None,
        }
    }

    /// Creates an unbounded A* search using [`DefaultHeuristic`].
    pub fn with_default_heuristic() -> Self {
        Self::new(Box::new(DefaultHeuristic))
    }

    /// Caps the number of node expansions; exceeding it fails with
    /// `GoapError::SearchBudgetExhausted`.
    pub fn with_max_expansions(mut self, max_expansions: Option<usize>) -> Self {
        self.max_expansions = max_expansions;
        self
    }
}

impl Default for AStarSearch {
    fn default() -> Self {
        Self::with_default_heuristic()
    }
}

impl SearchAlgorithm for AStarSearch {
    fn search(
        &self,
        actions: &[Action],
        current_state: &WorldState,
        goal_state: &WorldState,
    ) -> Result<Vec<Action>> {
        if current_state.satisfies(goal_state) {
            log::debug!("Goal {} already satisfied, nothing to plan", goal_state);
            return Ok(Vec::new());
        }

        log::debug!(
            "Planning for {} with {} actions, {} outstanding conditions",
            goal_state,
            actions.len(),
            goal_state.subtract_satisfied(current_state).len()
        );

        let mut context =
            SearchContext::new(goal_state, current_state, actions, self.heuristic.as_ref());

        while let Some(current_idx) = context.next_node() {
            if context.is_covered(current_idx) {
                let plan = context.reconstruct_path(current_idx, actions);
                log::debug!(
                    "Found plan of {} actions (cost {}) after {} expansions, {} nodes",
                    plan.len(),
                    context.nodes[current_idx].g_cost,
                    context.expansions,
                    context.nodes.len()
                );
                return Ok(plan);
            }

            if let Some(limit) = self.max_expansions {
                if context.expansions >= limit {
                    log::warn!("Search budget of {} expansions exhausted", limit);
                    return Err(GoapError::SearchBudgetExhausted(limit));
                }
            }

            context.mark_visited(current_idx);
            let residual = context.nodes[current_idx].residual.clone();
            let g_cost = context.nodes[current_idx].g_cost;
            log::trace!("Expanding {} at cost {}", residual, g_cost);

            for (action_idx, action) in actions.iter().enumerate() {
                if let Some(new_residual) = regress(&residual, action) {
                    context.process_successor(
                        current_idx,
                        action_idx,
                        new_residual,
                        g_cost + action.cost(),
                    );
                }
            }
        }

        log::debug!(
            "No plan found after {} expansions, {} nodes",
            context.expansions,
            context.nodes.len()
        );
        Err(GoapError::NoPlanFound)
    }
}

/// Dijkstra's algorithm: the same backward search with a zero heuristic.
#[derive(Default)]
pub struct DijkstraSearch {
    max_expansions: Option<usize>,
}

impl DijkstraSearch {
    /// Creates a Dijkstra search with an optional expansion budget.
    pub fn with_max_expansions(max_expansions: Option<usize>) -> Self {
        Self { max_expansions }
    }
}

impl SearchAlgorithm for DijkstraSearch {
    fn search(
        &self,
        actions: &[Action],
        current_state: &WorldState,
        goal_state: &WorldState,
    ) -> Result<Vec<Action>> {
        let astar =
            AStarSearch::new(Box::new(ZeroHeuristic)).with_max_expansions(self.max_expansions);
        astar.search(actions, current_state, goal_state)
    }
}
