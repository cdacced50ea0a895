mod action;
mod error;
mod planner;
mod search;
mod state;
mod visualizer;

pub use action::{Action, ActionBuilder, DEFAULT_ACTION_COST};
pub use error::{GoapError, Result};
pub use planner::{plan, validate_plan, Planner, PlannerConfig};
pub use search::{
    AStarSearch, ActionBounds, DefaultHeuristic, DijkstraSearch, HeuristicStrategy,
    SearchAlgorithm, ZeroHeuristic,
};
pub use state::{Value, WorldState};
pub use visualizer::GoapVisualizer;
