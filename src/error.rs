use thiserror::Error;

/// Errors produced while authoring actions, planning, or checking plans.
///
/// "No plan exists" is a routine outcome in goal-directed AI, so it is reported
/// through this type like every other failure rather than by panicking.
#[derive(Error, Debug)]
pub enum GoapError {
    #[error("No valid plan found to achieve the goal")]
    NoPlanFound,
    #[error("Search budget of {0} node expansions exhausted")]
    SearchBudgetExhausted(usize),
    #[error("Action cost must be finite and non-negative")]
    InvalidActionCost,
    #[error("Action has no effects: {0}")]
    MissingEffects(String),
    #[error("Action precondition not met: {0}")]
    PreconditionNotMet(String),
    #[error("Plan does not reach the goal")]
    GoalNotReached,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to render plan: {0}")]
    Render(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, GoapError>;
