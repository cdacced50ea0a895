use crate::{Action, Result, WorldState};
use std::fmt::{self, Write as _};
use std::io;

/// Renders an action set and a plan as a Graphviz DOT digraph, for debugging
/// why the planner chose what it chose.
#[derive(Debug, Default)]
pub struct GoapVisualizer;

impl GoapVisualizer {
    pub fn new() -> Self {
        Self
    }

    /// Builds the DOT source.
    ///
    /// Every action becomes a box listing its cost, preconditions and effects.
    /// Actions usable straight from `current_state` get an edge from the current
    /// state node, and the plan is drawn as a red chain from the current state to
    /// the goal.
    pub fn render(
        &self,
        actions: &[Action],
        current_state: &WorldState,
        goal_state: &WorldState,
        plan: &[Action],
    ) -> Result<String> {
        let mut dot = String::new();
        self.render_into(&mut dot, actions, current_state, goal_state, plan)?;
        Ok(dot)
    }

    /// Streams the DOT source to `writer`.
    pub fn write_to<W: io::Write>(
        &self,
        writer: &mut W,
        actions: &[Action],
        current_state: &WorldState,
        goal_state: &WorldState,
        plan: &[Action],
    ) -> Result<()> {
        let dot = self.render(actions, current_state, goal_state, plan)?;
        writer.write_all(dot.as_bytes())?;
        Ok(())
    }

    /// Writes the DOT source into any [`fmt::Write`] sink. Formatter errors
    /// surface as `GoapError::Render`.
    ///
    /// Plan steps are matched against `actions` by value, so two actions that
    /// share a name are still told apart.
    pub fn render_into<W: fmt::Write>(
        &self,
        dot: &mut W,
        actions: &[Action],
        current_state: &WorldState,
        goal_state: &WorldState,
        plan: &[Action],
    ) -> Result<()> {
        writeln!(dot, "digraph GOAP {{")?;
        writeln!(dot, "    rankdir=LR;")?;
        writeln!(dot, "    node [shape=box, style=filled, fillcolor=lightblue];")?;
        writeln!(dot, "    edge [fontsize=10];")?;

        writeln!(
            dot,
            "    current [label=\"Current State\\n{}\", fillcolor=lightgreen];",
            Self::state_to_label(current_state)
        )?;
        writeln!(
            dot,
            "    goal [label=\"Goal State\\n{}\", fillcolor=lightpink];",
            Self::state_to_label(goal_state)
        )?;

        let in_plan = |action: &Action| plan.contains(action);
        for (i, action) in actions.iter().enumerate() {
            writeln!(
                dot,
                "    action_{} [label=\"{}\\nCost: {}\\nPre: {}\\nEff: {}\"{}];",
                i,
                Self::escape(action.name()),
                action.cost(),
                Self::state_to_label(action.preconditions()),
                Self::state_to_label(action.effects()),
                if in_plan(action) {
                    ", fillcolor=lightcoral"
                } else {
                    ""
                }
            )?;
        }

        for (i, action) in actions.iter().enumerate() {
            if action.can_perform(current_state) {
                writeln!(dot, "    current -> action_{} [label=\"possible\"];", i)?;
            }
        }

        let mut previous = "current".to_string();
        for (step, action) in plan.iter().enumerate() {
            if let Some(idx) = actions.iter().position(|a| a == action) {
                let node = format!("action_{}", idx);
                writeln!(
                    dot,
                    "    {} -> {} [label=\"step {}\", color=red, penwidth=2.0];",
                    previous,
                    node,
                    step + 1
                )?;
                previous = node;
            }
        }
        if !plan.is_empty() {
            writeln!(
                dot,
                "    {} -> goal [label=\"achieves\", color=red, penwidth=2.0];",
                previous
            )?;
        }

        writeln!(dot, "}}")?;
        Ok(())
    }

    fn state_to_label(state: &WorldState) -> String {
        state
            .iter()
            .map(|(key, value)| Self::escape(&format!("{}: {}", key, value)))
            .collect::<Vec<_>>()
            .join("\\n")
    }

    fn escape(text: &str) -> String {
        text.replace('\\', "\\\\").replace('"', "\\\"")
    }
}
