use std::error::Error;
use std::fs::File;

use regoap::{Action, GoapError, GoapVisualizer, Planner, WorldState};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let actions = vec![
        Action::builder("Equip sword")
            .add_precondition("pickUpSword", true)
            .add_effect("equipSword", true)
            .build()?,
        Action::builder("Attack with sword")
            .add_precondition("equipSword", true)
            .add_effect("attackWithSword", true)
            .build()?,
        Action::builder("Pick up sword")
            .add_effect("pickUpSword", true)
            .build()?,
        Action::builder("Punch")
            .add_effect("attackWithFists", true)
            .cost(0.5)
            .build()?,
    ];

    let planner = Planner::new(actions.clone());
    let current_state = WorldState::new();

    let goal_state = WorldState::new().with("attackWithSword", true);
    let plan = planner.plan(&current_state, &goal_state)?;
    for (i, action) in plan.iter().enumerate() {
        log::info!("Step {}: {} (cost {})", i + 1, action, action.cost());
    }

    // No action lets the agent fly, so this goal has no plan
    let unreachable = WorldState::new().with("flyAway", true);
    match planner.plan(&current_state, &unreachable) {
        Err(GoapError::NoPlanFound) => log::info!("No plan reaches {}", unreachable),
        other => log::warn!("Unexpected result: {:?}", other),
    }

    let mut file = File::create("./sword_plan.dot")?;
    GoapVisualizer::new().write_to(&mut file, &actions, &current_state, &goal_state, &plan)?;
    log::info!("Wrote sword_plan.dot");

    Ok(())
}
