use regoap::{
    plan, validate_plan, Action, GoapError, GoapVisualizer, Planner, PlannerConfig, WorldState,
};
use std::sync::Arc;
use std::thread;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sword_actions() -> Vec<Action> {
    vec![
        Action::builder("Equip sword")
            .add_precondition("pickUpSword", true)
            .add_effect("equipSword", true)
            .build()
            .unwrap(),
        Action::builder("Attack with sword")
            .add_precondition("equipSword", true)
            .add_effect("attackWithSword", true)
            .build()
            .unwrap(),
        Action::builder("Pick up sword")
            .add_effect("pickUpSword", true)
            .build()
            .unwrap(),
    ]
}

fn names(plan: &[Action]) -> Vec<&str> {
    plan.iter().map(|a| a.name()).collect()
}

#[test]
fn test_canonical_sword_scenario() {
    init_logger();
    let goal = WorldState::new().with("attackWithSword", true);
    let steps = plan(&sword_actions(), &WorldState::new(), &goal).unwrap();
    assert_eq!(
        names(&steps),
        ["Pick up sword", "Equip sword", "Attack with sword"]
    );
}

#[test]
fn test_unreachable_goal_fails() {
    init_logger();
    let goal = WorldState::new().with("flyAway", true);
    let result = plan(&sword_actions(), &WorldState::new(), &goal);
    assert!(matches!(result, Err(GoapError::NoPlanFound)));
}

#[test]
fn test_goal_already_true_gives_empty_plan() {
    init_logger();
    let current = WorldState::new().with("ready", true);
    let goal = WorldState::new().with("ready", true);
    assert!(plan(&sword_actions(), &current, &goal).unwrap().is_empty());
}

#[test]
fn test_partially_satisfied_start() {
    init_logger();
    let current = WorldState::new().with("pickUpSword", true);
    let goal = WorldState::new().with("attackWithSword", true);
    let steps = plan(&sword_actions(), &current, &goal).unwrap();
    assert_eq!(names(&steps), ["Equip sword", "Attack with sword"]);
}

#[test]
fn test_basic_goap_workflow() {
    init_logger();
    let gather_wood = Action::builder("gather_wood")
        .add_precondition("has_axe", "yes")
        .add_effect("has_wood", "yes")
        .build()
        .unwrap();
    let build_house = Action::builder("build_house")
        .add_precondition("has_wood", "yes")
        .add_effect("has_house", "yes")
        .cost(2.0)
        .build()
        .unwrap();

    let planner = Planner::new(vec![gather_wood, build_house]);

    let current_state = WorldState::new()
        .with("has_axe", "yes")
        .with("has_wood", "no")
        .with("has_house", "no");
    let goal_state = WorldState::new().with("has_house", "yes");

    let steps = planner.plan(&current_state, &goal_state).unwrap();
    assert_eq!(names(&steps), ["gather_wood", "build_house"]);
}

#[test]
fn test_mixed_value_kinds() {
    init_logger();
    let walk = Action::builder("walk_to_town")
        .add_precondition("location", "forest")
        .add_effect("location", "town")
        .cost(3.0)
        .build()
        .unwrap();
    let buy = Action::builder("buy_potion")
        .add_precondition("location", "town")
        .add_precondition("gold", 10)
        .add_effect("potions", 1)
        .build()
        .unwrap();

    let current = WorldState::new().with("location", "forest").with("gold", 10);
    let goal = WorldState::new().with("potions", 1);
    let steps = plan(&[buy, walk], &current, &goal).unwrap();
    assert_eq!(names(&steps), ["walk_to_town", "buy_potion"]);

    let poor = current.merge(&WorldState::new().with("gold", 9));
    assert!(plan(&steps, &poor, &goal).is_err());
}

#[test]
fn test_toggle_action_turns_lamp_on() {
    init_logger();
    let switch_on = Action::builder("switch_on")
        .add_precondition("lamp_on", false)
        .add_effect("lamp_on", true)
        .build()
        .unwrap();
    let switch_off = Action::builder("switch_off")
        .add_precondition("lamp_on", true)
        .add_effect("lamp_on", false)
        .build()
        .unwrap();

    let current = WorldState::new().with("lamp_on", false);
    let goal = WorldState::new().with("lamp_on", true);
    let steps = plan(&[switch_off, switch_on], &current, &goal).unwrap();
    assert_eq!(names(&steps), ["switch_on"]);
}

#[test]
fn test_multiple_paths_to_goal() {
    init_logger();
    let expensive = Action::builder("expensive_action")
        .add_precondition("start", true)
        .add_effect("goal", true)
        .cost(5.0)
        .build()
        .unwrap();
    let cheap = Action::builder("cheap_action")
        .add_precondition("start", true)
        .add_effect("goal", true)
        .build()
        .unwrap();

    let planner = Planner::new(vec![expensive, cheap]);
    let current_state = WorldState::new().with("start", true);
    let goal_state = WorldState::new().with("goal", true);

    let steps = planner.plan(&current_state, &goal_state).unwrap();
    assert_eq!(names(&steps), ["cheap_action"]);
}

#[test]
fn test_plan_may_undo_and_restore_a_true_condition() {
    init_logger();
    let grab_key = Action::builder("grab_key")
        .add_effect("has_key", true)
        .add_effect("hands_free", false)
        .build()
        .unwrap();
    let stow_key = Action::builder("stow_key")
        .add_effect("hands_free", true)
        .build()
        .unwrap();
    let buy_key = Action::builder("buy_key")
        .add_effect("has_key", true)
        .cost(5.0)
        .build()
        .unwrap();

    let current = WorldState::new().with("hands_free", true);
    let goal = WorldState::new().with("hands_free", true).with("has_key", true);

    let planner = Planner::new(vec![grab_key, stow_key, buy_key]);
    let steps = planner.plan(&current, &goal).unwrap();
    assert_eq!(names(&steps), ["grab_key", "stow_key"]);
    assert!(validate_plan(&current, &goal, &steps).is_ok());
}

#[test]
fn test_invalid_actions_rejected_at_build() {
    let result = Action::builder("invalid_action")
        .add_effect("x", true)
        .cost(-1.0)
        .build();
    assert!(matches!(result, Err(GoapError::InvalidActionCost)));

    let result = Action::builder("empty").build();
    assert!(matches!(result, Err(GoapError::MissingEffects(_))));
}

#[test]
fn test_budget_from_config() {
    init_logger();
    let planner = Planner::with_config(
        sword_actions(),
        PlannerConfig::default().with_max_expansions(2),
    );
    let goal = WorldState::new().with("attackWithSword", true);
    assert!(matches!(
        planner.plan(&WorldState::new(), &goal),
        Err(GoapError::SearchBudgetExhausted(2))
    ));
}

#[test]
fn test_concurrent_planning_shares_action_set() {
    init_logger();
    let planner = Arc::new(Planner::new(sword_actions()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let planner = Arc::clone(&planner);
            thread::spawn(move || {
                let current = if i % 2 == 0 {
                    WorldState::new()
                } else {
                    WorldState::new().with("pickUpSword", true)
                };
                let goal = WorldState::new().with("attackWithSword", true);
                planner.plan(&current, &goal).map(|p| p.len())
            })
        })
        .collect();

    let lengths: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert_eq!(lengths, [3, 2, 3, 2]);
}

#[test]
fn test_validate_and_visualize_plan() {
    init_logger();
    let actions = sword_actions();
    let current = WorldState::new();
    let goal = WorldState::new().with("attackWithSword", true);

    let steps = plan(&actions, &current, &goal).unwrap();
    let final_state = validate_plan(&current, &goal, &steps).unwrap();
    assert!(final_state.satisfies(&goal));

    let dot = GoapVisualizer::new()
        .render(&actions, &current, &goal, &steps)
        .unwrap();
    assert!(dot.contains("Pick up sword"));
    assert!(dot.contains("-> goal [label=\"achieves\""));
}
