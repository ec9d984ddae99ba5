//! Tests for the plan graph mutators.

use crate::{
    capability::PlanDraft,
    error::FactoryError,
    models::{Milestone, MilestoneStatus, Plan},
};

fn create_test_plan() -> Plan {
    Plan::from(vec![
        Milestone::new("a", "Research"),
        Milestone::new("b", "Architecture").with_dependencies(["a"]),
        Milestone::new("c", "Implementation").with_dependencies(["a", "b"]),
        Milestone::new("d", "Testing").with_dependencies(["c"]),
    ])
}

fn draft(id: &str, deps: &[&str]) -> PlanDraft {
    PlanDraft {
        id: id.to_string(),
        title: format!("Title {id}"),
        description: String::new(),
        dependencies: deps.iter().map(|d| d.to_string()).collect(),
    }
}

#[test]
fn test_add_forces_pending_and_appends() {
    let mut plan = create_test_plan();
    plan.add(
        Milestone::new("e", "Docs")
            .with_dependencies(["d", "d"])
            .with_status(MilestoneStatus::Done),
    )
    .expect("Failed to add milestone");

    assert_eq!(plan.ids(), vec!["a", "b", "c", "d", "e"]);
    assert_eq!(plan[4].status, MilestoneStatus::Pending);
    assert_eq!(plan[4].dependencies, vec!["d"]);
}

#[test]
fn test_add_rejects_duplicate_id() {
    let mut plan = create_test_plan();
    let err = plan.add(Milestone::new("a", "Again")).unwrap_err();
    assert!(matches!(err, FactoryError::DuplicateMilestone { id } if id == "a"));
    assert_eq!(plan.len(), 4);
}

#[test]
fn test_add_rejects_unknown_and_self_dependency() {
    let mut plan = create_test_plan();
    let err = plan
        .add(Milestone::new("e", "Docs").with_dependencies(["zzz"]))
        .unwrap_err();
    assert!(matches!(err, FactoryError::InvalidDependency { .. }));

    let err = plan
        .add(Milestone::new("e", "Docs").with_dependencies(["e"]))
        .unwrap_err();
    assert!(matches!(err, FactoryError::InvalidDependency { .. }));
}

#[test]
fn test_add_rejects_blank_title() {
    let mut plan = create_test_plan();
    let err = plan.add(Milestone::new("e", "   ")).unwrap_err();
    assert!(matches!(err, FactoryError::InvalidInput { field, .. } if field == "title"));
}

#[test]
fn test_replace_is_wholesale() {
    let mut plan = create_test_plan();
    let previous = plan
        .replace(Milestone::new("b", "Architecture v2").with_status(MilestoneStatus::Failed))
        .expect("Failed to edit milestone");

    assert_eq!(previous.title, "Architecture");
    assert_eq!(plan[1].title, "Architecture v2");
    // Dependencies were not passed, so they are gone.
    assert!(plan[1].dependencies.is_empty());
    assert_eq!(plan[1].status, MilestoneStatus::Failed);
}

#[test]
fn test_replace_rejects_cycle() {
    let mut plan = create_test_plan();
    let err = plan
        .replace(Milestone::new("a", "Research").with_dependencies(["d"]))
        .unwrap_err();
    assert!(matches!(err, FactoryError::CyclicDependency { id } if id == "a"));
    assert!(plan[0].dependencies.is_empty());
}

#[test]
fn test_replace_unknown_milestone() {
    let mut plan = create_test_plan();
    let err = plan.replace(Milestone::new("x", "Nope")).unwrap_err();
    assert!(matches!(err, FactoryError::MilestoneNotFound { .. }));
}

#[test]
fn test_remove_exactly_one_preserving_order() {
    let mut plan = create_test_plan();
    let removed = plan.remove("b").expect("Failed to delete milestone");

    assert_eq!(removed.id, "b");
    assert_eq!(plan.ids(), vec!["a", "c", "d"]);
    // References to the deleted milestone are pruned.
    assert_eq!(plan[1].dependencies, vec!["a"]);
    assert!(plan.validate().is_ok());
}

#[test]
fn test_remove_unknown_milestone() {
    let mut plan = create_test_plan();
    assert!(plan.remove("zzz").is_err());
    assert_eq!(plan.len(), 4);
}

#[test]
fn test_reorder_permutation() {
    let mut plan = create_test_plan();
    plan.reorder(&["d", "c", "b", "a"]).expect("Failed to reorder");
    assert_eq!(plan.ids(), vec!["d", "c", "b", "a"]);
    // Dependencies are advisory; the order is still accepted.
    assert!(plan.validate().is_ok());
}

#[test]
fn test_reorder_rejects_non_permutation() {
    let mut plan = create_test_plan();
    assert!(plan.reorder(&["a", "b", "c"]).is_err());
    assert!(plan.reorder(&["a", "b", "c", "c"]).is_err());
    assert!(plan.reorder(&["a", "b", "c", "x"]).is_err());
    assert_eq!(plan.ids(), vec!["a", "b", "c", "d"]);
}

#[test]
fn test_move_to_preserves_relative_order() {
    for from in 0..4 {
        for to in 0..4 {
            let mut plan = create_test_plan();
            let moved_id = plan[from].id.clone();
            let others: Vec<String> = plan
                .ids()
                .into_iter()
                .filter(|id| *id != moved_id)
                .map(String::from)
                .collect();

            let changed = plan.move_to(from, to).expect("Failed to move");
            assert_eq!(changed, from != to);
            assert_eq!(plan[to].id, moved_id);

            let after: Vec<String> = plan
                .ids()
                .into_iter()
                .filter(|id| *id != moved_id)
                .map(String::from)
                .collect();
            assert_eq!(after, others);
        }
    }
}

#[test]
fn test_move_to_out_of_range() {
    let mut plan = create_test_plan();
    assert!(plan.move_to(0, 4).is_err());
    assert!(plan.move_to(7, 0).is_err());
}

#[test]
fn test_set_status_bypasses_dependencies() {
    let mut plan = create_test_plan();
    let previous = plan.set_status("d", MilestoneStatus::Done).unwrap();
    assert_eq!(previous, MilestoneStatus::Pending);
    assert_eq!(plan.status_of("d"), Some(MilestoneStatus::Done));
    assert_eq!(plan.status_of("c"), Some(MilestoneStatus::Pending));
}

#[test]
fn test_generate_id_avoids_collisions() {
    let mut plan = create_test_plan();
    assert_eq!(plan.generate_id(1700), "step-1700");
    plan.add(Milestone::new("step-1700", "Manual")).unwrap();
    assert_eq!(plan.generate_id(1700), "step-1700-2");
}

#[test]
fn test_from_drafts_sanitizes() {
    let plan = Plan::from_drafts(vec![
        draft("setup", &[]),
        draft("api", &["setup", "ghost", "api"]),
        draft("api", &["setup"]),
        draft("ui", &["api", "ui-loop"]),
        draft("", &[]),
    ]);

    assert_eq!(plan.ids(), vec!["setup", "api", "api-2", "ui", "step-5"]);
    assert_eq!(plan[1].dependencies, vec!["setup"]);
    assert_eq!(plan[3].dependencies, vec!["api"]);
    assert!(plan.iter().all(|m| m.status == MilestoneStatus::Pending));
    assert!(plan.validate().is_ok());
}

#[test]
fn test_from_drafts_breaks_cycles() {
    let plan = Plan::from_drafts(vec![draft("a", &["b"]), draft("b", &["a"])]);
    assert_eq!(plan[0].dependencies, vec!["b"]);
    assert!(plan[1].dependencies.is_empty());
    assert!(plan.validate().is_ok());
}

#[test]
fn test_validate_reports_cycle() {
    let plan = Plan::from(vec![
        Milestone::new("a", "A").with_dependencies(["b"]),
        Milestone::new("b", "B").with_dependencies(["a"]),
    ]);
    assert!(matches!(plan.validate(), Err(FactoryError::CyclicDependency { .. })));
}
