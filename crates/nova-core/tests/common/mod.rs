use std::sync::Arc;

use nova_core::{capability::PlanDraft, Orchestrator, OrchestratorBuilder, ScriptedCapabilities};
use tempfile::TempDir;

/// Helper function to create a test orchestrator backed by a temporary database
pub async fn create_test_orchestrator(
    capabilities: Arc<ScriptedCapabilities>,
) -> (TempDir, Orchestrator) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let orchestrator = OrchestratorBuilder::new()
        .with_database_path(Some(&db_path))
        .with_capabilities(capabilities)
        .build()
        .await
        .expect("Failed to create orchestrator");
    (temp_dir, orchestrator)
}

/// Reopens the database in `temp_dir` without capabilities.
pub async fn reopen(temp_dir: &TempDir) -> Orchestrator {
    OrchestratorBuilder::new()
        .with_database_path(Some(temp_dir.path().join("test.db")))
        .build()
        .await
        .expect("Failed to reopen orchestrator")
}

/// The two-milestone example: `b` depends on `a`.
pub fn two_step_plan() -> Vec<PlanDraft> {
    vec![
        PlanDraft::new("a", "Scaffold"),
        PlanDraft::new("b", "Wire API").with_dependencies(["a"]),
    ]
}
