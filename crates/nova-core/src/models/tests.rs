#[cfg(test)]
mod model_tests {
    use jiff::Timestamp;

    use crate::models::{
        FileKind, LogEntry, LogStream, Milestone, MilestoneStatus, Plan, ProjectFile,
        ProjectState, ProjectStatus, Severity, View, Visual,
    };

    fn create_test_plan() -> Plan {
        Plan::from(vec![
            Milestone::new("research", "Research")
                .with_description("Survey prior art")
                .with_status(MilestoneStatus::Done),
            Milestone::new("api", "Build API")
                .with_dependencies(["research"])
                .with_status(MilestoneStatus::Running),
            Milestone::new("ui", "Design UI").with_dependencies(["api"]),
        ])
    }

    #[test]
    fn test_milestone_status_from_str() {
        assert_eq!("pending".parse::<MilestoneStatus>(), Ok(MilestoneStatus::Pending));
        assert_eq!("RUNNING".parse::<MilestoneStatus>(), Ok(MilestoneStatus::Running));
        assert_eq!("done".parse::<MilestoneStatus>(), Ok(MilestoneStatus::Done));
        assert_eq!("failed".parse::<MilestoneStatus>(), Ok(MilestoneStatus::Failed));
        assert!("finished".parse::<MilestoneStatus>().is_err());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&MilestoneStatus::Running).unwrap(),
            "\"running\""
        );
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Designing).unwrap(),
            "\"DESIGNING\""
        );
        assert_eq!(ProjectStatus::Completed.as_str(), "COMPLETED");
        assert!(ProjectStatus::Testing.is_active());
        assert!(!ProjectStatus::Failed.is_active());
    }

    #[test]
    fn test_plan_progress() {
        let plan = create_test_plan();
        assert_eq!(plan.completed(), 1);
        assert!((plan.progress() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(plan.next_pending(), Some(1));
        assert!(!plan.is_complete());
        assert_eq!(Plan::new().progress(), 0.0);
        assert!(!Plan::new().is_complete());
    }

    #[test]
    fn test_plan_lookup() {
        let plan = create_test_plan();
        assert_eq!(plan.ids(), vec!["research", "api", "ui"]);
        assert_eq!(plan.position("ui"), Some(2));
        assert_eq!(plan.status_of("api"), Some(MilestoneStatus::Running));
        assert!(plan.get("missing").is_none());
        assert!(plan[1].depends_on("research"));
    }

    #[test]
    fn test_file_kind_from_path() {
        assert_eq!(FileKind::from_path("src/main.rs"), FileKind::Code);
        assert_eq!(FileKind::from_path("README.md"), FileKind::Doc);
        assert_eq!(FileKind::from_path("assets/logo.PNG"), FileKind::Image);
        assert_eq!(FileKind::from_path("config/app.json"), FileKind::Data);
        assert_eq!(FileKind::from_path("Makefile"), FileKind::Code);
    }

    #[test]
    fn test_project_file_new_derives_name() {
        let file = ProjectFile::new("web/index.html", "<html></html>").with_language("html");
        assert_eq!(file.name, "index.html");
        assert_eq!(file.kind, FileKind::Code);
        assert_eq!(file.label(), "HTML");
        assert_eq!(file.language.as_deref(), Some("html"));
    }

    #[test]
    fn test_project_file_deserializes_synthesis_shape() {
        let json = r#"{"name":"app.py","path":"app.py","content":"print(1)","language":"python"}"#;
        let file: ProjectFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.kind, FileKind::Code);
        assert_eq!(file.language.as_deref(), Some("python"));
    }

    #[test]
    fn test_log_stream_is_newest_first() {
        let mut logs = LogStream::default();
        logs.push(LogEntry::new("Planner", "first", Severity::Info));
        logs.push(LogEntry::new("Coder", "second", Severity::Warning));

        assert_eq!(logs.len(), 2);
        assert_eq!(logs.latest().unwrap().message, "second");
        assert_eq!(logs.entries()[1].message, "first");
        assert_ne!(logs.entries()[0].id, logs.entries()[1].id);
    }

    #[test]
    fn test_files_context_format() {
        let state = ProjectState {
            files: vec![
                ProjectFile::new("a.txt", "alpha"),
                ProjectFile::new("b.txt", "beta"),
            ],
            ..Default::default()
        };
        assert_eq!(state.files_context(), "FILE: a.txt\nalpha\n\nFILE: b.txt\nbeta");
        assert_eq!(ProjectState::default().files_context(), "");
    }

    #[test]
    fn test_file_lookup_prefers_latest() {
        let state = ProjectState {
            files: vec![
                ProjectFile::new("main.js", "v1"),
                ProjectFile::new("main.js", "v2"),
            ],
            ..Default::default()
        };
        assert_eq!(state.file("main.js").unwrap().content, "v2");
    }

    #[test]
    fn test_preferred_view() {
        let mut state = ProjectState {
            plan: create_test_plan(),
            files: vec![ProjectFile::new("index.html", "")],
            ..Default::default()
        };
        assert_eq!(state.preferred_view(), View::Plan);

        state.plan = Plan::from(vec![
            Milestone::new("a", "A").with_status(MilestoneStatus::Done)
        ]);
        assert_eq!(state.preferred_view(), View::Files);
    }

    #[test]
    fn test_project_state_round_trip_preserves_instant() {
        let mut state = ProjectState {
            status: ProjectStatus::Completed,
            prompt: "todo app".to_string(),
            plan: create_test_plan(),
            files: vec![ProjectFile::new("index.html", "<html></html>")],
            visuals: vec![Visual::diagram(Visual::BLUEPRINT_TITLE, "<svg/>")],
            ..Default::default()
        };
        let mut entry = LogEntry::new("System", "restored", Severity::Success);
        entry.timestamp = Timestamp::from_second(1640995200).unwrap();
        state.logs.push(entry);

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"2022-01-01T00:00:00Z\""));

        let restored: ProjectState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
        assert_eq!(
            restored.logs.latest().unwrap().timestamp,
            Timestamp::from_second(1640995200).unwrap()
        );
    }

    #[test]
    fn test_blank_state() {
        let mut state = ProjectState::default();
        assert!(state.is_blank());
        state.log("System", "hello", Severity::Info);
        assert!(!state.is_blank());
    }
}
