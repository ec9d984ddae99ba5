//! Undo/redo snapshot stacks over the plan.
//!
//! Every manual edit calls [`History::snapshot_before_change`] with the plan
//! as it was before the edit. Undo and redo swap whole snapshots, so they
//! are exact inverses of each other as long as no edit happens in between.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::models::Plan;

/// Undo/redo history of plan snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct History {
    /// Older snapshots, most recent last
    past: Vec<Plan>,
    /// Undone snapshots, most recent first
    future: VecDeque<Plan>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pre-mutation plan and invalidates the redo stack.
    pub fn snapshot_before_change(&mut self, current: &Plan) {
        self.past.push(current.clone());
        self.future.clear();
    }

    /// Steps back one snapshot. Returns the plan to make current, or `None`
    /// when there is nothing to undo.
    pub fn undo(&mut self, current: &Plan) -> Option<Plan> {
        let previous = self.past.pop()?;
        self.future.push_front(current.clone());
        Some(previous)
    }

    /// Steps forward one snapshot; the mirror of [`History::undo`].
    pub fn redo(&mut self, current: &Plan) -> Option<Plan> {
        let next = self.future.pop_front()?;
        self.past.push(current.clone());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Drops both stacks; used when a new planning cycle begins.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

/// History command triggered from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    Undo,
    Redo,
}

/// A key press as seen by the global shortcut handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
    /// The event target is a text input that handles its own undo
    pub in_text_input: bool,
}

impl KeyChord {
    /// Ctrl plus a key.
    pub fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            ..Default::default()
        }
    }
}

/// Maps ctrl/cmd+Z to undo and ctrl/cmd+Y (or ctrl/cmd+shift+Z) to redo.
/// Keys captured by a text input are left alone.
pub fn shortcut(chord: KeyChord) -> Option<HistoryCommand> {
    if chord.in_text_input || !(chord.ctrl || chord.meta) {
        return None;
    }
    match chord.key.to_ascii_lowercase() {
        'z' if chord.shift => Some(HistoryCommand::Redo),
        'z' => Some(HistoryCommand::Undo),
        'y' => Some(HistoryCommand::Redo),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Milestone, MilestoneStatus};

    fn plan_of(ids: &[&str]) -> Plan {
        Plan::from(
            ids.iter()
                .map(|id| Milestone::new(*id, id.to_uppercase()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert_eq!(history.undo(&plan_of(&["a"])), None);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_n_mutations_then_n_undos_restore_original() {
        let mut history = History::new();
        let original = plan_of(&["a", "b"]);
        let mut current = original.clone();

        for id in ["c", "d", "e"] {
            history.snapshot_before_change(&current);
            current.add(Milestone::new(id, "New")).unwrap();
        }
        history.snapshot_before_change(&current);
        current.set_status("a", MilestoneStatus::Failed).unwrap();

        for _ in 0..4 {
            current = history.undo(&current).expect("undo available");
        }
        assert_eq!(current, original);
        assert!(!history.can_undo());
        assert_eq!(history.redo_depth(), 4);
    }

    #[test]
    fn test_redo_after_undo_restores_exactly() {
        let mut history = History::new();
        let mut current = plan_of(&["a"]);
        history.snapshot_before_change(&current);
        current.add(Milestone::new("b", "B")).unwrap();
        let edited = current.clone();

        current = history.undo(&current).unwrap();
        assert_eq!(current, plan_of(&["a"]));
        current = history.redo(&current).unwrap();
        assert_eq!(current, edited);
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let mut history = History::new();
        let mut current = plan_of(&["a"]);
        history.snapshot_before_change(&current);
        current.add(Milestone::new("b", "B")).unwrap();
        current = history.undo(&current).unwrap();
        assert!(history.can_redo());

        history.snapshot_before_change(&current);
        current.add(Milestone::new("c", "C")).unwrap();
        assert!(!history.can_redo());
        assert_eq!(history.redo(&current), None);
    }

    #[test]
    fn test_snapshots_are_deep_copies() {
        let mut history = History::new();
        let mut current = plan_of(&["a"]);
        history.snapshot_before_change(&current);
        current.set_status("a", MilestoneStatus::Done).unwrap();

        let restored = history.undo(&current).unwrap();
        assert_eq!(restored.status_of("a"), Some(MilestoneStatus::Pending));
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.snapshot_before_change(&plan_of(&["a"]));
        history.clear();
        assert_eq!(history.undo_depth(), 0);
        assert_eq!(history.redo_depth(), 0);
    }

    #[test]
    fn test_shortcut_mapping() {
        assert_eq!(shortcut(KeyChord::ctrl('z')), Some(HistoryCommand::Undo));
        assert_eq!(shortcut(KeyChord::ctrl('Z')), Some(HistoryCommand::Undo));
        assert_eq!(shortcut(KeyChord::ctrl('y')), Some(HistoryCommand::Redo));
        assert_eq!(
            shortcut(KeyChord {
                key: 'z',
                meta: true,
                shift: true,
                ..Default::default()
            }),
            Some(HistoryCommand::Redo)
        );
        assert_eq!(
            shortcut(KeyChord {
                key: 'z',
                ..Default::default()
            }),
            None
        );
        assert_eq!(
            shortcut(KeyChord {
                in_text_input: true,
                ..KeyChord::ctrl('z')
            }),
            None
        );
        assert_eq!(shortcut(KeyChord::ctrl('s')), None);
    }
}
