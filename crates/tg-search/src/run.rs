//! Search run lifecycle tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state for a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Bookkeeping record for one grid search: identity, timing, progress
/// counters, and the outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRun {
    pub id: Uuid,
    pub state: RunState,
    pub candidates: usize,
    pub folds: usize,
    /// candidates * folds scoring units, excluding the final refit.
    pub units_total: usize,
    pub units_completed: usize,
    pub best_mean: Option<f64>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SearchRun {
    pub fn new(candidates: usize, folds: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RunState::Pending,
            candidates,
            folds,
            units_total: candidates * folds,
            units_completed: 0,
            best_mean: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.state = RunState::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn complete_unit(&mut self) {
        self.units_completed += 1;
    }

    pub fn mark_completed(&mut self, best_mean: f64) {
        self.state = RunState::Completed;
        self.best_mean = Some(best_mean);
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: String) {
        self.state = RunState::Failed;
        self.error = Some(error);
        self.finished_at = Some(Utc::now());
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, RunState::Completed | RunState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_transitions() {
        let mut run = SearchRun::new(12, 2);
        assert_eq!(run.state, RunState::Pending);
        assert_eq!(run.units_total, 24);
        assert!(run.started_at.is_none());

        run.mark_running();
        assert_eq!(run.state, RunState::Running);
        assert!(run.started_at.is_some());
        assert!(!run.is_finished());

        for _ in 0..24 {
            run.complete_unit();
        }
        run.mark_completed(0.87);
        assert_eq!(run.state, RunState::Completed);
        assert_eq!(run.units_completed, 24);
        assert_eq!(run.best_mean, Some(0.87));
        assert!(run.is_finished());
    }

    #[test]
    fn failure_records_the_error() {
        let mut run = SearchRun::new(3, 5);
        run.mark_running();
        run.mark_failed("training diverged".to_string());
        assert_eq!(run.state, RunState::Failed);
        assert_eq!(run.error.as_deref(), Some("training diverged"));
        assert!(run.finished_at.is_some());
        assert!(run.best_mean.is_none());
    }

    #[test]
    fn serialization_round_trip() {
        let run = SearchRun::new(4, 3);
        let json = serde_json::to_string(&run).unwrap();
        let back: SearchRun = serde_json::from_str(&json).unwrap();
        assert_eq!(run, back);
    }
}
