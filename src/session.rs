//! Caller-owned planning state and its pure transitions.
//!
//! The engine keeps nothing between calls. A planning front end holds a
//! [`PlanningState`] and feeds every user action through [`transition`],
//! which returns the next state.

use crate::constructive::suggest_distribution;
use crate::dispatch::StrategyId;
use crate::models::AssignmentVector;

/// Planning state for one point set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlanningState {
    /// Number of days being planned.
    pub n_days: usize,
    /// Points per day.
    pub plan: Vec<usize>,
    /// Selected strategy.
    pub strategy: Option<StrategyId>,
    /// Latest assignment, including manual overrides.
    pub assignment: Option<AssignmentVector>,
    /// `true` while `assignment` reflects the current day count and strategy.
    pub algorithm_applied: bool,
    /// `true` once the current assignment has been saved.
    pub changes_saved: bool,
}

impl PlanningState {
    /// Starts planning `total` points over `n_days` days with an even plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_dayplan::session::PlanningState;
    ///
    /// let state = PlanningState::new(10, 3);
    /// assert_eq!(state.plan, vec![4, 3, 3]);
    /// assert!(!state.algorithm_applied);
    /// ```
    pub fn new(total: usize, n_days: usize) -> Self {
        Self {
            n_days,
            plan: suggest_distribution(total, n_days),
            ..Self::default()
        }
    }

    fn planned_points(&self) -> usize {
        self.assignment
            .as_ref()
            .map_or_else(|| self.plan.iter().sum(), AssignmentVector::len)
    }
}

/// User actions on a [`PlanningState`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlanningAction {
    /// Changes the number of days; the plan is redistributed evenly.
    SetDayCount(usize),
    /// Replaces the per-day counts.
    SetPlan(Vec<usize>),
    /// Picks a strategy.
    SelectStrategy(StrategyId),
    /// Stores the assignment a strategy produced.
    ApplyResult(AssignmentVector),
    /// Moves points to `day` (`None` unassigns them).
    OverrideDays {
        /// Point ids to move.
        ids: Vec<u64>,
        /// Target day.
        day: Option<usize>,
    },
    /// Records that the current assignment was saved.
    MarkSaved,
}

/// Applies `action` to `state`.
///
/// Changing the day count or the strategy clears `algorithm_applied`;
/// applying a result sets it. Overrides edit the assignment and clear
/// `changes_saved`; ids not in the assignment and days outside its range
/// are ignored.
///
/// # Examples
///
/// ```
/// use u_dayplan::dispatch::StrategyId;
/// use u_dayplan::session::{transition, PlanningAction, PlanningState};
///
/// let state = PlanningState::new(6, 2);
/// let state = transition(state, PlanningAction::SelectStrategy(StrategyId::Sweep));
/// assert_eq!(state.strategy, Some(StrategyId::Sweep));
/// let state = transition(state, PlanningAction::SetDayCount(3));
/// assert_eq!(state.plan, vec![2, 2, 2]);
/// assert!(!state.algorithm_applied);
/// ```
pub fn transition(mut state: PlanningState, action: PlanningAction) -> PlanningState {
    match action {
        PlanningAction::SetDayCount(n_days) => {
            if n_days != state.n_days {
                state.plan = suggest_distribution(state.planned_points(), n_days);
                state.n_days = n_days;
                state.algorithm_applied = false;
            }
        }
        PlanningAction::SetPlan(plan) => {
            if plan.len() != state.n_days {
                state.n_days = plan.len();
                state.algorithm_applied = false;
            }
            state.plan = plan;
        }
        PlanningAction::SelectStrategy(strategy) => {
            if state.strategy != Some(strategy) {
                state.strategy = Some(strategy);
                state.algorithm_applied = false;
            }
        }
        PlanningAction::ApplyResult(assignment) => {
            state.assignment = Some(assignment);
            state.algorithm_applied = true;
            state.changes_saved = false;
        }
        PlanningAction::OverrideDays { ids, day } => {
            if let Some(assignment) = state.assignment.as_mut() {
                if day.map_or(true, |d| d < assignment.n_days()) {
                    for id in ids {
                        if let Some(index) = assignment.ids().iter().position(|&x| x == id) {
                            assignment.set_day_at(index, day);
                        }
                    }
                    state.changes_saved = false;
                }
            }
        }
        PlanningAction::MarkSaved => state.changes_saved = true,
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Point, PointSet};

    fn applied() -> PlanningState {
        let points = PointSet::new((1..=4).map(|i| Point::new(i, 0.0, 0.0)).collect()).expect("valid");
        let a = AssignmentVector::new(&points, vec![Some(0), Some(0), Some(1), Some(1)], 2);
        let state = PlanningState::new(4, 2);
        let state = transition(state, PlanningAction::SelectStrategy(StrategyId::Manual));
        transition(state, PlanningAction::ApplyResult(a))
    }

    #[test]
    fn test_apply_sets_flag() {
        let state = applied();
        assert!(state.algorithm_applied);
        assert!(!state.changes_saved);
    }

    #[test]
    fn test_day_count_change_clears_flag() {
        let state = transition(applied(), PlanningAction::SetDayCount(3));
        assert!(!state.algorithm_applied);
        assert_eq!(state.plan, vec![2, 1, 1]);
    }

    #[test]
    fn test_same_day_count_keeps_flag() {
        let state = transition(applied(), PlanningAction::SetDayCount(2));
        assert!(state.algorithm_applied);
    }

    #[test]
    fn test_strategy_change_clears_flag() {
        let same = transition(applied(), PlanningAction::SelectStrategy(StrategyId::Manual));
        assert!(same.algorithm_applied);
        let other = transition(applied(), PlanningAction::SelectStrategy(StrategyId::Zone));
        assert!(!other.algorithm_applied);
    }

    #[test]
    fn test_override_and_save() {
        let state = transition(applied(), PlanningAction::MarkSaved);
        assert!(state.changes_saved);
        let state = transition(
            state,
            PlanningAction::OverrideDays {
                ids: vec![1, 99],
                day: Some(1),
            },
        );
        assert!(!state.changes_saved);
        let a = state.assignment.as_ref().expect("assignment");
        assert_eq!(a.labels(), vec![1, 0, 1, 1]);

        let state = transition(state, PlanningAction::OverrideDays { ids: vec![3], day: None });
        assert_eq!(state.assignment.as_ref().expect("assignment").label(3), Some(-1));
    }

    #[test]
    fn test_override_out_of_range_ignored() {
        let before = applied();
        let after = transition(
            before.clone(),
            PlanningAction::OverrideDays {
                ids: vec![1],
                day: Some(5),
            },
        );
        assert_eq!(after.assignment, before.assignment);
    }

    #[test]
    fn test_rejected_override_keeps_saved() {
        let saved = transition(applied(), PlanningAction::MarkSaved);
        let after = transition(
            saved.clone(),
            PlanningAction::OverrideDays {
                ids: vec![2],
                day: Some(2),
            },
        );
        assert!(after.changes_saved);
        assert_eq!(after, saved);
    }

    #[test]
    fn test_set_plan() {
        let state = transition(PlanningState::new(4, 2), PlanningAction::SetPlan(vec![1, 1, 2]));
        assert_eq!(state.n_days, 3);
        assert_eq!(state.plan, vec![1, 1, 2]);
    }

    #[test]
    fn test_override_without_assignment_is_noop() {
        let state = PlanningState::new(4, 2);
        let next = transition(
            state.clone(),
            PlanningAction::OverrideDays {
                ids: vec![1],
                day: Some(0),
            },
        );
        assert_eq!(next, state);
    }
}
