//! Simulation-time delayed actions.

use std::time::Duration;

/// Work the orchestrator defers until a delay elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Start the next wave.
    StartWave,
    /// Open the intermission quiz.
    BeginQuiz,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    remaining: Duration,
    action: ScheduledAction,
}

/// Queue of delayed actions driven by simulation time.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the action to run once `delay` of simulation time has elapsed.
    pub fn schedule(&mut self, delay: Duration, action: ScheduledAction) {
        self.entries.push(Entry {
            remaining: delay,
            action,
        });
    }

    /// Drops every queued instance of the action.
    pub fn cancel(&mut self, action: ScheduledAction) {
        self.entries.retain(|entry| entry.action != action);
    }

    /// Advances every delay and returns the actions that came due, in the order
    /// they were scheduled.
    pub fn advance(&mut self, dt: Duration) -> Vec<ScheduledAction> {
        let mut due = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.remaining = entry.remaining.saturating_sub(dt);
            if entry.remaining.is_zero() {
                due.push(entry.action);
                false
            } else {
                true
            }
        });
        due
    }

    /// Time left before the next queued action runs.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.remaining).min()
    }

    /// Reports whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every queued action.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_fire_once_their_delay_elapses() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(2000), ScheduledAction::StartWave);

        assert!(scheduler.advance(Duration::from_millis(1999)).is_empty());
        assert_eq!(scheduler.next_due(), Some(Duration::from_millis(1)));
        assert_eq!(
            scheduler.advance(Duration::from_millis(1)),
            vec![ScheduledAction::StartWave]
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn due_actions_keep_scheduling_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(30), ScheduledAction::BeginQuiz);
        scheduler.schedule(Duration::from_millis(10), ScheduledAction::StartWave);

        assert_eq!(
            scheduler.advance(Duration::from_millis(50)),
            vec![ScheduledAction::BeginQuiz, ScheduledAction::StartWave]
        );
    }

    #[test]
    fn cancel_drops_matching_actions() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(Duration::from_millis(10), ScheduledAction::StartWave);
        scheduler.schedule(Duration::from_millis(10), ScheduledAction::BeginQuiz);

        scheduler.cancel(ScheduledAction::StartWave);

        assert_eq!(
            scheduler.advance(Duration::from_millis(10)),
            vec![ScheduledAction::BeginQuiz]
        );
    }
}
