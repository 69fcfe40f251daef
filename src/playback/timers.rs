use std::collections::{BTreeMap, HashMap};

/// Identity of one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Everything a session ever schedules. Actions are plain data; the
/// controller interprets them when they come due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    ClearBanner,
    ResumeSecondHalf,
    VarPulse,
    VarResolve,
    VarExit,
    SummaryReady,
}

/// One-off timers keyed on session time (the sum of elapsed tick periods).
///
/// Due timers come out in deadline order; equal deadlines keep scheduling
/// order. A popped timer is no longer pending, so its action may freely
/// cancel everything else.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_id: u64,
    by_deadline: BTreeMap<(u64, TimerHandle), TimerAction>,
    deadlines: HashMap<TimerHandle, u64>,
}

impl TimerQueue {
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, action: TimerAction) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let deadline = now_ms.saturating_add(delay_ms);
        self.by_deadline.insert((deadline, handle), action);
        self.deadlines.insert(handle, deadline);
        handle
    }

    /// Returns false if the timer already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let Some(deadline) = self.deadlines.remove(&handle) else {
            return false;
        };
        self.by_deadline.remove(&(deadline, handle));
        true
    }

    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.deadlines.len();
        self.by_deadline.clear();
        self.deadlines.clear();
        cancelled
    }

    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TimerHandle, TimerAction)> {
        let (&(deadline, handle), _) = self.by_deadline.first_key_value()?;
        if deadline > now_ms {
            return None;
        }
        let action = self.by_deadline.remove(&(deadline, handle))?;
        self.deadlines.remove(&handle);
        Some((handle, action))
    }

    #[cfg(test)]
    pub fn contains(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_respects_deadline_then_schedule_order() {
        let mut timers = TimerQueue::default();
        let late = timers.schedule(0, 300, TimerAction::VarExit);
        let first = timers.schedule(0, 100, TimerAction::ClearBanner);
        let second = timers.schedule(0, 100, TimerAction::VarPulse);

        assert_eq!(timers.pop_due(50), None);
        assert_eq!(timers.pop_due(100), Some((first, TimerAction::ClearBanner)));
        assert_eq!(timers.pop_due(100), Some((second, TimerAction::VarPulse)));
        assert_eq!(timers.pop_due(299), None);
        assert_eq!(timers.pop_due(1_000), Some((late, TimerAction::VarExit)));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel_is_one_shot() {
        let mut timers = TimerQueue::default();
        let handle = timers.schedule(0, 10, TimerAction::SummaryReady);
        assert!(timers.contains(handle));
        assert!(timers.cancel(handle));
        assert!(!timers.cancel(handle));
        assert_eq!(timers.pop_due(u64::MAX), None);
    }

    #[test]
    fn test_fired_timer_cannot_be_cancelled() {
        let mut timers = TimerQueue::default();
        let handle = timers.schedule(5, 10, TimerAction::ResumeSecondHalf);
        assert_eq!(timers.pop_due(15), Some((handle, TimerAction::ResumeSecondHalf)));
        assert!(!timers.cancel(handle));
    }

    #[test]
    fn test_cancel_all_counts_pending() {
        let mut timers = TimerQueue::default();
        timers.schedule(0, 1, TimerAction::ClearBanner);
        timers.schedule(0, 2, TimerAction::VarResolve);
        assert_eq!(timers.cancel_all(), 2);
        assert_eq!(timers.cancel_all(), 0);
        assert_eq!(timers.len(), 0);
    }
}
