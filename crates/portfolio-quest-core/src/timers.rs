//! Host-side timers: the delayed game start and the `dedicated` poll.
//!
//! Neither timer owns a thread. The session polls them from
//! [`GameSession::tick`](crate::session::GameSession::tick) with the
//! current instant; dropping the session drops the timers.

use std::time::Duration;

use portfolio_quest_logic::{Intent, PlayerName, Timestamp};

/// Start screen submission waiting out its intro animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredStart {
    name: PlayerName,
    due_at: Timestamp,
}

impl DeferredStart {
    pub fn new(name: PlayerName, requested_at: Timestamp, delay: Duration) -> Self {
        Self {
            name,
            due_at: requested_at.saturating_add(delay),
        }
    }

    pub fn due_at(&self) -> Timestamp {
        self.due_at
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        now >= self.due_at
    }

    pub fn into_intent(self) -> Intent {
        Intent::start_game(self.name)
    }
}

/// Fixed-period check, disarmed until [`arm`](Self::arm) is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringCheck {
    period: Duration,
    next_due: Option<Timestamp>,
}

impl RecurringCheck {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// First firing one period after `now`.
    pub fn arm(&mut self, now: Timestamp) {
        self.next_due = Some(now.saturating_add(self.period));
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// `true` if a period has elapsed; reschedules one period after `now`.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now.saturating_add(self.period));
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn deferred_start_waits_for_delay() {
        let name = PlayerName::parse("Ada").unwrap();
        let pending = DeferredStart::new(name.clone(), t(1_000), Duration::from_millis(1_000));
        assert!(!pending.is_due(t(1_999)));
        assert!(pending.is_due(t(2_000)));
        assert_eq!(pending.into_intent(), Intent::start_game(name));
    }

    #[test]
    fn recurring_check_disarmed_never_fires() {
        let mut check = RecurringCheck::new(Duration::from_secs(10));
        assert!(!check.poll(t(u64::MAX)));
    }

    #[test]
    fn recurring_check_fires_each_period() {
        let mut check = RecurringCheck::new(Duration::from_secs(10));
        check.arm(t(0));
        assert!(!check.poll(t(9_999)));
        assert!(check.poll(t(10_000)));
        assert!(!check.poll(t(15_000)));
        assert!(check.poll(t(20_000)));
        check.cancel();
        assert!(!check.is_armed());
        assert!(!check.poll(t(40_000)));
    }
}
