use alloc::vec::Vec;
use core::time::Duration;

use crate::*;

/// Fires engine tasks against a logical clock.
///
/// Hosts without their own timer facility feed elapsed time into
/// [`TimerQueue::advance`]; due tasks fire in deadline order, ties in
/// scheduling order.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    pending: Vec<(Duration, ScheduledTask)>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Time left until the earliest pending task is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|(deadline, _)| deadline.saturating_sub(self.now))
            .min()
    }

    /// Collects whatever the engine scheduled since the last call.
    pub fn pump<T: Token>(&mut self, engine: &mut MatchEngine<T>) {
        for task in engine.drain_scheduled() {
            self.pending.push((self.now + task.delay(), task));
        }
    }

    /// Moves the clock forward, firing every task that falls due. Returns
    /// how many tasks the engine accepted.
    pub fn advance<T: Token>(&mut self, engine: &mut MatchEngine<T>, elapsed: Duration) -> usize {
        let target = self.now + elapsed;
        let mut fired = 0;

        loop {
            self.pump(engine);
            let next = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, (deadline, _))| *deadline <= target)
                .min_by_key(|(_, (deadline, task))| (*deadline, task.id()))
                .map(|(pos, _)| pos);
            let Some(pos) = next else {
                break;
            };

            let (deadline, task) = self.pending.remove(pos);
            self.now = self.now.max(deadline);
            if engine.fire(task) {
                fired += 1;
            }
        }

        self.now = target;
        fired
    }

    /// Forgets every pending task, e.g. when the host tears the engine down.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// [`TimerQueue`] driven by the wall clock.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct RealtimeTimer {
    queue: TimerQueue,
    last_poll: web_time::Instant,
}

#[cfg(feature = "std")]
impl RealtimeTimer {
    pub fn new() -> Self {
        Self {
            queue: TimerQueue::new(),
            last_poll: web_time::Instant::now(),
        }
    }

    /// Fires everything that came due since the previous poll.
    pub fn poll<T: Token>(&mut self, engine: &mut MatchEngine<T>) -> usize {
        let now = web_time::Instant::now();
        let elapsed = now.duration_since(self.last_poll);
        self.last_poll = now;
        self.queue.advance(engine, elapsed)
    }

    /// How long the host may sleep before the next poll is useful.
    pub fn next_due<T: Token>(&mut self, engine: &mut MatchEngine<T>) -> Option<Duration> {
        self.queue.pump(engine);
        self.queue.next_due()
    }
}

#[cfg(feature = "std")]
impl Default for RealtimeTimer {
    fn default() -> Self {
        Self::new()
    }
}
