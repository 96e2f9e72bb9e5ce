use std::time::Duration;

/// Deferred work the session schedules on its timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Job {
    /// Advance the simulation by one step.
    Tick,
    /// Rebuild the game state after a game ended.
    Reset,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due: Duration,
    sequence: u64,
    job: Job,
}

/// Virtual clock holding the jobs waiting to fire.
///
/// Jobs fire in due order; jobs sharing a due time fire in the order they were
/// scheduled. The clock only moves when the host advances it.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    now: Duration,
    next_sequence: u64,
    pending: Vec<Scheduled>,
}

impl Timeline {
    /// Creates an empty timeline at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `job` to fire `delay` after the current time.
    pub fn schedule(&mut self, job: Job, delay: Duration) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.pending.push(Scheduled {
            due: self.now.saturating_add(delay),
            sequence,
            job,
        });
    }

    /// Drops every pending occurrence of `job`.
    pub fn cancel(&mut self, job: Job) {
        self.pending.retain(|scheduled| scheduled.job != job);
    }

    /// Reports whether `job` is waiting to fire.
    #[must_use]
    pub fn is_scheduled(&self, job: Job) -> bool {
        self.pending.iter().any(|scheduled| scheduled.job == job)
    }

    /// Time at which `job` fires next, if scheduled.
    #[must_use]
    pub fn due(&self, job: Job) -> Option<Duration> {
        self.pending
            .iter()
            .filter(|scheduled| scheduled.job == job)
            .map(|scheduled| scheduled.due)
            .min()
    }

    /// Moves the clock forward without firing anything.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    /// Removes and returns the earliest job that is due.
    pub fn pop_due(&mut self) -> Option<Job> {
        let now = self.now;
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, scheduled)| scheduled.due <= now)
            .min_by_key(|(_, scheduled)| (scheduled.due, scheduled.sequence))?;
        Some(self.pending.swap_remove(index).job)
    }
}
