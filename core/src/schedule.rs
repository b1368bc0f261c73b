use core::time::Duration;
use serde::{Deserialize, Serialize};

/// Identifies one session; bumped on every start or restart.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u32);

impl Generation {
    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u64);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Compare the two face-up cells.
    ResolvePair,
    /// Move a decided session into `Ended`.
    FinishSession,
    /// Flip a hinted pair back down.
    HideHint,
    /// One countdown second elapsed.
    Tick,
}

/// A callback the engine wants fired after `delay`.
///
/// Hosts hand it back through `MatchEngine::fire`; tasks from an older
/// generation, or cancelled in the meantime, are ignored there.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledTask {
    id: TaskId,
    generation: Generation,
    kind: TaskKind,
    delay: Duration,
}

impl ScheduledTask {
    pub(crate) const fn new(
        id: TaskId,
        generation: Generation,
        kind: TaskKind,
        delay: Duration,
    ) -> Self {
        Self {
            id,
            generation,
            kind,
            delay,
        }
    }

    pub const fn id(&self) -> TaskId {
        self.id
    }

    pub const fn generation(&self) -> Generation {
        self.generation
    }

    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }
}
