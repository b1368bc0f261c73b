use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::time::Duration;
use smallvec::SmallVec;

use crate::*;

type Observer<T> = Box<dyn FnMut(&SessionSnapshot<T>)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u32);

/// State owned by a single round, replaced wholesale on restart.
#[derive(Clone, Debug)]
struct Session<T> {
    config: SessionConfig,
    grid: Grid<T>,
    stats: SessionStats,
    phase: SessionPhase,
    selection: Selection,
    hint: Option<(CellIndex, CellIndex)>,
    /// Outcome waiting on the finish delay.
    decided: Option<Outcome>,
    result: Option<SessionResult>,
}

impl<T> Session<T> {
    fn new(config: SessionConfig, grid: Grid<T>, budget: Budget) -> Self {
        let stats = SessionStats::new(grid.pair_count(), budget);
        Self {
            config,
            grid,
            stats,
            phase: SessionPhase::Idle,
            selection: Selection::default(),
            hint: None,
            decided: None,
            result: None,
        }
    }
}

/// Session state machine shared by every game variant.
///
/// All mutation happens through `&mut self`; delays are handed out as
/// [`ScheduledTask`]s which the host fires back once they are due.
pub struct MatchEngine<T: Token> {
    rules: RuleSet,
    pool: Vec<T>,
    generator: RandomPairGenerator,
    session: Session<T>,
    generation: Generation,
    next_task_id: u64,
    live_tasks: SmallVec<[ScheduledTask; 4]>,
    outbox: Vec<ScheduledTask>,
    observers: Vec<(ObserverId, Observer<T>)>,
    next_observer_id: u32,
    keeper: Option<Arc<dyn ScoreKeeper + Send + Sync>>,
}

impl<T: Token> MatchEngine<T> {
    /// Starts a first session with an unseeded shuffle.
    #[cfg(feature = "std")]
    pub fn new(rules: RuleSet, pool: Vec<T>, config: SessionConfig) -> Result<Self> {
        Self::with_generator(rules, pool, config, RandomPairGenerator::from_entropy())
    }

    /// Starts a first session with a reproducible shuffle.
    pub fn with_seed(rules: RuleSet, pool: Vec<T>, config: SessionConfig, seed: u64) -> Result<Self> {
        Self::with_generator(rules, pool, config, RandomPairGenerator::from_seed(seed))
    }

    fn with_generator(
        rules: RuleSet,
        pool: Vec<T>,
        config: SessionConfig,
        mut generator: RandomPairGenerator,
    ) -> Result<Self> {
        let grid = generator.generate(rules.effective_grid_size(&config), &pool)?;
        let budget = rules.termination.initial_budget(config.grid_size());
        let mut engine = Self {
            rules,
            pool,
            generator,
            session: Session::new(config, grid, budget),
            generation: Generation::default(),
            next_task_id: 0,
            live_tasks: SmallVec::new(),
            outbox: Vec::new(),
            observers: Vec::new(),
            next_observer_id: 0,
            keeper: None,
        };
        engine.activate();
        Ok(engine)
    }

    pub fn set_score_keeper(&mut self, keeper: Arc<dyn ScoreKeeper + Send + Sync>) {
        self.keeper = Some(keeper);
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    pub fn is_ended(&self) -> bool {
        self.session.phase.is_ended()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.session.stats
    }

    pub fn grid(&self) -> &Grid<T> {
        &self.session.grid
    }

    pub fn selection(&self) -> Selection {
        self.session.selection
    }

    pub fn level(&self) -> Level {
        self.session.config.level()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.session.result.as_ref()
    }

    pub fn snapshot(&self) -> SessionSnapshot<T> {
        SessionSnapshot {
            generation: self.generation,
            level: self.session.config.level(),
            grid: self.session.grid.clone(),
            stats: self.session.stats,
            phase: self.session.phase,
            selection: self.session.selection,
            hint: self.session.hint,
            result: self.session.result,
        }
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&SessionSnapshot<T>) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer_id);
        self.next_observer_id = self.next_observer_id.wrapping_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Tasks scheduled since the last call, in scheduling order.
    pub fn drain_scheduled(&mut self) -> Vec<ScheduledTask> {
        core::mem::take(&mut self.outbox)
    }

    /// Discards the current round and deals a fresh grid.
    pub fn start_session(&mut self, grid_size: GridSize, level: Level) -> Result<()> {
        let config = SessionConfig::new(grid_size, level)?;
        let grid = self
            .generator
            .generate(self.rules.effective_grid_size(&config), &self.pool)?;
        self.begin(config, grid);
        Ok(())
    }

    /// Same as [`Self::start_session`], legal from any phase.
    pub fn restart(&mut self, grid_size: GridSize, level: Level) -> Result<()> {
        self.start_session(grid_size, level)
    }

    /// Starts a session on a prepared layout instead of a shuffled one.
    ///
    /// Rules that deal even grids reject odd layouts.
    pub fn start_with_grid(&mut self, grid: Grid<T>, level: Level) -> Result<()> {
        let config = SessionConfig::new(grid.size(), level)?;
        if self.rules.even_grid && grid.size() % 2 == 1 {
            return Err(GameError::OddGrid(grid.size()));
        }
        self.begin(config, grid);
        Ok(())
    }

    fn begin(&mut self, config: SessionConfig, grid: Grid<T>) {
        let budget = self.rules.termination.initial_budget(config.grid_size());
        self.session = Session::new(config, grid, budget);
        self.activate();
    }

    /// Invalidates every task of the previous session and arms the new one.
    fn activate(&mut self) {
        self.cancel_all();
        self.outbox.clear();
        self.generation = self.generation.next();

        let budget = self.session.stats.budget;
        log::debug!(
            "Session {:?} started, level {}, {} cells, {:?}",
            self.generation,
            self.session.config.level(),
            self.session.grid.total_cells(),
            budget
        );

        if let Budget::Time(_) = budget {
            self.schedule(TaskKind::Tick, self.rules.pacing.tick_interval);
        }
        self.notify();
    }

    /// Reveals a cell; the second distinct cell queues the pair for resolution.
    ///
    /// Matched or face-up cells, and any tap while resolving or after the
    /// end, are no-ops.
    pub fn select_cell(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        let index = self.session.grid.validate_index(index)?;

        if !self.session.phase.accepts_taps() || self.session.grid[index].is_matched() {
            return Ok(SelectOutcome::NoChange);
        }

        let hint_dismissed = self.dismiss_hint();
        if self.session.grid[index].is_revealed() {
            if hint_dismissed {
                self.notify();
            }
            return Ok(SelectOutcome::NoChange);
        }

        self.session.grid[index].reveal();
        log::trace!("Revealed cell {}", index);

        let Some(first) = self.session.selection.first else {
            self.session.selection.first = Some(index);
            self.session.phase = SessionPhase::OneSelected;
            self.notify();
            return Ok(SelectOutcome::Revealed);
        };
        debug_assert_ne!(first, index);

        self.session.selection.second = Some(index);
        self.session.selection.processing = true;
        self.session.stats.moves += 1;
        self.session.phase = SessionPhase::Resolving;

        let delay = self.rules.pacing.resolve_delay;
        if delay.is_zero() {
            return Ok(SelectOutcome::Resolved(self.resolve_pending()));
        }
        self.schedule(TaskKind::ResolvePair, delay);
        self.notify();
        Ok(SelectOutcome::PairPending)
    }

    /// Compares the pending pair, normally fired by the resolve delay.
    pub fn resolve_pending(&mut self) -> Resolution {
        let Selection {
            first: Some(first),
            second: Some(second),
            ..
        } = self.session.selection
        else {
            return Resolution::NoChange;
        };
        if !matches!(self.session.phase, SessionPhase::Resolving) {
            return Resolution::NoChange;
        }

        self.cancel_kind(TaskKind::ResolvePair);
        self.session.selection = Selection::default();

        let grid = &mut self.session.grid;
        let is_match = grid[first].token().matches(grid[second].token());
        let resolution = if is_match {
            grid[first].mark_matched();
            grid[second].mark_matched();
            let stats = &mut self.session.stats;
            stats.score += MATCH_POINTS;
            stats.matched_pairs += 1;
            log::debug!(
                "Matched {} and {}, {}/{} pairs",
                first,
                second,
                stats.matched_pairs,
                stats.pair_count
            );

            let score = stats.score;
            let all_matched = stats.all_matched();
            if let Some(keeper) = &self.keeper {
                keeper.score_changed(score, self.session.config.level());
            }

            if all_matched {
                Resolution::Won
            } else {
                Resolution::Matched
            }
        } else {
            grid[first].hide();
            grid[second].hide();
            log::debug!("Mismatched {} and {}", first, second);

            match &mut self.session.stats.budget {
                Budget::Lives(lives) => {
                    *lives = lives.saturating_sub(1);
                    if *lives == 0 {
                        Resolution::Lost
                    } else {
                        Resolution::Mismatched
                    }
                }
                Budget::Time(_) => Resolution::Mismatched,
            }
        };

        match resolution.outcome() {
            Some(outcome) => self.decide(outcome),
            None => {
                self.session.phase = SessionPhase::Idle;
                self.notify();
            }
        }
        resolution
    }

    /// One countdown second; running out ends the session as lost.
    pub fn tick(&mut self) -> TickOutcome {
        if self.session.phase.is_ended() || self.session.decided.is_some() {
            return TickOutcome::NoChange;
        }
        let Budget::Time(remaining) = &mut self.session.stats.budget else {
            return TickOutcome::NoChange;
        };

        *remaining = remaining.saturating_sub(1);
        if *remaining > 0 {
            let remaining = *remaining;
            self.notify();
            return TickOutcome::Counted(remaining);
        }

        log::debug!("Time is up for session {:?}", self.generation);
        self.session.selection = Selection::default();
        self.end_session(Outcome::Lost);
        TickOutcome::TimeUp
    }

    /// Briefly shows the first face-down pair, if there is one.
    pub fn hint(&mut self) -> HintOutcome {
        if !matches!(self.session.phase, SessionPhase::Idle) || self.session.hint.is_some() {
            return HintOutcome::NoChange;
        }
        let Some((a, b)) = self.session.grid.first_hidden_pair() else {
            return HintOutcome::NoChange;
        };

        self.session.grid[a].reveal();
        self.session.grid[b].reveal();
        self.session.hint = Some((a, b));
        log::debug!("Hint shows {} and {}", a, b);

        self.schedule(TaskKind::HideHint, self.rules.pacing.hint_duration);
        self.notify();
        HintOutcome::Shown(a, b)
    }

    /// Runs a due task. Returns `false` for stale or cancelled tasks.
    pub fn fire(&mut self, task: ScheduledTask) -> bool {
        if task.generation() != self.generation {
            log::debug!(
                "Dropping {:?} from session {:?}, current is {:?}",
                task.kind(),
                task.generation(),
                self.generation
            );
            return false;
        }
        let Some(pos) = self.live_tasks.iter().position(|live| live.id() == task.id()) else {
            log::debug!("Dropping cancelled {:?}", task.kind());
            return false;
        };
        self.live_tasks.remove(pos);

        match task.kind() {
            TaskKind::ResolvePair => {
                self.resolve_pending();
            }
            TaskKind::FinishSession => {
                if let Some(outcome) = self.session.decided {
                    self.end_session(outcome);
                }
            }
            TaskKind::HideHint => {
                if self.dismiss_hint() {
                    self.notify();
                }
            }
            TaskKind::Tick => {
                if let TickOutcome::Counted(_) = self.tick() {
                    self.schedule(TaskKind::Tick, self.rules.pacing.tick_interval);
                }
            }
        }
        true
    }

    fn decide(&mut self, outcome: Outcome) {
        self.cancel_kind(TaskKind::Tick);

        let delay = self.rules.pacing.finish_delay;
        if delay.is_zero() {
            self.end_session(outcome);
            return;
        }

        self.session.decided = Some(outcome);
        self.session.phase = SessionPhase::Resolving;
        self.session.selection.processing = true;
        self.schedule(TaskKind::FinishSession, delay);
        self.notify();
    }

    /// Freezes the result and hands wins to the score keeper.
    fn end_session(&mut self, outcome: Outcome) {
        if self.session.phase.is_ended() {
            return;
        }

        self.cancel_all();
        self.dismiss_hint();
        let session = &mut self.session;
        session.decided = None;
        session.selection.processing = false;
        session.phase = SessionPhase::Ended(outcome);

        let result = SessionResult::freeze(outcome, &session.stats, session.config.level());
        session.result = Some(result);
        log::debug!("Session {:?} ended: {:?}", self.generation, result);

        if result.won {
            if let Some(keeper) = &self.keeper {
                keeper.session_won(&result);
            }
        }
        self.notify();
    }

    fn dismiss_hint(&mut self) -> bool {
        let Some((a, b)) = self.session.hint.take() else {
            return false;
        };
        self.session.grid[a].hide();
        self.session.grid[b].hide();
        self.cancel_kind(TaskKind::HideHint);
        true
    }

    fn schedule(&mut self, kind: TaskKind, delay: Duration) {
        let task = ScheduledTask::new(TaskId(self.next_task_id), self.generation, kind, delay);
        self.next_task_id += 1;
        self.live_tasks.push(task);
        self.outbox.push(task);
    }

    fn cancel_kind(&mut self, kind: TaskKind) {
        self.live_tasks.retain(|task| task.kind() != kind);
    }

    fn cancel_all(&mut self) {
        self.live_tasks.clear();
    }

    fn notify(&mut self) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
    }
}

impl<T: Token> core::fmt::Debug for MatchEngine<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("rules", &self.rules)
            .field("generation", &self.generation)
            .field("session", &self.session)
            .field("live_tasks", &self.live_tasks)
            .finish_non_exhaustive()
    }
}
