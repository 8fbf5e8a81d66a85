use rand::rngs::SmallRng;

use crate::*;

/// One playthrough: owns the grid, applies the configured variant rules and tracks the state machine
/// `Pending -> Active -> Won | Lost`.
#[derive(Clone, Debug)]
pub struct Session<S = RandomSource<SmallRng>> {
    config: SessionConfig,
    grid: Grid,
    state: SessionState,
    source: S,
    ticks: u32,
    triggered_mine: Option<Coord2>,
}

impl Session<RandomSource<SmallRng>> {
    /// Session drawing mines from a [`SmallRng`] seeded with `config.seed` (0 when unset).
    pub fn from_seed(config: SessionConfig) -> Result<Self> {
        let seed = config.seed.unwrap_or_default();
        Self::new(config, RandomSource::seeded(seed))
    }
}

impl<S: MineSource> Session<S> {
    pub fn new(config: SessionConfig, mut source: S) -> Result<Self> {
        let kernel = config.validate()?;
        let mut grid = Grid::new(config.height, config.width, kernel)?;

        let state = match config.placement {
            Placement::Deferred => SessionState::Pending,
            Placement::Immediate { safe_point } => {
                place_mines(
                    &mut grid,
                    config.mines,
                    safe_point,
                    config.safety_radius,
                    &mut source,
                )?;
                compute_adjacency(&mut grid);
                SessionState::Active
            }
        };
        log::debug!(
            "New {}x{} session with {} mines, {:?}",
            config.height,
            config.width,
            config.mines,
            state
        );

        Ok(Self {
            config,
            grid,
            state,
            source,
            ticks: 0,
            triggered_mine: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Read-only view for rendering.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// See [`mines_left`]. Before mines are placed, counts against the configured mine count.
    pub fn mines_left(&self) -> i64 {
        if self.grid.is_populated() {
            mines_left(&self.grid)
        } else {
            i64::from(self.config.mines) - i64::from(self.grid.flag_count())
        }
    }

    /// Reveals using the configured [`RevealStrategy`].
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        match self.config.strategy {
            RevealStrategy::Cascade => self.reveal_cascade(coords),
            RevealStrategy::Neighborhood => self.reveal_neighborhood(coords),
        }
    }

    pub fn reveal_cascade(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;
        if self.grid[coords].is_flagged() {
            return Err(GameError::FlaggedCell(coords));
        }
        self.ensure_mines(coords)?;

        let outcome = reveal_cascade(&mut self.grid, coords)?;
        self.update_state(coords, outcome);
        Ok(outcome)
    }

    pub fn reveal_neighborhood(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;
        self.ensure_mines(coords)?;

        let outcome = reveal_neighborhood(&mut self.grid, coords)?;
        self.update_state(coords, outcome);
        Ok(outcome)
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.grid.validate_coords(coords)?;
        if !self.grid[coords].is_revealed() {
            return self.reveal_cascade(coords);
        }
        self.check_not_finished()?;

        let outcome = chord_reveal(&mut self.grid, coords)?;
        self.update_state(coords, outcome);
        Ok(outcome)
    }

    /// A unit moved onto `coords`: clears the fog around it and reports where the session stands.
    pub fn occupy(&mut self, coords: Coord2) -> Result<SessionState> {
        self.reveal_neighborhood(coords)?;
        Ok(self.state)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<CellCount> {
        let coords = self.grid.validate_coords(coords)?;
        self.check_not_finished()?;
        toggle_flag(&mut self.grid, coords)
    }

    /// Advances the clock of an active session. Running past the tick limit loses the game.
    pub fn tick(&mut self) -> Result<SessionState> {
        self.check_not_finished()?;
        if self.state.is_pending() {
            return Ok(self.state);
        }

        self.ticks = self.ticks.saturating_add(1);
        if self.config.tick_limit.is_some_and(|limit| self.ticks > limit) {
            log::debug!("Out of time after {} ticks", self.ticks);
            self.state = SessionState::Lost;
        }
        Ok(self.state)
    }

    fn ensure_mines(&mut self, safe_point: Coord2) -> Result<()> {
        if !self.state.is_pending() {
            return Ok(());
        }

        place_mines(
            &mut self.grid,
            self.config.mines,
            safe_point,
            self.config.safety_radius,
            &mut self.source,
        )?;
        compute_adjacency(&mut self.grid);
        self.state = SessionState::Active;
        log::debug!("Mines placed around first reveal at {:?}", safe_point);
        Ok(())
    }

    /// `coords` is the cell the move targeted. A goal cell only counts as reached when a move targets it, not when
    /// it is opened as a side effect.
    fn update_state(&mut self, coords: Coord2, outcome: RevealOutcome) {
        let next = match (self.grid.outcome(), self.config.win) {
            (SessionState::Active, WinCondition::ReachCell(goal))
                if coords == goal && self.grid[goal].is_revealed() =>
            {
                SessionState::Won
            }
            (next, _) => next,
        };

        if outcome == RevealOutcome::HitMine {
            self.triggered_mine = core::iter::once(coords)
                .chain(self.grid.iter_neighbors(coords))
                .find(|&pos| self.grid[pos].is_mine() && self.grid[pos].is_revealed());
        }

        if next != self.state {
            log::debug!("Session {:?} -> {:?} after move at {:?}", self.state, next, coords);
            self.state = next;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
