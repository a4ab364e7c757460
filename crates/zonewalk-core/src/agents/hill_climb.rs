//! Greedy hill climbing with a configurable plateau policy.
//!
//! ```text
//!   Climbing --(best neighbour < current)--> Stuck   (plateau walk)
//!   Climbing --(best neighbour <= current)-> Stuck   (strict)
//!   Climbing --(otherwise: move)-----------> Climbing
//! ```
//! Stuck is terminal.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{clamp_to_grid, AgentKind, SearchAgent, TickOutcome};
use crate::grid::{Cell, ZoneGrid};
use crate::zone::OUT_OF_BOUNDS_SCORE;

/// How the climber treats neighbours that tie the current score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TieBreakPolicy {
    /// Only strictly better neighbours are taken; the first best in scan
    /// order wins. Freezes on any plateau.
    StrictImprovementOnly,
    /// Ties are taken too, choosing uniformly among the best neighbours, so
    /// the climber can wander across flat ground toward a real peak.
    #[default]
    PlateauRandomWalk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClimbStatus {
    Climbing,
    Stuck,
}

#[derive(Debug, Clone)]
pub struct HillClimbAgent {
    grid: Arc<ZoneGrid>,
    position: Cell,
    policy: TieBreakPolicy,
    status: ClimbStatus,
    ticks: u64,
}

impl HillClimbAgent {
    /// Create a climber at `start`, clamped into the grid.
    pub fn new(start: Cell, grid: Arc<ZoneGrid>, policy: TieBreakPolicy) -> Self {
        let position = clamp_to_grid(&grid, start);
        Self { grid, position, policy, status: ClimbStatus::Climbing, ticks: 0 }
    }

    pub fn status(&self) -> ClimbStatus {
        self.status
    }

    pub fn policy(&self) -> TieBreakPolicy {
        self.policy
    }
}

impl SearchAgent for HillClimbAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::HillClimb
    }

    fn grid(&self) -> &ZoneGrid {
        &self.grid
    }

    fn position(&self) -> Cell {
        self.position
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn is_stuck(&self) -> bool {
        self.status == ClimbStatus::Stuck
    }

    fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        if self.status == ClimbStatus::Stuck {
            return TickOutcome::Halted;
        }
        self.ticks += 1;

        let current = self.grid.score(self.position);
        let mut best = OUT_OF_BOUNDS_SCORE;
        let mut candidates = [self.position; 4];
        let mut n = 0;
        for neighbour in self.grid.neighbors4(self.position) {
            let score = self.grid.score(neighbour);
            if score > best {
                best = score;
                n = 0;
            }
            if score == best {
                candidates[n] = neighbour;
                n += 1;
            }
        }

        let stuck = n == 0
            || match self.policy {
                TieBreakPolicy::PlateauRandomWalk => best < current,
                TieBreakPolicy::StrictImprovementOnly => best <= current,
            };
        if stuck {
            self.status = ClimbStatus::Stuck;
            debug!(
                x = self.position.x,
                y = self.position.y,
                score = current,
                ticks = self.ticks,
                "hill climber stuck at local maximum"
            );
            return TickOutcome::BecameStuck;
        }

        let to = match self.policy {
            TieBreakPolicy::PlateauRandomWalk => candidates[rng.gen_range(0..n)],
            TieBreakPolicy::StrictImprovementOnly => candidates[0],
        };
        let from = self.position;
        self.position = to;
        trace!(?from, ?to, best, "hill climber moved");
        TickOutcome::Moved { from, to }
    }
}
