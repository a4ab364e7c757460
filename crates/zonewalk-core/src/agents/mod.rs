//! Tick-driven local-search agents over a shared, read-only [`ZoneGrid`].
//!
//! Agents own only their position and search state. The grid is held
//! through an `Arc` and never mutated; a regenerated map means new agents.

pub mod annealing;
pub mod hill_climb;

use serde::{Deserialize, Serialize};

use crate::grid::{Cell, ZoneGrid};
use crate::zone::ZoneType;

pub use annealing::AnnealingAgent;
pub use hill_climb::{ClimbStatus, HillClimbAgent, TieBreakPolicy};

/// What happened during one `update` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    Moved { from: Cell, to: Cell },
    /// The agent evaluated a move and stayed put.
    Stayed,
    /// The hill climber reached a local maximum on this tick.
    BecameStuck,
    /// The agent was already stuck; nothing was evaluated.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    HillClimb,
    Annealing,
}

/// Renderer-facing view of an agent after any tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub kind: AgentKind,
    pub position: Cell,
    pub zone: Option<ZoneType>,
    pub score: i32,
    pub stuck: bool,
    /// Current temperature; `None` for agents without a schedule.
    pub temperature: Option<f64>,
    pub ticks: u64,
}

/// Shared lifecycle of the two search strategies.
pub trait SearchAgent {
    fn kind(&self) -> AgentKind;

    fn grid(&self) -> &ZoneGrid;

    fn position(&self) -> Cell;

    /// Number of `update` calls that evaluated a move.
    fn ticks(&self) -> u64;

    /// Advance one tick using `rng` for every random decision.
    fn update<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome;

    fn is_stuck(&self) -> bool {
        false
    }

    fn temperature(&self) -> Option<f64> {
        None
    }

    fn snapshot(&self) -> AgentSnapshot {
        let position = self.position();
        AgentSnapshot {
            kind: self.kind(),
            position,
            zone: self.grid().get(position),
            score: self.grid().score(position),
            stuck: self.is_stuck(),
            temperature: self.temperature(),
            ticks: self.ticks(),
        }
    }
}

/// Clamp `cell` into the grid so agents always start in bounds.
pub(crate) fn clamp_to_grid(grid: &ZoneGrid, cell: Cell) -> Cell {
    let max_x = grid.cols().saturating_sub(1) as i32;
    let max_y = grid.rows().saturating_sub(1) as i32;
    Cell::new(cell.x.min(max_x).max(0), cell.y.min(max_y).max(0))
}
