//! Simulated annealing: random proposals, Metropolis acceptance, geometric
//! cooling. Once the temperature drops to `min_temperature` it snaps to zero
//! and the agent only ever takes strictly improving proposals. There is no
//! terminal state.

use std::sync::Arc;

use rand::Rng;
use tracing::trace;

use super::{clamp_to_grid, AgentKind, SearchAgent, TickOutcome};
use crate::config::AnnealingParams;
use crate::grid::{Cell, ZoneGrid, DIRECTIONS};

#[derive(Debug, Clone)]
pub struct AnnealingAgent {
    grid: Arc<ZoneGrid>,
    position: Cell,
    temperature: f64,
    cooling_rate: f64,
    min_temperature: f64,
    ticks: u64,
}

impl AnnealingAgent {
    /// Create an annealer at `start`, clamped into the grid.
    pub fn new(start: Cell, grid: Arc<ZoneGrid>, params: &AnnealingParams) -> Self {
        let position = clamp_to_grid(&grid, start);
        Self {
            grid,
            position,
            temperature: params.initial_temperature,
            cooling_rate: params.cooling_rate,
            min_temperature: params.min_temperature,
            ticks: 0,
        }
    }

    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    /// True once the temperature has clamped to zero.
    pub fn is_frozen(&self) -> bool {
        self.temperature == 0.0
    }

    fn cool(&mut self) {
        if self.temperature == 0.0 {
            return;
        }
        self.temperature *= self.cooling_rate;
        if self.temperature <= self.min_temperature {
            self.temperature = 0.0;
        }
    }
}

impl SearchAgent for AnnealingAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Annealing
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

    fn temperature(&self) -> Option<f64> {
        Some(self.temperature)
    }

    fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        self.ticks += 1;

        let (dx, dy) = DIRECTIONS[rng.gen_range(0..DIRECTIONS.len())];
        let proposal = self.position.offset(dx, dy);

        let outcome = if !self.grid.contains(proposal) {
            TickOutcome::Stayed
        } else {
            let delta = (self.grid.score(proposal) - self.grid.score(self.position)) as f64;
            let accept = delta > 0.0
                || (self.temperature > self.min_temperature
                    && rng.gen::<f64>() < (delta / self.temperature).exp());
            if accept {
                let from = self.position;
                self.position = proposal;
                TickOutcome::Moved { from, to: proposal }
            } else {
                TickOutcome::Stayed
            }
        };

        self.cool();
        trace!(?outcome, temperature = self.temperature, "annealer ticked");
        outcome
    }
}

/// Ticks until a schedule clamps to zero: `ceil(ln(min / initial) / ln(rate))`.
/// A schedule starting at or below its floor freezes on the first tick, or
/// needs no ticks at all when it starts at zero.
pub fn ticks_until_frozen(params: &AnnealingParams) -> u64 {
    if params.initial_temperature <= params.min_temperature {
        return if params.initial_temperature > 0.0 { 1 } else { 0 };
    }
    let ratio = (params.min_temperature / params.initial_temperature).ln() / params.cooling_rate.ln();
    ratio.ceil() as u64
}
