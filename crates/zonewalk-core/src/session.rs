//! Interactive session: one layout, one run RNG, and up to one agent of each
//! kind. This is the state a renderer drives with buttons and a frame timer.

use std::sync::Arc;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agents::{AgentSnapshot, AnnealingAgent, HillClimbAgent, SearchAgent, TickOutcome};
use crate::config::{AnnealingParams, SessionConfig};
use crate::error::ConfigError;
use crate::generator::{layout_rng, Layout, LayoutGenerator};
use crate::grid::Cell;
use crate::spawn;

/// Renderer-facing view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Bumped on every regeneration so views know to redraw the map.
    pub generation: u64,
    pub hill_start: Cell,
    pub anneal_start: Cell,
    pub hill_climber: Option<AgentSnapshot>,
    pub annealer: Option<AgentSnapshot>,
}

pub struct Session {
    config: SessionConfig,
    generator: LayoutGenerator,
    layout: Layout,
    rng: StdRng,
    hill_start: Cell,
    anneal_start: Cell,
    hill_climber: Option<HillClimbAgent>,
    annealer: Option<AnnealingAgent>,
    generation: u64,
}

impl Session {
    /// Validate `config`, generate the first layout and pick both starts.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = LayoutGenerator::new(config.layout.clone())?;
        let mut rng = layout_rng(config.layout.seed);
        let layout = generator.generate(&mut rng);
        let hill_start = spawn::pick(true, &layout, &config.layout, &mut rng);
        let anneal_start = spawn::pick(false, &layout, &config.layout, &mut rng);
        Ok(Self {
            config,
            generator,
            layout,
            rng,
            hill_start,
            anneal_start,
            hill_climber: None,
            annealer: None,
            generation: 0,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn hill_climber(&self) -> Option<&HillClimbAgent> {
        self.hill_climber.as_ref()
    }

    pub fn annealer(&self) -> Option<&AnnealingAgent> {
        self.annealer.as_ref()
    }

    /// Halt both agents and replace the layout with a fresh one.
    ///
    /// The session RNG keeps running, so a seeded session regenerates into a
    /// new (but reproducible) map.
    pub fn regenerate(&mut self) {
        self.hill_climber = None;
        self.annealer = None;
        self.layout = self.generator.generate(&mut self.rng);
        self.hill_start = spawn::pick(true, &self.layout, &self.config.layout, &mut self.rng);
        self.anneal_start = spawn::pick(false, &self.layout, &self.config.layout, &mut self.rng);
        self.generation += 1;
        info!(generation = self.generation, "session regenerated");
    }

    /// Replace the hill climber with a fresh one at a new trap-biased start.
    pub fn start_hill_climb(&mut self) -> Cell {
        self.hill_start = spawn::pick(true, &self.layout, &self.config.layout, &mut self.rng);
        self.hill_climber = Some(HillClimbAgent::new(
            self.hill_start,
            Arc::clone(&self.layout.grid),
            self.config.agents.tie_break,
        ));
        self.hill_start
    }

    /// Replace the annealer with a fresh one at a new uniform start. A given
    /// `temperature` overrides the configured initial temperature.
    pub fn start_annealing(&mut self, temperature: Option<f64>) -> Result<Cell, ConfigError> {
        let params = AnnealingParams {
            initial_temperature: temperature.unwrap_or(self.config.agents.annealing.initial_temperature),
            ..self.config.agents.annealing
        };
        params.validate()?;
        self.anneal_start = spawn::pick(false, &self.layout, &self.config.layout, &mut self.rng);
        self.annealer = Some(AnnealingAgent::new(
            self.anneal_start,
            Arc::clone(&self.layout.grid),
            &params,
        ));
        Ok(self.anneal_start)
    }

    /// Advance the hill climber one tick; `None` when none is running.
    pub fn tick_hill_climb(&mut self) -> Option<TickOutcome> {
        let agent = self.hill_climber.as_mut()?;
        Some(agent.update(&mut self.rng))
    }

    /// Advance the annealer one tick; `None` when none is running.
    pub fn tick_annealing(&mut self) -> Option<TickOutcome> {
        let agent = self.annealer.as_mut()?;
        Some(agent.update(&mut self.rng))
    }

    /// Drop the hill climber; later ticks return `None` until restarted.
    pub fn stop_hill_climb(&mut self) {
        self.hill_climber = None;
    }

    pub fn stop_annealing(&mut self) {
        self.annealer = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generation: self.generation,
            hill_start: self.hill_start,
            anneal_start: self.anneal_start,
            hill_climber: self.hill_climber.as_ref().map(SearchAgent::snapshot),
            annealer: self.annealer.as_ref().map(SearchAgent::snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::TieBreakPolicy;
    use crate::config::LayoutParams;

    fn config(seed: u64) -> SessionConfig {
        SessionConfig {
            layout: LayoutParams { seed: Some(seed), ..LayoutParams::default() },
            ..SessionConfig::default()
        }
    }

    #[test]
    fn ticks_are_none_until_started() {
        let mut session = Session::new(config(1)).unwrap();
        assert_eq!(session.tick_hill_climb(), None);
        assert_eq!(session.tick_annealing(), None);
        let snap = session.snapshot();
        assert!(snap.hill_climber.is_none() && snap.annealer.is_none());
    }

    #[test]
    fn hill_climber_reports_stuck_once_then_halts() {
        // Strict climbing always terminates; plateau walking on a multi-cell
        // region never does.
        let mut cfg = config(3);
        cfg.agents.tie_break = TieBreakPolicy::StrictImprovementOnly;
        let mut session = Session::new(cfg).unwrap();
        session.start_hill_climb();
        let mut stuck_reports = 0;
        for _ in 0..5_000 {
            match session.tick_hill_climb() {
                Some(TickOutcome::BecameStuck) => stuck_reports += 1,
                Some(TickOutcome::Halted) => break,
                Some(_) => {}
                None => panic!("hill climber vanished"),
            }
        }
        assert_eq!(stuck_reports, 1);
        let snap = session.snapshot().hill_climber.unwrap();
        assert!(snap.stuck);
    }

    #[test]
    fn regenerate_halts_agents_and_bumps_generation() {
        let mut session = Session::new(config(5)).unwrap();
        session.start_hill_climb();
        session.start_annealing(None).unwrap();
        let before = Arc::clone(&session.layout().grid);
        session.regenerate();
        assert_eq!(session.tick_hill_climb(), None);
        assert_eq!(session.tick_annealing(), None);
        assert_eq!(session.snapshot().generation, 1);
        assert!(!Arc::ptr_eq(&before, &session.layout().grid));
    }

    #[test]
    fn stopping_one_agent_leaves_the_other_running() {
        let mut session = Session::new(config(8)).unwrap();
        session.start_hill_climb();
        session.start_annealing(None).unwrap();
        session.stop_hill_climb();
        assert_eq!(session.tick_hill_climb(), None);
        assert!(session.tick_annealing().is_some());
        session.stop_annealing();
        assert_eq!(session.tick_annealing(), None);
        let snap = session.snapshot();
        assert!(snap.hill_climber.is_none() && snap.annealer.is_none());
        assert_eq!(snap.generation, 0);
    }

    #[test]
    fn agents_share_the_published_grid() {
        let mut session = Session::new(config(6)).unwrap();
        session.start_hill_climb();
        let agent_grid = session.hill_climber().unwrap().grid();
        assert!(std::ptr::eq(agent_grid, Arc::as_ptr(&session.layout().grid)));
    }

    #[test]
    fn annealing_temperature_override() {
        let mut session = Session::new(config(7)).unwrap();
        session.start_annealing(Some(25.0)).unwrap();
        session.tick_annealing();
        let t = session.annealer().unwrap().temperature().unwrap();
        assert!((t - 24.75).abs() < 1e-9, "temperature {t}");
        assert!(matches!(
            session.start_annealing(Some(f64::NAN)),
            Err(ConfigError::InvalidTemperature { .. })
        ));
    }

    #[test]
    fn seeded_sessions_replay_identically() {
        let run = || {
            let mut session = Session::new(config(11)).unwrap();
            session.start_hill_climb();
            session.start_annealing(None).unwrap();
            for _ in 0..100 {
                session.tick_hill_climb();
                session.tick_annealing();
            }
            session.snapshot()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn strict_policy_is_forwarded() {
        let mut cfg = config(2);
        cfg.agents.tie_break = TieBreakPolicy::StrictImprovementOnly;
        let mut session = Session::new(cfg).unwrap();
        session.start_hill_climb();
        assert_eq!(
            session.hill_climber().unwrap().policy(),
            TieBreakPolicy::StrictImprovementOnly
        );
    }
}
