//! Zoned terrain generation and the local-search agents that walk it.
pub mod agents;
pub mod clusters;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod growth;
pub mod hash;
pub mod session;
pub mod settlements;
pub mod smoothing;
pub mod spawn;
pub mod zone;

pub use agents::{
    AgentKind, AgentSnapshot, AnnealingAgent, ClimbStatus, HillClimbAgent, SearchAgent,
    TickOutcome, TieBreakPolicy,
};
pub use clusters::{find_clusters, Cluster};
pub use config::{
    AgentConfig, AnnealingParams, LayoutParams, RegionParams, SessionConfig, SettlementParams,
    VillageParams,
};
pub use error::ConfigError;
pub use generator::{generate_layout, layout_rng, Layout, LayoutGenerator};
pub use grid::{Cell, ZoneGrid};
pub use session::{Session, SessionSnapshot};
pub use zone::ZoneType;
