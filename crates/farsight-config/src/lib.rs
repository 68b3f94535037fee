//! Configuration for Farsight.
//!
//! Settings persist to disk as a RON file and can be overridden from the
//! command line. Every section defaults independently, so files written by
//! older or newer versions still load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    ArrivalConfig, BeamConfig, BudgetConfig, Config, DebugConfig, DensityCurveKind,
    DrawSphereConfig, LodConfig, MAX_RUN_SECONDS, SamplingConfig, TimingConfig, UniverseConfig,
};
pub use error::ConfigError;
