//! Scene rendering for Farsight: per-frame aggregation of projected points,
//! the global particle budget, presentation sinks, and the hyperspace beam
//! animation.

mod beams;
mod budget;
mod renderer;
mod sink;

pub use beams::{BeamSettings, HyperspaceBeams};
pub use budget::{Candidate, ParticleBudget};
pub use renderer::{FrameStats, SceneRenderer};
pub use sink::{ChannelSink, CollectingSink, DrawRequest, Frame, PresentationSink, VisualKind};
