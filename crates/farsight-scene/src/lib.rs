//! Scene orchestration: the cooperative tick scheduler, the space scene that
//! ties the sector, observer and renderer together, and the arrival sequence.

mod arrival;
mod error;
mod scene;
mod scheduler;

pub use arrival::{ArrivalHandles, ArrivalSequence, ArrivalSettings};
pub use error::{SceneError, SchedulerError};
pub use scene::{RenderMode, SceneSettings, SceneTasks, SpaceScene, ThrustHandle};
pub use scheduler::{TaskHandle, TickScheduler};
