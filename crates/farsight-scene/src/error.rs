use std::time::Duration;

use farsight_kinematics::KinematicsError;

/// Failures registering work with the [`TickScheduler`](crate::TickScheduler).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler is full ({capacity} tasks)")]
    Exhausted { capacity: usize },
    #[error("repeating task registered with a zero period")]
    ZeroPeriod,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("physics period {physics:?} differs from render period {render:?}")]
    PeriodMismatch { physics: Duration, render: Duration },
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),
}
