//! Presentation sinks: where finished frames go.
//!
//! Delivery is fire-and-forget. A sink never reports back into the simulation
//! and must never block the tick that hands it a frame.

use crossbeam_channel::{Receiver, Sender, TrySendError};
use glam::DVec3;
use tracing::{trace, warn};

/// What a draw request depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualKind {
    Star,
    Planet,
    Streak,
    Beam,
}

/// One emission: a world position, what it depicts, and its particle weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawRequest {
    pub position: DVec3,
    pub kind: VisualKind,
    pub count: u32,
}

/// All draw requests of one render tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub sequence: u64,
    pub requests: Vec<DrawRequest>,
}

impl Frame {
    /// Total particle weight of the frame.
    pub fn particles(&self) -> u64 {
        self.requests.iter().map(|r| u64::from(r.count)).sum()
    }
}

/// Receives finished frames.
pub trait PresentationSink {
    fn present(&mut self, frame: Frame);
}

/// Forwards frames over a bounded channel, dropping them when the consumer lags.
pub struct ChannelSink {
    sender: Sender<Frame>,
    dropped: u64,
}

impl ChannelSink {
    /// Create a sink and the receiving end for the consumer.
    pub fn bounded(capacity: usize) -> (Self, Receiver<Frame>) {
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        (Self { sender, dropped: 0 }, receiver)
    }

    /// Frames discarded because the channel was full or closed.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped
    }
}

impl PresentationSink for ChannelSink {
    fn present(&mut self, frame: Frame) {
        let sequence = frame.sequence;
        match self.sender.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped += 1;
                trace!(sequence, "Presentation channel full, frame dropped");
            }
            Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                if self.dropped == 1 {
                    warn!("Presentation consumer disconnected, frames are being discarded");
                }
            }
        }
    }
}

/// Keeps every frame in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    frames: Vec<Frame>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Remove and return everything collected so far.
    pub fn take(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl PresentationSink for CollectingSink {
    fn present(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(sequence: u64) -> Frame {
        Frame {
            sequence,
            requests: vec![DrawRequest {
                position: DVec3::ZERO,
                kind: VisualKind::Star,
                count: 2,
            }],
        }
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (mut sink, receiver) = ChannelSink::bounded(4);
        sink.present(frame(1));
        sink.present(frame(2));

        assert_eq!(receiver.try_recv().unwrap().sequence, 1);
        assert_eq!(receiver.try_recv().unwrap().sequence, 2);
        assert_eq!(sink.dropped_frames(), 0);
    }

    #[test]
    fn test_channel_sink_drops_when_full_without_blocking() {
        let (mut sink, receiver) = ChannelSink::bounded(1);
        sink.present(frame(1));
        sink.present(frame(2));
        sink.present(frame(3));

        assert_eq!(sink.dropped_frames(), 2);
        assert_eq!(receiver.try_recv().unwrap().sequence, 1);
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_channel_sink_survives_disconnected_consumer() {
        let (mut sink, receiver) = ChannelSink::bounded(1);
        drop(receiver);
        sink.present(frame(1));
        assert_eq!(sink.dropped_frames(), 1);
    }

    #[test]
    fn test_collecting_sink() {
        let mut sink = CollectingSink::new();
        sink.present(frame(7));
        assert_eq!(sink.frames().len(), 1);
        assert_eq!(sink.last().unwrap().particles(), 2);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.frames().is_empty());
    }
}
