use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::core::domain::{Body, DockPose};

/// One intermediate structure captured during the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub label: String,
    pub bodies: Vec<Body>,
}

/// Best-effort streaming of intermediate structures to an external viewer.
///
/// `emit` never blocks and never fails the pipeline: a full channel drops
/// the frame, a disconnected one logs at debug and drops it. In history
/// mode every frame is retained; otherwise the channel buffers at most one
/// pending frame.
#[derive(Clone)]
pub struct StructureMonitor {
    tx: Sender<Snapshot>,
}

impl StructureMonitor {
    /// Creates a monitor and the receiving end a viewer drains.
    pub fn channel(history: bool) -> (Self, Receiver<Snapshot>) {
        let (tx, rx) = if history { unbounded() } else { bounded(1) };
        (Self { tx }, rx)
    }

    /// Streams into a caller-owned channel.
    pub fn from_sender(tx: Sender<Snapshot>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, pose: &DockPose, label: &str) {
        let mut bodies = Vec::new();
        if !pose.anchor().atoms.is_empty() {
            bodies.push(pose.anchor().clone());
        }
        bodies.extend(pose.mobiles().iter().cloned());

        let snapshot = Snapshot {
            label: label.to_string(),
            bodies,
        };
        match self.tx.try_send(snapshot) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("structure monitor disconnected, dropping frame '{}'", label);
            }
        }
    }
}
