//! Palm collision proxy.

use glam::Vec3;

use crate::backend::{PhysicsBackend, ProxyId};
use crate::joint::Pose;

/// One box proxy following the palm.
#[derive(Debug)]
pub struct CollisionProxy {
    id: Option<ProxyId>,
}

impl CollisionProxy {
    /// Create the box disabled; it only turns on once the hand is tracked.
    pub fn create<P: PhysicsBackend>(physics: &mut P, size: Vec3) -> Self {
        let id = physics.create_box(size);
        physics.set_enabled(id, false);
        Self { id: Some(id) }
    }

    pub fn id(&self) -> Option<ProxyId> {
        self.id
    }

    /// Submit enablement, and the palm pose while enabled.
    pub fn sync<P: PhysicsBackend>(&self, physics: &mut P, enabled: bool, palm: &Pose) {
        let Some(id) = self.id else {
            return;
        };
        physics.set_enabled(id, enabled);
        if enabled {
            physics.move_to(id, *palm);
        }
    }

    /// Release the box; later calls do nothing.
    pub fn release<P: PhysicsBackend>(&mut self, physics: &mut P) {
        if let Some(id) = self.id.take() {
            physics.release(id);
        }
    }
}
