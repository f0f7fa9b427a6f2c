use bevy::prelude::*;
use vizij_hands_core::{Handedness, MeshId, ProxyId};

/// Entity carrying one hand's tube mesh. Spawned the first time the core
/// registers the mesh; shown only on frames where the core submits it.
#[derive(Component, Debug, Clone)]
pub struct HandSkin {
    pub mesh: MeshId,
    pub handedness: Option<Handedness>,
    pub vertex_count: usize,
    pub index_count: usize,
}

/// Palm collision box mirrored from the core. Physics integrations read
/// `size`/`enabled` and the entity's Transform.
#[derive(Component, Debug, Clone)]
pub struct HandProxy {
    pub id: ProxyId,
    pub size: Vec3,
    pub enabled: bool,
}
