use bevy::prelude::*;
use hashbrown::HashMap;
use vizij_hands_core::{
    HandInput, HandSystem, Handedness, MaterialId, MeshId, PhysicsRecorder, ProxyId,
    RenderRecorder,
};

/// The core, backed by command-recording backends.
#[derive(Resource)]
pub struct VizijHands(pub HandSystem<RenderRecorder, PhysicsRecorder>);

/// Latest input per hand, written by the app (XR layer, keyboard sim, ...)
/// and consumed every tick. Defaults to untracked.
#[derive(Resource, Default, Clone, Debug)]
pub struct HandInputs {
    pub hands: [HandInput; 2],
}

impl HandInputs {
    pub fn set(&mut self, handedness: Handedness, input: HandInput) {
        self.hands[handedness.index()] = input;
    }

    pub fn get(&self, handedness: Handedness) -> &HandInput {
        &self.hands[handedness.index()]
    }
}

/// Core ids to the ECS objects standing in for them.
#[derive(Resource, Default)]
pub struct HandEntityIndex {
    pub skins: HashMap<MeshId, Entity>,
    pub proxies: HashMap<ProxyId, Entity>,
    pub materials: HashMap<MaterialId, Handle<StandardMaterial>>,
}
