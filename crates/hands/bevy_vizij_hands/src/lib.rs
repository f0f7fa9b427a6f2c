//! Bevy adapter for vizij-hands-core.
//!
//! The plugin owns a [`HandSystem`](vizij_hands_core::HandSystem) backed by
//! the core's recording backends. Each `Update` it ticks both hands from the
//! [`HandInputs`] resource using real (unscaled) time, then replays the queued
//! render and physics commands onto `HandSkin` and `HandProxy` entities.

use bevy::prelude::*;
use vizij_hands_core::{HandConfig, HandSystem, PhysicsRecorder, RenderRecorder};

pub mod components;
pub mod resources;
pub mod systems;

pub use components::{HandProxy, HandSkin};
pub use resources::{HandEntityIndex, HandInputs, VizijHands};

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandsSet {
    /// Advance the core.
    Tick,
    /// Mirror core output into the world.
    Apply,
}

#[derive(Default)]
pub struct VizijHandsPlugin {
    pub config: HandConfig,
}

impl Plugin for VizijHandsPlugin {
    fn build(&self, app: &mut App) {
        let system = match HandSystem::new(
            self.config.clone(),
            RenderRecorder::new(),
            PhysicsRecorder::new(),
        ) {
            Ok(system) => system,
            Err(err) => {
                error!("vizij hands disabled: {err}");
                return;
            }
        };

        app.insert_resource(VizijHands(system))
            .init_resource::<HandInputs>()
            .init_resource::<HandEntityIndex>()
            .configure_sets(Update, (HandsSet::Tick, HandsSet::Apply).chain())
            .add_systems(Update, systems::tick_hands.in_set(HandsSet::Tick))
            .add_systems(
                Update,
                (
                    systems::apply_render_commands,
                    systems::apply_physics_commands,
                )
                    .chain()
                    .in_set(HandsSet::Apply),
            );
    }
}
