//! HandSystem: owns both hands and drives them once per tick.
//!
//! Per hand, a tick runs input -> skeleton -> gesture state -> mesh/submit ->
//! collision proxy. Both hands are independent; nothing mutable is shared.
//!
//! Methods:
//! - new, update, update_hand, shutdown
//! - hand/joints/joint/state/mesh (read)
//! - set_visible, set_solid, set_material (per-hand toggles)

use glam::{Mat4, Vec3};

use crate::backend::{MaterialId, PhysicsBackend, RenderBackend};
use crate::blend::{blend_factor, needs_mirror, project_skeleton, select_target, BlendBuffer};
use crate::collision::CollisionProxy;
use crate::config::HandConfig;
use crate::error::HandError;
use crate::gesture::next_state;
use crate::hand::{Hand, HandSlot};
use crate::ids::{Finger, FingerJoint, Handedness};
use crate::input::HandInput;
use crate::joint::{at, HandJoint, JointGrid};
use crate::material::HandMaterialDesc;
use crate::mesh::{mesh_name, HandMesh};
use crate::poses::{CanonicalPoseId, CanonicalPoses};
use crate::state::InputState;

pub struct HandSystem<R: RenderBackend, P: PhysicsBackend> {
    cfg: HandConfig,
    poses: &'static CanonicalPoses,
    render: R,
    physics: P,
    hands: [HandSlot; 2],
    shut_down: bool,
}

impl<R: RenderBackend, P: PhysicsBackend> HandSystem<R, P> {
    /// Validate `cfg`, create the shared default material (when enabled) and
    /// one disabled palm proxy per hand. Joints start at the neutral pose.
    pub fn new(cfg: HandConfig, mut render: R, mut physics: P) -> Result<Self, HandError> {
        cfg.validate()?;
        let poses = CanonicalPoses::standard();

        let material = cfg
            .default_material
            .then(|| render.create_material(&HandMaterialDesc::default_hand()));

        let box_size = Vec3::from_array(cfg.proxy_box_size);
        let mut make_slot = |handedness: Handedness| {
            if let Some(id) = material {
                render.acquire_material(id);
            }
            let blend = BlendBuffer::new(poses.get(CanonicalPoseId::Neutral));
            let mut info = Hand::new(handedness);
            project_skeleton(
                &mut info.fingers,
                blend.joints(),
                &info.palm,
                needs_mirror(handedness),
                &cfg,
            );
            HandSlot {
                info,
                blend,
                mesh: HandMesh::new(),
                proxy: CollisionProxy::create(&mut physics, box_size),
                material,
                visible: cfg.visible,
                solid: true,
            }
        };
        let hands = [make_slot(Handedness::Left), make_slot(Handedness::Right)];

        // each hand now holds its own reference
        if let Some(id) = material {
            render.release_material(id);
        }

        Ok(Self {
            cfg,
            poses,
            render,
            physics,
            hands,
            shut_down: false,
        })
    }

    /// Run one tick for both hands, left first.
    pub fn update(&mut self, dt: f32, inputs: &[HandInput; 2]) {
        for h in Handedness::ALL {
            self.update_hand(h, dt, &inputs[h.index()]);
        }
    }

    /// Run one tick for a single hand. Does nothing after [`shutdown`](Self::shutdown).
    pub fn update_hand(&mut self, handedness: Handedness, dt: f32, input: &HandInput) {
        if self.shut_down {
            return;
        }
        let cfg = &self.cfg;
        let slot = &mut self.hands[handedness.index()];
        let tracked = input.is_tracked();

        // Skeleton
        if tracked {
            let palm = *input.palm();
            slot.info.palm = palm;
            match input {
                HandInput::SimulatedFromButtons { trigger, grip, .. } => {
                    let target = self.poses.get(select_target(*trigger, *grip));
                    slot.blend.step(target, blend_factor(dt, cfg.blend_rate));
                    project_skeleton(
                        &mut slot.info.fingers,
                        slot.blend.joints(),
                        &palm,
                        needs_mirror(handedness),
                        cfg,
                    );
                }
                HandInput::DeviceTracked { joints, .. } => {
                    project_skeleton(&mut slot.info.fingers, joints, &palm, false, cfg);
                }
            }
        }

        // Gesture state
        let prev = slot.info.state;
        slot.info.state = next_state(prev, tracked, &slot.info.fingers, cfg);
        if slot.info.state.intersects(InputState::JUST_TRACKED | InputState::UNTRACKED) {
            log::trace!(
                "{} hand {}",
                handedness.as_str(),
                if tracked { "tracked" } else { "lost" }
            );
        }

        // Skin
        match slot.material {
            Some(material) if slot.visible && tracked => {
                draw_skin(&mut self.render, slot, handedness, material, cfg);
            }
            _ => {}
        }

        // Physics
        slot.proxy
            .sync(&mut self.physics, slot.solid && tracked, &slot.info.palm);
    }

    /// Release proxies, material references and meshes. Safe to call more
    /// than once; also run on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        for slot in self.hands.iter_mut() {
            slot.proxy.release(&mut self.physics);
            if let Some(id) = slot.material.take() {
                self.render.release_material(id);
            }
            if let Some(id) = slot.mesh.id() {
                self.render.release_mesh(id);
                slot.mesh.set_id(None);
            }
        }
        log::debug!("hand system shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn config(&self) -> &HandConfig {
        &self.cfg
    }

    pub fn hand(&self, handedness: Handedness) -> &Hand {
        &self.hands[handedness.index()].info
    }

    pub fn joints(&self, handedness: Handedness) -> &JointGrid<HandJoint> {
        &self.hand(handedness).fingers
    }

    pub fn joint(&self, handedness: Handedness, finger: Finger, joint: FingerJoint) -> &HandJoint {
        at(self.joints(handedness), finger, joint)
    }

    pub fn state(&self, handedness: Handedness) -> InputState {
        self.hand(handedness).state
    }

    pub fn mesh(&self, handedness: Handedness) -> &HandMesh {
        &self.hands[handedness.index()].mesh
    }

    /// Current palm-local blend buffer.
    pub fn blend_buffer(&self, handedness: Handedness) -> &BlendBuffer {
        &self.hands[handedness.index()].blend
    }

    pub fn set_visible(&mut self, handedness: Handedness, visible: bool) {
        self.hands[handedness.index()].visible = visible;
    }

    pub fn is_visible(&self, handedness: Handedness) -> bool {
        self.hands[handedness.index()].visible
    }

    /// Gate the palm proxy. Applied immediately; the proxy stays off while
    /// the hand is untracked regardless.
    pub fn set_solid(&mut self, handedness: Handedness, solid: bool) {
        let slot = &mut self.hands[handedness.index()];
        slot.solid = solid;
        if !self.shut_down {
            let enabled = solid && slot.info.is_tracked();
            slot.proxy.sync(&mut self.physics, enabled, &slot.info.palm);
        }
    }

    pub fn is_solid(&self, handedness: Handedness) -> bool {
        self.hands[handedness.index()].solid
    }

    /// Swap the skin material. The new one is acquired before the old one
    /// is released, so re-setting the current material is harmless.
    /// Ignored after shutdown.
    pub fn set_material(&mut self, handedness: Handedness, material: Option<MaterialId>) {
        if self.shut_down {
            return;
        }
        let slot = &mut self.hands[handedness.index()];
        if let Some(id) = material {
            self.render.acquire_material(id);
        }
        if let Some(old) = slot.material.take() {
            self.render.release_material(old);
        }
        slot.material = material;
        log::debug!("{} hand material set to {material:?}", handedness.as_str());
    }

    pub fn material(&self, handedness: Handedness) -> Option<MaterialId> {
        self.hands[handedness.index()].material
    }

    pub fn render(&self) -> &R {
        &self.render
    }

    pub fn render_mut(&mut self) -> &mut R {
        &mut self.render
    }

    pub fn physics(&self) -> &P {
        &self.physics
    }

    pub fn physics_mut(&mut self) -> &mut P {
        &mut self.physics
    }
}

impl<R: RenderBackend, P: PhysicsBackend> Drop for HandSystem<R, P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Regenerate the tube mesh and submit it for drawing. Registers the mesh
/// and uploads indices the first time through.
fn draw_skin<R: RenderBackend>(
    render: &mut R,
    slot: &mut HandSlot,
    handedness: Handedness,
    material: MaterialId,
    cfg: &HandConfig,
) {
    slot.mesh
        .update_vertices(&slot.info.fingers, cfg.thumb_base_radius_scale);
    let id = match slot.mesh.id() {
        Some(id) => id,
        None => {
            let id = render.create_mesh(mesh_name(handedness));
            render.set_mesh_indices(id, slot.mesh.indices());
            slot.mesh.set_id(Some(id));
            log::debug!(
                "built {} hand mesh: {} verts, {} inds",
                handedness.as_str(),
                slot.mesh.vertex_count(),
                slot.mesh.index_count()
            );
            id
        }
    };
    render.set_mesh_vertices(id, slot.mesh.vertices());
    render.submit(id, material, Mat4::IDENTITY);
}

