//! Vizij Hands Core (engine-agnostic)
//!
//! Per-frame hand representation for XR and desktop hosts. Each tick a
//! [`HandSystem`] takes one [`HandInput`] per hand, blends or projects a
//! 25-joint skeleton, derives pinch/grip/tracking flags, regenerates a tube
//! mesh over the joints and keeps a palm collision box in sync. Rendering and
//! physics stay behind the [`RenderBackend`] and [`PhysicsBackend`] traits so
//! adapters (Bevy/WASM) decide how the results reach the host.

pub mod backend;
pub mod blend;
pub mod collision;
pub mod config;
pub mod error;
pub mod gesture;
pub mod hand;
pub mod ids;
pub mod input;
pub mod joint;
pub mod material;
pub mod mesh;
pub mod poses;
pub mod recorder;
pub mod state;
pub mod system;

// Re-exports for consumers (adapters)
pub use backend::{MaterialId, MeshId, PhysicsBackend, ProxyId, RenderBackend};
pub use config::HandConfig;
pub use error::HandError;
pub use hand::Hand;
pub use ids::{Finger, FingerJoint, Handedness, FINGERS, JOINTS_PER_FINGER};
pub use input::{identity_joints, ControllerProfile, DisplayKind, HandInput};
pub use joint::{HandJoint, JointGrid, Pose};
pub use material::{HandMaterialDesc, Transparency};
pub use mesh::{HandMesh, HandVertex, INDEX_COUNT, VERTEX_COUNT};
pub use poses::{CanonicalPoseId, CanonicalPoses, POSE_SCALE};
pub use recorder::{PhysicsCommand, PhysicsRecorder, RenderCommand, RenderRecorder};
pub use state::InputState;
pub use system::HandSystem;
