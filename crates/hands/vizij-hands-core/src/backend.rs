//! Collaborator contracts: rendering and physics backends.
//!
//! The core never owns GPU or physics objects directly. It holds opaque ids
//! handed out by these traits and calls acquire/release on them; reference
//! counting and actual allocation live on the other side.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::joint::Pose;
use crate::material::HandMaterialDesc;
use crate::mesh::HandVertex;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MeshId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ProxyId(pub u32);

pub trait RenderBackend {
    /// Create a material; the caller receives one reference.
    fn create_material(&mut self, desc: &HandMaterialDesc) -> MaterialId;
    /// Add a reference to a live material.
    fn acquire_material(&mut self, id: MaterialId);
    /// Drop one reference. Unknown or dead ids are ignored.
    fn release_material(&mut self, id: MaterialId);

    fn create_mesh(&mut self, name: &str) -> MeshId;
    fn set_mesh_indices(&mut self, mesh: MeshId, indices: &[u16]);
    fn set_mesh_vertices(&mut self, mesh: MeshId, vertices: &[HandVertex]);
    fn release_mesh(&mut self, mesh: MeshId);

    /// Draw `mesh` with `material` this frame.
    fn submit(&mut self, mesh: MeshId, material: MaterialId, transform: Mat4);
}

pub trait PhysicsBackend {
    /// Create a box proxy with full extents `size`.
    fn create_box(&mut self, size: Vec3) -> ProxyId;
    fn set_enabled(&mut self, proxy: ProxyId, enabled: bool);
    fn move_to(&mut self, proxy: ProxyId, pose: Pose);
    fn release(&mut self, proxy: ProxyId);
}
