//! Procedural tube mesh over the hand skeleton.
//!
//! Each joint contributes a ring of four vertices oriented by the joint's
//! local right/up axes; consecutive rings of a finger are stitched into a
//! square tube and both ends are capped. Topology (indices, uv, color) is
//! built once per hand; positions and normals are rewritten every frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::backend::MeshId;
use crate::ids::{Handedness, FINGERS, JOINTS_PER_FINGER};
use crate::joint::{HandJoint, JointGrid};

/// Vertices per joint ring.
pub const RING_VERTS: usize = 4;
pub const VERTS_PER_FINGER: usize = RING_VERTS * JOINTS_PER_FINGER;
pub const VERTEX_COUNT: usize = VERTS_PER_FINGER * FINGERS;

const CAP_INDICES: usize = 2 * 3;
const TUBE_QUADS: usize = RING_VERTS * (JOINTS_PER_FINGER - 1);
pub const INDEX_COUNT: usize = FINGERS * (2 * CAP_INDICES + TUBE_QUADS * 2 * 3);

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// GPU-ready vertex; `#[repr(C)]` with no padding so it can be uploaded as bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct HandVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

/// Asset name the mesh is registered under.
pub fn mesh_name(handedness: Handedness) -> &'static str {
    match handedness {
        Handedness::Left => "default/mesh_lefthand",
        Handedness::Right => "default/mesh_righthand",
    }
}

#[derive(Clone, Debug, Default)]
pub struct HandMesh {
    id: Option<MeshId>,
    vertices: Vec<HandVertex>,
    indices: Vec<u16>,
}

impl HandMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        !self.indices.is_empty()
    }

    /// Allocate buffers and write indices, uv and color.
    /// Returns `false` when the topology already exists.
    pub fn build_topology(&mut self) -> bool {
        if self.is_built() {
            return false;
        }
        self.indices = build_indices();
        self.vertices = build_static_vertices();
        true
    }

    /// Rewrite ring positions and normals from world-space joints.
    /// Builds the topology first when needed.
    pub fn update_vertices(&mut self, joints: &JointGrid<HandJoint>, thumb_base_scale: f32) {
        self.build_topology();
        let mut v = 0;
        for (f, finger) in joints.iter().enumerate() {
            for (j, joint) in finger.iter().enumerate() {
                let right = joint.orientation * Vec3::X;
                let up = joint.orientation * Vec3::Y;
                let mut radius = joint.radius;
                // thumb base joints coincide and read too thick at full size
                if f == 0 && j < 2 {
                    radius *= thumb_base_scale;
                }
                for normal in ring_normals(right, up) {
                    let vert = &mut self.vertices[v];
                    vert.normal = normal.to_array();
                    vert.position = (joint.position + normal * radius).to_array();
                    v += 1;
                }
            }
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertices(&self) -> &[HandVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Backend handle, once the mesh has been registered.
    pub fn id(&self) -> Option<MeshId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: Option<MeshId>) {
        self.id = id;
    }
}

/// Unit normals around a ring: up-left, up-right, down-right, down-left.
#[inline]
fn ring_normals(right: Vec3, up: Vec3) -> [Vec3; RING_VERTS] {
    let s = std::f32::consts::FRAC_1_SQRT_2;
    [
        (up - right) * s,
        (right + up) * s,
        (right - up) * s,
        (-up - right) * s,
    ]
}

fn build_indices() -> Vec<u16> {
    let mut inds: Vec<u16> = Vec::with_capacity(INDEX_COUNT);
    for f in 0..FINGERS {
        let start = (f * VERTS_PER_FINGER) as u16;
        let end = ((f + 1) * VERTS_PER_FINGER) as u16;

        inds.extend_from_slice(&[start, start + 1, start + 2, start, start + 2, start + 3]);

        for j in 0..(JOINTS_PER_FINGER - 1) as u16 {
            for c in 0..RING_VERTS as u16 {
                let c1 = (c + 1) % RING_VERTS as u16;
                let ring = RING_VERTS as u16;
                let curr = start + j * ring + c;
                let next = start + (j + 1) * ring + c;
                let curr1 = start + j * ring + c1;
                let next1 = start + (j + 1) * ring + c1;
                inds.extend_from_slice(&[curr, next, next1, curr, next1, curr1]);
            }
        }

        inds.extend_from_slice(&[end - 2, end - 3, end - 4, end - 1, end - 2, end - 4]);
    }
    inds
}

fn build_static_vertices() -> Vec<HandVertex> {
    let mut verts = Vec::with_capacity(VERTEX_COUNT);
    for f in 0..FINGERS {
        for j in 0..JOINTS_PER_FINGER {
            // thumb texture starts at its second (coincident) joint
            let v = if f == 0 {
                (j as f32 - 1.0).max(0.0) / (JOINTS_PER_FINGER - 2) as f32
            } else {
                j as f32 / (JOINTS_PER_FINGER - 1) as f32
            };
            for u in [0.0, 0.5, 1.0, 0.5] {
                verts.push(HandVertex {
                    uv: [u, v],
                    color: WHITE,
                    ..Default::default()
                });
            }
        }
    }
    verts
}
