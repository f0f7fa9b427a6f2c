//! In-memory render and physics backends.
//!
//! Both recorders keep enough state to answer questions about live resources
//! (reference counts, enablement, last pose) and queue every call as a
//! serializable command. Adapters drain the queue once per frame and replay
//! it against their engine; tests inspect the state directly.

use glam::{Mat4, Vec3};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::backend::{MaterialId, MeshId, PhysicsBackend, ProxyId, RenderBackend};
use crate::joint::Pose;
use crate::material::HandMaterialDesc;
use crate::mesh::HandVertex;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderCommand {
    CreateMaterial {
        id: MaterialId,
        desc: HandMaterialDesc,
    },
    DestroyMaterial {
        id: MaterialId,
    },
    CreateMesh {
        id: MeshId,
        name: String,
    },
    SetIndices {
        mesh: MeshId,
        indices: Vec<u16>,
    },
    SetVertices {
        mesh: MeshId,
        vertices: Vec<HandVertex>,
    },
    DestroyMesh {
        mesh: MeshId,
    },
    Draw {
        mesh: MeshId,
        material: MaterialId,
        transform: Mat4,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhysicsCommand {
    CreateBox { id: ProxyId, size: Vec3 },
    SetEnabled { id: ProxyId, enabled: bool },
    Move { id: ProxyId, pose: Pose },
    Destroy { id: ProxyId },
}

#[derive(Clone, Debug)]
struct MaterialEntry {
    desc: HandMaterialDesc,
    refs: u32,
}

/// Latest data uploaded to a live mesh.
#[derive(Clone, Debug, Default)]
pub struct RecordedMesh {
    pub name: String,
    pub indices: Vec<u16>,
    pub vertices: Vec<HandVertex>,
}

#[derive(Debug, Default)]
pub struct RenderRecorder {
    next_id: u32,
    materials: HashMap<MaterialId, MaterialEntry>,
    meshes: HashMap<MeshId, RecordedMesh>,
    commands: Vec<RenderCommand>,
}

impl RenderRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// Current reference count; 0 for unknown or destroyed materials.
    pub fn refcount(&self, id: MaterialId) -> u32 {
        self.materials.get(&id).map_or(0, |m| m.refs)
    }

    pub fn material(&self, id: MaterialId) -> Option<&HandMaterialDesc> {
        self.materials.get(&id).map(|m| &m.desc)
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn mesh(&self, id: MeshId) -> Option<&RecordedMesh> {
        self.meshes.get(&id)
    }

    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    /// Commands queued since the last drain.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Take the queue. Every drawn tick queues a full vertex upload, so
    /// hosts drain once per frame.
    pub fn drain(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl RenderBackend for RenderRecorder {
    fn create_material(&mut self, desc: &HandMaterialDesc) -> MaterialId {
        let id = MaterialId(self.alloc());
        self.materials.insert(
            id,
            MaterialEntry {
                desc: desc.clone(),
                refs: 1,
            },
        );
        self.commands.push(RenderCommand::CreateMaterial {
            id,
            desc: desc.clone(),
        });
        id
    }

    fn acquire_material(&mut self, id: MaterialId) {
        match self.materials.get_mut(&id) {
            Some(entry) => entry.refs += 1,
            None => log::warn!("acquire of unknown material {id:?} ignored"),
        }
    }

    fn release_material(&mut self, id: MaterialId) {
        let Some(entry) = self.materials.get_mut(&id) else {
            log::warn!("release of unknown material {id:?} ignored");
            return;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            self.materials.remove(&id);
            self.commands.push(RenderCommand::DestroyMaterial { id });
        }
    }

    fn create_mesh(&mut self, name: &str) -> MeshId {
        let id = MeshId(self.alloc());
        self.meshes.insert(
            id,
            RecordedMesh {
                name: name.to_string(),
                ..Default::default()
            },
        );
        self.commands.push(RenderCommand::CreateMesh {
            id,
            name: name.to_string(),
        });
        id
    }

    fn set_mesh_indices(&mut self, mesh: MeshId, indices: &[u16]) {
        let Some(rec) = self.meshes.get_mut(&mesh) else {
            log::warn!("indices for unknown mesh {mesh:?} ignored");
            return;
        };
        rec.indices = indices.to_vec();
        self.commands.push(RenderCommand::SetIndices {
            mesh,
            indices: indices.to_vec(),
        });
    }

    fn set_mesh_vertices(&mut self, mesh: MeshId, vertices: &[HandVertex]) {
        let Some(rec) = self.meshes.get_mut(&mesh) else {
            log::warn!("vertices for unknown mesh {mesh:?} ignored");
            return;
        };
        rec.vertices = vertices.to_vec();
        self.commands.push(RenderCommand::SetVertices {
            mesh,
            vertices: vertices.to_vec(),
        });
    }

    fn release_mesh(&mut self, mesh: MeshId) {
        if self.meshes.remove(&mesh).is_some() {
            self.commands.push(RenderCommand::DestroyMesh { mesh });
        } else {
            log::warn!("release of unknown mesh {mesh:?} ignored");
        }
    }

    fn submit(&mut self, mesh: MeshId, material: MaterialId, transform: Mat4) {
        self.commands.push(RenderCommand::Draw {
            mesh,
            material,
            transform,
        });
    }
}

/// State of one live physics proxy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RecordedProxy {
    pub size: Vec3,
    pub enabled: bool,
    pub pose: Pose,
}

#[derive(Debug, Default)]
pub struct PhysicsRecorder {
    next_id: u32,
    proxies: HashMap<ProxyId, RecordedProxy>,
    commands: Vec<PhysicsCommand>,
}

impl PhysicsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proxy(&self, id: ProxyId) -> Option<&RecordedProxy> {
        self.proxies.get(&id)
    }

    /// False for unknown or released proxies.
    pub fn is_enabled(&self, id: ProxyId) -> bool {
        self.proxies.get(&id).is_some_and(|p| p.enabled)
    }

    pub fn pose(&self, id: ProxyId) -> Option<Pose> {
        self.proxies.get(&id).map(|p| p.pose)
    }

    pub fn live_proxies(&self) -> usize {
        self.proxies.len()
    }

    pub fn commands(&self) -> &[PhysicsCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> Vec<PhysicsCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl PhysicsBackend for PhysicsRecorder {
    fn create_box(&mut self, size: Vec3) -> ProxyId {
        self.next_id += 1;
        let id = ProxyId(self.next_id);
        self.proxies.insert(
            id,
            RecordedProxy {
                size,
                enabled: true,
                pose: Pose::IDENTITY,
            },
        );
        self.commands.push(PhysicsCommand::CreateBox { id, size });
        id
    }

    fn set_enabled(&mut self, proxy: ProxyId, enabled: bool) {
        let Some(p) = self.proxies.get_mut(&proxy) else {
            log::warn!("enable on unknown proxy {proxy:?} ignored");
            return;
        };
        p.enabled = enabled;
        self.commands.push(PhysicsCommand::SetEnabled { id: proxy, enabled });
    }

    fn move_to(&mut self, proxy: ProxyId, pose: Pose) {
        let Some(p) = self.proxies.get_mut(&proxy) else {
            log::warn!("move of unknown proxy {proxy:?} ignored");
            return;
        };
        p.pose = pose;
        self.commands.push(PhysicsCommand::Move { id: proxy, pose });
    }

    fn release(&mut self, proxy: ProxyId) {
        if self.proxies.remove(&proxy).is_some() {
            self.commands.push(PhysicsCommand::Destroy { id: proxy });
        } else {
            log::warn!("release of unknown proxy {proxy:?} ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_refcount_lifecycle() {
        let mut r = RenderRecorder::new();
        let id = r.create_material(&HandMaterialDesc::default_hand());
        r.acquire_material(id);
        assert_eq!(r.refcount(id), 2);
        r.release_material(id);
        r.release_material(id);
        assert_eq!(r.refcount(id), 0);
        assert_eq!(r.live_materials(), 0);
        // dead handle: logged no-op
        r.release_material(id);
        let kinds: Vec<_> = r
            .drain()
            .into_iter()
            .filter(|c| matches!(c, RenderCommand::DestroyMaterial { .. }))
            .collect();
        assert_eq!(kinds.len(), 1);
        assert!(r.commands().is_empty());
    }

    #[test]
    fn mesh_uploads_are_kept() {
        let mut r = RenderRecorder::new();
        let m = r.create_mesh("default/mesh_lefthand");
        r.set_mesh_indices(m, &[0, 1, 2]);
        assert_eq!(r.mesh(m).map(|m| m.indices.len()), Some(3));
        r.release_mesh(m);
        r.release_mesh(m);
        assert!(r.mesh(m).is_none());
        // writes to a dead mesh are dropped
        r.set_mesh_indices(m, &[0]);
        assert_eq!(r.live_meshes(), 0);
    }

    #[test]
    fn proxy_state_tracks_calls() {
        let mut p = PhysicsRecorder::new();
        let id = p.create_box(Vec3::new(0.03, 0.1, 0.2));
        p.set_enabled(id, false);
        assert!(!p.is_enabled(id));
        let pose = Pose::new(Vec3::Y, glam::Quat::IDENTITY);
        p.move_to(id, pose);
        assert_eq!(p.pose(id), Some(pose));
        p.release(id);
        assert!(!p.is_enabled(id));
        assert_eq!(p.live_proxies(), 0);
        assert_eq!(p.drain().len(), 4);
    }

    #[test]
    fn commands_serialize_with_kind_tag() {
        let cmd = PhysicsCommand::SetEnabled {
            id: ProxyId(3),
            enabled: true,
        };
        let v = serde_json::to_value(&cmd).unwrap();
        assert_eq!(v["kind"], "set_enabled");
        assert_eq!(v["id"], 3);
    }
}
