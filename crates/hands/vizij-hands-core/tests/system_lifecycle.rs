use std::cell::RefCell;
use std::rc::Rc;

use glam::{Mat4, Quat, Vec3};
use vizij_hands_core::{
    HandConfig, HandError, HandInput, HandMaterialDesc, HandSystem, HandVertex, Handedness,
    MaterialId, MeshId, PhysicsBackend, PhysicsCommand, PhysicsRecorder, Pose, ProxyId,
    RenderBackend, RenderCommand, RenderRecorder, INDEX_COUNT, VERTEX_COUNT,
};

type System = HandSystem<RenderRecorder, PhysicsRecorder>;

fn system_with(cfg: HandConfig) -> System {
    HandSystem::new(cfg, RenderRecorder::new(), PhysicsRecorder::new()).unwrap()
}

fn system() -> System {
    system_with(HandConfig::default())
}

fn tracked() -> HandInput {
    HandInput::buttons(
        Pose::new(Vec3::new(0.0, 1.0, -0.3), Quat::IDENTITY),
        false,
        false,
    )
}

fn count<T>(cmds: &[T], pred: impl Fn(&T) -> bool) -> usize {
    cmds.iter().filter(|c| pred(c)).count()
}

#[test]
fn each_hand_holds_one_material_reference() {
    let sys = system();
    let left = sys.material(Handedness::Left).unwrap();
    assert_eq!(sys.material(Handedness::Right), Some(left));
    assert_eq!(sys.render().refcount(left), 2);
    let desc = sys.render().material(left).unwrap();
    assert_eq!(desc, &HandMaterialDesc::default_hand());
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = HandConfig {
        blend_rate: 0.0,
        ..Default::default()
    };
    let err = HandSystem::new(cfg, RenderRecorder::new(), PhysicsRecorder::new()).err();
    assert!(matches!(err, Some(HandError::InvalidConfig(_))));
}

#[test]
fn shutdown_releases_everything_once() {
    let mut sys = system();
    let mat = sys.material(Handedness::Left).unwrap();
    sys.update(1.0 / 60.0, &[tracked(), tracked()]);
    assert_eq!(sys.render().live_meshes(), 2);

    sys.shutdown();
    assert_eq!(sys.render().refcount(mat), 0);
    assert_eq!(sys.render().live_materials(), 0);
    assert_eq!(sys.render().live_meshes(), 0);
    assert_eq!(sys.physics().live_proxies(), 0);

    sys.render_mut().drain();
    sys.physics_mut().drain();
    sys.shutdown();
    assert!(sys.render().commands().is_empty());
    assert!(sys.physics().commands().is_empty());

    // ticks after shutdown do nothing
    sys.update(1.0 / 60.0, &[tracked(), tracked()]);
    assert!(sys.render().commands().is_empty());
    assert!(sys.is_shut_down());
}

#[test]
fn mesh_is_built_once_and_redrawn_every_tick() {
    let mut sys = system();
    for _ in 0..3 {
        sys.update_hand(Handedness::Left, 1.0 / 60.0, &tracked());
    }
    let cmds = sys.render_mut().drain();
    assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::CreateMesh { .. })), 1);
    assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::SetIndices { .. })), 1);
    assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::SetVertices { .. })), 3);
    assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::Draw { .. })), 3);

    let mesh = sys.mesh(Handedness::Left);
    assert_eq!(mesh.vertex_count(), VERTEX_COUNT);
    assert_eq!(mesh.index_count(), INDEX_COUNT);
    let recorded = sys.render().mesh(mesh.id().unwrap()).unwrap();
    assert_eq!(recorded.name, "default/mesh_lefthand");
    assert_eq!(recorded.indices.len(), 540);
    assert_eq!(recorded.vertices.len(), 100);

    match cmds.last() {
        Some(RenderCommand::Draw { transform, .. }) => assert_eq!(*transform, Mat4::IDENTITY),
        other => panic!("expected draw, got {other:?}"),
    }
    // right hand never tracked: no mesh yet
    assert!(sys.mesh(Handedness::Right).id().is_none());
}

#[test]
fn hidden_or_untracked_hands_are_not_drawn() {
    let mut sys = system();
    sys.set_visible(Handedness::Left, false);
    assert!(!sys.is_visible(Handedness::Left));
    sys.update(1.0 / 60.0, &[tracked(), HandInput::untracked()]);
    let cmds = sys.render_mut().drain();
    assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::Draw { .. })), 0);

    sys.set_visible(Handedness::Left, true);
    sys.update(1.0 / 60.0, &[tracked(), HandInput::untracked()]);
    let cmds = sys.render_mut().drain();
    assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::Draw { .. })), 1);
}

#[test]
fn none_material_disables_skin() {
    let mut sys = system();
    let mat = sys.material(Handedness::Left).unwrap();
    sys.set_material(Handedness::Left, None);
    assert_eq!(sys.render().refcount(mat), 1);

    sys.update_hand(Handedness::Left, 1.0 / 60.0, &tracked());
    let cmds = sys.render_mut().drain();
    assert_eq!(count(&cmds, |c| matches!(c, RenderCommand::Draw { .. })), 0);

    sys.set_material(Handedness::Left, Some(mat));
    sys.set_material(Handedness::Left, Some(mat));
    assert_eq!(sys.render().refcount(mat), 2);
    sys.update_hand(Handedness::Left, 1.0 / 60.0, &tracked());
    let cmds = sys.render_mut().drain();
    let draws = count(&cmds, |c| {
        matches!(c, RenderCommand::Draw { material, .. } if *material == mat)
    });
    assert_eq!(draws, 1);
}

#[test]
fn custom_material_replaces_default() {
    let mut sys = system();
    let default = sys.material(Handedness::Right).unwrap();
    let custom = sys.render_mut().create_material(&HandMaterialDesc {
        transparency: vizij_hands_core::Transparency::Opaque,
        ..HandMaterialDesc::default_hand()
    });
    sys.set_material(Handedness::Right, Some(custom));
    sys.render_mut().release_material(custom);
    assert_eq!(sys.render().refcount(custom), 1);
    assert_eq!(sys.render().refcount(default), 1);

    sys.shutdown();
    assert_eq!(sys.render().live_materials(), 0);
}

#[test]
fn set_material_after_shutdown_takes_no_reference() {
    let mut sys = system();
    let custom = sys
        .render_mut()
        .create_material(&HandMaterialDesc::default_hand());
    sys.shutdown();

    sys.set_material(Handedness::Left, Some(custom));
    assert_eq!(sys.render().refcount(custom), 1);
    assert_eq!(sys.material(Handedness::Left), None);

    sys.render_mut().release_material(custom);
    sys.shutdown();
    assert_eq!(sys.render().refcount(custom), 0);
    assert_eq!(sys.render().live_materials(), 0);
}

#[test]
fn no_default_material_means_no_skin() {
    let mut sys = system_with(HandConfig {
        default_material: false,
        ..Default::default()
    });
    assert_eq!(sys.material(Handedness::Left), None);
    assert_eq!(sys.render().live_materials(), 0);
    sys.update(1.0 / 60.0, &[tracked(), tracked()]);
    assert_eq!(sys.render().live_meshes(), 0);
}

#[test]
fn proxy_follows_tracking_and_solid_toggle() {
    let mut sys = system();
    let cmds = sys.physics_mut().drain();
    let ids: Vec<ProxyId> = cmds
        .iter()
        .filter_map(|c| match c {
            PhysicsCommand::CreateBox { id, size } => {
                assert_eq!(*size, Vec3::new(0.03, 0.1, 0.2));
                Some(*id)
            }
            _ => None,
        })
        .collect();
    assert_eq!(ids.len(), 2);
    let left = ids[0];
    assert!(!sys.physics().is_enabled(left));

    sys.update_hand(Handedness::Left, 1.0 / 60.0, &HandInput::untracked());
    assert!(!sys.physics().is_enabled(left));

    let input = tracked();
    sys.update_hand(Handedness::Left, 1.0 / 60.0, &input);
    assert!(sys.physics().is_enabled(left));
    assert_eq!(sys.physics().pose(left), Some(*input.palm()));

    sys.set_solid(Handedness::Left, false);
    assert!(!sys.is_solid(Handedness::Left));
    assert!(!sys.physics().is_enabled(left));
    sys.update_hand(Handedness::Left, 1.0 / 60.0, &input);
    assert!(!sys.physics().is_enabled(left));

    sys.set_solid(Handedness::Left, true);
    assert!(sys.physics().is_enabled(left));

    sys.update_hand(Handedness::Left, 1.0 / 60.0, &HandInput::untracked());
    assert!(!sys.physics().is_enabled(left));
}

/// Render backend that shares its recorder so state can be read after the
/// system is dropped.
#[derive(Default)]
struct Shared<T>(Rc<RefCell<T>>);

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl RenderBackend for Shared<RenderRecorder> {
    fn create_material(&mut self, desc: &HandMaterialDesc) -> MaterialId {
        self.0.borrow_mut().create_material(desc)
    }
    fn acquire_material(&mut self, id: MaterialId) {
        self.0.borrow_mut().acquire_material(id)
    }
    fn release_material(&mut self, id: MaterialId) {
        self.0.borrow_mut().release_material(id)
    }
    fn create_mesh(&mut self, name: &str) -> MeshId {
        self.0.borrow_mut().create_mesh(name)
    }
    fn set_mesh_indices(&mut self, mesh: MeshId, indices: &[u16]) {
        self.0.borrow_mut().set_mesh_indices(mesh, indices)
    }
    fn set_mesh_vertices(&mut self, mesh: MeshId, vertices: &[HandVertex]) {
        self.0.borrow_mut().set_mesh_vertices(mesh, vertices)
    }
    fn release_mesh(&mut self, mesh: MeshId) {
        self.0.borrow_mut().release_mesh(mesh)
    }
    fn submit(&mut self, mesh: MeshId, material: MaterialId, transform: Mat4) {
        self.0.borrow_mut().submit(mesh, material, transform)
    }
}

impl PhysicsBackend for Shared<PhysicsRecorder> {
    fn create_box(&mut self, size: Vec3) -> ProxyId {
        self.0.borrow_mut().create_box(size)
    }
    fn set_enabled(&mut self, proxy: ProxyId, enabled: bool) {
        self.0.borrow_mut().set_enabled(proxy, enabled)
    }
    fn move_to(&mut self, proxy: ProxyId, pose: Pose) {
        self.0.borrow_mut().move_to(proxy, pose)
    }
    fn release(&mut self, proxy: ProxyId) {
        self.0.borrow_mut().release(proxy)
    }
}

#[test]
fn drop_runs_shutdown() {
    let render = Shared::<RenderRecorder>::default();
    let physics = Shared::<PhysicsRecorder>::default();
    {
        let mut sys =
            HandSystem::new(HandConfig::default(), render.clone(), physics.clone()).unwrap();
        sys.update(1.0 / 60.0, &[tracked(), tracked()]);
        assert_eq!(render.0.borrow().live_meshes(), 2);
        assert_eq!(physics.0.borrow().live_proxies(), 2);
    }
    assert_eq!(render.0.borrow().live_materials(), 0);
    assert_eq!(render.0.borrow().live_meshes(), 0);
    assert_eq!(physics.0.borrow().live_proxies(), 0);
}

#[test]
fn hand_snapshot_serializes() {
    let mut sys = system();
    sys.update_hand(Handedness::Right, 1.0, &tracked());
    let json = serde_json::to_value(sys.hand(Handedness::Right)).unwrap();
    assert_eq!(json["handedness"], "right");
    assert_eq!(json["state"], 3);
    assert_eq!(json["fingers"].as_array().map(|f| f.len()), Some(5));
}
