use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::render::texture::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};

use vizij_hands_core::mesh::mesh_name;
use vizij_hands_core::{
    HandMaterialDesc, HandVertex, Handedness, PhysicsCommand, RenderCommand, Transparency,
};

use crate::components::{HandProxy, HandSkin};
use crate::resources::{HandEntityIndex, HandInputs, VizijHands};

/// Advance both hands by the frame's real (unscaled) delta.
pub fn tick_hands(time: Res<Time<Real>>, inputs: Res<HandInputs>, mut hands: ResMut<VizijHands>) {
    hands.0.update(time.delta_seconds(), &inputs.hands);
}

/// Replay queued render commands: spawn/despawn skin entities, upload
/// vertex data into `Assets<Mesh>` and show the skins drawn this frame.
/// Asset stores that are not present (headless apps) are skipped.
pub fn apply_render_commands(world: &mut World) {
    let commands = match world.get_resource_mut::<VizijHands>() {
        Some(mut hands) => hands.0.render_mut().drain(),
        None => return,
    };

    // Skins are only visible on frames that draw them
    let mut skins = world.query::<(&HandSkin, &mut Visibility)>();
    for (_, mut vis) in skins.iter_mut(world) {
        *vis = Visibility::Hidden;
    }

    world.init_resource::<HandEntityIndex>();
    world.resource_scope(|world, mut index: Mut<HandEntityIndex>| {
        for cmd in commands {
            match cmd {
                RenderCommand::CreateMaterial { id, desc } => {
                    if let Some(handle) = create_material(world, &desc) {
                        index.materials.insert(id, handle);
                    }
                }
                RenderCommand::DestroyMaterial { id } => {
                    index.materials.remove(&id);
                }
                RenderCommand::CreateMesh { id, name } => {
                    let handle = world
                        .get_resource_mut::<Assets<Mesh>>()
                        .map(|mut meshes| meshes.add(empty_mesh()));
                    let handedness = Handedness::ALL
                        .into_iter()
                        .find(|h| mesh_name(*h) == name);
                    let mut entity = world.spawn((
                        Name::new(name),
                        HandSkin {
                            mesh: id,
                            handedness,
                            vertex_count: 0,
                            index_count: 0,
                        },
                        SpatialBundle::HIDDEN_IDENTITY,
                    ));
                    if let Some(handle) = handle {
                        entity.insert(handle);
                    }
                    index.skins.insert(id, entity.id());
                }
                RenderCommand::SetIndices { mesh, indices } => {
                    let Some(&entity) = index.skins.get(&mesh) else {
                        continue;
                    };
                    if let Some(mut skin) = world.get_mut::<HandSkin>(entity) {
                        skin.index_count = indices.len();
                    }
                    with_mesh(world, entity, |m| m.insert_indices(Indices::U16(indices)));
                }
                RenderCommand::SetVertices { mesh, vertices } => {
                    let Some(&entity) = index.skins.get(&mesh) else {
                        continue;
                    };
                    if let Some(mut skin) = world.get_mut::<HandSkin>(entity) {
                        skin.vertex_count = vertices.len();
                    }
                    with_mesh(world, entity, |m| write_vertices(m, &vertices));
                }
                RenderCommand::DestroyMesh { mesh } => {
                    let Some(entity) = index.skins.remove(&mesh) else {
                        continue;
                    };
                    let handle = world.get::<Handle<Mesh>>(entity).cloned();
                    if let (Some(handle), Some(mut meshes)) =
                        (handle, world.get_resource_mut::<Assets<Mesh>>())
                    {
                        meshes.remove(&handle);
                    }
                    world.despawn(entity);
                }
                RenderCommand::Draw {
                    mesh,
                    material,
                    transform,
                } => {
                    let Some(&entity) = index.skins.get(&mesh) else {
                        continue;
                    };
                    let Some(mut e) = world.get_entity_mut(entity) else {
                        continue;
                    };
                    e.insert((Transform::from_matrix(transform), Visibility::Visible));
                    if let Some(handle) = index.materials.get(&material) {
                        e.insert(handle.clone());
                    }
                }
            }
        }
    });
}

/// Replay queued physics commands onto `HandProxy` entities.
pub fn apply_physics_commands(world: &mut World) {
    let commands = match world.get_resource_mut::<VizijHands>() {
        Some(mut hands) => hands.0.physics_mut().drain(),
        None => return,
    };
    if commands.is_empty() {
        return;
    }

    world.init_resource::<HandEntityIndex>();
    world.resource_scope(|world, mut index: Mut<HandEntityIndex>| {
        for cmd in commands {
            match cmd {
                PhysicsCommand::CreateBox { id, size } => {
                    let entity = world
                        .spawn((
                            Name::new(format!("hand_proxy_{}", id.0)),
                            HandProxy {
                                id,
                                size,
                                enabled: true,
                            },
                            TransformBundle::default(),
                        ))
                        .id();
                    index.proxies.insert(id, entity);
                }
                PhysicsCommand::SetEnabled { id, enabled } => {
                    let Some(&entity) = index.proxies.get(&id) else {
                        continue;
                    };
                    if let Some(mut proxy) = world.get_mut::<HandProxy>(entity) {
                        proxy.enabled = enabled;
                    }
                }
                PhysicsCommand::Move { id, pose } => {
                    let Some(&entity) = index.proxies.get(&id) else {
                        continue;
                    };
                    if let Some(mut tf) = world.get_mut::<Transform>(entity) {
                        tf.translation = pose.position;
                        tf.rotation = pose.orientation;
                    }
                }
                PhysicsCommand::Destroy { id } => {
                    if let Some(entity) = index.proxies.remove(&id) {
                        world.despawn(entity);
                    }
                }
            }
        }
    });
}

fn empty_mesh() -> Mesh {
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
}

fn with_mesh(world: &mut World, entity: Entity, f: impl FnOnce(&mut Mesh)) {
    let Some(handle) = world.get::<Handle<Mesh>>(entity).cloned() else {
        return;
    };
    let Some(mut meshes) = world.get_resource_mut::<Assets<Mesh>>() else {
        return;
    };
    if let Some(mesh) = meshes.get_mut(&handle) {
        f(mesh);
    }
}

fn write_vertices(mesh: &mut Mesh, vertices: &[HandVertex]) {
    let positions: Vec<[f32; 3]> = vertices.iter().map(|v| v.position).collect();
    let normals: Vec<[f32; 3]> = vertices.iter().map(|v| v.normal).collect();
    let uvs: Vec<[f32; 2]> = vertices.iter().map(|v| v.uv).collect();
    let colors: Vec<[f32; 4]> = vertices
        .iter()
        .map(|v| v.color.map(|c| c as f32 / 255.0))
        .collect();
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
}

/// StandardMaterial for a core material description. Needs
/// `Assets<StandardMaterial>`; the gradient texture is attached when
/// `Assets<Image>` is present too.
fn create_material(world: &mut World, desc: &HandMaterialDesc) -> Option<Handle<StandardMaterial>> {
    let texture = gradient_image(desc).and_then(|image| {
        world
            .get_resource_mut::<Assets<Image>>()
            .map(|mut images| images.add(image))
    });
    let mut materials = world.get_resource_mut::<Assets<StandardMaterial>>()?;
    Some(materials.add(StandardMaterial {
        base_color: Color::WHITE,
        base_color_texture: texture,
        alpha_mode: match desc.transparency {
            Transparency::Opaque => AlphaMode::Opaque,
            Transparency::Blend => AlphaMode::Blend,
        },
        unlit: true,
        ..default()
    }))
}

fn gradient_image(desc: &HandMaterialDesc) -> Option<Image> {
    let size = desc.texture_size;
    if size == 0 || desc.texels.len() != (size * size) as usize {
        warn!("hand material texture has {} texels for a {size}x{size} image", desc.texels.len());
        return None;
    }
    let data: Vec<u8> = desc.texels.iter().flatten().copied().collect();
    let mut image = Image::new(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );
    if desc.clamp {
        image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
            address_mode_u: ImageAddressMode::ClampToEdge,
            address_mode_v: ImageAddressMode::ClampToEdge,
            ..default()
        });
    }
    Some(image)
}
