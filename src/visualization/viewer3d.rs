use std::collections::HashMap;
use std::rc::Rc;

use bevy::app::AppExit;
use bevy::input::touch::{TouchInput, TouchPhase, Touches};
use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow, WindowResized};

use crate::error::SimResult;
use crate::pointer::camera::{camera_distance_for_width, PerspectiveCamera};
use crate::pointer::events::{PointerEvent, PointerEventBus, Viewport};
use crate::render::scene::{Scene, VisualId, VisualShape};
use crate::render::target::{RenderTarget, Renderer, TextureHandle};
use crate::simulation::scenario::Scenario;
use crate::simulation::simulator::Simulator;
use crate::simulation::states::{NQuat, NVec3};

/// Component tagging each mesh with the debug visual it mirrors
#[derive(Component)]
struct VisualIndex(VisualId);

/// Transparency of the debug meshes, stands in for wireframe
const DEBUG_ALPHA: f32 = 0.35;

/// Renderer that copies the simulator's debug scene into bevy transforms.
/// `render` snapshots poses, `sync_transforms_3d` applies them.
#[derive(Default)]
struct SceneMirror {
    bound: Option<TextureHandle>,
    poses: HashMap<VisualId, (NVec3, NQuat, bool)>,
}

impl Renderer for SceneMirror {
    fn set_render_target(&mut self, target: Option<&RenderTarget>) {
        self.bound = target.map(RenderTarget::texture);
    }

    fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) -> SimResult<()> {
        // only the simulator's offscreen pass is mirrored
        if self.bound.is_none() {
            return Ok(());
        }
        self.poses.clear();
        for (id, visual) in scene.iter() {
            self.poses
                .insert(id, (visual.position, visual.quaternion, visual.visible));
        }
        Ok(())
    }
}

/// Everything the frame loop needs; not `Send` because of the shared buffers
struct ViewerState {
    sim: Simulator,
    bus: Rc<PointerEventBus>,
    mirror: SceneMirror,
}

/// Open a window and drive the simulator once per frame
pub fn run_3d(scenario: Scenario) {
    let vp = &scenario.config.viewport;
    let bus = Rc::new(PointerEventBus::new(Viewport::new(vp.width as f64, vp.height as f64)));
    let sim = match Simulator::new(&scenario, &bus) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("run_3d: failed to build simulator: {e}");
            return;
        }
    };
    println!("run_3d: starting viewer with {} spheres", sim.spheres().len());

    App::new()
        .insert_non_send_resource(ViewerState {
            sim,
            bus,
            mirror: SceneMirror::default(),
        })
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(
            Update,
            (forward_pointer, resize_3d, physics_step_3d, sync_transforms_3d).chain(),
        )
        .run();
}

fn to_vec3(v: &NVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

fn to_quat(q: &NQuat) -> Quat {
    Quat::from_xyzw(q.i as f32, q.j as f32, q.k as f32, q.w as f32)
}

/// Startup system: spawn the camera and one mesh per debug visual
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut state: NonSendMut<ViewerState>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    // responsive distance from the initial width, later widths come via resize_3d
    if let Ok(window) = windows.get_single() {
        let (w, h) = (window.width() as f64, window.height() as f64);
        state.bus.set_viewport(Viewport::new(w, h));
        state.sim.handle_resize(w as u32, h as u32);
        state.sim.set_camera_position_z(camera_distance_for_width(w));
    }

    let cam = state.sim.camera();
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)),
            ..Default::default()
        },
        projection: Projection::Perspective(PerspectiveProjection {
            fov: (cam.fov as f32).to_radians(),
            near: cam.near as f32,
            far: cam.far as f32,
            ..Default::default()
        }),
        transform: Transform::from_translation(to_vec3(&cam.position)).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    for (id, visual) in state.sim.scene().iter() {
        let mesh = match visual.shape {
            VisualShape::Sphere { radius } => meshes.add(Sphere::new(radius as f32).mesh()),
            VisualShape::Plane { width, height } => meshes.add(Rectangle::new(width as f32, height as f32)),
        };
        let [r, g, b] = visual.color;
        let alpha = if visual.wireframe { DEBUG_ALPHA } else { 1.0 };

        commands.spawn((
            PbrBundle {
                mesh,
                material: materials.add(StandardMaterial {
                    base_color: Color::srgba(r, g, b, alpha),
                    alpha_mode: AlphaMode::Blend,
                    unlit: true,
                    double_sided: true,
                    cull_mode: None,
                    ..Default::default()
                }),
                transform: Transform::from_translation(to_vec3(&visual.position))
                    .with_rotation(to_quat(&visual.quaternion)),
                ..Default::default()
            },
            VisualIndex(id),
        ));
    }
}

/// Feed window cursor/touch events into the simulator's event bus
fn forward_pointer(
    state: NonSend<ViewerState>,
    mut cursor: EventReader<CursorMoved>,
    mut touch_events: EventReader<TouchInput>,
    touches: Res<Touches>,
) {
    for ev in cursor.read() {
        state.bus.dispatch(&PointerEvent::MouseMove {
            page_x: ev.position.x as f64,
            page_y: ev.position.y as f64,
        });
    }

    if touch_events.read().any(|ev| ev.phase == TouchPhase::Moved) {
        let mut active: Vec<_> = touches.iter().map(|t| (t.id(), t.position())).collect();
        active.sort_by_key(|(id, _)| *id);
        state.bus.dispatch(&PointerEvent::TouchMove {
            touches: active.iter().map(|(_, p)| [p.x as f64, p.y as f64]).collect(),
        });
    }
}

/// Window resize: viewport, simulator target/camera, responsive camera distance
fn resize_3d(
    mut state: NonSendMut<ViewerState>,
    mut resized: EventReader<WindowResized>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    let Some(ev) = resized.read().last() else {
        return;
    };
    let (w, h) = (ev.width as f64, ev.height as f64);
    state.bus.set_viewport(Viewport::new(w, h));

    let z = camera_distance_for_width(w);
    state.sim.handle_resize(ev.width as u32, ev.height as u32);
    state.sim.set_camera_position_z(z);

    for mut transform in &mut cameras {
        *transform = Transform::from_xyz(0.0, 0.0, z as f32).looking_at(Vec3::ZERO, Vec3::Y);
    }
}

/// Per-frame simulator update; a failed frame stops the app
fn physics_step_3d(mut state: NonSendMut<ViewerState>, mut exit: EventWriter<AppExit>) {
    let ViewerState { sim, mirror, .. } = &mut *state;
    if let Err(e) = sim.update(mirror) {
        error!("simulator update failed: {e}");
        exit.send(AppExit::error());
    }
}

fn sync_transforms_3d(
    state: NonSend<ViewerState>,
    mut query: Query<(&VisualIndex, &mut Transform, &mut Visibility)>,
) {
    for (VisualIndex(id), mut transform, mut visibility) in &mut query {
        if let Some((position, quaternion, visible)) = state.mirror.poses.get(id) {
            transform.translation = to_vec3(position);
            transform.rotation = to_quat(quaternion);
            *visibility = if *visible {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
        }
    }
}
