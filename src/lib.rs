pub mod error;
pub mod simulation;
pub mod pointer;
pub mod render;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use error::{SimError, SimResult};

pub use simulation::states::{Coordinates, NQuat, NVec3, SphereBuffer, SphereDescriptor};
pub use simulation::params::{Parameters, BOUNDARY_HALF_SPACING, FIXED_TIMESTEP, K_DAMPED_PULL, LINEAR_DAMPING};
pub use simulation::world::{BodyHandle, BodyKind, RigidBody, Shape, World};
pub use simulation::body::{Body, PhysicalBody};
pub use simulation::bodies::{BoundaryPlane, DampedSphere, TrackerSphere};
pub use simulation::scenario::Scenario;
pub use simulation::simulator::Simulator;

pub use pointer::camera::{camera_distance_for_width, PerspectiveCamera};
pub use pointer::events::{PointerEvent, PointerEventBus, Viewport};
pub use pointer::projector::{Projector, ReferenceSurface};

pub use render::scene::{DebugVisual, Scene, VisualId, VisualShape};
pub use render::target::{HeadlessRenderer, RenderTarget, Renderer, TextureHandle};

pub use configuration::config::SceneConfig;

#[cfg(feature = "viewer")]
pub use visualization::viewer3d::run_3d;

pub use benchmark::benchmark::bench_update;
