//! Offscreen render target and the renderer seam.
//!
//! Rendering itself happens outside the crate. The host supplies a
//! [`Renderer`]; the simulator binds its own [`RenderTarget`], draws its debug
//! scene into it and binds the default target again. `HeadlessRenderer`
//! stands in when there is no GPU (CLI runs, tests).

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::error::SimResult;
use crate::pointer::camera::PerspectiveCamera;
use crate::render::scene::{Scene, VisualId};
use crate::simulation::states::NVec3;

static NEXT_TARGET_ID: AtomicU64 = AtomicU64::new(1);

/// Read-only view of a target's color buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle {
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
pub struct RenderTarget {
    id: u64,
    width: u32,
    height: u32,
    disposed: bool,
}

impl RenderTarget {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            id: NEXT_TARGET_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            disposed: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn texture(&self) -> TextureHandle {
        TextureHandle {
            id: self.id,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns whether the size actually changed
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        if (self.width, self.height) == (width, height) {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Release the target; safe to call more than once
    pub fn dispose(&mut self) {
        if !self.disposed {
            debug!("render target {} released", self.id);
            self.disposed = true;
        }
    }
}

/// Render-to-texture interface provided by the host
pub trait Renderer {
    /// Bind `target`, or the default framebuffer when `None`
    fn set_render_target(&mut self, target: Option<&RenderTarget>);

    /// Draw `scene` from `camera` into the bound target
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> SimResult<()>;
}

/// What a headless render call saw
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub target: Option<TextureHandle>,
    pub camera_position: NVec3,
    pub poses: Vec<(VisualId, NVec3)>,
}

/// Renderer that records frames instead of drawing them
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    bound: Option<TextureHandle>,
    frames: usize,
    last: Option<RenderedFrame>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently bound target, `None` means the default framebuffer
    pub fn bound_target(&self) -> Option<TextureHandle> {
        self.bound
    }

    pub fn frames_rendered(&self) -> usize {
        self.frames
    }

    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.last.as_ref()
    }
}

impl Renderer for HeadlessRenderer {
    fn set_render_target(&mut self, target: Option<&RenderTarget>) {
        self.bound = target.map(RenderTarget::texture);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> SimResult<()> {
        self.frames += 1;
        self.last = Some(RenderedFrame {
            target: self.bound,
            camera_position: camera.world_position(),
            poses: scene
                .iter()
                .filter(|(_, v)| v.visible)
                .map(|(id, v)| (id, v.position))
                .collect(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut target = RenderTarget::new(640, 480);
        let before = target.texture();
        assert!(!target.set_size(640, 480));
        assert_eq!(target.texture(), before);
        assert!(target.set_size(800, 600));
        assert_eq!(target.texture().width, 800);
        assert_eq!(target.texture().id, before.id);
    }

    #[test]
    fn dispose_is_idempotent() {
        let mut target = RenderTarget::new(2, 2);
        target.dispose();
        target.dispose();
        assert!(target.is_disposed());
    }

    #[test]
    fn targets_get_distinct_ids() {
        assert_ne!(RenderTarget::new(1, 1).id(), RenderTarget::new(1, 1).id());
    }
}
