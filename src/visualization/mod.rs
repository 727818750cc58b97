#[cfg(feature = "viewer")]
pub mod viewer3d;
