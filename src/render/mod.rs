pub mod scene;
pub mod target;
