//! Error type for the simulation core.
//!
//! Most failures here are programming faults (double attachment, use after
//! dispose). They are returned rather than panicking so the host frame loop
//! can halt or rebuild the simulator.

use thiserror::Error;

use crate::render::scene::VisualId;
use crate::simulation::world::BodyHandle;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("body already has a dynamics handle attached")]
    AlreadyAttached,

    #[error("body already has a debug visual attached")]
    VisualAlreadyAttached,

    #[error("body has no dynamics handle attached")]
    NotAttached,

    #[error("unknown rigid body {0:?}")]
    UnknownBody(BodyHandle),

    #[error("unknown debug visual {0:?}")]
    UnknownVisual(VisualId),

    #[error("simulator has been disposed")]
    Disposed,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("render failed: {0}")]
    Render(String),
}

pub type SimResult<T> = Result<T, SimError>;
