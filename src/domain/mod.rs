//! Domain layer - behavioral signals and persona assignment.

pub mod banking;
pub mod foundation;
pub mod persona;
pub mod signals;
