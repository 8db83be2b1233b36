//! Utility helpers: math extensions, the generational arena, and logging.

pub mod allocator;
pub mod logging;
pub mod math;

pub use allocator::{Arena, EntityId};
pub use math::*;
