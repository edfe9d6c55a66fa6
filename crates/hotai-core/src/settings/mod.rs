//! User settings domain model.

mod model;

pub use model::{Settings, WindowBounds};
