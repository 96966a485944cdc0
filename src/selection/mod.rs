pub mod engine;
pub mod naming;
pub mod policy;

pub use engine::{Selection, SelectionEngine};
pub use policy::{InclusionReason, SelectionPolicy};
