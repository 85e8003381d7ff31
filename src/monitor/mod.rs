pub mod engine;

pub use engine::{Engine, RouteMark, TargetReport};
