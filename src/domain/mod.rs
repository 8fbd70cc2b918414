// Domain layer - Core business logic

pub mod errors;
pub mod language;
pub mod model;
pub mod rules;
pub mod selection;
