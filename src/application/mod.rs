//! Application services: snapshot lifecycle orchestration and template
//! validation.

pub mod snapshot;
pub mod template;
