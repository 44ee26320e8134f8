#![deny(clippy::all, clippy::pedantic)]

pub mod snapshots;
pub mod templates;
