//! orgsnap: snapshot lifecycle orchestration for a remote configuration
//! service.
//!
//! The library captures a point-in-time export of an organization's
//! configured resources as a snapshot, drives the server-side pipeline to a
//! terminal state by polling its report endpoint, and validates user-authored
//! page-template packages before they are bundled into snapshot resources.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
