//! Event handler system.
//!
//! Handlers for non-command updates. The relay handler drives the whole
//! forwarding path; it is wired into the dispatcher schema in
//! [`crate::bot::dispatcher`].

pub mod relay;
