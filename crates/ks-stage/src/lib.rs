//! # ks-stage — Kakuhen Stage System
//!
//! Defines the stages a spin passes through, as seen from outside the engine.
//! Presentation, animation and audio never read engine internals, only STAGES.
//!
//! ## Philosophy
//!
//! Every spin passes through the same semantic phases:
//! - Spin starts → Reels animate → Reels stop → Outcome presented → Balance rolls up
//!
//! This crate defines these stages, their payloads and a trace container.

pub mod event;
pub mod stage;
pub mod taxonomy;
pub mod trace;

pub use event::*;
pub use stage::*;
pub use taxonomy::*;
pub use trace::*;
