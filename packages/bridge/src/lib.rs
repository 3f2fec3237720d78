//! # Sitecanvas Bridge
//!
//! Editor-side owner of the communication channel to one embedded preview
//! frame.
//!
//! ## Design
//!
//! - Outbound sends are gated on frame readiness: until the frame reports
//!   `IFRAME_READY`, messages queue FIFO and flush exactly once, in order,
//!   when readiness is first observed
//! - Readiness is one-way (false → true) for the lifetime of one frame
//!   instance; binding a new frame resets it
//! - Inbound messages pass an origin check, then tolerant decoding, then
//!   synchronous dispatch to a single handler per message type
//! - Transport failures are logged and dropped, never raised to the caller

mod bridge;

pub use bridge::{FrameBridge, FrameSink};
