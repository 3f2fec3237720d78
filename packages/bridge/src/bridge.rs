//! The frame bridge itself.

use sitecanvas_protocol::{decode, EditorMessage, Envelope, PreviewMessage, PreviewMessageKind};
use std::collections::{HashMap, VecDeque};
use tracing::{debug, error, warn};

/// Outbound transport handle to one frame.
///
/// The host environment implements this over its cross-document messaging
/// primitive. Tests implement it over a shared buffer.
pub trait FrameSink: Send {
    fn post(&self, message: serde_json::Value);
}

type Handler = Box<dyn FnMut(Envelope<PreviewMessage>) + Send>;

/// Manages exactly one outbound channel to a preview frame, with
/// readiness-gated delivery and origin security.
pub struct FrameBridge {
    allowed_origins: Vec<String>,
    frame: Option<Box<dyn FrameSink>>,
    ready: bool,
    queue: VecDeque<Envelope<EditorMessage>>,
    handlers: HashMap<PreviewMessageKind, Handler>,
}

impl Default for FrameBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBridge {
    pub fn new() -> Self {
        Self {
            allowed_origins: Vec::new(),
            frame: None,
            ready: false,
            queue: VecDeque::new(),
            handlers: HashMap::new(),
        }
    }

    /// Configure the inbound origin allow-list.
    ///
    /// Until this is set to a non-empty list the bridge accepts messages
    /// from any origin, a deliberately loose default for local development.
    pub fn set_allowed_origins(&mut self, origins: Vec<String>) {
        self.allowed_origins = origins;
    }

    /// Bind the bridge to a concrete frame handle.
    ///
    /// Resets readiness: the new frame instance must report `IFRAME_READY`
    /// before queued or future sends are delivered.
    pub fn set_frame(&mut self, frame: Box<dyn FrameSink>) {
        self.frame = Some(frame);
        self.ready = false;
    }

    /// Whether the bound frame has reported readiness.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of messages waiting for readiness.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Register a handler for one inbound message type.
    ///
    /// One handler per type; a later registration replaces the earlier one.
    pub fn on<F>(&mut self, kind: PreviewMessageKind, handler: F)
    where
        F: FnMut(Envelope<PreviewMessage>) + Send + 'static,
    {
        self.handlers.insert(kind, Box::new(handler));
    }

    /// Remove the handler for one inbound message type.
    pub fn off(&mut self, kind: PreviewMessageKind) {
        self.handlers.remove(&kind);
    }

    /// Send a command to the frame.
    ///
    /// Stamps `messageId`/`timestamp`, then delivers immediately if the
    /// frame is ready, else enqueues. A send with no bound frame is dropped
    /// with a logged error; the caller sees no failure.
    pub fn send(&mut self, message: EditorMessage) {
        if self.frame.is_none() {
            error!(kind = ?message.kind(), "send dropped: no frame bound");
            return;
        }

        let envelope = Envelope::new(message);
        if self.ready {
            self.post(envelope);
        } else {
            self.queue.push_back(envelope);
        }
    }

    /// Feed one inbound message, with its sender origin, into the bridge.
    ///
    /// Order of checks: origin allow-list, structural decode, readiness
    /// bookkeeping, handler dispatch. Dispatch is synchronous on the turn
    /// the message arrives.
    pub fn receive(&mut self, origin: &str, value: &serde_json::Value) {
        if !self.allowed_origins.is_empty()
            && !self.allowed_origins.iter().any(|o| o == origin)
        {
            warn!(origin, "dropped message from unauthorized origin");
            return;
        }

        let Some(envelope) = decode::<PreviewMessage>(value) else {
            debug!("dropped malformed or unrecognized message");
            return;
        };

        if envelope.message.kind() == PreviewMessageKind::IframeReady && !self.ready {
            self.ready = true;
            self.flush();
        }

        let kind = envelope.message.kind();
        if let Some(handler) = self.handlers.get_mut(&kind) {
            handler(envelope);
        }
    }

    /// Deliver everything queued before readiness, in send order.
    fn flush(&mut self) {
        while let Some(envelope) = self.queue.pop_front() {
            self.post(envelope);
        }
    }

    fn post(&self, envelope: Envelope<EditorMessage>) {
        let Some(frame) = self.frame.as_ref() else {
            return;
        };
        match serde_json::to_value(&envelope) {
            Ok(value) => frame.post(value),
            Err(err) => error!(%err, "failed to serialize outbound message"),
        }
    }
}
