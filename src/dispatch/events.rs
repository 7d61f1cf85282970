//! Interaction events emitted when a rich element is selected.

use tokio::sync::mpsc;

use crate::models::RichElement;

/// A user selection reported back to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionEvent {
    /// Text the host should send on the user's behalf, if any.
    pub text_to_send: Option<String>,
    pub element: RichElement,
}

/// Channel-backed receiver for interaction events.
///
/// Sending never blocks, so the callback can be invoked from inside a render
/// pass.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<InteractionEvent>,
}

impl EventSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<InteractionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, text_to_send: Option<String>, element: RichElement) {
        let event = InteractionEvent {
            text_to_send,
            element,
        };
        if self.tx.send(event).is_err() {
            tracing::warn!("Interaction receiver dropped -- event discarded");
        }
    }

    /// Adapt the sink to the dispatcher's callback shape.
    pub fn callback(&self) -> impl FnMut(Option<String>, RichElement) + '_ {
        move |text, element| self.emit(text, element)
    }
}
