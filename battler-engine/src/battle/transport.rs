use tokio::sync::{
    broadcast,
    mpsc,
    oneshot,
    watch,
};

use crate::battle::{
    Choice,
    ChoiceRequest,
    Perspective,
};

/// The answer to a [`ChoiceRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceResponse {
    Choice(Choice),
    /// The side gave no answer. The battle substitutes a default choice.
    Cancelled,
}

/// Collects choices from whoever controls each side.
///
/// The battle calls the transport from its own thread and waits for the answer.
pub trait ChoiceTransport {
    fn request_choice(&mut self, request: &ChoiceRequest) -> ChoiceResponse;
}

/// A request handed to another thread, along with the channel to answer it on.
#[derive(Debug)]
pub struct PendingChoice {
    pub request: ChoiceRequest,
    reply: oneshot::Sender<Choice>,
}

impl PendingChoice {
    /// Answers the request. Returns false if the battle stopped waiting.
    pub fn respond(self, choice: Choice) -> bool {
        self.reply.send(choice).is_ok()
    }
}

/// A [`ChoiceTransport`] that hands requests to another thread over a channel.
///
/// Dropping a [`PendingChoice`] without answering it, or dropping the receiver, cancels the
/// request. `request_choice` blocks the calling thread, so it must not be called from within an
/// async runtime.
pub struct ChannelChoiceTransport {
    requests: mpsc::UnboundedSender<PendingChoice>,
}

impl ChannelChoiceTransport {
    /// Creates a transport and the receiver that pending requests arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PendingChoice>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (Self { requests }, receiver)
    }
}

impl ChoiceTransport for ChannelChoiceTransport {
    fn request_choice(&mut self, request: &ChoiceRequest) -> ChoiceResponse {
        let (reply, reply_rx) = oneshot::channel();
        let pending = PendingChoice {
            request: request.clone(),
            reply,
        };
        if self.requests.send(pending).is_err() {
            log::debug!("choice receiver for side {} is closed", request.side);
            return ChoiceResponse::Cancelled;
        }
        match reply_rx.blocking_recv() {
            Ok(choice) => ChoiceResponse::Choice(choice),
            Err(_) => ChoiceResponse::Cancelled,
        }
    }
}

/// Log lines produced by one executed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventBurst {
    pub lines: Vec<String>,
    pub perspective: Perspective,
}

/// Publishes battle events to observers.
///
/// Observers that fall behind miss bursts rather than slowing the battle down.
pub struct EventPublisher {
    bursts: broadcast::Sender<EventBurst>,
    perspective: watch::Sender<Perspective>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (bursts, _) = broadcast::channel(capacity);
        let (perspective, _) = watch::channel(Perspective::default());
        Self {
            bursts,
            perspective,
        }
    }

    /// Subscribes to every burst published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<EventBurst> {
        self.bursts.subscribe()
    }

    /// Watches the latest perspective.
    pub fn watch_perspective(&self) -> watch::Receiver<Perspective> {
        self.perspective.subscribe()
    }

    pub fn publish(&self, burst: EventBurst) {
        self.perspective.send_replace(burst.perspective.clone());
        if self.bursts.send(burst).is_err() {
            log::trace!("no observers for event burst");
        }
    }
}
