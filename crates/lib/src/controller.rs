//! Conversation controller — orchestrates one turn end to end.
//!
//! One instance per live session. A turn moves through: input accepted,
//! repetition check + name extraction + classification + composition (all
//! synchronous), then the assistant message is held back by a presenter
//! thread for a fixed delay before it is appended and persisted. While the
//! reply is held back a presenting flag rejects further submissions, so two
//! turns can never interleave.
//!
//! Teardown invalidates a liveness token; a presentation still pending at
//! that point becomes a no-op instead of writing into a dead session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::compose;
use crate::intent;
use crate::name;
use crate::repeat;
use crate::state::{ConversationState, Message};
use crate::store::SessionStore;

/// What happened to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Turn accepted; a reply will be presented after the delay.
    Accepted,
    /// Blank input or torn-down session. No state change.
    Ignored,
    /// A reply is still being presented; try again once it lands.
    Busy,
}

/// Signals the controller emits toward the host UI.
#[derive(Debug, Clone)]
pub enum UiEvent {
    /// An assistant reply was appended to the log.
    ReplyPresented {
        message: Message,
        /// Whether to offer the "contact support" affordance next to it.
        suggests_handoff: bool,
    },
    /// The user activated the handoff affordance; route them to support.
    NavigateToSupport,
}

/// A composed reply waiting out its presentation delay.
struct PendingReply {
    text: String,
    suggests_handoff: bool,
}

/// Drives one conversational session against an injected session store.
pub struct Controller {
    state: Arc<Mutex<ConversationState>>,
    store: Arc<dyn SessionStore>,
    /// Liveness token. Cleared on teardown; the presenter checks it before
    /// touching state.
    live: Arc<AtomicBool>,
    /// Set while a reply is held back; guards against a concurrent turn.
    presenting: Arc<AtomicBool>,
    handoff_sent: AtomicBool,
    pending_tx: Sender<PendingReply>,
    event_tx: Sender<UiEvent>,
    event_rx: Receiver<UiEvent>,
    _presenter: std::thread::JoinHandle<()>,
}

impl Controller {
    /// Restore the session from the store, or seed a fresh one with the
    /// welcome message. `delay` is the fixed presentation delay applied to
    /// every assistant reply.
    pub fn new(store: Arc<dyn SessionStore>, delay: Duration) -> Self {
        let state = store.load().unwrap_or_else(|| {
            tracing::debug!("no saved session; seeding welcome message");
            let state = ConversationState::seeded();
            store.save(&state);
            state
        });
        let state = Arc::new(Mutex::new(state));

        let live = Arc::new(AtomicBool::new(true));
        let presenting = Arc::new(AtomicBool::new(false));
        let (pending_tx, pending_rx) = channel::unbounded::<PendingReply>();
        let (event_tx, event_rx) = channel::unbounded::<UiEvent>();

        let presenter = std::thread::Builder::new()
            .name("reply-presenter".to_string())
            .spawn({
                let state = state.clone();
                let store = store.clone();
                let live = live.clone();
                let presenting = presenting.clone();
                let event_tx = event_tx.clone();
                move || {
                    Self::run_presenter(pending_rx, state, store, live, presenting, event_tx, delay)
                }
            })
            .expect("failed to spawn reply-presenter thread");

        Self {
            state,
            store,
            live,
            presenting,
            handoff_sent: AtomicBool::new(false),
            pending_tx,
            event_tx,
            event_rx,
            _presenter: presenter,
        }
    }

    /// Submit one raw user input. The only inbound entry point.
    pub fn submit(&self, raw: &str) -> SubmitOutcome {
        if raw.trim().is_empty() {
            return SubmitOutcome::Ignored;
        }
        if !self.live.load(Ordering::SeqCst) {
            tracing::debug!("submission after teardown ignored");
            return SubmitOutcome::Ignored;
        }
        if self.presenting.swap(true, Ordering::SeqCst) {
            return SubmitOutcome::Busy;
        }

        let reply = {
            let mut guard = self.state.lock();

            // Repeat check runs against history as it was before this turn.
            let is_repeat = repeat::is_repeat(raw, guard.history());

            if let Some(candidate) = name::extract(raw) {
                if guard.note_name(&candidate) {
                    tracing::info!(name = %candidate, "user introduced themselves");
                }
            }

            guard.push_user(raw);
            self.store.save(&guard);

            let category = intent::classify(raw);
            tracing::debug!(?category, is_repeat, "classified user turn");
            compose::compose(category, is_repeat, guard.known_name())
        };

        let pending = PendingReply {
            text: reply.text,
            suggests_handoff: reply.suggests_handoff,
        };
        if self.pending_tx.send(pending).is_err() {
            // Presenter is gone; only reachable if the thread panicked.
            tracing::warn!("reply presenter unavailable; dropping reply");
            self.presenting.store(false, Ordering::SeqCst);
        }
        SubmitOutcome::Accepted
    }

    /// The user activated the handoff affordance: emit the navigate-to-support
    /// signal (at most once per session) and end the session.
    pub fn request_human_handoff(&self) {
        if self.handoff_sent.swap(true, Ordering::SeqCst) {
            return;
        }
        let _ = self.event_tx.send(UiEvent::NavigateToSupport);
        self.end_session();
    }

    /// Session-end signal from the host page. Invalidates the liveness token
    /// (cancelling any pending presentation) and erases the persisted record.
    pub fn end_session(&self) {
        if !self.live.swap(false, Ordering::SeqCst) {
            return;
        }
        self.store.clear();
        tracing::info!("session ended; persisted history cleared");
    }

    /// Snapshot of the message log.
    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().messages().to_vec()
    }

    pub fn known_name(&self) -> Option<String> {
        self.state.lock().known_name().map(str::to_string)
    }

    /// Whether a reply is currently held back by the presentation delay.
    pub fn is_presenting(&self) -> bool {
        self.presenting.load(Ordering::SeqCst)
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Receiver for UI signals. Cloneable; the host drains it.
    pub fn events(&self) -> Receiver<UiEvent> {
        self.event_rx.clone()
    }

    fn run_presenter(
        pending_rx: Receiver<PendingReply>,
        state: Arc<Mutex<ConversationState>>,
        store: Arc<dyn SessionStore>,
        live: Arc<AtomicBool>,
        presenting: Arc<AtomicBool>,
        event_tx: Sender<UiEvent>,
        delay: Duration,
    ) {
        while let Ok(pending) = pending_rx.recv() {
            std::thread::sleep(delay);

            if !live.load(Ordering::SeqCst) {
                tracing::debug!("presentation cancelled; session torn down");
                presenting.store(false, Ordering::SeqCst);
                continue;
            }

            let message = {
                let mut guard = state.lock();
                let message = guard.push_assistant(&pending.text);
                store.save(&guard);
                message
            };
            presenting.store(false, Ordering::SeqCst);

            let _ = event_tx.send(UiEvent::ReplyPresented {
                message,
                suggests_handoff: pending.suggests_handoff,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::Category;
    use crate::state::WELCOME_TEXT;
    use crate::store::MemorySessionStore;

    const EVENT_WAIT: Duration = Duration::from_secs(2);

    fn controller() -> Controller {
        Controller::new(Arc::new(MemorySessionStore::new()), Duration::ZERO)
    }

    fn submit_and_wait(controller: &Controller, events: &Receiver<UiEvent>, input: &str) -> (Message, bool) {
        assert_eq!(controller.submit(input), SubmitOutcome::Accepted);
        match events.recv_timeout(EVENT_WAIT) {
            Ok(UiEvent::ReplyPresented {
                message,
                suggests_handoff,
            }) => (message, suggests_handoff),
            other => panic!("expected a presented reply, got {:?}", other),
        }
    }

    #[test]
    fn test_fresh_session_seeds_welcome() {
        let controller = controller();
        let messages = controller.messages();
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].is_from_user);
        assert_eq!(messages[0].text, WELCOME_TEXT);
    }

    #[test]
    fn test_malformed_persisted_payload_reseeds_welcome() {
        let store = Arc::new(MemorySessionStore::with_record("{ not json"));
        let controller = Controller::new(store, Duration::ZERO);
        let messages = controller.messages();
        assert_eq!(messages.len(), 1);
        assert!(!messages[0].is_from_user);
        assert_eq!(messages[0].text, WELCOME_TEXT);
    }

    #[test]
    fn test_greeting_then_repeat_greeting() {
        let controller = controller();
        let events = controller.events();

        let (reply, _) = submit_and_wait(&controller, &events, "Hello");
        assert_eq!(
            reply.text,
            compose::compose(Category::Greeting, false, None).text
        );

        let (reply, _) = submit_and_wait(&controller, &events, "Hello");
        assert_eq!(
            reply.text,
            compose::compose(Category::Greeting, true, None).text
        );
    }

    #[test]
    fn test_repeat_detection_ignores_case_and_whitespace() {
        let controller = controller();
        let events = controller.events();

        submit_and_wait(&controller, &events, "what courses do you have");
        let (reply, _) = submit_and_wait(&controller, &events, "  What Courses Do You Have ");
        assert_eq!(
            reply.text,
            compose::compose(Category::Course, true, None).text
        );
    }

    #[test]
    fn test_name_extraction_and_prefixing() {
        let controller = controller();
        let events = controller.events();

        submit_and_wait(&controller, &events, "My name is Thabo");
        assert_eq!(controller.known_name().as_deref(), Some("Thabo"));

        let (reply, _) = submit_and_wait(&controller, &events, "What courses do you have");
        assert!(reply.text.starts_with("Thabo, "));
    }

    #[test]
    fn test_name_is_sticky_across_later_patterns() {
        let controller = controller();
        let events = controller.events();

        submit_and_wait(&controller, &events, "My name is Thabo");
        submit_and_wait(&controller, &events, "call me Lerato");
        assert_eq!(controller.known_name().as_deref(), Some("Thabo"));

        let (reply, _) = submit_and_wait(&controller, &events, "tell me about a university");
        assert!(reply.text.starts_with("Thabo, "));
    }

    #[test]
    fn test_blank_input_is_a_no_op() {
        let controller = controller();
        let before = controller.messages().len();
        assert_eq!(controller.submit(""), SubmitOutcome::Ignored);
        assert_eq!(controller.submit("   "), SubmitOutcome::Ignored);
        assert_eq!(controller.messages().len(), before);
        assert!(!controller.is_presenting());
    }

    #[test]
    fn test_second_submission_rejected_while_presenting() {
        let controller = Controller::new(
            Arc::new(MemorySessionStore::new()),
            Duration::from_millis(300),
        );
        let events = controller.events();

        assert_eq!(controller.submit("Hello"), SubmitOutcome::Accepted);
        assert!(controller.is_presenting());
        assert_eq!(controller.submit("are you there"), SubmitOutcome::Busy);

        // Once the reply lands the controller accepts input again.
        assert!(matches!(
            events.recv_timeout(EVENT_WAIT),
            Ok(UiEvent::ReplyPresented { .. })
        ));
        assert_eq!(controller.submit("are you there"), SubmitOutcome::Accepted);
    }

    #[test]
    fn test_teardown_cancels_pending_presentation() {
        let store = Arc::new(MemorySessionStore::new());
        let controller = Controller::new(store.clone(), Duration::from_millis(100));

        assert_eq!(controller.submit("Hello"), SubmitOutcome::Accepted);
        controller.end_session();
        std::thread::sleep(Duration::from_millis(300));

        // Welcome + user message only; the held-back reply never landed.
        let messages = controller.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].is_from_user);
        // And the persisted record is gone.
        assert!(store.load().is_none());
    }

    #[test]
    fn test_presenting_flag_clears_after_cancelled_presentation() {
        let controller = Controller::new(
            Arc::new(MemorySessionStore::new()),
            Duration::from_millis(100),
        );

        assert_eq!(controller.submit("Hello"), SubmitOutcome::Accepted);
        controller.end_session();
        std::thread::sleep(Duration::from_millis(300));

        // The cancelled presentation must not leave the flag stuck.
        assert!(!controller.is_presenting());
    }

    #[test]
    fn test_reset_rebuilds_fresh_session_from_same_store() {
        let store = Arc::new(MemorySessionStore::new());
        let controller = Controller::new(store.clone(), Duration::ZERO);
        let events = controller.events();
        submit_and_wait(&controller, &events, "Hello");

        // Host-side reset: end the session, then rebuild on the same store.
        controller.end_session();
        let controller = Controller::new(store, Duration::ZERO);
        let events = controller.events();

        let messages = controller.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, WELCOME_TEXT);

        // The old history is gone, so the same greeting is first-time again.
        let (reply, _) = submit_and_wait(&controller, &events, "Hello");
        assert_eq!(
            reply.text,
            compose::compose(Category::Greeting, false, None).text
        );
    }

    #[test]
    fn test_submission_after_teardown_ignored() {
        let controller = controller();
        controller.end_session();
        assert_eq!(controller.submit("Hello"), SubmitOutcome::Ignored);
    }

    #[test]
    fn test_contact_reply_suggests_handoff() {
        let controller = controller();
        let events = controller.events();

        let (_, suggests) = submit_and_wait(&controller, &events, "I want to contact support");
        assert!(suggests);
    }

    #[test]
    fn test_handoff_emitted_once_and_ends_session() {
        let controller = controller();
        let events = controller.events();

        submit_and_wait(&controller, &events, "I want to contact support");
        controller.request_human_handoff();
        controller.request_human_handoff();

        assert!(matches!(
            events.recv_timeout(EVENT_WAIT),
            Ok(UiEvent::NavigateToSupport)
        ));
        assert!(events.try_recv().is_err());
        assert!(!controller.is_live());
    }

    #[test]
    fn test_restores_persisted_log_and_repeat_survives_reload() {
        let store = Arc::new(MemorySessionStore::new());
        {
            let controller = Controller::new(store.clone(), Duration::ZERO);
            let events = controller.events();
            submit_and_wait(&controller, &events, "what courses do you have");
            // No end_session: the page was not torn down, only re-opened.
        }

        let controller = Controller::new(store, Duration::ZERO);
        let events = controller.events();
        assert_eq!(controller.messages().len(), 3);

        // History rehydrated from the log, so the same question is a repeat.
        let (reply, _) = submit_and_wait(&controller, &events, "what courses do you have");
        assert_eq!(
            reply.text,
            compose::compose(Category::Course, true, None).text
        );
    }
}
