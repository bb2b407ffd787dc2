use std::sync::Arc;

use parking_lot::Mutex;

use crate::port::{ActionFailedEvent, Event, MarginActionEvent, Notifier};

/// Thread-safe event collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn margin_actions(&self) -> Vec<MarginActionEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::MarginAction(e) => Some(e.clone()),
                Event::ActionFailed(_) => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<ActionFailedEvent> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                Event::ActionFailed(e) => Some(e.clone()),
                Event::MarginAction(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
