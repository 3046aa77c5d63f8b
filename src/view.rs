//! Page view collaborator.
//!
//! A view receives a `url` property, navigates the underlying web engine when it
//! differs from what is loaded, and emits a load event once the engine finishes.
//! Rendering is up to the [`WebEngine`] implementation.

use serde::Serialize;
use tokio::sync::broadcast;
use url::Url;

const EVENT_CAPACITY: usize = 16;

/// The rendering engine behind a [`PageView`].
pub trait WebEngine: Send {
    /// URL currently loaded, if any.
    fn current_url(&self) -> Option<&Url>;

    /// Start loading `url`.
    fn load(&mut self, url: Url);
}

/// Payload of the `onLoad` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadEvent {
    pub url: String,
}

pub struct PageView<E> {
    engine: E,
    events: broadcast::Sender<LoadEvent>,
}

impl<E: WebEngine> PageView<E> {
    pub fn new(engine: E) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { engine, events }
    }

    /// Apply the `url` property. Returns whether a navigation was started.
    pub fn set_url(&mut self, url: Url) -> bool {
        if self.engine.current_url() == Some(&url) {
            return false;
        }
        tracing::debug!(url = %url, "navigating");
        self.engine.load(url);
        true
    }

    /// Called by the engine when a load completes; notifies every subscriber.
    pub fn did_finish_load(&self, url: &Url) {
        let event = LoadEvent {
            url: url.to_string(),
        };
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LoadEvent> {
        self.events.subscribe()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}
