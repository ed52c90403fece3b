//! Server-push stream subscriptions.
//!
//! A [`Subscription`] wraps one transport stream, decodes raw wire items
//! into domain values and delivers them to registered listeners. Items are
//! delivered in arrival order with no buffering or backpressure; a slow
//! listener is the listener's problem.
//!
//! Cancellation is caller-initiated with an asynchronous effect: `cancel()`
//! returns immediately and the transport later acknowledges with a
//! cancellation status, which is suppressed rather than delivered — it is
//! the expected completion signal, not a failure.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use serde_json::Value;

use noderpc_core::RawStream;

use crate::error::ClientError;

/// Listener registry key for decoded items.
pub const EVENT_DATA: &str = "data";
/// Listener registry key for stream failures.
pub const EVENT_ERROR: &str = "error";

/// Lifecycle of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    Created,
    Listening,
    /// Terminated by the caller; no further callbacks run.
    Cancelled,
    /// Terminated by a genuine stream failure.
    Errored,
    /// The remote ended the stream. Node streams are intended to run
    /// indefinitely, so this mostly shows up with test transports.
    Completed,
}

/// A value delivered to listeners.
#[derive(Debug)]
pub enum StreamEvent<T> {
    Data(T),
    Error(ClientError),
}

impl<T> StreamEvent<T> {
    /// The registry key this event dispatches under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Data(_) => EVENT_DATA,
            Self::Error(_) => EVENT_ERROR,
        }
    }
}

type Listener<T> = Arc<dyn Fn(&StreamEvent<T>) + Send + Sync + 'static>;

/// Per-stream decode function from raw wire item to domain value.
pub(crate) type DecodeFn<T> = Arc<dyn Fn(Value) -> Result<T, ClientError> + Send + Sync>;

struct Shared<T> {
    listeners: Mutex<HashMap<&'static str, Vec<Listener<T>>>>,
    state: Mutex<SubscriptionState>,
    cancelled: AtomicBool,
    canceller: Box<dyn Fn() + Send + Sync>,
}

impl<T> Shared<T> {
    fn set_state(&self, state: SubscriptionState) {
        *self.state.lock().unwrap() = state;
    }

    fn dispatch(&self, event: StreamEvent<T>) {
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }
        // Snapshot the callbacks and release the registry lock before
        // invoking them, so a callback may register further listeners.
        let callbacks: Vec<Listener<T>> = {
            let listeners = self.listeners.lock().unwrap();
            listeners.get(event.name()).cloned().unwrap_or_default()
        };
        for callback in &callbacks {
            callback(&event);
        }
    }
}

/// Handle to one active push-stream subscription.
///
/// Clones share the same underlying stream and listener registry, so a data
/// callback can capture a clone and cancel from inside the callback.
pub struct Subscription<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> Subscription<T> {
    /// Wrap a transport stream and start the dispatch task.
    pub(crate) fn open(raw: RawStream, decode: DecodeFn<T>) -> Self {
        let (mut items, canceller) = raw.into_parts();
        let shared = Arc::new(Shared {
            listeners: Mutex::new(HashMap::new()),
            state: Mutex::new(SubscriptionState::Created),
            cancelled: AtomicBool::new(false),
            canceller,
        });
        shared.set_state(SubscriptionState::Listening);

        let task = Arc::clone(&shared);
        tokio::spawn(async move {
            while let Some(item) = items.next().await {
                if task.cancelled.load(Ordering::SeqCst) {
                    break;
                }
                match item {
                    Ok(raw_item) => match decode(raw_item) {
                        Ok(value) => task.dispatch(StreamEvent::Data(value)),
                        // A malformed item is reported but does not tear
                        // down the stream.
                        Err(e) => task.dispatch(StreamEvent::Error(e)),
                    },
                    Err(e) if e.is_cancelled() => {
                        tracing::debug!("stream cancelled by caller, suppressing status");
                        task.set_state(SubscriptionState::Cancelled);
                        return;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "stream failed");
                        task.set_state(SubscriptionState::Errored);
                        task.dispatch(StreamEvent::Error(ClientError::Transport(e)));
                        return;
                    }
                }
            }
            if task.cancelled.load(Ordering::SeqCst) {
                task.set_state(SubscriptionState::Cancelled);
            } else {
                task.set_state(SubscriptionState::Completed);
            }
        });

        Self { shared }
    }
}

impl<T> Subscription<T> {
    /// Register a listener under an event name (`data` or `error`).
    /// Registration is allowed from inside another listener; it takes effect
    /// from the next delivered event.
    pub fn on(
        &self,
        event: &'static str,
        callback: impl Fn(&StreamEvent<T>) + Send + Sync + 'static,
    ) {
        self.shared
            .listeners
            .lock()
            .unwrap()
            .entry(event)
            .or_default()
            .push(Arc::new(callback));
    }

    /// Register a listener for decoded items.
    pub fn on_data(&self, callback: impl Fn(&T) + Send + Sync + 'static) {
        self.on(EVENT_DATA, move |event| {
            if let StreamEvent::Data(value) = event {
                callback(value);
            }
        });
    }

    /// Register a listener for stream failures.
    pub fn on_error(&self, callback: impl Fn(&ClientError) + Send + Sync + 'static) {
        self.on(EVENT_ERROR, move |event| {
            if let StreamEvent::Error(err) = event {
                callback(err);
            }
        });
    }

    /// Request termination. Returns immediately; after this no further data
    /// or error callbacks are delivered, including the transport's own
    /// cancellation acknowledgement.
    pub fn cancel(&self) {
        if self.shared.cancelled.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.set_state(SubscriptionState::Cancelled);
        (self.shared.canceller)();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SubscriptionState {
        *self.shared.state.lock().unwrap()
    }
}

impl<T> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
