//! Contact form submission flow: `idle -> submitting -> success | error -> idle`.

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use serde::Serialize;
use shared::protocol::{ContactFields, FormField, FormStatus, FormStatusKind, RelayErrorBody};
use tokio::{sync::broadcast, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    events::SiteEvent,
    relay::{FormRelay, RelayError, RelayReply},
};

pub const DEFAULT_SUCCESS_CLEAR: Duration = Duration::from_millis(5_000);
pub const SUCCESS_MESSAGE: &str = "Thanks for your message! I'll get back to you soon.";
pub const REJECTED_FALLBACK_MESSAGE: &str = "Oops! There was a problem submitting your form.";
pub const CONNECTIVITY_MESSAGE: &str =
    "Could not reach the server. Please check your connection and try again.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub fields: ContactFields,
    pub status: FormStatus,
    pub submitting: bool,
}

#[derive(Default)]
struct FormInner {
    state: FormState,
    /// Bumped on every submission; replies from older generations are dropped.
    generation: u64,
    clear_timer: Option<JoinHandle<()>>,
}

impl FormInner {
    fn cancel_clear_timer(&mut self) {
        if let Some(timer) = self.clear_timer.take() {
            timer.abort();
        }
    }
}

#[derive(Clone)]
pub struct ContactForm {
    relay: Arc<dyn FormRelay>,
    inner: Arc<Mutex<FormInner>>,
    events: broadcast::Sender<SiteEvent>,
    clear_after: Duration,
}

impl ContactForm {
    pub fn new(
        relay: Arc<dyn FormRelay>,
        clear_after: Duration,
        events: broadcast::Sender<SiteEvent>,
    ) -> Self {
        Self {
            relay,
            inner: Arc::new(Mutex::new(FormInner::default())),
            events,
            clear_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormInner> {
        lock_inner(&self.inner)
    }

    pub fn snapshot(&self) -> FormState {
        self.lock().state.clone()
    }

    pub fn set_field(&self, field: FormField, value: impl Into<String>) {
        let mut inner = self.lock();
        let value = value.into();
        match field {
            FormField::Name => inner.state.fields.name = value,
            FormField::Email => inner.state.fields.email = value,
            FormField::Message => inner.state.fields.message = value,
        }
    }

    /// Teardown: cancels the auto-clear and orphans any in-flight submission,
    /// so a late reply is dropped like a superseded one.
    pub fn detach(&self) {
        let mut inner = self.lock();
        inner.cancel_clear_timer();
        inner.generation += 1;
        inner.state.submitting = false;
        debug!(generation = inner.generation, "contact form detached");
    }

    pub fn has_pending_clear(&self) -> bool {
        self.lock()
            .clear_timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Submits whatever is currently in the fields.
    pub async fn submit(&self) -> FormStatus {
        let fields = self.snapshot().fields;
        self.submit_fields(fields).await
    }

    /// Posts `fields` to the relay and resolves the form status. Field
    /// validation is left to the relay.
    pub async fn submit_fields(&self, fields: ContactFields) -> FormStatus {
        let generation = {
            let mut inner = self.lock();
            inner.cancel_clear_timer();
            inner.generation += 1;
            inner.state.fields = fields.clone();
            inner.state.status = FormStatus::idle();
            inner.state.submitting = true;
            self.publish(&inner.state);
            inner.generation
        };
        info!(generation, "submitting contact form");
        let _abandoned = AbandonGuard {
            form: self,
            generation,
        };

        let outcome = self.relay.post(&fields).await;
        let status = resolve_status(outcome);

        let mut inner = self.lock();
        if inner.generation != generation {
            warn!(
                generation,
                current = inner.generation,
                "discarding reply for superseded submission"
            );
            return status;
        }

        inner.state.submitting = false;
        inner.state.status = status.clone();
        if status.kind == FormStatusKind::Success {
            inner.state.fields = ContactFields::default();
            inner.clear_timer = Some(self.spawn_clear_timer(generation));
        }
        self.publish(&inner.state);
        status
    }

    fn spawn_clear_timer(&self, generation: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let events = self.events.clone();
        let delay = self.clear_after;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut inner = lock_inner(&inner);
            if inner.generation != generation || inner.state.status.kind != FormStatusKind::Success
            {
                return;
            }
            inner.state.status = FormStatus::idle();
            inner.clear_timer = None;
            debug!(generation, "success message cleared");
            let _ = events.send(SiteEvent::FormChanged(inner.state.clone()));
        })
    }

    fn publish(&self, state: &FormState) {
        let _ = self.events.send(SiteEvent::FormChanged(state.clone()));
    }
}

/// Clears `submitting` if the submit future is dropped before its reply lands.
struct AbandonGuard<'a> {
    form: &'a ContactForm,
    generation: u64,
}

impl Drop for AbandonGuard<'_> {
    fn drop(&mut self) {
        let mut inner = self.form.lock();
        if inner.generation == self.generation && inner.state.submitting {
            inner.state.submitting = false;
            debug!(generation = self.generation, "submission abandoned before reply");
            self.form.publish(&inner.state);
        }
    }
}

fn lock_inner(inner: &Mutex<FormInner>) -> MutexGuard<'_, FormInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Maps a relay outcome to the user-facing status. Never fails: a body that
/// cannot be parsed falls back to the generic rejection message.
pub fn resolve_status(outcome: Result<RelayReply, RelayError>) -> FormStatus {
    match outcome {
        Ok(reply) if reply.is_ok() => FormStatus::success(SUCCESS_MESSAGE),
        Ok(reply) => {
            let detail = serde_json::from_slice::<RelayErrorBody>(&reply.body)
                .ok()
                .and_then(|body| body.first_message().map(str::to_string));
            warn!(
                status = reply.status,
                has_detail = detail.is_some(),
                "form relay rejected submission"
            );
            FormStatus::error(detail.unwrap_or_else(|| REJECTED_FALLBACK_MESSAGE.to_string()))
        }
        Err(err) => {
            warn!(error = %err, "form relay unreachable");
            FormStatus::error(CONNECTIVITY_MESSAGE)
        }
    }
}

#[cfg(test)]
#[path = "tests/contact_tests.rs"]
mod tests;
