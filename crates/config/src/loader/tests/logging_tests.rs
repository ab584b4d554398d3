//! Log event tests for the configuration loader.
//!
//! Responsibilities:
//! - Test that omitted required keys are reported at WARN.
//! - Test that values never appear in emitted log fields.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use serial_test::serial;

use super::env_lock;
use crate::environment::MapEnv;
use crate::loader::builder::ConfigLoader;
use crate::loader::env::EnvOptions;

/// Minimal in-test tracing subscriber that records each event's level, message and fields.
#[derive(Clone, Default)]
struct CapturingSubscriber {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    next_id: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: String,
}

impl CapturingSubscriber {
    fn take_events(&self) -> Vec<CapturedEvent> {
        std::mem::take(&mut *self.events.lock().expect("lock poisoned"))
    }
}

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl tracing::field::Visit for EventVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{value:?}"));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

impl tracing::Subscriber for CapturingSubscriber {
    fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _attrs: &tracing::span::Attributes<'_>) -> tracing::span::Id {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::span::Id::from_u64(id)
    }

    fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}

    fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.events
            .lock()
            .expect("lock poisoned")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                message: visitor.message.unwrap_or_default(),
                fields: visitor.fields.join(" "),
            });
    }

    fn enter(&self, _span: &tracing::span::Id) {}

    fn exit(&self, _span: &tracing::span::Id) {}

    fn register_callsite(
        &self,
        _metadata: &'static tracing::Metadata<'static>,
    ) -> tracing::subscriber::Interest {
        tracing::subscriber::Interest::always()
    }

    fn clone_span(&self, id: &tracing::span::Id) -> tracing::span::Id {
        tracing::span::Id::from_u64(id.into_u64())
    }

    fn try_close(&self, _id: tracing::span::Id) -> bool {
        true
    }
}

fn capture_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let _guard = env_lock().lock().unwrap();

    let subscriber = CapturingSubscriber {
        events: Arc::new(Mutex::new(Vec::new())),
        next_id: Arc::new(AtomicU64::new(1)),
    };

    let dispatch = tracing::Dispatch::new(subscriber.clone());
    tracing::dispatcher::with_default(&dispatch, f);
    subscriber.take_events()
}

#[test]
#[serial]
fn test_omitted_required_key_logs_warning() {
    let env = MapEnv::new().with_var("DB_USERNAME", "admin");
    let options = EnvOptions::new()
        .with_required_keys(["DB_USERNAME", "DB_PASSWORD"])
        .raise_on_missing(false);

    let events = capture_events(|| {
        let config = ConfigLoader::from_env_source()
            .load_from_env_with(&env, &options)
            .unwrap();
        assert_eq!(config.len(), 1);
    });

    let warning = events
        .iter()
        .find(|e| e.level == tracing::Level::WARN)
        .unwrap_or_else(|| panic!("expected a warning; got: {events:?}"));
    assert!(
        warning
            .message
            .contains("Omitting missing required environment variables"),
        "got: {warning:?}"
    );
    assert!(warning.fields.contains("DB_PASSWORD"), "got: {warning:?}");
}

#[test]
#[serial]
fn test_default_substitution_logs_key_not_value() {
    let env = MapEnv::new();
    let options = EnvOptions::new()
        .with_required_keys(["DB_PASSWORD"])
        .with_default("DB_PASSWORD", "hunter2");

    let events = capture_events(|| {
        ConfigLoader::from_env_source()
            .load_from_env_with(&env, &options)
            .unwrap();
    });

    assert!(
        events.iter().any(|e| e.fields.contains("DB_PASSWORD")),
        "expected the key to be logged; got: {events:?}"
    );
    assert!(
        events
            .iter()
            .all(|e| !e.fields.contains("hunter2") && !e.message.contains("hunter2")),
        "values must never be logged; got: {events:?}"
    );
    assert!(events.iter().all(|e| e.level != tracing::Level::WARN));
}
