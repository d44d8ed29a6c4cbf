#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tracing_subscriber::layer::SubscriberExt;

/// One ERROR event as seen by the capturing layer.
#[derive(Debug, Clone, Default)]
pub struct CapturedError {
    pub logger: String,
    pub message: String,
    pub status: Option<u64>,
    pub type_url: String,
    pub instance: String,
}

/// Layer recording every ERROR event.
#[derive(Clone, Default)]
pub struct ErrorCapture {
    pub errors: Arc<Mutex<Vec<CapturedError>>>,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for ErrorCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::ERROR {
            let mut visitor = ErrorVisitor::default();
            event.record(&mut visitor);
            self.errors.lock().unwrap().push(visitor.0);
        }
    }
}

#[derive(Default)]
struct ErrorVisitor(CapturedError);

impl tracing::field::Visit for ErrorVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => self.0.message = format!("{value:?}"),
            "logger" => self.0.logger = format!("{value:?}"),
            "type_url" => self.0.type_url = format!("{value:?}"),
            "instance" => self.0.instance = format!("{value:?}"),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        if field.name() == "status" {
            self.0.status = Some(value);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.0.message = value.to_owned(),
            "logger" => self.0.logger = value.to_owned(),
            "type_url" => self.0.type_url = value.to_owned(),
            "instance" => self.0.instance = value.to_owned(),
            _ => {}
        }
    }
}

/// Install a capturing subscriber for the current thread until the guard drops.
///
/// Suits `#[tokio::test]`, whose runtime polls everything on the test thread.
pub fn install_error_capture() -> (
    tracing::subscriber::DefaultGuard,
    Arc<Mutex<Vec<CapturedError>>>,
) {
    let capture = ErrorCapture::default();
    let errors = capture.errors.clone();
    let guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(capture));
    (guard, errors)
}

/// Run `f` with a capturing subscriber and return the ERROR events it emitted.
pub fn capture_errors<R>(f: impl FnOnce() -> R) -> (R, Vec<CapturedError>) {
    let capture = ErrorCapture::default();
    let errors = capture.errors.clone();
    let subscriber = tracing_subscriber::registry().with(capture);

    let out = tracing::subscriber::with_default(subscriber, f);
    let captured = errors.lock().unwrap().clone();
    (out, captured)
}
