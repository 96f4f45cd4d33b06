// src/instrumentation/layer.rs

use crate::core::{Entry, Severity, Value};
use crate::error::HookError;
use crate::hook::Hook;

use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, Layer};

/// Events from these targets are never forwarded; they are either ours or
/// emitted by the HTTP stack while a delivery is in flight.
const SKIPPED_TARGETS: &[&str] = &["slacklog", "reqwest", "hyper", "hyper_util", "h2", "rustls"];

/// Field that overrides the level derived from `tracing::Level` (e.g. `"fatal"`).
pub const SEVERITY_FIELD: &str = "severity";

thread_local! {
    static DELIVERING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as delivering for its lifetime.
struct Delivering;

impl Delivering {
    fn enter() -> Option<Self> {
        DELIVERING.with(|d| if d.replace(true) { None } else { Some(Delivering) })
    }
}

impl Drop for Delivering {
    fn drop(&mut self) {
        DELIVERING.with(|d| d.set(false));
    }
}

fn is_skipped(target: &str) -> bool {
    SKIPPED_TARGETS.iter().any(|skip| {
        target
            .strip_prefix(skip)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
    })
}

/// Collects an event's fields into entry parts.
#[derive(Default)]
struct EntryVisitor {
    message: Option<String>,
    severity: Option<Severity>,
    data: Vec<(String, Value)>,
}

impl EntryVisitor {
    fn record_text(&mut self, name: &str, text: String) {
        match name {
            "message" => self.message = Some(text),
            SEVERITY_FIELD if self.severity.is_none() => match text.parse() {
                Ok(sev) => self.severity = Some(sev),
                Err(_) => self.data.push((name.to_string(), Value::Str(text))),
            },
            _ => {
                let value = OffsetDateTime::parse(&text, &Rfc3339)
                    .map(Value::Time)
                    .unwrap_or(Value::Str(text));
                self.data.push((name.to_string(), value));
            }
        }
    }
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field.name(), format!("{value:?}"));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.data.push((field.name().to_string(), Value::Int(value)));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.data.push((field.name().to_string(), Value::UInt(value)));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.data.push((field.name().to_string(), Value::Float(value)));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.data.push((field.name().to_string(), Value::Bool(value)));
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.record_text(field.name(), value.to_string());
    }
}

type ErrorHandler = Arc<dyn Fn(&HookError) + Send + Sync>;

static DELIVERY_RUNTIME: OnceCell<Runtime> = OnceCell::new();

/// Runtime every layer delivery runs on. The hook's HTTP connection pool
/// is only ever driven by this runtime, whatever runtime the caller is on.
fn delivery_runtime() -> Result<&'static Runtime, HookError> {
    DELIVERY_RUNTIME
        .get_or_try_init(|| {
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name("slacklog-delivery")
                .enable_all()
                .build()
        })
        .map_err(HookError::Runtime)
}

/// `tracing` layer that forwards qualifying events to a [`Hook`].
///
/// The thread that emitted the event blocks until the webhook has answered;
/// the request itself runs on a private runtime.
pub struct SlackLayer<H: Hook> {
    hook: Arc<H>,
    on_error: ErrorHandler,
}

impl<H: Hook> SlackLayer<H> {
    pub fn new(hook: H) -> Self {
        Self {
            hook: Arc::new(hook),
            on_error: Arc::new(|err: &HookError| {
                tracing::warn!(target: "slacklog::hook", error = %err, "slack hook failed");
            }),
        }
    }

    /// Replaces the default handler, which logs failures at WARN.
    pub fn with_error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(&HookError) + Send + Sync + 'static,
    {
        self.on_error = Arc::new(f);
        self
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    fn report(&self, res: Result<(), HookError>) {
        if let Err(err) = res {
            (self.on_error)(&err);
        }
    }

    fn dispatch(&self, entry: Entry) {
        let Some(_delivering) = Delivering::enter() else {
            return;
        };

        let deliver = || self.deliver(&entry);
        let res = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(deliver)
            }
            _ => deliver(),
        };
        self.report(res);
    }

    /// Runs `fire` on the delivery runtime from a scoped helper thread and
    /// waits for it. The helper has no runtime context, so this is safe to
    /// call from inside any Tokio runtime, including a current-thread one.
    fn deliver(&self, entry: &Entry) -> Result<(), HookError> {
        let rt = delivery_runtime()?;
        std::thread::scope(|scope| {
            let helper = std::thread::Builder::new()
                .name("slacklog-hook".into())
                .spawn_scoped(scope, || rt.block_on(self.hook.fire(entry)))
                .map_err(HookError::Runtime)?;
            helper.join().unwrap_or(Err(HookError::Panicked))
        })
    }
}

impl<S, H> Layer<S> for SlackLayer<H>
where
    S: Subscriber,
    H: Hook,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if is_skipped(meta.target()) || DELIVERING.with(Cell::get) {
            return;
        }

        let mut vis = EntryVisitor::default();
        event.record(&mut vis);

        let level = vis.severity.unwrap_or_else(|| Severity::from(*meta.level()));
        if !self.hook.levels().contains(&level) {
            return;
        }

        self.dispatch(Entry {
            level,
            message: vis.message.unwrap_or_default(),
            time: OffsetDateTime::now_utc(),
            data: vis.data,
        });
    }
}
