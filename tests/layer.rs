use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use slacklog::{create_slack_hook, Message, SlackLayer};
use tracing_subscriber::prelude::*;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn ok_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

async fn sent_messages(server: &MockServer) -> Vec<Message> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

fn with_layer(uri: String, f: impl FnOnce()) {
    let subscriber =
        tracing_subscriber::registry().with(SlackLayer::new(create_slack_hook(uri, "billing")));
    tracing::subscriber::with_default(subscriber, f);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn error_event_is_delivered_before_returning() {
    let server = ok_server().await;

    with_layer(server.uri(), || {
        tracing::error!(host = "db1", "disk full");
    });

    let sent = sent_messages(&server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "*[ERROR] disk full*");
    let att = &sent[0].attachments[0];
    assert_eq!(att.color, "danger");
    assert_eq!(att.footer, "billing");
    assert_eq!(att.fields.len(), 1);
    assert_eq!(att.fields[0].title, "host");
    assert_eq!(att.fields[0].value, "db1");
    assert!(att.fields[0].short);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn typed_fields_keep_declaration_order() {
    let server = ok_server().await;

    with_layer(server.uri(), || {
        tracing::warn!(
            attempts = 3_u64,
            ratio = 0.5,
            cached = false,
            started = "2006-01-02T15:04:05Z",
            "replica lagging"
        );
    });

    let sent = sent_messages(&server).await;
    assert_eq!(sent[0].text, "*[WARNING] replica lagging*");
    assert_eq!(sent[0].attachments[0].color, "warning");
    let values: Vec<(&str, &str)> = sent[0].attachments[0]
        .fields
        .iter()
        .map(|f| (f.title.as_str(), f.value.as_str()))
        .collect();
    assert_eq!(
        values,
        [
            ("attempts", "3"),
            ("ratio", "0.5"),
            ("cached", "false"),
            ("started", "Mon, 02 Jan 2006 15:04:05 UTC"),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn severity_field_upgrades_level() {
    let server = ok_server().await;

    with_layer(server.uri(), || {
        tracing::error!(severity = "fatal", "out of memory");
    });

    let sent = sent_messages(&server).await;
    assert_eq!(sent[0].text, "*[FATAL] out of memory*");
    assert_eq!(sent[0].attachments[0].color, "#fe6565");
    assert!(sent[0].attachments[0].fields.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn debug_trace_and_internal_events_are_ignored() {
    let server = ok_server().await;

    with_layer(server.uri(), || {
        tracing::debug!("cache miss");
        tracing::trace!("poll");
        tracing::error!(target: "slacklog::hook", "slack hook failed");
        tracing::warn!(target: "hyper_util::client", "connection reset");
    });

    assert!(sent_messages(&server).await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failures_reach_the_error_handler() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("invalid_payload"))
        .mount(&server)
        .await;

    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&errors);
    let layer = SlackLayer::new(create_slack_hook(server.uri(), "billing"))
        .with_error_handler(move |err| sink.lock().push(err.to_string()));

    tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), || {
        tracing::error!("disk full");
    });

    assert_eq!(
        *errors.lock(),
        ["delivery hook error: [Slack]: 500 invalid_payload".to_string()]
    );
}

#[tokio::test]
async fn current_thread_runtime_delivers_before_returning() {
    let server = ok_server().await;

    with_layer(server.uri(), || {
        tracing::info!(job = "nightly", "export finished");
    });

    let sent = sent_messages(&server).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "*[INFO] export finished*");
    assert_eq!(sent[0].attachments[0].color, "good");
}

#[test]
fn last_error_before_runtime_shutdown_is_delivered() {
    let server_rt = tokio::runtime::Runtime::new().unwrap();
    let server = server_rt.block_on(ok_server());

    with_layer(server.uri(), || {
        let app = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        app.block_on(async {
            tracing::error!("fatal shutdown error");
        });
        drop(app);
    });

    let sent = server_rt.block_on(sent_messages(&server));
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "*[ERROR] fatal shutdown error*");
}

#[test]
fn events_without_and_then_inside_a_runtime_both_arrive() {
    let server_rt = tokio::runtime::Runtime::new().unwrap();
    let server = server_rt.block_on(ok_server());
    let uri = server.uri();

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        with_layer(uri, || {
            tracing::error!("first");
            let app = tokio::runtime::Runtime::new().unwrap();
            app.block_on(async {
                tracing::error!("second");
            });
        });
        let _ = done_tx.send(());
    });

    assert!(
        done_rx.recv_timeout(Duration::from_secs(10)).is_ok(),
        "logging call did not return"
    );
    let texts: Vec<String> = server_rt
        .block_on(sent_messages(&server))
        .into_iter()
        .map(|m| m.text)
        .collect();
    assert_eq!(texts, ["*[ERROR] first*", "*[ERROR] second*"]);
}

#[test]
fn delivers_without_an_ambient_runtime() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(ok_server());

    with_layer(server.uri(), || {
        tracing::error!(host = "db2", "replication broken");
    });

    let sent = rt.block_on(sent_messages(&server));
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text, "*[ERROR] replication broken*");
}
