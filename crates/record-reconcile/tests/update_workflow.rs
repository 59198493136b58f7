use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use record_reconcile::config::ReconcileConfig;
use record_reconcile::types::MergeError;
use record_reconcile::workflow::{
    FetchById, FetchError, SubmitOutcome, SubmitResponse, SubmitUpdate, UpdateError,
    UpdateWorkflow,
};
use serde_json::{json, Value};

struct FakeRepository {
    records: HashMap<String, Value>,
    status: Option<u16>,
}

impl FakeRepository {
    fn with(id: &str, record: Value) -> Self {
        Self {
            records: HashMap::from([(id.to_string(), record)]),
            status: None,
        }
    }
}

impl FetchById for FakeRepository {
    fn fetch(&self, id: &Value) -> Result<Value, FetchError> {
        if let Some(err) = self.status.and_then(FetchError::from_status) {
            return Err(err);
        }
        self.records
            .get(&id.to_string())
            .cloned()
            .ok_or(FetchError::NotFound)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("connection refused")]
struct ConnectionRefused;

struct RecordingSubmitter {
    response: Option<SubmitResponse>,
    sent: RefCell<Vec<(Value, Value)>>,
}

impl RecordingSubmitter {
    fn answering(status: u16, body: &str) -> Self {
        Self {
            response: Some(SubmitResponse::new(status, body)),
            sent: RefCell::new(Vec::new()),
        }
    }

    fn offline() -> Self {
        Self {
            response: None,
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl SubmitUpdate for RecordingSubmitter {
    type Error = ConnectionRefused;

    fn submit(&self, id: &Value, record: &Value) -> Result<SubmitResponse, Self::Error> {
        self.sent.borrow_mut().push((id.clone(), record.clone()));
        self.response.clone().ok_or(ConnectionRefused)
    }
}

fn remote_record() -> Value {
    json!({
        "resourceInfo": {
            "id": 42,
            "identificationInfo": {"id": 3, "resourceName": {"en": "Old name"}},
            "contactPerson": [{"id": 11, "email": "old@example.org"}]
        }
    })
}

fn local_description() -> Value {
    json!({
        "resourceInfo": {
            "identificationInfo": {"resourceName": {"en": "New name"}},
            "contactPerson": [{"email": "new@example.org"}]
        }
    })
}

#[test]
fn run_merges_overrides_and_submits() {
    let repo = FakeRepository::with("42", remote_record());
    let submitter = RecordingSubmitter::answering(202, "");
    let workflow = UpdateWorkflow::new(&repo, &submitter);

    let report = workflow.run(&json!(42), &local_description()).unwrap();
    assert_eq!(report.outcome, SubmitOutcome::Updated);
    assert_eq!(report.prepared.applied.len(), 3);

    let expected = json!({
        "resourceInfo": {
            "id": 42,
            "identificationInfo": {"id": 3, "resourceName": {"en": "New name"}},
            "contactPerson": [{"id": 11, "email": "new@example.org"}]
        }
    });
    assert_eq!(report.prepared.record, expected);
    assert_eq!(*submitter.sent.borrow(), vec![(json!(42), expected)]);
}

#[test]
fn canonical_id_wins_over_remote_id() {
    let mut remote = remote_record();
    remote["resourceInfo"]["id"] = json!(1);
    let repo = FakeRepository::with("42", remote);
    let workflow = UpdateWorkflow::new(&repo, RecordingSubmitter::answering(202, ""));

    let prepared = workflow.prepare(&json!(42), &local_description()).unwrap();
    assert_eq!(prepared.record["resourceInfo"]["id"], json!(42));
    assert!(prepared
        .applied
        .iter()
        .any(|p| p.path.to_string() == "/resourceInfo/id" && p.value == json!(1)));
}

#[test]
fn fetch_failures_abort_before_submit() {
    let mut repo = FakeRepository::with("42", remote_record());
    repo.status = Some(401);
    let submitter = RecordingSubmitter::answering(202, "");
    let workflow = UpdateWorkflow::new(&repo, &submitter);

    let err = workflow.run(&json!(42), &local_description()).unwrap_err();
    assert!(matches!(
        err,
        UpdateError::Fetch {
            source: FetchError::Unauthorized,
            ..
        }
    ));
    assert!(submitter.sent.borrow().is_empty());

    let missing = UpdateWorkflow::new(&repo_without_records(), &submitter)
        .prepare(&json!(7), &local_description())
        .unwrap_err();
    assert!(matches!(
        missing,
        UpdateError::Fetch {
            source: FetchError::NotFound,
            ..
        }
    ));
}

fn repo_without_records() -> FakeRepository {
    FakeRepository {
        records: HashMap::new(),
        status: None,
    }
}

#[test]
fn structural_errors_surface() {
    let repo = FakeRepository::with("42", json!(["not", "a", "record"]));
    let workflow = UpdateWorkflow::new(&repo, RecordingSubmitter::offline());
    let err = workflow.prepare(&json!(42), &local_description()).unwrap_err();
    assert!(matches!(err, UpdateError::Structural(_)));
}

#[test]
fn transport_and_rejection_outcomes() {
    let repo = FakeRepository::with("42", remote_record());

    let offline = UpdateWorkflow::new(&repo, RecordingSubmitter::offline());
    let err = offline.run(&json!(42), &local_description()).unwrap_err();
    assert!(matches!(err, UpdateError::Submit(_)));
    assert_eq!(err.to_string(), "submit failed: connection refused");

    let rejecting = UpdateWorkflow::new(
        &repo,
        RecordingSubmitter::answering(400, r#"{"resourceName": ["This field is required."]}"#),
    );
    let report = rejecting.run(&json!(42), &local_description()).unwrap();
    assert_eq!(
        report.outcome,
        SubmitOutcome::Rejected {
            messages: vec!["This field is required.".to_string()]
        }
    );

    let duplicate = UpdateWorkflow::new(
        &repo,
        RecordingSubmitter::answering(500, "duplicate key value violates unique constraint"),
    );
    let report = duplicate.run(&json!(42), &local_description()).unwrap();
    assert!(report.outcome.is_success());
}

#[test]
fn workflow_from_config_uses_custom_pointer() {
    let config = ReconcileConfig::from_toml_str("canonical_id_pointer = \"/resourceInfo/pk\"").unwrap();
    let repo = FakeRepository::with("\"abc\"", json!({"resourceInfo": {"id": 5}}));
    let workflow =
        UpdateWorkflow::from_config(&repo, RecordingSubmitter::offline(), &config).unwrap();

    let prepared = workflow
        .prepare(&json!("abc"), &json!({"resourceInfo": {}}))
        .unwrap();
    assert_eq!(prepared.record, json!({"resourceInfo": {"id": 5, "pk": "abc"}}));
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines_containing(&self, needle: &str) -> usize {
        let buf = self.0.lock().unwrap();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn dangling_identifier_is_logged_once() {
    let repo = FakeRepository::with(
        "42",
        json!({"resourceInfo": {"id": 42, "contactPerson": {"id": 9, "email": "a"}}}),
    );
    let workflow = UpdateWorkflow::new(&repo, RecordingSubmitter::offline());

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let prepared = tracing::subscriber::with_default(subscriber, || {
        workflow.prepare(&json!(42), &json!({"resourceInfo": {}}))
    })
    .unwrap();

    assert_eq!(prepared.record, json!({"resourceInfo": {"id": 42}}));
    assert_eq!(
        prepared.warnings,
        vec![MergeError::DanglingParent {
            path: record_reconcile::path!["resourceInfo", "contactPerson", "id"]
        }]
    );
    assert_eq!(logs.lines_containing("dangling parent"), 1);
    assert_eq!(logs.lines_containing("/resourceInfo/contactPerson/id"), 1);
}
