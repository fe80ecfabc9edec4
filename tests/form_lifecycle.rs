use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};
use settingsform::{
    ErrorPayload, FormSnapshot, Membership, ProjectTarget, SaveFailure, SaveResponse, SaveResult,
    SettingsEndpoint, SettingsForm, SubmitOutcome, SubmitPhase,
};

/// Replies with a fixed result and records every request it sees.
struct ScriptedEndpoint {
    reply: Value,
    status: u16,
    requests: Mutex<Vec<(String, FormSnapshot)>>,
}

impl ScriptedEndpoint {
    fn ok(reply: Value) -> Self {
        Self::with_status(200, reply)
    }

    fn with_status(status: u16, reply: Value) -> Self {
        Self {
            reply,
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<(String, FormSnapshot)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SettingsEndpoint for ScriptedEndpoint {
    async fn save(&self, target: &ProjectTarget, body: &FormSnapshot) -> SaveResult {
        self.requests
            .lock()
            .unwrap()
            .push((target.path(), body.clone()));
        if (200..300).contains(&self.status) {
            serde_json::from_value::<SaveResponse>(self.reply.clone())
                .map_err(|err| SaveFailure::transport(Some(self.status), err.to_string()))
        } else {
            let payload: ErrorPayload = serde_json::from_value(self.reply.clone())
                .map_err(|err| SaveFailure::transport(Some(self.status), err.to_string()))?;
            Err(SaveFailure::Rejected(payload))
        }
    }
}

fn project() -> Value {
    json!({
        "name": "Backend",
        "slug": "backend",
        "team": "1",
        "securityToken": "a1b2c3",
        "options": {
            "mail:subject_prefix": "[backend]",
            "sentry:resolve_age": 0,
            "sentry:scrub_data": true,
            "sentry:origins": "*"
        }
    })
}

fn target() -> ProjectTarget {
    ProjectTarget::new("acme", "backend")
}

#[tokio::test]
async fn successful_save_commits_confirmed_values() {
    let mut form = SettingsForm::for_project(project());
    form.set_field_value("resolve_age", json!(24)).unwrap();
    assert!(form.state().is_dirty());

    let endpoint = ScriptedEndpoint::ok(json!({
        "config": [
            {"name": "name", "value": "Backend"},
            {"name": "slug", "value": "backend"},
            {"name": "resolve_age", "value": 24, "label": "Auto resolve", "type": "range"},
            {"name": "token", "defaultValue": "rotated", "type": "secret"}
        ]
    }));
    let outcome = form.submit(&endpoint, &target()).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Saved);
    assert_eq!(form.phase(), SubmitPhase::Idle);
    assert_eq!(form.value("resolve_age"), Some(&json!(24)));
    assert_eq!(form.value("token"), Some(&json!("rotated")));
    assert_eq!(form.value("mail_subject_prefix"), Some(&Value::Null));
    assert_eq!(form.state().initial(), form.state().current());
    assert!(form.errors().is_empty());
    assert_eq!(form.status(), "Changes saved");

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 1);
    let (path, body) = &requests[0];
    assert_eq!(path, "/projects/acme/backend/");
    assert_eq!(body.len(), form.schema().fields.len());
    assert_eq!(body.get("resolve_age"), Some(&json!(24)));
    assert_eq!(body.get("origins"), Some(&json!("*")));
}

#[tokio::test]
async fn rejected_save_keeps_edits_and_reports_errors() {
    let mut form = SettingsForm::for_project(project());
    form.set_field_value("slug", json!("")).unwrap();

    let endpoint = ScriptedEndpoint::with_status(
        400,
        json!({"errors": {"slug": ["This field is required."]}}),
    );
    let outcome = form.submit(&endpoint, &target()).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Rejected { issues: 1 });
    assert_eq!(form.value("slug"), Some(&json!("")));
    assert_eq!(form.state().initial().get("slug"), Some(&json!("backend")));
    assert_eq!(
        form.errors().get("slug"),
        Some(&["This field is required.".to_string()][..])
    );
    assert_eq!(form.phase(), SubmitPhase::Idle);

    form.set_field_value("slug", json!("backend-2")).unwrap();
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn single_string_error_is_accepted() {
    let mut form = SettingsForm::for_project(project());
    let endpoint =
        ScriptedEndpoint::with_status(400, json!({"errors": {"name": "Name is taken."}}));
    form.submit(&endpoint, &target()).await.unwrap();
    assert_eq!(
        form.errors().get("name"),
        Some(&["Name is taken.".to_string()][..])
    );
}

#[tokio::test]
async fn resubmitting_after_rejection_clears_errors_on_success() {
    let mut form = SettingsForm::for_project(project());
    form.set_field_value("slug", json!("")).unwrap();
    let rejecting = ScriptedEndpoint::with_status(
        400,
        json!({"errors": {"slug": ["This field is required."]}}),
    );
    form.submit(&rejecting, &target()).await.unwrap();
    assert_eq!(form.state().error_count(), 1);

    form.set_field_value("slug", json!("fixed")).unwrap();
    let accepting = ScriptedEndpoint::ok(json!({
        "config": [{"name": "slug", "value": "fixed"}]
    }));
    let outcome = form.submit(&accepting, &target()).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Saved);
    assert!(form.errors().is_empty());
    assert_eq!(form.value("slug"), Some(&json!("fixed")));
}

#[tokio::test]
async fn errors_for_unknown_fields_do_not_count_as_issues() {
    let mut form = SettingsForm::for_project(project());
    let endpoint =
        ScriptedEndpoint::with_status(400, json!({"errors": {"platform": ["Unsupported."]}}));
    let outcome = form.submit(&endpoint, &target()).await.unwrap();

    assert_eq!(outcome, SubmitOutcome::Rejected { issues: 0 });
    assert!(form.errors().is_empty());
    assert!(form.visible_fields().iter().all(|field| !field.has_errors()));
    assert_eq!(form.notice(), Some("platform: Unsupported."));
    assert_ne!(form.status(), "1 issue(s) remaining");
}

#[tokio::test]
async fn undecodable_reply_is_a_transport_failure() {
    let mut form = SettingsForm::for_project(project());
    form.set_field_value("name", json!("Renamed")).unwrap();
    let endpoint = ScriptedEndpoint::ok(json!("not a config"));
    let outcome = form.submit(&endpoint, &target()).await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::TransportFailed { .. }));
    assert_eq!(form.value("name"), Some(&json!("Renamed")));
    assert!(form.notice().is_some());
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn remount_during_flight_discards_reply() {
    let mut form = SettingsForm::for_project(project());
    let pending = form.begin_submit().unwrap();

    form.navigate(
        settingsform::Route::new("/acme/frontend/settings/", ""),
        json!({"name": "Frontend", "slug": "frontend"}),
    )
    .unwrap();

    let endpoint = ScriptedEndpoint::ok(json!({
        "config": [{"name": "name", "value": "Backend"}]
    }));
    let completion = pending.send(&endpoint, &target()).await;
    assert_eq!(form.complete_submit(completion), SubmitOutcome::Discarded);
    assert_eq!(form.value("name"), Some(&json!("Frontend")));
    assert_eq!(form.phase(), SubmitPhase::Idle);
    assert!(form.begin_submit().is_ok());
}

#[test]
fn single_membership_hides_team_field() {
    let form = SettingsForm::for_project(project())
        .with_memberships(vec![Membership::new("1", "core", true)]);
    let names: Vec<String> = form
        .visible_fields()
        .iter()
        .map(|field| field.name().to_string())
        .collect();
    assert!(!names.contains(&"team".to_string()));
    assert!(names.contains(&"slug".to_string()));
}

#[test]
fn membership_list_drives_team_options() {
    let mut form = SettingsForm::for_project(project());
    form.set_memberships(vec![
        Membership::new("1", "core", true),
        Membership::new("2", "observers", false),
        Membership::new("3", "platform", true),
    ]);
    let slugs: Vec<&str> = form
        .choices()
        .options("team")
        .iter()
        .map(|option| option.label.as_str())
        .collect();
    assert_eq!(slugs, vec!["core", "platform"]);
    assert!(form.is_visible("team"));
}
