use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    domain::{FormSchema, Membership, project_settings_schema},
    form::{
        ChoiceCache, ErrorMap, FormCommand, FormError, FormEvent, FormSnapshot, FormState,
        Listeners, apply_command,
    },
    presentation::{Control, FieldRenderer, FieldView, PlainTextRenderer, SectionView},
    submit::{
        ProjectTarget, SaveFailure, SaveResult, SettingsEndpoint, SubmissionCoordinator,
        SubmissionTicket, SubmitPhase,
    },
};

use super::{options::FormOptions, status::StatusLine};

/// Location the form is mounted at. A different route re-keys the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub pathname: String,
    pub search: String,
}

impl Route {
    pub fn new(pathname: impl Into<String>, search: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            search: search.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved,
    Rejected { issues: usize },
    TransportFailed { error: FormError },
    /// The form was re-keyed while the request was outstanding.
    Discarded,
}

/// A submission that has been started but not yet sent.
///
/// It owns a copy of the request body, so the request can run without
/// borrowing the form. Feed the resulting [`Completion`] back through
/// [`SettingsForm::complete_submit`].
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    ticket: SubmissionTicket,
    body: FormSnapshot,
}

impl PendingSubmission {
    pub fn ticket(&self) -> SubmissionTicket {
        self.ticket
    }

    pub fn body(&self) -> &FormSnapshot {
        &self.body
    }

    pub async fn send(self, endpoint: &dyn SettingsEndpoint, target: &ProjectTarget) -> Completion {
        let result = endpoint.save(target, &self.body).await;
        Completion::new(self.ticket, result)
    }
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub ticket: SubmissionTicket,
    pub result: SaveResult,
}

impl Completion {
    pub fn new(ticket: SubmissionTicket, result: SaveResult) -> Self {
        Self { ticket, result }
    }
}

/// Owns one settings form: its schema, source object, value state, choice
/// options, and the submission cycle.
#[derive(Debug)]
pub struct SettingsForm {
    schema: Arc<FormSchema>,
    source: Value,
    route: Option<Route>,
    state: FormState,
    choices: ChoiceCache,
    coordinator: SubmissionCoordinator,
    options: FormOptions,
    status: StatusLine,
    notice: Option<String>,
    listeners: Listeners,
}

impl SettingsForm {
    pub fn new(schema: impl Into<Arc<FormSchema>>, source: Value) -> Self {
        let schema = schema.into();
        let state = FormState::initialize(&schema, &source);
        let choices = ChoiceCache::new(&schema, Vec::new());
        Self {
            schema,
            source,
            route: None,
            state,
            choices,
            coordinator: SubmissionCoordinator::new(),
            options: FormOptions::default(),
            status: StatusLine::new(),
            notice: None,
            listeners: Listeners::default(),
        }
    }

    /// The general project settings form seeded from a project object.
    pub fn for_project(project: Value) -> Self {
        Self::new(project_settings_schema(), project)
    }

    pub fn with_options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_memberships(mut self, memberships: Vec<Membership>) -> Self {
        self.choices.set_memberships(&self.schema, memberships);
        self
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.route = Some(route);
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn source(&self) -> &Value {
        &self.source
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.state.value(name)
    }

    pub fn errors(&self) -> &ErrorMap {
        self.state.errors()
    }

    pub fn status(&self) -> &str {
        self.status.message()
    }

    /// Form-level failure message: a transport error, or server errors that
    /// name no field of the form.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.coordinator.phase()
    }

    pub fn choices(&self) -> &ChoiceCache {
        &self.choices
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&FormEvent) + Send + 'static) {
        self.listeners.subscribe(observer);
    }

    pub fn set_field_value(&mut self, name: &str, value: Value) -> Result<(), FormError> {
        self.dispatch(FormCommand::SetField {
            name: name.to_string(),
            value,
        })
    }

    pub fn revert_field(&mut self, name: &str) -> Result<(), FormError> {
        self.dispatch(FormCommand::revert(name))
    }

    /// Rebuilds the form from its source object, dropping edits, errors and
    /// any outstanding submission.
    pub fn reset(&mut self) -> Result<(), FormError> {
        self.dispatch(FormCommand::Reset)
    }

    pub fn dispatch(&mut self, command: FormCommand) -> Result<(), FormError> {
        let event = apply_command(&mut self.state, &self.schema, &self.source, command)?;
        match &event {
            FormEvent::FieldChanged { name } | FormEvent::FieldReverted { name } => {
                let label = self
                    .schema
                    .field(name)
                    .map(|field| field.display_label())
                    .unwrap_or_else(|| name.clone());
                self.status.editing(&label);
            }
            FormEvent::Reset => {
                self.coordinator.invalidate();
                self.notice = None;
                self.status.ready();
            }
            _ => {}
        }
        self.listeners.notify(&event);
        Ok(())
    }

    /// Re-keys the form for `route`. Returns `false` when the route is
    /// unchanged and nothing was rebuilt.
    pub fn navigate(&mut self, route: Route, source: Value) -> Result<bool, FormError> {
        if self.route.as_ref() == Some(&route) {
            return Ok(false);
        }
        debug!(pathname = %route.pathname, "remounting form for new route");
        self.route = Some(route);
        self.source = source;
        self.reset()?;
        Ok(true)
    }

    /// Swaps the membership list behind derived choice options.
    pub fn set_memberships(&mut self, memberships: Vec<Membership>) {
        if self.choices.set_memberships(&self.schema, memberships) {
            self.listeners.notify(&FormEvent::ChoicesChanged);
        }
    }

    /// Whether `name` is shown to the user at all.
    pub fn is_visible(&self, name: &str) -> bool {
        match self.schema.field(name) {
            Some(field) => {
                !(self.options.suppress_single_choice && self.choices.is_degenerate(field))
            }
            None => false,
        }
    }

    /// Visible fields grouped by section, in layout order.
    pub fn sections(&self) -> Vec<SectionView<'_>> {
        self.schema
            .sections
            .iter()
            .map(|section| SectionView {
                section,
                fields: section
                    .fields
                    .iter()
                    .filter_map(|name| self.field_view(name))
                    .collect(),
            })
            .collect()
    }

    pub fn visible_fields(&self) -> Vec<FieldView<'_>> {
        self.schema
            .keys()
            .filter_map(|name| self.field_view(name))
            .collect()
    }

    pub fn field_view(&self, name: &str) -> Option<FieldView<'_>> {
        if !self.is_visible(name) {
            return None;
        }
        let definition = self.schema.field(name)?;
        let value = self.state.value(name)?;
        Some(FieldView {
            definition,
            value,
            errors: self.state.field_errors(name),
            dirty: self.state.is_field_dirty(name),
            control: Control::for_field(definition, value, self.choices.options(name)),
        })
    }

    pub fn render<R: FieldRenderer>(&self, renderer: &mut R) -> Vec<R::Output> {
        self.sections()
            .iter()
            .flat_map(|section| renderer.render_section(section))
            .collect()
    }

    pub fn render_text(&self) -> String {
        let mut renderer =
            PlainTextRenderer::new(self.options.wrap_width).with_help(self.options.show_help);
        let mut blocks = Vec::new();
        if let Some(title) = &self.schema.title {
            blocks.push(title.clone());
        }
        if let Some(notice) = &self.notice {
            blocks.push(format!("! {notice}"));
        }
        blocks.extend(self.render(&mut renderer));
        blocks.join("\n\n")
    }

    /// Moves `Idle → Submitting` and captures the whole edit buffer as the
    /// request body.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, FormError> {
        let ticket = self.coordinator.begin()?;
        self.notice = None;
        self.status.saving();
        self.listeners.notify(&FormEvent::SubmitStarted);
        Ok(PendingSubmission {
            ticket,
            body: self.state.current().clone(),
        })
    }

    /// Reconciles a finished request. Stale completions are discarded
    /// without touching state.
    pub fn complete_submit(&mut self, completion: Completion) -> SubmitOutcome {
        let Completion { ticket, result } = completion;
        if self.coordinator.settle(ticket, result.is_ok()).is_err() {
            debug!(
                generation = ticket.generation(),
                "discarding response for a re-keyed form"
            );
            self.listeners.notify(&FormEvent::Discarded);
            return SubmitOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                let confirmed = response.reconcile(&self.schema);
                self.state.commit(confirmed);
                self.status.saved();
                info!(fields = response.config.len(), "settings saved");
                self.listeners.notify(&FormEvent::Saved);
                SubmitOutcome::Saved
            }
            Err(SaveFailure::Rejected(payload)) => {
                let (errors, other) = payload.partition(&self.schema);
                let issues = errors.len();
                self.state.reject(errors);
                if !other.is_empty() {
                    self.notice = Some(form_level_message(&other));
                }
                match &self.notice {
                    Some(notice) if issues == 0 => self.status.save_failed(notice),
                    _ => self.status.issues_remaining(issues),
                }
                warn!(issues, "settings rejected by server");
                self.listeners.notify(&FormEvent::Rejected { issues });
                SubmitOutcome::Rejected { issues }
            }
            Err(SaveFailure::Transport(error)) => {
                let message = error.to_string();
                self.status.save_failed(&message);
                warn!(%message, "settings request failed");
                self.notice = Some(message.clone());
                self.listeners
                    .notify(&FormEvent::TransportFailed { message });
                SubmitOutcome::TransportFailed { error }
            }
        }
    }

    /// Begin, send and reconcile in one call.
    pub async fn submit(
        &mut self,
        endpoint: &dyn SettingsEndpoint,
        target: &ProjectTarget,
    ) -> Result<SubmitOutcome, FormError> {
        let pending = self.begin_submit()?;
        let completion = pending.send(endpoint, target).await;
        Ok(self.complete_submit(completion))
    }
}

/// Errors that name no field are shown once, above the form.
fn form_level_message(errors: &ErrorMap) -> String {
    errors
        .iter()
        .map(|(name, messages)| format!("{name}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}
