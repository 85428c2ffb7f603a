//! Contact form state and the EmailJS relay it submits through.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use crate::error::RelayError;
use crate::gemini::BoxFuture;

pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const SEND_FAILED_ALERT: &str =
    "Failed to send email. Please check your email relay configuration.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
    pub template_params: TemplateParams,
}

/// Delivers a submitted form. Resolves `Ok` only on a 2xx answer.
pub trait Relay: Send + Sync {
    fn send(&self, params: TemplateParams) -> BoxFuture<Result<(), RelayError>>;
}

#[derive(Debug, Clone, Default)]
pub struct EmailJsCredentials {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
}

impl EmailJsCredentials {
    fn complete(&self) -> Option<(String, String, String)> {
        let pick = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        Some((
            pick(&self.service_id)?,
            pick(&self.template_id)?,
            pick(&self.public_key)?,
        ))
    }
}

#[derive(Clone)]
pub struct EmailJsRelay {
    http: reqwest::Client,
    endpoint: String,
    credentials: EmailJsCredentials,
}

impl EmailJsRelay {
    pub fn new(credentials: EmailJsCredentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: EMAILJS_ENDPOINT.to_string(),
            credentials,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn request(&self, params: TemplateParams) -> Result<EmailRequest, RelayError> {
        let (service_id, template_id, user_id) =
            self.credentials.complete().ok_or(RelayError::NotConfigured)?;
        Ok(EmailRequest {
            service_id,
            template_id,
            user_id,
            template_params: params,
        })
    }

    pub async fn deliver(&self, params: TemplateParams) -> Result<(), RelayError> {
        let body = self.request(params)?;
        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        if status.is_success() {
            info!("contact message relayed");
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(RelayError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

impl Relay for EmailJsRelay {
    fn send(&self, params: TemplateParams) -> BoxFuture<Result<(), RelayError>> {
        let relay = self.clone();
        Box::pin(async move { relay.deliver(params).await })
    }
}

pub struct OfflineRelay;

impl Relay for OfflineRelay {
    fn send(&self, _params: TemplateParams) -> BoxFuture<Result<(), RelayError>> {
        Box::pin(async { Err(RelayError::Offline) })
    }
}

/// Relay `params` on the current tokio runtime and post the outcome to `tx`.
pub fn dispatch(
    relay: Arc<dyn Relay>,
    params: TemplateParams,
    tx: UnboundedSender<Result<(), RelayError>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let _ = tx.send(relay.send(params).await);
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Name,
    Email,
    Subject,
    Message,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Subject, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Subject => "Subject",
            Field::Message => "Message",
        }
    }

    pub fn required(self) -> bool {
        !matches!(self, Field::Subject)
    }

    fn next(self) -> Field {
        let i = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(i + 1) % Field::ALL.len()]
    }

    fn prev(self) -> Field {
        let i = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(i + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    Submitting,
    Success,
}

#[derive(Debug, Default)]
pub struct ContactForm {
    pub fields: TemplateParams,
    pub focus: Field,
    pub status: FormStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.fields.name,
            Field::Email => &self.fields.email,
            Field::Subject => &self.fields.subject,
            Field::Message => &self.fields.message,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.fields.name,
            Field::Email => &mut self.fields.email,
            Field::Subject => &mut self.fields.subject,
            Field::Message => &mut self.fields.message,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.status == FormStatus::Idle
    }

    pub fn input_char(&mut self, c: char) {
        if self.is_editable() {
            let focus = self.focus;
            self.value_mut(focus).push(c);
        }
    }

    pub fn input_str(&mut self, s: &str) {
        if self.is_editable() {
            let focus = self.focus;
            let single_line = focus != Field::Message;
            self.value_mut(focus)
                .extend(s.chars().filter(|c| !(single_line && (*c == '\n' || *c == '\r'))));
        }
    }

    pub fn backspace(&mut self) {
        if self.is_editable() {
            let focus = self.focus;
            self.value_mut(focus).pop();
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    /// First required field left blank, if any.
    pub fn missing(&self) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|f| f.required() && self.value(*f).trim().is_empty())
    }

    /// Begin sending. Returns the payload to relay, or `None` when the form
    /// is incomplete or already busy.
    pub fn submit(&mut self) -> Option<TemplateParams> {
        if self.status != FormStatus::Idle {
            return None;
        }
        if let Some(field) = self.missing() {
            self.focus = field;
            return None;
        }
        self.status = FormStatus::Submitting;
        Some(self.fields.clone())
    }

    /// Apply the relay outcome. Returns alert text on failure.
    pub fn finish(&mut self, outcome: Result<(), RelayError>) -> Option<&'static str> {
        match outcome {
            Ok(()) => {
                self.status = FormStatus::Success;
                None
            }
            Err(e) => {
                error!(error = %e, "contact relay failed");
                self.status = FormStatus::Idle;
                Some(SEND_FAILED_ALERT)
            }
        }
    }

    /// "Send another message": back to an empty idle form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.input_str("Ada");
        form.next_field();
        form.input_str("ada@example.com");
        form.next_field();
        form.next_field();
        form.input_str("Hello\nthere");
        form
    }

    fn credentials() -> EmailJsCredentials {
        EmailJsCredentials {
            service_id: Some("service_x".to_string()),
            template_id: Some("template_y".to_string()),
            public_key: Some("key_z".to_string()),
        }
    }

    #[test]
    fn test_submit_requires_name_email_and_message() {
        let mut form = ContactForm::new();
        form.input_str("Ada");
        assert_eq!(form.submit(), None);
        assert_eq!(form.focus, Field::Email);
        assert_eq!(form.status, FormStatus::Idle);

        let mut form = filled();
        let params = form.submit().unwrap();
        assert_eq!(params.subject, "");
        assert_eq!(params.message, "Hello\nthere");
        assert_eq!(form.status, FormStatus::Submitting);
        assert_eq!(form.submit(), None);
    }

    #[test]
    fn test_single_line_fields_drop_newlines() {
        let mut form = ContactForm::new();
        form.input_str("A\nda\r");
        assert_eq!(form.value(Field::Name), "Ada");
    }

    #[test]
    fn test_success_then_reset() {
        let mut form = filled();
        form.submit();
        assert_eq!(form.finish(Ok(())), None);
        assert_eq!(form.status, FormStatus::Success);

        form.input_char('x');
        assert_eq!(form.value(Field::Name), "Ada");

        form.reset();
        assert_eq!(form.status, FormStatus::Idle);
        assert_eq!(form.fields, TemplateParams::default());
        assert_eq!(form.focus, Field::Name);
    }

    #[test]
    fn test_failure_returns_to_idle_with_alert() {
        let mut form = filled();
        form.submit();
        let alert = form.finish(Err(RelayError::Rejected {
            status: 400,
            body: "bad".to_string(),
        }));
        assert_eq!(alert, Some(SEND_FAILED_ALERT));
        assert_eq!(form.status, FormStatus::Idle);
        assert_eq!(form.value(Field::Name), "Ada");
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = ContactForm::new();
        form.prev_field();
        assert_eq!(form.focus, Field::Message);
        form.next_field();
        assert_eq!(form.focus, Field::Name);
    }

    #[test]
    fn test_request_body_shape() {
        let relay = EmailJsRelay::new(credentials());
        let body = relay.request(filled().fields).unwrap();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "service_id": "service_x",
                "template_id": "template_y",
                "user_id": "key_z",
                "template_params": {
                    "name": "Ada",
                    "email": "ada@example.com",
                    "subject": "",
                    "message": "Hello\nthere"
                }
            })
        );
    }

    #[test]
    fn test_endpoint_override() {
        let relay = EmailJsRelay::new(credentials());
        assert_eq!(relay.endpoint, EMAILJS_ENDPOINT);
        let relay = relay.with_endpoint("http://localhost:8081/send");
        assert_eq!(relay.endpoint, "http://localhost:8081/send");
    }

    #[tokio::test]
    async fn test_unconfigured_relay_fails_without_network() {
        let relay = EmailJsRelay::new(EmailJsCredentials {
            public_key: Some(" ".to_string()),
            ..credentials()
        });
        let result = relay.send(TemplateParams::default()).await;
        assert!(matches!(result, Err(RelayError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_offline_relay_fails() {
        assert!(matches!(
            OfflineRelay.send(TemplateParams::default()).await,
            Err(RelayError::Offline)
        ));
    }
}
