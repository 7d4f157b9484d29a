//! AJAX-style form submission against the dashboard backend
//!
//! The backend contract is a JSON body `{success, message?, redirect_url?,
//! reset_form?}`. The client raises success/error notifications and returns
//! navigation and reset as typed actions for the caller to perform; it never
//! mutates view state itself. The submit control's busy state is held for
//! the whole flight and always released.

use crate::error::CoreError;
use crate::notify::{BusyState, Notification, NotificationCenter, Severity};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Delay before following a redirect, giving the success toast time to show
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// CSRF token field name expected by the backend
const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// One form submission: target, method, and encoded fields
#[derive(Debug, Clone)]
pub struct FormRequest {
    pub action: String,
    pub method: reqwest::Method,
    pub fields: Vec<(String, String)>,
    pub csrf_token: Option<String>,
}

impl FormRequest {
    pub fn post(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            method: reqwest::Method::POST,
            fields: Vec::new(),
            csrf_token: None,
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }
}

/// Structured backend response for form submissions
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub reset_form: bool,
}

/// Navigation action requested by a submission outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Redirect { url: String, after: Duration },
}

/// What the caller should do after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub navigation: Option<Navigation>,
    pub reset_form: bool,
}

/// Form submission client
pub struct FormClient {
    http: reqwest::Client,
    notifications: Arc<NotificationCenter>,
}

impl FormClient {
    pub fn new(notifications: Arc<NotificationCenter>) -> Self {
        Self {
            http: reqwest::Client::new(),
            notifications,
        }
    }

    pub fn with_client(http: reqwest::Client, notifications: Arc<NotificationCenter>) -> Self {
        Self {
            http,
            notifications,
        }
    }

    /// Submit a form, holding the control busy for the whole flight
    ///
    /// Network failures and non-2xx statuses surface as a generic error
    /// notification; the underlying cause is logged for diagnostics only.
    pub async fn submit(
        &self,
        request: &FormRequest,
        busy: &BusyState,
    ) -> Result<SubmitOutcome, CoreError> {
        let _guard = busy.busy("Saving...");

        match self.send(request).await {
            Ok(response) => Ok(self.interpret(response)),
            Err(e) => {
                error!(action = %request.action, error = %e, "Form submission failed");
                self.notifications.push(Notification::error(
                    "An error occurred while processing your request",
                ));
                Err(e)
            }
        }
    }

    async fn send(&self, request: &FormRequest) -> Result<SubmitResponse, CoreError> {
        let mut fields = request.fields.clone();

        let mut builder = self
            .http
            .request(request.method.clone(), &request.action)
            .header("X-Requested-With", "XMLHttpRequest");

        if let Some(token) = &request.csrf_token {
            builder = builder.header("X-CSRFToken", token);
            fields.push((CSRF_FIELD.to_string(), token.clone()));
        }

        let response = builder
            .form(&fields)
            .send()
            .await
            .map_err(|source| CoreError::Request { source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Backend {
                status: status.as_u16(),
            });
        }

        response
            .json::<SubmitResponse>()
            .await
            .map_err(|source| CoreError::ResponseDecode { source })
    }

    /// Turn a decoded response into notifications plus typed view actions
    fn interpret(&self, response: SubmitResponse) -> SubmitOutcome {
        if response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Operation completed successfully".to_string());
            self.notifications
                .push(Notification::new(message, Severity::Success));

            let navigation = response.redirect_url.map(|url| {
                debug!(url = %url, "Redirect scheduled");
                Navigation::Redirect {
                    url,
                    after: REDIRECT_DELAY,
                }
            });

            SubmitOutcome {
                success: true,
                navigation,
                reset_form: response.reset_form,
            }
        } else {
            let message = response
                .message
                .unwrap_or_else(|| "An error occurred".to_string());
            self.notifications
                .push(Notification::new(message, Severity::Error));

            SubmitOutcome {
                success: false,
                navigation: None,
                reset_form: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> (FormClient, Arc<NotificationCenter>) {
        let notifications = Arc::new(NotificationCenter::new());
        (FormClient::new(notifications.clone()), notifications)
    }

    #[test]
    fn test_decode_minimal_response() {
        let response: SubmitResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.message, None);
        assert_eq!(response.redirect_url, None);
        assert!(!response.reset_form);
    }

    #[test]
    fn test_decode_tolerates_unknown_fields() {
        let response: SubmitResponse =
            serde_json::from_str(r#"{"success": false, "message": "Invalid", "extra": 1}"#)
                .unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Invalid"));
    }

    #[test]
    fn test_interpret_success_with_redirect() {
        let (client, notifications) = client();

        let outcome = client.interpret(SubmitResponse {
            success: true,
            message: Some("Saved".to_string()),
            redirect_url: Some("/done".to_string()),
            reset_form: false,
        });

        assert!(outcome.success);
        assert_eq!(
            outcome.navigation,
            Some(Navigation::Redirect {
                url: "/done".to_string(),
                after: REDIRECT_DELAY,
            })
        );

        let active = notifications.active();
        assert_eq!(active[0].severity, Severity::Success);
        assert_eq!(active[0].message, "Saved");
    }

    #[test]
    fn test_interpret_failure_does_not_navigate() {
        let (client, notifications) = client();

        let outcome = client.interpret(SubmitResponse {
            success: false,
            message: Some("Invalid".to_string()),
            redirect_url: Some("/ignored".to_string()),
            reset_form: true,
        });

        assert!(!outcome.success);
        assert_eq!(outcome.navigation, None);
        assert!(!outcome.reset_form);
        assert_eq!(notifications.active()[0].severity, Severity::Error);
    }

    #[test]
    fn test_interpret_default_messages() {
        let (client, notifications) = client();

        client.interpret(SubmitResponse {
            success: true,
            message: None,
            redirect_url: None,
            reset_form: true,
        });

        assert_eq!(
            notifications.active()[0].message,
            "Operation completed successfully"
        );
    }
}
