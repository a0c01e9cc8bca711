//! Notification resolution and delivery.
//!
//! Resolution is pure: a template plus a value map becomes a
//! [`ResolvedNotification`] — recipients and final text as data. Actual
//! delivery (push, email, in-app) lives behind the [`Notifier`] trait so
//! the engine itself stays free of I/O.

use alur_types::{Notification, WorkflowResult};
use async_trait::async_trait;
use std::collections::HashMap;

/// A notification with its template resolved, ready for delivery
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedNotification {
    pub recipients: Vec<String>,
    pub message: String,
}

/// Resolve a notification template against caller-supplied values.
///
/// Returns `None` when the template addresses no one — a transition may
/// legitimately carry a message with an empty recipient list.
pub fn render(
    notification: &Notification,
    values: &HashMap<String, String>,
) -> Option<ResolvedNotification> {
    let recipients: Vec<String> = notification
        .recipients()
        .into_iter()
        .map(String::from)
        .collect();
    if recipients.is_empty() {
        return None;
    }

    Some(ResolvedNotification {
        recipients,
        message: interpolate(&notification.message, values),
    })
}

/// Substitute every `{placeholder}` token that has a supplied value.
///
/// Unknown tokens are left verbatim: a missing caller value shows up
/// downstream as `{surveyDate}` instead of silently rendering blank.
fn interpolate(template: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match values.get(token) {
                    Some(value) => out.push_str(value),
                    None => {
                        tracing::debug!(token, "no value supplied for placeholder");
                        out.push('{');
                        out.push_str(token);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // Unbalanced brace, keep the tail as-is
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Delivery sink for resolved notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, division: &str, message: &str) -> WorkflowResult<()>;
}

/// Default sink: delivery is a structured log line
#[derive(Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn deliver(&self, division: &str, message: &str) -> WorkflowResult<()> {
        tracing::info!(division, message, "notification delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alur_types::Recipients;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_interpolate_substitutes_known_tokens() {
        let result = interpolate(
            "Offer for '{projectName}' approved by {actorUsername}.",
            &values(&[("projectName", "Gedung A"), ("actorUsername", "budi")]),
        );
        assert_eq!(result, "Offer for 'Gedung A' approved by budi.");
    }

    #[test]
    fn test_interpolate_leaves_unknown_tokens_verbatim() {
        let result = interpolate(
            "Survey on {surveyDate}.",
            &values(&[("projectName", "Gedung A")]),
        );
        assert_eq!(result, "Survey on {surveyDate}.");
    }

    #[test]
    fn test_interpolate_unbalanced_brace() {
        let result = interpolate("Progress is {unclosed", &values(&[]));
        assert_eq!(result, "Progress is {unclosed");
    }

    #[test]
    fn test_interpolate_repeated_token() {
        let result = interpolate(
            "{projectName} and {projectName}",
            &values(&[("projectName", "X")]),
        );
        assert_eq!(result, "X and X");
    }

    #[test]
    fn test_render_single_and_multi_recipient() {
        let single = Notification {
            division: Some(Recipients::One("Owner".into())),
            message: "Offer for '{projectName}' submitted.".into(),
        };
        let resolved = render(&single, &values(&[("projectName", "Gedung A")])).unwrap();
        assert_eq!(resolved.recipients, vec!["Owner"]);
        assert_eq!(resolved.message, "Offer for 'Gedung A' submitted.");

        let multi = Notification {
            division: Some(Recipients::Many(vec![
                "Admin Proyek".into(),
                "Owner".into(),
            ])),
            message: "m".into(),
        };
        let resolved = render(&multi, &values(&[])).unwrap();
        assert_eq!(resolved.recipients.len(), 2);
    }

    #[test]
    fn test_render_no_recipients() {
        let nobody = Notification {
            division: None,
            message: "m".into(),
        };
        assert!(render(&nobody, &values(&[])).is_none());
    }
}
