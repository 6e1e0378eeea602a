//! Email notifications for new leads and contact requests
//!
//! Each notification sends two emails through the Resend API: one to the
//! site administrator, one confirmation to the requester. Delivery is
//! fire-and-forget from the caller's point of view.

use async_trait::async_trait;
use backoff::ExponentialBackoff;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{NewContactRequest, NewLead};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Lead,
    Contact,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lead => write!(f, "lead"),
            Self::Contact => write!(f, "contact"),
        }
    }
}

/// Data interpolated into the email templates
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub phone: String,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub region: Option<String>,
}

impl From<&NewLead> for NotificationPayload {
    fn from(lead: &NewLead) -> Self {
        Self {
            first_name: Some(lead.first_name.clone()),
            last_name: Some(lead.last_name.clone()),
            email: lead.email.clone(),
            phone: lead.phone.clone(),
            region: Some(lead.region.clone()),
            ..Default::default()
        }
    }
}

impl From<&NewContactRequest> for NotificationPayload {
    fn from(contact: &NewContactRequest) -> Self {
        Self {
            name: Some(contact.name.clone()),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            subject: Some(contact.subject.clone()),
            message: Some(contact.message.clone()),
            ..Default::default()
        }
    }
}

impl NotificationPayload {
    fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => self
                .name
                .clone()
                .unwrap_or_else(|| "Non spécifié".to_string()),
        }
    }

    fn greeting_name(&self, kind: NotificationKind) -> String {
        let preferred = match kind {
            NotificationKind::Lead => self.first_name.as_ref().or(self.name.as_ref()),
            NotificationKind::Contact => self.name.as_ref(),
        };
        preferred
            .cloned()
            .unwrap_or_else(|| "Cher client".to_string())
    }
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("email API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email API rejected message with status {0}")]
    Rejected(StatusCode),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        kind: NotificationKind,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError>;
}

/// Spawn delivery in the background; failures are logged only.
pub fn dispatch(notifier: Arc<dyn Notifier>, kind: NotificationKind, payload: NotificationPayload) {
    tokio::spawn(async move {
        match notifier.send(kind, &payload).await {
            Ok(()) => tracing::info!(kind = %kind, "Notification sent"),
            Err(e) => tracing::warn!(kind = %kind, error = %e, "Notification delivery failed"),
        }
    });
}

/// Rendered email
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone)]
pub struct Branding {
    pub company_name: String,
    pub from: String,
    pub admin_email: String,
    pub website_url: String,
}

/// Resend-backed notifier
#[derive(Clone)]
pub struct ResendNotifier {
    client: Client,
    api_key: String,
    branding: Branding,
    max_elapsed: Duration,
}

impl ResendNotifier {
    pub fn new(client: Client, api_key: &str, branding: Branding) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            branding,
            max_elapsed: Duration::from_secs(30),
        }
    }

    async fn deliver(&self, email: &OutboundEmail) -> Result<(), NotifyError> {
        let policy = ExponentialBackoff {
            max_elapsed_time: Some(self.max_elapsed),
            ..Default::default()
        };

        backoff::future::retry(policy, || async {
            let sent = self
                .client
                .post(RESEND_API_URL)
                .bearer_auth(&self.api_key)
                .json(email)
                .send()
                .await;

            let status = match sent {
                Ok(response) => response.status(),
                Err(e) => return Err(backoff::Error::transient(NotifyError::Transport(e))),
            };
            if status.is_success() {
                Ok(())
            } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                tracing::debug!(status = %status, "Email API busy, retrying");
                Err(backoff::Error::transient(NotifyError::Rejected(status)))
            } else {
                Err(backoff::Error::permanent(NotifyError::Rejected(status)))
            }
        })
        .await
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    async fn send(
        &self,
        kind: NotificationKind,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError> {
        let emails = [
            admin_email(&self.branding, kind, payload),
            confirmation_email(&self.branding, kind, payload),
        ];
        deliver_each(&emails, |email| self.deliver(email)).await
    }
}

/// Attempt every email even when an earlier one fails; each failure is
/// logged and the first one is returned.
async fn deliver_each<'a, F, Fut>(emails: &'a [OutboundEmail], mut deliver: F) -> Result<(), NotifyError>
where
    F: FnMut(&'a OutboundEmail) -> Fut,
    Fut: Future<Output = Result<(), NotifyError>>,
{
    let mut first_error = None;

    for email in emails {
        if let Err(e) = deliver(email).await {
            tracing::warn!(to = ?email.to, subject = %email.subject, error = %e, "Email not delivered");
            first_error.get_or_insert(e);
        }
    }

    first_error.map_or(Ok(()), Err)
}

/// Used when no email API key is configured
pub struct LogOnlyNotifier;

#[async_trait]
impl Notifier for LogOnlyNotifier {
    async fn send(
        &self,
        kind: NotificationKind,
        payload: &NotificationPayload,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            kind = %kind,
            email = %payload.email,
            "Email delivery disabled, notification skipped"
        );
        Ok(())
    }
}

/// Escape text for interpolation into HTML
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn info_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="info-row"><span class="info-label">{label}</span><span class="info-value">{}</span></div>"#,
        escape_html(value)
    )
}

fn layout(header_color: &str, title: &str, subtitle: &str, body: &str, footer: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<style>
body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 0; background-color: #f4f4f4; }}
.container {{ max-width: 600px; margin: 0 auto; background: white; border-radius: 10px; overflow: hidden; }}
.header {{ background: {header_color}; color: white; padding: 30px; text-align: center; }}
.content {{ padding: 30px; }}
.info-row {{ display: flex; padding: 15px 0; border-bottom: 1px solid #eee; }}
.info-label {{ font-weight: bold; color: #666; width: 120px; }}
.message-box {{ background: #f9f9f9; padding: 20px; border-radius: 8px; margin-top: 20px; }}
.footer {{ background: #f9f9f9; padding: 20px; text-align: center; color: #666; font-size: 12px; }}
</style>
</head>
<body>
<div class="container">
<div class="header"><h1>{title}</h1><p>{subtitle}</p></div>
<div class="content">{body}</div>
<div class="footer">{footer}</div>
</div>
</body>
</html>"#
    )
}

fn footer(branding: &Branding) -> String {
    format!(
        "<p>© {} {} - Tous droits réservés</p>",
        chrono::Utc::now().format("%Y"),
        escape_html(&branding.company_name)
    )
}

/// Notification sent to the site administrator
pub fn admin_email(
    branding: &Branding,
    kind: NotificationKind,
    payload: &NotificationPayload,
) -> OutboundEmail {
    let company = escape_html(&branding.company_name);
    let not_specified = "Non spécifié";

    let (subject, html) = match kind {
        NotificationKind::Lead => {
            let name = payload.display_name();
            let body = [
                info_row("Nom complet:", &name),
                info_row("Email:", &payload.email),
                info_row("Téléphone:", &payload.phone),
                info_row("Région:", payload.region.as_deref().unwrap_or("Non spécifiée")),
            ]
            .concat();
            (
                format!("🏠 Nouveau Lead - {name}"),
                layout(
                    "#D4AF37",
                    &format!("🏠 {company}"),
                    "Nouveau Lead Reçu",
                    &body,
                    &footer(branding),
                ),
            )
        }
        NotificationKind::Contact => {
            let name = payload.name.clone().unwrap_or_else(|| not_specified.to_string());
            let body = [
                info_row("Nom:", &name),
                info_row("Email:", &payload.email),
                info_row("Téléphone:", &payload.phone),
                info_row("Sujet:", payload.subject.as_deref().unwrap_or(not_specified)),
                format!(
                    r#"<div class="message-box"><h3>Message:</h3><p>{}</p></div>"#,
                    escape_html(payload.message.as_deref().unwrap_or("Aucun message"))
                ),
            ]
            .concat();
            (
                format!("📩 Nouvelle Demande de Contact - {name}"),
                layout(
                    "#1a365d",
                    &format!("📩 {company}"),
                    "Nouvelle Demande de Contact",
                    &body,
                    &footer(branding),
                ),
            )
        }
    };

    OutboundEmail {
        from: branding.from.clone(),
        to: vec![branding.admin_email.clone()],
        subject,
        html,
    }
}

/// Confirmation sent back to the requester
pub fn confirmation_email(
    branding: &Branding,
    kind: NotificationKind,
    payload: &NotificationPayload,
) -> OutboundEmail {
    let subject = match kind {
        NotificationKind::Lead => format!("Merci pour votre intérêt - {}", branding.company_name),
        NotificationKind::Contact => {
            format!("Nous avons bien reçu votre message - {}", branding.company_name)
        }
    };
    let what = match kind {
        NotificationKind::Lead => "demande",
        NotificationKind::Contact => "message",
    };

    let body = format!(
        r#"<h2>Merci {}!</h2>
<p>Nous avons bien reçu votre {what} et notre équipe vous contactera dans les plus brefs délais.</p>
<p>En attendant, n'hésitez pas à explorer nos réalisations sur notre site.</p>
<a href="{}">Visiter notre site</a>"#,
        escape_html(&payload.greeting_name(kind)),
        escape_html(&branding.website_url),
    );

    OutboundEmail {
        from: branding.from.clone(),
        to: vec![payload.email.clone()],
        subject,
        html: layout(
            "#D4AF37",
            &format!("🏠 {}", escape_html(&branding.company_name)),
            "",
            &body,
            &footer(branding),
        ),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn branding() -> Branding {
        Branding {
            company_name: "PBH.M.S".into(),
            from: "PBH.M.S <onboarding@resend.dev>".into(),
            admin_email: "contact@example.ci".into(),
            website_url: "https://www.example.ci".into(),
        }
    }

    fn lead_payload() -> NotificationPayload {
        NotificationPayload {
            first_name: Some("Awa".into()),
            last_name: Some("Koné".into()),
            email: "awa@example.ci".into(),
            phone: "0700000000".into(),
            region: Some("Daloa".into()),
            ..Default::default()
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn lead_admin_email() {
        let email = admin_email(&branding(), NotificationKind::Lead, &lead_payload());

        assert_eq!(email.to, vec!["contact@example.ci".to_string()]);
        assert_eq!(email.subject, "🏠 Nouveau Lead - Awa Koné");
        assert!(email.html.contains("Daloa"));
        assert!(email.html.contains("Nouveau Lead Reçu"));
    }

    #[test]
    fn contact_admin_email_escapes_message() {
        let payload = NotificationPayload {
            name: Some("Yao".into()),
            email: "yao@example.ci".into(),
            phone: "0700000000".into(),
            subject: Some("Devis".into()),
            message: Some("<b>urgent</b>".into()),
            ..Default::default()
        };
        let email = admin_email(&branding(), NotificationKind::Contact, &payload);

        assert_eq!(email.subject, "📩 Nouvelle Demande de Contact - Yao");
        assert!(email.html.contains("&lt;b&gt;urgent&lt;/b&gt;"));
        assert!(!email.html.contains("<b>urgent</b>"));
    }

    #[test]
    fn confirmation_goes_to_requester() {
        let email = confirmation_email(&branding(), NotificationKind::Lead, &lead_payload());

        assert_eq!(email.to, vec!["awa@example.ci".to_string()]);
        assert_eq!(email.subject, "Merci pour votre intérêt - PBH.M.S");
        assert!(email.html.contains("Merci Awa!"));
        assert!(email.html.contains("votre demande"));
    }

    #[tokio::test]
    async fn confirmation_is_sent_even_when_admin_email_fails() {
        let emails = [
            admin_email(&branding(), NotificationKind::Lead, &lead_payload()),
            confirmation_email(&branding(), NotificationKind::Lead, &lead_payload()),
        ];
        let attempted = parking_lot::Mutex::new(Vec::new());

        let result = deliver_each(&emails, |email| {
            attempted.lock().push(email.to[0].clone());
            let admin = email.to[0] == "contact@example.ci";
            async move {
                if admin {
                    Err(NotifyError::Rejected(StatusCode::FORBIDDEN))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(matches!(result, Err(NotifyError::Rejected(StatusCode::FORBIDDEN))));
        assert_eq!(
            *attempted.lock(),
            vec!["contact@example.ci".to_string(), "awa@example.ci".to_string()]
        );
    }

    #[tokio::test]
    async fn all_delivered_is_ok() {
        let emails = [confirmation_email(&branding(), NotificationKind::Lead, &lead_payload())];
        assert!(deliver_each(&emails, |_| async { Ok(()) }).await.is_ok());
    }

    #[test]
    fn payload_from_contact() {
        let contact = NewContactRequest {
            name: "Yao".into(),
            email: "yao@example.ci".into(),
            phone: "0700000000".into(),
            subject: "Devis".into(),
            message: "Bonjour, un devis svp".into(),
        };
        let payload = NotificationPayload::from(&contact);

        assert_eq!(payload.display_name(), "Yao");
        assert_eq!(payload.greeting_name(NotificationKind::Contact), "Yao");
    }
}
