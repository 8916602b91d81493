//! Transactional email delivery.
//!
//! DESIGN
//! ======
//! Routes and services talk to the `Mailer` trait so tests can swap in a
//! recording mock. The production implementation sends through Resend.
//! Templates are HTML files compiled into the binary; every interpolated
//! value is HTML-escaped because most of it is visitor-supplied.

use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;

use crate::config::EmailConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Provider-neutral async mail sender. Enables mocking in tests.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] if the provider rejects or cannot be reached.
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;
}

pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(config: &EmailConfig) -> Self {
        Self { client: Resend::new(&config.api_key), from: config.from.clone() }
    }
}

#[async_trait::async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let to = [email.to.as_str()];
        let options = CreateEmailBaseOptions::new(&self.from, to, &email.subject).with_html(&email.html);
        self.client
            .emails
            .send(options)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;
        tracing::info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

// =============================================================================
// TEMPLATES
// =============================================================================

pub mod templates {
    const CONTACT_NOTIFICATION: &str = include_str!("../../templates/contact_notification.html");
    const REPLY: &str = include_str!("../../templates/reply.html");
    const SUPPORT: &str = include_str!("../../templates/support.html");

    #[must_use]
    pub fn contact_notification(name: &str, email: &str, message: &str) -> String {
        render(CONTACT_NOTIFICATION, &[("NAME", name), ("EMAIL", email), ("MESSAGE", message)])
    }

    #[must_use]
    pub fn reply(name: &str, reply: &str, original: &str, signature: &str) -> String {
        render(
            REPLY,
            &[("NAME", name), ("REPLY", reply), ("ORIGINAL", original), ("SIGNATURE", signature)],
        )
    }

    #[must_use]
    pub fn support(name: &str, email: &str, subject: &str, message: &str) -> String {
        render(
            SUPPORT,
            &[("NAME", name), ("EMAIL", email), ("SUBJECT", subject), ("MESSAGE", message)],
        )
    }

    /// Substitute `{{KEY}}` placeholders in one pass over the template, so
    /// inserted values are never scanned again. Unknown keys stay as written.
    fn render(template: &str, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                rest = &rest[start..];
                break;
            };
            let key = &after[..end];
            match vars.iter().find(|(name, _)| *name == key) {
                Some((_, value)) => out.push_str(&escape_html(value)),
                None => out.push_str(&rest[start..start + 2 + end + 2]),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }

    #[must_use]
    pub fn escape_html(raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                _ => out.push(c),
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "mailer_test.rs"]
mod tests;
