//! Technical-support requests from the dashboard.

use serde::Deserialize;

use super::mailer::{MailError, Mailer, OutgoingEmail, templates};
use crate::validate::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum SupportError {
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("email delivery is not configured")]
    EmailDisabled,
    #[error(transparent)]
    Mail(#[from] MailError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupportInput {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl SupportInput {
    /// # Errors
    ///
    /// Returns the collected field errors.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.min_chars("name", &self.name, 2, "الاسم يجب أن يكون حرفين على الأقل");
        errors.email("email", &self.email);
        errors.required("subject", &self.subject, "الموضوع مطلوب");
        errors.min_chars("message", &self.message, 10, "الرسالة يجب أن تكون 10 أحرف على الأقل");
        errors.into_result()
    }

    fn to_email(&self, support_mailbox: &str) -> OutgoingEmail {
        OutgoingEmail {
            to: support_mailbox.to_owned(),
            subject: format!("طلب دعم فني: {}", self.subject.trim()),
            html: templates::support(self.name.trim(), self.email.trim(), self.subject.trim(), self.message.trim()),
        }
    }
}

/// Forward a support request to the support mailbox.
///
/// Both a mailer and a mailbox are needed; either missing means email is off.
pub async fn send_support_request(
    mailer: Option<&dyn Mailer>,
    support_mailbox: Option<&str>,
    input: &SupportInput,
) -> Result<(), SupportError> {
    input.validate()?;
    let (Some(mailer), Some(mailbox)) = (mailer, support_mailbox) else {
        return Err(SupportError::EmailDisabled);
    };
    mailer.send(&input.to_email(mailbox)).await?;
    Ok(())
}

#[cfg(test)]
#[path = "support_test.rs"]
mod tests;
