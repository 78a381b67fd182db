//! Contact submission and the outgoing mail it produces

use serde::Deserialize;

use super::validation::{
    check_length, is_valid_email, ContactValidationError, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH,
    MAX_SUBJECT_LENGTH,
};

/// Raw contact form as posted. Every field is optional so that a missing
/// field is reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A validated contact submission
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSubmission {
    name: String,
    email: String,
    subject: String,
    message: String,
}

fn required(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl ContactSubmission {
    /// Validate a posted form: required fields first, then the email
    /// pattern, then lengths.
    pub fn from_form(form: &ContactForm) -> Result<Self, ContactValidationError> {
        let (Some(name), Some(email), Some(subject), Some(_)) = (
            required(form.name.as_ref()),
            required(form.email.as_ref()),
            required(form.subject.as_ref()),
            required(form.message.as_ref()),
        ) else {
            return Err(ContactValidationError::MissingFields);
        };

        if !is_valid_email(email) {
            return Err(ContactValidationError::InvalidEmail);
        }

        // The body keeps its own line breaks and indentation
        let message = form.message.as_deref().unwrap_or_default().trim_end();

        check_length("name", name, MAX_NAME_LENGTH)?;
        check_length("subject", subject, MAX_SUBJECT_LENGTH)?;
        check_length("message", message, MAX_MESSAGE_LENGTH)?;

        Ok(Self {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An email ready to hand to the mail provider
#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

impl MailMessage {
    /// Compose the notification sent to the site owner
    pub fn for_submission(
        submission: &ContactSubmission,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        let html = format!(
            "<h2>New Contact Form Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Subject:</strong> {}</p>\n\
             <h3>Message:</h3>\n\
             <p>{}</p>\n\
             <hr>\n\
             <p><small>This message was sent from your portfolio contact form.</small></p>",
            escape_html(submission.name()),
            escape_html(submission.email()),
            escape_html(submission.subject()),
            escape_html(submission.message()).replace('\n', "<br>"),
        );

        Self {
            from: from.into(),
            to: to.into(),
            reply_to: submission.email().to_string(),
            subject: format!("Portfolio Contact: {}", submission.subject()),
            html,
        }
    }
}

/// Escape text for inclusion in HTML element content
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());

    for c in input.chars() {
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
