//! Contact domain - form validation and the mail relay contract

mod entity;
mod mailer;
mod validation;

pub use entity::{escape_html, ContactForm, ContactSubmission, MailMessage};
pub use mailer::Mailer;
pub use validation::{
    is_valid_email, ContactValidationError, MAX_MESSAGE_LENGTH, MAX_NAME_LENGTH,
    MAX_SUBJECT_LENGTH,
};

#[cfg(test)]
pub use mailer::mock::MockMailer;
