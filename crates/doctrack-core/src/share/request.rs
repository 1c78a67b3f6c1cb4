//! Share request payloads and their validation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::models::{DocumentId, ShareMethod};

/// Email share fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailPayload {
    pub to: String,
    pub subject: String,
    pub message: String,
}

impl EmailPayload {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.to) {
            return Err(ValidationError::MissingRecipient);
        }
        if is_blank(&self.subject) {
            return Err(ValidationError::MissingSubject);
        }
        if is_blank(&self.message) {
            return Err(ValidationError::MissingMessage);
        }
        Ok(())
    }
}

/// WhatsApp share fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsappPayload {
    /// Phone number as typed, with country code; punctuation is stripped
    pub phone: String,
}

impl WhatsappPayload {
    pub fn new(phone: impl Into<String>) -> Self {
        Self {
            phone: phone.into(),
        }
    }

    /// The digits-only phone number, or an error if none remain
    pub(crate) fn normalized_phone(&self) -> Result<String, ValidationError> {
        let phone = normalize_phone(&self.phone);
        if phone.is_empty() {
            return Err(ValidationError::MissingPhoneNumber);
        }
        Ok(phone)
    }
}

/// Channel-specific share payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
pub enum SharePayload {
    Email(EmailPayload),
    Whatsapp(WhatsappPayload),
}

impl SharePayload {
    pub fn method(&self) -> ShareMethod {
        match self {
            SharePayload::Email(_) => ShareMethod::Email,
            SharePayload::Whatsapp(_) => ShareMethod::Whatsapp,
        }
    }
}

/// One share attempt: the target documents and how to send them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareRequest {
    pub documents: Vec<DocumentId>,
    pub payload: SharePayload,
}

impl ShareRequest {
    pub fn email(documents: Vec<DocumentId>, payload: EmailPayload) -> Self {
        Self {
            documents,
            payload: SharePayload::Email(payload),
        }
    }

    pub fn whatsapp(documents: Vec<DocumentId>, payload: WhatsappPayload) -> Self {
        Self {
            documents,
            payload: SharePayload::Whatsapp(payload),
        }
    }

    pub fn method(&self) -> ShareMethod {
        self.payload.method()
    }
}

/// Strip every non-digit character from a phone number
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("91-123 456-7890"), "911234567890");
        assert_eq!(normalize_phone("+1 (234) 567-890"), "1234567890");
        assert_eq!(normalize_phone("call me"), "");
    }

    #[test]
    fn test_email_validation_order() {
        assert_eq!(
            EmailPayload::new("", "x", "y").validate(),
            Err(ValidationError::MissingRecipient)
        );
        assert_eq!(
            EmailPayload::new("a@b.c", "  ", "y").validate(),
            Err(ValidationError::MissingSubject)
        );
        assert_eq!(
            EmailPayload::new("a@b.c", "x", "").validate(),
            Err(ValidationError::MissingMessage)
        );
        assert!(EmailPayload::new("a@b.c", "x", "y").validate().is_ok());
    }

    #[test]
    fn test_whatsapp_requires_digits() {
        assert_eq!(
            WhatsappPayload::new("+ - ()").normalized_phone(),
            Err(ValidationError::MissingPhoneNumber)
        );
        assert_eq!(
            WhatsappPayload::new("91-123 456-7890").normalized_phone().unwrap(),
            "911234567890"
        );
    }

    #[test]
    fn test_payload_method() {
        let request = ShareRequest::whatsapp(vec![DocumentId(1)], WhatsappPayload::new("1"));
        assert_eq!(request.method(), ShareMethod::Whatsapp);

        let request = ShareRequest::email(vec![DocumentId(1)], EmailPayload::new("a", "b", "c"));
        assert_eq!(request.method(), ShareMethod::Email);
    }

    #[test]
    fn test_payload_tagged_serialization() {
        let payload = SharePayload::Whatsapp(WhatsappPayload::new("123"));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["channel"], "whatsapp");
        assert_eq!(json["phone"], "123");
    }
}
