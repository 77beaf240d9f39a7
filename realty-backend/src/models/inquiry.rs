use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the visitor is asking for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryType {
    Viewing,
    #[default]
    Info,
    Offer,
    Callback,
    Brochure,
}

impl InquiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryType::Viewing => "viewing",
            InquiryType::Info => "info",
            InquiryType::Offer => "offer",
            InquiryType::Callback => "callback",
            InquiryType::Brochure => "brochure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            InquiryType::Viewing,
            InquiryType::Info,
            InquiryType::Offer,
            InquiryType::Callback,
            InquiryType::Brochure,
        ]
        .iter()
        .copied()
        .find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
    Whatsapp,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Phone => "phone",
            ContactMethod::Whatsapp => "whatsapp",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        [
            ContactMethod::Email,
            ContactMethod::Phone,
            ContactMethod::Whatsapp,
        ]
        .iter()
        .copied()
        .find(|m| m.as_str() == value)
    }
}

/// A lead captured against a specific exclusive property.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyInquiry {
    pub id: i64,
    pub property_id: String,
    pub inquiry_type: InquiryType,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub preferred_contact_method: ContactMethod,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub is_responded: bool,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInquiryRequest {
    pub property_id: String,
    #[serde(default)]
    pub inquiry_type: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub contact_method: Option<String>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub budget_min: Option<f64>,
    #[serde(default, deserialize_with = "super::lenient_f64")]
    pub budget_max: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inquiry_type_defaults_to_info() {
        assert_eq!(InquiryType::default(), InquiryType::Info);
        assert_eq!(InquiryType::parse("brochure"), Some(InquiryType::Brochure));
        assert_eq!(InquiryType::parse("purchase"), None);
    }

    #[test]
    fn request_accepts_string_budgets() {
        let req: CreateInquiryRequest = serde_json::from_value(serde_json::json!({
            "property_id": "abc",
            "name": "Jo",
            "email": "jo@example.com",
            "budget_min": "1500000",
            "budget_max": 2500000,
        }))
        .unwrap();
        assert_eq!(req.budget_min, Some(1_500_000.0));
        assert_eq!(req.budget_max, Some(2_500_000.0));
    }
}
