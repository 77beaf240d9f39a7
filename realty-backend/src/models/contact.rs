use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A plain contact-page message.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactMessageRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

/// A detailed investment lead from the long-form contact funnel.
#[derive(Debug, Clone, Serialize)]
pub struct ContactLead {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub investment_budget: String,
    pub investment_type: String,
    pub preferred_location: String,
    pub timeline: String,
    pub message: String,
    pub property_interests: String,
    pub created_at: DateTime<Utc>,
}

impl ContactLead {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// The lead form posts camelCase field names; `propertyInterest` arrives as
/// either a single string or an array of checkbox values.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactLeadRequest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, rename = "investmentBudget")]
    pub investment_budget: Option<String>,
    #[serde(default, rename = "investmentType")]
    pub investment_type: Option<String>,
    #[serde(default, rename = "preferredLocation")]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "propertyInterest")]
    pub property_interest: Option<Value>,
}

impl ContactLeadRequest {
    /// Flatten the property-interest selection into a comma-joined string
    /// for storage.
    pub fn interests_joined(&self) -> String {
        match &self.property_interest {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lead_request_parses_camel_case() {
        let req: ContactLeadRequest = serde_json::from_value(json!({
            "firstName": "Amira",
            "lastName": "Hassan",
            "email": "amira@example.com",
            "phone": "+971501234567",
            "investmentBudget": "1m-2m",
            "propertyInterest": ["villa", "penthouse"],
        }))
        .unwrap();

        assert_eq!(req.first_name, "Amira");
        assert_eq!(req.investment_budget.as_deref(), Some("1m-2m"));
        assert_eq!(req.interests_joined(), "villa, penthouse");
    }

    #[test]
    fn interests_accept_single_string() {
        let req: ContactLeadRequest = serde_json::from_value(json!({
            "firstName": "A",
            "lastName": "B",
            "email": "a@example.com",
            "phone": "+971501234567",
            "propertyInterest": "townhouse",
        }))
        .unwrap();
        assert_eq!(req.interests_joined(), "townhouse");

        let req: ContactLeadRequest = serde_json::from_value(json!({
            "firstName": "A",
            "lastName": "B",
            "email": "a@example.com",
            "phone": "+971501234567",
        }))
        .unwrap();
        assert_eq!(req.interests_joined(), "");
    }
}
