//! Delegation capabilities offered to the Navigator
//!
//! Each specialist role is exposed to the routing model as a function
//! declaration with a single required string parameter. The model "calls"
//! the function to hand the request off; nothing is executed locally.

use crate::types::{Role, ToolCall, ToolDefinition};
use serde_json::{json, Map, Value};

/// A named, described, single-parameter hand-off to one specialist role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelegationCapability {
    pub role: Role,
    /// Function name the model must call
    pub name: &'static str,
    pub description: &'static str,
    /// The one required parameter carrying the forwarded query
    pub parameter: &'static str,
    pub parameter_description: &'static str,
}

/// Hand-off declarations, in the order they are offered to the model.
pub const CAPABILITIES: [DelegationCapability; 4] = [
    DelegationCapability {
        role: Role::MedicalRecords,
        name: "MedicalRecordsAgent",
        description: "Delegates requests involving medical records, test results, diagnosis, and treatment history (Mandate: Data Security & Confidentiality).",
        parameter: "patient_records_inquiry",
        parameter_description: "The full context of the user's request regarding medical records.",
    },
    DelegationCapability {
        role: Role::BillingInsurance,
        name: "BillingAndInsuranceAgent",
        description: "Delegates requests regarding invoices, insurance benefits, payment options, and financial assistance (Mandate: Finance & Transparency).",
        parameter: "financial_and_insurance_query",
        parameter_description: "The full context of the user's financial or insurance question.",
    },
    DelegationCapability {
        role: Role::PatientInfo,
        name: "PatientInformationAgent",
        description: "Delegates requests regarding registration, personal detail updates, and administrative forms (Mandate: Administrative Information).",
        parameter: "administrative_info_request",
        parameter_description: "The full context of the administrative or registration request.",
    },
    DelegationCapability {
        role: Role::AppointmentScheduler,
        name: "AppointmentScheduler",
        description: "Delegates requests regarding scheduling, rescheduling, or cancelling appointments (Mandate: Time Logistics).",
        parameter: "appointment_logistics_query",
        parameter_description: "The full context of the appointment logistics request.",
    },
];

impl DelegationCapability {
    /// Look up the capability for a specialist role.
    pub fn for_role(role: Role) -> Option<&'static DelegationCapability> {
        CAPABILITIES.iter().find(|c| c.role == role)
    }

    /// Look up the capability the model called by name.
    pub fn for_name(name: &str) -> Option<&'static DelegationCapability> {
        CAPABILITIES.iter().find(|c| c.name == name)
    }

    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            self.parameter.to_string(),
            json!({
                "type": "string",
                "description": self.parameter_description
            }),
        );

        json!({
            "type": "object",
            "properties": properties,
            "required": [self.parameter]
        })
    }

    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters: self.parameters_schema(),
        }
    }

    /// Pull the forwarded query out of a call to this capability.
    ///
    /// Returns `None` when the argument is missing, not a string, or blank.
    pub fn extract_query(&self, call: &ToolCall) -> Option<String> {
        call.arguments
            .get(self.parameter)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

/// Tool declarations for every specialist, ready to send to the model.
pub fn definitions() -> Vec<ToolDefinition> {
    CAPABILITIES.iter().map(|c| c.to_definition()).collect()
}
