//! Role registry
//!
//! Static table of the Navigator and the four specialist roles: display
//! metadata, the instruction text each role runs under, and whether the role
//! may ground its answer with web search. Built once at startup (optionally
//! with overrides from `medhub.toml`) and never mutated afterwards.

use crate::tools::delegation::{self, DelegationCapability};
use crate::types::{Role, ToolDefinition};
use crate::utils::toml_config::RoleOverride;
use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

/// Greeting seeded into a fresh transcript.
pub const WELCOME_MESSAGE: &str = "Hello. I am the **Hospital System Navigator**, your Medical AI Delegation Hub. \n\nI ensure your requests are handled securely by delegating them to our specialized units:\n\n* **Medical Records** (Security Mandate)\n* **Billing & Finance** (Transparency Mandate)\n* **Patient Admin** (Documentation Mandate)\n* **Scheduling** (Logistics Mandate)\n\nHow may I direct you today?";

const NAVIGATOR_INSTRUCTION: &str = r#"**SYSTEM ROLE:** Medical AI Delegation Hub (Hospital System Navigator).
**CORE FUNCTION:** You are the **Intent Validator** and **Data Traffic Controller**. You are NOT a chatbot for general conversation.

**STRICT CONTROL PROTOCOLS:**
1. **DELEGATION ONLY:** You are strictly prohibited from answering user questions directly. Your ONLY function is to delegate to the correct **Specialist Mandate Execution Module**.
2. **INTENT VALIDATION:** You must analyze the user's intent to identify the specific hospital mandate required (Security, Finance, Admin, or Logistics).
3. **CONTEXT TRANSFER:** You must pass the ENTIRE context of the user's request to the specialist agent. Do not summarize if it loses critical details.

**DELEGATION LOGIC (MANDATES):**
- **Mandate: Data Security & Confidentiality:** If intent involves clinical data, results, or history -> Delegate to `MedicalRecordsAgent`.
- **Mandate: Finance & Transparency:** If intent involves bills, insurance, or costs -> Delegate to `BillingAndInsuranceAgent`.
- **Mandate: Administrative Information:** If intent involves bio-data, registration, or forms -> Delegate to `PatientInformationAgent`.
- **Mandate: Time Logistics:** If intent involves calendar, booking, or availability -> Delegate to `AppointmentScheduler`.

**INTERACTION STYLE:**
- If the user greets you ("Hello"), you may briefly identify yourself as the "Hospital System Navigator" and ask for their request.
- For ALL other inputs, you MUST call a tool."#;

const MEDICAL_RECORDS_INSTRUCTION: &str = r#"**ROLE:** MedicalRecordsAgent (Specialist Execution Module)
**MANDATE:** Data Security & Confidentiality.

**OUTPUT MANDATE:**
1. **Accuracy & Completeness:** You must guarantee accurate medical record outputs.
2. **Structured Format:** You MUST simulate the "Generate Document" tool by formatting your response as a professional, structured Medical Record (using Markdown tables or distinct sections).
3. **Privacy Protocol:** Always preface output with: "⚠️ **CONFIDENTIAL - PROTECTED HEALTH INFORMATION**".
4. **Simulation:** Since this is a demo, generate realistic *mock* data for the user."#;

const BILLING_INSTRUCTION: &str = r#"**ROLE:** BillingAndInsuranceAgent (Specialist Execution Module)
**MANDATE:** Finance & Transparency.

**OUTPUT MANDATE:**
1. **Comprehensive Explanation:** Provide clear, line-item explanations for invoices.
2. **Insurance Clarity:** Explain deductibles, co-pays, and coverage clearly.
3. **Financial Aid:** You MUST integrate information about payment plans or financial assistance.
4. **External Verification:** Use the available Google Search tool to find general insurance policy info if the user asks about specific providers (e.g., "Does BlueCross cover X?")."#;

const PATIENT_INFO_INSTRUCTION: &str = r#"**ROLE:** PatientInformationAgent (Specialist Execution Module)
**MANDATE:** Documentation & Data Integrity.

**OUTPUT MANDATE:**
1. **Explicit Confirmation:** You must explicitly confirm what data has been updated (e.g., "I have updated your address to...").
2. **Form Generation:** If a form is requested, you MUST simulate "Generate Document" by outputting the form fields clearly in Markdown.
3. **External Info:** Use Google Search if the user asks for general hospital administrative details (e.g., "visiting hours", "parking location")."#;

const SCHEDULER_INSTRUCTION: &str = r#"**ROLE:** AppointmentScheduler (Specialist Execution Module)
**MANDATE:** Time Logistics.

**OUTPUT MANDATE:**
1. **Clear Status:** Final output MUST be a confirmed status: **BOOKED**, **CANCELLED**, or **RESCHEDULED**.
2. **Missing Info:** If date/time/doctor is missing, you MUST explicitly ask for it before confirming.
3. **Verification:** Use Google Search to verify doctor availability or department contact info if needed.
4. **Simulation:** Assume the requested slot is available for this demo unless asked otherwise."#;

/// Everything the hub knows about one role
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoleProfile {
    pub role: Role,
    /// Display name (e.g. "Medical Records")
    pub name: String,
    /// Short mandate line shown next to the name
    pub description: String,
    /// Palette token used by renderers
    pub color: String,
    /// Instruction text sent as the system prompt; not exposed over the API
    #[serde(skip)]
    pub instruction: String,
    /// Offer the web search capability on specialist calls
    pub web_search: bool,
}

impl RoleProfile {
    /// The canonical profile for `role`
    pub fn builtin(role: Role) -> Self {
        let (name, description, color, instruction, web_search) = match role {
            Role::Navigator => (
                "Delegation Hub",
                "Traffic Control & Validation",
                "slate",
                NAVIGATOR_INSTRUCTION,
                false,
            ),
            Role::MedicalRecords => (
                "Medical Records",
                "Mandate: Data Security",
                "rose",
                MEDICAL_RECORDS_INSTRUCTION,
                false,
            ),
            Role::BillingInsurance => (
                "Billing & Finance",
                "Mandate: Transparency",
                "emerald",
                BILLING_INSTRUCTION,
                true,
            ),
            Role::PatientInfo => (
                "Patient Admin",
                "Mandate: Documentation",
                "blue",
                PATIENT_INFO_INSTRUCTION,
                true,
            ),
            Role::AppointmentScheduler => (
                "Scheduler",
                "Mandate: Logistics",
                "violet",
                SCHEDULER_INSTRUCTION,
                true,
            ),
        };

        Self {
            role,
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            instruction: instruction.to_string(),
            web_search,
        }
    }

    fn apply(&mut self, role_override: &RoleOverride) {
        if let Some(instruction) = &role_override.instruction {
            self.instruction = instruction.clone();
        }
        if let Some(web_search) = role_override.web_search {
            self.web_search = web_search;
        }
    }
}

/// Role → profile table with O(1) lookup
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    profiles: [RoleProfile; 5],
}

impl Default for RoleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RoleRegistry {
    /// Registry with the built-in instruction set
    pub fn new() -> Self {
        Self {
            profiles: Role::ALL.map(RoleProfile::builtin),
        }
    }

    /// Registry with per-role overrides applied on top of the built-ins
    pub fn with_overrides(overrides: &HashMap<Role, RoleOverride>) -> Self {
        let mut registry = Self::new();
        for (role, role_override) in overrides {
            registry.profiles[role.index()].apply(role_override);
        }
        registry
    }

    pub fn profile(&self, role: Role) -> &RoleProfile {
        &self.profiles[role.index()]
    }

    pub fn instruction(&self, role: Role) -> &str {
        &self.profile(role).instruction
    }

    pub fn display_name(&self, role: Role) -> &str {
        &self.profile(role).name
    }

    /// All profiles, Navigator first
    pub fn profiles(&self) -> impl Iterator<Item = &RoleProfile> {
        self.profiles.iter()
    }

    /// Map a capability name from a model function call back to its role
    pub fn role_for_capability(&self, name: &str) -> Option<Role> {
        DelegationCapability::for_name(name).map(|c| c.role)
    }

    /// Tool declarations offered to the Navigator
    pub fn capability_definitions(&self) -> Vec<ToolDefinition> {
        delegation::definitions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("MedicalRecordsAgent", Role::MedicalRecords)]
    #[case("BillingAndInsuranceAgent", Role::BillingInsurance)]
    #[case("PatientInformationAgent", Role::PatientInfo)]
    #[case("AppointmentScheduler", Role::AppointmentScheduler)]
    fn test_capability_maps_to_role(#[case] name: &str, #[case] role: Role) {
        let registry = RoleRegistry::new();
        assert_eq!(registry.role_for_capability(name), Some(role));
    }

    #[test]
    fn test_unknown_capability() {
        let registry = RoleRegistry::new();
        assert_eq!(registry.role_for_capability("PharmacyAgent"), None);
        assert_eq!(registry.role_for_capability("medicalrecordsagent"), None);
    }

    #[test]
    fn test_profiles_are_total() {
        let registry = RoleRegistry::new();
        for role in Role::ALL {
            let profile = registry.profile(role);
            assert_eq!(profile.role, role);
            assert!(!profile.name.is_empty());
            assert!(!profile.instruction.is_empty());
        }
        assert_eq!(registry.profiles().count(), 5);
    }

    #[test]
    fn test_display_names() {
        let registry = RoleRegistry::new();
        assert_eq!(registry.display_name(Role::MedicalRecords), "Medical Records");
        assert_eq!(registry.display_name(Role::BillingInsurance), "Billing & Finance");
        assert_eq!(registry.display_name(Role::Navigator), "Delegation Hub");
    }

    #[test]
    fn test_search_flags() {
        let registry = RoleRegistry::new();
        assert!(!registry.profile(Role::Navigator).web_search);
        assert!(!registry.profile(Role::MedicalRecords).web_search);
        assert!(registry.profile(Role::BillingInsurance).web_search);
        assert!(registry.profile(Role::PatientInfo).web_search);
        assert!(registry.profile(Role::AppointmentScheduler).web_search);
    }

    #[test]
    fn test_medical_records_requires_confidentiality_notice() {
        let registry = RoleRegistry::new();
        assert!(registry
            .instruction(Role::MedicalRecords)
            .contains("CONFIDENTIAL - PROTECTED HEALTH INFORMATION"));
    }

    #[test]
    fn test_overrides_replace_only_given_fields() {
        let mut overrides = HashMap::new();
        overrides.insert(
            Role::BillingInsurance,
            RoleOverride {
                instruction: None,
                web_search: Some(false),
            },
        );
        overrides.insert(
            Role::PatientInfo,
            RoleOverride {
                instruction: Some("Only confirm updates.".to_string()),
                web_search: None,
            },
        );

        let registry = RoleRegistry::with_overrides(&overrides);
        let billing = registry.profile(Role::BillingInsurance);
        assert!(!billing.web_search);
        assert_eq!(billing.instruction, BILLING_INSTRUCTION);

        let info = registry.profile(Role::PatientInfo);
        assert!(info.web_search);
        assert_eq!(info.instruction, "Only confirm updates.");
    }

    #[test]
    fn test_instruction_not_serialized() {
        let registry = RoleRegistry::new();
        let json = serde_json::to_value(registry.profile(Role::Navigator)).unwrap();
        assert!(json.get("instruction").is_none());
        assert_eq!(json["role"], "navigator");
        assert_eq!(json["color"], "slate");
    }

    #[test]
    fn test_capability_definitions_cover_specialists() {
        let registry = RoleRegistry::new();
        let defs = registry.capability_definitions();
        assert_eq!(defs.len(), Role::SPECIALISTS.len());
        for def in &defs {
            assert!(registry.role_for_capability(&def.name).is_some());
        }
    }
}
