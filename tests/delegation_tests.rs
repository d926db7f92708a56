//! End-to-end turn tests
//!
//! Drive the conversation controller through the real delegation client
//! against scripted model responses.

mod common;

use common::mocks::{controller, tool_call, BlockingLLMClient, MockLLMClient};
use medhub::agents::controller::{CONNECTION_ERROR_BANNER, HUB_OFFLINE_MESSAGE};
use medhub::agents::delegation::EMPTY_RESPONSE;
use medhub::agents::router::NAVIGATOR_FALLBACK;
use medhub::types::{MessageOrigin, RejectReason, Role, TurnOutcome, TurnPhase};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

const CONFIDENTIAL: &str = "⚠️ **CONFIDENTIAL - PROTECTED HEALTH INFORMATION**";

#[tokio::test]
async fn test_blood_test_scenario() {
    let llm = MockLLMClient::delegating(
        "MedicalRecordsAgent",
        json!({"patient_records_inquiry": "I need my blood test results"}),
        &format!("{}\n\n| Test | Result |\n|---|---|\n| Hemoglobin | 14.1 g/dL |", CONFIDENTIAL),
    );
    let hub = controller(Arc::new(llm.clone()));

    let outcome = hub.submit("I need my blood test results").await;
    assert_eq!(
        outcome,
        TurnOutcome::Delegated {
            role: Role::MedicalRecords
        }
    );

    let messages = hub.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].origin, MessageOrigin::User);
    assert!(messages[1].is_delegation_log);
    assert!(messages[1].content.contains("Delegating to Medical Records"));
    assert_eq!(messages[2].role, Some(Role::MedicalRecords));
    assert!(messages[2].content.starts_with(CONFIDENTIAL));

    let calls = llm.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].is_routing());
    assert_eq!(calls[0].tools.len(), 4);
    assert_eq!(calls[1].prompt, "I need my blood test results");
    assert_eq!(calls[1].web_search, Some(false));
}

#[tokio::test]
async fn test_hello_scenario() {
    let llm = MockLLMClient::new("Hello. I am the Hospital System Navigator. How may I direct you?");
    let hub = controller(Arc::new(llm.clone()));

    assert_eq!(hub.submit("Hello").await, TurnOutcome::Direct);

    let messages = hub.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].origin, MessageOrigin::Assistant);
    assert_eq!(messages[1].role, Some(Role::Navigator));
    assert!(!messages.iter().any(|m| m.is_delegation_log));

    // No specialist call was made
    assert_eq!(llm.calls().len(), 1);
}

#[tokio::test]
async fn test_empty_direct_reply_uses_fallback() {
    let hub = controller(Arc::new(MockLLMClient::new("")));
    hub.submit("Hello").await;
    assert_eq!(hub.messages()[1].content, NAVIGATOR_FALLBACK);
}

#[tokio::test]
async fn test_route_failure() {
    let llm = MockLLMClient::failing();
    let hub = controller(Arc::new(llm.clone()));

    let outcome = hub.submit("What are the visiting hours?").await;
    assert!(matches!(outcome, TurnOutcome::Failed { .. }));

    let messages = hub.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, HUB_OFFLINE_MESSAGE);
    assert!(messages[1].is_delegation_log);
    assert_eq!(
        messages.iter().filter(|m| m.is_delegation_log).count(),
        1,
        "only the error line, no hand-off log"
    );

    let status = hub.status();
    assert_eq!(status.error.as_deref(), Some(CONNECTION_ERROR_BANNER));
    assert_eq!(status.active_role, None);
    assert_eq!(status.phase, TurnPhase::Idle);
    assert!(!hub.is_processing());

    // Specialist never called
    assert_eq!(llm.calls().len(), 1);
}

#[tokio::test]
async fn test_specialist_failure_is_in_band() {
    let llm = MockLLMClient::delegating(
        "BillingAndInsuranceAgent",
        json!({"financial_and_insurance_query": "Explain invoice #4411"}),
        "",
    )
    .with_failing_specialist();
    let hub = controller(Arc::new(llm));

    let outcome = hub.submit("Explain invoice #4411").await;
    assert_eq!(
        outcome,
        TurnOutcome::Delegated {
            role: Role::BillingInsurance
        }
    );

    let messages = hub.messages();
    assert_eq!(messages.len(), 3);
    assert!(messages[1].is_delegation_log);
    assert_eq!(
        messages[2].content,
        "An error occurred within the Billing & Finance module."
    );
    assert_eq!(messages[2].role, Some(Role::BillingInsurance));
    assert!(hub.status().error.is_none());
}

#[tokio::test]
async fn test_empty_specialist_reply() {
    let llm = MockLLMClient::delegating(
        "PatientInformationAgent",
        json!({"administrative_info_request": "registration form"}),
        "",
    );
    let hub = controller(Arc::new(llm));

    hub.submit("I need a registration form").await;
    assert_eq!(hub.messages()[2].content, EMPTY_RESPONSE);
}

#[tokio::test]
async fn test_unknown_capability_answers_directly() {
    let llm = MockLLMClient::with_tool_calls(
        "I can help with that.",
        vec![tool_call("PharmacyAgent", json!({"refill": "lisinopril"}))],
    );
    let hub = controller(Arc::new(llm.clone()));

    assert_eq!(hub.submit("Refill my prescription").await, TurnOutcome::Direct);
    assert_eq!(hub.messages()[1].content, "I can help with that.");
    assert_eq!(llm.calls().len(), 1);
}

#[tokio::test]
async fn test_missing_parameter_forwards_user_text() {
    let llm = MockLLMClient::delegating("AppointmentScheduler", json!({}), "**BOOKED**");
    let hub = controller(Arc::new(llm.clone()));

    hub.submit("Cancel my Tuesday cardiology visit").await;

    let calls = llm.calls();
    assert_eq!(calls[1].prompt, "Cancel my Tuesday cardiology visit");
}

#[rstest]
#[case("MedicalRecordsAgent", "patient_records_inquiry", Role::MedicalRecords, false)]
#[case("BillingAndInsuranceAgent", "financial_and_insurance_query", Role::BillingInsurance, true)]
#[case("PatientInformationAgent", "administrative_info_request", Role::PatientInfo, true)]
#[case("AppointmentScheduler", "appointment_logistics_query", Role::AppointmentScheduler, true)]
#[tokio::test]
async fn test_each_capability_reaches_its_role(
    #[case] capability: &str,
    #[case] parameter: &str,
    #[case] role: Role,
    #[case] web_search: bool,
) {
    let mut arguments = serde_json::Map::new();
    arguments.insert(parameter.to_string(), json!("forwarded query"));
    let llm = MockLLMClient::delegating(capability, arguments.into(), "done");
    let hub = controller(Arc::new(llm.clone()));

    assert_eq!(hub.submit("anything").await, TurnOutcome::Delegated { role });
    assert_eq!(hub.status().active_role, Some(role));

    let calls = llm.calls();
    assert_eq!(calls[1].prompt, "forwarded query");
    assert_eq!(calls[1].web_search, Some(web_search));
    assert_eq!(hub.messages()[2].role, Some(role));
}

#[tokio::test]
async fn test_whitespace_submission_appends_nothing() {
    let llm = MockLLMClient::new("unused");
    let hub = controller(Arc::new(llm.clone()));

    let outcome = hub.submit("   \n").await;
    assert_eq!(
        outcome,
        TurnOutcome::Rejected {
            reason: RejectReason::Empty
        }
    );
    assert!(hub.is_empty());
    assert!(llm.calls().is_empty());
}

#[tokio::test]
async fn test_submission_while_in_flight_is_rejected() {
    let llm = Arc::new(BlockingLLMClient::new());
    let entered = llm.entered.clone();
    let release = llm.release.clone();
    let hub = Arc::new(controller(llm));

    let first = {
        let hub = hub.clone();
        tokio::spawn(async move { hub.submit("first").await })
    };
    entered.notified().await;
    assert!(hub.is_processing());
    assert_eq!(hub.status().phase, TurnPhase::Routing);
    assert_eq!(hub.status().active_role, Some(Role::Navigator));

    let second = hub.submit("second").await;
    assert_eq!(
        second,
        TurnOutcome::Rejected {
            reason: RejectReason::Busy
        }
    );
    // Only the first user message so far
    assert_eq!(hub.len(), 1);

    release.notify_one();
    assert_eq!(first.await.unwrap(), TurnOutcome::Direct);
    assert!(!hub.is_processing());
    assert_eq!(hub.len(), 2);
}
