use super::*;
use crate::connector::{
    ConnectorConfig, MockTransport, RetryConfig, Status, Transport, TransportError,
    TransportResponse,
};
use crate::error::Error;
use crate::task::{AgentDirectory, AgentRole};
use serde_json::{json, Value};
use std::time::Duration;

const DATA_URL: &str = "http://data.test";
const SUPPORT_URL: &str = "http://support.test";

fn builder() -> TaskBuilder {
    TaskBuilder::new(
        AgentDirectory::new()
            .with_endpoint(AgentRole::CustomerData, DATA_URL)
            .with_endpoint(AgentRole::Support, SUPPORT_URL),
    )
}

fn connector(transport: impl Transport + 'static) -> Arc<AgentConnector> {
    let config = ConnectorConfig {
        retry: RetryConfig::new()
            .with_max_attempts(2)
            .with_base_delay(Duration::from_millis(10)),
        timeout: Duration::from_secs(2),
        tools_url: "http://tools.test".to_string(),
    };
    Arc::new(AgentConnector::with_transport(Arc::new(transport), config))
}

/// Answers like a handler agent: one `{status, intent}` item per intent
fn echo_reply(body: &Value) -> TransportResponse {
    let intent = body["intent"].as_str().unwrap_or_default().to_string();
    let reply = json!({
        "message_id": "reply",
        "from": body["to"],
        "to": body["from"],
        "type": "response",
        "intent": [intent],
        "payload": [{"status": "ok", "handled": intent, "payload": body["payload"]}],
        "correlation_id": body["correlation_id"],
    });
    TransportResponse::new(200, reply.to_string())
}

struct Delayed;

#[async_trait::async_trait]
impl Transport for Delayed {
    async fn post_json(
        &self,
        _url: &str,
        body: &Value,
        _timeout: Duration,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let delay = match body["intent"].as_str() {
            Some("get_customer_info") => 300,
            Some("get_customer_history") => 200,
            _ => 10,
        };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(echo_reply(body))
    }
}

#[tokio::test]
async fn test_missing_text_never_reaches_transport() {
    let mut transport = MockTransport::new();
    transport.expect_post_json().never();

    let orchestrator = Orchestrator::new(builder(), connector(transport));
    let result = orchestrator
        .handle_query(QueryRequest {
            text: Some(String::new()),
            customer_id: Some(1),
        })
        .await;

    assert!(matches!(result, Err(Error::MissingField(field)) if field == "text"));
}

#[tokio::test]
async fn test_update_email_query() {
    let mut transport = MockTransport::new();
    transport
        .expect_post_json()
        .times(1)
        .returning(|url, body, _| {
            assert_eq!(url, "http://data.test/a2a");
            assert_eq!(body["from"], "router");
            assert_eq!(body["to"], "customer_data_agent");
            assert_eq!(
                body["payload"],
                json!({"customer_id": 1, "updates": {"email": "new@email.com"}})
            );
            Ok(echo_reply(body))
        });

    let orchestrator = Orchestrator::new(builder(), connector(transport));
    let response = orchestrator
        .handle_query(QueryRequest::new("Update my email to new@email.com", 1))
        .await
        .unwrap();

    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.results.len(), 1);
    let outcome = &response.results[0];
    assert_eq!(outcome.intent, "update_email");
    assert_eq!(outcome.status, Status::Ok);
    assert!(outcome.requires_escalation);
    assert_eq!(outcome.data["handled"], "update_email");
}

#[tokio::test(start_paused = true)]
async fn test_outcomes_keep_submission_order() {
    let orchestrator = Orchestrator::new(builder(), connector(Delayed));
    let ctx = QueryContext::new(9, "irrelevant");
    let tasks: Vec<Task> = ["get_customer_info", "get_customer_history", "refund_request"]
        .iter()
        .map(|intent| builder().build(intent, &ctx).unwrap())
        .collect();

    let start = tokio::time::Instant::now();
    let outcomes = orchestrator.dispatch(tasks).await;

    let intents: Vec<&str> = outcomes.iter().map(|o| o.intent.as_str()).collect();
    assert_eq!(
        intents,
        vec!["get_customer_info", "get_customer_history", "refund_request"]
    );
    assert!(outcomes.iter().all(Outcome::is_ok));
    // branches overlap: total is the slowest branch, not the sum
    assert!(start.elapsed() < Duration::from_millis(500));
}

#[tokio::test(start_paused = true)]
async fn test_failing_branch_does_not_abort_siblings() {
    let mut transport = MockTransport::new();
    transport.expect_post_json().returning(|url, body, _| {
        if url.starts_with(SUPPORT_URL) {
            Err(TransportError::Connect("refused".to_string()))
        } else {
            Ok(echo_reply(body))
        }
    });

    let orchestrator = Orchestrator::new(builder(), connector(transport));
    let response = orchestrator
        .handle_query(QueryRequest::new(
            "Show my details, then refund me and show my history",
            4,
        ))
        .await
        .unwrap();

    let summary: Vec<(&str, Status)> = response
        .results
        .iter()
        .map(|o| (o.intent.as_str(), o.status))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("get_customer_info", Status::Ok),
            ("get_customer_history", Status::Ok),
            ("refund_request", Status::Error),
        ]
    );
    assert_eq!(response.results[2].data, json!("attempts exhausted"));
    assert!(response.results[2].requires_escalation);
}

#[tokio::test]
async fn test_unconfigured_agent_becomes_error_outcome() {
    let mut transport = MockTransport::new();
    transport
        .expect_post_json()
        .times(1)
        .returning(|_, body, _| Ok(echo_reply(body)));

    let builder =
        TaskBuilder::new(AgentDirectory::new().with_endpoint(AgentRole::Support, SUPPORT_URL));
    let orchestrator = Orchestrator::new(builder, connector(transport));
    let response = orchestrator
        .handle_query(QueryRequest::new("ticket history, cancel it", 2))
        .await
        .unwrap();

    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].intent, "get_customer_history");
    assert_eq!(response.results[0].status, Status::Error);
    assert_eq!(response.results[1].intent, "cancel_subscription");
    assert_eq!(response.results[1].status, Status::Ok);
}

#[tokio::test]
async fn test_panicking_branch_is_contained() {
    struct Flaky;

    #[async_trait::async_trait]
    impl Transport for Flaky {
        async fn post_json(
            &self,
            _url: &str,
            body: &Value,
            _timeout: Duration,
        ) -> std::result::Result<TransportResponse, TransportError> {
            if body["intent"] == "cancel_subscription" {
                panic!("transport bug");
            }
            Ok(echo_reply(body))
        }
    }

    let orchestrator = Orchestrator::new(builder(), connector(Flaky));
    let response = orchestrator
        .handle_query(QueryRequest::new("refund and cancel", 3))
        .await
        .unwrap();

    assert_eq!(response.results[0].status, Status::Ok);
    assert_eq!(response.results[1].status, Status::Error);
    assert!(response.results[1]
        .data
        .as_str()
        .unwrap()
        .starts_with("branch aborted"));
}

#[tokio::test]
async fn test_custom_classifier() {
    struct Fixed;

    impl IntentClassifier for Fixed {
        fn classify(&self, _text: &str) -> Vec<String> {
            vec!["list_customers".to_string()]
        }
    }

    let mut transport = MockTransport::new();
    transport.expect_post_json().times(1).returning(|_, body, _| {
        assert_eq!(body["payload"]["status"], "active");
        Ok(echo_reply(body))
    });

    let orchestrator = Orchestrator::new(builder(), connector(transport))
        .with_classifier(Arc::new(Fixed))
        .with_agent_id("front_desk");
    let response = orchestrator
        .handle_query(QueryRequest::new("anything", 1))
        .await
        .unwrap();

    assert_eq!(orchestrator.agent_id(), "front_desk");
    assert_eq!(response.results[0].intent, "list_customers");
}
