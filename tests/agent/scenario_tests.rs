// End-to-end question scenarios through the ask service
//
// The language model is scripted; the database is an in-memory shop.

#[path = "../support/mod.rs"]
mod support;

use askdb_core::AnswerStatus;
use askdb_core::application::service::AskRequest;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use support::{ScriptedProvider, ShopDatabase, agent_settings, build_service};

#[tokio::test]
async fn counts_customers_in_three_tool_calls() {
    let provider = ScriptedProvider::new(vec![
        r#"{"action":"call_tool","tool":"list_tables","input":{}}"#,
        r#"{"action":"call_tool","tool":"get_schema","input":{"table_names":["customers"]}}"#,
        r#"```json
{"action":"call_tool","tool":"run_query","input":{"sql":"SELECT COUNT(*) FROM customers"}}
```"#,
        r#"{"action":"final","response":"There are 42 customers in the database."}"#,
    ]);
    let database = Arc::new(ShopDatabase::with_customers(42));
    let service = build_service(provider.clone(), database.clone(), agent_settings());

    let answer = service
        .ask(AskRequest::new("How many customers are in the database?"))
        .await;

    assert_eq!(answer.status, AnswerStatus::Answered);
    assert!(answer.answer.contains("42"));
    let tools: Vec<&str> = answer.steps.iter().map(|step| step.tool.as_str()).collect();
    assert_eq!(tools, ["list_tables", "get_schema", "run_query"]);
    assert_eq!(answer.steps[1].input, json!({"table_names": ["customers"]}));
    assert_eq!(answer.steps[2].output["rows"], json!([[42]]));
    assert_eq!(database.executed(), ["SELECT COUNT(*) FROM customers"]);
    assert_eq!(provider.requests().await.len(), 4);
}

#[tokio::test]
async fn delete_request_asks_for_clarification() {
    let provider = ScriptedProvider::new(vec![
        r#"{"action":"call_tool","tool":"run_query","input":{"sql":"DELETE FROM customers"}}"#,
    ]);
    let database = Arc::new(ShopDatabase::with_customers(7));
    let service = build_service(provider, database.clone(), agent_settings());

    let answer = service.ask(AskRequest::new("Delete all customers")).await;

    assert_eq!(answer.status, AnswerStatus::Clarification);
    assert!(answer.steps.is_empty());
    assert!(database.executed().is_empty());
}

#[tokio::test]
async fn model_may_clarify_on_its_own() {
    let provider = ScriptedProvider::new(vec![
        r#"{"action":"clarify","question":"Do you mean active customers or all customers?"}"#,
    ]);
    let service = build_service(
        provider,
        Arc::new(ShopDatabase::with_customers(7)),
        agent_settings(),
    );

    let answer = service.ask(AskRequest::new("How many customers?")).await;

    assert_eq!(answer.status, AnswerStatus::Clarification);
    assert!(answer.answer.contains("active customers"));
}

#[tokio::test]
async fn clear_memory_forgets_without_calling_the_model() {
    let provider = ScriptedProvider::new(vec![
        r#"{"action":"final","response":"Nice to meet you, Dana."}"#,
        r#"{"action":"final","response":"I don't know your name."}"#,
    ]);
    let service = build_service(
        provider.clone(),
        Arc::new(ShopDatabase::with_customers(7)),
        agent_settings(),
    );

    service
        .ask(AskRequest::new("My name is Dana").in_session("s-1"))
        .await;
    let cleared = service
        .ask(AskRequest::new("clear memory").in_session("s-1"))
        .await;
    assert_eq!(cleared.status, AnswerStatus::MemoryCleared);
    assert_eq!(provider.requests().await.len(), 1);

    let again = service
        .ask(AskRequest::new("Please clear memory").in_session("s-1"))
        .await;
    assert_eq!(again.status, AnswerStatus::MemoryCleared);

    service
        .ask(AskRequest::new("What is my name?").in_session("s-1"))
        .await;
    let requests = provider.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(
        !requests[1]
            .messages
            .iter()
            .any(|msg| msg.content.contains("Dana"))
    );
}

#[tokio::test]
async fn follow_up_questions_see_earlier_turns() {
    let provider = ScriptedProvider::new(vec![
        r#"{"action":"call_tool","tool":"run_query","input":{"sql":"SELECT COUNT(*) FROM customers"}}"#,
        r#"{"action":"final","response":"There are 7 customers."}"#,
        r#"{"action":"final","response":"I counted them with SELECT COUNT(*) FROM customers."}"#,
    ]);
    let service = build_service(
        provider.clone(),
        Arc::new(ShopDatabase::with_customers(7)),
        agent_settings(),
    );

    let first = service.ask(AskRequest::new("How many customers?")).await;
    let second = service
        .ask(AskRequest::new("How did you count them?").in_session(first.session_id.clone()))
        .await;

    assert_eq!(second.session_id, first.session_id);
    let requests = provider.requests().await;
    let replay = &requests[2].messages;
    assert!(replay.iter().any(|msg| msg.content.contains("tool_result")));
    assert!(replay.iter().any(|msg| msg.content == "How many customers?"));
}

#[tokio::test]
async fn runaway_tool_calls_end_incomplete() {
    let call = r#"{"action":"call_tool","tool":"list_tables","input":{}}"#;
    let provider = ScriptedProvider::new(vec![call; 6]);
    let mut settings = agent_settings();
    settings.max_steps = 3;
    let service = build_service(provider, Arc::new(ShopDatabase::with_customers(7)), settings);

    let answer = service.ask(AskRequest::new("Keep looking")).await;

    assert_eq!(answer.status, AnswerStatus::Incomplete);
    assert_eq!(answer.steps.len(), 3);
}

#[tokio::test]
async fn unreachable_model_fails_after_retries() {
    let provider = ScriptedProvider::new(vec![]);
    let service = build_service(
        provider.clone(),
        Arc::new(ShopDatabase::with_customers(7)),
        agent_settings(),
    );

    let answer = service.ask(AskRequest::new("How many customers?")).await;

    assert_eq!(answer.status, AnswerStatus::Failed);
    assert_eq!(provider.requests().await.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_model_times_out() {
    let provider = ScriptedProvider::slow(
        vec![r#"{"action":"final","response":"Too late"}"#],
        Duration::from_secs(120),
    );
    let service = build_service(
        provider,
        Arc::new(ShopDatabase::with_customers(7)),
        agent_settings(),
    );

    let answer = service
        .ask(AskRequest::new("How many customers?").in_session("slow"))
        .await;

    assert_eq!(answer.status, AnswerStatus::Timeout);
    let conversation = service.store().session("slow").await;
    assert_eq!(conversation.lock().await.len(), 2);
}
