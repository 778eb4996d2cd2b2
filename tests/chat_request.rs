use chrono::NaiveDate;

use betmaster_terminal::chat_client::{
    ChatBackend, EMPTY_REPLY_FALLBACK, GeminiClient, REQUEST_FAILED_FALLBACK,
    parse_generate_response,
};
use betmaster_terminal::config::ChatConfig;
use betmaster_terminal::conversation::{Message, Role};
use betmaster_terminal::error::ChatError;
use betmaster_terminal::prompt::SEARCH_TOOL_LABEL;

mod support;

fn client_with_key(key: Option<&str>) -> GeminiClient {
    GeminiClient::new(ChatConfig {
        api_key: key.map(str::to_string),
        base_url: "http://127.0.0.1:9".to_string(),
        ..ChatConfig::default()
    })
}

#[test]
fn endpoint_uses_model_name() {
    let client = GeminiClient::new(ChatConfig {
        model: "gemini-test".to_string(),
        ..ChatConfig::default()
    });
    assert_eq!(
        client.endpoint(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-test:generateContent"
    );
}

#[test]
fn request_maps_roles_and_enables_search() {
    let client = client_with_key(Some("k"));
    let history = vec![
        Message::new(Role::Model, "Olá"),
        Message::new(Role::User, "Jogos de hoje"),
        Message::new(Role::Model, "Nenhum jogo"),
    ];
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).expect("valid date");
    let request = client.build_request(&history, "E amanhã?", today);
    let json = serde_json::to_value(&request).expect("request serializes");

    let roles: Vec<&str> = json["contents"]
        .as_array()
        .expect("contents array")
        .iter()
        .map(|c| c["role"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(roles, vec!["model", "user", "model", "user"]);
    assert_eq!(json["contents"][3]["parts"][0]["text"], "E amanhã?");

    assert!(json["tools"][0]["google_search"].is_object());
    let temperature = json["generationConfig"]["temperature"]
        .as_f64()
        .expect("temperature number");
    assert!((temperature - 0.3).abs() < 1e-6);

    let system = json["systemInstruction"]["parts"][0]["text"]
        .as_str()
        .expect("system text");
    assert!(system.contains("Hoje é: sexta-feira, 16 de outubro de 2026."));
}

#[test]
fn missing_key_fails_without_tool_status() {
    let client = client_with_key(None);
    let mut calls = 0;
    let result = client.send_message(&[], "Jogos de hoje", &mut |_: &str| calls += 1);
    assert_eq!(result, Err(ChatError::MissingApiKey));
    assert_eq!(calls, 0);
}

#[test]
fn transport_failure_becomes_fallback_reply() {
    let client = client_with_key(Some("k"));
    let mut labels = Vec::new();
    let result = client.send_message(&[], "Jogos de hoje", &mut |label: &str| {
        labels.push(label.to_string())
    });
    assert_eq!(result, Ok(REQUEST_FAILED_FALLBACK.to_string()));
    assert_eq!(labels, vec![SEARCH_TOOL_LABEL.to_string()]);
}

#[test]
fn parses_candidate_text_and_grounding() {
    let raw = r#"{
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "Real Madrid "}, {"text": "x Barcelona"}]},
            "groundingMetadata": {"groundingChunks": [{"web": {"uri": "https://www.flashscore.com"}}, {"web": {}}]}
        }]
    }"#;
    let reply = parse_generate_response(raw).expect("should parse");
    assert_eq!(reply.text, "Real Madrid x Barcelona");
    assert_eq!(reply.grounding_sources, 2);
}

#[test]
fn no_candidates_is_empty_text() {
    let reply = parse_generate_response(r#"{"candidates": []}"#).expect("should parse");
    assert!(reply.text.is_empty());
    let reply = parse_generate_response("{}").expect("should parse");
    assert!(reply.text.is_empty());
    assert_eq!(reply.grounding_sources, 0);
}

#[test]
fn invalid_response_json_is_an_error() {
    assert!(parse_generate_response("<html>").is_err());
}

#[test]
fn empty_reply_fallback_is_portuguese() {
    assert!(EMPTY_REPLY_FALLBACK.starts_with("Não consegui"));
}

fn client_at(base_url: &str) -> GeminiClient {
    GeminiClient::new(ChatConfig {
        api_key: Some("k".to_string()),
        base_url: base_url.to_string(),
        ..ChatConfig::default()
    })
}

#[test]
fn served_reply_is_returned_verbatim() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"Real Madrid x Barcelona"}]}}]}"#;
    let client = client_at(&support::serve_once("200 OK", body));
    let result = client.send_message(&[], "Jogos de hoje", &mut |_: &str| {});
    assert_eq!(result, Ok("Real Madrid x Barcelona".to_string()));
}

#[test]
fn whitespace_reply_is_not_replaced() {
    let body = r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#;
    let client = client_at(&support::serve_once("200 OK", body));
    let result = client.send_message(&[], "Jogos de hoje", &mut |_: &str| {});
    assert_eq!(result, Ok("  ".to_string()));
}

#[test]
fn empty_reply_uses_fallback() {
    let client = client_at(&support::serve_once("200 OK", r#"{"candidates":[]}"#));
    let result = client.send_message(&[], "Jogos de hoje", &mut |_: &str| {});
    assert_eq!(result, Ok(EMPTY_REPLY_FALLBACK.to_string()));
}

#[test]
fn server_error_uses_request_failed_fallback() {
    let client = client_at(&support::serve_once("503 Service Unavailable", "{}"));
    let result = client.send_message(&[], "Jogos de hoje", &mut |_: &str| {});
    assert_eq!(result, Ok(REQUEST_FAILED_FALLBACK.to_string()));
}
