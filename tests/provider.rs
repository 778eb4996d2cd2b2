use std::net::TcpListener;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use betmaster_terminal::chat_client::ChatBackend;
use betmaster_terminal::config::FootballApiConfig;
use betmaster_terminal::conversation::{Conversation, Message};
use betmaster_terminal::error::ChatError;
use betmaster_terminal::football_api::{FixtureClient, mock_fixtures};
use betmaster_terminal::provider::{collect_insight, spawn_provider};
use betmaster_terminal::state::{AppState, Delta, ProviderCommand, apply_delta};

const WAIT: Duration = Duration::from_secs(5);

struct EchoBackend;

impl ChatBackend for EchoBackend {
    fn send_message(
        &self,
        history: &[Message],
        text: &str,
        on_tool_call: &mut dyn FnMut(&str),
    ) -> Result<String, ChatError> {
        on_tool_call("Echo");
        Ok(format!("{} -> {text}", history.len()))
    }
}

fn start() -> (mpsc::Sender<ProviderCommand>, mpsc::Receiver<Delta>) {
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let fixtures = FixtureClient::new(FootballApiConfig::default(), None);
    spawn_provider(tx, cmd_rx, fixtures, Arc::new(EchoBackend));
    (cmd_tx, rx)
}

#[test]
fn chat_turn_reports_status_then_reply() {
    let (cmd_tx, rx) = start();
    let mut conv = Conversation::new();
    let turn = conv.begin_send("Jogos de hoje").expect("turn started");
    cmd_tx.send(ProviderCommand::SendChat(turn)).expect("provider alive");

    match rx.recv_timeout(WAIT).expect("status delta") {
        Delta::ChatStatus(label) => assert_eq!(label, "Echo"),
        other => panic!("unexpected delta: {other:?}"),
    }
    match rx.recv_timeout(WAIT).expect("reply delta") {
        Delta::ChatReply(reply) => assert_eq!(reply, Ok("1 -> Jogos de hoje".to_string())),
        other => panic!("unexpected delta: {other:?}"),
    }
}

#[test]
fn fixtures_without_key_arrive_as_mock() {
    let (cmd_tx, rx) = start();
    let mut state = AppState::new();
    let generation = state.begin_fixtures_request();
    cmd_tx
        .send(ProviderCommand::FetchFixtures {
            date: "2026-10-16".to_string(),
            generation,
        })
        .expect("provider alive");

    loop {
        let delta = rx.recv_timeout(WAIT).expect("fixtures delta");
        let done = matches!(delta, Delta::SetFixtures { .. });
        apply_delta(&mut state, delta);
        if done {
            break;
        }
    }
    assert!(!state.fixtures_loading);
    assert_eq!(state.fixtures.len(), 2);
    assert_eq!(state.fixtures[0].id, 1001);
}

#[test]
fn insight_without_key_reports_missing_key() {
    let client = FixtureClient::new(FootballApiConfig::default(), None);
    let fixture = mock_fixtures().remove(1);
    let insight = collect_insight(&client, &fixture);

    assert_eq!(insight.fixture_id, 1002);
    assert_eq!(insight.title, "Real Madrid vs Barcelona");
    for errors in [
        &insight.h2h.errors,
        &insight.odds.errors,
        &insight.statistics.errors,
        &insight.standings.errors,
    ] {
        assert_eq!(errors, &vec!["No API Key".to_string()]);
    }
}

#[test]
fn insight_without_league_skips_standings() {
    let client = FixtureClient::new(FootballApiConfig::default(), None);
    let mut fixture = mock_fixtures().remove(0);
    fixture.league.season = None;
    let insight = collect_insight(&client, &fixture);
    assert_eq!(
        insight.standings.errors,
        vec!["No league/season for standings".to_string()]
    );
}

#[test]
fn slow_fetch_with_old_key_does_not_replace_newer_list() {
    // Accepts connections through the backlog but never answers.
    let silent = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let base_url = format!("http://{}", silent.local_addr().expect("local addr"));

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let config = FootballApiConfig {
        base_url,
        ..FootballApiConfig::default()
    };
    let fixtures = FixtureClient::new(config, Some("old".to_string()));
    spawn_provider(tx, cmd_rx, fixtures, Arc::new(EchoBackend));

    let mut state = AppState::new();
    let stale = state.begin_fixtures_request();
    cmd_tx
        .send(ProviderCommand::FetchFixtures {
            date: "2026-10-16".to_string(),
            generation: stale,
        })
        .expect("provider alive");

    let current = state.credential_saved(false);
    cmd_tx
        .send(ProviderCommand::SetCredential(None))
        .expect("provider alive");
    cmd_tx
        .send(ProviderCommand::FetchFixtures {
            date: "2026-10-16".to_string(),
            generation: current,
        })
        .expect("provider alive");

    let mut seen = Vec::new();
    while seen.len() < 2 {
        let delta = rx
            .recv_timeout(Duration::from_secs(20))
            .expect("both fixtures replies arrive");
        if let Delta::SetFixtures { generation, .. } = &delta {
            seen.push(*generation);
        }
        apply_delta(&mut state, delta);
    }

    assert_eq!(seen, vec![current, stale]);
    assert!(!state.fixtures_loading);
    let ids: Vec<u64> = state.fixtures.iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1001, 1002]);
    assert!(state.fixtures_errors.is_empty());
    drop(silent);
}
