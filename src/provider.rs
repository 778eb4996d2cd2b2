use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::chat_client::ChatBackend;
use crate::conversation::PendingTurn;
use crate::football_api::{ApiResult, Fixture, FixtureClient};
use crate::state::{Delta, FixtureInsight, ProviderCommand};

/// Runs client calls off the UI thread. Each command gets its own worker so
/// a slow chat reply never holds up a fixtures refresh.
pub fn spawn_provider(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    fixtures: FixtureClient,
    chat: Arc<dyn ChatBackend>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut fixtures = fixtures;
        for cmd in cmd_rx {
            match cmd {
                ProviderCommand::SetCredential(credential) => {
                    fixtures = fixtures.with_credential(credential);
                    tracing::info!(
                        has_key = fixtures.has_credential(),
                        "football credential updated"
                    );
                }
                ProviderCommand::FetchFixtures { date, generation } => {
                    let client = fixtures.clone();
                    let tx = tx.clone();
                    thread::spawn(move || {
                        let result = client.fetch_fixtures(&date);
                        tracing::info!(
                            date,
                            generation,
                            count = result.response.len(),
                            "fixtures fetched"
                        );
                        let _ = tx.send(Delta::Log(format!(
                            "[INFO] {} fixtures for {date}",
                            result.response.len()
                        )));
                        let _ = tx.send(Delta::SetFixtures { generation, result });
                    });
                }
                ProviderCommand::FetchInsight { fixture } => {
                    let client = fixtures.clone();
                    let tx = tx.clone();
                    thread::spawn(move || {
                        let insight = collect_insight(&client, &fixture);
                        let _ = tx.send(Delta::SetInsight(insight));
                    });
                }
                ProviderCommand::SendChat(turn) => {
                    let chat = Arc::clone(&chat);
                    let tx = tx.clone();
                    thread::spawn(move || run_chat_turn(chat.as_ref(), turn, &tx));
                }
            }
        }
        tracing::debug!("provider command channel closed");
    })
}

fn run_chat_turn(chat: &dyn ChatBackend, turn: PendingTurn, tx: &Sender<Delta>) {
    let outcome = chat.send_message(&turn.history, &turn.text, &mut |label: &str| {
        let _ = tx.send(Delta::ChatStatus(label.to_string()));
    });
    let _ = tx.send(Delta::ChatReply(outcome));
}

pub fn collect_insight(client: &FixtureClient, fixture: &Fixture) -> FixtureInsight {
    let standings = match (fixture.league.id, fixture.league.season) {
        (Some(league), Some(season)) => client.fetch_standings(league, season),
        _ => ApiResult::failed("No league/season for standings"),
    };
    FixtureInsight {
        fixture_id: fixture.id,
        title: format!("{} vs {}", fixture.home.name, fixture.away.name),
        h2h: client.fetch_h2h(fixture.home.id, fixture.away.id),
        odds: client.fetch_odds(fixture.id),
        statistics: client.fetch_statistics(fixture.id),
        standings,
    }
}
