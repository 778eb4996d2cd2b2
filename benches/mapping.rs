use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use betmaster_terminal::chat_client::GeminiClient;
use betmaster_terminal::config::ChatConfig;
use betmaster_terminal::conversation::{Message, Role};
use betmaster_terminal::football_api::{
    parse_fixtures_json, parse_h2h_json, parse_odds_json, parse_standings_json,
    parse_statistics_json,
};

fn bench_fixtures_parse(c: &mut Criterion) {
    c.bench_function("fixtures_parse", |b| {
        b.iter(|| {
            let result = parse_fixtures_json(black_box(FIXTURES_JSON)).unwrap();
            black_box(result.response.len());
        })
    });
}

fn bench_odds_parse(c: &mut Criterion) {
    c.bench_function("odds_parse", |b| {
        b.iter(|| {
            let result = parse_odds_json(black_box(ODDS_JSON), 2002).unwrap();
            black_box(result.response.len());
        })
    });
}

fn bench_insight_parse(c: &mut Criterion) {
    c.bench_function("insight_parse", |b| {
        b.iter(|| {
            let h2h = parse_h2h_json(black_box(H2H_JSON)).unwrap();
            let stats = parse_statistics_json(black_box(STATISTICS_JSON)).unwrap();
            let table = parse_standings_json(black_box(STANDINGS_JSON)).unwrap();
            black_box((h2h.response.len(), stats.response.len(), table.response.len()));
        })
    });
}

fn bench_chat_request_build(c: &mut Criterion) {
    let client = GeminiClient::new(ChatConfig::default());
    let history: Vec<Message> = (0..40)
        .map(|i| {
            let role = if i % 2 == 0 { Role::User } else { Role::Model };
            Message::new(role, format!("mensagem {i} sobre Real Madrid x Barcelona"))
        })
        .collect();
    let today = chrono::NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    c.bench_function("chat_request_build", |b| {
        b.iter(|| {
            let request = client.build_request(black_box(&history), "Jogos de hoje", today);
            let body = serde_json::to_string(&request).unwrap();
            black_box(body.len());
        })
    });
}

criterion_group!(
    mapping,
    bench_fixtures_parse,
    bench_odds_parse,
    bench_insight_parse,
    bench_chat_request_build
);
criterion_main!(mapping);

static FIXTURES_JSON: &str = include_str!("../tests/fixtures/fixtures.json");
static ODDS_JSON: &str = include_str!("../tests/fixtures/odds.json");
static H2H_JSON: &str = include_str!("../tests/fixtures/h2h.json");
static STATISTICS_JSON: &str = include_str!("../tests/fixtures/statistics.json");
static STANDINGS_JSON: &str = include_str!("../tests/fixtures/standings.json");
