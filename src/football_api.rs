use anyhow::{Context, Result};
use chrono::{Datelike, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::config::FootballApiConfig;
use crate::http_client::http_client;

pub const MAX_FIXTURES: usize = 10;
pub const MAX_H2H_MEETINGS: usize = 5;
/// Match Winner, Goals Over/Under, Both Teams Score, Double Chance.
pub const ODDS_MARKET_IDS: [u32; 4] = [1, 5, 8, 13];

const KEY_HEADER: &str = "x-rapidapi-key";
const HOST_HEADER: &str = "x-rapidapi-host";
const FETCH_FAILED: &str = "Fetch failed";
const NO_API_KEY: &str = "No API Key";

/// Result envelope shared by every fixture-client call. An empty `response`
/// with non-empty `errors` is the failure signal; nothing here returns `Err`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    pub response: Vec<T>,
    pub errors: Vec<String>,
}

impl<T> ApiResult<T> {
    pub fn ok(response: Vec<T>) -> Self {
        Self {
            response,
            errors: Vec::new(),
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            response: Vec::new(),
            errors: vec![msg.into()],
        }
    }

    pub fn is_failure(&self) -> bool {
        self.response.is_empty() && !self.errors.is_empty()
    }
}

impl<T> Default for ApiResult<T> {
    fn default() -> Self {
        Self::ok(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub id: u64,
    pub kickoff: String,
    pub status_short: String,
    pub status_long: String,
    pub league: LeagueInfo,
    pub home: TeamRef,
    pub away: TeamRef,
    pub score: Option<(u32, u32)>,
}

impl Fixture {
    /// Only matches that have not kicked off can be analysed.
    pub fn is_playable(&self) -> bool {
        matches!(self.status_short.as_str(), "NS" | "TBD")
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status_short.as_str(), "FT" | "AET" | "PEN")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueInfo {
    pub id: Option<u32>,
    pub name: String,
    pub country: String,
    pub flag: Option<String>,
    pub season: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandingRow {
    pub rank: u32,
    pub team: String,
    pub points: i32,
    pub goals_diff: i32,
    pub form: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct H2hMeeting {
    pub date: String,
    pub league: String,
    pub home: String,
    pub away: String,
    pub score: Option<(u32, u32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsSummary {
    pub fixture_id: u64,
    pub bookmaker: String,
    pub bets: Vec<OddsBet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsBet {
    pub id: u32,
    pub name: String,
    pub values: Vec<OddsValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsValue {
    pub value: String,
    pub odd: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStatistics {
    pub team: String,
    pub stats: Vec<StatValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatValue {
    pub name: String,
    pub value: String,
}

/// Client for API-Football v3. The credential is injected, so callers
/// rebuild the client when the stored key changes.
#[derive(Debug, Clone)]
pub struct FixtureClient {
    config: FootballApiConfig,
    credential: Option<String>,
}

impl FixtureClient {
    pub fn new(config: FootballApiConfig, credential: Option<String>) -> Self {
        let credential = credential
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self { config, credential }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn with_credential(&self, credential: Option<String>) -> Self {
        Self::new(self.config.clone(), credential)
    }

    pub fn fetch_fixtures(&self, date: &str) -> ApiResult<Fixture> {
        if self.credential.is_none() {
            tracing::warn!("no football api key configured, returning mock fixtures");
            return ApiResult::ok(mock_fixtures());
        }
        let query = [("date", date.to_string())];
        self.fetch_mapped("/fixtures", &query, parse_fixtures_json)
    }

    pub fn fetch_standings(&self, league: u32, season: u32) -> ApiResult<Vec<StandingRow>> {
        if self.credential.is_none() {
            return ApiResult::failed(NO_API_KEY);
        }
        let query = [("league", league.to_string()), ("season", season.to_string())];
        self.fetch_mapped("/standings", &query, parse_standings_json)
    }

    pub fn fetch_h2h(&self, team1: u32, team2: u32) -> ApiResult<H2hMeeting> {
        if self.credential.is_none() {
            return ApiResult::failed(NO_API_KEY);
        }
        let query = [("h2h", format!("{team1}-{team2}"))];
        self.fetch_mapped("/fixtures/headtohead", &query, parse_h2h_json)
    }

    pub fn fetch_odds(&self, fixture_id: u64) -> ApiResult<OddsSummary> {
        if self.credential.is_none() {
            return ApiResult::failed(NO_API_KEY);
        }
        let query = [("fixture", fixture_id.to_string())];
        self.fetch_mapped("/odds", &query, |body| {
            parse_odds_json(body, fixture_id)
        })
    }

    pub fn fetch_statistics(&self, fixture_id: u64) -> ApiResult<TeamStatistics> {
        if self.credential.is_none() {
            return ApiResult::failed(NO_API_KEY);
        }
        let query = [("fixture", fixture_id.to_string())];
        self.fetch_mapped(
            "/fixtures/statistics",
            &query,
            parse_statistics_json,
        )
    }

    fn fetch_mapped<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        map: impl FnOnce(&str) -> Result<ApiResult<T>>,
    ) -> ApiResult<T> {
        match self.get_body(path, query).and_then(|body| map(&body)) {
            Ok(result) => {
                if !result.errors.is_empty() {
                    tracing::warn!(path, errors = ?result.errors, "football api reported errors");
                }
                result
            }
            Err(err) => {
                tracing::error!(path, "football api fetch error: {err:#}");
                ApiResult::failed(FETCH_FAILED)
            }
        }
    }

    fn get_body(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let key = self.credential.as_deref().unwrap_or_default();
        let client = http_client()?;
        let url = format!("{}{path}", self.config.base_url);
        tracing::debug!(url, ?query, "football api request");

        let resp = client
            .get(&url)
            .query(query)
            .header(KEY_HEADER, key)
            .header(HOST_HEADER, self.config.host.as_str())
            .send()
            .context("football request failed")?;
        let status = resp.status();
        let body = resp.text().context("failed reading football body")?;
        if !status.is_success() {
            let snippet = body
                .trim()
                .replace(['\n', '\r'], " ")
                .chars()
                .take(220)
                .collect::<String>();
            return Err(anyhow::anyhow!("football http {}: {}", status, snippet));
        }
        Ok(body)
    }
}

/// The two demo fixtures shown when no API-Football key is configured.
pub fn mock_fixtures() -> Vec<Fixture> {
    let kickoff = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let season = Some(Utc::now().year() as u32);
    vec![
        Fixture {
            id: 1001,
            kickoff: kickoff.clone(),
            status_short: "NS".to_string(),
            status_long: "Not Started".to_string(),
            league: LeagueInfo {
                id: Some(39),
                name: "Premier League".to_string(),
                country: "England".to_string(),
                flag: Some("https://media.api-sports.io/flags/gb.svg".to_string()),
                season,
            },
            home: mock_team(33, "Manchester United"),
            away: mock_team(34, "Newcastle"),
            score: None,
        },
        Fixture {
            id: 1002,
            kickoff,
            status_short: "NS".to_string(),
            status_long: "Not Started".to_string(),
            league: LeagueInfo {
                id: Some(140),
                name: "La Liga".to_string(),
                country: "Spain".to_string(),
                flag: Some("https://media.api-sports.io/flags/es.svg".to_string()),
                season,
            },
            home: mock_team(541, "Real Madrid"),
            away: mock_team(529, "Barcelona"),
            score: None,
        },
    ]
}

fn mock_team(id: u32, name: &str) -> TeamRef {
    TeamRef {
        id,
        name: name.to_string(),
        logo: Some(format!("https://media.api-sports.io/football/teams/{id}.png")),
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    errors: Value,
    #[serde(default = "Vec::new")]
    response: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ApiFixtureItem {
    fixture: ApiFixture,
    league: ApiLeague,
    teams: ApiTeams,
    #[serde(default)]
    goals: ApiGoals,
}

#[derive(Debug, Deserialize)]
struct ApiFixture {
    id: u64,
    #[serde(default)]
    date: String,
    status: ApiStatus,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    short: String,
    #[serde(default)]
    long: String,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    flag: Option<String>,
    #[serde(default)]
    season: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiTeams {
    home: ApiTeam,
    away: ApiTeam,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    #[serde(default)]
    id: u32,
    name: String,
    #[serde(default)]
    logo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiGoals {
    home: Option<u32>,
    away: Option<u32>,
}

impl ApiGoals {
    fn pair(&self) -> Option<(u32, u32)> {
        Some((self.home?, self.away?))
    }
}

#[derive(Debug, Deserialize)]
struct ApiStandingsItem {
    league: ApiStandingsLeague,
}

#[derive(Debug, Deserialize)]
struct ApiStandingsLeague {
    #[serde(default)]
    standings: Vec<Vec<ApiStanding>>,
}

#[derive(Debug, Deserialize)]
struct ApiStanding {
    rank: u32,
    team: ApiNamed,
    #[serde(default)]
    points: i32,
    #[serde(rename = "goalsDiff", default)]
    goals_diff: i32,
    #[serde(default)]
    form: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiOddsItem {
    #[serde(default)]
    bookmakers: Vec<ApiBookmaker>,
}

#[derive(Debug, Deserialize)]
struct ApiBookmaker {
    name: String,
    #[serde(default)]
    bets: Vec<ApiBet>,
}

#[derive(Debug, Deserialize)]
struct ApiBet {
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default)]
    values: Vec<ApiBetValue>,
}

#[derive(Debug, Deserialize)]
struct ApiBetValue {
    value: Value,
    odd: Value,
}

#[derive(Debug, Deserialize)]
struct ApiStatisticsItem {
    team: ApiNamed,
    #[serde(default)]
    statistics: Vec<ApiStatistic>,
}

#[derive(Debug, Deserialize)]
struct ApiStatistic {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    value: Value,
}

pub fn parse_fixtures_json(raw: &str) -> Result<ApiResult<Fixture>> {
    let envelope: Envelope<ApiFixtureItem> = parse_envelope(raw, "fixtures")?;
    let response: Vec<Fixture> = envelope
        .response
        .into_iter()
        .take(MAX_FIXTURES)
        .map(|item| Fixture {
            id: item.fixture.id,
            kickoff: item.fixture.date,
            status_short: item.fixture.status.short,
            status_long: item.fixture.status.long,
            league: LeagueInfo {
                id: item.league.id,
                name: item.league.name,
                country: item.league.country.unwrap_or_default(),
                flag: item.league.flag,
                season: item.league.season,
            },
            home: team_ref(item.teams.home),
            away: team_ref(item.teams.away),
            score: item.goals.pair(),
        })
        .collect();
    Ok(ApiResult {
        response,
        errors: upstream_errors(&envelope.errors),
    })
}

pub fn parse_standings_json(raw: &str) -> Result<ApiResult<Vec<StandingRow>>> {
    let envelope: Envelope<ApiStandingsItem> = parse_envelope(raw, "standings")?;
    let response: Vec<Vec<StandingRow>> = envelope
        .response
        .into_iter()
        .next()
        .map(|item| {
            item.league
                .standings
                .into_iter()
                .map(|group| {
                    group
                        .into_iter()
                        .map(|row| StandingRow {
                            rank: row.rank,
                            team: row.team.name,
                            points: row.points,
                            goals_diff: row.goals_diff,
                            form: row.form,
                        })
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(ApiResult {
        response,
        errors: upstream_errors(&envelope.errors),
    })
}

pub fn parse_h2h_json(raw: &str) -> Result<ApiResult<H2hMeeting>> {
    let envelope: Envelope<ApiFixtureItem> = parse_envelope(raw, "headtohead")?;
    let response: Vec<H2hMeeting> = envelope
        .response
        .into_iter()
        .take(MAX_H2H_MEETINGS)
        .map(|item| H2hMeeting {
            date: item.fixture.date,
            league: item.league.name,
            home: item.teams.home.name,
            away: item.teams.away.name,
            score: item.goals.pair(),
        })
        .collect();
    Ok(ApiResult {
        response,
        errors: upstream_errors(&envelope.errors),
    })
}

pub fn parse_odds_json(raw: &str, fixture_id: u64) -> Result<ApiResult<OddsSummary>> {
    let envelope: Envelope<ApiOddsItem> = parse_envelope(raw, "odds")?;
    let errors = upstream_errors(&envelope.errors);
    let bookmaker = envelope
        .response
        .into_iter()
        .next()
        .and_then(|item| item.bookmakers.into_iter().next());
    let Some(bookmaker) = bookmaker else {
        return Ok(ApiResult {
            response: Vec::new(),
            errors,
        });
    };

    let bets: Vec<OddsBet> = bookmaker
        .bets
        .into_iter()
        .filter(|bet| ODDS_MARKET_IDS.contains(&bet.id))
        .map(|bet| OddsBet {
            id: bet.id,
            name: bet.name,
            values: bet
                .values
                .into_iter()
                .map(|v| OddsValue {
                    value: value_text(&v.value),
                    odd: value_text(&v.odd),
                })
                .collect(),
        })
        .collect();

    Ok(ApiResult {
        response: vec![OddsSummary {
            fixture_id,
            bookmaker: bookmaker.name,
            bets,
        }],
        errors,
    })
}

pub fn parse_statistics_json(raw: &str) -> Result<ApiResult<TeamStatistics>> {
    let envelope: Envelope<ApiStatisticsItem> = parse_envelope(raw, "statistics")?;
    let response: Vec<TeamStatistics> = envelope
        .response
        .into_iter()
        .map(|item| TeamStatistics {
            team: item.team.name,
            stats: item
                .statistics
                .into_iter()
                .map(|stat| StatValue {
                    name: stat.kind,
                    value: value_text(&stat.value),
                })
                .collect(),
        })
        .collect();
    Ok(ApiResult {
        response,
        errors: upstream_errors(&envelope.errors),
    })
}

fn parse_envelope<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> Result<Envelope<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty {what} body"));
    }
    serde_json::from_str(trimmed).with_context(|| format!("invalid {what} json"))
}

fn team_ref(team: ApiTeam) -> TeamRef {
    TeamRef {
        id: team.id,
        name: team.name,
        logo: team.logo,
    }
}

/// API-Football reports request errors in the body as either an array or an
/// object keyed by field.
fn upstream_errors(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(value_text).collect(),
        Value::Object(map) => map
            .iter()
            .map(|(key, msg)| format!("{key}: {}", value_text(msg)))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![value_text(other)],
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_errors_accepts_object_and_array() {
        let obj: Value = serde_json::json!({"token": "Error/Missing application key"});
        assert_eq!(
            upstream_errors(&obj),
            vec!["token: Error/Missing application key".to_string()]
        );
        let arr: Value = serde_json::json!([]);
        assert!(upstream_errors(&arr).is_empty());
    }

    #[test]
    fn value_text_renders_null_as_dash() {
        assert_eq!(value_text(&Value::Null), "-");
        assert_eq!(value_text(&serde_json::json!(12)), "12");
        assert_eq!(value_text(&serde_json::json!("55%")), "55%");
    }
}
