use std::collections::VecDeque;

use crate::conversation::{Conversation, PendingTurn};
use crate::error::ChatError;
use crate::football_api::{
    ApiResult, Fixture, H2hMeeting, OddsSummary, StandingRow, TeamStatistics,
};
use crate::prompt::analyze_match_prompt;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Fixtures,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Settings,
    Insight,
    Help,
}

/// Head-to-head, odds, statistics and standings for one fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureInsight {
    pub fixture_id: u64,
    pub title: String,
    pub h2h: ApiResult<H2hMeeting>,
    pub odds: ApiResult<OddsSummary>,
    pub statistics: ApiResult<TeamStatistics>,
    pub standings: ApiResult<Vec<StandingRow>>,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub conversation: Conversation,
    pub input: String,
    pub focus: Focus,
    pub overlay: Option<Overlay>,
    pub fixtures: Vec<Fixture>,
    pub fixtures_errors: Vec<String>,
    pub fixtures_loading: bool,
    /// Id of the newest fixtures request; older replies are dropped.
    pub fixtures_generation: u64,
    pub selected: usize,
    pub has_football_key: bool,
    pub settings_input: String,
    pub insight: Option<FixtureInsight>,
    pub insight_loading: bool,
    /// Lines scrolled up from the bottom of the transcript.
    pub transcript_scroll: u16,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            conversation: Conversation::new(),
            input: String::new(),
            focus: Focus::Input,
            overlay: None,
            fixtures: Vec::with_capacity(10),
            fixtures_errors: Vec::new(),
            fixtures_loading: false,
            fixtures_generation: 0,
            selected: 0,
            has_football_key: false,
            settings_input: String::new(),
            insight: None,
            insight_loading: false,
            transcript_scroll: 0,
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Marks a fixtures fetch as pending and returns its generation.
    pub fn begin_fixtures_request(&mut self) -> u64 {
        self.fixtures_generation += 1;
        self.fixtures_loading = true;
        self.fixtures_generation
    }

    /// Records a saved credential and starts the refresh it requires. Without
    /// a key the live list is cleared at once so it never shows as demo data.
    pub fn credential_saved(&mut self, has_key: bool) -> u64 {
        self.has_football_key = has_key;
        if !has_key {
            self.fixtures.clear();
            self.fixtures_errors.clear();
            self.selected = 0;
        }
        self.begin_fixtures_request()
    }

    pub fn selected_fixture(&self) -> Option<&Fixture> {
        self.fixtures.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.fixtures.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.fixtures.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Fixtures,
            Focus::Fixtures => Focus::Input,
        };
    }

    /// Sends the input line. The line is kept when the send is ignored so a
    /// message typed during a pending reply is not lost.
    pub fn submit_input(&mut self) -> Option<PendingTurn> {
        let text = self.input.clone();
        let turn = self.send_text(&text)?;
        self.input.clear();
        Some(turn)
    }

    pub fn send_text(&mut self, text: &str) -> Option<PendingTurn> {
        let turn = self.conversation.begin_send(text)?;
        self.transcript_scroll = 0;
        Some(turn)
    }

    /// Card activation: only fixtures that have not started turn into a prompt.
    pub fn analyze_fixture(&mut self, idx: usize) -> Option<PendingTurn> {
        let fixture = self.fixtures.get(idx)?;
        if !fixture.is_playable() {
            let msg = format!(
                "[INFO] {} vs {} is {}, analysis unavailable",
                fixture.home.name, fixture.away.name, fixture.status_short
            );
            self.push_log(msg);
            return None;
        }
        let prompt = analyze_match_prompt(&fixture.home.name, &fixture.away.name);
        self.send_text(&prompt)
    }

    pub fn analyze_selected(&mut self) -> Option<PendingTurn> {
        self.analyze_fixture(self.selected)
    }

    pub fn open_settings(&mut self, current_key: Option<String>) {
        self.settings_input = current_key.unwrap_or_default();
        self.overlay = Some(Overlay::Settings);
    }

    pub fn close_overlay(&mut self) {
        if self.overlay == Some(Overlay::Settings) {
            self.settings_input.clear();
        }
        self.overlay = None;
    }

    pub fn scroll_transcript_up(&mut self, lines: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(lines);
    }

    pub fn scroll_transcript_down(&mut self, lines: u16) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(lines);
    }
}

#[derive(Debug, Clone)]
pub enum Delta {
    SetFixtures {
        generation: u64,
        result: ApiResult<Fixture>,
    },
    ChatStatus(String),
    ChatReply(Result<String, ChatError>),
    SetInsight(FixtureInsight),
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    SendChat(PendingTurn),
    FetchFixtures { date: String, generation: u64 },
    FetchInsight { fixture: Fixture },
    SetCredential(Option<String>),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetFixtures { generation, result } => {
            if generation < state.fixtures_generation {
                tracing::debug!(
                    generation,
                    current = state.fixtures_generation,
                    "stale fixtures reply dropped"
                );
                return;
            }
            state.fixtures_loading = false;
            if !result.errors.is_empty() {
                state.push_log(format!(
                    "[WARN] Fixtures fetch: {}",
                    result.errors.join("; ")
                ));
            }
            // Wholesale replacement, never merged with the previous list.
            state.fixtures = result.response;
            state.fixtures_errors = result.errors;
            if state.selected >= state.fixtures.len() {
                state.selected = state.fixtures.len().saturating_sub(1);
            }
        }
        Delta::ChatStatus(label) => state.conversation.set_tool_status(&label),
        Delta::ChatReply(outcome) => {
            if let Err(err) = state.conversation.resolve(outcome) {
                state.push_log(format!("[WARN] Dropped chat reply: {err}"));
            }
            state.transcript_scroll = 0;
        }
        Delta::SetInsight(insight) => {
            state.insight_loading = false;
            state.insight = Some(insight);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
