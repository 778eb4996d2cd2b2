use std::io;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use betmaster_terminal::chat_client::{ChatBackend, GeminiClient};
use betmaster_terminal::config::AppConfig;
use betmaster_terminal::conversation::{PendingTurn, Role};
use betmaster_terminal::error::ChatError;
use betmaster_terminal::football_api::{ApiResult, Fixture, FixtureClient};
use betmaster_terminal::key_store::{self, KeyStore};
use betmaster_terminal::logging;
use betmaster_terminal::provider;
use betmaster_terminal::state::{
    AppState, Delta, FixtureInsight, Focus, Overlay, ProviderCommand, apply_delta,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];
const INPUT_PLACEHOLDER: &str = "Pergunte: 'Jogos de hoje' ou 'Palpite Real x Barça'";

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    key_store: Box<dyn KeyStore>,
    config: AppConfig,
    tick: usize,
}

impl App {
    fn new(
        cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
        key_store: Box<dyn KeyStore>,
        config: AppConfig,
    ) -> Self {
        let mut state = AppState::new();
        state.has_football_key = key_store.get().is_some();
        Self {
            state,
            should_quit: false,
            cmd_tx,
            key_store,
            config,
            tick: 0,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.state.overlay {
            Some(Overlay::Settings) => {
                self.on_settings_key(key);
                return;
            }
            Some(Overlay::Insight) | Some(Overlay::Help) => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?')
                ) {
                    self.state.close_overlay();
                }
                return;
            }
            None => {}
        }

        match key.code {
            KeyCode::F(2) => self.open_settings(),
            KeyCode::Tab => self.state.toggle_focus(),
            KeyCode::PageUp => self.state.scroll_transcript_up(5),
            KeyCode::PageDown => self.state.scroll_transcript_down(5),
            _ => match self.state.focus {
                Focus::Input => self.on_input_key(key),
                Focus::Fixtures => self.on_fixtures_key(key),
            },
        }
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                if let Some(turn) = self.state.submit_input() {
                    self.dispatch_turn(turn);
                }
            }
            KeyCode::Backspace => {
                self.state.input.pop();
            }
            KeyCode::Esc => self.state.focus = Focus::Fixtures,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.input.push(c);
            }
            _ => {}
        }
    }

    fn on_fixtures_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => {
                if let Some(turn) = self.state.analyze_selected() {
                    self.state.focus = Focus::Input;
                    self.dispatch_turn(turn);
                }
            }
            KeyCode::Char('i') => self.request_insight(),
            KeyCode::Char('r') => self.request_fixtures(true),
            KeyCode::Char('s') => self.open_settings(),
            KeyCode::Char('?') => self.state.overlay = Some(Overlay::Help),
            KeyCode::Esc => self.state.focus = Focus::Input,
            _ => {}
        }
    }

    fn on_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.close_overlay(),
            KeyCode::Enter => self.save_settings(),
            KeyCode::Backspace => {
                self.state.settings_input.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.settings_input.push(c);
            }
            _ => {}
        }
    }

    fn open_settings(&mut self) {
        let current = self.key_store.get();
        self.state.open_settings(current);
    }

    fn save_settings(&mut self) {
        let value = self.state.settings_input.trim().to_string();
        if let Err(err) = self.key_store.set(&value) {
            tracing::error!("saving football key failed: {err:#}");
            self.state.push_log(format!("[WARN] Could not save key: {err}"));
            self.state.close_overlay();
            return;
        }

        let credential = self.key_store.get();
        let generation = self.state.credential_saved(credential.is_some());
        self.state.close_overlay();
        self.state.push_log("[INFO] API-Football key saved");
        self.send_command(ProviderCommand::SetCredential(credential));
        self.send_fixtures_request(generation, false);
    }

    fn send_command(&mut self, cmd: ProviderCommand) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log("[INFO] Provider unavailable");
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log("[WARN] Provider request failed");
            return false;
        }
        true
    }

    fn dispatch_turn(&mut self, turn: PendingTurn) {
        if !self.send_command(ProviderCommand::SendChat(turn)) {
            apply_delta(
                &mut self.state,
                Delta::ChatReply(Err(ChatError::Dispatch("provider unavailable".to_string()))),
            );
        }
    }

    fn request_fixtures(&mut self, announce: bool) {
        let generation = self.state.begin_fixtures_request();
        self.send_fixtures_request(generation, announce);
    }

    fn send_fixtures_request(&mut self, generation: u64, announce: bool) {
        let date = self.config.fixtures_date_or_today();
        let cmd = ProviderCommand::FetchFixtures {
            date: date.clone(),
            generation,
        };
        if self.send_command(cmd) {
            if announce {
                self.state.push_log(format!("[INFO] Fixtures request sent ({date})"));
            }
        } else {
            self.state.fixtures_loading = false;
        }
    }

    fn request_insight(&mut self) {
        let Some(fixture) = self.state.selected_fixture().cloned() else {
            self.state.push_log("[INFO] No fixture selected");
            return;
        };
        self.state.insight = None;
        self.state.insight_loading = true;
        self.state.overlay = Some(Overlay::Insight);
        if !self.send_command(ProviderCommand::FetchInsight { fixture }) {
            self.state.insight_loading = false;
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let log_status = logging::init_logging();
    let config = AppConfig::from_env();
    let key_store = key_store::open_default(config.config_dir.as_deref());
    let credential = key_store.get();

    let fixtures = FixtureClient::new(config.football.clone(), credential.clone());
    let chat: Arc<dyn ChatBackend> = Arc::new(GeminiClient::new(config.chat.clone()));
    let missing_llm_key = config.chat.api_key.is_none();

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    provider::spawn_provider(tx, cmd_rx, fixtures, chat);

    let mut app = App::new(Some(cmd_tx), key_store, config);
    match log_status {
        Ok(path) => app.state.push_log(format!("[INFO] Logging to {}", path.display())),
        Err(err) => app.state.push_log(format!("[WARN] File logging disabled: {err}")),
    }
    if missing_llm_key {
        app.state
            .push_log("[WARN] GEMINI_API_KEY not set, chat requests will fail");
    }
    // The sidebar is optional: without a key nothing is fetched until asked.
    if credential.is_some() {
        app.request_fixtures(false);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("terminal loop failed: {err}");
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.tick = app.tick.wrapping_add(1);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(40), Constraint::Min(30)])
        .split(chunks[1]);

    render_sidebar(frame, body[0], &app.state);
    render_chat(frame, body[1], app);

    let console = Paragraph::new(console_text(&app.state))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(footer, chunks[3]);

    let area = frame.size();
    match app.state.overlay {
        Some(Overlay::Settings) => render_settings(frame, area, &app.state),
        Some(Overlay::Insight) => render_insight(frame, area, &app.state),
        Some(Overlay::Help) => render_help_overlay(frame, area),
        None => {}
    }
}

fn header_text(state: &AppState) -> String {
    let source = if state.has_football_key {
        "API-Football"
    } else {
        "demo"
    };
    format!(" BetMaster AI | Google Search grounding | Lista: {source}")
}

fn footer_text(state: &AppState) -> String {
    if state.overlay == Some(Overlay::Settings) {
        return "Enter Salvar | Esc Cancelar".to_string();
    }
    match state.focus {
        Focus::Input => {
            "Enter Enviar | Tab Lista | PgUp/PgDn Rolar | F2 API Key | Ctrl+C Sair".to_string()
        }
        Focus::Fixtures => {
            "j/k/↑/↓ Mover | Enter Analisar | i Detalhes | r Atualizar | s API Key | Tab Chat | ? Ajuda | q Sair"
                .to_string()
        }
    }
}

fn console_text(state: &AppState) -> String {
    state
        .logs
        .back()
        .map(|line| format!(" {line}"))
        .unwrap_or_default()
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let border_style = if state.focus == Focus::Fixtures {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title("Lista Rápida")
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    if state.fixtures_loading {
        let loading = Paragraph::new("Carregando jogos...").style(Style::default().fg(Color::Green));
        frame.render_widget(loading, inner);
        return;
    }

    if state.fixtures.is_empty() {
        let hint = Paragraph::new(empty_sidebar_text(state))
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, inner);
        return;
    }

    const CARD_HEIGHT: u16 = 4;
    if inner.height < CARD_HEIGHT {
        return;
    }
    let visible = (inner.height / CARD_HEIGHT) as usize;
    let (start, end) = visible_range(state.selected, state.fixtures.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let card_area = Rect {
            x: inner.x,
            y: inner.y + (i as u16) * CARD_HEIGHT,
            width: inner.width,
            height: CARD_HEIGHT - 1,
        };
        let selected = idx == state.selected && state.focus == Focus::Fixtures;
        render_fixture_card(frame, card_area, &state.fixtures[idx], selected);
    }
}

fn empty_sidebar_text(state: &AppState) -> String {
    let mut lines = Vec::new();
    if !state.fixtures_errors.is_empty() {
        lines.push(format!("Erro: {}", state.fixtures_errors.join("; ")));
        lines.push(String::new());
    }
    lines.push("Para ver a lista automática aqui, configure a chave API-Football (s).".to_string());
    lines.push(String::new());
    lines.push(
        "Caso contrário, basta perguntar no chat! O Bot buscará os jogos no Flashscore/Google. Pressione r para ver a demonstração."
            .to_string(),
    );
    lines.join("\n")
}

fn render_fixture_card(frame: &mut Frame, area: Rect, fixture: &Fixture, selected: bool) {
    let playable = fixture.is_playable();
    let mut style = if playable {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    if selected {
        style = style.bg(Color::DarkGray);
        if !playable {
            style = style.fg(Color::Gray);
        }
    }

    let time = format_kickoff(&fixture.kickoff);
    let mut top = format!("{}  {time}", fixture.league.name);
    if !playable {
        top.push_str(&format!(" [{}]", fixture.status_short));
    }
    let teams = match fixture.score {
        Some((home, away)) if !playable => {
            format!("{} {home}-{away} {}", fixture.home.name, fixture.away.name)
        }
        _ => format!("{} VS {}", fixture.home.name, fixture.away.name),
    };
    let action = if playable {
        "▸ Analisar"
    } else if fixture.is_finished() {
        "Encerrado"
    } else {
        "Indisponível"
    };

    let action_style = if playable {
        style.fg(Color::Green)
    } else {
        style.add_modifier(Modifier::ITALIC)
    };
    let lines = vec![
        Line::from(Span::styled(top, style)),
        Line::from(Span::styled(teams, style.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(action, action_style)),
    ];
    frame.render_widget(Paragraph::new(lines).style(style), area);
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let block = Block::default().title("Chat").borders(Borders::ALL);
    let inner = block.inner(rows[0]);
    frame.render_widget(block, rows[0]);

    let lines = transcript_lines(state, inner.width.max(1) as usize);
    let total = lines.len();
    let height = inner.height as usize;
    let max_offset = total.saturating_sub(height);
    let offset = max_offset.saturating_sub(state.transcript_scroll as usize);
    let transcript = Paragraph::new(lines).scroll((offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(transcript, inner);

    if state.conversation.is_loading() {
        let spin = SPINNER[app.tick % SPINNER.len()];
        let status = Paragraph::new(format!(" {spin} {}", state.conversation.status()))
            .style(Style::default().fg(Color::Green));
        frame.render_widget(status, rows[1]);
    }

    let input_focused = state.focus == Focus::Input && state.overlay.is_none();
    let border_style = if input_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if state.conversation.is_loading() {
        "Mensagem (aguardando resposta)"
    } else {
        "Mensagem"
    };
    let input_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let input_inner = input_block.inner(rows[2]);
    let input = if state.input.is_empty() {
        Paragraph::new(INPUT_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        let width = input_inner.width.saturating_sub(1) as usize;
        Paragraph::new(tail_chars(&state.input, width))
    };
    frame.render_widget(input.block(input_block), rows[2]);

    if input_focused {
        let typed = state.input.chars().count().min(input_inner.width.saturating_sub(1) as usize);
        frame.set_cursor(input_inner.x + typed as u16, input_inner.y);
    }
}

fn transcript_lines(state: &AppState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for msg in state.conversation.messages() {
        let (label, color) = match msg.role {
            Role::User => ("Você", Color::Blue),
            Role::Model | Role::System => ("BetMaster AI", Color::Green),
        };
        let (label_style, body_style) = if msg.is_error {
            (
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Red),
            )
        } else {
            (
                Style::default().fg(color).add_modifier(Modifier::BOLD),
                Style::default(),
            )
        };
        lines.push(Line::from(Span::styled(
            format!("{label} {}", format_timestamp(msg.timestamp)),
            label_style,
        )));
        for row in wrap_text(&msg.content, width) {
            lines.push(Line::from(Span::styled(row, body_style)));
        }
        lines.push(Line::default());
    }
    lines
}

fn render_settings(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(60, 40, area);
    frame.render_widget(Clear, popup);

    let masked = "•".repeat(state.settings_input.chars().count());
    let shown = if masked.is_empty() {
        "(vazio: usar dados de demonstração)".to_string()
    } else {
        masked
    };
    let lines = vec![
        Line::from(Span::styled(
            "Para obter dados reais, você precisa de uma chave da API-Football (RapidAPI).",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "Sem a chave, o sistema usará dados de demonstração.",
            Style::default().fg(Color::Yellow),
        )),
        Line::default(),
        Line::from("API-Football Key (v3.football.api-sports.io):"),
        Line::from(Span::styled(shown, Style::default().fg(Color::White))),
        Line::default(),
        Line::from(Span::styled(
            "Enter Salvar Chave | Esc Cancelar",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let dialog = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Configuração da API")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(dialog, popup);
}

fn render_insight(frame: &mut Frame, area: Rect, state: &AppState) {
    let popup = centered_rect(80, 80, area);
    frame.render_widget(Clear, popup);

    let (title, text) = match (&state.insight, state.insight_loading) {
        (_, true) => ("Detalhes".to_string(), "Carregando...".to_string()),
        (Some(insight), false) => (insight.title.clone(), insight_text(insight)),
        (None, false) => ("Detalhes".to_string(), "Sem dados".to_string()),
    };
    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(panel, popup);
}

fn insight_text(insight: &FixtureInsight) -> String {
    let mut lines = Vec::new();

    lines.push("Confrontos diretos".to_string());
    for m in &insight.h2h.response {
        let score = m
            .score
            .map(|(h, a)| format!("{h}-{a}"))
            .unwrap_or_else(|| "vs".to_string());
        let date = m.date.get(..10).unwrap_or(&m.date);
        lines.push(format!("  {date}  {} {score} {} ({})", m.home, m.away, m.league));
    }
    push_errors(&mut lines, &insight.h2h);

    lines.push(String::new());
    for odds in &insight.odds.response {
        lines.push(format!("Odds ({})", odds.bookmaker));
        for bet in &odds.bets {
            let values = bet
                .values
                .iter()
                .map(|v| format!("{} {}", v.value, v.odd))
                .collect::<Vec<_>>()
                .join(" | ");
            lines.push(format!("  {}: {values}", bet.name));
        }
    }
    if insight.odds.response.is_empty() {
        lines.push("Odds".to_string());
        if insight.odds.errors.is_empty() {
            lines.push("  sem odds disponíveis".to_string());
        }
    }
    push_errors(&mut lines, &insight.odds);

    lines.push(String::new());
    lines.push("Estatísticas".to_string());
    for team in &insight.statistics.response {
        let stats = team
            .stats
            .iter()
            .take(6)
            .map(|s| format!("{} {}", s.name, s.value))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  {}: {stats}", team.team));
    }
    push_errors(&mut lines, &insight.statistics);

    lines.push(String::new());
    lines.push("Classificação".to_string());
    if let Some(group) = insight.standings.response.first() {
        for row in group.iter().take(20) {
            lines.push(format!(
                "  {:>2}. {:<22} {:>3} pts  {:+}  {}",
                row.rank,
                row.team,
                row.points,
                row.goals_diff,
                row.form.as_deref().unwrap_or("")
            ));
        }
    }
    push_errors(&mut lines, &insight.standings);

    lines.join("\n")
}

fn push_errors<T>(lines: &mut Vec<String>, result: &ApiResult<T>) {
    for err in &result.errors {
        lines.push(format!("  ! {err}"));
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "BetMaster AI - Ajuda",
        "",
        "Global:",
        "  Tab          Alternar chat / lista",
        "  PgUp / PgDn  Rolar conversa",
        "  F2           Configurar API-Football",
        "  Ctrl+C       Sair",
        "",
        "Chat:",
        "  Enter        Enviar mensagem",
        "  Esc          Ir para a lista",
        "",
        "Lista:",
        "  j/k or ↑/↓   Mover",
        "  Enter        Analisar partida (não iniciada)",
        "  i            Confrontos, odds, estatísticas",
        "  r            Atualizar jogos",
        "  s            Configurar API-Football",
        "  q            Sair",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Ajuda").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

/// Greedy word wrap; words longer than `width` are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw_line in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in raw_line.split(' ') {
            let mut word: Vec<char> = word.chars().collect();
            let sep = usize::from(current_len > 0);
            if current_len + sep + word.len() <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.extend(word.iter());
                current_len += sep + word.len();
                continue;
            }
            if current_len > 0 {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            while word.len() > width {
                let rest = word.split_off(width);
                out.push(word.into_iter().collect());
                word = rest;
            }
            current_len = word.len();
            current.extend(word);
        }
        out.push(current);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

fn tail_chars(text: &str, width: usize) -> String {
    let count = text.chars().count();
    text.chars().skip(count.saturating_sub(width)).collect()
}

fn format_kickoff(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return "--:--".to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return dt.with_timezone(&Local).format("%H:%M").to_string();
    }
    cleaned
        .get(11..16)
        .map(str::to_string)
        .unwrap_or_else(|| cleaned.to_string())
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_default()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_text_respects_width() {
        let rows = wrap_text("Jogos de hoje na Premier League", 10);
        assert!(rows.iter().all(|r| r.chars().count() <= 10));
        assert_eq!(rows.join(" "), "Jogos de hoje na Premier League");
    }

    #[test]
    fn wrap_text_splits_long_words_and_keeps_blank_lines() {
        let rows = wrap_text("abcdefghij\n\nxy", 4);
        assert_eq!(rows, vec!["abcd", "efgh", "ij", "", "xy"]);
    }

    #[test]
    fn visible_range_centres_selection() {
        assert_eq!(visible_range(0, 0, 3), (0, 0));
        assert_eq!(visible_range(1, 2, 3), (0, 2));
        assert_eq!(visible_range(5, 10, 4), (3, 7));
        assert_eq!(visible_range(9, 10, 4), (6, 10));
    }

    #[test]
    fn kickoff_falls_back_to_raw_time() {
        assert_eq!(format_kickoff(""), "--:--");
        assert_eq!(format_kickoff("2026-10-16 19:30"), "19:30");
    }
}
