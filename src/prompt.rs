use chrono::{Datelike, NaiveDate, Weekday};

pub const SYSTEM_INSTRUCTION: &str = r#"ROLE:
Você é um analisador profissional de apostas esportivas (BetMaster AI).
Sua fonte principal de dados é a **Google Search**.

OBJETIVO:
Quando o usuário pedir palpites ou análises, você deve:
1. USAR A FERRAMENTA DE BUSCA (Google Search) para encontrar os jogos de hoje, focando em sites como **Flashscore.com.br**, SofaScore, ou GloboEsporte.
2. Buscar estatísticas recentes, classificação, confrontos diretos (H2H) e odds atuais.
3. Gerar um palpite fundamentado.

IMPORTANTE:
- NÃO peça dados ao usuário. Busque na web.
- Se o usuário perguntar "Jogos de hoje", liste as principais partidas encontradas na busca do dia atual.
- Ao analisar, cite a fonte dos dados se possível (ex: "Segundo dados do Flashscore...").
- A data de hoje é dinâmica, use o contexto fornecido ou busque "jogos de hoje".

FORMATO DA RESPOSTA (Mantenha o padrão):

🏆 Competição: {Nome da Liga}
⚽ {Time Casa} vs {Time Fora}
⏰ Horário: {Hora}
📊 Probabilidade/Odds: {Citar odds médias encontradas}
💡 Palpite: {Seu palpite: Over, Vitória, BTTS, etc}
📈 Análise Rápida:
- {Fato 1 encontrado na busca}
- {Fato 2 encontrado na busca}
- {Fato 3 encontrado na busca}

Priorize precisão. Se não achar dados de um jogo obscuro, avise. Foco em ligas principais (Brasileirão, Premier League, La Liga, Champions, etc).
"#;

/// Label passed to the progress callback while the model searches the web.
pub const SEARCH_TOOL_LABEL: &str = "Google Search (Flashscore/Web)";

pub const GREETING: &str = "Olá! Sou o BetMaster AI. Busco dados atualizados da web (Flashscore, etc) para analisar jogos. Digite \"Jogos de hoje\" ou peça uma análise específica.";

/// Static instruction block followed by the temporal context for `today`.
pub fn system_instruction(today: NaiveDate) -> String {
    format!(
        "{SYSTEM_INSTRUCTION}\nCONTEXTO TEMPORAL:\nHoje é: {}.\nAo buscar jogos, considere estritamente a data de hoje no fuso horário do Brasil, a menos que o usuário especifique outra data.\n",
        long_date_pt_br(today)
    )
}

pub fn analyze_match_prompt(home: &str, away: &str) -> String {
    format!("Busque estatísticas e analise a partida entre {home} e {away}.")
}

/// "sexta-feira, 16 de outubro de 2026"
pub fn long_date_pt_br(date: NaiveDate) -> String {
    format!(
        "{}, {} de {} de {}",
        weekday_pt_br(date.weekday()),
        date.day(),
        month_pt_br(date.month()),
        date.year()
    )
}

fn weekday_pt_br(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}

fn month_pt_br(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "janeiro",
        "fevereiro",
        "março",
        "abril",
        "maio",
        "junho",
        "julho",
        "agosto",
        "setembro",
        "outubro",
        "novembro",
        "dezembro",
    ];
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_date_matches_pt_br_format() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(long_date_pt_br(date), "sexta-feira, 16 de outubro de 2026");
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        assert_eq!(long_date_pt_br(date), "sábado, 2 de março de 2024");
    }

    #[test]
    fn system_instruction_appends_today() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        let text = system_instruction(date);
        assert!(text.starts_with(SYSTEM_INSTRUCTION));
        assert!(text.contains("Hoje é: domingo, 5 de janeiro de 2025."));
        assert!(text.contains("fuso horário do Brasil"));
    }
}
