use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Row, Table, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::banner::EventBanner;
use crate::components::momentum::MomentumGauge;
use crate::components::palette::{MatchColor, resolve};
use crate::playback::{ClockPhase, Leaning, Snapshot};
use crate::state::app_state::LineupsState;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use matchcast_api::{Lineup, MatchResult};
use serde_json::Value;

static TABS: &[&str; 3] = &["Warm-up", "Live", "Summary"];

const HELP_TEXT: &str = "Enter  kick off (warm-up)
s      stop playback
r      replay from kickoff
j/k    scroll the feed
1/2/3  warm-up / live / summary
f      full screen
\"      toggle log pane
Esc    close help
q      quit";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let drawn = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Warmup => draw_warmup(f, layout.main, app),
            MenuItem::Live => draw_live(f, layout.main, app),
            MenuItem::Summary => draw_summary(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
    if let Err(e) = drawn {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Warmup => 0,
        MenuItem::Live => 1,
        MenuItem::Summary => 2,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Warm-up
// ---------------------------------------------------------------------------

fn draw_warmup(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Warm-up ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(result) = app.state.warmup.result.as_ref() else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Match load failed:\n{err}\n\nPress Enter to retry")
        } else {
            format!("Loading match {}...", app.state.warmup.match_id)
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [header, kickoff, lineups, prompt] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(result.home.name.as_str(), resolve(MatchColor::Home)),
            Span::raw("  v  "),
            Span::styled(result.away.name.as_str(), resolve(MatchColor::Away)),
        ]))
        .alignment(Alignment::Center),
        header,
    );
    f.render_widget(
        Paragraph::new(kickoff_label(result))
            .style(resolve(MatchColor::Dim))
            .alignment(Alignment::Center),
        kickoff,
    );

    match &app.state.warmup.lineups {
        LineupsState::Loaded(l) => {
            let [home, away] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(lineups);
            draw_lineup(f, home, &result.home.name, &l.home, Color::Rgb(0, 122, 195));
            draw_lineup(f, away, &result.away.name, &l.away, Color::Rgb(135, 206, 235));
        }
        LineupsState::Pending => f.render_widget(
            Paragraph::new("Loading lineups...")
                .style(resolve(MatchColor::Dim))
                .alignment(Alignment::Center),
            lineups,
        ),
        LineupsState::Unavailable(message) => f.render_widget(
            Paragraph::new(lineups_unavailable_text(message))
                .style(resolve(MatchColor::Dim))
                .alignment(Alignment::Center),
            lineups,
        ),
    }

    let prompt_text = if app.is_playing() {
        "Match in progress: press Enter to watch"
    } else {
        "Press Enter to kick off"
    };
    f.render_widget(
        Paragraph::new(prompt_text)
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt,
    );
}

fn kickoff_label(result: &MatchResult) -> String {
    match result.kickoff {
        Some(kickoff) => format!(
            "Kick-off {}",
            kickoff.with_timezone(&Local).format("%a %d %b %Y, %H:%M")
        ),
        None => "Kick-off time unknown".to_string(),
    }
}

fn draw_lineup(f: &mut Frame, area: Rect, team: &str, lineup: &Lineup, color: Color) {
    let block = default_border(color).title(format!(" {team} ({}) ", lineup.formation));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = lineup.starters.iter().map(|p| Line::from(p.as_str())).collect();
    if !lineup.bench.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Bench", resolve(MatchColor::Dim))));
        lines.extend(
            lineup
                .bench
                .iter()
                .map(|p| Line::from(Span::styled(p.as_str(), resolve(MatchColor::Dim)))),
        );
    }
    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Live
// ---------------------------------------------------------------------------

fn draw_live(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Live ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(result) = app.state.warmup.result.as_ref().filter(|_| app.state.live.started) else {
        f.render_widget(
            Paragraph::new("No match playing. Press 1 then Enter to kick off")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };
    let snapshot = &app.state.live.snapshot;

    let [scoreline, banner, gauge, feed] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(2),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(scoreline_text(result, snapshot)).alignment(Alignment::Center),
        scoreline,
    );
    f.render_widget(EventBanner { banner: snapshot.banner.as_ref() }, banner);

    let [bar, leaning] = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(gauge);
    f.render_widget(
        MomentumGauge {
            momentum: snapshot.momentum,
            home: &result.home.short_name,
            away: &result.away.short_name,
        },
        bar,
    );
    let on_top = match snapshot.momentum.leaning {
        Leaning::Home => &result.home.name,
        Leaning::Away => &result.away.name,
    };
    f.render_widget(
        Paragraph::new(format!("Momentum: {on_top}"))
            .style(resolve(MatchColor::Dim))
            .alignment(Alignment::Center),
        leaning,
    );

    draw_feed(f, feed, app, " Match Feed ");
}

fn scoreline_text(result: &MatchResult, snapshot: &Snapshot) -> Line<'static> {
    let clock = match snapshot.phase {
        ClockPhase::HalftimePause | ClockPhase::FullTime => snapshot.clock_label.clone(),
        _ => format!("{}'", snapshot.clock_label),
    };
    let mut spans = vec![
        Span::styled(result.home.short_name.clone(), resolve(MatchColor::Home)),
        Span::styled(
            format!(" {} - {} ", snapshot.live_score.home, snapshot.live_score.away),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(result.away.short_name.clone(), resolve(MatchColor::Away)),
        Span::raw("   "),
        Span::styled(clock, resolve(MatchColor::Accent)),
    ];
    if snapshot.var_active {
        spans.push(Span::styled("  VAR", resolve(MatchColor::Var)));
    }
    Line::from(spans)
}

fn draw_feed(f: &mut Frame, area: Rect, app: &App, title: &str) {
    let block = default_border(Color::DarkGray).title(title.to_string());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let live = &app.state.live;
    if live.feed.is_empty() {
        f.render_widget(
            Paragraph::new("No events yet").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = live
        .feed
        .iter()
        .skip(live.scroll_offset as usize)
        .take(inner.height as usize)
        .map(|line| {
            let style = if line.is_new {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let clipped: String = line.text.chars().take(inner.width.saturating_sub(1) as usize).collect();
            Line::from(Span::styled(clipped, style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Summary ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let snapshot = &app.state.live.snapshot;
    let Some(result) = app.state.warmup.result.as_ref().filter(|_| snapshot.summary_ready) else {
        f.render_widget(
            Paragraph::new("The summary is available after full time")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [headline, body] = Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);
    f.render_widget(
        Paragraph::new(format!(
            "{} {} - {} {}",
            result.home.name, snapshot.live_score.home, snapshot.live_score.away, result.away.name
        ))
        .style(resolve(MatchColor::Accent))
        .alignment(Alignment::Center),
        headline,
    );

    let [stats, feed] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
    draw_statistics(f, stats, result);
    draw_feed(f, feed, app, " Full Feed ");
}

fn draw_statistics(f: &mut Frame, area: Rect, result: &MatchResult) {
    let block = default_border(Color::DarkGray).title(" Statistics ");
    let rows = stat_rows(&result.statistics);
    if rows.is_empty() {
        f.render_widget(
            Paragraph::new("No statistics")
                .style(Style::default().fg(Color::DarkGray))
                .block(block),
            area,
        );
        return;
    }

    let header = Row::new(vec![
        String::new(),
        result.home.short_name.clone(),
        result.away.short_name.clone(),
    ])
    .style(resolve(MatchColor::Dim));
    let table = Table::new(
        rows.into_iter().map(|(name, home, away)| Row::new(vec![name, home, away])),
        [Constraint::Fill(2), Constraint::Length(6), Constraint::Length(6)],
    )
    .header(header)
    .block(block);
    f.render_widget(table, area);
}

/// Flatten the resolver's statistics object into `(label, home, away)` rows.
/// Pairs may be `[home, away]` arrays or `{home, away}` objects; anything
/// else is shown as a single value.
pub fn stat_rows(stats: &Value) -> Vec<(String, String, String)> {
    let Some(map) = stats.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| {
            let label = stat_label(key);
            match value {
                Value::Array(pair) if pair.len() == 2 => (label, scalar(&pair[0]), scalar(&pair[1])),
                Value::Object(sides) if sides.contains_key("home") || sides.contains_key("away") => (
                    label,
                    sides.get("home").map(scalar).unwrap_or_default(),
                    sides.get("away").map(scalar).unwrap_or_default(),
                ),
                other => (label, scalar(other), String::new()),
            }
        })
        .collect()
}

fn stat_label(key: &str) -> String {
    let words = key.replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logger = TuiLoggerWidget::default()
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .block(default_border(Color::DarkGray).title(" Logs "));
    f.render_widget(logger, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

fn lineups_unavailable_text(message: &str) -> String {
    let message = message.trim();
    if message.is_empty() {
        "Lineups unavailable".to_string()
    } else {
        format!("Lineups unavailable: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stat_rows_accept_pairs_and_objects() {
        let stats = json!({
            "possession": [58, 42],
            "shots_on_target": {"home": 6, "away": 3},
            "referee": "Orsato",
        });
        let rows = stat_rows(&stats);
        assert!(rows.contains(&("Possession".into(), "58".into(), "42".into())));
        assert!(rows.contains(&("Shots on target".into(), "6".into(), "3".into())));
        assert!(rows.contains(&("Referee".into(), "Orsato".into(), String::new())));
    }

    #[test]
    fn test_stat_rows_ignore_non_objects() {
        assert!(stat_rows(&Value::Null).is_empty());
        assert!(stat_rows(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_scoreline_marks_var_and_minute() {
        let result = MatchResult::default();
        let snapshot = Snapshot {
            clock_label: "45+2".into(),
            phase: ClockPhase::InjuryFirstHalf,
            var_active: true,
            ..Snapshot::default()
        };
        let text: String = scoreline_text(&result, &snapshot)
            .spans
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert!(text.contains("0 - 0"));
        assert!(text.contains("45+2'"));
        assert!(text.ends_with("VAR"));

        let halftime = Snapshot { clock_label: "HT".into(), phase: ClockPhase::HalftimePause, ..Snapshot::default() };
        let text: String = scoreline_text(&result, &halftime).spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.ends_with("HT"));
    }

    #[test]
    fn test_lineups_unavailable_shows_reason() {
        assert_eq!(
            lineups_unavailable_text("no lineups published for m1"),
            "Lineups unavailable: no lineups published for m1"
        );
        assert_eq!(lineups_unavailable_text("  "), "Lineups unavailable");
    }
}
