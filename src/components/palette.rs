use crate::playback::BannerTone;
use tui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchColor {
    Home,
    Away,
    Accent,
    Dim,
    Var,
}

pub fn resolve(color: MatchColor) -> Style {
    match color {
        MatchColor::Home => Style::default().fg(Color::Rgb(0, 122, 195)),
        MatchColor::Away => Style::default().fg(Color::Rgb(135, 206, 235)),
        MatchColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        MatchColor::Dim => Style::default().fg(Color::Indexed(240)),
        MatchColor::Var => Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
    }
}

pub fn tone_style(tone: BannerTone) -> Style {
    match tone {
        BannerTone::Goal => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        BannerTone::Alert => Style::default().fg(Color::Rgb(255, 103, 31)).add_modifier(Modifier::BOLD),
        BannerTone::Card => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        BannerTone::Var => resolve(MatchColor::Var),
        BannerTone::Info => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    }
}
