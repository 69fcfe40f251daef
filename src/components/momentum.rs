use crate::components::palette::{MatchColor, resolve};
use crate::playback::{Leaning, Momentum};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::widgets::Widget;

const HOME_CELL: &str = "█";
const AWAY_CELL: &str = "░";

/// Tug-of-war bar: home fills from the left, away from the right.
pub struct MomentumGauge<'a> {
    pub momentum: Momentum,
    pub home: &'a str,
    pub away: &'a str,
}

/// Cells of a `width`-wide bar owned by the home side.
pub fn home_cells(value: f64, width: u16) -> u16 {
    let share = (value / 100.0).clamp(0.0, 1.0);
    (share * f64::from(width)).round() as u16
}

impl Widget for MomentumGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let home_len = self.home.chars().count() as u16;
        let away_len = self.away.chars().count() as u16;
        let bar_width = area.width.saturating_sub(home_len + away_len + 2);

        let home_style = resolve(MatchColor::Home);
        let away_style = resolve(MatchColor::Away);
        let (home_label_style, away_label_style) = match self.momentum.leaning {
            Leaning::Home => (resolve(MatchColor::Accent), away_style),
            Leaning::Away => (home_style, resolve(MatchColor::Accent)),
        };

        let y = area.y;
        buf.set_string(area.x, y, self.home, home_label_style);
        let bar_x = area.x + home_len + 1;
        let filled = home_cells(self.momentum.value, bar_width);
        for i in 0..bar_width {
            let (cell, style) = if i < filled {
                (HOME_CELL, home_style)
            } else {
                (AWAY_CELL, away_style)
            };
            buf.set_string(bar_x + i, y, cell, style);
        }
        buf.set_string(bar_x + bar_width + 1, y, self.away, away_label_style);
    }
}
