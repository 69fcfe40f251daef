use crate::components::palette::{MatchColor, resolve, tone_style};
use crate::playback::Banner;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::Style;
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Widget};

/// The transient announcement strip: goals, cards, VAR, half and full time.
pub struct EventBanner<'a> {
    pub banner: Option<&'a Banner>,
}

impl Widget for EventBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = self
            .banner
            .map(|b| tone_style(b.tone))
            .unwrap_or_else(|| resolve(MatchColor::Dim));

        if area.height < 3 {
            if let Some(banner) = self.banner {
                render_centered(Line::from(Span::styled(banner.text.as_str(), border_style)), area, area.y, buf);
            }
            return;
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let Some(banner) = self.banner else {
            return;
        };
        let text = format!(" {} ", banner.text);
        let y = inner.y + inner.height.saturating_sub(1) / 2;
        render_centered(Line::from(Span::styled(text, tone_style(banner.tone))), inner, y, buf);
    }
}

pub fn render_centered(line: Line, area: Rect, y: u16, buf: &mut Buffer) {
    if y >= area.y + area.height {
        return;
    }
    let w = line.width() as u16;
    let x = area.x + area.width.saturating_sub(w) / 2;
    render_line(line, x, y, area.x + area.width, buf);
}

/// Write spans left to right, clipping at column `limit`.
fn render_line(line: Line, x: u16, y: u16, limit: u16, buf: &mut Buffer) {
    let mut cx = x;
    for span in &line.spans {
        let style: Style = span.style;
        let run: String = span
            .content
            .chars()
            .take(limit.saturating_sub(cx) as usize)
            .collect();
        if run.is_empty() {
            break;
        }
        let width = run.chars().count() as u16;
        buf.set_string(cx, y, run, style);
        cx += width;
    }
}
