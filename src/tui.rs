use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::Frame;

use crate::fmt::money;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const BOLD: Style = Style::new().add_modifier(Modifier::BOLD);

/// Series colour shared by both charts.
pub const CHART_STYLE: Style = Style::new().fg(Color::Rgb(46, 134, 193));

pub const AMOUNT_POS_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const AMOUNT_NEG_STYLE: Style = Style::new().fg(Color::Red);

pub const WARN_STYLE: Style = Style::new().fg(Color::Yellow);

/// Format an amount as a colored Span (green when positive, red when negative).
pub fn money_span(symbol: &str, amount: f64) -> Span<'static> {
    let style = if amount < 0.0 {
        AMOUNT_NEG_STYLE
    } else {
        AMOUNT_POS_STYLE
    };
    Span::styled(money(symbol, amount), style)
}
