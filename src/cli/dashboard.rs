use std::io::IsTerminal;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::error::Result;
use crate::filter::DateRange;
use crate::fmt::{compact, number};
use crate::models::Dimension;
use crate::reports::SalesReport;
use crate::session::{ReportParams, Session};
use crate::tui::{money_span, BOLD, CHART_STYLE, FOOTER_STYLE, HEADER_STYLE, WARN_STYLE};

use super::report::{format_report, EMPTY_MESSAGE};

/// What the event loop does after a key press.
#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Redraw,
    Quit,
}

/// Restores the terminal when the dashboard exits, on error paths too.
struct TerminalGuard(ratatui::DefaultTerminal);

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        ratatui::restore();
    }
}

/// Interactive dashboard. Every parameter change re-runs filter + aggregation
/// over the session's joined rows.
pub struct Dashboard<'a> {
    session: &'a Session,
    range: Option<DateRange>,
    dimension: Dimension,
    report: SalesReport,
}

impl<'a> Dashboard<'a> {
    pub fn new(session: &'a Session, params: &ReportParams) -> Self {
        let range = session.resolve_range(params);
        let report = session.report_for(range, params.dimension);
        Self {
            session,
            range,
            dimension: params.dimension,
            report,
        }
    }

    fn rerun(&mut self) {
        self.report = self.session.report_for(self.range, self.dimension);
    }

    fn period_label(&self) -> String {
        match self.range {
            Some(r) => format!(
                " \u{2014} {} to {}",
                r.start.format("%d/%m/%Y"),
                r.end.format("%d/%m/%Y")
            ),
            None => " \u{2014} no data".to_string(),
        }
    }

    fn draw_metrics(&self, frame: &mut Frame, area: Rect) {
        let sym = &self.session.currency;
        let totals = &self.report.totals;
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(area);

        let left = vec![
            Line::from(vec![Span::raw(" Total sales    "), money_span(sym, totals.value)]),
            Line::from(format!(" Sales count    {}", number(totals.count))),
            Line::from(vec![Span::raw(" Commission     "), money_span(sym, totals.commission)]),
        ];
        frame.render_widget(Paragraph::new(left), left_area);

        let mut right = vec![Line::from(vec![
            Span::raw(" Group by       "),
            Span::styled(self.dimension.label(), BOLD),
        ])];
        let dropped = self.session.join.dropped;
        if dropped > 0 {
            right.push(Line::from(Span::styled(
                format!(" {} sale(s) skipped: product not in catalog", number(dropped)),
                WARN_STYLE,
            )));
        }
        frame.render_widget(Paragraph::new(right), right_area);
    }

    fn draw_daily_chart(&self, frame: &mut Frame, area: Rect, range: DateRange) {
        let sym = &self.session.currency;
        let origin = range.start;
        let points: Vec<(f64, f64)> = self
            .report
            .daily
            .iter()
            .map(|p| (p.date.signed_duration_since(origin).num_days() as f64, p.total))
            .collect();
        let x_max = (range.end.signed_duration_since(origin).num_days() as f64).max(1.0);
        let y_max = nice_ceiling(self.report.daily.iter().map(|p| p.total).fold(0.0, f64::max));

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(CHART_STYLE)
            .data(&points);

        let chart = Chart::new(vec![dataset])
            .block(Block::default().title("Sales per day").title_style(BOLD))
            .x_axis(
                Axis::default()
                    .style(FOOTER_STYLE)
                    .bounds([0.0, x_max])
                    .labels(vec![
                        Span::raw(range.start.format("%d/%m").to_string()),
                        Span::raw(range.end.format("%d/%m").to_string()),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .style(FOOTER_STYLE)
                    .bounds([0.0, y_max])
                    .labels(vec![
                        Span::raw(compact(sym, 0.0)),
                        Span::raw(compact(sym, y_max / 2.0)),
                        Span::raw(compact(sym, y_max)),
                    ]),
            );
        frame.render_widget(chart, area);
    }

    fn draw_breakdown_chart(&self, frame: &mut Frame, area: Rect) {
        let sym = &self.session.currency;
        let items = self.report.breakdown_by_value();
        let bars: Vec<Bar> = items
            .iter()
            .map(|g| {
                Bar::default()
                    .value(g.total.max(0.0).round() as u64)
                    .text_value(compact(sym, g.total))
                    .label(Line::from(g.key.clone()))
                    .style(CHART_STYLE)
            })
            .collect();

        let width = bar_width(area.width, bars.len());

        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(format!("Sales by {}", self.dimension.label()))
                    .title_style(BOLD),
            )
            .bar_width(width)
            .bar_gap(1)
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }
}

impl Dashboard<'_> {
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, sep1, stats_area, sep2, charts_area, sep3, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(format!(" Sales Dashboard{}", self.period_label())).style(HEADER_STYLE),
            header_area,
        );

        let sep_line = "━".repeat(area.width as usize);
        let sep_widget = Paragraph::new(sep_line.as_str()).style(FOOTER_STYLE);
        frame.render_widget(sep_widget.clone(), sep1);
        frame.render_widget(sep_widget.clone(), sep2);
        frame.render_widget(sep_widget, sep3);

        self.draw_metrics(frame, stats_area);

        match self.range {
            Some(range) if !self.report.is_empty() => {
                let [chart_left, chart_right] =
                    Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                        .areas(charts_area);
                self.draw_daily_chart(frame, chart_left, range);
                self.draw_breakdown_chart(frame, chart_right);
            }
            _ => {
                frame.render_widget(
                    Paragraph::new(format!(" {EMPTY_MESSAGE}")).style(WARN_STYLE),
                    charts_area,
                );
            }
        }

        frame.render_widget(
            Paragraph::new(
                " \u{2190}/\u{2192}=start date  \u{2193}/\u{2191}=end date  d=group by  r=reset  q/Esc=quit",
            )
            .style(FOOTER_STYLE),
            hints_area,
        );
    }

    fn handle_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Left => self.shift(|r| r.shift_start(-1)),
            KeyCode::Right => self.shift(|r| r.shift_start(1)),
            KeyCode::Down => self.shift(|r| r.shift_end(-1)),
            KeyCode::Up => self.shift(|r| r.shift_end(1)),
            KeyCode::Char('d') => self.dimension = self.dimension.next(),
            KeyCode::Char('r') => self.range = self.session.span(),
            _ => return KeyOutcome::Redraw,
        }
        self.rerun();
        KeyOutcome::Redraw
    }

    /// Apply one terminal event. Only key presses count; Ctrl-C quits like `q`.
    fn on_event(&mut self, event: Event) -> KeyOutcome {
        let Event::Key(key) = event else {
            return KeyOutcome::Redraw;
        };
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Redraw;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }
        self.handle_key(key.code)
    }

    fn run_interactive(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard(ratatui::init());
        loop {
            terminal.0.draw(|frame| self.draw(frame))?;
            if self.on_event(event::read()?) == KeyOutcome::Quit {
                return Ok(());
            }
        }
    }

    fn shift(&mut self, f: impl FnOnce(&mut DateRange)) {
        if let Some(range) = self.range.as_mut() {
            f(range);
        }
    }
}

/// Widest bar (3..=12 cells) that fits `count` bars plus 1-cell gaps in `width`.
fn bar_width(width: u16, count: usize) -> u16 {
    let n = u16::try_from(count.max(1)).unwrap_or(u16::MAX);
    (width.saturating_sub(n) / n).clamp(3, 12)
}

/// Round a maximum up to 1, 2, 2.5 or 5 times a power of ten, for axis bounds.
fn nice_ceiling(max_val: f64) -> f64 {
    if max_val <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(max_val.log10().floor() as i32);
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|step| step * magnitude)
        .find(|&top| top >= max_val)
        .unwrap_or(max_val)
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

pub fn run(data_dir: Option<&str>, params: ReportParams) -> Result<()> {
    let session = super::open_session(data_dir)?;

    // Non-TTY: plain text to stdout
    if !std::io::stdout().is_terminal() {
        let report = session.report(&params);
        println!("{}", format_report(&session, &report));
        return Ok(());
    }

    Dashboard::new(&session, &params).run_interactive()
}
