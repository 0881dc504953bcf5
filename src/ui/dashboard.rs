use chrono::{Local, TimeZone};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::feed::Period;
use crate::model::SeriesSummary;
use crate::plan::ChartStyle;

/// Per-ticker metric grid shown above the chart.
pub struct SummaryPanel<'a> {
    ticker: &'a str,
    summary: Option<&'a SeriesSummary>,
    short_window: &'a [String],
}

impl<'a> SummaryPanel<'a> {
    pub fn new(
        ticker: &'a str,
        summary: Option<&'a SeriesSummary>,
        short_window: &'a [String],
    ) -> Self {
        Self {
            ticker,
            summary,
            short_window,
        }
    }
}

impl Widget for SummaryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} Summary ", self.ticker))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let Some(s) = self.summary else {
            Paragraph::new("---")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .render(area, buf);
            return;
        };

        let change_color = if s.change > 0.0 {
            Color::Green
        } else if s.change < 0.0 {
            Color::Red
        } else {
            Color::White
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled("Last:   ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:>10.2}", s.last_price),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Change: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:>+10.2}  ({:+.2}%)", s.change, s.change_pct),
                    Style::default().fg(change_color),
                ),
            ]),
            Line::from(vec![
                Span::styled("High:   ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:>10.2}", s.period_high), Style::default().fg(Color::White)),
                Span::styled("   Low: ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:>10.2}", s.period_low), Style::default().fg(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Volume: ", Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:>10.0}", s.volume), Style::default().fg(Color::White)),
            ]),
        ];

        if !self.short_window.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("window too short for: {}", self.short_window.join(", ")),
                Style::default().fg(Color::Yellow),
            )));
        }

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct StatusBar<'a> {
    pub tickers: &'a [String],
    pub selected: usize,
    pub period: Period,
    pub chart_style: ChartStyle,
    pub paused: bool,
    pub tick_count: u64,
    pub last_update_ms: Option<i64>,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::styled(" ", Style::default())];
        for (i, ticker) in self.tickers.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", ticker), style));
        }

        let updated = self
            .last_update_ms
            .and_then(|ms| Local.timestamp_millis_opt(ms).single())
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "---".to_string());

        spans.push(Span::styled(
            format!("  {} | {} | updated {}", self.period, self.chart_style, updated),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            format!(" | tick {}", self.tick_count),
            Style::default().fg(Color::DarkGray),
        ));
        if self.paused {
            spans.push(Span::styled(
                "  PAUSED",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner_height = block.inner(area).height as usize;

        let visible = if self.messages.len() > inner_height {
            &self.messages[self.messages.len() - inner_height..]
        } else {
            self.messages
        };
        let lines: Vec<Line> = visible
            .iter()
            .map(|msg| {
                let color = if msg.starts_with("[WARN]") || msg.starts_with("[ERROR]") {
                    Color::Yellow
                } else {
                    Color::Gray
                };
                Line::from(Span::styled(msg.as_str(), Style::default().fg(color)))
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let help = " q quit | p pause | </> ticker | s SMA | r RSI | m MACD | c style | t period | f refetch";
        Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))).render(area, buf);
    }
}
