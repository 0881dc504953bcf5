use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use super::TickerView;
use crate::indicator::names;
use crate::plan::{ChartStyle, Panel, PanelKind};

/// Renders one ticker's `ChartPlan`: the plan decides how many rows exist and
/// what goes on each, this widget only maps values onto cells.
pub struct ChartView<'a> {
    view: &'a TickerView,
}

impl<'a> ChartView<'a> {
    pub fn new(view: &'a TickerView) -> Self {
        Self { view }
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let plan = &self.view.plan;
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(row_constraints(plan.rows()))
            .split(area);

        for panel in &plan.panels {
            let Some(rect) = rows.get(panel.row - 1) else {
                continue;
            };
            match panel.kind {
                PanelKind::Price => self.render_price(panel, *rect, buf),
                PanelKind::Rsi => self.render_rsi(panel, *rect, buf),
                PanelKind::Macd => self.render_macd(panel, *rect, buf),
            }
        }
    }
}

fn row_constraints(rows: usize) -> Vec<Constraint> {
    // Price row keeps the lion's share; indicator rows split the rest.
    match rows {
        1 => vec![Constraint::Percentage(100)],
        2 => vec![Constraint::Percentage(60), Constraint::Percentage(40)],
        _ => vec![
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ],
    }
}

fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

/// Map a value into a 0-based row offset from the top of a `height`-cell lane.
fn scale_y(value: f64, min: f64, max: f64, height: usize) -> usize {
    let range = max - min;
    let range = if range < 1e-9 { 1.0 } else { range };
    let normalized = ((value - min) / range).clamp(0.0, 1.0);
    height - 1 - ((normalized * (height - 1) as f64).round() as usize).min(height - 1)
}

fn axis_labels(inner: Rect, min: f64, max: f64, buf: &mut Buffer) {
    let style = Style::default().fg(Color::DarkGray);
    buf.set_string(inner.x, inner.y, format!("{:.1}", max), style);
    buf.set_string(
        inner.x,
        inner.y + inner.height - 1,
        format!("{:.1}", min),
        style,
    );
}

impl ChartView<'_> {
    fn render_price(&self, panel: &Panel, area: Rect, buf: &mut Buffer) {
        let block = panel_block(&panel.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let bars = self.view.series.bars();
        if bars.is_empty() || inner.height < 3 || inner.width < 6 {
            return;
        }

        let chart_height = inner.height.saturating_sub(1) as usize;
        let chart_width = inner.width as usize;
        let start = bars.len().saturating_sub(chart_width);
        let visible = &bars[start..];

        let sma = panel
            .series
            .iter()
            .any(|s| s == names::SMA)
            .then(|| self.view.indicators.get(names::SMA))
            .flatten();

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for bar in visible {
            match self.view.plan.style {
                ChartStyle::Candle => {
                    min = min.min(bar.low);
                    max = max.max(bar.high);
                }
                ChartStyle::Line => {
                    min = min.min(bar.close);
                    max = max.max(bar.close);
                }
            }
        }
        if let Some(series) = sma {
            for v in series.values.iter().skip(start).flatten() {
                min = min.min(*v);
                max = max.max(*v);
            }
        }

        for (i, bar) in visible.iter().enumerate() {
            let x = inner.x + i as u16;
            match self.view.plan.style {
                ChartStyle::Line => {
                    let y = inner.y + scale_y(bar.close, min, max, chart_height) as u16;
                    buf.set_string(x, y, "●", Style::default().fg(Color::Cyan));
                }
                ChartStyle::Candle => {
                    let wick_top = scale_y(bar.high, min, max, chart_height);
                    let wick_bottom = scale_y(bar.low, min, max, chart_height);
                    for yy in wick_top..=wick_bottom {
                        buf.set_string(
                            x,
                            inner.y + yy as u16,
                            "│",
                            Style::default().fg(Color::DarkGray),
                        );
                    }
                    let body_color = if bar.is_bullish() {
                        Color::Green
                    } else {
                        Color::Red
                    };
                    let body_top = scale_y(bar.open.max(bar.close), min, max, chart_height);
                    let body_bottom = scale_y(bar.open.min(bar.close), min, max, chart_height);
                    for yy in body_top..=body_bottom {
                        buf.set_string(x, inner.y + yy as u16, "█", Style::default().fg(body_color));
                    }
                }
            }

            if let Some(series) = sma {
                if let Some(Some(v)) = series.values.get(start + i) {
                    let y = inner.y + scale_y(*v, min, max, chart_height) as u16;
                    buf.set_string(x, y, "•", Style::default().fg(Color::Yellow));
                }
            }
        }

        axis_labels(inner, min, max, buf);
    }

    fn render_rsi(&self, panel: &Panel, area: Rect, buf: &mut Buffer) {
        let block = panel_block(&panel.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(series) = self.view.indicators.get(names::RSI) else {
            return;
        };
        if inner.height < 3 || inner.width < 6 {
            return;
        }

        let chart_height = inner.height as usize;
        let chart_width = inner.width as usize;
        let start = series.values.len().saturating_sub(chart_width);
        let visible = &series.values[start..];

        // RSI is bounded, the lane is always the full 0..100 scale.
        for rule in &panel.ref_lines {
            let y = inner.y + scale_y(rule.value, 0.0, 100.0, chart_height) as u16;
            let color = if rule.value >= 50.0 {
                Color::Red
            } else {
                Color::Green
            };
            for x in inner.x..inner.x + inner.width {
                buf.set_string(x, y, "╌", Style::default().fg(color));
            }
            let label = format!("{:.0}", rule.value);
            buf.set_string(inner.x, y, label, Style::default().fg(color));
        }

        let mut drew_any = false;
        for (i, value) in visible.iter().enumerate() {
            let Some(v) = value else { continue };
            let x = inner.x + i as u16;
            let y = inner.y + scale_y(*v, 0.0, 100.0, chart_height) as u16;
            buf.set_string(x, y, "●", Style::default().fg(Color::Blue));
            drew_any = true;
        }
        if !drew_any {
            buf.set_string(
                inner.x + 1,
                inner.y + inner.height / 2,
                "window too short",
                Style::default().fg(Color::DarkGray),
            );
        }
    }

    fn render_macd(&self, panel: &Panel, area: Rect, buf: &mut Buffer) {
        let block = panel_block(&panel.title);
        let inner = block.inner(area);
        block.render(area, buf);

        let (Some(macd), Some(signal)) = (
            self.view.indicators.get(names::MACD),
            self.view.indicators.get(names::SIGNAL),
        ) else {
            return;
        };
        if inner.height < 3 || inner.width < 6 {
            return;
        }

        let chart_height = inner.height.saturating_sub(1) as usize;
        let chart_width = inner.width as usize;
        let start = macd.values.len().saturating_sub(chart_width);

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for v in macd.values.iter().skip(start).flatten() {
            min = min.min(*v);
            max = max.max(*v);
        }
        for v in signal.values.iter().skip(start).flatten() {
            min = min.min(*v);
            max = max.max(*v);
        }
        if min > max {
            return;
        }

        // Signal first so the MACD line wins shared cells.
        for (i, value) in signal.values[start..].iter().enumerate() {
            if let Some(v) = value {
                let x = inner.x + i as u16;
                let y = inner.y + scale_y(*v, min, max, chart_height) as u16;
                buf.set_string(x, y, "•", Style::default().fg(Color::Yellow));
            }
        }
        for (i, value) in macd.values[start..].iter().enumerate() {
            if let Some(v) = value {
                let x = inner.x + i as u16;
                let y = inner.y + scale_y(*v, min, max, chart_height) as u16;
                buf.set_string(x, y, "●", Style::default().fg(Color::Cyan));
            }
        }

        axis_labels(inner, min, max, buf);
    }
}
