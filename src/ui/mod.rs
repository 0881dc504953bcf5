pub mod chart;
pub mod dashboard;

use std::collections::HashMap;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::Config;
use crate::error::AppError;
use crate::feed::Period;
use crate::indicator::{compute_indicators, IndicatorConfig, IndicatorSet};
use crate::model::{PriceSeries, SeriesSummary};
use crate::plan::{plan_chart, ChartPlan, ChartStyle};

use chart::ChartView;
use dashboard::{KeybindBar, LogPanel, StatusBar, SummaryPanel};

/// Everything derived from one ticker's series in the current tick.
/// Replaced wholesale on the next tick; nothing mutates across ticks.
pub struct TickerView {
    pub series: PriceSeries,
    pub summary: Option<SeriesSummary>,
    pub indicators: IndicatorSet,
    pub plan: ChartPlan,
}

pub struct AppState {
    pub tickers: Vec<String>,
    pub selected: usize,
    pub period: Period,
    pub chart_style: ChartStyle,
    pub indicator_config: IndicatorConfig,
    pub refresh_secs: u64,
    pub paused: bool,
    pub tick_count: u64,
    pub last_update_ms: Option<i64>,
    pub log_messages: Vec<String>,
    views: HashMap<String, TickerView>,
    max_log_lines: usize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            tickers: config.dashboard.watched_tickers(),
            selected: 0,
            period: config.dashboard.period,
            chart_style: config.dashboard.chart_style,
            indicator_config: config.indicators,
            refresh_secs: config.dashboard.refresh_secs,
            paused: false,
            tick_count: 0,
            last_update_ms: None,
            log_messages: Vec::new(),
            views: HashMap::new(),
            max_log_lines: config.ui.max_log_lines,
        }
    }

    pub fn selected_ticker(&self) -> &str {
        self.tickers
            .get(self.selected)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn selected_view(&self) -> Option<&TickerView> {
        self.views.get(self.selected_ticker())
    }

    pub fn view(&self, ticker: &str) -> Option<&TickerView> {
        self.views.get(ticker)
    }

    pub fn push_log(&mut self, msg: String) {
        self.log_messages.push(msg);
        if self.log_messages.len() > self.max_log_lines {
            self.log_messages.remove(0);
        }
    }

    pub fn next_ticker(&mut self) {
        if !self.tickers.is_empty() {
            self.selected = (self.selected + 1) % self.tickers.len();
        }
    }

    pub fn prev_ticker(&mut self) {
        if !self.tickers.is_empty() {
            self.selected = (self.selected + self.tickers.len() - 1) % self.tickers.len();
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        let msg = if self.paused {
            "Refresh paused"
        } else {
            "Refresh resumed"
        };
        self.push_log(msg.to_string());
    }

    pub fn toggle_sma(&mut self) {
        self.indicator_config.sma_enabled = !self.indicator_config.sma_enabled;
        self.log_toggle("SMA", self.indicator_config.sma_enabled);
        self.rebuild_views();
    }

    pub fn toggle_rsi(&mut self) {
        self.indicator_config.rsi_enabled = !self.indicator_config.rsi_enabled;
        self.log_toggle("RSI", self.indicator_config.rsi_enabled);
        self.rebuild_views();
    }

    pub fn toggle_macd(&mut self) {
        self.indicator_config.macd_enabled = !self.indicator_config.macd_enabled;
        self.log_toggle("MACD", self.indicator_config.macd_enabled);
        self.rebuild_views();
    }

    pub fn cycle_chart_style(&mut self) {
        self.chart_style = self.chart_style.toggled();
        self.push_log(format!("Chart style: {}", self.chart_style));
        self.rebuild_views();
    }

    /// Switch to the next lookback period. Cached views are stale for the new
    /// period, so they are dropped; the caller triggers a fresh fetch.
    pub fn cycle_period(&mut self) {
        self.period = self.period.next();
        self.views.clear();
        self.push_log(format!("Period switched to {}", self.period));
    }

    fn log_toggle(&mut self, name: &str, enabled: bool) {
        let state = if enabled { "ON" } else { "OFF" };
        self.push_log(format!("{} {}", name, state));
    }

    /// Fold one fetch batch into the dashboard: recompute indicators and the
    /// chart plan per ticker, keep per-ticker failures in the log.
    pub fn apply_batch(
        &mut self,
        series: HashMap<String, PriceSeries>,
        errors: HashMap<String, String>,
        fetched_at_ms: i64,
    ) {
        for (ticker, series) in series {
            match self.build_view(series) {
                Ok(view) => {
                    self.views.insert(ticker, view);
                }
                Err(e) => {
                    self.views.remove(&ticker);
                    self.push_log(format!("[WARN] {}", e));
                }
            }
        }
        for (ticker, detail) in errors {
            self.push_log(format!("[WARN] {}: {}", ticker, detail));
        }
        self.tick_count += 1;
        self.last_update_ms = Some(fetched_at_ms);
    }

    /// Recompute all views from the series already on hand, e.g. after an
    /// indicator toggle. No refetch.
    fn rebuild_views(&mut self) {
        let old = std::mem::take(&mut self.views);
        for (ticker, view) in old {
            match self.build_view(view.series) {
                Ok(view) => {
                    self.views.insert(ticker, view);
                }
                Err(e) => {
                    self.push_log(format!("[WARN] {}", e));
                }
            }
        }
    }

    fn build_view(&self, series: PriceSeries) -> Result<TickerView, AppError> {
        let indicators = compute_indicators(&series, &self.indicator_config)?;
        let plan = plan_chart(&indicators, self.chart_style);
        let summary = series.summary();
        Ok(TickerView {
            series,
            summary,
            indicators,
            plan,
        })
    }
}

pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),  // status bar
            Constraint::Length(7),  // summary metrics
            Constraint::Min(10),    // chart panels
            Constraint::Length(6),  // log
            Constraint::Length(1),  // keybinds
        ])
        .split(frame.area());

    frame.render_widget(
        StatusBar {
            tickers: &state.tickers,
            selected: state.selected,
            period: state.period,
            chart_style: state.chart_style,
            paused: state.paused,
            tick_count: state.tick_count,
            last_update_ms: state.last_update_ms,
        },
        chunks[0],
    );

    let view = state.selected_view();
    frame.render_widget(
        SummaryPanel::new(
            state.selected_ticker(),
            view.and_then(|v| v.summary.as_ref()),
            view.map(|v| v.indicators.short_window()).unwrap_or(&[]),
        ),
        chunks[1],
    );

    match view {
        Some(view) => frame.render_widget(ChartView::new(view), chunks[2]),
        None => {
            let block = Block::default()
                .title(format!(" {} ", state.selected_ticker()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray));
            frame.render_widget(
                Paragraph::new("waiting for data...")
                    .style(Style::default().fg(Color::DarkGray))
                    .block(block),
                chunks[2],
            );
        }
    }

    frame.render_widget(LogPanel::new(&state.log_messages), chunks[3]);
    frame.render_widget(KeybindBar, chunks[4]);
}
