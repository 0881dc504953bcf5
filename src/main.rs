use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;

use stockdeck::config::Config;
use stockdeck::event::AppEvent;
use stockdeck::feed::{Period, QuoteClient};
use stockdeck::input::{parse_key, UiCommand};
use stockdeck::ui::{self, AppState};

fn spawn_fetch(
    client: Arc<QuoteClient>,
    tickers: Vec<String>,
    period: Period,
    tx: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let batch = client.fetch_batch(&tickers, period).await;
        let _ = tx
            .send(AppEvent::QuoteBatch {
                series: batch.series,
                errors: batch.errors,
                fetched_at_ms: chrono::Utc::now().timestamp_millis(),
            })
            .await;
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // Init tracing (log to file so it doesn't interfere with the TUI)
    let log_file = std::fs::File::create("stockdeck.log")?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        tickers = ?config.dashboard.watched_tickers(),
        period = %config.dashboard.period,
        refresh_secs = config.dashboard.refresh_secs,
        "Starting stockdeck"
    );

    let client = Arc::new(QuoteClient::new(
        &config.dashboard.quote_base_url,
        Duration::from_secs(config.dashboard.cache_ttl_secs),
    )?);

    let (app_tx, mut app_rx) = mpsc::channel::<AppEvent>(64);
    let (key_tx, mut key_rx) = mpsc::channel::<crossterm::event::KeyEvent>(64);

    // Blocking reader thread for terminal input; the channel closing on
    // shutdown ends it.
    std::thread::spawn(move || loop {
        match crossterm::event::read() {
            Ok(Event::Key(key)) => {
                if key_tx.blocking_send(key).is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(_) => break,
        }
    });

    let mut state = AppState::new(&config);
    state.push_log(format!(
        "Watching {} tickers, refresh every {}s",
        state.tickers.len(),
        state.refresh_secs
    ));

    let mut terminal = ratatui::init();
    let mut refresh = tokio::time::interval(Duration::from_secs(config.dashboard.refresh_secs));
    let mut frame = tokio::time::interval(Duration::from_millis(config.ui.frame_rate_ms));

    let mut running = true;
    while running {
        tokio::select! {
            _ = refresh.tick() => {
                if !state.paused {
                    spawn_fetch(client.clone(), state.tickers.clone(), state.period, app_tx.clone());
                }
            }
            _ = frame.tick() => {
                terminal.draw(|f| ui::render(f, &state))?;
            }
            Some(event) = app_rx.recv() => match event {
                AppEvent::QuoteBatch { series, errors, fetched_at_ms } => {
                    state.apply_batch(series, errors, fetched_at_ms);
                }
                AppEvent::LogMessage(msg) => state.push_log(msg),
                AppEvent::Error(msg) => {
                    tracing::error!(error = %msg, "background task failed");
                    state.push_log(format!("[ERROR] {}", msg));
                }
            },
            Some(key) = key_rx.recv() => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let Some(cmd) = parse_key(&key.code) else { continue };
                match cmd {
                    UiCommand::Quit => running = false,
                    UiCommand::TogglePause => state.toggle_pause(),
                    UiCommand::NextTicker => state.next_ticker(),
                    UiCommand::PrevTicker => state.prev_ticker(),
                    UiCommand::ToggleSma => state.toggle_sma(),
                    UiCommand::ToggleRsi => state.toggle_rsi(),
                    UiCommand::ToggleMacd => state.toggle_macd(),
                    UiCommand::CycleChartStyle => state.cycle_chart_style(),
                    UiCommand::CyclePeriod => {
                        state.cycle_period();
                        spawn_fetch(client.clone(), state.tickers.clone(), state.period, app_tx.clone());
                    }
                    UiCommand::RefreshNow => {
                        spawn_fetch(client.clone(), state.tickers.clone(), state.period, app_tx.clone());
                    }
                }
            }
        }
    }

    ratatui::restore();
    tracing::info!("stockdeck stopped");
    Ok(())
}
