use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use url::Url;

use pagetabs_core::{images::ImageFetcher, AppConfig, TabKey, TabSet};
use pagetabs_tui::{
    app::App,
    event::{AppEvent, EventHandler, ImageLoadResult, MeasureResult},
    input::{handle_key_event, handle_mouse_event},
    widgets,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let tabs = TabSet::from_config(&config.tabs)?;
    let fetcher = Arc::new(ImageFetcher::new(&config.images)?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pagetabs"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, config, tabs, fetcher).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: Arc<AppConfig>,
    tabs: TabSet,
    fetcher: Arc<ImageFetcher>,
) -> Result<()> {
    let (width, _) = terminal::size()?;
    let mut app = App::new(config.clone(), tabs, width);

    let event_handler = EventHandler::new(config.ui.tick_rate_ms, &config.ui.scroll);

    let measure_timeout = match config.ui.measure_timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };

    // Create channel for async image loading results
    let (img_tx, mut img_rx) = mpsc::unbounded_channel::<ImageLoadResult>();

    // Create channel for measurement rounds
    let (measure_tx, mut measure_rx) = mpsc::unbounded_channel::<MeasureResult>();

    for tab in app.tabs.iter() {
        spawn_image_load(fetcher.clone(), tab.key.clone(), tab.image.clone(), img_tx.clone());
    }

    spawn_measurement(&mut app, measure_tx.clone(), measure_timeout);

    let mut needs_fast_update = false;

    // Main loop
    loop {
        // Process any completed image loads (non-blocking)
        while let Ok(result) = img_rx.try_recv() {
            app.handle_image_result(result);
        }

        // Process finished measurement rounds (non-blocking)
        while let Ok(result) = measure_rx.try_recv() {
            if app.apply_measurements(result) {
                spawn_measurement(&mut app, measure_tx.clone(), measure_timeout);
            }
        }

        app.update(Instant::now());

        // Draw UI
        terminal.draw(|frame| widgets::draw(frame, &mut app))?;

        // Labels are laid out now; hand their boxes to any waiting round
        app.report_tab_layout();

        // Handle events (use faster tick rate during animations)
        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, &app, &app.keymap);
                    app.handle_action(action, Instant::now());
                }
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse);
                    app.handle_action(action, Instant::now());
                }
                AppEvent::Resize(width, _) => {
                    tracing::debug!("Terminal resized to width {}", width);
                    app.resize(width);
                    spawn_measurement(&mut app, measure_tx.clone(), measure_timeout);
                }
                AppEvent::Tick => {}
            }
        }

        // Update fast update flag for next iteration
        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Start a measurement round and wait for it in the background
fn spawn_measurement(
    app: &mut App,
    tx: mpsc::UnboundedSender<MeasureResult>,
    timeout: Option<Duration>,
) {
    let (generation, pending) = app.begin_measurement();
    tokio::spawn(async move {
        let outcome = pending.wait(timeout).await;
        let _ = tx.send(MeasureResult {
            generation,
            outcome,
        });
    });
}

fn spawn_image_load(
    fetcher: Arc<ImageFetcher>,
    key: TabKey,
    url: Url,
    tx: mpsc::UnboundedSender<ImageLoadResult>,
) {
    tokio::spawn(async move {
        match fetcher.fetch(&url).await {
            Ok(image) => {
                let _ = tx.send(ImageLoadResult::Success { key, image });
            }
            Err(e) => {
                let _ = tx.send(ImageLoadResult::Failure {
                    key,
                    error: e.to_string(),
                });
            }
        }
    });
}
