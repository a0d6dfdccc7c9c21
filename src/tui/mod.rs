//! Interactive terminal dashboard
//!
//! Five inputs, a Search button and the two strategy tables. Searches run as
//! background tasks; their outcomes come back over a channel and are applied
//! by the UI loop, which is the only writer of dashboard state.

pub mod app;
pub mod ui;

use anyhow::Result;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use futures_util::StreamExt;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::Terminal;
use std::io;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{FetchResult, StrategyClient};
use crate::dashboard::Dashboard;
use crate::fanout;
use crate::types::ResultSet;

pub use app::{Action, App, Focus};

/// Run the dashboard until the user quits
pub async fn run(dashboard: Dashboard, client: StrategyClient) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(dashboard);
    let result = event_loop(&mut terminal, &mut app, client).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Dashboard closed");
    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: StrategyClient,
) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchResult<ResultSet>>();
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        tokio::select! {
            Some(outcome) = rx.recv() => {
                app.apply_outcome(outcome);
            }
            event = events.next() => {
                let action = match event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key)
                    }
                    Some(Ok(Event::Mouse(mouse))) => app.handle_mouse(mouse),
                    Some(Ok(_)) => Action::None,
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                };

                match action {
                    Action::None => {}
                    Action::Quit => return Ok(()),
                    Action::Search(filters) => {
                        debug!("Spawning search for {:?}", filters.symbols);
                        let client = client.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let outcome = fanout::fetch_all(&client, &filters).await;
                            // Receiver only goes away when the dashboard exits.
                            let _ = tx.send(outcome);
                        });
                    }
                }
            }
        }
    }
}
