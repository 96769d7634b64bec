pub mod app;
pub mod render;

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::Backend, Terminal};

use crate::application::todo_list_view::Request;
use crate::domain::api::TodoApi;
use app::App;

/// How long to wait for a key before checking for finished requests again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Starts the initial load, then draws, applies finished requests and
/// dispatches keys until the user quits. Requests still in flight at exit
/// are dropped with the runtime.
pub async fn run<A: TodoApi, B: Backend>(terminal: &mut Terminal<B>, mut app: App<A>) -> Result<()> {
    app.dispatch(Request::Load);

    while !app.should_quit {
        app.drain_outcomes();
        terminal.draw(|f| render::draw(f, &mut app))?;
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }
    Ok(())
}
