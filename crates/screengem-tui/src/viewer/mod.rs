//! Movie browser TUI main loop.
//!
//! Requests run as spawned tasks and report back over a channel, so every
//! state transition happens on the event loop.

/// Viewer cursor state.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use screengem_api::tmdb::TmdbApi;
use tokio::sync::mpsc;

use self::state::ViewerState;
use crate::browser::{fetch_list, fetch_trailer};
use crate::links::MediaLinks;
use crate::state::{BrowserState, ListOutcome, ListRequest, Trailer, TrailerOutcome, TrailerRequest};

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Leave the viewer.
    Quit,
    /// The search input now holds this text.
    QueryChanged(String),
    /// Select the movie under the cursor.
    Select,
    /// Close the detail popup.
    Dismiss,
    /// Open the selected movie's trailer.
    OpenTrailer,
    /// Cursor up.
    MoveUp,
    /// Cursor down.
    MoveDown,
    /// Cursor up by a page.
    PageUp,
    /// Cursor down by a page.
    PageDown,
    /// Nothing to do.
    None,
}

/// Maps a key press to an action given the current state.
#[must_use]
pub fn handle_key(browser: &BrowserState, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if browser.selection().is_some() {
        return match key.code {
            KeyCode::Char('o') => Action::OpenTrailer,
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Action::Dismiss,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter => Action::Select,
        KeyCode::Up => Action::MoveUp,
        KeyCode::Down => Action::MoveDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Backspace => {
            let mut query = String::from(browser.query());
            if query.pop().is_some() {
                Action::QueryChanged(query)
            } else {
                Action::None
            }
        }
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let mut query = String::from(browser.query());
            query.push(c);
            Action::QueryChanged(query)
        }
        _ => Action::None,
    }
}

/// Settled request sent back to the event loop.
enum Response {
    List {
        generation: u64,
        outcome: ListOutcome,
    },
    Trailer {
        generation: u64,
        outcome: TrailerOutcome,
    },
}

/// Runs the movie browser TUI until the user quits.
///
/// Must be called from within a tokio runtime.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_viewer<C>(api: Arc<C>, links: MediaLinks, language: String) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = Session {
        api,
        language,
        browser: BrowserState::new(links),
        view: ViewerState::new(),
        tx,
    };

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut terminal = restore_on_err(enter_terminal(), || {
        if let Err(e) = restore_terminal() {
            tracing::warn!("Failed to restore terminal: {e:#}");
        }
    })?;

    let result = run_event_loop(&mut terminal, &mut session, rx).await;

    // Cleanup (always attempt even if event loop failed)
    restore_terminal()?;

    result
}

/// Switches to the alternate screen and wraps stdout in a terminal.
fn enter_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")
}

/// Leaves raw mode and the alternate screen.
fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    Ok(())
}

/// Runs `restore` when `result` is an error, then passes `result` through.
fn restore_on_err<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

struct Session<C> {
    api: Arc<C>,
    language: String,
    browser: BrowserState,
    view: ViewerState,
    tx: mpsc::UnboundedSender<Response>,
}

impl<C> Session<C>
where
    C: TmdbApi + Send + Sync + 'static,
{
    fn spawn_list(&self, request: ListRequest) {
        let api = Arc::clone(&self.api);
        let language = self.language.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = fetch_list(api.as_ref(), &request.target, &language).await;
            let response = Response::List {
                generation: request.generation,
                outcome,
            };
            if tx.send(response).is_err() {
                tracing::debug!("Viewer closed before list response arrived");
            }
        });
    }

    fn spawn_trailer(&self, request: TrailerRequest) {
        let api = Arc::clone(&self.api);
        let language = self.language.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = fetch_trailer(api.as_ref(), request.movie_id, &language).await;
            let response = Response::Trailer {
                generation: request.generation,
                outcome,
            };
            if tx.send(response).is_err() {
                tracing::debug!("Viewer closed before trailer response arrived");
            }
        });
    }

    /// Applies an action. Returns `true` to exit.
    fn apply(&mut self, action: Action, page_size: usize) -> bool {
        let len = self.browser.movies().len();
        match action {
            Action::Quit => return true,
            Action::QueryChanged(query) => {
                let request = self.browser.on_query_changed(query);
                self.spawn_list(request);
            }
            Action::Select => {
                if let Some(movie) = self.view.current_movie(&self.browser).cloned() {
                    let request = self.browser.select(movie);
                    self.spawn_trailer(request);
                }
            }
            Action::Dismiss => self.browser.dismiss(),
            Action::OpenTrailer => self.open_trailer(),
            Action::MoveUp => self.view.move_up(),
            Action::MoveDown => self.view.move_down(len),
            Action::PageUp => self.view.page_up(page_size),
            Action::PageDown => self.view.page_down(page_size, len),
            Action::None => {}
        }
        false
    }

    fn settle(&mut self, response: Response) {
        match response {
            Response::List {
                generation,
                outcome,
            } => {
                self.browser.settle_list(generation, outcome);
            }
            Response::Trailer {
                generation,
                outcome,
            } => {
                self.browser.settle_trailer(generation, outcome);
            }
        }
    }

    /// Opens the selected movie's trailer with the system opener.
    fn open_trailer(&self) {
        let Some(Trailer::Playable(url)) = self.browser.selection().and_then(|m| m.trailer.as_ref())
        else {
            return;
        };
        if let Err(e) = open::that(url) {
            tracing::warn!(url = %url, error = %e, "Failed to open trailer");
        }
    }
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &mut Session<C>,
    mut rx: mpsc::UnboundedReceiver<Response>,
) -> Result<()>
where
    C: TmdbApi + Send + Sync + 'static,
{
    let mut events = EventStream::new();
    let mut main_area_height: u16 = 0;

    let request = session.browser.begin_catalog();
    session.spawn_list(request);

    loop {
        session.view.sync(&session.browser);
        terminal
            .draw(|frame| {
                main_area_height = ui::draw(frame, &session.browser, &mut session.view);
            })
            .context("failed to draw TUI")?;

        let page_size = usize::from(main_area_height.saturating_sub(4));

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let action = handle_key(&session.browser, key);
                    if session.apply(action, page_size) {
                        return Ok(());
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read event"),
                None => return Ok(()),
            },
            Some(response) = rx.recv() => session.settle(response),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use screengem_api::tmdb::TmdbMovieListResponse;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_setup_failure_restores_terminal() {
        // Arrange
        let mut restored = false;

        // Act
        let result: Result<()> =
            restore_on_err(Err(anyhow::anyhow!("no tty")), || restored = true);

        // Assert
        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "no tty");
    }

    #[test]
    fn test_setup_success_leaves_terminal_alone() {
        // Arrange
        let mut restored = false;

        // Act
        let result = restore_on_err(Ok(7), || restored = true);

        // Assert
        assert!(!restored);
        assert_eq!(result.unwrap(), 7);
    }

    fn browser_with_selection() -> BrowserState {
        let movie = serde_json::from_value(serde_json::json!({ "id": 42, "title": "The Answer" }))
            .unwrap();
        let mut browser = BrowserState::new(MediaLinks::default());
        let request = browser.begin_catalog();
        browser.settle_list(
            request.generation,
            Ok(TmdbMovieListResponse {
                page: 1,
                results: Some(vec![movie]),
                total_pages: 1,
                total_results: 1,
            }),
        );
        let selected = browser.movies().first().cloned().unwrap();
        browser.select(selected);
        browser
    }

    #[test]
    fn test_typing_extends_query() {
        // Arrange
        let mut browser = BrowserState::new(MediaLinks::default());
        let _ = browser.on_query_changed("bat");

        // Act
        let action = handle_key(&browser, key(KeyCode::Char('m')));

        // Assert
        assert_eq!(action, Action::QueryChanged(String::from("batm")));
    }

    #[test]
    fn test_q_is_typed_in_list() {
        // Arrange
        let browser = BrowserState::new(MediaLinks::default());

        // Act
        let action = handle_key(&browser, key(KeyCode::Char('q')));

        // Assert
        assert_eq!(action, Action::QueryChanged(String::from("q")));
    }

    #[test]
    fn test_backspace_shortens_query() {
        // Arrange
        let mut browser = BrowserState::new(MediaLinks::default());
        let _ = browser.on_query_changed("b");

        // Act
        let action = handle_key(&browser, key(KeyCode::Backspace));

        // Assert
        assert_eq!(action, Action::QueryChanged(String::new()));
    }

    #[test]
    fn test_backspace_on_empty_query_does_nothing() {
        // Arrange
        let browser = BrowserState::new(MediaLinks::default());

        // Act
        let action = handle_key(&browser, key(KeyCode::Backspace));

        // Assert
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_list_navigation_keys() {
        // Arrange
        let browser = BrowserState::new(MediaLinks::default());

        // Act & Assert
        assert_eq!(handle_key(&browser, key(KeyCode::Up)), Action::MoveUp);
        assert_eq!(handle_key(&browser, key(KeyCode::Down)), Action::MoveDown);
        assert_eq!(handle_key(&browser, key(KeyCode::PageUp)), Action::PageUp);
        assert_eq!(handle_key(&browser, key(KeyCode::PageDown)), Action::PageDown);
        assert_eq!(handle_key(&browser, key(KeyCode::Enter)), Action::Select);
        assert_eq!(handle_key(&browser, key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        // Arrange
        let list = BrowserState::new(MediaLinks::default());
        let popup = browser_with_selection();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);

        // Act & Assert
        assert_eq!(handle_key(&list, ctrl_c), Action::Quit);
        assert_eq!(handle_key(&popup, ctrl_c), Action::Quit);
    }

    #[test]
    fn test_popup_keys() {
        // Arrange
        let browser = browser_with_selection();

        // Act & Assert
        assert_eq!(handle_key(&browser, key(KeyCode::Char('o'))), Action::OpenTrailer);
        assert_eq!(handle_key(&browser, key(KeyCode::Char('q'))), Action::Dismiss);
        assert_eq!(handle_key(&browser, key(KeyCode::Esc)), Action::Dismiss);
        assert_eq!(handle_key(&browser, key(KeyCode::Enter)), Action::Dismiss);
        assert_eq!(handle_key(&browser, key(KeyCode::Char('x'))), Action::None);
    }
}
