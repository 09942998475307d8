//! TUI rendering logic for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Row, Table, Wrap};

use super::state::ViewerState;
use crate::state::{BrowserState, Movie, Trailer};

/// Text shown while the latest list request is pending.
const LOADING: &str = "Loading...";

/// Draws the browser UI. Returns the main content area height for page size calculation.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, browser: &BrowserState, view: &mut ViewerState) -> u16 {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search input
            Constraint::Length(1), // status line
            Constraint::Min(5),    // movie table
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_search(frame, chunks[0], browser);
    draw_status(frame, chunks[1], browser);
    draw_movies(frame, chunks[2], browser, view);
    draw_footer(frame, chunks[3], browser);

    if let Some(movie) = browser.selection() {
        draw_detail(frame, browser, movie);
    }

    chunks[2].height
}

fn draw_search(frame: &mut Frame, area: Rect, browser: &BrowserState) {
    let input = Paragraph::new(browser.query())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    frame.render_widget(input, area);
}

fn draw_status(frame: &mut Frame, area: Rect, browser: &BrowserState) {
    frame.render_widget(Paragraph::new(status_line(browser)), area);
}

/// Error in red followed by the loading indicator; each shown on its own flag.
fn status_line(browser: &BrowserState) -> Line<'_> {
    let mut spans = Vec::with_capacity(3);
    if let Some(error) = browser.error() {
        spans.push(Span::styled(error, Style::default().fg(Color::Red)));
    }
    if browser.is_loading() {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(LOADING, Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn draw_movies(frame: &mut Frame, area: Rect, browser: &BrowserState, view: &mut ViewerState) {
    let header = Row::new(vec!["ID", "Title", "Released"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = browser
        .movies()
        .iter()
        .map(|m| {
            Row::new(vec![
                m.id.to_string(),
                m.title.clone(),
                m.release_date
                    .clone()
                    .unwrap_or_else(|| String::from("--")),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Min(20),
        Constraint::Length(12),
    ];

    let title = format!(" Movies ({}) ", browser.movies().len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut view.table_state);
}

fn draw_footer(frame: &mut Frame, area: Rect, browser: &BrowserState) {
    let help_text = if browser.selection().is_some() {
        "o: open trailer  Esc/Enter/q: close"
    } else {
        "Type to search  \u{2191}\u{2193}: move  PgUp/PgDn: page  Enter: details  Esc: quit"
    };
    let footer = Paragraph::new(Line::from(help_text)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the detail popup for the selected movie.
fn draw_detail(frame: &mut Frame, browser: &BrowserState, movie: &Movie) {
    let area = popup_area(frame.area(), 70, 60);
    let label = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Released: ", label),
            Span::raw(movie.release_date.as_deref().unwrap_or("--")),
        ]),
        Line::from(vec![
            Span::styled("Poster: ", label),
            Span::raw(
                browser
                    .links()
                    .poster_url(movie.poster_path.as_deref())
                    .unwrap_or_else(|| String::from("--")),
            ),
        ]),
    ];
    match &movie.trailer {
        Some(Trailer::Playable(url)) => lines.push(Line::from(vec![
            Span::styled("Trailer: ", label),
            Span::styled(url.as_str(), Style::default().fg(Color::Green)),
        ])),
        Some(Trailer::NotFound) => lines.push(Line::from(vec![
            Span::styled("Trailer: ", label),
            Span::raw("none found"),
        ])),
        None => {}
    }
    lines.push(Line::default());
    lines.push(Line::from(movie.overview.as_deref().unwrap_or_default()));

    let detail = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", movie.title))
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(detail, area);
}

/// Centers a rectangle of the given percentage size inside `area`.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}
