//! Dashboard rendering

use ratatui::layout::{Alignment, Constraint, Direction, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use super::app::{App, Focus, HeaderRegion};
use crate::table::{Presentation, TableView};
use crate::types::Strategy;

const INPUTS: [(Focus, &str); 5] = [
    (Focus::Tickers, "Tickers (comma-sep)"),
    (Focus::MinRoi, "Min ROI %"),
    (Focus::MinDte, "Min DTE"),
    (Focus::MaxDte, "Max DTE"),
    (Focus::MaxIdeas, "# of Ideas"),
];

const COLUMN_SPACING: u16 = 1;

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(6),
        ])
        .split(frame.area());

    let title = Paragraph::new(Line::from(Span::styled(
        "Wheel Strategy Dashboard",
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    draw_inputs(frame, app, chunks[1]);
    draw_controls(frame, app, chunks[2]);

    let tables = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    let mut regions = Vec::new();
    for (strategy, area) in Strategy::ALL.into_iter().zip(tables.iter()) {
        regions.extend(draw_table(frame, app, strategy, *area));
    }
    app.header_regions = regions;
}

fn draw_inputs(frame: &mut Frame, app: &App, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
            Constraint::Percentage(18),
        ])
        .split(area);

    for ((focus, label), cell) in INPUTS.iter().zip(cells.iter()) {
        let focused = app.focus == *focus;
        let mut text = app.buffers.buffer(*focus).cloned().unwrap_or_default();
        if focused {
            text.push('▏');
        }
        let input = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border_style(focused))
                .title(*label),
        );
        frame.render_widget(input, *cell);
    }
}

fn draw_controls(frame: &mut Frame, app: &mut App, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(12), Constraint::Min(10)])
        .split(area);

    let focused = app.focus == Focus::SearchButton;
    let button = Paragraph::new(Span::styled(
        "Search",
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .style(Style::default().bg(Color::Blue)),
    );
    frame.render_widget(button, cells[0]);
    app.search_button = cells[0];

    let status = if app.dashboard.is_loading() {
        Line::from(Span::styled("Loading...", Style::default().fg(Color::Yellow)))
    } else if let Some(message) = app.input_error.as_deref() {
        Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red)))
    } else if let Some(message) = app.dashboard.last_error() {
        Line::from(Span::styled(
            format!("Search failed: {}", message),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from(Span::styled(
            "Tab: next field  Enter: search/sort  ←/→: column  click header: sort  Esc: quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    let status = Paragraph::new(status)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    frame.render_widget(status, cells[1]);
}

/// Cell areas of each column inside `inner`, laid out the way the table
/// widget lays out its columns. Columns that do not fit are shrunk.
fn column_rects(widths: &[u16], inner: Rect) -> Vec<Rect> {
    Layout::horizontal(widths.iter().map(|w| Constraint::Length(*w)))
        .flex(Flex::Start)
        .spacing(COLUMN_SPACING)
        .split(inner)
        .to_vec()
}

/// Clickable header cells; the header is the first row of each column rect
fn header_regions(strategy: Strategy, view: &TableView<'_>, rects: &[Rect]) -> Vec<HeaderRegion> {
    view.columns
        .iter()
        .zip(rects)
        .filter(|(_, rect)| rect.width > 0 && rect.height > 0)
        .map(|(column, rect)| HeaderRegion {
            strategy,
            column: column.clone(),
            area: Rect::new(rect.x, rect.y, rect.width, 1),
        })
        .collect()
}

fn draw_table(frame: &mut Frame, app: &App, strategy: Strategy, area: Rect) -> Vec<HeaderRegion> {
    let focused = app.focus == Focus::Table(strategy);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style(focused))
        .title(strategy.title());

    let Some(presentation) = app.dashboard.presentation(strategy) else {
        let loading = Paragraph::new("Loading...")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(loading, area);
        return Vec::new();
    };

    let view = match presentation {
        Presentation::NoData { title } => {
            let placeholder = Paragraph::new(Presentation::placeholder(title))
                .style(Style::default().fg(Color::Gray))
                .block(block);
            frame.render_widget(placeholder, area);
            return Vec::new();
        }
        Presentation::Table(view) => view,
    };

    let widths: Vec<u16> = view
        .column_widths()
        .into_iter()
        .map(|w| u16::try_from(w).unwrap_or(u16::MAX))
        .collect();
    let rects = column_rects(&widths, block.inner(area));
    let cursor = app.column_cursor(strategy);
    let active = Style::default().bg(Color::LightBlue).fg(Color::Black);

    let header = Row::new(view.columns.iter().enumerate().map(|(i, column)| {
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if view.sort.is_active(column) {
            style = style.patch(active);
        }
        if focused && i == cursor {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        }
        Cell::from(view.header_label(column)).style(style)
    }));

    let rows = view.formatted_rows().into_iter().map(|cells| {
        Row::new(cells.into_iter().zip(&view.columns).map(|(text, column)| {
            let cell = Cell::from(text);
            if view.sort.is_active(column) {
                cell.style(Style::default().bg(Color::Blue))
            } else {
                cell
            }
        }))
    });

    let table = Table::new(rows, rects.iter().map(|r| Constraint::Length(r.width)))
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .block(block);
    frame.render_widget(table, area);

    header_regions(strategy, &view, &rects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::Dashboard;
    use crate::table::{present, SortState};
    use crate::types::{CandidateRow, ResultSet};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    /// A CSP row with the backend's usual field set; its columns need 72
    /// cells including spacing
    fn wide_row() -> CandidateRow {
        CandidateRow::new()
            .with("ticker", "AAPL")
            .with("symbol", "O:AAPL250620P00180000")
            .with("strike", 180.0)
            .with("expiration", "2025-06-20")
            .with("bid", 1.25)
            .with("ask", 1.31)
            .with("roi_%", 0.69)
            .with("dte", 14.0)
            .with("delta", -0.21)
    }

    fn app_with_rows(rows: Vec<CandidateRow>) -> App {
        let mut dashboard = Dashboard::default();
        dashboard.begin_search();
        dashboard
            .finish_search(Ok(ResultSet { csp: rows, cc: vec![] }))
            .unwrap();
        App::new(dashboard)
    }

    fn rendered(terminal: &Terminal<TestBackend>, area: Rect) -> String {
        let buffer = terminal.backend().buffer();
        (area.x..area.x + area.width)
            .map(|x| buffer[(x, area.y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_header_regions_follow_column_widths() {
        let rows = vec![CandidateRow::new().with("ticker", "AAPL").with("strike", 180.0)];
        let sort = SortState::new();
        let Presentation::Table(view) = present("t", &rows, &sort, 10) else {
            panic!("expected a table");
        };
        let rects = column_rects(&[6, 6], Rect::new(1, 21, 38, 6));
        let regions = header_regions(Strategy::Cc, &view, &rects);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].area, Rect::new(1, 21, 6, 1));
        assert_eq!(regions[1].area, Rect::new(8, 21, 6, 1));
        assert_eq!(regions[1].column, "strike");
    }

    #[test]
    fn test_header_regions_match_drawn_headers_when_columns_shrink() {
        let mut app = app_with_rows(vec![wide_row()]);
        // 70 inner cells for 72 wanted: some columns must shrink
        let mut terminal = Terminal::new(TestBackend::new(72, 12)).unwrap();
        let mut regions = Vec::new();
        terminal
            .draw(|f| regions = draw_table(f, &app, Strategy::Csp, f.area()))
            .unwrap();

        assert_eq!(regions.len(), 9);
        for region in &regions {
            let text = rendered(&terminal, region.area);
            let shown = text.trim_end();
            assert!(!shown.is_empty(), "{} has no visible header", region.column);
            assert!(
                region.column.starts_with(shown),
                "region for {} shows {:?}",
                region.column,
                text
            );
            if region.area.width as usize >= region.column.chars().count() {
                assert_eq!(shown, region.column);
            }
        }
        for pair in regions.windows(2) {
            assert!(pair[0].area.right() <= pair[1].area.x);
        }

        // Clicking the drawn "bid" header sorts by bid
        app.header_regions = regions.clone();
        let bid = regions.iter().find(|r| r.column == "bid").unwrap();
        app.handle_mouse(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column: bid.area.x,
            row: bid.area.y,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        assert_eq!(app.dashboard.sort_state(Strategy::Csp).column(), Some("bid"));
    }

    #[test]
    fn test_header_regions_on_roomy_table_keep_full_widths() {
        let app = app_with_rows(vec![CandidateRow::new().with("ticker", "AAPL").with("dte", 14.0)]);
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let mut regions = Vec::new();
        terminal
            .draw(|f| regions = draw_table(f, &app, Strategy::Csp, f.area()))
            .unwrap();

        assert_eq!(regions[0].area, Rect::new(1, 1, 6, 1));
        assert_eq!(rendered(&terminal, regions[0].area), "ticker");
        assert_eq!(rendered(&terminal, regions[1].area).trim_end(), "dte");
    }
}
