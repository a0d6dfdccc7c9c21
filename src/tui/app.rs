//! Interactive dashboard state and input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::api::FetchResult;
use crate::dashboard::{Dashboard, SearchInputs};
use crate::table::columns;
use crate::types::{FilterParams, InputError, ResultSet, Strategy};

/// Focusable widgets, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Tickers,
    MinRoi,
    MinDte,
    MaxDte,
    MaxIdeas,
    SearchButton,
    Table(Strategy),
}

const FOCUS_ORDER: [Focus; 8] = [
    Focus::Tickers,
    Focus::MinRoi,
    Focus::MinDte,
    Focus::MaxDte,
    Focus::MaxIdeas,
    Focus::SearchButton,
    Focus::Table(Strategy::Csp),
    Focus::Table(Strategy::Cc),
];

impl Focus {
    fn position(self) -> usize {
        FOCUS_ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        FOCUS_ORDER[(self.position() + 1) % FOCUS_ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = FOCUS_ORDER.len();
        FOCUS_ORDER[(self.position() + len - 1) % len]
    }

    pub fn is_input(self) -> bool {
        matches!(
            self,
            Focus::Tickers | Focus::MinRoi | Focus::MinDte | Focus::MaxDte | Focus::MaxIdeas
        )
    }
}

/// What the event loop should do after an input event
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Search(FilterParams),
    Quit,
}

/// Raw text of the five search inputs
#[derive(Debug, Clone, PartialEq)]
pub struct InputBuffers {
    pub tickers: String,
    pub min_roi: String,
    pub min_dte: String,
    pub max_dte: String,
    pub max_ideas: String,
}

impl From<&SearchInputs> for InputBuffers {
    fn from(inputs: &SearchInputs) -> Self {
        InputBuffers {
            tickers: inputs.tickers.clone(),
            min_roi: inputs.min_roi.to_string(),
            min_dte: inputs.min_dte.to_string(),
            max_dte: inputs.max_dte.to_string(),
            max_ideas: inputs.max_ideas.to_string(),
        }
    }
}

fn parse_number(field: &'static str, text: &str) -> Result<f64, InputError> {
    text.trim().parse().map_err(|_| InputError::NotANumber {
        field,
        value: text.to_string(),
    })
}

fn parse_whole(field: &'static str, text: &str) -> Result<i64, InputError> {
    text.trim().parse().map_err(|_| InputError::NotAnInteger {
        field,
        value: text.to_string(),
    })
}

fn parse_ideas(text: &str) -> Result<usize, InputError> {
    let n = parse_whole("# of Ideas", text)?;
    if n < 1 {
        return Err(InputError::NoIdeas(n));
    }
    Ok(n as usize)
}

impl InputBuffers {
    pub fn buffer(&self, focus: Focus) -> Option<&String> {
        match focus {
            Focus::Tickers => Some(&self.tickers),
            Focus::MinRoi => Some(&self.min_roi),
            Focus::MinDte => Some(&self.min_dte),
            Focus::MaxDte => Some(&self.max_dte),
            Focus::MaxIdeas => Some(&self.max_ideas),
            _ => None,
        }
    }

    fn buffer_mut(&mut self, focus: Focus) -> Option<&mut String> {
        match focus {
            Focus::Tickers => Some(&mut self.tickers),
            Focus::MinRoi => Some(&mut self.min_roi),
            Focus::MinDte => Some(&mut self.min_dte),
            Focus::MaxDte => Some(&mut self.max_dte),
            Focus::MaxIdeas => Some(&mut self.max_ideas),
            _ => None,
        }
    }

    /// Parse every buffer into search inputs
    pub fn parse(&self) -> Result<SearchInputs, InputError> {
        Ok(SearchInputs {
            tickers: self.tickers.clone(),
            min_roi: parse_number("Min ROI %", &self.min_roi)?,
            min_dte: parse_whole("Min DTE", &self.min_dte)?,
            max_dte: parse_whole("Max DTE", &self.max_dte)?,
            max_ideas: parse_ideas(&self.max_ideas)?,
        })
    }
}

/// Screen region of a clickable table header cell
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRegion {
    pub strategy: Strategy,
    pub column: String,
    pub area: Rect,
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

pub struct App {
    pub dashboard: Dashboard,
    pub buffers: InputBuffers,
    pub focus: Focus,
    csp_cursor: usize,
    cc_cursor: usize,
    /// Validation message for the inputs
    pub input_error: Option<String>,
    /// Filled in by the renderer on every frame
    pub header_regions: Vec<HeaderRegion>,
    pub search_button: Rect,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let buffers = InputBuffers::from(dashboard.inputs());
        App {
            dashboard,
            buffers,
            focus: Focus::Tickers,
            csp_cursor: 0,
            cc_cursor: 0,
            input_error: None,
            header_regions: Vec::new(),
            search_button: Rect::default(),
        }
    }

    /// Index of the column cursor for a table
    pub fn column_cursor(&self, strategy: Strategy) -> usize {
        match strategy {
            Strategy::Csp => self.csp_cursor,
            Strategy::Cc => self.cc_cursor,
        }
    }

    fn cursor_mut(&mut self, strategy: Strategy) -> &mut usize {
        match strategy {
            Strategy::Csp => &mut self.csp_cursor,
            Strategy::Cc => &mut self.cc_cursor,
        }
    }

    fn table_columns(&self, strategy: Strategy) -> Vec<String> {
        columns(self.dashboard.results().rows(strategy))
    }

    /// Validate the inputs and start a search
    pub fn submit(&mut self) -> Action {
        match self.buffers.parse() {
            Ok(inputs) => {
                self.input_error = None;
                *self.dashboard.inputs_mut() = inputs;
                Action::Search(self.dashboard.begin_search())
            }
            Err(e) => {
                tracing::warn!("Invalid search input: {}", e);
                self.input_error = Some(e.to_string());
                Action::None
            }
        }
    }

    /// Apply a finished search
    pub fn apply_outcome(&mut self, outcome: FetchResult<ResultSet>) {
        // The dashboard already logged and recorded any failure.
        let _ = self.dashboard.finish_search(outcome);
        for strategy in Strategy::ALL {
            let count = self.table_columns(strategy).len();
            let cursor = self.cursor_mut(strategy);
            *cursor = (*cursor).min(count.saturating_sub(1));
        }
    }

    fn edit(&mut self, key: KeyEvent) -> Action {
        let focus = self.focus;
        let Some(buffer) = self.buffers.buffer_mut(focus) else {
            return Action::None;
        };
        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => return self.submit(),
            _ => return Action::None,
        }

        // The idea limit applies to the tables immediately.
        if focus == Focus::MaxIdeas {
            if let Ok(n) = parse_ideas(&self.buffers.max_ideas) {
                self.dashboard.inputs_mut().max_ideas = n;
            }
        }
        Action::None
    }

    fn table_key(&mut self, strategy: Strategy, key: KeyEvent) -> Action {
        let columns = self.table_columns(strategy);
        if columns.is_empty() {
            return match key.code {
                KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            };
        }
        let last = columns.len() - 1;
        let cursor = self.column_cursor(strategy).min(last);
        match key.code {
            KeyCode::Left => *self.cursor_mut(strategy) = cursor.saturating_sub(1),
            KeyCode::Right => *self.cursor_mut(strategy) = (cursor + 1).min(last),
            KeyCode::Enter | KeyCode::Char('s') => {
                self.dashboard.sort_by(strategy, &columns[cursor]);
            }
            KeyCode::Char('q') => return Action::Quit,
            _ => {}
        }
        Action::None
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            focus if focus.is_input() => self.edit(key),
            Focus::SearchButton => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => self.submit(),
                KeyCode::Char('q') => Action::Quit,
                _ => Action::None,
            },
            Focus::Table(strategy) => self.table_key(strategy, key),
            _ => Action::None,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Action {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Action::None;
        }
        let (x, y) = (mouse.column, mouse.row);

        if contains(self.search_button, x, y) {
            self.focus = Focus::SearchButton;
            return self.submit();
        }

        let hit = self
            .header_regions
            .iter()
            .find(|region| contains(region.area, x, y))
            .map(|region| (region.strategy, region.column.clone()));

        if let Some((strategy, column)) = hit {
            if let Some(index) = self.table_columns(strategy).iter().position(|c| *c == column) {
                *self.cursor_mut(strategy) = index;
            }
            self.focus = Focus::Table(strategy);
            self.dashboard.sort_by(strategy, &column);
        }
        Action::None
    }
}
