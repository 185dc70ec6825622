//! Provider-backed listing table
//!
//! Renders provider-declared columns over a lazily pulled row stream.
//! Rows arrive through `poll` in bounded budgets so the UI loop never
//! blocks on a slow provider; a domain error mid-stream truncates the
//! listing instead of crashing the table. Command keys are translated
//! into typed [`TableCommand`]s for the owning session; everything else
//! falls through to the default row navigation.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use tracing::warn;

use crate::models::{Column, ColumnAlign, HighlightRules, Listing, Payload};
use crate::provider::{ListingStream, Provider};
use crate::ui::Theme;

// =============================================================================
// Commands and Status
// =============================================================================

/// Commands the table raises to its owning session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    /// Ask the provider to refresh its underlying listing source
    Refresh,
    /// Download the selected row's payload
    Download(Payload),
    /// Cycle the toolbar filter at a slot
    CycleFilter { index: usize, step: i64 },
    /// Surface the selected row's detail payload
    Inspect(Payload),
}

/// Lifecycle of the current row stream
///
/// `Truncated` makes a mid-stream provider failure observable to callers;
/// the rows streamed before the failure stay on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamStatus {
    /// No query started yet
    Idle,
    /// Rows are still being pulled
    Streaming,
    /// The stream ended normally (or hit the row limit)
    Complete,
    /// The stream ended early on a provider domain error
    Truncated(String),
}

// =============================================================================
// Listing Table
// =============================================================================

/// Virtualized table over one provider's listings
pub struct ListingTable {
    columns: Vec<Column>,
    rows: Vec<Listing>,
    selected: usize,
    offset: usize,
    limit: usize,
    highlight: HighlightRules,
    status: StreamStatus,
    generation: u64,
    stream: Option<ListingStream>,
}

impl ListingTable {
    /// Build the table shell from a provider's declared shape
    ///
    /// No rows are materialized here; the first `begin_query` starts the
    /// stream.
    pub fn new(provider: &dyn Provider) -> Self {
        Self {
            columns: provider.attributes(),
            rows: Vec::new(),
            selected: 0,
            offset: 0,
            limit: provider.limit(),
            highlight: provider.highlight(),
            status: StreamStatus::Idle,
            generation: 0,
            stream: None,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Listing] {
        &self.rows
    }

    pub fn status(&self) -> &StreamStatus {
        &self.status
    }

    /// Monotonic query counter; bumps on every restart
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Currently selected row
    pub fn selected(&self) -> Option<&Listing> {
        self.rows.get(self.selected)
    }

    /// Replace the row stream from the start
    ///
    /// Any in-flight stream is dropped here, so stale rows can never be
    /// appended after a newer query has started: there is at most one
    /// live stream per table.
    pub fn begin_query(&mut self, stream: ListingStream) {
        self.generation += 1;
        self.stream = Some(stream);
        self.rows.clear();
        self.selected = 0;
        self.offset = 0;
        self.status = StreamStatus::Streaming;
    }

    /// Whether a stream still has rows to pull
    pub fn is_streaming(&self) -> bool {
        self.stream.is_some()
    }

    /// Pull up to `budget` rows from the live stream
    ///
    /// A provider domain error is logged and truncates the stream; the
    /// rows already pulled remain valid. Returns the number of rows
    /// appended.
    pub fn poll(&mut self, budget: usize) -> usize {
        let Some(stream) = self.stream.as_mut() else {
            return 0;
        };
        let mut pulled = 0;
        while pulled < budget && self.rows.len() < self.limit {
            match stream.next() {
                Some(Ok(row)) => {
                    self.rows.push(row);
                    pulled += 1;
                }
                Some(Err(e)) => {
                    warn!(error = %e, rows = self.rows.len(), "listing stream truncated");
                    self.status = StreamStatus::Truncated(e.to_string());
                    self.stream = None;
                    return pulled;
                }
                None => {
                    self.status = StreamStatus::Complete;
                    self.stream = None;
                    return pulled;
                }
            }
        }
        if self.rows.len() >= self.limit {
            // Row cap reached; drop the rest of the stream
            self.status = StreamStatus::Complete;
            self.stream = None;
        }
        pulled
    }

    // -------------------------------------------------------------------------
    // Keyboard Handling
    // -------------------------------------------------------------------------

    /// Translate a keypress into a command, or handle it as navigation
    ///
    /// Returns `None` both for internally handled navigation and for keys
    /// the table does not recognize.
    pub fn keypress(&mut self, key: KeyEvent) -> Option<TableCommand> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('r') if ctrl => Some(TableCommand::Refresh),
            KeyCode::Char('d') => self
                .selected()
                .map(|row| TableCommand::Download(row.payload.clone())),
            KeyCode::Char('?') => self
                .selected()
                .map(|row| TableCommand::Inspect(row.payload.clone())),
            KeyCode::Left => Some(TableCommand::CycleFilter { index: 0, step: -1 }),
            KeyCode::Right => Some(TableCommand::CycleFilter { index: 0, step: 1 }),
            KeyCode::Char('[') => Some(TableCommand::CycleFilter { index: 1, step: -1 }),
            KeyCode::Char(']') => Some(TableCommand::CycleFilter { index: 1, step: 1 }),
            KeyCode::Char('{') => Some(TableCommand::CycleFilter { index: 2, step: -1 }),
            KeyCode::Char('}') => Some(TableCommand::CycleFilter { index: 2, step: 1 }),
            KeyCode::Up => {
                self.up();
                None
            }
            KeyCode::Down => {
                self.down();
                None
            }
            KeyCode::PageUp => {
                self.page_up(10);
                None
            }
            KeyCode::PageDown => {
                self.page_down(10);
                None
            }
            KeyCode::Home => {
                self.home();
                None
            }
            KeyCode::End => {
                self.end();
                None
            }
            _ => None,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.selected < self.rows.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    /// Move selection up by a page
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
        if self.selected < self.offset {
            self.offset = self.selected;
        }
    }

    /// Move selection down by a page
    pub fn page_down(&mut self, page_size: usize) {
        let max_idx = self.rows.len().saturating_sub(1);
        self.selected = (self.selected + page_size).min(max_idx);
    }

    /// Jump to first row
    pub fn home(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last row
    pub fn end(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    /// Keep the selected row inside the viewport
    fn adjust_offset(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Build the styled spans for one cell
    ///
    /// The title column is re-segmented through the highlight rules; all
    /// other columns render through the default scalar formatter.
    fn cell<'a>(&self, row: &'a Listing, column: &Column) -> Cell<'a> {
        let value = row.field(&column.name).unwrap_or("");
        if column.name == "title" {
            let spans: Vec<Span<'a>> = self
                .highlight
                .decorate(value)
                .into_iter()
                .map(|(style, text)| match style {
                    Some(style) => Span::styled(text, style),
                    None => Span::styled(text, Theme::text()),
                })
                .collect();
            return Cell::from(Line::from(spans));
        }
        let alignment = match column.align {
            ColumnAlign::Left => Alignment::Left,
            ColumnAlign::Right => Alignment::Right,
        };
        Cell::from(Line::from(value).alignment(alignment))
    }

    /// Render the table with header, viewport scrolling, and status title
    pub fn render(&mut self, frame: &mut Frame, area: Rect, title: &str, focused: bool) {
        let visible_height = area.height.saturating_sub(3) as usize;
        self.adjust_offset(visible_height);

        let border_style = if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };
        let counter = if self.rows.is_empty() {
            "0/0".to_string()
        } else {
            format!("{}/{}", self.selected + 1, self.rows.len())
        };
        let block_title = format!(" {} ({}) ", title, counter);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .border_type(BorderType::Rounded)
            .title(Span::styled(block_title, Theme::title()));

        if self.rows.is_empty() {
            let message = match &self.status {
                StreamStatus::Idle | StreamStatus::Streaming => "Loading listings...",
                StreamStatus::Complete => "No listings match the current filters",
                StreamStatus::Truncated(_) => "Listing failed before any rows arrived",
            };
            let empty = Paragraph::new(message)
                .style(Theme::dimmed())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(
            self.columns
                .iter()
                .map(|c| Cell::from(Span::styled(c.label(), Theme::title()))),
        );
        let rows = self
            .rows
            .iter()
            .map(|row| Row::new(self.columns.iter().map(|c| self.cell(row, c))));
        let widths: Vec<Constraint> = self
            .columns
            .iter()
            .map(|c| match c.width {
                Some(w) => Constraint::Length(w),
                None => Constraint::Fill(1),
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .column_spacing(1)
            .row_highlight_style(Theme::row_selected());

        let mut state = TableState::default()
            .with_selected(Some(self.selected))
            .with_offset(self.offset);
        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HighlightRules;
    use crate::provider::{FilterSpec, FilterValues, ProviderError};
    use std::path::PathBuf;

    /// Provider whose stream fails after a fixed number of rows
    struct FlakyProvider {
        rows_before_error: usize,
        fail: bool,
    }

    impl FlakyProvider {
        fn row(i: usize) -> Listing {
            let payload = Payload {
                locator: format!("flaky://{}", i),
                title: format!("Row {}", i),
                detail: format!("row {} detail", i),
            };
            Listing::new(payload).with_field("title", format!("Row {} 1080p", i))
        }
    }

    impl Provider for FlakyProvider {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn attributes(&self) -> Vec<Column> {
            vec![Column::new("title"), Column::new("year").width(6)]
        }

        fn filters(&self) -> Vec<(String, FilterSpec)> {
            Vec::new()
        }

        fn listings(&self, _filters: &FilterValues) -> ListingStream {
            let count = self.rows_before_error;
            let fail = self.fail;
            let rows = (0..count).map(|i| Ok(Self::row(i)));
            let tail = fail
                .then(|| Err(ProviderError::Unavailable("upstream gone".into())))
                .into_iter();
            Box::new(rows.chain(tail))
        }

        fn download(&self, _payload: &Payload) -> Result<PathBuf, ProviderError> {
            Ok(PathBuf::new())
        }

        fn limit(&self) -> usize {
            5
        }

        fn highlight(&self) -> HighlightRules {
            HighlightRules::new(&[(r"\b1080p\b", Theme::quality_1080p())]).unwrap()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn table_with(provider: &FlakyProvider) -> ListingTable {
        let mut table = ListingTable::new(provider);
        table.begin_query(provider.listings(&FilterValues::new()));
        table
    }

    #[test]
    fn test_columns_preserve_provider_order() {
        let provider = FlakyProvider {
            rows_before_error: 0,
            fail: false,
        };
        let table = ListingTable::new(&provider);
        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["title", "year"]);
        assert_eq!(*table.status(), StreamStatus::Idle);
    }

    #[test]
    fn test_error_after_three_rows_truncates_cleanly() {
        let provider = FlakyProvider {
            rows_before_error: 3,
            fail: true,
        };
        let mut table = table_with(&provider);

        table.poll(100);
        assert_eq!(table.rows().len(), 3);
        assert!(matches!(table.status(), StreamStatus::Truncated(_)));
        assert!(!table.is_streaming());

        // Further polls yield nothing
        assert_eq!(table.poll(100), 0);
        assert_eq!(table.rows().len(), 3);
    }

    #[test]
    fn test_poll_respects_budget() {
        let provider = FlakyProvider {
            rows_before_error: 4,
            fail: false,
        };
        let mut table = table_with(&provider);

        assert_eq!(table.poll(2), 2);
        assert!(table.is_streaming());
        assert_eq!(*table.status(), StreamStatus::Streaming);

        assert_eq!(table.poll(100), 2);
        assert_eq!(*table.status(), StreamStatus::Complete);
    }

    #[test]
    fn test_poll_caps_at_provider_limit() {
        let provider = FlakyProvider {
            rows_before_error: 50,
            fail: false,
        };
        let mut table = table_with(&provider);
        table.poll(100);

        assert_eq!(table.rows().len(), 5);
        assert_eq!(*table.status(), StreamStatus::Complete);
        assert!(!table.is_streaming());
    }

    #[test]
    fn test_begin_query_restarts_and_bumps_generation() {
        let provider = FlakyProvider {
            rows_before_error: 4,
            fail: false,
        };
        let mut table = table_with(&provider);
        table.poll(2);
        assert_eq!(table.generation(), 1);

        table.begin_query(provider.listings(&FilterValues::new()));
        assert_eq!(table.generation(), 2);
        assert!(table.rows().is_empty());
        assert_eq!(*table.status(), StreamStatus::Streaming);

        table.poll(100);
        assert_eq!(table.rows().len(), 4);
    }

    #[test]
    fn test_keypress_cycle_slots() {
        let provider = FlakyProvider {
            rows_before_error: 1,
            fail: false,
        };
        let mut table = table_with(&provider);

        let cases = [
            (key(KeyCode::Left), 0, -1),
            (key(KeyCode::Right), 0, 1),
            (key(KeyCode::Char('[')), 1, -1),
            (key(KeyCode::Char(']')), 1, 1),
            (key(KeyCode::Char('{')), 2, -1),
            (key(KeyCode::Char('}')), 2, 1),
        ];
        for (event, index, step) in cases {
            assert_eq!(
                table.keypress(event),
                Some(TableCommand::CycleFilter { index, step })
            );
        }
    }

    #[test]
    fn test_keypress_commands() {
        let provider = FlakyProvider {
            rows_before_error: 2,
            fail: false,
        };
        let mut table = table_with(&provider);
        table.poll(100);

        assert_eq!(table.keypress(ctrl(KeyCode::Char('r'))), Some(TableCommand::Refresh));

        let download = table.keypress(key(KeyCode::Char('d'))).unwrap();
        assert!(matches!(download, TableCommand::Download(p) if p.locator == "flaky://0"));

        table.keypress(key(KeyCode::Down));
        let inspect = table.keypress(key(KeyCode::Char('?'))).unwrap();
        assert!(matches!(inspect, TableCommand::Inspect(p) if p.locator == "flaky://1"));
    }

    #[test]
    fn test_download_on_empty_table_is_noop() {
        let provider = FlakyProvider {
            rows_before_error: 0,
            fail: false,
        };
        let mut table = table_with(&provider);
        table.poll(100);
        assert_eq!(table.keypress(key(KeyCode::Char('d'))), None);
        assert_eq!(table.keypress(key(KeyCode::Char('?'))), None);
    }

    #[test]
    fn test_unrecognized_keys_fall_through() {
        let provider = FlakyProvider {
            rows_before_error: 2,
            fail: false,
        };
        let mut table = table_with(&provider);
        table.poll(100);
        assert_eq!(table.keypress(key(KeyCode::Char('z'))), None);
        assert_eq!(table.keypress(key(KeyCode::Esc)), None);
    }

    #[test]
    fn test_navigation_bounds() {
        let provider = FlakyProvider {
            rows_before_error: 3,
            fail: false,
        };
        let mut table = table_with(&provider);
        table.poll(100);

        table.up(); // at top, stays
        assert!(table.selected().unwrap().payload.locator.ends_with("0"));

        table.end();
        table.down(); // at bottom, stays
        assert!(table.selected().unwrap().payload.locator.ends_with("2"));

        table.home();
        assert!(table.selected().unwrap().payload.locator.ends_with("0"));
    }
}
