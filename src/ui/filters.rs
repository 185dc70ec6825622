//! Toolbar filter controls
//!
//! A filter control is a single interactive value editor used to
//! parameterize a provider query. Two variants exist: free text and a
//! bounded integer. Both expose a uniform event contract: `Change` on
//! every edit and `Select` on an explicit commit; which of the two the
//! toolbar forwards is decided once, at toolbar construction.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::provider::{FilterSpec, FilterValue};
use crate::ui::Theme;

/// Raw event emitted by a control in response to a keypress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
    /// The value was edited in place
    Change(FilterValue),
    /// The value was explicitly committed (enter)
    Select(FilterValue),
}

// =============================================================================
// Text Filter
// =============================================================================

/// Free-text filter with a single-line edit
#[derive(Debug, Clone)]
pub struct TextFilter {
    value: String,
    cursor: usize,
    auto_refresh: bool,
}

impl TextFilter {
    pub fn new(default: impl Into<String>, auto_refresh: bool) -> Self {
        let value = default.into();
        let cursor = value.len();
        Self {
            value,
            cursor,
            auto_refresh,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    fn keypress(&mut self, key: KeyEvent) -> Option<FilterEvent> {
        match key.code {
            KeyCode::Enter => {
                if self.value.is_empty() {
                    None
                } else {
                    Some(FilterEvent::Select(FilterValue::Text(self.value.clone())))
                }
            }
            KeyCode::Char(c) => {
                self.value.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                Some(FilterEvent::Change(FilterValue::Text(self.value.clone())))
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = self.value[..self.cursor]
                    .chars()
                    .next_back()
                    .map(char::len_utf8)
                    .unwrap_or(0);
                self.cursor -= prev;
                self.value.remove(self.cursor);
                Some(FilterEvent::Change(FilterValue::Text(self.value.clone())))
            }
            KeyCode::Delete => {
                if self.cursor >= self.value.len() {
                    return None;
                }
                self.value.remove(self.cursor);
                Some(FilterEvent::Change(FilterValue::Text(self.value.clone())))
            }
            KeyCode::Left => {
                let prev = self.value[..self.cursor]
                    .chars()
                    .next_back()
                    .map(char::len_utf8)
                    .unwrap_or(0);
                self.cursor -= prev;
                None
            }
            KeyCode::Right => {
                let next = self.value[self.cursor..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(0);
                self.cursor += next;
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = self.value.len();
                None
            }
            _ => None,
        }
    }
}

// =============================================================================
// Integer Filter
// =============================================================================

/// Bounded integer filter edited as digits, cycled by dedicated keys
///
/// The buffer only ever holds digits; a parse failure (empty buffer)
/// coerces to the clamped default rather than erroring. Cycling clamps to
/// the configured bounds and is a safe no-op at either bound.
#[derive(Debug, Clone)]
pub struct IntegerFilter {
    buffer: String,
    cursor: usize,
    default: i64,
    minimum: Option<i64>,
    maximum: Option<i64>,
    big_step: i64,
    auto_refresh: bool,
}

impl IntegerFilter {
    pub fn new(
        default: i64,
        minimum: Option<i64>,
        maximum: Option<i64>,
        big_step: i64,
        auto_refresh: bool,
    ) -> Self {
        let mut filter = Self {
            buffer: String::new(),
            cursor: 0,
            default: 0,
            minimum,
            maximum,
            big_step,
            auto_refresh,
        };
        filter.default = filter.clamp(default);
        filter.set_value(filter.default);
        filter
    }

    fn clamp(&self, value: i64) -> i64 {
        let mut v = value;
        if let Some(min) = self.minimum {
            v = v.max(min);
        }
        if let Some(max) = self.maximum {
            v = v.min(max);
        }
        v
    }

    /// Current value: buffer coerced to an integer, clamped to the
    /// configured bounds; an unparseable buffer falls back to the default
    pub fn value(&self) -> i64 {
        self.buffer
            .parse::<i64>()
            .map(|v| self.clamp(v))
            .unwrap_or(self.default)
    }

    pub fn set_value(&mut self, value: i64) {
        self.buffer = self.clamp(value).to_string();
        // Cursor rests on the last digit, as in a right-aligned edit
        self.cursor = self.buffer.len().saturating_sub(1);
    }

    /// Step the value, clamping at the bounds; returns whether it changed
    pub fn cycle(&mut self, step: i64) -> bool {
        let before = self.value();
        let after = self.clamp(before.saturating_add(step));
        if after == before {
            return false;
        }
        self.set_value(after);
        true
    }

    fn change(&self) -> Option<FilterEvent> {
        Some(FilterEvent::Change(FilterValue::Integer(self.value())))
    }

    fn keypress(&mut self, key: KeyEvent) -> Option<FilterEvent> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Up if ctrl => self.cycle(1).then(|| self.change()).flatten(),
            KeyCode::Down if ctrl => self.cycle(-1).then(|| self.change()).flatten(),
            KeyCode::PageUp => self.cycle(self.big_step).then(|| self.change()).flatten(),
            KeyCode::PageDown => self.cycle(-self.big_step).then(|| self.change()).flatten(),
            KeyCode::Enter => Some(FilterEvent::Select(FilterValue::Integer(self.value()))),
            KeyCode::Char(c) => {
                // Character-validity predicate: digits only
                if !c.is_ascii_digit() {
                    return None;
                }
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
                self.change()
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                self.cursor -= 1;
                self.buffer.remove(self.cursor);
                self.change()
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            KeyCode::Right => {
                // At the last digit, allow the cursor to move past the end
                if self.cursor + 1 < self.buffer.len() {
                    self.cursor += 1;
                } else if self.cursor < self.buffer.len() {
                    self.cursor = self.buffer.len();
                }
                None
            }
            _ => None,
        }
    }
}

// =============================================================================
// Filter Control
// =============================================================================

/// A toolbar filter control variant
///
/// Capabilities (steppable, select support, auto-refresh) are static
/// properties of the variant, checked once when the toolbar is built.
#[derive(Debug, Clone)]
pub enum FilterControl {
    Text(TextFilter),
    Integer(IntegerFilter),
}

impl FilterControl {
    /// Build a control from a provider-declared spec
    pub fn from_spec(spec: &FilterSpec) -> Self {
        match spec {
            FilterSpec::Text {
                default,
                auto_refresh,
            } => FilterControl::Text(TextFilter::new(default.clone(), *auto_refresh)),
            FilterSpec::Integer {
                default,
                minimum,
                maximum,
                big_step,
                auto_refresh,
            } => FilterControl::Integer(IntegerFilter::new(
                *default,
                *minimum,
                *maximum,
                *big_step,
                *auto_refresh,
            )),
        }
    }

    /// Current value as a typed filter argument
    pub fn value(&self) -> FilterValue {
        match self {
            FilterControl::Text(f) => FilterValue::Text(f.value().to_string()),
            FilterControl::Integer(f) => FilterValue::Integer(f.value()),
        }
    }

    /// Whether every edit should re-query (vs. explicit commit)
    pub fn auto_refresh(&self) -> bool {
        match self {
            FilterControl::Text(f) => f.auto_refresh,
            FilterControl::Integer(f) => f.auto_refresh,
        }
    }

    /// Whether the control can emit a `Select` commit event
    pub fn supports_select(&self) -> bool {
        match self {
            FilterControl::Text(_) | FilterControl::Integer(_) => true,
        }
    }

    /// Whether the control participates in cyclic stepping
    pub fn steppable(&self) -> bool {
        matches!(self, FilterControl::Integer(_))
    }

    /// Step the value; non-steppable controls no-op
    pub fn cycle(&mut self, step: i64) -> bool {
        match self {
            FilterControl::Text(_) => false,
            FilterControl::Integer(f) => f.cycle(step),
        }
    }

    /// Handle a keypress, returning the raw control event if one fired
    pub fn keypress(&mut self, key: KeyEvent) -> Option<FilterEvent> {
        match self {
            FilterControl::Text(f) => f.keypress(key),
            FilterControl::Integer(f) => f.keypress(key),
        }
    }

    /// Preferred width in cells, including one cell of padding each side
    pub fn display_width(&self, name: &str) -> u16 {
        let value_len = match self {
            FilterControl::Text(f) => f.value().len().max(12),
            FilterControl::Integer(f) => f.buffer.len().max(4),
        };
        (name.len() + 2 + value_len + 2) as u16
    }

    /// Render as `name: value` with a cursor cell when focused
    pub fn render(&self, frame: &mut Frame, area: Rect, name: &str, focused: bool) {
        let (text, cursor) = match self {
            FilterControl::Text(f) => (f.value.clone(), f.cursor),
            FilterControl::Integer(f) => (f.buffer.clone(), f.cursor),
        };

        let label_style = if focused {
            Theme::accent()
        } else {
            Theme::dimmed()
        };
        let mut spans = vec![Span::styled(format!("{}: ", name), label_style)];
        if focused && cursor <= text.len() {
            let (before, rest) = text.split_at(cursor);
            let mut chars = rest.chars();
            let at = chars.next().map(String::from).unwrap_or_else(|| " ".into());
            let after: String = chars.collect();
            spans.push(Span::styled(before.to_string(), Theme::input()));
            spans.push(Span::styled(at, Theme::input_cursor()));
            spans.push(Span::styled(after, Theme::input()));
        } else {
            spans.push(Span::styled(text, Theme::input()));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    fn bounded() -> IntegerFilter {
        // minimum=0, maximum=10, default=5, big_step=10
        IntegerFilter::new(5, Some(0), Some(10), 10, true)
    }

    // =========================================================================
    // IntegerFilter Tests
    // =========================================================================

    #[test]
    fn test_default_clamped_at_construction() {
        let f = IntegerFilter::new(99, Some(0), Some(10), 10, true);
        assert_eq!(f.value(), 10);

        let f = IntegerFilter::new(-3, Some(0), Some(10), 10, true);
        assert_eq!(f.value(), 0);
    }

    #[test]
    fn test_cycle_clamps_to_bounds() {
        let mut f = bounded();
        for step in [-100, -1, 1, 3, 100, i64::MAX, i64::MIN] {
            f.cycle(step);
            assert!((0..=10).contains(&f.value()), "step {} escaped bounds", step);
        }
    }

    #[test]
    fn test_page_down_clamps_then_noops() {
        let mut f = bounded();
        assert_eq!(f.value(), 5);

        let event = f.keypress(key(KeyCode::PageDown));
        assert_eq!(f.value(), 0);
        assert_eq!(
            event,
            Some(FilterEvent::Change(FilterValue::Integer(0)))
        );

        // Already at the bound: no change, no event
        let event = f.keypress(key(KeyCode::PageDown));
        assert_eq!(f.value(), 0);
        assert_eq!(event, None);
    }

    #[test]
    fn test_ctrl_arrows_step_by_one() {
        let mut f = bounded();
        f.keypress(ctrl(KeyCode::Up));
        assert_eq!(f.value(), 6);
        f.keypress(ctrl(KeyCode::Down));
        f.keypress(ctrl(KeyCode::Down));
        assert_eq!(f.value(), 4);
    }

    #[test]
    fn test_unbounded_cycle() {
        let mut f = IntegerFilter::new(0, None, None, 10, true);
        f.cycle(-25);
        assert_eq!(f.value(), -25);
        f.cycle(100);
        assert_eq!(f.value(), 75);
    }

    #[test]
    fn test_digit_validity_predicate() {
        let mut f = bounded();
        assert_eq!(f.keypress(key(KeyCode::Char('x'))), None);
        assert_eq!(f.value(), 5);

        let event = f.keypress(key(KeyCode::Char('7')));
        assert!(matches!(event, Some(FilterEvent::Change(_))));
    }

    #[test]
    fn test_empty_buffer_coerces_to_default() {
        let mut f = bounded();
        f.keypress(key(KeyCode::Right)); // past end
        f.keypress(key(KeyCode::Backspace));
        assert_eq!(f.buffer, "");
        assert_eq!(f.value(), 5);
    }

    #[test]
    fn test_typed_overflow_clamped() {
        let mut f = bounded();
        f.keypress(key(KeyCode::Char('9')));
        f.keypress(key(KeyCode::Char('9')));
        assert_eq!(f.value(), 10);
    }

    #[test]
    fn test_right_moves_past_last_digit() {
        let mut f = bounded(); // buffer "5", cursor 0
        assert_eq!(f.cursor, 0);
        f.keypress(key(KeyCode::Right));
        assert_eq!(f.cursor, 1); // past end
        f.keypress(key(KeyCode::Right));
        assert_eq!(f.cursor, 1);
    }

    // =========================================================================
    // TextFilter Tests
    // =========================================================================

    #[test]
    fn test_text_edit_emits_change() {
        let mut f = TextFilter::new("", true);
        let event = f.keypress(key(KeyCode::Char('a')));
        assert_eq!(
            event,
            Some(FilterEvent::Change(FilterValue::Text("a".into())))
        );
        let event = f.keypress(key(KeyCode::Backspace));
        assert_eq!(
            event,
            Some(FilterEvent::Change(FilterValue::Text("".into())))
        );
    }

    #[test]
    fn test_text_enter_commits_full_text() {
        let mut f = TextFilter::new("", false);
        for c in "dune".chars() {
            f.keypress(key(KeyCode::Char(c)));
        }
        let event = f.keypress(key(KeyCode::Enter));
        assert_eq!(
            event,
            Some(FilterEvent::Select(FilterValue::Text("dune".into())))
        );
    }

    #[test]
    fn test_text_enter_empty_is_silent() {
        let mut f = TextFilter::new("", false);
        assert_eq!(f.keypress(key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_text_cursor_navigation() {
        let mut f = TextFilter::new("abc", false);
        f.keypress(key(KeyCode::Home));
        f.keypress(key(KeyCode::Char('x')));
        assert_eq!(f.value(), "xabc");
        f.keypress(key(KeyCode::End));
        f.keypress(key(KeyCode::Backspace));
        assert_eq!(f.value(), "xab");
    }

    // =========================================================================
    // FilterControl Tests
    // =========================================================================

    #[test]
    fn test_from_spec_capabilities() {
        let text = FilterControl::from_spec(&FilterSpec::text("x"));
        assert!(!text.auto_refresh());
        assert!(text.supports_select());
        assert!(!text.steppable());

        let int = FilterControl::from_spec(&FilterSpec::integer(1, Some(1), Some(9)));
        assert!(int.auto_refresh());
        assert!(int.steppable());
    }

    #[test]
    fn test_text_cycle_is_noop() {
        let mut text = FilterControl::from_spec(&FilterSpec::text("hello"));
        assert!(!text.cycle(5));
        assert_eq!(text.value(), FilterValue::Text("hello".into()));
    }
}
