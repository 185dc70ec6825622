//! Filter toolbar
//!
//! Composes an ordered set of named filter controls into one horizontal
//! strip. Whatever the underlying control type, the toolbar re-emits a
//! single `FilterChange` event; which control event it listens to
//! (`Change` for auto-refresh filters, `Select` for commit filters) is
//! resolved once, when the toolbar is built.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use tracing::warn;

use crate::provider::{FilterSpec, FilterValue, FilterValues};
use crate::ui::filters::{FilterControl, FilterEvent};

/// The single outward event of a toolbar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChange {
    pub name: String,
    pub index: usize,
    pub value: FilterValue,
}

/// Which control event the toolbar forwards for a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Binding {
    Change,
    Select,
}

struct Slot {
    name: String,
    control: FilterControl,
    binding: Binding,
}

/// Ordered strip of filter controls with index-based cycling
pub struct FilterToolbar {
    slots: Vec<Slot>,
    focused: usize,
}

impl FilterToolbar {
    /// Build the toolbar from provider-declared filter specs
    ///
    /// Names must be unique; a duplicate keeps the first occurrence.
    pub fn new(specs: &[(String, FilterSpec)]) -> Self {
        let mut slots: Vec<Slot> = Vec::new();
        for (name, spec) in specs {
            if slots.iter().any(|s| s.name == *name) {
                warn!(name = %name, "duplicate filter name ignored");
                continue;
            }
            let control = FilterControl::from_spec(spec);
            let binding = if control.auto_refresh() {
                Binding::Change
            } else {
                // Commit filters need select support; controls without it
                // would never fire, so bind them as live filters
                if control.supports_select() {
                    Binding::Select
                } else {
                    Binding::Change
                }
            };
            slots.push(Slot {
                name: name.clone(),
                control,
                binding,
            });
        }
        Self { slots, focused: 0 }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Control at a slot, if the index is in range
    pub fn control(&self, index: usize) -> Option<&FilterControl> {
        self.slots.get(index).map(|s| &s.control)
    }

    /// Current value of a named filter
    pub fn value(&self, name: &str) -> Option<FilterValue> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.control.value())
    }

    /// All current values, in slot order, for the initial query
    pub fn values(&self) -> FilterValues {
        let mut values = FilterValues::new();
        for slot in &self.slots {
            values.set(slot.name.clone(), slot.control.value());
        }
        values
    }

    /// Index of the focused control
    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn focus_next(&mut self) {
        if !self.slots.is_empty() {
            self.focused = (self.focused + 1) % self.slots.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.slots.is_empty() {
            self.focused = self.focused.checked_sub(1).unwrap_or(self.slots.len() - 1);
        }
    }

    /// Cycle the control at `index` by `step`
    ///
    /// Silently no-ops when `index` is past the last slot. The change is
    /// forwarded only for live (auto-refresh) filters, mirroring the
    /// keypress path.
    pub fn cycle_filter(&mut self, index: usize, step: i64) -> Option<FilterChange> {
        if index >= self.slots.len() {
            return None;
        }
        let slot = &mut self.slots[index];
        if !slot.control.cycle(step) {
            return None;
        }
        (slot.binding == Binding::Change).then(|| FilterChange {
            name: slot.name.clone(),
            index,
            value: slot.control.value(),
        })
    }

    /// Route a keypress to the focused control
    ///
    /// Tab/BackTab move focus within the strip. A control event is
    /// forwarded as a `FilterChange` only when it matches the slot's
    /// binding, so commit filters stay silent until enter.
    pub fn keypress(&mut self, key: KeyEvent) -> Option<FilterChange> {
        match key.code {
            KeyCode::Tab => {
                self.focus_next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return None;
            }
            _ => {}
        }

        let index = self.focused;
        let slot = self.slots.get_mut(index)?;
        let event = slot.control.keypress(key)?;
        let forwarded = matches!(
            (&event, slot.binding),
            (FilterEvent::Change(_), Binding::Change) | (FilterEvent::Select(_), Binding::Select)
        );
        if !forwarded {
            return None;
        }
        let value = match event {
            FilterEvent::Change(v) | FilterEvent::Select(v) => v,
        };
        Some(FilterChange {
            name: slot.name.clone(),
            index,
            value,
        })
    }

    /// Lay the controls out left-to-right with one cell of spacing
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let constraints: Vec<Constraint> = self
            .slots
            .iter()
            .map(|s| Constraint::Length(s.control.display_width(&s.name)))
            .collect();
        let areas = Layout::horizontal(constraints).spacing(1).split(area);
        for (i, (slot, slot_area)) in self.slots.iter().zip(areas.iter()).enumerate() {
            slot.control.render(
                frame,
                *slot_area,
                &slot.name,
                focused && i == self.focused,
            );
        }
    }
}
