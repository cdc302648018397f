//! Keyboard and pointer navigation over the open suggestion list.
//!
//! The navigator only tracks *where* the highlight is. It never owns the
//! list itself; every transition takes the current list length, and
//! [`KeyboardNavigator::sync`] realigns the state after the list changes.

use serde::{Deserialize, Serialize};

/// Navigation state. `highlighted == None` means no highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NavigatorState {
    #[default]
    Closed,
    Open { highlighted: Option<usize> },
}

/// Keys the navigator reacts to. Everything else is [`NavKey::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
    Tab,
    Other,
}

impl NavKey {
    /// Parse a DOM-style key name (`"ArrowDown"`, `"Esc"`, ...), any case.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "arrowdown" | "down" => Self::ArrowDown,
            "arrowup" | "up" => Self::ArrowUp,
            "enter" | "return" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            "tab" => Self::Tab,
            _ => Self::Other,
        }
    }
}

/// What the host should do after a navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Not handled; the host applies its default behaviour.
    Unhandled,
    /// The highlight moved to this index.
    Highlighted(usize),
    /// The suggestion at this index was chosen. The list is now closed and
    /// focus belongs back on the input.
    Select(usize),
    /// Submit the raw input as a query.
    Submit,
    /// The list was closed.
    Dismissed,
}

impl NavOutcome {
    /// Whether the host must suppress the key's default action.
    #[must_use]
    pub fn prevents_default(self) -> bool {
        !matches!(self, Self::Unhandled)
    }
}

/// Screen rectangle of the input plus its dropdown, in host coordinates.
///
/// Bounds are half-open: a point on `x + width` is outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    #[must_use]
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        let (x, y) = (u32::from(x), u32::from(y));
        let (left, top) = (u32::from(self.x), u32::from(self.y));
        x >= left
            && x < left + u32::from(self.width)
            && y >= top
            && y < top + u32::from(self.height)
    }
}

#[derive(Debug, Default)]
pub struct KeyboardNavigator {
    state: NavigatorState,
    region: Option<Region>,
}

impl KeyboardNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> NavigatorState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, NavigatorState::Open { .. })
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<usize> {
        match self.state {
            NavigatorState::Open { highlighted } => highlighted,
            NavigatorState::Closed => None,
        }
    }

    /// Handle a key press while the list holds `len` suggestions.
    pub fn handle_key(&mut self, key: NavKey, len: usize) -> NavOutcome {
        self.sync(len);
        let highlighted = self.highlighted();

        match key {
            NavKey::ArrowDown if self.is_open() => {
                let next = match highlighted {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.highlight(next)
            }
            NavKey::ArrowUp if self.is_open() => {
                let prev = match highlighted {
                    Some(i) if i > 0 => i - 1,
                    _ => len - 1,
                };
                self.highlight(prev)
            }
            NavKey::Enter => match highlighted {
                Some(i) => self.select(i, len),
                None => NavOutcome::Submit,
            },
            NavKey::Tab => match highlighted {
                Some(i) => self.select(i, len),
                None => NavOutcome::Unhandled,
            },
            NavKey::Escape if self.is_open() => {
                self.state = NavigatorState::Closed;
                NavOutcome::Dismissed
            }
            _ => NavOutcome::Unhandled,
        }
    }

    /// Choose the suggestion at `index` (keyboard or pointer).
    pub fn select(&mut self, index: usize, len: usize) -> NavOutcome {
        if index >= len {
            return NavOutcome::Unhandled;
        }
        self.state = NavigatorState::Closed;
        NavOutcome::Select(index)
    }

    /// Remember where the control is drawn, for click-outside detection.
    pub fn set_region(&mut self, region: Region) {
        self.region = Some(region);
    }

    /// Handle a pointer press at `(x, y)`.
    ///
    /// Until a region has been reported every click counts as inside.
    pub fn handle_click(&mut self, x: u16, y: u16) -> NavOutcome {
        let outside = self.region.is_some_and(|r| !r.contains(x, y));
        if outside && self.is_open() {
            self.state = NavigatorState::Closed;
            return NavOutcome::Dismissed;
        }
        NavOutcome::Unhandled
    }

    /// The input text changed: drop the highlight, keep the list open.
    pub fn on_input_changed(&mut self) {
        if let NavigatorState::Open { highlighted } = &mut self.state {
            *highlighted = None;
        }
    }

    /// Realign with a list of `len` suggestions: open on non-empty, close on
    /// empty, drop a highlight that no longer points into the list.
    pub fn sync(&mut self, len: usize) {
        self.state = match self.state {
            _ if len == 0 => NavigatorState::Closed,
            NavigatorState::Closed => NavigatorState::Open { highlighted: None },
            NavigatorState::Open {
                highlighted: Some(i),
            } if i >= len => NavigatorState::Open { highlighted: None },
            open => open,
        };
    }

    fn highlight(&mut self, index: usize) -> NavOutcome {
        self.state = NavigatorState::Open {
            highlighted: Some(index),
        };
        NavOutcome::Highlighted(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEN: usize = 3; // ["alpha", "beta", "gamma"]

    fn open_at(index: Option<usize>) -> KeyboardNavigator {
        let mut nav = KeyboardNavigator::new();
        nav.sync(LEN);
        if let Some(i) = index {
            nav.state = NavigatorState::Open {
                highlighted: Some(i),
            };
        }
        nav
    }

    #[test]
    fn starts_closed() {
        let nav = KeyboardNavigator::new();
        assert_eq!(nav.state(), NavigatorState::Closed);
        assert_eq!(nav.highlighted(), None);
    }

    #[test]
    fn arrow_down_wraps_from_last_to_first() {
        let mut nav = open_at(Some(2));
        assert_eq!(nav.handle_key(NavKey::ArrowDown, LEN), NavOutcome::Highlighted(0));
        assert_eq!(nav.highlighted(), Some(0));
    }

    #[test]
    fn arrow_up_wraps_from_first_to_last() {
        let mut nav = open_at(Some(0));
        assert_eq!(nav.handle_key(NavKey::ArrowUp, LEN), NavOutcome::Highlighted(2));
    }

    #[test]
    fn arrows_from_no_highlight() {
        let mut nav = open_at(None);
        assert_eq!(nav.handle_key(NavKey::ArrowDown, LEN), NavOutcome::Highlighted(0));

        let mut nav = open_at(None);
        assert_eq!(nav.handle_key(NavKey::ArrowUp, LEN), NavOutcome::Highlighted(2));
    }

    #[test]
    fn arrows_ignored_without_suggestions() {
        let mut nav = KeyboardNavigator::new();
        assert_eq!(nav.handle_key(NavKey::ArrowDown, 0), NavOutcome::Unhandled);
        assert_eq!(nav.handle_key(NavKey::ArrowUp, 0), NavOutcome::Unhandled);
        assert_eq!(nav.state(), NavigatorState::Closed);
    }

    #[test]
    fn enter_selects_highlight_and_closes() {
        let mut nav = open_at(Some(1));
        assert_eq!(nav.handle_key(NavKey::Enter, LEN), NavOutcome::Select(1));
        assert_eq!(nav.state(), NavigatorState::Closed);
    }

    #[test]
    fn enter_without_highlight_submits() {
        let mut nav = open_at(None);
        assert_eq!(nav.handle_key(NavKey::Enter, LEN), NavOutcome::Submit);

        let mut closed = KeyboardNavigator::new();
        assert_eq!(closed.handle_key(NavKey::Enter, 0), NavOutcome::Submit);
    }

    #[test]
    fn escape_closes_and_resets_highlight() {
        let mut nav = open_at(Some(2));
        assert_eq!(nav.handle_key(NavKey::Escape, LEN), NavOutcome::Dismissed);
        assert_eq!(nav.state(), NavigatorState::Closed);
        assert_eq!(nav.highlighted(), None);
    }

    #[test]
    fn tab_selects_only_with_highlight() {
        let mut nav = open_at(Some(0));
        let outcome = nav.handle_key(NavKey::Tab, LEN);
        assert_eq!(outcome, NavOutcome::Select(0));
        assert!(outcome.prevents_default());

        let mut nav = open_at(None);
        let outcome = nav.handle_key(NavKey::Tab, LEN);
        assert_eq!(outcome, NavOutcome::Unhandled);
        assert!(!outcome.prevents_default());
    }

    #[test]
    fn other_keys_are_unhandled() {
        let mut nav = open_at(Some(1));
        assert_eq!(nav.handle_key(NavKey::Other, LEN), NavOutcome::Unhandled);
        assert_eq!(nav.highlighted(), Some(1));
    }

    #[test]
    fn input_change_resets_highlight_but_stays_open() {
        let mut nav = open_at(Some(2));
        nav.on_input_changed();
        assert_eq!(nav.state(), NavigatorState::Open { highlighted: None });
    }

    #[test]
    fn sync_tracks_list_length() {
        let mut nav = open_at(Some(2));
        nav.sync(2);
        assert_eq!(nav.state(), NavigatorState::Open { highlighted: None });
        nav.sync(0);
        assert_eq!(nav.state(), NavigatorState::Closed);
        nav.sync(4);
        assert_eq!(nav.state(), NavigatorState::Open { highlighted: None });
    }

    #[test]
    fn select_out_of_range_is_unhandled() {
        let mut nav = open_at(None);
        assert_eq!(nav.select(3, LEN), NavOutcome::Unhandled);
        assert!(nav.is_open());
    }

    #[test]
    fn click_outside_region_closes() {
        let mut nav = open_at(Some(1));
        nav.set_region(Region::new(10, 2, 40, 8));
        assert_eq!(nav.handle_click(12, 4), NavOutcome::Unhandled);
        assert!(nav.is_open());
        assert_eq!(nav.handle_click(50, 4), NavOutcome::Dismissed);
        assert_eq!(nav.state(), NavigatorState::Closed);
    }

    #[test]
    fn click_without_region_is_inside() {
        let mut nav = open_at(None);
        assert_eq!(nav.handle_click(500, 500), NavOutcome::Unhandled);
        assert!(nav.is_open());
    }

    #[test]
    fn region_bounds_are_half_open() {
        let region = Region::new(0, 0, 10, 5);
        assert!(region.contains(0, 0));
        assert!(region.contains(9, 4));
        assert!(!region.contains(10, 4));
        assert!(!region.contains(9, 5));
        let edge = Region::new(u16::MAX - 1, u16::MAX - 1, 10, 10);
        assert!(edge.contains(u16::MAX, u16::MAX));
    }

    #[test]
    fn key_names_parse() {
        assert_eq!(NavKey::parse("ArrowDown"), NavKey::ArrowDown);
        assert_eq!(NavKey::parse("up"), NavKey::ArrowUp);
        assert_eq!(NavKey::parse("Esc"), NavKey::Escape);
        assert_eq!(NavKey::parse("Enter"), NavKey::Enter);
        assert_eq!(NavKey::parse("Tab"), NavKey::Tab);
        assert_eq!(NavKey::parse("q"), NavKey::Other);
    }
}
