// text_input.rs — single-line text entry: buffer, cursor and selection
//
// Offsets are byte offsets into a UTF-8 buffer and always sit on char
// boundaries. The selection is whatever lies between the cursor and the
// anchor; when they are equal nothing is selected.

use dvl_common::keys::{is_printable_key, K_A, K_BACKSPACE, K_C, K_DELETE, K_END, K_HOME, K_LEFT, K_RIGHT, K_V, K_X};

use crate::compat::{event_key, event_modifiers, get_clipboard_text, has_clipboard_text, set_clipboard_text};
use crate::event::NormalizedEvent;
use crate::platform::Platform;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInputState {
    value: String,
    cursor: usize,
    anchor: usize,
    max_length: Option<usize>,
}

// ============================================================
// Char / word boundaries
// ============================================================

fn prev_char(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
}

/// Start of the word before `pos`: skip whitespace, then one token.
fn prev_word(s: &str, pos: usize) -> usize {
    let mut i = pos;
    while i > 0 {
        let p = prev_char(s, i);
        if !s[p..i].chars().all(char::is_whitespace) {
            break;
        }
        i = p;
    }
    while i > 0 {
        let p = prev_char(s, i);
        if s[p..i].chars().all(char::is_whitespace) {
            break;
        }
        i = p;
    }
    i
}

/// End of the word after `pos`: skip whitespace, then one token.
fn next_word(s: &str, pos: usize) -> usize {
    let mut chars = s[pos..].char_indices().peekable();
    let mut end = pos;
    while let Some(&(i, c)) = chars.peek() {
        if !c.is_whitespace() {
            break;
        }
        end = pos + i + c.len_utf8();
        chars.next();
    }
    while let Some(&(i, c)) = chars.peek() {
        if c.is_whitespace() {
            break;
        }
        end = pos + i + c.len_utf8();
        chars.next();
    }
    end
}

/// Longest prefix of `text` no longer than `max` bytes, cut on a char boundary.
fn truncate_to(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State that never holds more than `max_length` bytes.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn selection_anchor(&self) -> usize {
        self.anchor
    }

    /// Ordered selection bounds.
    pub fn selection_range(&self) -> (usize, usize) {
        (self.cursor.min(self.anchor), self.cursor.max(self.anchor))
    }

    pub fn has_selection(&self) -> bool {
        self.cursor != self.anchor
    }

    pub fn selected_text(&self) -> &str {
        let (lo, hi) = self.selection_range();
        &self.value[lo..hi]
    }

    // ============================================================
    // Mutation
    // ============================================================

    /// Insert at the cursor, replacing the selection.
    pub fn type_text(&mut self, text: &str) {
        self.erase_selection();
        let text = match self.max_length {
            Some(max) => truncate_to(text, max.saturating_sub(self.value.len())),
            None => text,
        };
        self.value.insert_str(self.cursor, text);
        self.cursor += text.len();
        self.anchor = self.cursor;
    }

    /// Replace the whole buffer; cursor and anchor move to the end.
    pub fn assign(&mut self, text: &str) {
        let text = match self.max_length {
            Some(max) => truncate_to(text, max),
            None => text,
        };
        self.value.clear();
        self.value.push_str(text);
        self.cursor = self.value.len();
        self.anchor = self.cursor;
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
        self.anchor = 0;
    }

    /// Delete the selected range. Returns false when nothing was selected.
    pub fn erase_selection(&mut self) -> bool {
        if !self.has_selection() {
            return false;
        }
        let (lo, hi) = self.selection_range();
        self.value.replace_range(lo..hi, "");
        self.cursor = lo;
        self.anchor = lo;
        true
    }

    pub fn backspace(&mut self, word: bool) {
        if self.erase_selection() || self.cursor == 0 {
            return;
        }
        let start = if word {
            prev_word(&self.value, self.cursor)
        } else {
            prev_char(&self.value, self.cursor)
        };
        self.value.replace_range(start..self.cursor, "");
        self.cursor = start;
        self.anchor = start;
    }

    pub fn del(&mut self, word: bool) {
        if self.erase_selection() || self.cursor == self.value.len() {
            return;
        }
        let end = if word {
            next_word(&self.value, self.cursor)
        } else {
            next_char(&self.value, self.cursor)
        };
        self.value.replace_range(self.cursor..end, "");
        self.anchor = self.cursor;
    }

    // ============================================================
    // Cursor movement
    // ============================================================

    fn left_of(&self, word: bool) -> usize {
        if word {
            prev_word(&self.value, self.cursor)
        } else {
            prev_char(&self.value, self.cursor)
        }
    }

    fn right_of(&self, word: bool) -> usize {
        if word {
            next_word(&self.value, self.cursor)
        } else {
            next_char(&self.value, self.cursor)
        }
    }

    pub fn move_cursor_left(&mut self, word: bool) {
        self.cursor = self.left_of(word);
        self.anchor = self.cursor;
    }

    pub fn move_cursor_right(&mut self, word: bool) {
        self.cursor = self.right_of(word);
        self.anchor = self.cursor;
    }

    /// Move the cursor only; the anchor stays, growing or shrinking the selection.
    pub fn move_select_cursor_left(&mut self, word: bool) {
        self.cursor = self.left_of(word);
    }

    pub fn move_select_cursor_right(&mut self, word: bool) {
        self.cursor = self.right_of(word);
    }

    pub fn set_cursor_to_start(&mut self) {
        self.cursor = 0;
        self.anchor = 0;
    }

    pub fn set_cursor_to_end(&mut self) {
        self.cursor = self.value.len();
        self.anchor = self.cursor;
    }

    pub fn set_select_cursor_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn set_select_cursor_to_end(&mut self) {
        self.cursor = self.value.len();
    }
}

// ============================================================
// Event dispatch
// ============================================================

/// Anything an editing event can be routed into. Text widgets insert as-is;
/// number widgets filter and clamp.
pub trait TextInputTarget {
    fn text_state(&mut self) -> &mut TextInputState;
    fn insert_text(&mut self, text: &str);
    fn replace_text(&mut self, text: &str);
}

impl TextInputTarget for TextInputState {
    fn text_state(&mut self) -> &mut TextInputState {
        self
    }

    fn insert_text(&mut self, text: &str) {
        self.type_text(text);
    }

    fn replace_text(&mut self, text: &str) {
        self.assign(text);
    }
}

/// Shared key / text dispatch for every editable widget.
pub fn handle_input_event<T, P>(event: &NormalizedEvent, target: &mut T, platform: &mut P) -> bool
where
    T: TextInputTarget + ?Sized,
    P: Platform + ?Sized,
{
    let mods = event_modifiers(&*platform);
    let word = mods.word();
    match event {
        NormalizedEvent::KeyDown(_) => {
            let key = event_key(event);
            match key {
                K_A => {
                    if mods.ctrl {
                        let state = target.text_state();
                        state.set_cursor_to_start();
                        state.set_select_cursor_to_end();
                    }
                    true
                }
                K_C => {
                    if mods.ctrl {
                        let selected = target.text_state().selected_text().to_string();
                        set_clipboard_text(platform, &selected);
                    }
                    true
                }
                K_X => {
                    if mods.ctrl {
                        let selected = target.text_state().selected_text().to_string();
                        if set_clipboard_text(platform, &selected) {
                            target.text_state().erase_selection();
                        }
                    }
                    true
                }
                K_V => {
                    if mods.ctrl && has_clipboard_text(platform) {
                        if let Some(text) = get_clipboard_text(platform) {
                            if !text.is_empty() {
                                target.insert_text(&text);
                            }
                        }
                    }
                    true
                }
                K_BACKSPACE => {
                    target.text_state().backspace(word);
                    true
                }
                K_DELETE => {
                    target.text_state().del(word);
                    true
                }
                K_LEFT => {
                    let state = target.text_state();
                    if mods.shift {
                        state.move_select_cursor_left(word);
                    } else {
                        state.move_cursor_left(word);
                    }
                    true
                }
                K_RIGHT => {
                    let state = target.text_state();
                    if mods.shift {
                        state.move_select_cursor_right(word);
                    } else {
                        state.move_cursor_right(word);
                    }
                    true
                }
                K_HOME => {
                    let state = target.text_state();
                    if mods.shift {
                        state.set_select_cursor_to_start();
                    } else {
                        state.set_cursor_to_start();
                    }
                    true
                }
                K_END => {
                    let state = target.text_state();
                    if mods.shift {
                        state.set_select_cursor_to_end();
                    } else {
                        state.set_cursor_to_end();
                    }
                    true
                }
                // The character itself arrives as a TextInput event.
                _ => !mods.ctrl && !mods.alt && is_printable_key(key),
            }
        }
        NormalizedEvent::TextInput { text } => {
            if platform.text_input_replaces_buffer() {
                target.replace_text(text);
            } else {
                target.insert_text(text);
            }
            true
        }
        NormalizedEvent::TextEditing { .. } => true,
        _ => false,
    }
}

pub fn handle_text_input_event<P: Platform + ?Sized>(
    event: &NormalizedEvent,
    state: &mut TextInputState,
    platform: &mut P,
) -> bool {
    handle_input_event(event, state, platform)
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyEvent, MouseButton, MouseButtonEvent};
    use crate::scripted::ScriptedPlatform;
    use dvl_common::keys::{KeyMod, K_ESCAPE, K_F1, K_SPACE, K_Z};

    fn state_with(text: &str) -> TextInputState {
        let mut s = TextInputState::new();
        s.assign(text);
        s
    }

    fn select(s: &mut TextInputState, anchor: usize, cursor: usize) {
        s.anchor = anchor;
        s.cursor = cursor;
    }

    // ---- type / assign ----

    #[test]
    fn test_type_twice_appends() {
        let mut s = TextInputState::new();
        s.type_text("ab");
        s.type_text("cd");
        assert_eq!(s.value(), "abcd");
        assert_eq!(s.cursor_position(), 4);
        assert!(!s.has_selection());
    }

    #[test]
    fn test_type_empty_is_noop() {
        let mut s = state_with("abc");
        s.move_cursor_left(false);
        let before = s.clone();
        s.type_text("");
        assert_eq!(s, before);
    }

    #[test]
    fn test_assign_empty_clears() {
        let mut s = state_with("abc");
        s.assign("");
        assert!(s.is_empty());
        assert_eq!(s.cursor_position(), 0);
        assert_eq!(s.selection_anchor(), 0);
    }

    #[test]
    fn test_type_replaces_selection() {
        let mut s = state_with("hello");
        select(&mut s, 1, 4);
        s.type_text("ipp");
        assert_eq!(s.value(), "hippo");
        assert_eq!(s.cursor_position(), 4);
        assert_eq!(s.selection_anchor(), 4);
    }

    #[test]
    fn test_max_length_truncates_on_char_boundary() {
        let mut s = TextInputState::with_max_length(4);
        s.type_text("ab");
        s.type_text("ééé");
        assert_eq!(s.value(), "abé");
        s.assign("123456");
        assert_eq!(s.value(), "1234");
    }

    // ---- selection ----

    #[test]
    fn test_selected_text_length_matches_offsets() {
        let s0 = state_with("héllo wörld");
        let bounds: Vec<usize> = (0..=s0.len()).filter(|&i| s0.value().is_char_boundary(i)).collect();
        for &a in &bounds {
            for &c in &bounds {
                let mut s = s0.clone();
                select(&mut s, a, c);
                assert_eq!(s.selected_text().len(), a.abs_diff(c));
            }
        }
    }

    #[test]
    fn test_erase_selection() {
        let mut s = state_with("hello");
        assert!(!s.erase_selection());
        select(&mut s, 4, 1);
        assert!(s.erase_selection());
        assert_eq!(s.value(), "ho");
        assert_eq!(s.cursor_position(), 1);
    }

    // ---- backspace / delete ----

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut s = state_with("abc");
        s.set_cursor_to_start();
        s.backspace(false);
        s.backspace(true);
        assert_eq!(s.value(), "abc");
    }

    #[test]
    fn test_del_at_end_is_noop() {
        let mut s = state_with("abc");
        s.del(false);
        s.del(true);
        assert_eq!(s.value(), "abc");
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut s = state_with("aé");
        s.backspace(false);
        assert_eq!(s.value(), "a");
        assert_eq!(s.cursor_position(), 1);
    }

    #[test]
    fn test_backspace_deletes_selection_first() {
        let mut s = state_with("hello");
        select(&mut s, 1, 3);
        s.backspace(true);
        assert_eq!(s.value(), "hlo");
        assert_eq!(s.cursor_position(), 1);
    }

    #[test]
    fn test_word_backspace_crosses_one_token() {
        let mut s = state_with("one two  three");
        s.backspace(true);
        assert_eq!(s.value(), "one two  ");
        s.backspace(true);
        assert_eq!(s.value(), "one ");
        s.backspace(true);
        assert_eq!(s.value(), "");
    }

    #[test]
    fn test_word_del_crosses_one_token() {
        let mut s = state_with("one  two three");
        s.set_cursor_to_start();
        s.del(true);
        assert_eq!(s.value(), "  two three");
        s.del(true);
        assert_eq!(s.value(), " three");
        assert_eq!(s.cursor_position(), 0);
    }

    // ---- movement ----

    #[test]
    fn test_move_collapses_selection() {
        let mut s = state_with("hello");
        s.move_select_cursor_left(false);
        s.move_select_cursor_left(false);
        assert_eq!(s.selected_text(), "lo");
        s.move_cursor_left(false);
        assert!(!s.has_selection());
        assert_eq!(s.cursor_position(), 2);
    }

    #[test]
    fn test_word_movement() {
        let mut s = state_with("alpha beta");
        s.move_cursor_left(true);
        assert_eq!(s.cursor_position(), 6);
        s.move_cursor_left(true);
        assert_eq!(s.cursor_position(), 0);
        s.move_select_cursor_right(true);
        assert_eq!(s.selected_text(), "alpha");
        s.move_cursor_right(true);
        assert_eq!(s.cursor_position(), 10);
        s.move_cursor_right(false);
        assert_eq!(s.cursor_position(), 10);
    }

    #[test]
    fn test_select_to_bounds() {
        let mut s = state_with("hello");
        s.move_cursor_left(false);
        s.set_select_cursor_to_start();
        assert_eq!(s.selected_text(), "hell");
        s.set_cursor_to_end();
        assert!(!s.has_selection());
        s.clear();
        assert_eq!((s.cursor_position(), s.selection_anchor()), (0, 0));
    }

    // ---- event dispatch ----

    fn key(k: i32) -> NormalizedEvent {
        NormalizedEvent::KeyDown(KeyEvent::new(k))
    }

    #[test]
    fn test_ctrl_a_selects_all() {
        let mut p = ScriptedPlatform::new();
        let mut s = state_with("hello");
        p.set_mod_state(KeyMod::LCTRL);
        assert!(handle_text_input_event(&key(K_A), &mut s, &mut p));
        assert_eq!(s.cursor_position(), 5);
        assert_eq!(s.selection_anchor(), 0);
        assert_eq!(s.selected_text(), "hello");
    }

    #[test]
    fn test_ctrl_c_copies_without_mutation() {
        let mut p = ScriptedPlatform::new();
        let mut s = state_with("hello");
        select(&mut s, 1, 4);
        p.set_mod_state(KeyMod::RCTRL);
        assert!(handle_text_input_event(&key(K_C), &mut s, &mut p));
        assert_eq!(p.clipboard_contents(), Some("ell"));
        assert_eq!(s.value(), "hello");
    }

    #[test]
    fn test_ctrl_x_cuts() {
        let mut p = ScriptedPlatform::new();
        let mut s = state_with("hello");
        select(&mut s, 1, 4);
        p.set_mod_state(KeyMod::LCTRL);
        assert!(handle_text_input_event(&key(K_X), &mut s, &mut p));
        assert_eq!(p.clipboard_contents(), Some("ell"));
        assert_eq!(s.value(), "ho");
    }

    #[test]
    fn test_ctrl_x_clipboard_failure_keeps_text() {
        let mut p = ScriptedPlatform::new();
        p.set_clipboard_failure(true);
        let mut s = state_with("hello");
        select(&mut s, 1, 4);
        p.set_mod_state(KeyMod::LCTRL);
        assert!(handle_text_input_event(&key(K_X), &mut s, &mut p));
        assert_eq!(s.value(), "hello");
        assert_eq!(s.selected_text(), "ell");
        assert!(p.last_error().is_none());
    }

    #[test]
    fn test_ctrl_v_pastes_over_selection() {
        let mut p = ScriptedPlatform::new();
        p.set_clipboard_contents("ELL");
        let mut s = state_with("hello");
        select(&mut s, 1, 4);
        p.set_mod_state(KeyMod::LCTRL);
        assert!(handle_text_input_event(&key(K_V), &mut s, &mut p));
        assert_eq!(s.value(), "hELLo");
    }

    #[test]
    fn test_ctrl_v_empty_clipboard_noop() {
        let mut p = ScriptedPlatform::new();
        p.set_clipboard_contents("");
        let mut s = state_with("abc");
        p.set_mod_state(KeyMod::LCTRL);
        assert!(handle_text_input_event(&key(K_V), &mut s, &mut p));
        assert_eq!(s.value(), "abc");
    }

    #[test]
    fn test_letter_keys_without_ctrl_are_swallowed() {
        let mut p = ScriptedPlatform::new();
        let mut s = state_with("abc");
        for k in [K_A, K_C, K_X, K_V, K_SPACE, K_Z] {
            assert!(handle_text_input_event(&key(k), &mut s, &mut p));
        }
        assert_eq!(s.value(), "abc");
        assert!(!s.has_selection());
    }

    #[test]
    fn test_printable_with_alt_not_handled() {
        let mut p = ScriptedPlatform::new();
        let mut s = TextInputState::new();
        p.set_mod_state(KeyMod::LALT);
        assert!(!handle_text_input_event(&key(b'q' as i32), &mut s, &mut p));
        p.set_mod_state(KeyMod::empty());
        assert!(handle_text_input_event(&key(b'q' as i32), &mut s, &mut p));
        assert!(!handle_text_input_event(&key(K_ESCAPE), &mut s, &mut p));
        assert!(!handle_text_input_event(&key(K_F1), &mut s, &mut p));
    }

    #[test]
    fn test_editing_keys_use_live_modifiers() {
        let mut p = ScriptedPlatform::new();
        let mut s = state_with("one two");
        p.set_mod_state(KeyMod::LCTRL | KeyMod::LSHIFT);
        assert!(handle_text_input_event(&key(K_LEFT), &mut s, &mut p));
        assert_eq!(s.selected_text(), "two");
        p.set_mod_state(KeyMod::empty());
        assert!(handle_text_input_event(&key(K_HOME), &mut s, &mut p));
        assert_eq!(s.cursor_position(), 0);
        p.set_mod_state(KeyMod::LSHIFT);
        assert!(handle_text_input_event(&key(K_END), &mut s, &mut p));
        assert_eq!(s.selected_text(), "one two");
        p.set_mod_state(KeyMod::empty());
        assert!(handle_text_input_event(&key(K_DELETE), &mut s, &mut p));
        assert!(s.is_empty());
        assert!(handle_text_input_event(&key(K_BACKSPACE), &mut s, &mut p));
        assert!(handle_text_input_event(&key(K_RIGHT), &mut s, &mut p));
    }

    #[test]
    fn test_text_events() {
        let mut p = ScriptedPlatform::new();
        let mut s = state_with("ab");
        assert!(handle_text_input_event(&NormalizedEvent::text_input("c"), &mut s, &mut p));
        assert_eq!(s.value(), "abc");
        assert!(handle_text_input_event(&NormalizedEvent::TextEditing { text: "x".to_string() }, &mut s, &mut p));
        assert_eq!(s.value(), "abc");
        p.set_text_input_replaces_buffer(true);
        assert!(handle_text_input_event(&NormalizedEvent::text_input("new"), &mut s, &mut p));
        assert_eq!(s.value(), "new");
    }

    #[test]
    fn test_unrelated_events_not_handled() {
        let mut p = ScriptedPlatform::new();
        let mut s = TextInputState::new();
        let up = NormalizedEvent::MouseButtonUp(MouseButtonEvent { button: MouseButton::Left, x: 0, y: 0 });
        assert!(!handle_text_input_event(&up, &mut s, &mut p));
        assert!(!handle_text_input_event(&NormalizedEvent::Quit, &mut s, &mut p));
        assert!(!handle_text_input_event(&NormalizedEvent::key_up(K_A), &mut s, &mut p));
    }
}
