// number_input.rs — integer entry on top of TextInputState
//
// Only digits get in, plus one leading minus when the range allows negative
// values. Whenever the buffer parses, it is clamped into [min, max].

use crate::event::NormalizedEvent;
use crate::platform::Platform;
use crate::text_input::{handle_input_event, TextInputState, TextInputTarget};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberInputState {
    text_input: TextInputState,
    min: i32,
    max: i32,
}

impl NumberInputState {
    pub fn new(min: i32, max: i32) -> Self {
        Self {
            text_input: TextInputState::new(),
            min,
            max,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn text_input(&self) -> &TextInputState {
        &self.text_input
    }

    pub fn text_input_mut(&mut self) -> &mut TextInputState {
        &mut self.text_input
    }

    /// Parsed buffer, or `default_value` when it does not parse.
    pub fn value(&self, default_value: i32) -> i32 {
        self.text_input.value().parse::<i32>().unwrap_or(default_value)
    }

    /// Keep decimal digits only. With `allow_minus`, a `-` at the very start
    /// of `text` survives.
    pub fn filter_str(text: &str, allow_minus: bool) -> String {
        let mut result = String::with_capacity(text.len());
        let digits = match text.strip_prefix('-') {
            Some(rest) if allow_minus => {
                result.push('-');
                rest
            }
            _ => text,
        };
        result.extend(digits.chars().filter(char::is_ascii_digit));
        result
    }

    /// Insert at the cursor. A minus is only accepted as the first character.
    pub fn type_text(&mut self, text: &str) {
        let allow_minus = self.min < 0 && self.text_input.cursor_position() == 0;
        let filtered = Self::filter_str(text, allow_minus);
        if filtered.is_empty() {
            return;
        }
        self.text_input.type_text(&filtered);
        self.enforce_range();
    }

    /// Replace the buffer. Text with no digits clears it.
    pub fn assign(&mut self, text: &str) {
        let filtered = Self::filter_str(text, self.min < 0);
        if filtered.is_empty() {
            self.text_input.clear();
            return;
        }
        self.text_input.assign(&filtered);
        self.enforce_range();
    }

    pub fn enforce_range(&mut self) {
        if self.text_input.is_empty() {
            return;
        }
        let Ok(parsed) = self.text_input.value().parse::<i32>() else {
            return;
        };
        if parsed > self.max {
            self.text_input.assign(&self.max.to_string());
        } else if parsed < self.min {
            self.text_input.assign(&self.min.to_string());
        }
    }
}

impl TextInputTarget for NumberInputState {
    fn text_state(&mut self) -> &mut TextInputState {
        &mut self.text_input
    }

    fn insert_text(&mut self, text: &str) {
        self.type_text(text);
    }

    fn replace_text(&mut self, text: &str) {
        self.assign(text);
    }
}

pub fn handle_number_input_event<P: Platform + ?Sized>(
    event: &NormalizedEvent,
    state: &mut NumberInputState,
    platform: &mut P,
) -> bool {
    handle_input_event(event, state, platform)
}
