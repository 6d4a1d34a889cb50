use anyhow::{anyhow, bail, Result};
use league_core::DateOfBirth;

/// Hard cap on typed characters. Domain limits are enforced by the store so
/// that oversized entries still get a proper error message.
pub const MAX_INPUT_LEN: usize = 64;

/// Single-line ASCII text field with a cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    input: String,
    cursor: usize,
}

impl TextInput {
    pub fn with_value(value: &str) -> Self {
        let input: String = value
            .chars()
            .filter(|ch| ch.is_ascii() && !ch.is_ascii_control())
            .take(MAX_INPUT_LEN)
            .collect();
        Self {
            cursor: input.len(),
            input,
        }
    }

    pub fn raw(&self) -> &str {
        &self.input
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.input.len() as isize;
        self.cursor = (self.cursor as isize + delta).clamp(0, len) as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    pub fn insert(&mut self, ch: char) {
        if self.input.len() >= MAX_INPUT_LEN {
            return;
        }
        if ch.is_ascii() && !ch.is_ascii_control() {
            self.input.insert(self.cursor, ch);
            self.cursor += 1;
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 && self.cursor <= self.input.len() {
            self.cursor -= 1;
            self.input.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    /// Entered text without surrounding whitespace.
    pub fn value(&self) -> String {
        self.input.trim().to_string()
    }
}

/// Parse a kit number as typed. Range checks belong to the store.
pub fn parse_kit_number(raw: &str) -> Result<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("Enter a kit number");
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| anyhow!("Invalid input for kit number: '{trimmed}'"))
}

/// Parse `dd mm yyyy`; `/`, `-` and `.` are accepted as separators too.
pub fn parse_date_of_birth(raw: &str) -> Result<DateOfBirth> {
    let parts: Vec<&str> = raw
        .split(|c: char| c.is_whitespace() || matches!(c, '/' | '-' | '.'))
        .filter(|part| !part.is_empty())
        .collect();
    let [day, month, year] = parts.as_slice() else {
        bail!("Date of birth must be entered as dd mm yyyy");
    };
    let number = |label: &str, value: &str| {
        value
            .parse::<i32>()
            .map_err(|_| anyhow!("Invalid {label} '{value}' in date of birth"))
    };
    Ok(DateOfBirth::new(
        number("day", *day)?,
        number("month", *month)?,
        number("year", *year)?,
    ))
}
