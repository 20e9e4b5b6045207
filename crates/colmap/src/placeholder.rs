//! Parameter placeholders: `?` or `$n`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

static NUMBERED_PLACEHOLDERS: AtomicBool = AtomicBool::new(false);

/// Select the placeholder style used by the free statement functions.
///
/// `true` switches to postgres-style `$n` placeholders, `false` (the default)
/// to `?` placeholders. Set this during startup: statements being built on
/// other threads at the moment of the switch may use either style.
pub fn set_numbered_placeholders(yes: bool) {
    NUMBERED_PLACEHOLDERS.store(yes, Ordering::Relaxed);
}

/// Whether the free statement functions currently emit `$n` placeholders.
pub fn numbered_placeholders() -> bool {
    NUMBERED_PLACEHOLDERS.load(Ordering::Relaxed)
}

/// How placeholders are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaceholderStyle {
    /// `?` for every parameter.
    #[default]
    Question,
    /// `$1`, `$2`, ... (postgres).
    Numbered,
}

impl PlaceholderStyle {
    /// The style selected by [`set_numbered_placeholders`].
    pub fn current() -> Self {
        Self::from_numbered(numbered_placeholders())
    }

    pub fn from_numbered(numbered: bool) -> Self {
        if numbered {
            Self::Numbered
        } else {
            Self::Question
        }
    }

    pub fn is_numbered(self) -> bool {
        matches!(self, Self::Numbered)
    }
}

/// A placeholder generator.
///
/// With numbered placeholders, a generator starting at zero yields `$1` on
/// its first call to [`Placeholder::next`]; one started at 1 yields `$2`,
/// leaving `$1` free for a caller-written WHERE clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder {
    value: i64,
    style: PlaceholderStyle,
}

impl Placeholder {
    pub fn new(style: PlaceholderStyle) -> Self {
        Self::starting_at(style, 0)
    }

    /// A generator whose first placeholder is `$(value + 1)`.
    pub fn starting_at(style: PlaceholderStyle, value: i64) -> Self {
        Self { value, style }
    }

    /// A generator using the process-wide style.
    pub fn current() -> Self {
        Self::new(PlaceholderStyle::current())
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn style(&self) -> PlaceholderStyle {
        self.style
    }

    /// Advance the counter and render the new placeholder.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> String {
        self.value += 1;
        self.to_string()
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.style {
            PlaceholderStyle::Question => f.write_str("?"),
            PlaceholderStyle::Numbered => write!(f, "${}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_marks_ignore_the_counter() {
        let mut p = Placeholder::new(PlaceholderStyle::Question);
        assert_eq!([p.next(), p.next(), p.next()], ["?", "?", "?"]);
        assert_eq!(p.value(), 3);
    }

    #[test]
    fn numbered_pre_increments() {
        let mut p = Placeholder::new(PlaceholderStyle::Numbered);
        assert_eq!([p.next(), p.next(), p.next()], ["$1", "$2", "$3"]);
    }

    #[test]
    fn seeded_counter_reserves_first_slot() {
        let mut p = Placeholder::starting_at(PlaceholderStyle::Numbered, 1);
        assert_eq!(p.to_string(), "$1");
        assert_eq!(p.next(), "$2");
    }

    #[test]
    fn style_from_flag() {
        assert_eq!(PlaceholderStyle::from_numbered(true), PlaceholderStyle::Numbered);
        assert_eq!(PlaceholderStyle::from_numbered(false), PlaceholderStyle::Question);
        assert_eq!(PlaceholderStyle::default(), PlaceholderStyle::Question);
        assert!(PlaceholderStyle::Numbered.is_numbered());
    }
}
