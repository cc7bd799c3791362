//! Keyboard cursor over the result list.

/// Position of the highlighted result, or no highlight.
///
/// Moving down from no highlight lands on the first row and stops at the
/// last one. Moving up from the first row drops the highlight.
///
/// # Examples
///
/// ```
/// use zlistings::app::Cursor;
///
/// let mut cursor = Cursor::default();
/// cursor.down(3);
/// cursor.down(3);
/// assert_eq!(cursor.index(), Some(1));
/// cursor.up();
/// cursor.up();
/// assert_eq!(cursor.index(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor(Option<usize>);

impl Cursor {
    /// Moves towards the end of a list of `len` results. No-op on an empty list.
    pub fn down(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.0 = Some(match self.0 {
            None => 0,
            Some(i) => (i + 1).min(len - 1),
        });
    }

    /// Moves towards the top; leaving the first row clears the highlight.
    pub fn up(&mut self) {
        self.0 = match self.0 {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub fn reset(&mut self) {
        self.0 = None;
    }

    #[must_use]
    pub const fn index(self) -> Option<usize> {
        self.0
    }

    /// Returns the highlighted index if it addresses one of `len` results.
    #[must_use]
    pub fn within(self, len: usize) -> Option<usize> {
        self.0.filter(|&i| i < len)
    }
}
