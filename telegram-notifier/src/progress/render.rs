//! Pure progress rendering: counters in, MarkdownV2 code block out.

use notify_core::MAX_MESSAGE_LENGTH;

/// Label column width; longer labels are cut, shorter ones padded.
pub const LABEL_WIDTH: usize = 15;

pub const DEFAULT_LABEL: &str = "Progress:";
pub const DEFAULT_BAR_WIDTH: usize = 20;

/// Widths beyond this can't fit in a message; rendering caps `bar_width` here.
pub const MAX_BAR_WIDTH: usize = MAX_MESSAGE_LENGTH;

/// Counters for one progress run. `current` never exceeds `total`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub total: usize,
    pub current: usize,
    pub bar_width: usize,
    pub label: String,
}

impl ProgressState {
    pub fn new(total: usize, label: impl Into<String>, bar_width: usize) -> Self {
        Self {
            total,
            current: 0,
            bar_width,
            label: label.into(),
        }
    }

    /// Moves one step forward, saturating at `total`.
    pub fn advance(&mut self) {
        self.current = (self.current + 1).min(self.total);
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.current as f64 / self.total as f64
    }

    /// Bar width actually drawn.
    pub fn drawn_width(&self) -> usize {
        self.bar_width.min(MAX_BAR_WIDTH)
    }

    /// `floor(width * current / total)`, always within `0..=drawn_width()`.
    pub fn filled(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        let done = self.current.min(self.total) as u128;
        (self.drawn_width() as u128 * done / self.total as u128) as usize
    }

    /// One display line: `<label:15> [<bar>] <percent:6.1>%`.
    pub fn line(&self) -> String {
        let filled = self.filled();
        let label: String = self.label.chars().take(LABEL_WIDTH).collect();
        format!(
            "{:<width$} [{}{}] {:>6.1}%",
            label,
            "=".repeat(filled),
            " ".repeat(self.drawn_width() - filled),
            self.percent(),
            width = LABEL_WIDTH
        )
    }

    /// The line inside a MarkdownV2 pre block, with the two characters that are special there escaped.
    pub fn render(&self) -> String {
        let line = self.line().replace('\\', "\\\\").replace('`', "\\`");
        format!("```\n{}\n```", line)
    }
}
