//! Progress reporting in a single Telegram message.
//!
//! [`ProgressBar`] wraps a sequence of known length. The first pull publishes the bar at 0%
//! (a new message, or an edit of a caller-supplied one); every later pull first edits the
//! message to count the previously yielded element as done, then yields the next element.
//! Any failed publish ends the run with [`NotifyError::Telegram`].

mod render;


use futures::stream::{self, Stream};
use notify_core::{validate_text, Bot, MessageOptions, NotifyError, ParseMode, Result};
use tracing::{debug, warn};

pub use render::{ProgressState, DEFAULT_BAR_WIDTH, DEFAULT_LABEL, LABEL_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Nothing published yet.
    Init,
    /// Bar published; the last pull yielded an element.
    Running,
    Done,
    Failed,
}

/// Iterates `items` while mirroring progress into one Telegram message.
pub struct ProgressBar<'a, B: Bot + ?Sized, I: Iterator> {
    bot: &'a B,
    items: I,
    state: ProgressState,
    message_id: Option<i64>,
    phase: Phase,
}

impl<'a, B: Bot + ?Sized, I: Iterator> ProgressBar<'a, B, I> {
    /// Fails with [`NotifyError::Validation`] when the length of `items` can't be known up front
    /// (its size hint is not exact) or is zero. No request is made in that case.
    pub fn new<T>(bot: &'a B, items: T) -> Result<Self>
    where
        T: IntoIterator<IntoIter = I>,
    {
        let items = items.into_iter();
        let total = match items.size_hint() {
            (lower, Some(upper)) if lower == upper => lower,
            _ => {
                return Err(NotifyError::Validation(
                    "Progress bar needs a sequence with a known length".to_string(),
                ))
            }
        };
        if total == 0 {
            return Err(NotifyError::Validation(
                "Progress bar needs a non-empty sequence".to_string(),
            ));
        }

        Ok(Self {
            bot,
            items,
            state: ProgressState::new(total, DEFAULT_LABEL, DEFAULT_BAR_WIDTH),
            message_id: None,
            phase: Phase::Init,
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.state.label = label.into();
        self
    }

    /// Reuse an existing message instead of sending a new one.
    pub fn with_message_id(mut self, message_id: i64) -> Self {
        self.message_id = Some(message_id);
        self
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.state.bar_width = bar_width;
        self
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    /// Id of the progress message, once known.
    pub fn message_id(&self) -> Option<i64> {
        self.message_id
    }

    /// Next element, or `Some(Err(_))` when publishing progress failed. Returns `None` once the
    /// sequence is exhausted or after an error.
    pub async fn next(&mut self) -> Option<Result<I::Item>> {
        match self.phase {
            Phase::Done | Phase::Failed => return None,
            Phase::Init => {
                if let Err(e) = self.publish().await {
                    return Some(Err(self.fail(e)));
                }
                self.phase = Phase::Running;
            }
            Phase::Running => {
                self.state.advance();
                if let Err(e) = self.publish().await {
                    return Some(Err(self.fail(e)));
                }
            }
        }

        match self.items.next() {
            Some(item) => Some(Ok(item)),
            None => {
                debug!(message_id = ?self.message_id, total = self.state.total, "Progress complete");
                self.phase = Phase::Done;
                None
            }
        }
    }

    /// Adapts the bar into a [`Stream`] with the same semantics as [`ProgressBar::next`].
    pub fn into_stream(self) -> impl Stream<Item = Result<I::Item>> + 'a
    where
        I: 'a,
    {
        stream::unfold(self, |mut bar| async move {
            let item = bar.next().await?;
            Some((item, bar))
        })
    }

    /// Sends the first render, or edits the progress message with the current one.
    async fn publish(&mut self) -> Result<()> {
        let text = self.state.render();
        validate_text(&text)?;
        let options = MessageOptions::with_parse_mode(ParseMode::MarkdownV2);

        match self.message_id {
            Some(id) => {
                self.bot.edit_message_text(id, &text, &options).await?;
            }
            None => {
                let message = self.bot.send_message(&text, &options).await?.into_result()?;
                self.message_id = Some(message.message_id);
            }
        }
        debug!(
            message_id = ?self.message_id,
            current = self.state.current,
            total = self.state.total,
            "Progress published"
        );
        Ok(())
    }

    fn fail(&mut self, e: NotifyError) -> NotifyError {
        self.phase = Phase::Failed;
        warn!(
            message_id = ?self.message_id,
            current = self.state.current,
            error = %e,
            "Progress update failed"
        );
        NotifyError::Telegram(format!("Failed to update progress bar: {}", e.message()))
    }
}
