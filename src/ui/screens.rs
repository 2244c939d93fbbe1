/// Scroll state scoped to the history feed. The feed renders as a single
/// paragraph, so a line offset is all the screen needs to remember.
pub(crate) struct HistoryScreen {
    pub(crate) scroll: u16,
}

impl HistoryScreen {
    pub(crate) fn new() -> Self {
        Self { scroll: 0 }
    }

    /// Move the feed by the signed amount, saturating at the top. Scrolling
    /// past the end renders blank space, same as the other paragraph views.
    pub(crate) fn scroll_by(&mut self, delta: i16) {
        if delta.is_negative() {
            self.scroll = self.scroll.saturating_sub(delta.unsigned_abs());
        } else {
            self.scroll = self.scroll.saturating_add(delta as u16);
        }
    }

    /// Jump back to the newest entry.
    pub(crate) fn reset(&mut self) {
        self.scroll = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolling_saturates_at_the_top() {
        let mut screen = HistoryScreen::new();
        screen.scroll_by(-3);
        assert_eq!(screen.scroll, 0);
        screen.scroll_by(5);
        screen.scroll_by(-2);
        assert_eq!(screen.scroll, 3);
        screen.reset();
        assert_eq!(screen.scroll, 0);
    }
}
