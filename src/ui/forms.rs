use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Editor state for the note modal. The draft's note is copied in when the
/// modal opens and only written back when the user accepts, so cancelling
/// leaves the draft untouched.
#[derive(Clone)]
pub(crate) struct NoteForm {
    text: String,
}

impl NoteForm {
    /// Open the editor seeded with the draft's current note.
    pub(crate) fn new(current: &str) -> Self {
        Self {
            text: current.to_string(),
        }
    }

    /// Append a character, rejecting control input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.text.push(ch);
        true
    }

    /// Remove the last character.
    pub(crate) fn backspace(&mut self) {
        self.text.pop();
    }

    /// Finish editing and hand the text back to the draft. Whitespace stays
    /// as typed; trimming happens at commit time, not here.
    pub(crate) fn accept(self) -> String {
        self.text
    }

    /// Current text, for rendering.
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Render the editor content line with a trailing cursor marker, using a
    /// dimmed placeholder while empty.
    pub(crate) fn build_line(&self) -> Line<'static> {
        if self.text.is_empty() {
            Line::from(vec![
                Span::styled("<optional>", Style::default().fg(Color::DarkGray)),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ])
        } else {
            Line::from(vec![
                Span::raw(self.text.clone()),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace_edit_the_buffer() {
        let mut form = NoteForm::new("");
        assert!(form.push_char('h'));
        assert!(form.push_char('i'));
        form.backspace();
        assert_eq!(form.text(), "h");
    }

    #[test]
    fn control_characters_are_rejected() {
        let mut form = NoteForm::new("x");
        assert!(!form.push_char('\t'));
        assert_eq!(form.text(), "x");
    }

    #[test]
    fn accept_returns_the_edited_text_verbatim() {
        let mut form = NoteForm::new("slow ");
        form.push_char('d');
        form.push_char('a');
        form.push_char('y');
        assert_eq!(form.accept(), "slow day");
    }
}
