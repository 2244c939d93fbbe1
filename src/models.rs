//! Domain models shared by the store and the TUI. The intent is that these
//! types stay light-weight data holders so other layers can focus on
//! presentation and persistence logic. The draft lives here too because its
//! transition rules (mood selection, intensity clamping, context toggling)
//! are pure state logic that should be testable without a terminal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default intensity a fresh draft starts from.
pub const DEFAULT_INTENSITY: u8 = 75;

/// The fixed set of moods a check-in can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Angry,
    Joyful,
    Calm,
    Sad,
    Anxious,
}

impl Mood {
    /// All moods in carousel order. The order doubles as the tally index in
    /// the weekly aggregation.
    pub const ALL: [Mood; 5] = [
        Mood::Angry,
        Mood::Joyful,
        Mood::Calm,
        Mood::Sad,
        Mood::Anxious,
    ];

    /// Human-facing label shown on cards and in the history feed.
    pub fn label(self) -> &'static str {
        match self {
            Mood::Angry => "Angry",
            Mood::Joyful => "Joyful",
            Mood::Calm => "Calm",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
        }
    }

    /// Emoji used as the card face and the feed avatar.
    pub fn icon(self) -> &'static str {
        match self {
            Mood::Angry => "😡",
            Mood::Joyful => "🥰",
            Mood::Calm => "😌",
            Mood::Sad => "😢",
            Mood::Anxious => "😰",
        }
    }

    /// Position inside [`Mood::ALL`], used for fixed-size tallies.
    pub fn index(self) -> usize {
        match self {
            Mood::Angry => 0,
            Mood::Joyful => 1,
            Mood::Calm => 2,
            Mood::Sad => 3,
            Mood::Anxious => 4,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Situational tags the user can attach to an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Work,
    Family,
    Sleep,
    Exercise,
}

impl Context {
    /// All tags in display order; the digit keys 1-4 map onto this array.
    pub const ALL: [Context; 4] = [
        Context::Work,
        Context::Family,
        Context::Sleep,
        Context::Exercise,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Context::Work => "Work",
            Context::Family => "Family",
            Context::Sleep => "Sleep",
            Context::Exercise => "Exercise",
        }
    }

    /// Lowercase tag used for the `#work` style chips in the feed.
    pub fn tag(self) -> &'static str {
        match self {
            Context::Work => "work",
            Context::Family => "family",
            Context::Sleep => "sleep",
            Context::Exercise => "exercise",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A committed, immutable record of one check-in. Instances are only built by
/// the entry store at commit time; everything else reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    /// Opaque unique id assigned at creation. A millisecond timestamp plus a
    /// session counter, so two commits in the same millisecond stay distinct.
    pub id: String,
    pub mood: Mood,
    /// Intensity in [0,100].
    pub intensity: u8,
    /// Selected tags in selection order. Order carries no semantic weight but
    /// is preserved for display.
    #[serde(default)]
    pub contexts: Vec<Context>,
    /// Free-text note, possibly empty. Trimmed at commit time.
    #[serde(default)]
    pub note: String,
    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// The in-progress, uncommitted check-in being edited on the capture screen.
///
/// A draft survives navigation between screens untouched; it is only cleared
/// when a save completes. This is a deliberate UX property: switching to the
/// history feed and back must not lose half-entered state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub mood: Option<Mood>,
    pub intensity: u8,
    pub contexts: Vec<Context>,
    pub note: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            mood: None,
            intensity: DEFAULT_INTENSITY,
            contexts: Vec::new(),
            note: String::new(),
        }
    }
}

impl Draft {
    /// Choose a mood. Until this happens the save action stays disabled.
    pub fn select_mood(&mut self, mood: Mood) {
        self.mood = Some(mood);
    }

    /// Set the intensity, clamping out-of-range input into [0,100]. The
    /// slider itself only steps within range; clamping keeps the API total
    /// for any direct caller.
    pub fn set_intensity(&mut self, value: i64) {
        self.intensity = value.clamp(0, 100) as u8;
    }

    /// Toggle a context tag: absent tags are appended, present tags removed.
    /// Toggling the same tag twice restores the prior set.
    pub fn toggle_context(&mut self, context: Context) {
        if let Some(pos) = self.contexts.iter().position(|c| *c == context) {
            self.contexts.remove(pos);
        } else {
            self.contexts.push(context);
        }
    }

    /// Replace the note verbatim. Whitespace is trimmed when the draft is
    /// committed, not at every keystroke.
    pub fn set_note(&mut self, text: impl Into<String>) {
        self.note = text.into();
    }

    /// Whether the save action is currently allowed.
    pub fn can_save(&self) -> bool {
        self.mood.is_some()
    }

    /// Reset to defaults after a successful save (or on discard).
    pub fn reset(&mut self) {
        *self = Draft::default();
    }
}

/// Aggregate over the trailing seven days: the most frequent mood, how often
/// it occurred, and how many entries fell inside the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekStats {
    pub top_mood: Mood,
    pub count: usize,
    pub total: usize,
}

/// Verbal band for an intensity value, mirroring the capture slider's label.
pub fn intensity_label(value: u8) -> &'static str {
    match value {
        0..=24 => "Low",
        25..=49 => "Mild",
        50..=74 => "Moderate",
        _ => "High",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_starts_with_documented_defaults() {
        let draft = Draft::default();
        assert_eq!(draft.mood, None);
        assert_eq!(draft.intensity, DEFAULT_INTENSITY);
        assert!(draft.contexts.is_empty());
        assert!(draft.note.is_empty());
        assert!(!draft.can_save());
    }

    #[test]
    fn selecting_a_mood_enables_save() {
        let mut draft = Draft::default();
        draft.select_mood(Mood::Calm);
        assert!(draft.can_save());
        assert_eq!(draft.mood, Some(Mood::Calm));
    }

    #[test]
    fn set_intensity_clamps_out_of_range_input() {
        let mut draft = Draft::default();
        draft.set_intensity(130);
        assert_eq!(draft.intensity, 100);
        draft.set_intensity(-5);
        assert_eq!(draft.intensity, 0);
        draft.set_intensity(42);
        assert_eq!(draft.intensity, 42);
    }

    #[test]
    fn toggle_context_is_its_own_inverse() {
        let mut draft = Draft::default();
        draft.toggle_context(Context::Sleep);
        draft.toggle_context(Context::Work);
        let before = draft.contexts.clone();

        draft.toggle_context(Context::Exercise);
        draft.toggle_context(Context::Exercise);
        assert_eq!(draft.contexts, before);
    }

    #[test]
    fn toggle_context_never_duplicates() {
        let mut draft = Draft::default();
        draft.toggle_context(Context::Family);
        draft.toggle_context(Context::Family);
        draft.toggle_context(Context::Family);
        assert_eq!(draft.contexts, vec![Context::Family]);
    }

    #[test]
    fn reset_returns_to_defaults() {
        let mut draft = Draft::default();
        draft.select_mood(Mood::Sad);
        draft.set_intensity(10);
        draft.toggle_context(Context::Work);
        draft.set_note("long day");
        draft.reset();
        assert_eq!(draft, Draft::default());
    }

    #[test]
    fn intensity_labels_follow_slider_bands() {
        assert_eq!(intensity_label(0), "Low");
        assert_eq!(intensity_label(24), "Low");
        assert_eq!(intensity_label(25), "Mild");
        assert_eq!(intensity_label(49), "Mild");
        assert_eq!(intensity_label(50), "Moderate");
        assert_eq!(intensity_label(74), "Moderate");
        assert_eq!(intensity_label(75), "High");
        assert_eq!(intensity_label(100), "High");
    }

    #[test]
    fn moods_round_trip_through_lowercase_json() {
        let json = serde_json::to_string(&Mood::Anxious).expect("serialize");
        assert_eq!(json, "\"anxious\"");
        let back: Mood = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Mood::Anxious);
    }
}
