//! Value types shared by the Story aggregate, its events and its views.

use serde::{Deserialize, Serialize};
use taleweave_core::error::DomainError;

const TITLE_MAX: usize = 200;
const DESCRIPTION_MAX: usize = 2000;
const GENRE_MAX: usize = 50;

/// Upper bound for `max_words_per_turn`.
pub const WORDS_PER_TURN_CAP: u32 = 5_000;
/// Upper bound for `max_characters_per_turn`.
pub const CHARACTERS_PER_TURN_CAP: u32 = 30_000;
/// Upper bound for `max_segments`.
pub const SEGMENTS_CAP: u32 = 1_000;

/// Who can see a story and ask to join it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Listed for everyone; anyone may request to join.
    Public,
    /// Visible to participants and invitees only; joining is by invitation.
    Private,
}

/// A participant's role in a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The creator; approves join requests and sends invitations.
    Author,
    /// Joined through an invitation or an approved request.
    Participant,
}

/// Author-controlled settings of a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySettings {
    /// Story title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Optional genre label.
    pub genre: Option<String>,
    /// Maximum words in a single segment.
    pub max_words_per_turn: u32,
    /// Maximum characters in a single segment.
    pub max_characters_per_turn: u32,
    /// Number of segments after which the story is complete.
    pub max_segments: u32,
    /// Visibility of the story.
    pub visibility: Visibility,
}

fn check_range(name: &str, value: u32, cap: u32) -> Result<(), DomainError> {
    if value == 0 || value > cap {
        return Err(DomainError::Validation(format!(
            "{name} must be between 1 and {cap}"
        )));
    }
    Ok(())
}

impl StorySettings {
    /// Trims text fields and checks every bound.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` naming the first offending field.
    pub fn normalized(self) -> Result<Self, DomainError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if title.chars().count() > TITLE_MAX {
            return Err(DomainError::Validation(format!(
                "title must be at most {TITLE_MAX} characters"
            )));
        }
        let description = self.description.trim().to_owned();
        if description.chars().count() > DESCRIPTION_MAX {
            return Err(DomainError::Validation(format!(
                "description must be at most {DESCRIPTION_MAX} characters"
            )));
        }
        let genre = self
            .genre
            .map(|g| g.trim().to_owned())
            .filter(|g| !g.is_empty());
        if genre.as_ref().is_some_and(|g| g.chars().count() > GENRE_MAX) {
            return Err(DomainError::Validation(format!(
                "genre must be at most {GENRE_MAX} characters"
            )));
        }
        check_range("max_words_per_turn", self.max_words_per_turn, WORDS_PER_TURN_CAP)?;
        check_range(
            "max_characters_per_turn",
            self.max_characters_per_turn,
            CHARACTERS_PER_TURN_CAP,
        )?;
        check_range("max_segments", self.max_segments, SEGMENTS_CAP)?;

        Ok(Self {
            title,
            description,
            genre,
            ..self
        })
    }
}

/// Word and character counts of a segment's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextMeasure {
    /// Whitespace-separated tokens.
    pub word_count: u32,
    /// Unicode scalar values.
    pub character_count: u32,
}

impl TextMeasure {
    /// Measures `text` as written.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            word_count: u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX),
            character_count: u32::try_from(text.chars().count()).unwrap_or(u32::MAX),
        }
    }
}
