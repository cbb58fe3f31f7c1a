use std::sync::LazyLock;

use regex::Regex;

use crate::model::ids::{CourseId, ExerciseId, QuizId, TopicId};

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A named unit of course content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub title: String,
    pub notes: Option<String>,
    pub theory: Option<String>,
    pub quiz_id: Option<QuizId>,
    pub exercise_id: Option<ExerciseId>,
}

/// What a topic page renders in its main pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicBody<'a> {
    /// Markdown notes.
    Notes(&'a str),
    /// Plain-text theory block, used when no notes exist.
    Theory(&'a str),
    Empty,
}

impl Topic {
    /// Title with numbering conventions removed.
    #[must_use]
    pub fn display_title(&self) -> String {
        clean_topic_title(&self.title)
    }

    #[must_use]
    pub fn body(&self) -> TopicBody<'_> {
        fn non_blank(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|v| !v.trim().is_empty())
        }
        if let Some(notes) = non_blank(&self.notes) {
            TopicBody::Notes(notes)
        } else if let Some(theory) = non_blank(&self.theory) {
            TopicBody::Theory(theory)
        } else {
            TopicBody::Empty
        }
    }

    #[must_use]
    pub fn has_quiz(&self) -> bool {
        self.quiz_id.is_some()
    }
}

//
// ─── PROJECTS & CERTIFICATION ──────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectTier {
    Mini,
    Mid,
    Major,
}

impl ProjectTier {
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mini" => Some(Self::Mini),
            "mid" => Some(Self::Mid),
            "major" => Some(Self::Major),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ProjectTier::Mini => "Mini project",
            ProjectTier::Mid => "Mid project",
            ProjectTier::Major => "Major project",
        }
    }
}

/// A coding project attached to a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub tier: ProjectTier,
    pub title: String,
    pub description: String,
}

/// Certification availability as reported by the server.
///
/// Never inferred from the course title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CertificationOffer {
    Available {
        price_cents: u32,
        currency: String,
    },
    #[default]
    ComingSoon,
}

impl CertificationOffer {
    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, CertificationOffer::Available { .. })
    }

    /// Price formatted for display, e.g. `"USD 49.00"`.
    #[must_use]
    pub fn price_label(&self) -> Option<String> {
        match self {
            CertificationOffer::Available {
                price_cents,
                currency,
            } => Some(format!(
                "{currency} {}.{:02}",
                price_cents / 100,
                price_cents % 100
            )),
            CertificationOffer::ComingSoon => None,
        }
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub topics: Vec<Topic>,
    pub projects: Vec<Project>,
    pub certification: CertificationOffer,
}

impl Course {
    #[must_use]
    pub fn topic(&self, id: &TopicId) -> Option<&Topic> {
        self.topics.iter().find(|topic| &topic.id == id)
    }

    #[must_use]
    pub fn topic_index(&self, id: &TopicId) -> Option<usize> {
        self.topics.iter().position(|topic| &topic.id == id)
    }

    #[must_use]
    pub fn quiz_count(&self) -> usize {
        self.topics.iter().filter(|topic| topic.has_quiz()).count()
    }
}

//
// ─── TITLE CLEANUP ─────────────────────────────────────────────────────────────
//

static TITLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:(?:topic|lesson|chapter|module)\s+)?\d+\s*[.):\-]\s*")
        .expect("title prefix pattern is valid")
});

static TITLE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*(?:[\-–—]\s*\d+|\(\d+\))\s*$")
        .expect("title suffix pattern is valid")
});

/// Strips numbering like `"1. Title – 3"` down to `"Title"`.
///
/// Falls back to the trimmed input when stripping would leave nothing.
#[must_use]
pub fn clean_topic_title(raw: &str) -> String {
    let without_prefix = TITLE_PREFIX.replace(raw, "");
    let cleaned = TITLE_SUFFIX.replace(&without_prefix, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        raw.trim().to_owned()
    } else {
        cleaned.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(notes: Option<&str>, theory: Option<&str>) -> Topic {
        Topic {
            id: TopicId::new("t1").unwrap(),
            title: "1. Variables – 2".into(),
            notes: notes.map(str::to_owned),
            theory: theory.map(str::to_owned),
            quiz_id: None,
            exercise_id: None,
        }
    }

    #[test]
    fn strips_numbering_prefix_and_suffix() {
        assert_eq!(clean_topic_title("1. Title – 3"), "Title");
        assert_eq!(clean_topic_title("12) Loops - 4"), "Loops");
        assert_eq!(clean_topic_title("Topic 3: Arrays"), "Arrays");
        assert_eq!(clean_topic_title("Lesson 2 - Classes (5)"), "Classes");
        assert_eq!(clean_topic_title("  Plain title  "), "Plain title");
    }

    #[test]
    fn keeps_inner_numbers_and_hyphens() {
        assert_eq!(clean_topic_title("Java 8 Streams"), "Java 8 Streams");
        assert_eq!(clean_topic_title("2. Pre-processing"), "Pre-processing");
    }

    #[test]
    fn pure_number_title_falls_back_to_input() {
        assert_eq!(clean_topic_title(" 42. "), "42.");
    }

    #[test]
    fn body_prefers_notes_then_theory() {
        assert_eq!(topic(Some("# Hi"), Some("t")).body(), TopicBody::Notes("# Hi"));
        assert_eq!(topic(Some("  "), Some("theory")).body(), TopicBody::Theory("theory"));
        assert_eq!(topic(None, None).body(), TopicBody::Empty);
        assert_eq!(topic(None, None).display_title(), "Variables");
    }

    #[test]
    fn certification_price_label() {
        let offer = CertificationOffer::Available {
            price_cents: 4_950,
            currency: "USD".into(),
        };
        assert_eq!(offer.price_label().as_deref(), Some("USD 49.50"));
        assert_eq!(CertificationOffer::ComingSoon.price_label(), None);
    }
}
