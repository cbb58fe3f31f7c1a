use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error type for parsing an id from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Server ids are opaque strings (object ids, slugs). Each entity gets its own
// newtype so a quiz id can never be passed where a topic id is expected.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// # Errors
            ///
            /// Returns `ParseIdError` if the id is blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ParseIdError { kind: stringify!($name) });
                }
                Ok(Self(id))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a course.
    CourseId
);
string_id!(
    /// Identifier of a topic inside a course.
    TopicId
);
string_id!(
    /// Identifier of a quiz attached to a topic.
    QuizId
);
string_id!(
    /// Identifier of a single quiz question.
    QuestionId
);
string_id!(
    /// Identifier of a coding exercise attached to a topic.
    ExerciseId
);
string_id!(
    /// Identifier of a registered user.
    UserId
);
