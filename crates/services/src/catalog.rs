use std::sync::Arc;

use course_core::model::{Course, CourseId, Topic, TopicId};

use crate::api::LearningApi;
use crate::error::CatalogError;

/// Course listing and course fetches.
#[derive(Clone)]
pub struct CatalogService {
    api: Arc<dyn LearningApi>,
}

impl CatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        Self { api }
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the fetch fails.
    pub async fn list_courses(&self) -> Result<Vec<Course>, CatalogError> {
        let courses = self.api.get_all_courses().await?;
        tracing::debug!(count = courses.len(), "courses loaded");
        Ok(courses)
    }

    /// # Errors
    ///
    /// Returns `CatalogError::Api` if the fetch fails.
    pub async fn load_course(&self, course_id: &CourseId) -> Result<Course, CatalogError> {
        let course = self.api.get_course(course_id).await?;
        tracing::debug!(course_id = %course.id, topics = course.topics.len(), "course loaded");
        Ok(course)
    }

    /// Fetch a course and position a cursor on `topic_id`, or on the first
    /// topic when none is given.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NoTopics`/`TopicNotFound` for an unusable
    /// course and `CatalogError::Api` if the fetch fails.
    pub async fn open_topic(
        &self,
        course_id: &CourseId,
        topic_id: Option<&TopicId>,
    ) -> Result<TopicCursor, CatalogError> {
        let course = self.load_course(course_id).await?;
        match topic_id {
            Some(topic_id) => TopicCursor::at(course, topic_id),
            None => TopicCursor::first(course),
        }
    }
}

/// Position within a course's ordered topic list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCursor {
    course: Course,
    index: usize,
}

impl TopicCursor {
    /// # Errors
    ///
    /// Returns `CatalogError::NoTopics` if the course has no topics.
    pub fn first(course: Course) -> Result<Self, CatalogError> {
        if course.topics.is_empty() {
            return Err(CatalogError::NoTopics);
        }
        Ok(Self { course, index: 0 })
    }

    /// # Errors
    ///
    /// Returns `CatalogError::TopicNotFound` if `topic_id` is not in the course.
    pub fn at(course: Course, topic_id: &TopicId) -> Result<Self, CatalogError> {
        let index = course
            .topic_index(topic_id)
            .ok_or(CatalogError::TopicNotFound)?;
        Ok(Self { course, index })
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn current(&self) -> &Topic {
        &self.course.topics[self.index]
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.course.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.course.topics.is_empty()
    }

    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.len()
    }

    #[must_use]
    pub fn peek_next(&self) -> Option<&Topic> {
        self.course.topics.get(self.index + 1)
    }

    #[must_use]
    pub fn peek_previous(&self) -> Option<&Topic> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.course.topics.get(index))
    }

    /// Step forward; returns `false` at the last topic.
    pub fn forward(&mut self) -> bool {
        if self.has_next() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    /// Step back; returns `false` at the first topic.
    pub fn back(&mut self) -> bool {
        if self.has_previous() {
            self.index -= 1;
            true
        } else {
            false
        }
    }

    /// # Errors
    ///
    /// Returns `CatalogError::TopicNotFound` if `topic_id` is not in the
    /// course; the cursor does not move.
    pub fn jump_to(&mut self, topic_id: &TopicId) -> Result<(), CatalogError> {
        self.index = self
            .course
            .topic_index(topic_id)
            .ok_or(CatalogError::TopicNotFound)?;
        Ok(())
    }
}
