use course_core::model::{CertificationOffer, Course, Project, Topic};
use services::TopicCursor;

use super::markdown_vm::{TopicBodyVm, topic_body};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseCardVm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub topics_label: String,
    pub quizzes_label: String,
    pub certification_label: String,
}

#[must_use]
pub fn certification_label(offer: &CertificationOffer) -> String {
    match offer.price_label() {
        Some(price) => format!("Certification available: {price}"),
        None => "Certification coming soon".to_string(),
    }
}

fn count_label(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[must_use]
pub fn map_course_card(course: &Course) -> CourseCardVm {
    CourseCardVm {
        id: course.id.as_str().to_owned(),
        title: course.title.clone(),
        description: course.description.clone(),
        topics_label: count_label(course.topics.len(), "topic", "topics"),
        quizzes_label: count_label(course.quiz_count(), "quiz", "quizzes"),
        certification_label: certification_label(&course.certification),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicLinkVm {
    pub id: String,
    pub title: String,
    pub has_quiz: bool,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectVm {
    pub tier: &'static str,
    pub title: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicPageVm {
    pub course_id: String,
    pub course_title: String,
    pub topic_id: String,
    pub title: String,
    pub position_label: String,
    pub body: TopicBodyVm,
    pub has_quiz: bool,
    pub previous: Option<TopicLinkVm>,
    pub next: Option<TopicLinkVm>,
    pub outline: Vec<TopicLinkVm>,
    pub projects: Vec<ProjectVm>,
    pub certification_label: String,
}

fn topic_link(topic: &Topic, active: bool) -> TopicLinkVm {
    TopicLinkVm {
        id: topic.id.as_str().to_owned(),
        title: topic.display_title(),
        has_quiz: topic.has_quiz(),
        active,
    }
}

fn map_project(project: &Project) -> ProjectVm {
    ProjectVm {
        tier: project.tier.label(),
        title: project.title.clone(),
        description: project.description.clone(),
    }
}

#[must_use]
pub fn map_topic_page(cursor: &TopicCursor) -> TopicPageVm {
    let course = cursor.course();
    let topic = cursor.current();
    TopicPageVm {
        course_id: course.id.as_str().to_owned(),
        course_title: course.title.clone(),
        topic_id: topic.id.as_str().to_owned(),
        title: topic.display_title(),
        position_label: format!("Topic {} of {}", cursor.index() + 1, cursor.len()),
        body: topic_body(topic),
        has_quiz: topic.has_quiz(),
        previous: cursor.peek_previous().map(|t| topic_link(t, false)),
        next: cursor.peek_next().map(|t| topic_link(t, false)),
        outline: course
            .topics
            .iter()
            .enumerate()
            .map(|(index, t)| topic_link(t, index == cursor.index()))
            .collect(),
        projects: course.projects.iter().map(map_project).collect(),
        certification_label: certification_label(&course.certification),
    }
}

#[cfg(test)]
mod tests {
    use course_core::model::{
        CertificationOffer, Course, CourseId, Project, ProjectTier, QuizId, Topic, TopicId,
    };
    use services::TopicCursor;

    use super::{map_course_card, map_topic_page};
    use crate::vm::TopicBodyVm;

    fn course() -> Course {
        let topic = |id: &str, title: &str, quiz: bool| Topic {
            id: TopicId::new(id).unwrap(),
            title: title.into(),
            notes: Some(format!("## {id}")),
            theory: None,
            quiz_id: quiz.then(|| QuizId::new(format!("quiz-{id}")).unwrap()),
            exercise_id: None,
        };
        Course {
            id: CourseId::new("java").unwrap(),
            title: "Java Basics".into(),
            description: "Start here".into(),
            topics: vec![
                topic("vars", "1. Variables – 2", true),
                topic("loops", "2. Loops", false),
                topic("classes", "Topic 3: Classes", true),
            ],
            projects: vec![Project {
                tier: ProjectTier::Mini,
                title: "Calculator".into(),
                description: "Four operations".into(),
            }],
            certification: CertificationOffer::Available {
                price_cents: 4_900,
                currency: "USD".into(),
            },
        }
    }

    #[test]
    fn course_card_counts_and_certification() {
        let card = map_course_card(&course());
        assert_eq!(card.topics_label, "3 topics");
        assert_eq!(card.quizzes_label, "2 quizzes");
        assert_eq!(card.certification_label, "Certification available: USD 49.00");

        let mut plain = course();
        plain.certification = CertificationOffer::ComingSoon;
        assert_eq!(
            map_course_card(&plain).certification_label,
            "Certification coming soon"
        );
    }

    #[test]
    fn topic_page_links_neighbours_with_clean_titles() {
        let mut cursor =
            TopicCursor::at(course(), &TopicId::new("loops").unwrap()).expect("cursor");
        let page = map_topic_page(&cursor);
        assert_eq!(page.title, "Loops");
        assert_eq!(page.position_label, "Topic 2 of 3");
        assert!(!page.has_quiz);
        assert_eq!(page.previous.as_ref().map(|t| t.title.as_str()), Some("Variables"));
        assert_eq!(page.next.as_ref().map(|t| t.title.as_str()), Some("Classes"));
        assert!(page.outline[1].active);
        assert_eq!(page.projects[0].tier, ProjectTier::Mini.label());
        assert!(matches!(page.body, TopicBodyVm::Html(_)));

        assert!(cursor.forward());
        let last = map_topic_page(&cursor);
        assert!(last.next.is_none());
        assert!(last.has_quiz);
    }
}
