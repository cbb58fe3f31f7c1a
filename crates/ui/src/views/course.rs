use course_core::model::{CourseId, TopicId};
use dioxus::prelude::*;
use dioxus_router::Link;
use services::TopicCursor;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{TopicBodyVm, TopicPageVm, map_topic_page};

#[component]
pub fn CourseView(course_id: String) -> Element {
    rsx! { CoursePage { course_id, topic_id: None } }
}

#[component]
pub fn TopicView(course_id: String, topic_id: String) -> Element {
    rsx! { CoursePage { course_id, topic_id: Some(topic_id) } }
}

fn parse_ids(course_id: &str, topic_id: Option<&str>) -> Result<(CourseId, Option<TopicId>), ViewError> {
    let bad_link = |_| ViewError::Message("That link does not point to a course.".into());
    let course_id = CourseId::new(course_id).map_err(bad_link)?;
    let topic_id = topic_id.map(TopicId::new).transpose().map_err(bad_link)?;
    Ok((course_id, topic_id))
}

#[component]
fn CoursePage(course_id: String, #[props(!optional)] topic_id: Option<String>) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    // The course is fetched once; moving between topics re-positions locally.
    let course_id_for_resource = course_id.clone();
    let resource = use_resource(move || {
        let catalog = catalog.clone();
        let course_id = course_id_for_resource.clone();
        async move {
            let (course_id, _) = parse_ids(&course_id, None)?;
            Ok::<_, ViewError>(catalog.load_course(&course_id).await?)
        }
    });

    let page = match view_state_from_resource(&resource) {
        ViewState::Ready(course) => {
            let cursor = parse_ids(&course_id, topic_id.as_deref()).and_then(|(_, topic)| {
                let cursor = match topic {
                    Some(topic) => TopicCursor::at(course, &topic),
                    None => TopicCursor::first(course),
                };
                cursor.map_err(ViewError::from)
            });
            match cursor {
                Ok(cursor) => ViewState::Ready(map_topic_page(&cursor)),
                Err(err) => ViewState::Error(err),
            }
        }
        ViewState::Idle => ViewState::Idle,
        ViewState::Loading => ViewState::Loading,
        ViewState::Error(err) => ViewState::Error(err),
    };

    rsx! {
        div { class: "page course-page",
            match page {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    div { class: "view-actions",
                        button {
                            class: "btn btn-secondary",
                            r#type: "button",
                            onclick: move |_| {
                                let mut resource = resource;
                                resource.restart();
                            },
                            "Retry"
                        }
                        Link { class: "btn btn-secondary", to: Route::Home {}, "Back to courses" }
                    }
                },
                ViewState::Ready(page) => rsx! {
                    TopicPage { page }
                },
            }
        }
    }
}

#[component]
fn TopicPage(page: TopicPageVm) -> Element {
    let course_id = page.course_id.clone();
    let outline = page.outline.iter().map(|link| {
        let class = if link.active { "outline-item outline-item--active" } else { "outline-item" };
        rsx! {
            li { key: "{link.id}", class,
                Link {
                    to: Route::Topic { course_id: course_id.clone(), topic_id: link.id.clone() },
                    "{link.title}"
                }
                if link.has_quiz {
                    span { class: "outline-quiz-badge", "Quiz" }
                }
            }
        }
    });

    rsx! {
        div { class: "course-layout",
            aside { class: "course-outline",
                h3 { "{page.course_title}" }
                ul { {outline} }
                p { class: "course-card-cert", "{page.certification_label}" }
            }
            article { class: "topic",
                header { class: "view-header",
                    p { class: "view-subtitle", "{page.position_label}" }
                    h2 { class: "view-title", "{page.title}" }
                }
                div { class: "view-divider" }
                match &page.body {
                    TopicBodyVm::Html(html) => rsx! {
                        div { class: "topic-notes", dangerous_inner_html: "{html}" }
                    },
                    TopicBodyVm::Plain(text) => rsx! {
                        pre { class: "topic-theory", "{text}" }
                    },
                    TopicBodyVm::Empty => rsx! {
                        p { class: "empty", "No notes for this topic yet." }
                    },
                }
                if page.has_quiz {
                    Link {
                        class: "btn btn-primary",
                        to: Route::Quiz {
                            course_id: page.course_id.clone(),
                            topic_id: page.topic_id.clone(),
                        },
                        "Take the quiz"
                    }
                }
                nav { class: "topic-nav",
                    if let Some(previous) = page.previous.clone() {
                        Link {
                            class: "btn btn-secondary",
                            to: Route::Topic { course_id: page.course_id.clone(), topic_id: previous.id },
                            "← {previous.title}"
                        }
                    }
                    if let Some(next) = page.next.clone() {
                        Link {
                            class: "btn btn-secondary",
                            to: Route::Topic { course_id: page.course_id.clone(), topic_id: next.id },
                            "{next.title} →"
                        }
                    }
                }
                if !page.projects.is_empty() {
                    section { class: "projects",
                        h3 { "Projects" }
                        for project in page.projects.iter() {
                            div { class: "project-card",
                                span { class: "project-tier", "{project.tier}" }
                                h4 { "{project.title}" }
                                p { "{project.description}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
