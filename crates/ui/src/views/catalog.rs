use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CourseCardVm, map_course_card};

#[component]
pub fn CatalogView() -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            let courses = catalog.list_courses().await?;
            Ok::<_, ViewError>(courses.iter().map(map_course_card).collect::<Vec<_>>())
        }
    });

    let state = view_state_from_resource(&resource);
    rsx! {
        div { class: "page catalog-page",
            header { class: "view-header",
                h2 { class: "view-title", "Courses" }
                p { class: "view-subtitle", "Pick a course to start learning." }
            }
            div { class: "view-divider" }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(cards) => {
                    if cards.is_empty() {
                        rsx! {
                            p { class: "empty", "No courses published yet." }
                        }
                    } else {
                        rsx! {
                            ul { class: "course-grid",
                                for card in cards {
                                    CourseCard { key: "{card.id}", card: card.clone() }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CourseCard(card: CourseCardVm) -> Element {
    rsx! {
        li { class: "course-card",
            h3 { class: "course-card-title", "{card.title}" }
            p { class: "course-card-description", "{card.description}" }
            p { class: "course-card-meta", "{card.topics_label} · {card.quizzes_label}" }
            p { class: "course-card-cert", "{card.certification_label}" }
            Link {
                class: "btn btn-primary",
                to: Route::Course { course_id: card.id.clone() },
                "Open course"
            }
        }
    }
}
