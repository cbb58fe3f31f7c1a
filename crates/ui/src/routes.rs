use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{CatalogView, CourseView, EditorView, LoginView, QuizView, TopicView, use_auth_state};
use crate::vm::greeting;

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CatalogView)] Home {},
        #[route("/courses/:course_id", CourseView)] Course { course_id: String },
        #[route("/courses/:course_id/topics/:topic_id", TopicView)] Topic { course_id: String, topic_id: String },
        #[route("/courses/:course_id/topics/:topic_id/quiz", QuizView)] Quiz { course_id: String, topic_id: String },
        #[route("/editor", EditorView)] Editor {},
        #[route("/login", LoginView)] Login {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let auth = use_auth_state();
    let session = ctx.session();
    let sign_out = move |_: MouseEvent| {
        let session = session.clone();
        spawn(async move {
            if let Err(err) = session.invalidate().await {
                tracing::warn!(error = %err, "sign out failed");
            }
        });
    };

    let greeting = greeting(&auth.read());
    rsx! {
        nav { class: "sidebar",
            h1 { "{ctx.app_name()}" }
            ul {
                li { Link { to: Route::Home {}, "Courses" } }
                li { Link { to: Route::Editor {}, "Code editor" } }
                if greeting.is_none() {
                    li { Link { to: Route::Login {}, "Sign in" } }
                }
            }
            if let Some(greeting) = greeting {
                div { class: "sidebar-account",
                    p { "{greeting}" }
                    button {
                        class: "btn btn-link",
                        r#type: "button",
                        onclick: sign_out,
                        "Sign out"
                    }
                }
            }
        }
    }
}
