use std::time::Duration;

use course_core::model::{CourseId, TopicId};
use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::auth::use_auth_state;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{OptionStyle, QuestionVm, QuizIntent, QuizScreenVm, QuizVm, ResultsVm, enter_quiz};

#[component]
pub fn QuizView(course_id: String, topic_id: String) -> Element {
    let auth = use_auth_state();
    if !auth.read().is_authenticated() {
        return rsx! {
            div { class: "page quiz-page",
                h2 { class: "view-title", "Quiz" }
                p { "Sign in to take quizzes and earn XP." }
                Link { class: "btn btn-primary", to: Route::Login {}, "Sign in" }
            }
        };
    }
    rsx! { QuizScreen { course_id, topic_id } }
}

#[component]
fn QuizScreen(course_id: String, topic_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let flow = ctx.quiz_flow();
    let vm = use_signal(|| None::<QuizVm>);

    let flow_for_resource = flow.clone();
    let ids = (course_id.clone(), topic_id.clone());
    let resource = use_resource(move || {
        let flow = flow_for_resource.clone();
        let (course_id, topic_id) = ids.clone();
        let mut vm = vm;
        async move {
            let bad_link = |_| ViewError::Message("That link does not point to a quiz.".into());
            let course_id = CourseId::new(course_id).map_err(bad_link)?;
            let topic_id = TopicId::new(topic_id).map_err(bad_link)?;
            let entered = enter_quiz(&flow, course_id, topic_id).await?;
            vm.set(Some(entered));
            Ok::<_, ViewError>(())
        }
    });

    let flow_for_timer = flow.clone();
    use_future(move || {
        let flow = flow_for_timer.clone();
        let mut vm = vm;
        async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            loop {
                interval.tick().await;
                let running = vm.peek().as_ref().is_some_and(QuizVm::timer_running);
                if running {
                    if let Some(quiz) = vm.write().as_mut() {
                        quiz.tick(&flow);
                    }
                }
            }
        }
    });

    let dispatch = {
        let flow = flow.clone();
        use_callback(move |intent: QuizIntent| {
            let mut vm = vm;
            let flow = flow.clone();
            let pending = vm
                .write()
                .as_mut()
                .and_then(|quiz| quiz.apply(&flow, &intent));
            if let Some(pending) = pending {
                spawn(async move {
                    let result = flow
                        .send_answer(&pending.course_id, &pending.topic_id, &pending.ticket)
                        .await;
                    if let Some(quiz) = vm.write().as_mut() {
                        quiz.finish_submit(&flow, &pending.ticket, result);
                    }
                });
            }
        })
    };

    let state = view_state_from_resource(&resource);
    let guard = vm.read();
    let screen = guard.as_ref().map(QuizVm::screen);
    let countdown = guard.as_ref().and_then(QuizVm::countdown_label);
    let inline_error = guard.as_ref().and_then(QuizVm::error).cloned();
    drop(guard);

    rsx! {
        div { class: "page quiz-page",
            header { class: "view-header quiz-header",
                h2 { class: "view-title", "Quiz" }
                if let Some(countdown) = countdown {
                    span { class: "quiz-timer", "⏱ {countdown}" }
                }
            }
            div { class: "view-divider" }
            match (state, screen) {
                (ViewState::Error(err), _) => rsx! {
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
                        Link {
                            class: "btn btn-secondary",
                            to: Route::Topic { course_id: course_id.clone(), topic_id: topic_id.clone() },
                            "Back to topic"
                        }
                    }
                },
                (_, None) => rsx! {
                    p { "Loading..." }
                },
                (_, Some(QuizScreenVm::Blocked)) => rsx! {
                    div { class: "quiz-blocked",
                        h3 { "Quiz already completed" }
                        p { "You have already completed this quiz. Each quiz can be taken once." }
                        Link {
                            class: "btn btn-primary",
                            to: Route::Course { course_id: course_id.clone() },
                            "Back to course"
                        }
                    }
                },
                (_, Some(QuizScreenVm::Intro { title, summary, resume_prompt })) => rsx! {
                    div { class: "quiz-intro",
                        h3 { "{title}" }
                        p { class: "view-subtitle", "{summary}" }
                        if let Some(prompt) = resume_prompt {
                            p { class: "quiz-resume-prompt", "{prompt}" }
                            div { class: "view-actions",
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(QuizIntent::Resume),
                                    "Resume"
                                }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: move |_| dispatch.call(QuizIntent::Restart),
                                    "Start over"
                                }
                            }
                        } else {
                            button {
                                class: "btn btn-primary",
                                r#type: "button",
                                onclick: move |_| dispatch.call(QuizIntent::Start),
                                "Start quiz"
                            }
                        }
                    }
                },
                (_, Some(QuizScreenVm::Question(question))) => rsx! {
                    QuestionCard { question, on_intent: dispatch }
                },
                (_, Some(QuizScreenVm::Results(results))) => rsx! {
                    ResultsCard {
                        results,
                        course_id: course_id.clone(),
                        topic_id: topic_id.clone(),
                    }
                },
            }
            if let Some(err) = inline_error {
                p { class: "error quiz-inline-error", "{err.message()}" }
            }
        }
    }
}

fn option_class(style: &OptionStyle) -> &'static str {
    match style {
        OptionStyle::Idle => "quiz-option",
        OptionStyle::Selected => "quiz-option quiz-option--selected",
        OptionStyle::Correct => "quiz-option quiz-option--correct",
        OptionStyle::Wrong => "quiz-option quiz-option--wrong",
    }
}

#[component]
fn QuestionCard(question: QuestionVm, on_intent: Callback<QuizIntent>) -> Element {
    let locked = question.feedback.is_some() || question.submitting;
    rsx! {
        div { class: "quiz-question",
            p { class: "view-subtitle", "{question.progress_label}" }
            h3 { "{question.text}" }
            ul { class: "quiz-options",
                for option in question.options.iter() {
                    li { key: "{option.index}",
                        button {
                            class: option_class(&option.style),
                            r#type: "button",
                            disabled: locked,
                            onclick: {
                                let index = option.index;
                                move |_| on_intent.call(QuizIntent::Select(index))
                            },
                            "{option.label}"
                        }
                    }
                }
            }
            if let Some(feedback) = question.feedback.clone() {
                div { class: "quiz-feedback",
                    strong { "{feedback.headline}" }
                    if !feedback.explanation.is_empty() {
                        p { "{feedback.explanation}" }
                    }
                    if let Some(xp) = feedback.xp_label {
                        span { class: "quiz-xp", "{xp}" }
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        onclick: move |_| on_intent.call(QuizIntent::Next),
                        "{question.next_label}"
                    }
                }
            } else {
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: !question.can_submit,
                    onclick: move |_| on_intent.call(QuizIntent::Submit),
                    if question.submitting { "Submitting..." } else { "Submit answer" }
                }
            }
        }
    }
}

#[component]
fn ResultsCard(results: ResultsVm, course_id: String, topic_id: String) -> Element {
    rsx! {
        div { class: "quiz-results",
            h3 { "{results.headline}" }
            if results.timed_out {
                p { "The timer ran out before you finished." }
            }
            p { class: "quiz-score",
                "{results.percentage_label} "
                span {
                    class: if results.passed { "quiz-verdict quiz-verdict--pass" } else { "quiz-verdict quiz-verdict--fail" },
                    "{results.verdict_label}"
                }
            }
            p { "{results.score_label}" }
            p { class: "quiz-xp", "{results.xp_label}" }
            div { class: "view-actions",
                Link {
                    class: "btn btn-secondary",
                    to: Route::Topic { course_id: course_id.clone(), topic_id },
                    "Back to topic"
                }
                Link { class: "btn btn-secondary", to: Route::Course { course_id }, "Back to course" }
            }
        }
    }
}
