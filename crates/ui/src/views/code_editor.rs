use course_core::model::{Language, RunMode};
use dioxus::prelude::*;
use services::EditorSession;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{RunOutputVm, language_options, map_run_outcome, run_button_label};

#[derive(Clone, Debug, PartialEq)]
enum RunState {
    Idle,
    Running,
    Done(RunOutputVm),
    Error(ViewError),
}

#[component]
pub fn EditorView() -> Element {
    let ctx = use_context::<AppContext>();
    let runner = ctx.code_runner();
    let mut editor = use_signal(EditorSession::default);
    let mut stdin = use_signal(String::new);
    let mut run_state = use_signal(|| RunState::Idle);

    let snapshot = editor.read().state();
    let language = snapshot.language;
    let running = matches!(*run_state.read(), RunState::Running);
    let options = language_options(language);

    let run = move |_: MouseEvent| {
        let runner = runner.clone();
        let source = editor.peek().source();
        let input = stdin.peek().clone();
        spawn(async move {
            run_state.set(RunState::Running);
            let next = match runner.run(language, &source, &input).await {
                Ok(outcome) => RunState::Done(map_run_outcome(&outcome)),
                Err(err) => RunState::Error(err.into()),
            };
            run_state.set(next);
        });
    };

    rsx! {
        div { class: "page editor-page",
            header { class: "view-header",
                h2 { class: "view-title", "Code editor" }
                p { class: "view-subtitle", "Write, preview and run code without leaving the course." }
            }
            div { class: "view-divider" }
            div { class: "editor-toolbar",
                select {
                    class: "editor-language",
                    value: "{language.key()}",
                    onchange: move |evt| {
                        if let Some(next) = Language::from_key(&evt.value()) {
                            editor.write().select_language(next);
                            run_state.set(RunState::Idle);
                        }
                    },
                    for choice in options {
                        option { key: "{choice.key}", value: "{choice.key}", selected: choice.selected, "{choice.label}" }
                    }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: running,
                    onclick: run,
                    "{run_button_label(language, running)}"
                }
                button {
                    class: "btn btn-secondary",
                    r#type: "button",
                    onclick: move |_| {
                        editor.write().reset();
                        run_state.set(RunState::Idle);
                    },
                    "Reset"
                }
            }
            textarea {
                class: "editor-source",
                spellcheck: "false",
                value: "{snapshot.source}",
                oninput: move |evt| editor.write().edit(evt.value()),
            }
            if language.run_mode() == RunMode::Remote {
                textarea {
                    class: "editor-stdin",
                    placeholder: "Program input (stdin)",
                    value: "{stdin}",
                    oninput: move |evt| stdin.set(evt.value()),
                }
            }
            match run_state() {
                RunState::Idle => rsx! {},
                RunState::Running => rsx! {
                    p { class: "editor-status", "Running..." }
                },
                RunState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
                RunState::Done(RunOutputVm::Preview { srcdoc }) => rsx! {
                    iframe {
                        class: "editor-preview",
                        title: "Preview",
                        sandbox: "allow-scripts",
                        srcdoc: "{srcdoc}",
                    }
                },
                RunState::Done(RunOutputVm::Console(console)) => rsx! {
                    div { class: console_class(console.ok),
                        p { class: "editor-status", "Status: {console.status}" }
                        if let Some(out) = console.stdout {
                            h4 { "Output" }
                            pre { "{out}" }
                        }
                        if let Some(err) = console.stderr {
                            h4 { "Errors" }
                            pre { "{err}" }
                        }
                        if let Some(compile) = console.compile_output {
                            h4 { "Compiler" }
                            pre { "{compile}" }
                        }
                    }
                },
            }
        }
    }
}

fn console_class(ok: bool) -> &'static str {
    if ok {
        "editor-console"
    } else {
        "editor-console editor-console--error"
    }
}
