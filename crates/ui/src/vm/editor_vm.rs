use course_core::model::{CompileResult, Language, RunMode};
use services::RunOutcome;

/// Compiler status id for a clean run.
const STATUS_ACCEPTED: u32 = 3;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageOptionVm {
    pub key: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[must_use]
pub fn language_options(current: Language) -> Vec<LanguageOptionVm> {
    Language::ALL
        .into_iter()
        .map(|language| LanguageOptionVm {
            key: language.key(),
            label: language.display_name(),
            selected: language == current,
        })
        .collect()
}

#[must_use]
pub fn run_button_label(language: Language, running: bool) -> &'static str {
    match (language.run_mode(), running) {
        (_, true) => "Running...",
        (RunMode::Markup, false) => "Preview",
        (RunMode::Remote, false) => "Run",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleVm {
    pub status: String,
    pub ok: bool,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutputVm {
    Preview { srcdoc: String },
    Console(ConsoleVm),
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|text| !text.is_empty()).cloned()
}

#[must_use]
pub fn map_compile_result(result: &CompileResult) -> ConsoleVm {
    ConsoleVm {
        status: result.status.description.clone(),
        ok: result.status.id == STATUS_ACCEPTED,
        stdout: non_empty(result.stdout.as_ref()),
        stderr: non_empty(result.stderr.as_ref()),
        compile_output: non_empty(result.compile_output.as_ref()),
    }
}

#[must_use]
pub fn map_run_outcome(outcome: &RunOutcome) -> RunOutputVm {
    match outcome {
        RunOutcome::Rendered(srcdoc) => RunOutputVm::Preview {
            srcdoc: srcdoc.clone(),
        },
        RunOutcome::Executed(result) => RunOutputVm::Console(map_compile_result(result)),
    }
}
