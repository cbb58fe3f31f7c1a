use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use tokio::sync::watch;

use course_core::model::{CompileResult, Language, RunMode};

use crate::api::{CompileRequest, LearningApi};
use crate::error::CodeRunError;

/// Result of pressing "Run".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Markup to load into a sandboxed frame through `srcdoc`.
    Rendered(String),
    /// Remote compiler output, shown verbatim.
    Executed(CompileResult),
}

const CSS_PREVIEW_BODY: &str = r##"<h1>Heading</h1>
<p>A paragraph with <a href="#">a link</a> and <strong>bold text</strong>.</p>
<ul><li>First item</li><li>Second item</li></ul>
<button>Button</button>
<div class="box">.box</div>"##;

static STYLE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(style)").expect("style close pattern is valid"));

/// Document for the preview frame.
///
/// HTML is used as written. CSS is applied to a small sample page.
#[must_use]
pub fn build_srcdoc(language: Language, source: &str) -> String {
    match language {
        Language::Css => format!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><style>{}</style></head><body>{CSS_PREVIEW_BODY}</body></html>",
            STYLE_CLOSE.replace_all(source, "<\\/$1")
        ),
        _ => source.to_owned(),
    }
}

#[derive(Clone)]
pub struct CodeRunnerService {
    api: Arc<dyn LearningApi>,
}

impl CodeRunnerService {
    #[must_use]
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        Self { api }
    }

    /// Run `source` for `language`: markup renders locally, everything else
    /// goes to the remote compiler once.
    ///
    /// # Errors
    ///
    /// Returns `CodeRunError::EmptySource` for a blank buffer and
    /// `CodeRunError::Api` when the compile call fails.
    pub async fn run(
        &self,
        language: Language,
        source: &str,
        stdin: &str,
    ) -> Result<RunOutcome, CodeRunError> {
        if source.trim().is_empty() {
            return Err(CodeRunError::EmptySource);
        }
        match language.run_mode() {
            RunMode::Markup => Ok(RunOutcome::Rendered(build_srcdoc(language, source))),
            RunMode::Remote => {
                let request = CompileRequest {
                    language,
                    source_code: source.to_owned(),
                    stdin: stdin.to_owned(),
                };
                let result = self.api.compile_code(&request).await?;
                tracing::info!(
                    language = language.key(),
                    status = %result.status.description,
                    "compile finished"
                );
                Ok(RunOutcome::Executed(result))
            }
        }
    }
}

//
// ─── EDITOR SESSION ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub language: Language,
    pub source: String,
    /// Languages whose buffer the user has typed into.
    pub edited: Vec<Language>,
}

/// Editor buffers per language, observable through a watch channel.
pub struct EditorSession {
    buffers: HashMap<Language, String>,
    state: watch::Sender<EditorState>,
}

impl EditorSession {
    #[must_use]
    pub fn new(language: Language) -> Self {
        let (state, _) = watch::channel(EditorState {
            language,
            source: language.starter_template().to_owned(),
            edited: Vec::new(),
        });
        Self {
            buffers: HashMap::new(),
            state,
        }
    }

    #[must_use]
    pub fn state(&self) -> EditorState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EditorState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.state.borrow().language
    }

    #[must_use]
    pub fn source(&self) -> String {
        self.state.borrow().source.clone()
    }

    /// Replace the buffer of the current language.
    pub fn edit(&mut self, source: impl Into<String>) {
        let source = source.into();
        let language = self.language();
        self.buffers.insert(language, source.clone());
        self.state.send_modify(|state| {
            state.source = source;
            if !state.edited.contains(&language) {
                state.edited.push(language);
            }
        });
    }

    /// Switch language, restoring its edited buffer or its starter template.
    pub fn select_language(&mut self, language: Language) {
        if language == self.language() {
            return;
        }
        let source = self
            .buffers
            .get(&language)
            .cloned()
            .unwrap_or_else(|| language.starter_template().to_owned());
        self.state.send_modify(|state| {
            state.language = language;
            state.source = source;
        });
    }

    /// Drop edits for the current language and reload its template.
    pub fn reset(&mut self) {
        let language = self.language();
        self.buffers.remove(&language);
        self.state.send_modify(|state| {
            state.source = language.starter_template().to_owned();
            state.edited.retain(|edited| *edited != language);
        });
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Language::Html)
    }
}
