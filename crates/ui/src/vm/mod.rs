mod auth_vm;
mod course_vm;
mod editor_vm;
mod markdown_vm;
mod quiz_vm;

pub use auth_vm::{AuthMode, greeting, submit_label};
pub use course_vm::{
    CourseCardVm, ProjectVm, TopicLinkVm, TopicPageVm, certification_label, map_course_card,
    map_topic_page,
};
pub use editor_vm::{
    ConsoleVm, LanguageOptionVm, RunOutputVm, language_options, map_compile_result,
    map_run_outcome, run_button_label,
};
pub use markdown_vm::{TopicBodyVm, markdown_to_html, sanitize_html, topic_body};
pub use quiz_vm::{
    FeedbackVm, OptionStyle, OptionVm, PendingAnswer, QuestionVm, QuizIntent, QuizScreenVm,
    QuizVm, ResultsVm, enter_quiz, format_countdown, map_results, resume_prompt,
};
