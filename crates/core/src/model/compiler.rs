//! Languages offered by the code panel and the compile result shape.

/// How a language is run when the user presses "Run".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Rendered locally inside a sandboxed frame.
    Markup,
    /// Sent to the remote compiler.
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Html,
    Css,
    JavaScript,
    Python,
    Java,
    C,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::Html,
        Language::Css,
        Language::JavaScript,
        Language::Python,
        Language::Java,
        Language::C,
        Language::Cpp,
    ];

    #[must_use]
    pub fn run_mode(self) -> RunMode {
        match self {
            Language::Html | Language::Css => RunMode::Markup,
            _ => RunMode::Remote,
        }
    }

    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
        }
    }

    /// Key sent as `language` to the compile endpoint; also used by the
    /// editor widget for syntax mode.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.key() == key)
    }

    #[must_use]
    pub fn starter_template(self) -> &'static str {
        match self {
            Language::Html => {
                "<!DOCTYPE html>\n<html>\n  <body>\n    <h1>Hello, world!</h1>\n  </body>\n</html>\n"
            }
            Language::Css => "body {\n  font-family: sans-serif;\n  color: #333;\n}\n",
            Language::JavaScript => "console.log(\"Hello, world!\");\n",
            Language::Python => "print(\"Hello, world!\")\n",
            Language::Java => {
                "public class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, world!\");\n    }\n}\n"
            }
            Language::C => {
                "#include <stdio.h>\n\nint main(void) {\n    printf(\"Hello, world!\\n\");\n    return 0;\n}\n"
            }
            Language::Cpp => {
                "#include <iostream>\n\nint main() {\n    std::cout << \"Hello, world!\" << std::endl;\n    return 0;\n}\n"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileStatus {
    pub id: u32,
    pub description: String,
}

/// Remote compiler output, displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileResult {
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
    pub status: CompileStatus,
}
