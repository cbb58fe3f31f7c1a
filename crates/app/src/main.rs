use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{
    ApiConfig, AppServices, CatalogService, Clock, CodeRunnerService, QuizFlowService,
    SessionContext,
};
use tracing_subscriber::{EnvFilter, fmt as log_fmt};
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://learn.sqlite3";
const MEMORY_DB_URL: &str = "sqlite::memory:";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn app_name(&self) -> &str {
        "Learn"
    }

    fn session(&self) -> Arc<SessionContext> {
        self.services.session()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        self.services.catalog()
    }

    fn quiz_flow(&self) -> Arc<QuizFlowService> {
        self.services.quiz_flow()
    }

    fn code_runner(&self) -> Arc<CodeRunnerService> {
        self.services.code_runner()
    }
}

struct Args {
    db: SqliteTarget,
    api_url: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--api-url <url>] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url http://localhost:5000/api");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LEARN_API_BASE_URL, LEARN_API_TIMEOUT_SECS, LEARN_DB_URL, RUST_LOG");
}

impl Args {
    /// `env_db` is `LEARN_DB_URL`; relative database paths resolve against `base`.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env_db: Option<String>,
        base: &Path,
    ) -> Result<Self, ArgsError> {
        let mut db_raw = env_db.unwrap_or_else(|| DEFAULT_DB_URL.into());
        let mut api_url = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_raw = require_value(args, "--db")?,
                "--api-url" => {
                    let value = require_value(args, "--api-url")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api_url = Some(value);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db: SqliteTarget::parse(&db_raw, base)?,
            api_url,
        })
    }

    /// Environment config with `--api-url` taking precedence over
    /// `LEARN_API_BASE_URL`.
    fn api_config(&self) -> Result<ApiConfig, Box<dyn std::error::Error>> {
        let from_env = ApiConfig::from_env()?;
        match &self.api_url {
            Some(url) => Ok(ApiConfig::new(url)?.with_timeout(from_env.timeout())),
            None => Ok(from_env),
        }
    }
}

/// Where the session store lives.
#[derive(Debug, PartialEq, Eq)]
enum SqliteTarget {
    Memory,
    File { path: PathBuf, query: Option<String> },
}

impl SqliteTarget {
    /// Accepts `sqlite://path`, `sqlite:path`, a bare path or the in-memory URL.
    fn parse(raw: &str, base: &Path) -> Result<Self, ArgsError> {
        let trimmed = raw.trim();
        if trimmed == MEMORY_DB_URL {
            return Ok(Self::Memory);
        }
        let rest = trimmed
            .strip_prefix("sqlite://")
            .or_else(|| trimmed.strip_prefix("sqlite:"))
            .unwrap_or(trimmed);
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_owned())),
            None => (rest, None),
        };
        if path.is_empty() {
            return Err(ArgsError::InvalidDbUrl { raw: raw.to_owned() });
        }
        let path = Path::new(path);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        };
        Ok(Self::File { path, query })
    }

    fn url(&self) -> String {
        match self {
            Self::Memory => MEMORY_DB_URL.to_owned(),
            Self::File { path, query: None } => format!("sqlite://{}", path.display()),
            Self::File {
                path,
                query: Some(query),
            } => format!("sqlite://{}?{query}", path.display()),
        }
    }

    /// Create the parent directory and an empty database file.
    fn ensure_file(&self) -> std::io::Result<()> {
        let Self::File { path, .. } = self else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    log_fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let base = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let parsed = Args::parse(&mut argv, std::env::var("LEARN_DB_URL").ok(), &base).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    let config = parsed.api_config()?;

    parsed.db.ensure_file()?;
    let db_url = parsed.db.url();
    let services = AppServices::new_sqlite(&db_url, &config, Clock::system()).await?;
    let signed_in = services.session().state().is_authenticated();
    tracing::info!(%db_url, signed_in, "session store ready");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Learn")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "startup failed");
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str], env_db: Option<&str>) -> Result<Args, ArgsError> {
        let mut argv = args.iter().map(|arg| (*arg).to_owned());
        Args::parse(&mut argv, env_db.map(str::to_owned), Path::new("/work"))
    }

    #[test]
    fn default_database_sits_in_the_working_directory() {
        let args = parse(&[], None).unwrap();
        assert_eq!(args.db.url(), "sqlite:///work/learn.sqlite3");
        assert_eq!(args.api_url, None);
    }

    #[test]
    fn flag_overrides_environment_database() {
        let args = parse(&["--db", "data/app.db"], Some("sqlite:///env.db")).unwrap();
        assert_eq!(args.db.url(), "sqlite:///work/data/app.db");

        let env_only = parse(&[], Some("sqlite:/srv/learn.db?mode=rwc")).unwrap();
        assert_eq!(env_only.db.url(), "sqlite:///srv/learn.db?mode=rwc");
    }

    #[test]
    fn memory_database_needs_no_file() {
        let args = parse(&["--db", " sqlite::memory: "], None).unwrap();
        assert_eq!(args.db, SqliteTarget::Memory);
        assert_eq!(args.db.url(), MEMORY_DB_URL);
        assert!(args.db.ensure_file().is_ok());
    }

    #[test]
    fn malformed_arguments_are_rejected() {
        assert!(matches!(
            parse(&["--db", "sqlite://"], None),
            Err(ArgsError::InvalidDbUrl { .. })
        ));
        assert!(matches!(
            parse(&["--db"], None),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(
            parse(&["--api-url", "  "], None),
            Err(ArgsError::InvalidApiUrl { .. })
        ));
        assert!(matches!(
            parse(&["--verbose"], None),
            Err(ArgsError::UnknownArg(arg)) if arg == "--verbose"
        ));
    }

    #[test]
    fn api_url_flag_is_kept() {
        let args = parse(&["--api-url", "https://learn.example.com/api"], None).unwrap();
        assert_eq!(args.api_url.as_deref(), Some("https://learn.example.com/api"));
    }
}
