use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use lacuna_core::{
    Document, FetchConfig, Lacuna, LacunaConfig, LacunaError, TableLoader, TransformSession, WordClass, fetch_file,
    fetch_stdin, fetch_url, message_page,
};
use owo_colors::OwoColorize;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{
    format_size, print_banner, print_detail, print_exercise_details, print_info, print_step, print_success,
    print_timing_summary, print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const STEPS: usize = 5;

/// Output format for the exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Html,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: html, json", s)),
        }
    }
}

/// Turn Wikipedia pages into cloze exercises
#[derive(Parser, Debug)]
#[command(name = "lacuna")]
#[command(author = "Lacuna Contributors")]
#[command(version)]
#[command(about = "Turn Wikipedia pages into cloze exercises", long_about = None)]
struct Args {
    /// Wikipedia URL, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Word class to remove (articles, prepositions, pronouns, random)
    #[arg(short, long, default_value = "articles", value_name = "CLASS")]
    class: String,

    /// Page language; required for file and stdin input
    #[arg(short, long, value_name = "CODE")]
    language: Option<String>,

    /// Lookup table directory
    #[arg(long, value_name = "DIR")]
    tables: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (html, json)
    #[arg(short, long, default_value = "html", value_name = "FORMAT")]
    format: OutputFormat,

    /// Seed for random word removal
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn is_url(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }
}

/// Session for a file or stdin page, where there is no URL to read the language from
fn local_session(lacuna: &Lacuna, language: Option<&str>, class: &str) -> anyhow::Result<TransformSession> {
    let language = language.context("--language is required when reading from a file or stdin")?;
    let word_class: WordClass = class.parse().context("Invalid word class")?;

    if !lacuna.is_language_supported(language) {
        anyhow::bail!(LacunaError::UnsupportedLanguage(language.to_string()));
    }

    TransformSession::new(language, word_class).context("Invalid session")
}

fn write_output(output: &str, path: Option<&PathBuf>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let started = Instant::now();
    let mut timings = Vec::new();

    if args.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lacuna_core=debug")))
            .init();

        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let mut config = LacunaConfig::builder().timeout(args.timeout);
    if let Some(user_agent) = &args.user_agent {
        config = config.user_agent(user_agent.as_str());
    }
    let config = config.build();
    let fetch_config: FetchConfig = config.fetch.clone();

    let tables_dir = args.tables.clone().unwrap_or_else(|| TableLoader::default().dir().to_path_buf());
    if args.verbose {
        print_step(1, STEPS, &format!("Loading lookup tables from {}", tables_dir.display().bright_white()));
    }
    let step = Instant::now();
    let lacuna = Lacuna::from_dir(&tables_dir, config)
        .with_context(|| format!("Failed to load lookup tables from {}", tables_dir.display()))?;
    timings.push(("Tables".to_string(), step.elapsed()));

    if args.verbose {
        let languages: Vec<_> = lacuna.tables().supported_languages().collect();
        print_detail("Languages", &languages.join(", "));
        print_detail("Tables", &lacuna.tables().table_count().to_string());
        eprintln!();
        print_step(2, STEPS, "Validating request");
    }

    let session = if args.is_url() {
        match lacuna.validate(Some(&args.input), Some(&args.class)) {
            Ok(session) => session,
            Err(err) => match err.user_message() {
                Some(message) if args.format == OutputFormat::Html => {
                    print_warning(message);
                    return write_output(&message_page(message), args.output.as_ref());
                }
                Some(message) => anyhow::bail!("{} ({})", message, err),
                None => return Err(anyhow::Error::new(err).context("Invalid request")),
            },
        }
    } else {
        local_session(&lacuna, args.language.as_deref(), &args.class)?
    };

    if args.verbose {
        print_detail("Language", session.language());
        print_detail("Word class", session.word_class().name());
        eprintln!();
    }

    let step = Instant::now();
    let html = if args.input == "-" {
        if args.verbose {
            print_step(3, STEPS, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if args.is_url() {
        if args.verbose {
            print_step(3, STEPS, &format!("Fetching from {}", args.input.bright_white().underline()));
        }
        fetch_url(&args.input, &fetch_config).await.context("Failed to fetch URL")?
    } else {
        if args.verbose {
            print_step(3, STEPS, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };
    timings.push(("Read".to_string(), step.elapsed()));

    if args.verbose {
        print_detail("Size", &format_size(html.len()));
        if let Some(title) = Document::parse(&html).title() {
            print_detail("Title", &title);
        }
        eprintln!();
        print_step(4, STEPS, "Building exercise");
    }

    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let step = Instant::now();
    let exercise = lacuna
        .exercise(&html, &session, rng.as_mut())
        .context("Failed to build exercise")?;
    timings.push(("Transform".to_string(), step.elapsed()));

    if args.verbose {
        print_exercise_details(&exercise);
    }

    let step = Instant::now();
    let output = match args.format {
        OutputFormat::Html => lacuna
            .render_page(&html, &session, &exercise)
            .context("Failed to rewrite page")?,
        OutputFormat::Json => format!("{:#}", exercise.to_json().context("Failed to serialize exercise")?),
    };
    timings.push(("Render".to_string(), step.elapsed()));

    if args.verbose {
        print_step(5, STEPS, "Writing output");
        print_detail("Format", &format!("{:?}", args.format));
        eprintln!();
        print_timing_summary(started.elapsed(), &timings);
    }

    write_output(&output, args.output.as_ref())
}
