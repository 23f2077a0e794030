// ABOUTME: CLI for counting the words of the main article in HTML pages.
// ABOUTME: Reads files or stdin, extracts the article and prints word count and reading time.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use wordcount_extract::{extract_bytes, Article, ExtractError, Options};

const NO_ARTICLE_MESSAGE: &str = "Sorry, no article detected.";

/// Extract the main article of HTML pages and estimate its reading time.
#[derive(Parser, Debug)]
#[command(name = "wordcount")]
#[command(about = "Count the words of a page's main article and estimate reading time", long_about = None)]
struct Args {
    /// HTML files to read. Use "-" (or nothing) to read one page from stdin.
    targets: Vec<String>,

    /// Output JSON instead of the plain text report.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Output compact JSON instead of pretty (implies --json).
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Also print the extracted article HTML.
    #[arg(long, default_value_t = false)]
    content: bool,

    /// Drop sidebars, menus and similar blocks before scoring.
    #[arg(long = "strip-unlikely", default_value_t = false)]
    strip_unlikely: bool,

    /// Reading speed in words per minute.
    #[arg(long, default_value_t = wordcount_extract::options::DEFAULT_WORDS_PER_MINUTE)]
    wpm: u32,

    /// Refuse pages with more nodes than this.
    #[arg(long = "max-nodes")]
    max_nodes: Option<usize>,
}

impl Args {
    fn options(&self) -> Options {
        let mut builder = Options::builder()
            .strip_unlikely_candidates(self.strip_unlikely)
            .words_per_minute(self.wpm);
        if let Some(max) = self.max_nodes {
            builder = builder.max_nodes(max);
        }
        builder.build()
    }

    fn wants_json(&self) -> bool {
        self.json || self.compact
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

/// Process every target. Returns false if any of them failed.
fn run(args: &Args) -> Result<bool> {
    let opts = args.options();
    let targets = if args.targets.is_empty() {
        vec!["-".to_string()]
    } else {
        args.targets.clone()
    };

    let mut results = Vec::new();
    for target in &targets {
        debug!(target = target.as_str(), "processing");
        let outcome = load_bytes(target)
            .and_then(|bytes| extract_bytes(&bytes, &opts).map_err(anyhow::Error::new));
        results.push((target.as_str(), outcome));
    }

    let all_ok = results.iter().all(|(_, outcome)| outcome.is_ok());

    if args.wants_json() {
        let output = json_output(&results, args.content);
        if args.compact {
            println!("{}", serde_json::to_string(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    } else {
        let multiple = results.len() > 1;
        for (target, outcome) in &results {
            if multiple {
                println!("==> {target} <==");
            }
            match outcome {
                Ok(article) => print_text_report(article, args.content),
                Err(err) if is_no_article(err) => println!("{NO_ARTICLE_MESSAGE}"),
                Err(err) => eprintln!("error: {target}: {}", describe(err)),
            }
        }
    }

    Ok(all_ok)
}

fn print_text_report(article: &Article, with_content: bool) {
    println!("{} words", article.word_count);
    println!("{}", article.reading_time.label());
    if with_content {
        println!("{}", article.html());
    }
}

/// ExtractError already renders its own source; other errors get the full chain.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ExtractError>() {
        Some(extract_err) => extract_err.to_string(),
        None => format!("{err:#}"),
    }
}

fn is_no_article(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ExtractError>()
        .is_some_and(ExtractError::is_no_article)
}

// Output format:
// - Single target and ok => emit the report object
// - Otherwise emit an envelope with a pages array and counts
fn json_output(results: &[(&str, Result<Article>)], with_content: bool) -> Value {
    if let [(_, Ok(article))] = results {
        return json!(article.report(with_content));
    }

    let entries: Vec<Value> = results
        .iter()
        .map(|(target, outcome)| match outcome {
            Ok(article) => json!({
                "source": target,
                "ok": true,
                "report": article.report(with_content),
                "error": null
            }),
            Err(err) => json!({
                "source": target,
                "ok": false,
                "report": null,
                "error": describe(err)
            }),
        })
        .collect();

    let parsed = results.iter().filter(|(_, outcome)| outcome.is_ok()).count();
    json!({
        "pages": entries,
        "total_pages": results.len(),
        "parsed": parsed,
        "failed": results.len() - parsed
    })
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("reading stdin")?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    fs::read(&path).with_context(|| format!("reading {}", target))
}
