//! The `statecheck` run: acquire one document, classify it, print the result.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use statecheck::{Analysis, Engine, EngineConfig, TracingSink};

use crate::fetch::Fetcher;
use crate::output::{self, Source};

/// What to classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Url(String),
    File(PathBuf),
    Stdin,
}

impl Input {
    /// Pick the input from the parsed arguments. A `--file` of `-` means stdin.
    pub fn from_args(
        target: Option<String>,
        site: Option<String>,
        file: Option<String>,
    ) -> Result<Self> {
        if let Some(file) = file {
            return Ok(if file == "-" {
                Input::Stdin
            } else {
                Input::File(PathBuf::from(file))
            });
        }

        let nonblank = |s: &String| !s.trim().is_empty();
        match site.filter(nonblank).or(target.filter(nonblank)) {
            Some(url) => Ok(Input::Url(url)),
            None => bail!("Please provide a site to check using the --site flag or a URL argument"),
        }
    }

    fn source(&self) -> Source {
        match self {
            Input::Url(url) => Source::Url(url.clone()),
            Input::File(path) => Source::File(path.display().to_string()),
            Input::Stdin => Source::Stdin,
        }
    }
}

/// Options for one run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub input: Input,
    pub engine: EngineConfig,
    pub timeout_ms: u64,
    pub body_only: bool,
    pub json: bool,
    pub explain: bool,
}

/// Read or fetch the document text.
pub async fn acquire(opts: &CheckOptions) -> Result<String> {
    match &opts.input {
        Input::Url(url) => {
            let fetcher = Fetcher::new(opts.timeout_ms)?;
            let page = fetcher.fetch(url).await?;
            Ok(page.document(!opts.body_only))
        }
        Input::File(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Input::Stdin => {
            let bytes = tokio::task::spawn_blocking(|| {
                let mut buf = Vec::new();
                std::io::stdin().read_to_end(&mut buf).map(|_| buf)
            })
            .await
            .context("stdin reader panicked")?
            .context("failed to read stdin")?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Classify on the blocking pool; the engine itself fans out over rayon.
pub async fn classify_document(engine: Engine, document: String) -> Result<Analysis> {
    tokio::task::spawn_blocking(move || engine.analyze_with(&document, &TracingSink))
        .await
        .context("classification task panicked")
}

/// Acquire, classify and render. Returns the text written to stdout.
pub async fn run(opts: &CheckOptions) -> Result<String> {
    let document = acquire(opts).await?;
    let analysis = classify_document(Engine::new(opts.engine.clone()), document).await?;

    tracing::info!(
        "classified as {} (stateful {}/{}, stateless {}/{})",
        analysis.classification.as_str(),
        analysis.stateful.count,
        analysis.stateful.threshold,
        analysis.stateless.count,
        analysis.stateless.threshold
    );

    let source = opts.input.source();
    let rendered = if opts.json {
        output::render_json(&source, &analysis)?
    } else {
        output::render_text(&source, &analysis, opts.explain)
    };
    Ok(rendered)
}
