//! CLI binary for pdfchat.
//!
//! A thin shim over the library crate: an interactive REPL for chatting
//! with a PDF, plus one-shot flags (`--ask`, `--summarize`, `--quiz`) for
//! scripted use.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfchat::{prompts, Assistant, AssistantConfig, PdfChatError, KNOWN_MODELS};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde_json::json;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive session
  pdfchat report.pdf

  # Start without a document, load one later with /open
  pdfchat

  # One-shot question (scriptable)
  pdfchat report.pdf --ask "What are the main conclusions?"

  # One-shot summary as JSON
  pdfchat report.pdf --summarize --json

  # Pick a model and provider explicitly
  pdfchat report.pdf --model gpt-4.1-mini --provider openai

REPL COMMANDS:
  /open <path>      load a PDF (clears transcript and summary)
  <question>        ask anything about the document
  /quick [1-3]      one of the fixed quick questions
  /summary          show the cached summary, or generate one
  /regenerate       regenerate the summary (overwrites the cache)
  /quiz             generate a fresh quiz (never cached)
  /clear            clear the chat transcript
  /export [path]    write the transcript (default: chat_history.txt)
  /model [name]     show the model list, or switch model
  /temp <value>     set temperature (0.0–1.0)
  /stats            session statistics
  /history          print the transcript
  /help             this list
  /quit             leave

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  PDFCHAT_MODEL           Override the default model ID

The API credential is not validated up front: a missing or invalid key
surfaces on the first question."#;

/// Chat with PDF documents from the terminal using LLMs.
#[derive(Parser, Debug)]
#[command(
    name = "pdfchat",
    version,
    about = "Chat with PDF documents from the terminal using LLMs",
    long_about = "Load a PDF, then ask free-form questions, generate a 5-bullet summary, or \
build a multiple-choice quiz from its text. Works with OpenAI, Anthropic, Google Gemini, \
Ollama, and any OpenAI-compatible endpoint.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to load on startup.
    pdf: Option<PathBuf>,

    /// LLM model ID.
    #[arg(long, env = "PDFCHAT_MODEL", default_value = pdfchat::DEFAULT_MODEL)]
    model: String,

    /// LLM provider: openai, anthropic, gemini, ollama. Auto-detected from
    /// API-key env vars if not set.
    #[arg(long, env = "EDGEQUAKE_LLM_PROVIDER")]
    provider: Option<String>,

    /// Sampling temperature (0.0–1.0). Higher = more creative.
    #[arg(long, env = "PDFCHAT_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max tokens the model may generate per answer.
    #[arg(long, env = "PDFCHAT_MAX_TOKENS", default_value_t = 1024)]
    max_tokens: usize,

    /// Ask one question, print the answer, and exit.
    #[arg(long, value_name = "QUESTION", conflicts_with_all = ["summarize", "quiz"])]
    ask: Option<String>,

    /// Print a 5-bullet summary and exit.
    #[arg(long, conflicts_with = "quiz")]
    summarize: bool,

    /// Print a generated quiz and exit.
    #[arg(long)]
    quiz: bool,

    /// Emit one-shot output as JSON.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFCHAT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and answers.
    #[arg(short, long, env = "PDFCHAT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The REPL is the interface; library logs stay out of the way unless
    // explicitly requested.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build the assistant ──────────────────────────────────────────────
    let mut builder = AssistantConfig::builder()
        .model(&cli.model)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens);
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider);
    }
    let config = builder.build().context("Invalid configuration")?;
    let mut assistant = Assistant::new(config);

    let interactive = cli.ask.is_none() && !cli.summarize && !cli.quiz;

    // ── Load the startup document, if any ────────────────────────────────
    if let Some(ref path) = cli.pdf {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bar = (interactive && !cli.quiet).then(|| spinner("Processing PDF…"));
        let result = assistant.load_pdf(&name, &bytes);
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }
        let doc = result.with_context(|| format!("Failed to load '{}'", path.display()))?;
        let (pages, words) = (doc.page_count, doc.word_count);

        if interactive && !cli.quiet {
            println!(
                "{} {}  {}",
                green("✔"),
                bold(&name),
                dim(&format!("{pages} pages · {words} words"))
            );
        }
    }

    // ── One-shot mode ────────────────────────────────────────────────────
    if !interactive {
        anyhow::ensure!(
            cli.pdf.is_some(),
            "--ask/--summarize/--quiz need a PDF argument"
        );

        let (kind, output) = if let Some(ref question) = cli.ask {
            ("answer", assistant.ask(question).await?)
        } else if cli.summarize {
            ("summary", assistant.generate_summary().await?)
        } else {
            ("quiz", assistant.generate_quiz().await?)
        };

        if cli.json {
            let doc = assistant
                .session()
                .document()
                .context("No document loaded")?;
            let mut payload = json!({
                "document": {
                    "name": doc.name,
                    "pages": doc.page_count,
                    "words": doc.word_count,
                },
                "model": assistant.session().model(),
            });
            payload[kind] = json!(output);
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).context("Failed to serialise output")?
            );
        } else {
            println!("{output}");
        }
        return Ok(());
    }

    // ── Interactive REPL ─────────────────────────────────────────────────
    if assistant.session().document().is_none() {
        print_welcome();
    } else if !cli.quiet {
        println!("{}", dim("Ask anything, or /help for commands."));
    }

    repl(&mut assistant).await
}

// ── REPL ─────────────────────────────────────────────────────────────────────

async fn repl(assistant: &mut Assistant) -> Result<()> {
    let mut rl = DefaultEditor::new().context("Failed to initialise line editor")?;
    let prompt = format!("{} ", cyan("pdfchat»"));

    loop {
        let line = tokio::task::block_in_place(|| rl.readline(&prompt));
        match line {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line).ok();
                match handle_line(assistant, line).await {
                    Ok(true) => break,
                    Ok(false) => {}
                    // An action failure aborts that action only; the session
                    // stays usable.
                    Err(e) => eprintln!("{} {e:#}", red("✗")),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        }
    }
    Ok(())
}

/// Dispatch one REPL line. Returns `Ok(true)` to quit.
async fn handle_line(assistant: &mut Assistant, line: &str) -> Result<bool> {
    let Some(rest) = line.strip_prefix('/') else {
        // Plain text is a chat question.
        let answer = thinking(assistant.ask(line)).await?;
        print_answer(&answer);
        return Ok(false);
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let arg = parts.next().map(str::trim).unwrap_or("");

    match cmd {
        "open" => cmd_open(assistant, arg)?,
        "quick" => cmd_quick(assistant, arg).await?,
        "summary" => cmd_summary(assistant, false).await?,
        "regenerate" => cmd_summary(assistant, true).await?,
        "quiz" => {
            let quiz = with_spinner("Generating quiz…", assistant.generate_quiz()).await?;
            print_answer(&quiz);
        }
        "clear" => {
            assistant.clear_chat();
            println!("{} transcript cleared", green("✔"));
        }
        "export" => cmd_export(assistant, arg)?,
        "model" => cmd_model(assistant, arg),
        "temp" => cmd_temp(assistant, arg)?,
        "stats" => cmd_stats(assistant),
        "history" => cmd_history(assistant),
        "help" => print_help(),
        "quit" | "exit" | "q" => return Ok(true),
        other => {
            eprintln!(
                "{} unknown command '/{other}' — try /help",
                red("✗")
            );
        }
    }
    Ok(false)
}

fn cmd_open(assistant: &mut Assistant, arg: &str) -> Result<()> {
    anyhow::ensure!(!arg.is_empty(), "usage: /open <path>");
    let path = PathBuf::from(arg);
    let bytes =
        std::fs::read(&path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg.to_string());

    let bar = spinner("Processing PDF…");
    let result = assistant.load_pdf(&name, &bytes);
    bar.finish_and_clear();
    let doc = result?;

    println!(
        "{} {}  {}",
        green("✔"),
        bold(&doc.name),
        dim(&format!(
            "{} pages · {} words",
            doc.page_count, doc.word_count
        ))
    );
    Ok(())
}

async fn cmd_quick(assistant: &mut Assistant, arg: &str) -> Result<()> {
    if arg.is_empty() {
        println!("{}", bold("Quick questions:"));
        for (i, q) in prompts::QUICK_QUESTIONS.iter().enumerate() {
            println!("  {}  {}", cyan(&format!("{}", i + 1)), q);
        }
        println!("{}", dim("Use /quick <number>."));
        return Ok(());
    }
    let number: usize = arg.parse().context("usage: /quick <1-3>")?;
    anyhow::ensure!(
        (1..=prompts::QUICK_QUESTIONS.len()).contains(&number),
        "quick questions are numbered 1-{}",
        prompts::QUICK_QUESTIONS.len()
    );

    println!("{} {}", dim("you:"), prompts::QUICK_QUESTIONS[number - 1]);
    let answer = thinking(assistant.quick_ask(number - 1)).await?;
    print_answer(&answer);
    Ok(())
}

async fn cmd_summary(assistant: &mut Assistant, regenerate: bool) -> Result<()> {
    if !regenerate {
        if let Some(cached) = assistant.session().summary() {
            print_answer(cached);
            println!("{}", dim("Cached — /regenerate for a fresh one."));
            return Ok(());
        }
    }
    let summary = with_spinner("Summarizing…", assistant.generate_summary()).await?;
    print_answer(&summary);
    Ok(())
}

fn cmd_export(assistant: &Assistant, arg: &str) -> Result<()> {
    let path = if arg.is_empty() {
        PathBuf::from("chat_history.txt")
    } else {
        PathBuf::from(arg)
    };
    assistant.export_to_file(&path)?;
    println!(
        "{} wrote {} messages to {}",
        green("✔"),
        assistant.session().messages().len(),
        bold(&path.display().to_string())
    );
    Ok(())
}

fn cmd_model(assistant: &mut Assistant, arg: &str) {
    if arg.is_empty() {
        println!("{}", bold("Models:"));
        for m in KNOWN_MODELS {
            let marker = if m == assistant.session().model() {
                green("●")
            } else {
                dim("○")
            };
            println!("  {marker} {m}");
        }
        println!("{}", dim("Switch with /model <name> (any ID accepted)."));
    } else {
        assistant.set_model(arg);
        println!("{} model set to {}", green("✔"), bold(arg));
    }
}

fn cmd_temp(assistant: &mut Assistant, arg: &str) -> Result<()> {
    let value: f32 = arg.parse().context("usage: /temp <0.0-1.0>")?;
    assistant.set_temperature(value);
    println!(
        "{} temperature set to {}",
        green("✔"),
        assistant.session().temperature()
    );
    Ok(())
}

fn cmd_stats(assistant: &Assistant) {
    let session = assistant.session();
    match session.document() {
        Some(doc) => println!(
            "{}  {} pages · {} words",
            bold(&doc.name),
            doc.page_count,
            doc.word_count
        ),
        None => println!("{}", dim("no document loaded")),
    }
    println!("model:       {}", session.model());
    println!("temperature: {}", session.temperature());
    println!("questions:   {}", session.questions_asked());
    println!("transcript:  {} messages", session.messages().len());
    println!(
        "summary:     {}",
        if session.summary().is_some() {
            "cached"
        } else {
            "not generated"
        }
    );
}

fn cmd_history(assistant: &Assistant) {
    let messages = assistant.session().messages();
    if messages.is_empty() {
        println!("{}", dim("transcript is empty"));
        return;
    }
    for message in messages {
        let role = match message.role {
            pdfchat::Role::User => cyan("you:"),
            pdfchat::Role::Assistant => green("assistant:"),
        };
        println!("{role} {}", message.content);
    }
}

// ── Output helpers ────────────────────────────────────────────────────────────

fn print_answer(text: &str) {
    println!("\n{text}\n");
}

fn print_welcome() {
    println!("{}", bold("👋 Welcome to pdfchat"));
    println!("Load a PDF with {} to get started.\n", cyan("/open <path>"));
    println!("{}", bold("Features:"));
    println!("  💬 chat with your PDF");
    println!("  📋 auto-summarize (/summary)");
    println!("  ❓ quiz generator (/quiz)");
    println!("  📥 export chat (/export)");
    println!("  🧠 multiple models (/model)");
    println!();
}

fn print_help() {
    println!("{}", bold("Commands:"));
    println!("  /open <path>     load a PDF (clears transcript and summary)");
    println!("  <question>       ask anything about the document");
    println!("  /quick [1-3]     one of the fixed quick questions");
    println!("  /summary         show the cached summary, or generate one");
    println!("  /regenerate      regenerate the summary");
    println!("  /quiz            generate a fresh quiz");
    println!("  /clear           clear the chat transcript");
    println!("  /export [path]   write the transcript (default: chat_history.txt)");
    println!("  /model [name]    show models, or switch");
    println!("  /temp <value>    set temperature (0.0-1.0)");
    println!("  /stats           session statistics");
    println!("  /history         print the transcript");
    println!("  /quit            leave");
}

// ── Busy indicator ────────────────────────────────────────────────────────────

fn spinner(msg: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Run a gateway-bound future behind a "Thinking…" spinner. The call blocks
/// the action until it returns or errors; there is no cancellation.
async fn thinking<T>(
    fut: impl Future<Output = Result<T, PdfChatError>>,
) -> Result<T, PdfChatError> {
    with_spinner("Thinking…", fut).await
}

async fn with_spinner<T>(
    msg: &str,
    fut: impl Future<Output = Result<T, PdfChatError>>,
) -> Result<T, PdfChatError> {
    let bar = spinner(msg);
    let result = fut.await;
    bar.finish_and_clear();
    result
}
