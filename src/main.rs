use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use herald::intent::{Resolution, RuleTable, Utterance};
use herald::voice::{Capture, TextCapture, WakeWordCapture};
use herald::{Assistant, Config};

/// herald - a keyword-driven voice assistant
///
/// Reads one transcribed utterance per line on stdin and answers through
/// the best available speech output.
#[derive(Parser)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Config file (defaults to ./herald.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start in privacy mode (no audible output)
    #[arg(long)]
    privacy: bool,

    /// Only respond to utterances containing this phrase
    #[arg(long, value_name = "PHRASE")]
    wake_word: Option<String>,

    /// Never attempt speech output
    #[arg(long)]
    text_only: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Render one response through the output pipeline
    Say {
        /// Text to speak
        text: String,
    },
    /// Print the rule table, or how an utterance resolves
    Rules {
        /// Utterance to resolve
        utterance: Option<String>,
    },
    /// List ElevenLabs voices for the configured API key
    Voices,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,herald=info",
        1 => "info,herald=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(Command::Rules { utterance }) = &cli.command {
        print_rules(utterance.as_deref());
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.privacy {
        config.assistant.privacy_mode = true;
    }
    if let Some(phrase) = &cli.wake_word {
        config.assistant.wake_word_mode = true;
        config.assistant.wake_word = phrase.trim().to_lowercase();
    }
    tracing::debug!(?config, "loaded configuration");

    let assistant = Assistant::new(config, cli.text_only)?;

    match cli.command {
        Some(Command::Say { text }) => say(&assistant, &text).await,
        Some(Command::Voices) => list_voices(&assistant).await,
        Some(Command::Rules { .. }) | None => converse(&assistant).await,
    }
}

async fn converse(assistant: &Assistant) -> anyhow::Result<()> {
    let voice_bound = assistant.bind_voice().await;
    print_banner(assistant, voice_bound);

    let capture = TextCapture::stdin().with_timeout(assistant.config().capture.listen_timeout());
    let assistant_config = &assistant.config().assistant;

    if assistant_config.wake_word_mode {
        tracing::info!(wake_word = %assistant_config.wake_word, "herald ready");
        run_session(assistant, WakeWordCapture::new(capture, &assistant_config.wake_word)).await;
    } else {
        tracing::info!("herald ready");
        run_session(assistant, capture).await;
    }

    assistant.shutdown().await;
    println!("\nherald shutdown complete.");
    Ok(())
}

async fn run_session<C: Capture>(assistant: &Assistant, capture: C) {
    let mut session = assistant.session(capture);
    let phase = session.run(interrupted()).await;
    tracing::debug!(?phase, "session ended");
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn say(assistant: &Assistant, text: &str) -> anyhow::Result<()> {
    assistant.bind_voice().await;
    let report = assistant.pipeline().render(text).await;
    for attempt in &report.attempts {
        tracing::info!(backend = attempt.backend, outcome = %attempt.outcome, "speech attempt");
    }
    assistant.shutdown().await;
    Ok(())
}

async fn list_voices(assistant: &Assistant) -> anyhow::Result<()> {
    let client = assistant
        .elevenlabs()
        .ok_or_else(|| anyhow::anyhow!("ElevenLabs API key not configured (set ELEVENLABS_API_KEY)"))?;

    let configured = &assistant.config().voice.voice_name;
    for voice in client.voices().await? {
        let marker = if &voice.name == configured { "*" } else { " " };
        println!("{marker} {:<24} {}", voice.name, voice.voice_id);
    }
    Ok(())
}

fn print_rules(utterance: Option<&str>) {
    let table = RuleTable::standard();

    let Some(raw) = utterance else {
        for (i, rule) in table.rules().iter().enumerate() {
            println!("{:>2}. {:<18} {}", i + 1, rule.name, rule.predicate);
        }
        return;
    };

    let utterance = Utterance::new(raw);
    match table.resolve(&utterance) {
        Resolution::Matched { rule, request } => {
            println!("\"{utterance}\" -> {} ({})", rule.name, request.action);
            for (key, value) in request.args.sorted() {
                println!("    {key} = {value}");
            }
            let shadowed: Vec<&str> = table
                .matching(&utterance)
                .into_iter()
                .skip(1)
                .map(|r| r.name)
                .collect();
            if !shadowed.is_empty() {
                println!("  also matched (shadowed): {}", shadowed.join(", "));
            }
        }
        Resolution::NoMatch => println!("\"{utterance}\" -> no match"),
    }
}

fn print_banner(assistant: &Assistant, voice_bound: bool) {
    let line = "=".repeat(60);
    println!("\n{line}");
    println!("herald {}", env!("CARGO_PKG_VERSION"));
    println!("{line}");
    println!("Features:");
    println!("• System Control (volume, screenshots, lock screen)");
    println!("• Productivity Tools (calculator, timers, reminders, notes)");
    println!("• File Management (create, search)");
    println!("• Web Search (Google, Wikipedia)");
    println!("• Window Management (minimize, switch, close)");
    println!("• Security Features (password generator, system check)");
    println!("• Weather Information");
    println!("\nSay 'help' for command examples or 'stop' to exit.");
    if assistant.config().assistant.wake_word_mode {
        println!("Wake word: \"{}\"", assistant.config().assistant.wake_word);
    }
    println!("{line}\n");

    if !voice_bound {
        println!("Warning: ElevenLabs voice not configured. Using fallback TTS.");
    }
    if assistant.state().privacy_mode() {
        println!("Privacy mode is on: responses are text only.");
    }
}
