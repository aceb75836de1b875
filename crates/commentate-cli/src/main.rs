use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{SeedableRng, rngs::StdRng};
use tokio::fs;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commentate_core::{
    ChatCompletionClient, CommentaryStyle, Language, NarrationConfig, NarrationResult, Provider,
    format_narration_readable, generate_narration, get_analysis_path, get_cache_dir,
    get_commentary_path, get_script_path, load_analysis, load_narration, render_script,
    resolve_language, save_analysis, save_narration, save_script,
};

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Openai,
    Deepseek,
    Grok,
    Gemini,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Openai => Provider::Openai,
            CliProvider::Deepseek => Provider::Deepseek,
            CliProvider::Grok => Provider::Grok,
            CliProvider::Gemini => Provider::Gemini,
        }
    }
}

#[derive(Parser)]
#[command(name = "commentate")]
#[command(
    about = "Generate style-conditioned narration scripts that fit a short video's runtime"
)]
struct Cli {
    /// Analysis JSON (video metadata and timestamped scene annotations)
    #[arg(required_unless_present = "list_styles")]
    analysis: Option<PathBuf>,

    /// Commentary style (documentary, energetic, analytical, storyteller, urdu)
    #[arg(short, long, default_value = "documentary")]
    style: String,

    /// Narration language ("en" or "ur"). Defaults to the style's language, then the video's.
    #[arg(short, long)]
    lang: Option<String>,

    /// AI provider for narration generation
    #[arg(short, long, default_value = "openai")]
    provider: CliProvider,

    /// Force re-generation even if a cached narration exists
    #[arg(short, long)]
    force: bool,

    /// Seed for the speech markup pacing, for reproducible scripts
    #[arg(long)]
    seed: Option<u64>,

    /// Write artifacts here instead of the cache directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// List the available commentary styles and exit
    #[arg(long)]
    list_styles: bool,
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("commentate=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(false),
            )
            .with(env_filter)
            .init();
    }
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn print_styles() {
    println!("\n{}\n", style("Commentary styles").cyan().bold());
    for commentary_style in CommentaryStyle::ALL {
        let profile = commentary_style.profile();
        let language = profile
            .native_language
            .map(|l| format!(" ({})", l.name()))
            .unwrap_or_default();
        println!(
            "  {:<12} {}",
            style(commentary_style.key()).green(),
            style(format!("temperature {:.2}{}", profile.temperature, language)).dim()
        );
    }
}

fn print_overrun_warning(result: &NarrationResult) {
    println!(
        "{} Narration runs {:.1}s for a {:.1}s video after {} attempts",
        style("!").yellow().bold(),
        result.estimated_duration_seconds,
        result.metadata.duration_seconds,
        result.attempts
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if cli.list_styles {
        print_styles();
        return Ok(());
    }

    let commentary_style: CommentaryStyle = cli.style.parse()?;
    let requested_language = cli.lang.as_deref().map(str::parse::<Language>).transpose()?;
    let provider: Provider = cli.provider.into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    let config = NarrationConfig::from_env();
    debug!(?config, "Narration config");
    let client = ChatCompletionClient::new(&provider, &config)?;

    println!(
        "\n{}  {}\n",
        style("commentate").cyan().bold(),
        style("Video Narrator").dim()
    );

    // Step 1: Load analysis
    let analysis_path = cli
        .analysis
        .context("an analysis file is required")?;
    let analysis = load_analysis(&analysis_path).await?;
    println!(
        "{} Analysis loaded: {:.1}s video, {} scenes",
        style("✓").green().bold(),
        analysis.metadata.duration_seconds,
        analysis.scenes.len()
    );

    // Setup output directory
    let cache_dir = cli
        .output_dir
        .unwrap_or_else(|| get_cache_dir(&analysis));
    fs::create_dir_all(&cache_dir).await?;
    save_analysis(&analysis, &get_analysis_path(&cache_dir)).await?;

    // Step 2: Generate narration (check cache with style+lang)
    let language = resolve_language(requested_language, commentary_style, &analysis.metadata);
    let commentary_path = get_commentary_path(&cache_dir, commentary_style, language);

    let narration = if !cli.force && commentary_path.exists() {
        let narration = load_narration(&commentary_path).await?;
        println!(
            "{} Narration generated: {} words, {:.1}s {}",
            style("✓").green().bold(),
            narration.word_count,
            narration.estimated_duration_seconds,
            style("(cached)").dim()
        );
        narration
    } else {
        let spinner = create_spinner(&format!(
            "Generating {} narration in {} with {}...",
            commentary_style,
            language.name(),
            provider.name()
        ));
        let narration = match generate_narration(
            &client,
            &analysis,
            commentary_style,
            language,
            &config,
        )
        .await
        {
            Ok(narration) => narration,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e.into());
            }
        };
        // Save to cache
        save_narration(&narration, &commentary_path).await?;
        spinner.finish_with_message(format!(
            "{} Narration generated: {} words, {:.1}s ({})",
            style("✓").green().bold(),
            narration.word_count,
            narration.estimated_duration_seconds,
            provider.name()
        ));
        narration
    };

    if !narration.is_duration_compliant {
        warn!(
            estimated = narration.estimated_duration_seconds,
            video_duration = narration.metadata.duration_seconds,
            "Narration is longer than the video"
        );
        print_overrun_warning(&narration);
    }

    // Step 3: Speech markup
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let script = render_script(&narration, &mut rng);
    let script_path = get_script_path(&cache_dir, commentary_style, language);
    save_script(&script, &script_path).await?;
    println!("{} Speech markup written", style("✓").green().bold());

    println!(
        "\n{} {}\n{} {}\n",
        style("Saved:").dim(),
        style(commentary_path.display()).cyan(),
        style("Script:").dim(),
        style(script_path.display()).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    // Human-readable output
    let readable = format_narration_readable(&narration, &script);
    println!("{}", readable);

    Ok(())
}
