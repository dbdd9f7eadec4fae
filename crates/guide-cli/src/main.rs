use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use guide_layout::{GuideConfig, Language, NoFonts};
use guide_remote::{
    AnalysisRequest, FontCache, RemoteConfig, WebhookBackend, analyze_or_error_text,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "neuro-sortie",
    about = "Patient discharge guide to PDF",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render an existing guide text file to PDF
    Render {
        /// Guide text file, one line per paragraph
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Guide language
        #[arg(short, long, default_value = "french", value_enum)]
        language: LanguageArg,

        /// Layout configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Network settings (JSON)
        #[arg(long)]
        remote_config: Option<PathBuf>,

        /// Font cache directory [default: fonts]
        #[arg(long)]
        font_dir: Option<PathBuf>,

        /// Render with Helvetica only, without fetching Arabic fonts
        #[arg(long)]
        no_fonts: bool,
    },

    /// Analyse a discharge report and render the resulting guide
    Generate {
        /// Report text file
        #[arg(long, required_unless_present = "image_url", conflicts_with = "image_url")]
        text_file: Option<PathBuf>,

        /// URL of a photographed report
        #[arg(long)]
        image_url: Option<String>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Guide language
        #[arg(short, long, default_value = "french", value_enum)]
        language: LanguageArg,

        /// Model requested from the backend [default: gpt-4o]
        #[arg(long)]
        model: Option<String>,

        /// Webhook URL (defaults to $NEURO_SORTIE_WEBHOOK)
        #[arg(long)]
        webhook: Option<String>,

        /// Layout configuration (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Network settings (JSON)
        #[arg(long)]
        remote_config: Option<PathBuf>,

        /// Font cache directory [default: fonts]
        #[arg(long)]
        font_dir: Option<PathBuf>,

        /// Render with Helvetica only, without fetching Arabic fonts
        #[arg(long)]
        no_fonts: bool,
    },

    /// Download the Arabic fonts into the cache
    FetchFonts {
        /// Network settings (JSON)
        #[arg(long)]
        remote_config: Option<PathBuf>,

        /// Font cache directory [default: fonts]
        #[arg(long)]
        font_dir: Option<PathBuf>,
    },

    /// Write the default layout configuration
    InitConfig {
        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the default network settings to this file
        #[arg(long)]
        remote_output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LanguageArg {
    French,
    Darija,
    Arabic,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::French => Self::French,
            LanguageArg::Darija => Self::Darija,
            LanguageArg::Arabic => Self::ClassicalArabic,
        }
    }
}

async fn load_config(path: Option<&Path>) -> Result<GuideConfig> {
    match path {
        Some(path) => GuideConfig::load(path)
            .await
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(GuideConfig::default()),
    }
}

/// Network settings from `path` or defaults, then the environment, then `font_dir`
fn load_remote_config(path: Option<&Path>, font_dir: Option<PathBuf>) -> Result<RemoteConfig> {
    let mut remote = match path {
        Some(path) => RemoteConfig::load(path)
            .with_context(|| format!("loading remote config {}", path.display()))?,
        None => RemoteConfig::default(),
    }
    .with_env();
    if let Some(dir) = font_dir {
        remote.font_dir = dir;
    }
    Ok(remote)
}

async fn write_guide(
    text: &str,
    language: Language,
    config: &GuideConfig,
    remote: &RemoteConfig,
    no_fonts: bool,
    output: &Path,
) -> Result<usize> {
    let pages = if no_fonts {
        guide_layout::generate_pdf(text, language, config, NoFonts, output).await?
    } else {
        let cache = FontCache::from_config(remote);
        guide_layout::generate_pdf(text, language, config, cache, output).await?
    };
    Ok(pages)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            output,
            language,
            config,
            remote_config,
            font_dir,
            no_fonts,
        } => {
            let config = load_config(config.as_deref()).await?;
            let remote = load_remote_config(remote_config.as_deref(), font_dir)?;
            let text = guide_layout::load_guide_text(&input)
                .await
                .with_context(|| format!("reading {}", input.display()))?;
            let pages =
                write_guide(&text, language.into(), &config, &remote, no_fonts, &output).await?;
            println!("Rendered {} page(s) → {}", pages, output.display());
        }

        Commands::Generate {
            text_file,
            image_url,
            output,
            language,
            model,
            webhook,
            config,
            remote_config,
            font_dir,
            no_fonts,
        } => {
            let language: Language = language.into();
            let config = load_config(config.as_deref()).await?;
            let mut remote = load_remote_config(remote_config.as_deref(), font_dir)?;
            if webhook.is_some() {
                remote.webhook_url = webhook;
            }
            if let Some(model) = model {
                remote.model = model;
            }

            let mut request = match (text_file, image_url) {
                (Some(path), _) => {
                    let report = tokio::fs::read_to_string(&path)
                        .await
                        .with_context(|| format!("reading {}", path.display()))?;
                    AnalysisRequest::text(report, language)
                }
                (None, Some(url)) => AnalysisRequest::image_url(url, language),
                (None, None) => anyhow::bail!("either --text-file or --image-url is required"),
            };
            request.model = remote.model.clone();
            request.validate()?;

            let backend = WebhookBackend::from_config(&remote)?;

            let guide = tokio::task::spawn_blocking(move || {
                analyze_or_error_text(&backend, &request)
            })
            .await?;

            let pages =
                write_guide(&guide, language, &config, &remote, no_fonts, &output).await?;
            println!("Generated {} guide, {} page(s) → {}", language, pages, output.display());
        }

        Commands::FetchFonts {
            remote_config,
            font_dir,
        } => {
            let remote = load_remote_config(remote_config.as_deref(), font_dir)?;
            let cache = FontCache::from_config(&remote);
            let paths = tokio::task::spawn_blocking(move || cache.ensure_all()).await??;
            for path in paths {
                println!("Font ready: {}", path.display());
            }
        }

        Commands::InitConfig {
            output,
            remote_output,
        } => {
            GuideConfig::default().save(&output).await?;
            println!("Wrote default config → {}", output.display());
            if let Some(path) = remote_output {
                RemoteConfig::default().save(&path)?;
                println!("Wrote default remote config → {}", path.display());
            }
        }
    }

    Ok(())
}
