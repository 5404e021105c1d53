use clap::{Parser, Subcommand};
use folio::assets::CdnAssetResolver;
use folio::config::{self, SiteConfig};
use folio::generate::{self, Site};
use folio::highlight::{Highlighter, PlainText, SyntectHighlighter};
use folio::hover::{self, HoverPreview, TimedEvent};
use folio::projects::Projects;
use folio::render::Renderer;
use folio::source::ExportSource;
use folio::{blocks, output, resume};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("FOLIO_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("FOLIO_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio site builder for a headless content store")]
#[command(long_about = "\
Portfolio site builder for a headless content store

Projects come from an export of the content store (JSON array or NDJSON).
Each project has a showcase (image or video), tags, links, and portable-text
descriptions that are rendered to HTML.

Content structure:

  content/
  ├── config.toml          # Site config (optional)
  └── projects.ndjson      # Content export ([content] export in config)

Output:

  dist/
  ├── index.html           # Project cards, newest first
  ├── 404.html             # \"Project not found\"
  └── projects/<slug>/index.html

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render every project page and write the site
    Build,
    /// Render everything without writing; fail on slug problems
    Check,
    /// Render a JSON array of content blocks to HTML on stdout
    Render {
        /// File holding the blocks
        file: PathBuf,
    },
    /// Render one project page to stdout
    Project {
        slug: String,
        /// Video start offset in seconds, like the `v` query parameter
        #[arg(long)]
        start: Option<String>,
    },
    /// Replay a hover/media event script through the preview controller
    Preview {
        /// JSON array of {"at_ms", "event", ...} objects
        events: PathBuf,
        /// Project slug used for the resume link
        #[arg(long)]
        slug: String,
        /// Print signals and the final state as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// Config plus the collaborators built from it.
struct Context {
    config: SiteConfig,
    assets: CdnAssetResolver,
    syntect: Option<SyntectHighlighter>,
}

impl Context {
    fn load(source_dir: &Path) -> Result<Self, config::ConfigError> {
        let config = config::load_config(source_dir)?;
        let assets = CdnAssetResolver::from_config(&config.assets);
        // Loaded once per process, so the prefix leaks once.
        let syntect = config.code.highlight.then(|| {
            SyntectHighlighter::new(Box::leak(config.code.class_prefix.clone().into_boxed_str()))
        });
        Ok(Self {
            config,
            assets,
            syntect,
        })
    }

    fn highlighter(&self) -> &dyn Highlighter {
        match &self.syntect {
            Some(h) => h,
            None => &PlainText,
        }
    }

    fn css(&self) -> String {
        generate::site_css(&self.config, self.syntect.as_ref())
    }

    fn load_export(&self, source_dir: &Path) -> Result<ExportSource, folio::source::SourceError> {
        ExportSource::load(&source_dir.join(&self.config.content.export))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let ctx = Context::load(&cli.source)?;
            init_thread_pool(&ctx.config.processing);
            let export = ctx.load_export(&cli.source)?;
            let projects = Projects::new(&export, &ctx.assets, ctx.highlighter(), &ctx.config.assets);
            let css = ctx.css();
            let site = Site::new(&ctx.config, &css);

            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = generate::build(&projects, &site, &cli.output)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            let ctx = Context::load(&cli.source)?;
            init_thread_pool(&ctx.config.processing);
            let export = ctx.load_export(&cli.source)?;
            let projects = Projects::new(&export, &ctx.assets, ctx.highlighter(), &ctx.config.assets);
            let css = ctx.css();
            let site = Site::new(&ctx.config, &css);

            println!("==> Checking {}", cli.source.display());
            let report = generate::check(&projects, &site)?;
            output::print_check_output(&report);
            if !report.issues.is_empty() {
                return Err(format!("{} slug issue(s)", report.issues.len()).into());
            }
            println!("==> Content is valid");
        }
        Command::Render { file } => {
            let ctx = Context::load(&cli.source)?;
            let document = blocks::parse_document(&std::fs::read_to_string(&file)?)?;
            let renderer = Renderer::new(
                &ctx.assets,
                ctx.highlighter(),
                ctx.config.assets.content_width,
            );
            println!("{}", renderer.render_to_string(&document));
        }
        Command::Project { slug, start } => {
            let start_time = match start {
                Some(raw) => resume::parse_seconds(&raw)?,
                None => None,
            };
            let ctx = Context::load(&cli.source)?;
            let export = ctx.load_export(&cli.source)?;
            let projects = Projects::new(&export, &ctx.assets, ctx.highlighter(), &ctx.config.assets);
            let css = ctx.css();
            let site = Site::new(&ctx.config, &css);

            let result = projects.load_project_page(&slug);
            let (status, page) = generate::render_page_result(&result, start_time, &site);
            println!("{}", page.into_string());
            if let Err(err) = result {
                tracing::error!(status, "{err}");
                return Err(err.into());
            }
        }
        Command::Preview { events, slug, json } => {
            let ctx = Context::load(&cli.source)?;
            let script: Vec<TimedEvent> = serde_json::from_str(&std::fs::read_to_string(&events)?)?;
            let mut preview = HoverPreview::from_config(&ctx.config.preview);
            let signals = hover::replay(&mut preview, &script);
            let link = resume::resume_link(
                &ctx.config.site.base_path,
                &slug,
                preview.state().watch_progress,
                ctx.config.preview.resume_threshold_secs,
            );
            if json {
                output::print_preview_json(&signals, preview.state(), &link)?;
            } else {
                output::print_preview_trace(&signals, preview.state(), &link);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr so rendered HTML on stdout stays clean.
///
/// `RUST_LOG` overrides the default `folio=info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("folio=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
