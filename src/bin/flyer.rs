//! CLI binary for flyer-client.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! `FlyerSession` and prints results.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use flyer_client::{
    download_resized, ClientConfig, Control, ControlState, ExtractOutcome, FileError,
    FlyerSession, InputFile, PanelRole, Platform, Pose, SelectionState, SessionObserver,
    Sector, Shape, StatusArea, Template,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
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

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Terminal observer: one spinner per backend call, plus a log line per
/// skipped file.
struct CliObserver {
    /// Spinner of the call in flight, if any.
    bar: Mutex<Option<ProgressBar>>,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            bar: Mutex::new(None),
        })
    }

    fn spinner(control: Control) -> ProgressBar {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix(match control {
            Control::ExtractPdf => "Extracting",
            Control::GenerateFlyer => "Generating",
        });
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    }
}

impl SessionObserver for CliObserver {
    fn on_control_change(&self, control: Control, state: ControlState) {
        let Ok(mut slot) = self.bar.lock() else {
            return;
        };
        match state {
            ControlState::InFlight => {
                if let Some(old) = slot.replace(Self::spinner(control)) {
                    old.finish_and_clear();
                }
            }
            ControlState::Idle => {
                if let Some(bar) = slot.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    fn on_status(&self, _area: StatusArea, message: &str) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                bar.set_message(message.to_string());
            }
        }
    }

    fn on_file_skipped(&self, error: &FileError) {
        let line = format!("  {} {}", red("✗"), dim(&error.to_string()));
        let slot = self.bar.lock().ok();
        match slot.as_deref() {
            Some(Some(bar)) => bar.println(line),
            _ => eprintln!("{line}"),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Split a dieline PDF into panels and save them
  flyer extract dieline.pdf --out-dir panels/

  # Generate a story flyer from a PDF plus two extra images
  flyer generate --pdf dieline.pdf lid.png side_l.png --template story -o story.png

  # Override inferred roles (1-based positions in the list) and drop an item
  flyer generate a.png b.png c.png --role 2=back --role 3=cap --drop 1

  # Letterbox any image to a target size, offline
  flyer resize flyer.png --width 1200 --height 628 -o landscape.png

  # List templates, shapes, sectors, platforms and poses
  flyer options

ENVIRONMENT VARIABLES:
  FLYER_BASE_URL          Backend root URL (default http://127.0.0.1:5000)
  FLYER_TIMEOUT           Per-request timeout in seconds
  RUST_LOG                Log filter, e.g. flyer_client=debug
"#;

/// Build packaging flyers with a flyer backend.
#[derive(Parser, Debug)]
#[command(
    name = "flyer",
    version,
    about = "Collect packaging artwork, tag panel roles, and generate flyers",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Backend root URL.
    #[arg(long, global = true, env = "FLYER_BASE_URL", default_value = flyer_client::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, env = "FLYER_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Disable the spinner.
    #[arg(long, global = true, env = "FLYER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "FLYER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "FLYER_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract artwork panels from a PDF.
    Extract {
        /// PDF file.
        pdf: PathBuf,

        /// Rasterisation DPI requested from the backend (72–600).
        #[arg(long, env = "FLYER_DPI", default_value_t = 400)]
        dpi: u32,

        /// Write each panel as a PNG into this directory.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Print the panel list as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate a flyer from PDFs and images.
    Generate(GenerateArgs),

    /// Letterbox an image to a target size.
    Resize {
        image: PathBuf,

        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// List every option set and its default.
    Options,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Image files, added in the given order.
    images: Vec<PathBuf>,

    /// PDF dielines to extract panels from (processed before images).
    #[arg(long = "pdf")]
    pdfs: Vec<PathBuf>,

    /// Set a role: POSITION=ROLE, 1-based (e.g. 2=back).
    #[arg(long = "role", value_parser = parse_role_edit)]
    roles: Vec<(usize, PanelRole)>,

    /// Remove the item at a 1-based position (applied after role edits).
    #[arg(long = "drop")]
    drops: Vec<usize>,

    #[arg(long, default_value_t = Template::default())]
    template: Template,

    #[arg(long, default_value_t = Shape::default())]
    shape: Shape,

    #[arg(long, default_value_t = Sector::default())]
    sector: Sector,

    #[arg(long, default_value_t = Platform::default())]
    platform: Platform,

    #[arg(long, default_value_t = Pose::default())]
    pose: Pose,

    /// Free-text style notes.
    #[arg(long, default_value = "")]
    style: String,

    /// Rasterisation DPI for PDF inputs (72–600).
    #[arg(long, env = "FLYER_DPI", default_value_t = 400)]
    dpi: u32,

    /// Largest accepted image file, in bytes.
    #[arg(long, env = "FLYER_MAX_IMAGE_BYTES", default_value_t = flyer_client::config::DEFAULT_MAX_IMAGE_BYTES)]
    max_image_bytes: u64,

    /// Output path for the resized flyer (default: template filename).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the backend image without resizing.
    #[arg(long)]
    raw: Option<PathBuf>,
}

fn parse_role_edit(s: &str) -> Result<(usize, PanelRole), String> {
    let (pos, role) = s
        .split_once('=')
        .ok_or_else(|| format!("expected POSITION=ROLE, got '{s}'"))?;
    let pos: usize = pos
        .trim()
        .parse()
        .map_err(|_| format!("invalid position '{}'", pos.trim()))?;
    if pos < 1 {
        return Err("positions are 1-based".into());
    }
    let role: PanelRole = role.trim().parse().map_err(|e| format!("{e}"))?;
    Ok((pos, role))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Keep library INFO logs out of the way while the spinner is drawing.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match &cli.command {
        Command::Extract {
            pdf,
            dpi,
            out_dir,
            json,
        } => run_extract(&cli, pdf, *dpi, out_dir.as_deref(), *json).await,
        Command::Generate(args) => run_generate(&cli, args).await,
        Command::Resize {
            image,
            width,
            height,
            output,
        } => run_resize(&cli, image, *width, *height, output).await,
        Command::Options => {
            print_options();
            Ok(())
        }
    }
}

/// Build a session from the global flags.
fn build_session(cli: &Cli, dpi: u32, max_image_bytes: Option<u64>) -> Result<FlyerSession> {
    let mut builder = ClientConfig::builder()
        .base_url(&cli.base_url)
        .request_timeout_secs(cli.timeout)
        .pdf_resolution(dpi);
    if let Some(limit) = max_image_bytes {
        builder = builder.max_image_bytes(limit);
    }
    let config = builder.build().context("Invalid configuration")?;

    let session = FlyerSession::new(config).context("Failed to set up backend client")?;
    Ok(if !cli.quiet && !cli.no_progress {
        session.with_observer(CliObserver::new())
    } else {
        session
    })
}

async fn run_extract(
    cli: &Cli,
    pdf: &Path,
    dpi: u32,
    out_dir: Option<&Path>,
    json: bool,
) -> Result<()> {
    let mut session = build_session(cli, dpi, None)?;
    let file = InputFile::open(pdf)?;

    let outcome = session
        .extract_pdf_panels(&file)
        .await
        .context("Panel extraction failed")?;

    if let ExtractOutcome::NoPanels { pages } = outcome {
        if !cli.quiet {
            eprintln!(
                "{} {} ({} page(s))",
                cyan("⚠"),
                session.status(StatusArea::Pdf),
                pages
            );
        }
        return Ok(());
    }

    if json {
        let listing: Vec<_> = session
            .files()
            .iter()
            .map(|f| serde_json::json!({ "name": f.name, "role": f.role }))
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&listing).context("Failed to serialise panels")?
        );
    } else {
        for (i, f) in session.files().iter().enumerate() {
            println!("{:>3}  {:<8} {}", i + 1, f.role.to_string(), f.name);
        }
    }

    if let Some(dir) = out_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for f in session.files() {
            let bytes = flyer_client::encode::from_base64(&f.content)
                .with_context(|| format!("Panel {} is not valid base64", f.name))?;
            let path = dir.join(&f.name);
            tokio::fs::write(&path, bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
    }

    if !cli.quiet {
        eprintln!("{} {}", green("✔"), session.status(StatusArea::Pdf));
    }
    Ok(())
}

async fn run_generate(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let GenerateArgs {
        images,
        pdfs,
        roles,
        drops,
        template,
        shape,
        sector,
        platform,
        pose,
        style,
        dpi,
        max_image_bytes,
        output,
        raw,
    } = args;

    let mut session = build_session(cli, *dpi, Some(*max_image_bytes))?;

    // ── Collect inputs ───────────────────────────────────────────────────
    for pdf in pdfs {
        let file = InputFile::open(pdf)?;
        session
            .extract_pdf_panels(&file)
            .await
            .with_context(|| format!("Panel extraction failed for {}", pdf.display()))?;
        if !cli.quiet {
            eprintln!("{} {}", cyan("◆"), session.status(StatusArea::Pdf));
        }
    }

    if !images.is_empty() {
        let picked = images
            .iter()
            .map(InputFile::open)
            .collect::<Result<Vec<_>, _>>()?;
        let report = session.add_images(&picked).await?;
        if !cli.quiet && !report.skipped.is_empty() {
            eprintln!(
                "{} {} image(s) added, {} skipped",
                cyan("⚠"),
                report.added,
                report.skipped.len()
            );
        }
    }

    // ── Edit the list ────────────────────────────────────────────────────
    for (pos, role) in roles {
        session
            .edit_role(pos - 1, *role)
            .with_context(|| format!("--role {pos}={role}"))?;
    }

    let mut drops = drops.clone();
    drops.sort_unstable();
    drops.dedup();
    for pos in drops.iter().rev() {
        if *pos < 1 {
            bail!("--drop positions are 1-based (got {pos})");
        }
        let removed = session
            .remove_file(pos - 1)
            .with_context(|| format!("--drop {pos}"))?;
        tracing::debug!("Dropped {}", removed.name);
    }

    if !cli.quiet {
        for (i, f) in session.files().iter().enumerate() {
            eprintln!("  {:>3}  {:<8} {}", i + 1, f.role.to_string(), dim(&f.name));
        }
    }

    session.set_selection(SelectionState {
        template: *template,
        shape: *shape,
        sector: *sector,
        platform: *platform,
        pose: *pose,
    });
    session.set_style(style.clone());

    // ── Generate and download ────────────────────────────────────────────
    let result = session
        .generate_flyer()
        .await
        .context("Flyer generation failed")?;
    let out_path = output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&result.download_name));
    let (target_w, target_h) = (result.target_w, result.target_h);

    if let Some(raw_path) = raw {
        tokio::fs::write(raw_path, &result.image)
            .await
            .with_context(|| format!("Failed to write {}", raw_path.display()))?;
    }

    session
        .download_result(&out_path)
        .await
        .context("Failed to save flyer")?;

    if !cli.quiet {
        eprintln!(
            "{}  {}×{}  →  {}",
            green("✔"),
            target_w,
            target_h,
            bold(&out_path.display().to_string())
        );
    }
    Ok(())
}

async fn run_resize(cli: &Cli, image: &Path, width: u32, height: u32, output: &Path) -> Result<()> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    download_resized(&bytes, width, height, output)
        .await
        .context("Resize failed")?;
    if !cli.quiet {
        eprintln!(
            "{}  {}×{}  →  {}",
            green("✔"),
            width,
            height,
            bold(&output.display().to_string())
        );
    }
    Ok(())
}

fn print_options() {
    let defaults = SelectionState::default();

    println!("{}", bold("Templates"));
    for t in Template::ALL {
        let (w, h) = t.target_size();
        let marker = if *t == defaults.template { "*" } else { " " };
        println!(
            "  {marker} {:<16} {:>4}×{:<4}  {}",
            t.as_str(),
            w,
            h,
            dim(t.download_name())
        );
    }

    print_group("Shapes", Shape::ALL.iter().map(|o| o.as_str()), defaults.shape.as_str());
    print_group("Sectors", Sector::ALL.iter().map(|o| o.as_str()), defaults.sector.as_str());
    print_group(
        "Platforms",
        Platform::ALL.iter().map(|o| o.as_str()),
        defaults.platform.as_str(),
    );
    print_group("Poses", Pose::ALL.iter().map(|o| o.as_str()), defaults.pose.as_str());
    print_group(
        "Roles",
        PanelRole::ALL.iter().map(|r| r.as_str()),
        PanelRole::default().as_str(),
    );
}

fn print_group<'a>(title: &str, values: impl Iterator<Item = &'a str>, default: &str) {
    println!("{}", bold(title));
    for v in values {
        let marker = if v == default { "*" } else { " " };
        println!("  {marker} {v}");
    }
}
