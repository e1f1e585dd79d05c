use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use resize_image::config::{self, ConfigError, ResizeConfig};
use resize_image::imaging::{BackendError, Dimensions, ImageBackend, Units};
use resize_image::output::{self, IdentifyReport, ResizeReport};
use resize_image::preview::{PreviewCaption, render_preview_page};
use resize_image::sniff::{InferSniffer, TypeSniffer};
use resize_image::{OperationError, ResizeArgs, ResizeImage};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Error, Debug)]
enum CliError {
    #[error("{}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("input is empty")]
    EmptyInput,
    #[error("{failed} of {total} inputs failed")]
    Failed { failed: usize, total: usize },
}

fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    std::fs::write(path, bytes).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `0.3.0` on a clean tagged build, otherwise `dev@<hash>` with a `+dirty`
/// marker for uncommitted changes.
fn version_string() -> &'static str {
    if env!("RESIZE_IMAGE_RELEASE") == "true" {
        return env!("CARGO_PKG_VERSION");
    }
    let hash = env!("RESIZE_IMAGE_GIT_HASH");
    if hash.is_empty() {
        return "dev@unknown";
    }
    let dirty = if env!("RESIZE_IMAGE_DIRTY") == "true" {
        "+dirty"
    } else {
        ""
    };
    // Leaked once at startup
    Box::leak(format!("dev@{hash}{dirty}").into_boxed_str())
}

#[derive(Clone, Copy, ValueEnum)]
enum UnitsArg {
    Pixels,
    Percentage,
}

impl From<UnitsArg> for Units {
    fn from(u: UnitsArg) -> Self {
        match u {
            UnitsArg::Pixels => Units::Pixels,
            UnitsArg::Percentage => Units::Percentage,
        }
    }
}

#[derive(Parser)]
#[command(name = "resize-image")]
#[command(about = "Resize images and render inline HTML previews")]
#[command(long_about = "\
Resize images and render inline HTML previews

Width and height are given in pixels or as a percentage of the original.
A value of 0 means auto scale: that side is derived from the other one,
preserving aspect ratio. With both at 0 the image is re-encoded at its
original size. The output keeps the input's format.

Examples:
  resize-image resize photo.jpg --width 800
  resize-image resize *.png --width 50 --units percentage --output-dir small/
  resize-image present photo.jpg --output preview.html

Empty input files are reported as failures and no output is written for
them, unlike the library operation, which maps empty input to empty output.

Run 'resize-image gen-config' to generate a documented resize.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (defaults to ./resize.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resize one or more images
    Resize {
        /// Input image files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Target width (0 = auto scale)
        #[arg(long, allow_negative_numbers = true)]
        width: Option<f64>,

        /// Target height (0 = auto scale)
        #[arg(long, allow_negative_numbers = true)]
        height: Option<f64>,

        /// How width and height are interpreted
        #[arg(long, value_enum)]
        units: Option<UnitsArg>,

        /// Directory for resized files (defaults to each input's directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Appended to the file stem of each output
        #[arg(long, default_value = "resized")]
        suffix: String,
    },
    /// Write an HTML page previewing an image
    Present {
        input: PathBuf,

        /// Output HTML file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print detected type and dimensions of files
    Identify {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the operation's metadata and argument schema as JSON
    Schema,
    /// Print a stock resize.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let site_config = load_config(cli.config.as_deref())?;
    let op: ResizeImage = ResizeImage::default();
    let op = op.with_filter(site_config.processing.filter);

    match cli.command {
        Command::Resize {
            inputs,
            width,
            height,
            units,
            output_dir,
            suffix,
        } => {
            let defaults = &site_config.defaults;
            let args = ResizeArgs::new(
                width.unwrap_or(defaults.width),
                height.unwrap_or(defaults.height),
                units.map(Units::from).unwrap_or(defaults.units),
            );
            if let Some(dir) = &output_dir {
                std::fs::create_dir_all(dir)?;
            }
            init_thread_pool(&site_config.processing);

            let results: Vec<Result<ResizeReport, CliError>> = inputs
                .par_iter()
                .map(|input| resize_one(&op, input, &args, output_dir.as_deref(), &suffix))
                .collect();

            let mut failed = 0;
            for (i, (input, result)) in inputs.iter().zip(&results).enumerate() {
                let lines = match result {
                    Ok(report) => output::format_resize_report(i + 1, report),
                    Err(e) => {
                        failed += 1;
                        tracing::warn!(input = %input.display(), error = %e, "Resize failed");
                        output::format_failure(i + 1, &input.display().to_string(), e)
                    }
                };
                for line in lines {
                    println!("{}", line);
                }
            }
            if failed > 0 {
                return Err(CliError::Failed {
                    failed,
                    total: inputs.len(),
                }
                .into());
            }
        }
        Command::Present { input, output } => {
            let page = present_page(&op, &input)?;
            match output {
                Some(path) => write_output(&path, page.as_bytes())?,
                None => println!("{}", page),
            }
        }
        Command::Identify { inputs } => {
            for (i, input) in inputs.iter().enumerate() {
                let report = identify_one(&op, input)?;
                for line in output::format_identify_report(i + 1, &report) {
                    println!("{}", line);
                }
            }
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&op.info())?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stderr logging; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "resize_image=debug"
    } else {
        "resize_image=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();
}

fn load_config(explicit: Option<&Path>) -> Result<ResizeConfig, ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Path::new(".")),
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `<dir>/<stem>-<suffix>.<ext>`, keeping the input's extension.
fn output_path(input: &Path, output_dir: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}-{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}-{}", stem, suffix),
    };
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(name)
}

fn resize_one(
    op: &ResizeImage,
    input: &Path,
    args: &ResizeArgs,
    output_dir: Option<&Path>,
    suffix: &str,
) -> Result<ResizeReport, CliError> {
    let bytes = read_input(input)?;
    if bytes.is_empty() {
        return Err(CliError::EmptyInput);
    }

    let resized = op.run(&bytes, args)?;
    let original = op.backend().dimensions(&bytes)?;
    let new_dims: Dimensions = op.backend().dimensions(&resized)?;

    let out = output_path(input, output_dir, suffix);
    write_output(&out, &resized)?;

    Ok(ResizeReport {
        source: input.display().to_string(),
        output: out.display().to_string(),
        original,
        resized: new_dims,
        byte_len: resized.len(),
    })
}

/// Preview page for one file. Images the engine cannot decode are still
/// shown; their caption just has no dimensions.
fn present_page(op: &ResizeImage, input: &Path) -> Result<String, CliError> {
    let bytes = read_input(input)?;
    if bytes.is_empty() {
        return Err(CliError::EmptyInput);
    }
    let fragment = op.present(&bytes)?;
    let dimensions = match op.backend().dimensions(&bytes) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::debug!(input = %input.display(), error = %e, "No dimensions for caption");
            None
        }
    };
    let caption = PreviewCaption {
        file_name: display_name(input),
        dimensions,
        byte_len: bytes.len(),
    };
    Ok(render_preview_page(&fragment, &caption))
}

fn identify_one(op: &ResizeImage, input: &Path) -> Result<IdentifyReport, CliError> {
    let bytes = read_input(input)?;
    let mime = InferSniffer.detect(&bytes).map(|kind| kind.mime);
    let dimensions = match &mime {
        Some(m) if m.starts_with("image") => op.backend().dimensions(&bytes).ok(),
        _ => None,
    };
    Ok(IdentifyReport {
        source: input.display().to_string(),
        mime,
        dimensions,
        byte_len: bytes.len(),
    })
}
