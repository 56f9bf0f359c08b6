use clap::{ArgAction, Parser, Subcommand};
use image_studio::config;
use image_studio::display::PreviewRenderer;
use image_studio::imaging::{Operation, Quality, SUPPORTED_EXTENSIONS, SaveFormat};
use image_studio::shell::Shell;
use image_studio::store::ImageStore;
use image_studio::{batch, output};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "image-studio")]
#[command(about = "Image editor with undo/redo history")]
#[command(long_about = "\
Image editor with undo/redo history

Every edit is recorded, so any sequence of operations can be undone and
redone step by step, or reset back to the image as it was loaded.

Operations (for -x / --op, and as shell commands):

  grayscale                Convert to grayscale
  blur <1-50>              Gaussian blur
  edges                    Edge detection
  brightness <-100..100>   Add to every channel
  contrast <0.5-3.0>       Scale every channel
  rotate <90|180|270>      Rotate clockwise
  flip <horizontal|vertical>
  resize <W> <H>           Exact size (also resize=WxH)

Examples:

  image-studio edit photo.jpg
  image-studio apply photo.jpg -o out.png -x grayscale -x 'blur 3'
  image-studio batch shots/*.jpg --out-dir edited -x 'rotate 90'

Run 'image-studio gen-config' to generate a documented image-studio.toml.")]
#[command(version)]
struct Cli {
    /// Config file (default: image-studio.toml in the working directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive editing shell on stdin/stdout
    Edit {
        /// Image to open on start
        path: Option<PathBuf>,
        /// Keep a viewport-sized PNG preview of the current image at this path
        #[arg(long)]
        preview: Option<PathBuf>,
    },
    /// Apply operations to one image and save the result
    Apply {
        input: PathBuf,
        /// Output file; the format follows its extension
        #[arg(short, long)]
        output: PathBuf,
        /// Operation to apply, repeatable, applied in order
        #[arg(short = 'x', long = "op", value_name = "OP")]
        ops: Vec<Operation>,
    },
    /// Apply operations to many images in parallel
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Directory for the results (created if missing)
        #[arg(long)]
        out_dir: PathBuf,
        /// Output format (jpg, jpeg, png, bmp); defaults to each input's own
        #[arg(long)]
        format: Option<String>,
        /// Operation to apply, repeatable, applied in order
        #[arg(short = 'x', long = "op", value_name = "OP")]
        ops: Vec<Operation>,
    },
    /// Show image details
    Info {
        path: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock image-studio.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config;
    let load_config = || config::discover_config(config_path.as_deref(), Path::new("."));

    match cli.command {
        Command::Edit { path, preview } => {
            let config = load_config()?;
            let mut store = ImageStore::from_config(&config);
            if let Some(path) = &path {
                let info = store.load(path)?;
                println!("{}", output::format_status("Opened", &info));
            }
            let prompt = std::io::stdin().is_terminal();
            let viewport = (config.display.viewport[0], config.display.viewport[1]);
            let mut shell = Shell::new(store, config);
            if let Some(preview) = preview {
                shell = shell.with_display(PreviewRenderer::new(preview, viewport));
            }
            if prompt {
                shell = shell.with_prompt("> ");
            }
            shell.run(std::io::stdin().lock(), std::io::stdout().lock())?;
        }
        Command::Apply {
            input,
            output: dest,
            ops,
        } => {
            validate_ops(&ops)?;
            let config = load_config()?;
            let mut store = ImageStore::from_config(&config);
            store.load(&input)?;
            for op in &ops {
                store.apply_operation(op)?;
            }
            store.save_as(&dest)?;
            println!(
                "{}",
                output::format_status(&format!("Saved: {}", dest.display()), &store.info())
            );
        }
        Command::Batch {
            inputs,
            out_dir,
            format,
            ops,
        } => {
            validate_ops(&ops)?;
            let config = load_config()?;
            let format = format
                .map(|ext| {
                    SaveFormat::from_extension(&ext, Quality::new(config.save.jpeg_quality))
                        .ok_or_else(|| {
                            format!(
                                "unsupported output format: {ext} (expected one of: {})",
                                SUPPORTED_EXTENSIONS.join(", ")
                            )
                        })
                })
                .transpose()?;
            init_thread_pool(&config.processing);
            std::fs::create_dir_all(&out_dir)?;
            let outcomes = batch::run_batch(&inputs, &ops, &out_dir, format, &config);
            output::print_batch(&outcomes);
            let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
            if failed > 0 {
                return Err(format!("{failed} of {} files failed", outcomes.len()).into());
            }
        }
        Command::Info { path, json } => {
            let config = load_config()?;
            let mut store = ImageStore::from_config(&config);
            let info = store.load(&path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                output::print_info(&info);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Reject out-of-range parameters before any file is touched.
fn validate_ops(ops: &[Operation]) -> Result<(), String> {
    for op in ops {
        op.validate().map_err(|e| format!("{op}: {e}"))?;
    }
    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
