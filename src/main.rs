use clap::{Parser, Subcommand};
use shoebox::imaging::RustBackend;
use shoebox::pipeline::{self, BuildOptions};
use shoebox::{config, output, scan};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shoebox")]
#[command(about = "Static photo gallery generator")]
#[command(long_about = "\
Static photo gallery generator

Every directory under the images root that holds JPEG or PNG files becomes
a gallery. Each image gets a thumbnail, an upright display copy, and its own
page with previous/next navigation.

Source layout and the site it produces:

  images/                      public/
  ├── config.toml              ├── index.html
  ├── Trip/                    ├── Trip/
  │   ├── beach.jpg            │   ├── index.html
  │   └── dunes.png            │   ├── beach.html, beach.jpg
  └── 2019/Winter/             │   └── dunes.html, dunes.jpg
      └── snow.jpg             ├── 2019/Winter/...
                               ├── thumbs/Trip/beach.png, ...
  css/style.css          ───►  └── css/style.css

Outputs that already exist are left alone; pass --regenerate to rewrite them.

Run 'shoebox gen-config' to print a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Images root
    #[arg(long, default_value = "images", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Stylesheet directory copied to <output>/css
    #[arg(long, default_value = "css", global = true)]
    assets: PathBuf,

    /// Config file [default: <source>/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: scan → thumbnails → pages → assets
    Build {
        /// Regenerate pages only, leaving images untouched
        #[arg(long)]
        pages: bool,
        /// Rewrite every thumbnail and display image
        #[arg(long)]
        regenerate: bool,
    },
    /// Print the galleries found under the images root
    Scan {
        /// Emit JSON instead of the text listing
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Build { pages, regenerate } => {
            let options = BuildOptions {
                source: cli.source,
                output: cli.output,
                assets: Some(cli.assets),
                config: cli.config,
                pages_only: pages,
                force: regenerate,
            };
            let site_config = pipeline::load_config(&options)?;
            init_thread_pool(&site_config.processing);

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = pipeline::build(&RustBackend::new(), &site_config, &options, Some(tx));
            printer.join().map_err(|_| "progress printer panicked")?;

            let report = result?;
            output::print_build_summary(&report, options.pages_only);
            println!("==> Build complete: {}", options.output.display());
        }
        Command::Scan { json } => {
            let outcome = scan::scan(&cli.source)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.galleries)?);
            } else {
                output::print_scan_output(&outcome.galleries, &cli.source);
            }
            if let Some(e) = outcome.interrupted {
                return Err(e.into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Send diagnostics to stderr, filtered by `RUST_LOG` when it is set.
fn init_logging(verbose: bool) {
    let default = if verbose { "shoebox=debug" } else { "shoebox=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
