use clap::{Parser, Subcommand};
use sentiero::build::{self, SitePaths};
use sentiero::serve;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sentiero")]
#[command(about = "Bilingual static site generator for a mountain village")]
#[command(long_about = "\
Bilingual static site generator for a mountain village

TOML descriptors are the data source. Italian pages land at the output root,
English pages under en/; the two locale dictionaries in every descriptor must
be structurally identical or the build fails.

Content structure:

  content/
  ├── index.toml               # Site-wide copy: shared assets + [it]/[en] text
  ├── events.toml              # Seasonal events (toggle + per-locale lists)
  ├── galleries.toml           # Site gallery index with attribution
  └── itineraries/             # One file per route
      └── lago-nero.toml       # Metrics overwritten from its GPX track

  static/
  ├── css/ js/ img/            # Copied to the output verbatim
  ├── gpx/                     # Track downloads, analyzed at build time
  ├── thumbs/                  # Derived thumbnails (managed, mtime-cached)
  └── webcam/                  # current.jpg + timestamped archive

Routes without a GPX track are skipped on every listing and get no detail
page. Thumbnails regenerate only when the source image is newer.")]
#[command(version)]
struct Cli {
    /// Content directory (TOML descriptors)
    #[arg(long, default_value = "content", global = true)]
    content: PathBuf,

    /// Static assets directory
    #[arg(long, default_value = "static", global = true)]
    static_dir: PathBuf,

    /// Output directory
    #[arg(long, default_value = "output", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the full site for both locales (the default)
    Build,
    /// Build, then watch for changes and serve the output locally
    Serve {
        /// Port for the preview server
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Publish a webcam frame: install current.jpg, archive a timestamped
    /// copy, and refresh the published webcam pages
    UpdateWebcam {
        /// Path to the new frame (JPEG)
        image: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let paths = SitePaths {
        content: cli.content,
        static_dir: cli.static_dir,
        output: cli.output,
    };

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => build::build(&paths)?,
        Command::Serve { port } => serve::run(paths, port)?,
        Command::UpdateWebcam { image } => build::update_webcam(&paths, &image)?,
    }

    Ok(())
}
