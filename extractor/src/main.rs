use clap::Parser;
use icon_extractor::source::DEFAULT_ICON_SIZE;
use icon_extractor::{
    output_path, IconSourceRequest, Pipeline, PlatformAbstraction, PngFileWriter, ResizeSpec,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// CLI to extract the icon of a file as a transparent PNG.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to extract the image from (executable, shortcut or .ico)
    #[arg(long, value_name = "PATH")]
    file: PathBuf,

    /// Directory to save the extracted image to
    #[arg(long, value_name = "DIR")]
    output: PathBuf,

    /// Alternative name for the extracted image, defaults to the input file name
    #[arg(long, value_name = "NAME")]
    filename: Option<String>,

    /// Resolution to pick from .ico files
    #[arg(long, value_name = "PX", default_value_t = DEFAULT_ICON_SIZE,
          value_parser = clap::value_parser!(u32).range(1..=256))]
    size: u32,

    /// New size for the extracted image, defaults to the original size
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    resize: Option<u32>,

    /// Prefer an .ico file next to the (resolved) input
    #[arg(long)]
    search_icon: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Set up logging using tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::debug!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    let pal = match PlatformAbstraction::new() {
        Ok(v) => v,
        Err(err) => {
            tracing::error!("Failed to create platform abstraction layer: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let request = IconSourceRequest {
        file_path: args.file.clone(),
        desired_size: args.size,
        // The parser already rejects zero
        resize: args.resize.and_then(ResizeSpec::new),
        search_sibling_icon: args.search_icon,
    };
    let output = output_path(&args.output, &args.file, args.filename.as_deref());

    match Pipeline::new(&pal, &pal, &PngFileWriter).run(&request, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Failed to extract icon from {}: {}", args.file.display(), err);
            ExitCode::FAILURE
        }
    }
}
