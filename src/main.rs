use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, debug};

use whitespots::{AnalyzerConfig, AreaConvention, Connectivity, CoverageAnalyzer, Threshold};

#[derive(Parser)]
#[command(name = "whitespots")]
#[command(about = "Measure how much of an image is covered by white spots")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Brightness threshold (0-255) [default: 200]
    #[arg(short, long, allow_negative_numbers = true)]
    threshold: Option<i64>,

    /// Pixel neighbourhood used to join bright pixels [default: eight]
    #[arg(long, value_enum)]
    connectivity: Option<Connectivity>,

    /// How region area is measured [default: pixels]
    #[arg(long, value_enum)]
    area: Option<AreaConvention>,

    /// Directory for the output images
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Do not write output images
    #[arg(long)]
    no_save: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// JSON file with analyzer settings; flags override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => AnalyzerConfig::from_json_file(path)?,
        None => AnalyzerConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        config.threshold = Threshold::try_from(threshold)?;
    }
    if let Some(connectivity) = args.connectivity {
        config.connectivity = connectivity;
    }
    if let Some(area) = args.area {
        config.area = area;
    }
    debug!(?config, "Resolved configuration");

    let analyzer = CoverageAnalyzer::new(config);
    let (img, analysis) = analyzer.analyze_path(&args.image_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis.result)?);
    } else {
        println!("{}", analysis.result);
    }

    if !args.no_save {
        whitespots::save_outputs(&img, &analysis, &args.output_dir)?;
    }

    Ok(())
}
