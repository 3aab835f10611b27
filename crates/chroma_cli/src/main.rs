mod storage;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chroma_render::{AdjustmentSpec, ColorPipeline, HistogramPlotter, PlotOptions};
use clap::{Parser, Subcommand};
use image::DynamicImage;
use log::{debug, info};

use storage::{ArtifactStore, UploadName};

#[derive(Parser, Debug)]
#[command(author, version, about = "Scale RGB channel intensity and plot color histograms")]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Adjust channel intensities and write both images with their histogram plots
    Adjust(AdjustArgs),
    /// Plot the color histogram of a single image
    Histogram(HistogramArgs),
}

#[derive(Parser, Debug)]
struct AdjustArgs {
    /// Input image path (png, jpg, jpeg or gif)
    input: PathBuf,
    /// Root directory receiving `uploads/` and `processed/`
    #[arg(long, env = "CHROMA_OUT_DIR", default_value = "static")]
    out_dir: PathBuf,
    #[command(flatten)]
    factors: FactorSettings,
    #[command(flatten)]
    plot: PlotSettings,
}

#[derive(Parser, Debug)]
struct HistogramArgs {
    /// Input image path
    input: PathBuf,
    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,
    #[command(flatten)]
    plot: PlotSettings,
}

#[derive(Parser, Debug, Clone)]
struct FactorSettings {
    /// Red channel multiplier
    #[arg(long, value_parser = parse_factor)]
    red: Option<f64>,
    /// Green channel multiplier
    #[arg(long, value_parser = parse_factor)]
    green: Option<f64>,
    /// Blue channel multiplier
    #[arg(long, value_parser = parse_factor)]
    blue: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
struct PlotSettings {
    /// Histogram plot width in pixels
    #[arg(long, default_value_t = 640)]
    plot_width: u32,
    /// Histogram plot height in pixels
    #[arg(long, default_value_t = 480)]
    plot_height: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Adjust(args) => adjust(args),
        Commands::Histogram(args) => histogram(args),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn adjust(args: AdjustArgs) -> Result<()> {
    let name = UploadName::from_path(&args.input)?;
    let store = ArtifactStore::new(&args.out_dir);
    store.prepare()?;
    let paths = store.paths(&name);

    fs::copy(&args.input, &paths.original)
        .with_context(|| format!("failed to store {:?} as {:?}", args.input, paths.original))?;

    let image = load_rgb(&paths.original)?;
    let factors = args.factors.to_spec();
    info!("adjusting {:?} (id {}) with {:?}", args.input, name.id(), factors);

    let output = ColorPipeline::new(args.plot.to_options())
        .process(&image, &factors)
        .with_context(|| format!("failed to process {:?}", args.input))?;

    output
        .adjusted
        .save(&paths.adjusted)
        .with_context(|| format!("failed to write {:?}", paths.adjusted))?;
    write_file(&paths.original_plot, output.original_plot.png_bytes())?;
    write_file(&paths.adjusted_plot, output.adjusted_plot.png_bytes())?;

    println!("original image:     {}", paths.original.display());
    println!("adjusted image:     {}", paths.adjusted.display());
    println!("original histogram: {}", paths.original_plot.display());
    println!("adjusted histogram: {}", paths.adjusted_plot.display());
    Ok(())
}

fn histogram(args: HistogramArgs) -> Result<()> {
    let image = load_rgb(&args.input)?;
    let artifact = HistogramPlotter::new(args.plot.to_options())
        .plot(&image)
        .with_context(|| format!("failed to plot {:?}", args.input))?;
    write_file(&args.output, artifact.png_bytes())?;
    println!("{}", args.output.display());
    Ok(())
}

/// Decodes `path` and drops any alpha or extra precision so the core sees RGB8.
fn load_rgb(path: &Path) -> Result<DynamicImage> {
    let image = image::open(path).with_context(|| format!("failed to open image {:?}", path))?;
    debug!("decoded {:?} as {:?}", path, image.color());
    Ok(DynamicImage::ImageRgb8(image.into_rgb8()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("failed to write {:?}", path))
}

fn parse_factor(value: &str) -> Result<f64, String> {
    let factor: f64 = value.trim().parse().map_err(|_| format!("{value:?} is not a number"))?;
    if !factor.is_finite() {
        return Err(format!("{value:?} is not a finite number"));
    }
    Ok(factor)
}

impl FactorSettings {
    fn to_spec(&self) -> AdjustmentSpec {
        AdjustmentSpec::from_factors(self.red, self.green, self.blue)
    }
}

impl PlotSettings {
    fn to_options(&self) -> PlotOptions {
        let mut options = PlotOptions::default();
        options.width = self.plot_width;
        options.height = self.plot_height;
        options
    }
}

#[cfg(test)]
mod tests {
    use chroma_render::Channel;
    use image::{ImageFormat, Rgb, RgbImage, RgbaImage};

    use super::*;

    #[test]
    fn factor_parsing_rejects_non_finite() {
        assert_eq!(parse_factor("2.5"), Ok(2.5));
        assert_eq!(parse_factor(" 0 "), Ok(0.0));
        assert_eq!(parse_factor("-1"), Ok(-1.0));
        assert!(parse_factor("NaN").is_err());
        assert!(parse_factor("inf").is_err());
        assert!(parse_factor("bright").is_err());
    }

    #[test]
    fn unit_factors_are_inactive() {
        let cli =
            Cli::try_parse_from(["chroma", "adjust", "in.png", "--red", "1.0", "--blue", "0.5"])
                .unwrap();
        let Commands::Adjust(args) = cli.command else { panic!("expected adjust") };
        let spec = args.factors.to_spec();
        assert_eq!(spec.factor(Channel::Red), None);
        assert_eq!(spec.factor(Channel::Blue), Some(0.5));
        assert_eq!(args.out_dir, PathBuf::from("static"));
    }

    #[test]
    fn plot_settings_map_onto_options() {
        let cli = Cli::try_parse_from([
            "chroma",
            "histogram",
            "in.png",
            "-o",
            "out.png",
            "--plot-width",
            "320",
        ])
        .unwrap();
        let Commands::Histogram(args) = cli.command else { panic!("expected histogram") };
        let options = args.plot.to_options();
        assert_eq!((options.width, options.height), (320, 480));
        assert_eq!(options.title, "Color Distribution");
    }

    #[test]
    fn adjust_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("sample photo.png");
        RgbImage::from_pixel(4, 3, Rgb([100, 150, 200])).save(&input).unwrap();
        let out_dir = dir.path().join("static");

        adjust(AdjustArgs {
            input,
            out_dir: out_dir.clone(),
            factors: FactorSettings { red: Some(2.0), green: None, blue: Some(1.0) },
            plot: PlotSettings { plot_width: 320, plot_height: 240 },
        })
        .unwrap();

        let processed: Vec<PathBuf> = fs::read_dir(out_dir.join("processed"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(processed.len(), 3);
        assert_eq!(fs::read_dir(out_dir.join("uploads")).unwrap().count(), 1);

        let adjusted = processed
            .iter()
            .find(|path| path.to_string_lossy().contains("sample_photo_adjusted_"))
            .unwrap();
        let adjusted = image::open(adjusted).unwrap().into_rgb8();
        assert!(adjusted.pixels().all(|p| p == &Rgb([200, 150, 200])));

        for plot in processed.iter().filter(|path| path.to_string_lossy().contains("hist_")) {
            let bytes = fs::read(plot).unwrap();
            assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
        }
    }

    #[test]
    fn adjust_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.bmp");
        fs::write(&input, b"not an image").unwrap();

        let result = adjust(AdjustArgs {
            input,
            out_dir: dir.path().join("static"),
            factors: FactorSettings { red: None, green: None, blue: None },
            plot: PlotSettings { plot_width: 640, plot_height: 480 },
        });
        assert!(result.is_err());
    }

    #[test]
    fn alpha_is_dropped_at_the_boundary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("alpha.png");
        RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 0])).save(&input).unwrap();

        let image = load_rgb(&input).unwrap();
        assert_eq!(image.as_rgb8().unwrap().get_pixel(0, 0), &Rgb([10, 20, 30]));
    }
}
