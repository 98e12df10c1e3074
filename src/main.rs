//! classroom-screenshot: capture the primary display once and save it
//!
//! Thin command-line front end over the library, mostly useful to check a
//! machine's capture setup before the monitor loop is deployed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use classroom_screenshot::{
    ScreenShot,
    model::{CaptureConfig, ImageFormat},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "classroom-screenshot")]
#[command(about = "Capture the primary display and save it as JPEG or PNG")]
struct Cli {
    /// Output file path; its suffix (.jpg or .png) picks the format
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Directory for a timestamped file name when --out is not given
    #[arg(long, default_value = ".")]
    dir: PathBuf,
    /// JSON file with format, quality and scale
    #[arg(long)]
    config: Option<PathBuf>,
    /// Image format (jpg, png)
    #[arg(long)]
    format: Option<String>,
    /// JPEG quality (0.0-1.0)
    #[arg(long)]
    quality: Option<f32>,
    /// Scale factor (> 0)
    #[arg(long)]
    scale: Option<f64>,
}

/// Picks the output format from `--out` and `--format`
///
/// The two must agree when both are given, so the saved bytes always match
/// the file suffix.
fn resolve_format(out: Option<&Path>, format: Option<&str>) -> Result<Option<ImageFormat>> {
    let from_suffix = out
        .map(|path| ScreenShot::check_suffix(&path.to_string_lossy()))
        .transpose()?;
    let from_flag = format.map(str::parse::<ImageFormat>).transpose()?;

    match (from_suffix, from_flag) {
        (Some(suffix), Some(flag)) if suffix != flag => {
            bail!("--format {flag} conflicts with the .{suffix} suffix of --out")
        }
        (suffix, flag) => Ok(flag.or(suffix)),
    }
}

fn main() -> Result<()> {
    // Respects RUST_LOG; default level: info
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("classroom_screenshot=info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CaptureConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CaptureConfig::default(),
    };
    let mut shot = ScreenShot::from_config(config);

    if let Some(format) = resolve_format(cli.out.as_deref(), cli.format.as_deref())? {
        shot.set_format(format);
    }
    if let Some(quality) = cli.quality {
        shot.set_quality(quality);
    }
    if let Some(scale) = cli.scale {
        shot.set_scale(scale);
    }
    shot.config().validate().context("invalid capture settings")?;
    info!("Capture settings: {:?}", shot.config());

    let encoded = shot.try_capture().context("screen capture failed")?;
    let path = cli
        .out
        .unwrap_or_else(|| cli.dir.join(shot.file_name("screenshot")));
    shot.try_save(&encoded.bytes, &path)
        .with_context(|| format!("failed to save {}", path.display()))?;

    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_suffix() {
        let format = resolve_format(Some(Path::new("out/shot.PNG")), None).unwrap();
        assert_eq!(format, Some(ImageFormat::Png));
    }

    #[test]
    fn test_format_from_flag() {
        assert_eq!(resolve_format(None, Some("JPG")).unwrap(), Some(ImageFormat::Jpg));
        assert_eq!(resolve_format(None, None).unwrap(), None);
    }

    #[test]
    fn test_matching_suffix_and_flag() {
        let format = resolve_format(Some(Path::new("shot.jpg")), Some("jpg")).unwrap();
        assert_eq!(format, Some(ImageFormat::Jpg));
    }

    #[test]
    fn test_conflicting_suffix_and_flag() {
        let err = resolve_format(Some(Path::new("shot.png")), Some("jpg")).unwrap_err();
        assert!(err.to_string().contains("conflicts"));
    }

    #[test]
    fn test_bad_inputs() {
        assert!(resolve_format(Some(Path::new("shot.bmp")), None).is_err());
        assert!(resolve_format(None, Some("gif")).is_err());
    }
}
