//! Command-line front end: put a hat on a photo file and save the PNG.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;

use hat_editor::{EditorConfig, HatSource, ImageEditor, PointPx, Result, SelectedFile};

#[derive(Parser, Debug)]
#[command(name = "hat-editor", version, about = "Put a hat on a photo")]
struct Args {
    /// Photo to edit
    input: PathBuf,

    /// Where to write the PNG (defaults to the configured export file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hat size in percent
    #[arg(long)]
    size: Option<f32>,

    /// Hat rotation in degrees
    #[arg(long, allow_hyphen_values = true)]
    rotation: Option<f32>,

    /// Hat center in canvas pixels, as X,Y
    #[arg(long, value_parser = parse_point)]
    at: Option<PointPx>,

    /// Custom hat artwork (.svg, or any raster format)
    #[arg(long)]
    hat: Option<PathBuf>,

    /// Use an emoji as the hat
    #[cfg(feature = "twemoji")]
    #[arg(long)]
    emoji: Option<String>,

    /// Editor configuration as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Export the fitted photo without a hat
    #[arg(long)]
    no_hat: bool,
}

fn parse_point(s: &str) -> std::result::Result<PointPx, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{s}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok(PointPx::new(x, y))
}

fn hat_source(path: &Path) -> Result<HatSource> {
    let is_svg = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        Ok(HatSource::Svg(std::fs::read_to_string(path)?))
    } else {
        Ok(HatSource::Raster(std::fs::read(path)?))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EditorConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EditorConfig::default(),
    };

    let name = args
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file = SelectedFile::new(name, "", std::fs::read(&args.input)?);
    let mut editor = ImageEditor::open(&file, config)?;

    if !args.no_hat {
        if let Some(path) = &args.hat {
            editor.set_hat_source(hat_source(path)?)?;
        }
        #[cfg(feature = "twemoji")]
        if let Some(emoji) = &args.emoji {
            let source = HatSource::from_emoji(emoji)
                .ok_or_else(|| hat_editor::EditorError::UnsupportedEmoji(emoji.clone()))?;
            editor.set_hat_source(source)?;
        }

        if let Some(notice) = editor.add_hat()? {
            info!("{notice}");
        }
        if let Some(point) = args.at {
            editor.move_hat_to(point);
        }
        if let Some(size) = args.size {
            editor.set_hat_size(size);
        }
        if let Some(rotation) = args.rotation {
            editor.set_hat_rotation(rotation);
        }
    }

    let (export, notice) = editor.download()?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&export.file_name));
    export.save(&output)?;
    info!(path = %output.display(), bytes = export.png.len(), "{notice}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_point() {
        assert_eq!(parse_point("400, 200").unwrap(), PointPx::new(400.0, 200.0));
        assert!(parse_point("400").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::try_parse_from([
            "hat-editor",
            "me.jpg",
            "--size",
            "150",
            "--rotation",
            "-30",
            "--at",
            "100,80",
        ])
        .unwrap();
        assert_eq!(args.size, Some(150.0));
        assert_eq!(args.rotation, Some(-30.0));
        assert_eq!(args.at, Some(PointPx::new(100.0, 80.0)));
        assert!(!args.no_hat);
    }
}
