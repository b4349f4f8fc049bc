use argh::FromArgs;
use std::path::PathBuf;

use magic_glass::{
    imgproc::{color::ChannelMode, filter::EdgeFilter},
    io::functional as F,
    LensConfig, Session,
};

#[derive(FromArgs)]
/// Histogram, channel, edge and magic lens processing of image files
struct Args {
    /// path to a JSON lens configuration
    #[argh(option)]
    config: Option<PathBuf>,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Histogram(HistogramArgs),
    Channel(ChannelArgs),
    Edges(EdgesArgs),
    Lens(LensArgs),
}

#[derive(FromArgs)]
/// Render the per-channel histogram chart of an image
#[argh(subcommand, name = "histogram")]
struct HistogramArgs {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path of the chart to write (jpg or png)
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// print the bucket counts of an R,G,B value
    #[argh(option, from_str_fn(parse_rgb))]
    at: Option<[u8; 3]>,
}

#[derive(FromArgs)]
/// Apply a channel transform to the whole image
#[argh(subcommand, name = "channel")]
struct ChannelArgs {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path of the image to write
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// red, green, blue, average, luminance, threshold-all or threshold-individual
    #[argh(option, short = 'm')]
    mode: ChannelMode,

    /// threshold level (default: 128)
    #[argh(option, short = 'l', default = "128")]
    level: u8,
}

#[derive(FromArgs)]
/// Run an edge detector over the whole image
#[argh(subcommand, name = "edges")]
struct EdgesArgs {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path of the image to write
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// prewitt, sobel or log
    #[argh(option, short = 'f')]
    filter: EdgeFilter,

    /// zoom steps before filtering, negative to zoom out (default: 0)
    #[argh(option, default = "0")]
    zoom: i32,
}

#[derive(FromArgs)]
/// Apply a channel transform inside a disc only
#[argh(subcommand, name = "lens")]
struct LensArgs {
    /// path to an input image
    #[argh(option, short = 'i')]
    input: PathBuf,

    /// path of the image to write
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// transform shown inside the lens
    #[argh(option, short = 'm')]
    mode: ChannelMode,

    /// column of the lens center, in frame coordinates
    #[argh(option)]
    cx: i64,

    /// row of the lens center, in frame coordinates
    #[argh(option)]
    cy: i64,

    /// lens radius, clamped to the configured range
    #[argh(option, short = 'r')]
    radius: Option<u32>,

    /// threshold level (default: 128)
    #[argh(option, short = 'l', default = "128")]
    level: u8,

    /// edge filter shown outside the lens
    #[argh(option)]
    backdrop: Option<EdgeFilter>,

    /// zoom steps before compositing, negative to zoom out (default: 0)
    #[argh(option, default = "0")]
    zoom: i32,
}

fn parse_rgb(value: &str) -> Result<[u8; 3], String> {
    let parts = value
        .split(',')
        .map(|v| v.trim().parse::<u8>().map_err(|e| format!("{v}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [r, g, b] => Ok([*r, *g, *b]),
        _ => Err(format!("expected R,G,B, got '{value}'")),
    }
}

fn zoom(session: &mut Session, steps: i32) -> Result<(), Box<dyn std::error::Error>> {
    for _ in 0..steps.unsigned_abs() {
        let changed = if steps > 0 {
            session.zoom_in()?
        } else {
            session.zoom_out()?
        };
        if !changed {
            log::warn!("zoom limit reached at {:.3}", session.zoom());
            break;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => LensConfig::from_json_file(path)?,
        None => LensConfig::default(),
    };

    match args.command {
        Command::Histogram(cmd) => {
            let image = F::read_image_any_rgb8(&cmd.input)?;
            let session = Session::new(image, config)?;

            let chart = session.histogram_chart()?;
            F::write_image_any_rgb8_with_quality(
                &cmd.output,
                &chart,
                session.config().chart_quality,
            )?;
            log::info!("histogram chart written to {}", cmd.output.display());

            if let Some([r, g, b]) = cmd.at {
                let (cr, cg, cb) = session.histogram().lookup(r, g, b);
                println!("R {r}: {cr}  G {g}: {cg}  B {b}: {cb}");
            }
        }
        Command::Channel(cmd) => {
            let image = F::read_image_any_rgb8(&cmd.input)?;
            let mut session = Session::new(image, config)?;
            session.set_threshold_level(cmd.level)?;
            session.show_channel(cmd.mode)?;

            F::write_image_any_rgb8(&cmd.output, session.frame())?;
            log::info!("{} written to {}", cmd.mode, cmd.output.display());
        }
        Command::Edges(cmd) => {
            let image = F::read_image_any_rgb8(&cmd.input)?;
            let mut session = Session::new(image, config)?;
            zoom(&mut session, cmd.zoom)?;
            session.show_edges(cmd.filter)?;

            F::write_image_any_rgb8(&cmd.output, session.frame())?;
            log::info!(
                "{} edges at zoom {:.3} written to {}",
                cmd.filter,
                session.zoom(),
                cmd.output.display()
            );
        }
        Command::Lens(cmd) => {
            let image = F::read_image_any_rgb8(&cmd.input)?;
            let mut session = Session::new(image, config)?;
            zoom(&mut session, cmd.zoom)?;

            if let Some(filter) = cmd.backdrop {
                session.show_edges(filter)?;
            }
            if let Some(radius) = cmd.radius {
                session.set_radius(radius)?;
            }
            session.set_threshold_level(cmd.level)?;
            session.enable_lens()?;
            session.select_lens_mode(cmd.mode)?;

            match session.pointer_moved(cmd.cx, cmd.cy)? {
                Some(readout) => log::info!(
                    "lens at {:?}: rgb {:?}, histogram counts {:?}",
                    readout.position,
                    readout.rgb,
                    readout.counts
                ),
                None => log::warn!(
                    "lens center ({}, {}) is outside the {} frame",
                    cmd.cx,
                    cmd.cy,
                    session.frame_size()
                ),
            }

            F::write_image_any_rgb8(&cmd.output, session.frame())?;
            log::info!("lens frame written to {}", cmd.output.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rgb_values() {
        assert_eq!(parse_rgb("10,20,30"), Ok([10, 20, 30]));
        assert_eq!(parse_rgb(" 0, 255 ,7"), Ok([0, 255, 7]));
        assert!(parse_rgb("10,20").is_err());
        assert!(parse_rgb("10,20,300").is_err());
    }

    #[test]
    fn parse_lens_command() {
        let args = Args::from_args(
            &["magic-glass"],
            &[
                "lens", "-i", "in.png", "-o", "out.png", "-m", "threshold-all", "--cx", "5",
                "--cy", "12", "--backdrop", "sobel",
            ],
        );
        let Ok(Args {
            command: Command::Lens(cmd),
            config: None,
        }) = args
        else {
            panic!("lens command did not parse");
        };
        assert_eq!(cmd.mode, ChannelMode::ThresholdAll);
        assert_eq!((cmd.cx, cmd.cy), (5, 12));
        assert_eq!(cmd.backdrop, Some(EdgeFilter::Sobel));
        assert_eq!(cmd.level, 128);
        assert_eq!(cmd.radius, None);
    }
}
