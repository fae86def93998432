//! Seat Plan command-line host.
//!
//! Reads a scoring result JSON, prints zones, exports the SVG surface and
//! keeps the layout preference in a JSON file.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use seat_core::layout::Viewport;
use seat_core::model::{CustomObject, LayoutFormat, ScoringResult};
use seat_core::preference::{FileStore, LayoutPreference};
use seat_editor::session::{LayoutSession, SessionOptions};
use seat_render::svg::SvgTheme;

#[derive(Parser, Debug)]
#[command(name = "seat-cli", version)]
struct Cli {
    /// Preference file.
    #[arg(long, global = true, default_value = ".seat-plan/preferences.json")]
    store: PathBuf,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the zones of a format.
    Zones(ZonesArgs),
    /// Export the seating surface as SVG.
    Render(RenderArgs),
    /// Save the preferred format, or print it when no format is given.
    Prefer {
        /// Format tag, e.g. `mesa_u`.
        format: Option<LayoutFormat>,
    },
}

#[derive(Parser, Debug)]
struct ZonesArgs {
    /// Input scoring result JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Format to partition for. Defaults to the stored preference, then
    /// the suggested format.
    #[arg(long)]
    format: Option<LayoutFormat>,

    /// Surface width in pixels (theater columns).
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Print zones as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scoring result JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long)]
    format: Option<LayoutFormat>,

    /// Canvas objects JSON for the custom format.
    #[arg(long)]
    objects: Option<PathBuf>,

    #[arg(long, default_value_t = 1.0)]
    zoom: f32,

    /// Dim everyone outside this segment.
    #[arg(long, default_value = "")]
    segment: String,

    /// Dim everyone below this score.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    min_score: u8,

    #[arg(long, default_value_t = 800.0)]
    width: f32,

    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Show everyone regardless of the filter.
    #[arg(long)]
    read_only: bool,

    #[arg(long)]
    dark: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let store = FileStore::new(&cli.store);
    match cli.cmd {
        Command::Zones(args) => cmd_zones(args, store),
        Command::Render(args) => cmd_render(args, store),
        Command::Prefer { format } => cmd_prefer(format, store),
    }
}

fn read_result_json(path: &Path) -> anyhow::Result<ScoringResult> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read scoring result '{}'", path.display()))?;
    ScoringResult::from_json(&text).with_context(|| "parse scoring result JSON")
}

fn read_objects_json(path: &Path) -> anyhow::Result<Vec<CustomObject>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read objects '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| "parse objects JSON")
}

/// A format given on the command line acts as a forced format: it wins
/// over the stored preference and is never written back.
fn open_session(
    in_path: &Path,
    format: Option<LayoutFormat>,
    store: FileStore,
    viewport: Viewport,
    read_only: bool,
) -> anyhow::Result<LayoutSession<FileStore>> {
    let result = read_result_json(in_path)?;
    Ok(LayoutSession::new(
        result,
        store,
        SessionOptions {
            forced_format: format,
            read_only,
            viewport,
        },
    ))
}

fn cmd_zones(args: ZonesArgs, store: FileStore) -> anyhow::Result<()> {
    let viewport = Viewport {
        width: args.width,
        ..Viewport::default()
    };
    let session = open_session(&args.in_path, args.format, store, viewport, true)?;
    let partition = session.partition();
    let zones = partition.zones();

    if args.json {
        println!("{}", serde_json::to_string_pretty(zones.as_slice())?);
    } else {
        print!("{}", describe_zones(&session));
    }
    Ok(())
}

fn describe_zones(session: &LayoutSession<FileStore>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} seats)", session.format().label(), session.roster().len());
    if session.format() == LayoutFormat::Custom {
        out.push_str("  seats come from canvas objects\n");
        return out;
    }
    for zone in session.partition().zones() {
        let names: Vec<&str> = zone
            .seats
            .clone()
            .filter_map(|slot| session.participant(slot))
            .map(|p| p.name.as_str())
            .collect();
        let _ = writeln!(
            out,
            "  {:<8} {:>3}  {}",
            zone.kind.to_string(),
            zone.len(),
            names.join(", ")
        );
    }
    out
}

fn cmd_render(args: RenderArgs, store: FileStore) -> anyhow::Result<()> {
    let viewport = Viewport {
        width: args.width,
        height: args.height,
    };
    let mut session = open_session(&args.in_path, args.format, store, viewport, args.read_only)?;
    if let Some(path) = &args.objects {
        session.load_objects(read_objects_json(path)?);
    }
    session.set_zoom(args.zoom);
    session.set_segment(args.segment);
    session.set_min_score(args.min_score);
    if args.dark {
        session.set_theme(SvgTheme::dark());
    }

    let svg = session.capture_svg().with_context(|| "capture seating surface")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    fs::write(&args.out, svg).with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {} ({})", args.out.display(), session.format());
    Ok(())
}

fn cmd_prefer(format: Option<LayoutFormat>, store: FileStore) -> anyhow::Result<()> {
    let path = store.path().to_path_buf();
    let mut preference = LayoutPreference::new(store);
    match format {
        Some(format) => {
            preference
                .save(format)
                .with_context(|| format!("save preference to '{}'", path.display()))?;
            eprintln!("preferred format: {format}");
        }
        None => match preference.stored() {
            Some(format) => println!("{format}"),
            None => eprintln!("no stored preference in '{}'", path.display()),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session(format: LayoutFormat) -> LayoutSession<FileStore> {
        let result = ScoringResult::from_json(
            r#"{
                "participants": [
                    { "id": "a", "name": "Ana" },
                    { "id": "b", "name": "Bia" },
                    { "id": "c", "name": "Caio" },
                    { "id": "d", "name": "Duda" },
                    { "id": "e", "name": "Enzo" }
                ]
            }"#,
        )
        .unwrap();
        LayoutSession::new(
            result,
            FileStore::new(std::env::temp_dir().join("seat-cli-unused.json")),
            SessionOptions {
                forced_format: Some(format),
                ..SessionOptions::default()
            },
        )
    }

    #[test]
    fn describes_u_table_sides() {
        let text = describe_zones(&session(LayoutFormat::MesaU));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].trim_start().starts_with("left"));
        assert!(lines[1].ends_with("Ana"));
        assert!(lines[2].ends_with("Bia, Caio, Duda"));
        assert!(lines[3].ends_with("Enzo"));
    }

    #[test]
    fn custom_has_no_zones() {
        let text = describe_zones(&session(LayoutFormat::Custom));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn cli_parses_render_flags() {
        let cli = Cli::try_parse_from([
            "seat-cli",
            "render",
            "--in",
            "r.json",
            "--out",
            "plan.svg",
            "--format",
            "mesa_o",
            "--zoom",
            "1.5",
            "--min-score",
            "60",
        ])
        .unwrap();
        let Command::Render(args) = cli.cmd else {
            panic!("expected render");
        };
        assert_eq!(args.format, Some(LayoutFormat::MesaO));
        assert_eq!(args.min_score, 60);
        assert!(Cli::try_parse_from(["seat-cli", "prefer", "round"]).is_err());
    }
}
