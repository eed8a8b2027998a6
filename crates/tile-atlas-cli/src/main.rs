use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use image::{ImageFormat, ImageReader};
use serde::Deserialize;
use tile_atlas_core::{
    BuildConfig, NormalizePolicy, SourceTile, build_atlas, to_json_layout, to_tres,
};
use tracing::{error, info, warn};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "tile-atlas",
    about = "Build a fixed-grid spritesheet and TileSet descriptor from a folder of tiles",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the atlas image and TileSet descriptor
    Build(BuildArgs),
    /// Compute the layout and print stats without writing any files
    Plan(BuildArgs),
}

#[derive(Parser, Debug, Clone)]
struct BuildArgs {
    // Input/Output
    /// Source directory of tile images
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory (default: <input parent>/atlas)
    #[arg(short, long, help_heading = "Input/Output")]
    out_dir: Option<PathBuf>,
    /// Atlas image filename (also excluded from the input scan)
    #[arg(long, default_value = "tiles_spritesheet.png", help_heading = "Input/Output")]
    atlas_name: String,
    /// Descriptor filename
    #[arg(long, default_value = "tileset_generated.tres", help_heading = "Input/Output")]
    descriptor_name: String,
    /// Engine resource prefix for the texture path in the descriptor
    #[arg(long, default_value = "res://", help_heading = "Input/Output")]
    resource_prefix: String,
    /// YAML config file path (overrides grid/policy options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Grid/Policy
    /// Number of grid columns
    #[arg(long, default_value_t = 16, help_heading = "Grid/Policy")]
    columns: u32,
    /// Normalization policy: pad | split
    #[arg(long, value_parser = ["pad", "split"], default_value = "pad", help_heading = "Grid/Policy")]
    policy: String,
    /// Cell edge length in pixels (split policy only)
    #[arg(long, default_value_t = 70, help_heading = "Grid/Policy")]
    cell_size: u32,

    // Export
    /// Export the layout (JSON position map) to this file
    #[arg(long, help_heading = "Export")]
    export_layout: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Build(args) => run_build(args, cli.progress && !cli.quiet),
        Commands::Plan(args) => {
            let mut a = args.clone();
            a.dry_run = true;
            run_build(&a, false)
        }
    }
}

fn run_build(cli: &BuildArgs, show_progress: bool) -> anyhow::Result<()> {
    let policy: NormalizePolicy = cli
        .policy
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown policy: {}", cli.policy))?;

    // Config file (if any) overrides grid/policy flags en bloc.
    let cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_build_config(BuildConfig {
            columns: cli.columns,
            policy,
            cell_size: cli.cell_size,
        })
    } else {
        BuildConfig {
            columns: cli.columns,
            policy,
            cell_size: cli.cell_size,
        }
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_tile_paths(&cli.input, &cli.atlas_name, &cli.include, &cli.exclude)?;
    let tiles = load_tiles_with_progress(&paths, show_progress)?;
    info!(count = tiles.len(), "loaded source tiles");
    if tiles.is_empty() {
        anyhow::bail!(
            "no tiles could be loaded from {}; nothing to build",
            cli.input.display()
        );
    }

    let out = build_atlas(tiles, &cfg)?;
    info!("{}", out.stats.summary());

    let out_dir = match &cli.out_dir {
        Some(d) => d.clone(),
        None => cli
            .input
            .parent()
            .unwrap_or(Path::new("."))
            .join("atlas"),
    };
    let atlas_path = out_dir.join(&cli.atlas_name);
    let descriptor_path = out_dir.join(&cli.descriptor_name);
    let texture_path = format!(
        "{}{}",
        ensure_trailing_slash(&cli.resource_prefix),
        cli.atlas_name
    );
    let descriptor = to_tres(&texture_path, &out.layout);

    if cli.dry_run {
        println!("{}", out.stats.summary());
        println!(
            "would write {} and {}",
            atlas_path.display(),
            descriptor_path.display()
        );
        return Ok(());
    }

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("create out_dir {}", out_dir.display()))?;

    // Encode the atlas up front so a codec failure leaves nothing on disk.
    let mut png = Vec::new();
    out.rgba
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .with_context(|| format!("encode {}", atlas_path.display()))?;

    // Stage both artifacts to temp paths, then rename into place. A crash
    // before the renames leaves only temp files, never a half-updated pair.
    let atlas_tmp = tmp_path(&atlas_path);
    let descriptor_tmp = tmp_path(&descriptor_path);
    fs::write(&atlas_tmp, &png).with_context(|| format!("write {}", atlas_tmp.display()))?;
    fs::write(&descriptor_tmp, &descriptor)
        .with_context(|| format!("write {}", descriptor_tmp.display()))?;
    fs::rename(&atlas_tmp, &atlas_path)
        .with_context(|| format!("commit {}", atlas_path.display()))?;
    if let Err(e) = fs::rename(&descriptor_tmp, &descriptor_path) {
        // The atlas is already committed; flag the mismatch loudly.
        warn!(
            atlas = %atlas_path.display(),
            "atlas written but descriptor commit failed; artifacts are out of sync"
        );
        return Err(e).with_context(|| format!("commit {}", descriptor_path.display()));
    }
    info!(?atlas_path, "wrote atlas");
    info!(?descriptor_path, cells = out.layout.placements.len(), "wrote descriptor");

    if let Some(layout_path) = &cli.export_layout {
        let json = serde_json::to_string_pretty(&to_json_layout(&out.layout))?;
        fs::write(layout_path, json)
            .with_context(|| format!("write {}", layout_path.display()))?;
        info!(?layout_path, "layout exported");
    }
    Ok(())
}

fn ensure_trailing_slash(prefix: &str) -> String {
    if prefix.ends_with('/') {
        prefix.to_string()
    } else {
        format!("{prefix}/")
    }
}

fn tmp_path(p: &Path) -> PathBuf {
    let name = p
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("artifact");
    p.with_file_name(format!(".{name}.tmp"))
}

/// Enumerate candidate tile files: one directory level, sorted by file name
/// for reproducible grid placement. The configured atlas filename and engine
/// import sidecars are never candidates.
fn gather_tile_paths(
    dir: &Path,
    atlas_name: &str,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let p = entry.path();
        if !p.is_file() {
            continue;
        }
        let fname = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if fname == atlas_name || fname.ends_with(".import") {
            continue;
        }
        if !is_image(p) || should_skip(p, inc_set.as_ref(), exc_set.as_ref()) {
            continue;
        }
        list.push(p.to_path_buf());
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "bmp" | "tga" | "webp")
    )
}

/// Decode each candidate as RGBA. A file that fails to decode is logged and
/// skipped; a single bad file never aborts the run.
fn load_tiles_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<SourceTile>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} loading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap(),
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let name = p
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("tile")
            .to_string();
        if let Some(b) = &bar {
            b.set_message(name.clone());
        }
        match ImageReader::open(p)
            .map_err(anyhow::Error::from)
            .and_then(|r| Ok(r.with_guessed_format()?.decode()?))
        {
            Ok(img) => {
                let rgba = img.to_rgba8();
                info!(name = %name, width = rgba.width(), height = rgba.height(), "loaded tile");
                list.push(SourceTile::new(name, rgba));
            }
            Err(e) => {
                error!(?p, error = %e, "skip tile");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    columns: Option<u32>,
    policy: Option<String>,
    cell_size: Option<u32>,
}

impl YamlConfig {
    fn into_build_config(self, mut cfg: BuildConfig) -> BuildConfig {
        if let Some(v) = self.columns {
            cfg.columns = v;
        }
        if let Some(v) = self.policy {
            cfg.policy = v.parse().unwrap_or(cfg.policy);
        }
        if let Some(v) = self.cell_size {
            cfg.cell_size = v;
        }
        cfg
    }
}
