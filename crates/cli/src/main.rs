use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use treezip_core::human::human_bytes;
use treezip_core::{
    archive_file_name, materialize, parse_with, render, serialize, write_zip, ArchiveEntry,
    ArchiveOptions, ArchiveSummary, Compression, ContentKey, ContentMap, DepthPolicy, ParseOptions,
    Tree,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DepthArg {
    Auto,
    Markers,
    Indentation,
}

impl From<DepthArg> for DepthPolicy {
    fn from(d: DepthArg) -> Self {
        match d {
            DepthArg::Auto => DepthPolicy::Auto,
            DepthArg::Markers => DepthPolicy::Markers,
            DepthArg::Indentation => DepthPolicy::Indentation,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyArg {
    Name,
    Path,
}

impl From<KeyArg> for ContentKey {
    fn from(k: KeyArg) -> Self {
        match k {
            KeyArg::Name => ContentKey::Name,
            KeyArg::Path => ContentKey::Path,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "treezip", about = "Turn a tree diagram into a zip of files")]
struct Args {
    /// Diagram file; reads stdin when absent or `-`
    input: Option<PathBuf>,
    /// Zip output path (defaults to `<root>.zip`)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also (or, without --output, only) create the files under this directory
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// JSON object mapping file keys to contents
    #[arg(short, long)]
    contents: Option<PathBuf>,
    /// What the keys of --contents refer to
    #[arg(long, value_enum, default_value = "name")]
    content_key: KeyArg,
    /// How nesting depth is read from the diagram
    #[arg(long, value_enum, default_value = "auto")]
    depth: DepthArg,
    /// Reject empty names and over-deep entries
    #[arg(long)]
    strict: bool,
    /// Do not write entries for empty directories
    #[arg(long)]
    no_empty_dirs: bool,
    /// Store files without compression
    #[arg(long)]
    store: bool,
    /// Write the parsed tree as JSON
    #[arg(long)]
    json: Option<PathBuf>,
    /// Print the parsed tree
    #[arg(long)]
    print: bool,
    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .compact()
        .init();
}

fn read_input(input: Option<&PathBuf>) -> anyhow::Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}

/// Packs the archive in memory and only creates `out` once packing succeeded.
fn write_archive(
    tree: &Tree,
    entries: &[ArchiveEntry],
    options: &ArchiveOptions,
    out: &Path,
) -> anyhow::Result<ArchiveSummary> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let summary =
        write_zip(tree, entries, options, &mut cursor).context("Failed to generate zip file")?;
    std::fs::write(out, cursor.into_inner())
        .with_context(|| format!("Failed to generate zip file: writing {}", out.display()))?;
    Ok(summary)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);
    debug!(?args, "parsed arguments");

    let text = read_input(args.input.as_ref())?;
    let parse_options = ParseOptions {
        depth: args.depth.into(),
        strict: args.strict,
    };
    let tree = parse_with(&text, &parse_options)?;

    if args.print {
        print!("{}", render(&tree));
    }
    if let Some(path) = &args.json {
        let json = treezip_core::export::to_json(&tree);
        std::fs::write(path, serde_json::to_string_pretty(&json)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let contents = match &args.contents {
        Some(path) => ContentMap::load(args.content_key.into(), path)?,
        None => ContentMap::new(args.content_key.into()),
    };
    let entries = serialize(&tree, &contents);

    if let Some(dir) = &args.out_dir {
        let summary = materialize(&tree, &entries, dir)?;
        println!(
            "Created {} files and {} empty directories under {}",
            summary.files,
            summary.dirs,
            dir.display()
        );
        if args.output.is_none() {
            return Ok(());
        }
    }

    let archive_options = ArchiveOptions {
        empty_dirs: !args.no_empty_dirs,
        compression: if args.store {
            Compression::Stored
        } else {
            Compression::Deflated
        },
    };
    let out = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(archive_file_name(&tree)));
    let summary = write_archive(&tree, &entries, &archive_options, &out)?;
    let size = std::fs::metadata(&out).map(|m| m.len()).unwrap_or(0);
    println!(
        "Wrote {} ({} files, {} empty directories, {})",
        out.display(),
        summary.files,
        summary.dirs,
        human_bytes(size)
    );
    Ok(())
}
