//! `bp-unpack`: decode a blueprint pack archive to JSON.
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum, ValueHint};
use tracing_subscriber::EnvFilter;

use blueprint_pack::{
    decode_pack_file, load_schema_document, AssetTable, DecodeOptions, Dialect, ErrorPolicy,
    SchemaDocument,
};

#[derive(Parser)]
#[command(
    name = "bp-unpack",
    version,
    about = "Decode a blueprint pack archive into JSON",
    long_about = None,
    after_help = r#"EXAMPLES
  $ bp-unpack blueprints.pack --schema schema.json --assets assets.json -o blueprints.json
  $ RUST_LOG=debug bp-unpack blueprints.pack --schema schema.json --keep-going --workers 8"#
)]
struct Cli {
    #[arg(help = "Pack archive to decode", value_hint = ValueHint::FilePath)]
    pack: PathBuf,
    #[arg(long, help = "Schema document (JSON)", value_hint = ValueHint::FilePath)]
    schema: PathBuf,
    #[arg(long, help = "Asset table (JSON array of {AssetId, FileId})", value_hint = ValueHint::FilePath)]
    assets: Option<PathBuf>,
    #[arg(long, value_enum, help = "Override the dialect named by the schema document")]
    dialect: Option<DialectArg>,
    #[arg(short, long, help = "Output file (default: stdout)", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
    #[arg(long, help = "Indent the output")]
    pretty: bool,
    #[arg(long, default_value_t = 1, help = "Worker threads decoding records in parallel")]
    workers: usize,
    #[arg(long, help = "Emit failed records as {\"$error\": ...} instead of stopping")]
    keep_going: bool,
    #[arg(long, default_value_t = 256, help = "Maximum object/collection nesting")]
    max_depth: usize,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DialectArg {
    RogueTrader,
    DarkHeresy,
    Wrath,
}

impl DialectArg {
    fn dialect(self) -> Dialect {
        match self {
            DialectArg::RogueTrader => Dialect::ROGUE_TRADER,
            DialectArg::DarkHeresy => Dialect::DARK_HERESY,
            DialectArg::Wrath => Dialect::WRATH,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let document = SchemaDocument::from_path(&cli.schema)
        .with_context(|| format!("loading schema {}", cli.schema.display()))?;
    let mut schemas = load_schema_document(&document)
        .with_context(|| format!("building schema {}", cli.schema.display()))?;
    if let Some(dialect) = cli.dialect {
        schemas = schemas.with_dialect(dialect.dialect());
    }
    let assets = match &cli.assets {
        Some(path) => AssetTable::load(path)
            .with_context(|| format!("loading asset table {}", path.display()))?,
        None => AssetTable::default(),
    };

    let options = DecodeOptions {
        error_policy: if cli.keep_going {
            ErrorPolicy::Isolate
        } else {
            ErrorPolicy::Abort
        },
        workers: cli.workers.max(1),
        max_depth: cli.max_depth,
        pretty: cli.pretty,
        ..DecodeOptions::default()
    };

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let summary = decode_pack_file(&cli.pack, &schemas, &assets, options, sink)
        .with_context(|| format!("decoding {}", cli.pack.display()))?;
    if summary.failed > 0 {
        tracing::warn!(failed = summary.failed, "some records could not be decoded");
    }
    Ok(())
}
