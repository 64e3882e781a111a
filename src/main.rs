//! logbook - campaign journal normalizer

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logbook::export::{Exporter, MechanicsExporter, render_markup};
use logbook::import::{ImportConfig, import_campaigns, load_campaigns, save_campaigns, stored_entry};
use logbook::model::JournalEntry;
use logbook::util::{decode_text, file_stem, slugify};
use logbook::{Normalizer, Result, Vocabulary};

#[derive(Parser)]
#[command(name = "logbook")]
#[command(version, about = "Campaign journal normalizer", long_about = None)]
#[command(after_help = "EXAMPLES:
    logbook import dump.json -r rules.json -o campaigns.json
    logbook export campaigns.json --out-dir notes
    logbook inspect entry.html -r rules.json --format mechanics")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log state-machine decisions
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Normalize a campaign dump
    Import {
        /// Campaign dump (JSON array of campaigns)
        #[arg(value_name = "DUMP")]
        dump: PathBuf,

        /// Rules package or term list
        #[arg(short = 'r', long, value_name = "RULES")]
        vocabulary: PathBuf,

        /// Only import campaigns whose name matches this pattern
        #[arg(short, long, value_name = "RE")]
        filter: Option<String>,

        /// Title prefix marking journal entries as lore
        #[arg(long, value_name = "PREFIX", default_value = "00 Lore")]
        lore_prefix: String,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Write imported journal entries as mechanics notes
    Export {
        /// Imported campaigns
        #[arg(value_name = "CAMPAIGNS")]
        campaigns: PathBuf,

        /// Directory receiving one folder per campaign
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,
    },

    /// Normalize a single markup file and print the result
    Inspect {
        /// Entry markup
        #[arg(value_name = "HTML")]
        input: PathBuf,

        /// Rules package or term list
        #[arg(short = 'r', long, value_name = "RULES")]
        vocabulary: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Canonical)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Canonical nodes as JSON
    Canonical,
    /// Site markup
    Markup,
    /// Mechanics note
    Mechanics,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Import {
            dump,
            vocabulary,
            filter,
            lore_prefix,
            output,
        } => import(&dump, &vocabulary, filter.as_deref(), lore_prefix, output.as_deref()),
        Command::Export {
            campaigns,
            out_dir,
        } => export(&campaigns, &out_dir),
        Command::Inspect {
            input,
            vocabulary,
            format,
        } => inspect(&input, &vocabulary, format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("logbook=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn import(
    dump: &Path,
    vocabulary: &Path,
    filter: Option<&str>,
    lore_prefix: String,
    output: Option<&Path>,
) -> Result<()> {
    let vocabulary = Vocabulary::load(vocabulary)?;
    let mut config = ImportConfig {
        lore_prefix,
        ..ImportConfig::default()
    };
    if let Some(pattern) = filter {
        config = config.with_filter(pattern)?;
    }

    let campaigns = import_campaigns(load_campaigns(dump)?, &vocabulary, &config)?;
    match output {
        Some(path) => save_campaigns(path, &campaigns)?,
        None => {
            let mut stdout = io::stdout().lock();
            serde_json::to_writer(&mut stdout, &campaigns)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn export(campaigns: &Path, out_dir: &Path) -> Result<()> {
    let exporter = MechanicsExporter::new();
    for campaign in load_campaigns(campaigns)? {
        let dir = out_dir.join(slugify(&campaign.name)).join("journals");
        fs::create_dir_all(&dir)?;
        for entry in &campaign.journal {
            let path = dir.join(format!("{}.md", file_stem(&entry.title)));
            let mut file = fs::File::create(&path)?;
            exporter.export(&stored_entry(entry), &mut file)?;
            tracing::debug!(path = %path.display(), "wrote note");
        }
    }
    Ok(())
}

fn inspect(input: &Path, vocabulary: &Path, format: Format) -> Result<()> {
    let vocabulary = Vocabulary::load(vocabulary)?;
    let bytes = fs::read(input)?;
    let markup = decode_text(&bytes, None);
    let nodes = Normalizer::new(&vocabulary).normalize_markup(&markup);

    let rendered = match format {
        Format::Canonical => serde_json::to_string_pretty(&nodes)?,
        Format::Markup => render_markup(&nodes)?,
        Format::Mechanics => {
            let title = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            MechanicsExporter::new().render(&JournalEntry::new(title, nodes))?
        }
    };
    let mut stdout = io::stdout().lock();
    write!(stdout, "{rendered}")?;
    if !rendered.ends_with('\n') {
        writeln!(stdout)?;
    }
    Ok(())
}
