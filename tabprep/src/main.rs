//! tabprep CLI - Load datasets and scale their columns
//!
//! # Commands
//!
//! ```bash
//! tabprep list                                  # Datasets in the data directory
//! tabprep columns housing                       # Column names and types
//! tabprep load housing --format json            # Load and print a dataset
//! tabprep normalize housing -c price -c area    # Append price_NORM, area_NORM
//! tabprep standardize housing --drop-old        # Append <col>_STD for every column
//! tabprep apply housing --plan plan.json        # Run a saved transform plan
//! tabprep example-plan                          # Print an example plan
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tabprep::loader::format_delimiter;
use tabprep::{
    example_plan, run, ColumnSelector, Config, DataDir, DegeneratePolicy, EngineOptions,
    ExcelOptions, Resolution, Table, TransformEngine, TransformKind, TransformPlan,
};

#[derive(Parser)]
#[command(name = "tabprep")]
#[command(about = "Load tabular datasets and normalize or standardize their columns", long_about = None)]
struct Cli {
    /// Dataset directory (overrides TABPREP_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long, global = true)]
    delimiter: Option<char>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List datasets in the data directory
    List,

    /// Show column names and types of a dataset
    Columns {
        /// Dataset name (file stem)
        name: String,
    },

    /// Load a dataset and write it out
    Load {
        /// Dataset name (file stem)
        name: String,

        /// Sheet to read from a spreadsheet
        #[arg(long)]
        sheet: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Append min-max normalized <col>_NORM columns
    Normalize(TransformArgs),

    /// Append z-score standardized <col>_STD columns
    Standardize(TransformArgs),

    /// Run a transform plan (JSON) against a dataset
    Apply {
        /// Dataset name (file stem)
        name: String,

        /// Plan file
        #[arg(short, long)]
        plan: PathBuf,

        #[command(flatten)]
        engine: EngineArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show an example transform plan
    ExamplePlan,
}

#[derive(Args)]
struct TransformArgs {
    /// Dataset name (file stem)
    name: String,

    /// Column to transform (repeatable; default: all columns)
    #[arg(short, long = "column")]
    columns: Vec<String>,

    /// Remove source columns after transforming
    #[arg(long)]
    drop_old: bool,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args)]
struct EngineArgs {
    /// Keep non-finite output for zero-range / zero-variance columns instead of failing
    #[arg(long)]
    lenient: bool,

    /// Use the column list as given; unknown columns are an error
    #[arg(long)]
    raw: bool,

    /// Delta degrees of freedom for the standard deviation
    #[arg(long)]
    ddof: Option<u8>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match Config::from_env() {
        Ok(config) => dispatch(cli, config),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut data_dir = match &cli.data_dir {
        Some(dir) => DataDir::new(dir),
        None => config.data_dir(),
    };
    if let Some(d) = cli.delimiter {
        data_dir = data_dir.with_delimiter(d);
    }

    match cli.command {
        Commands::List => cmd_list(&data_dir),
        Commands::Columns { name } => cmd_columns(&data_dir, &name),
        Commands::Load {
            name,
            sheet,
            output,
        } => cmd_load(&data_dir, &name, sheet, &output),
        Commands::Normalize(args) => {
            cmd_transform(&data_dir, &config, args, TransformKind::Normalize)
        }
        Commands::Standardize(args) => {
            cmd_transform(&data_dir, &config, args, TransformKind::Standardize)
        }
        Commands::Apply {
            name,
            plan,
            engine,
            output,
        } => cmd_apply(&data_dir, &config, &name, &plan, &engine, &output),
        Commands::ExamplePlan => cmd_example_plan(),
    }
}

fn engine_options(config: &Config, args: &EngineArgs) -> EngineOptions {
    let mut options = config.engine;
    if args.lenient {
        options = options.with_degenerate(DegeneratePolicy::Lenient);
    }
    if args.raw {
        options = options.with_resolution(Resolution::Raw);
    }
    if let Some(ddof) = args.ddof {
        options = options.with_ddof(ddof);
    }
    options
}

fn cmd_list(data_dir: &DataDir) -> Result<(), Box<dyn std::error::Error>> {
    let names = data_dir.list()?;
    if names.is_empty() {
        eprintln!("📋 No datasets in {}", data_dir.root.display());
        return Ok(());
    }

    eprintln!("📋 Datasets in {} ({}):", data_dir.root.display(), names.len());
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_columns(data_dir: &DataDir, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let table = data_dir.load_table(name)?;

    eprintln!("📋 {} has {} columns, {} rows:", name, table.n_cols(), table.n_rows());
    for (i, col) in table.columns().enumerate() {
        println!("[{:2}] {} ({})", i + 1, col.name, col.dtype());
    }
    Ok(())
}

fn cmd_load(
    data_dir: &DataDir,
    name: &str,
    sheet: Option<String>,
    output: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let table = match sheet {
        Some(sheet) => data_dir.load_excel(name, &ExcelOptions::sheet(sheet))?,
        None => data_dir.load_table(name)?,
    };
    write_table(&table, data_dir, output)
}

fn cmd_transform(
    data_dir: &DataDir,
    config: &Config,
    args: TransformArgs,
    kind: TransformKind,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut table = data_dir.load_table(&args.name)?;
    let engine = TransformEngine::new(engine_options(config, &args.engine));

    let selector = if args.columns.is_empty() {
        None
    } else {
        Some(ColumnSelector::from(args.columns))
    };

    eprintln!("⚙️  {} {}", kind, args.name);
    let result = engine.apply(&mut table, selector.as_ref(), kind, args.drop_old)?;
    write_table(&result, data_dir, &args.output)
}

fn cmd_apply(
    data_dir: &DataDir,
    config: &Config,
    name: &str,
    plan_path: &Path,
    engine: &EngineArgs,
    output: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = TransformPlan::from_path(plan_path)?;
    eprintln!("🗺️  Plan: {} ({} steps)", plan_path.display(), plan.steps.len());

    let mut table = data_dir.load_table(name)?;
    let engine = TransformEngine::new(engine_options(config, engine));
    let summary = run(&mut table, &plan, &engine)?;

    eprintln!(
        "✨ {} rows, {} → {} columns",
        summary.rows,
        summary.columns_before.len(),
        summary.columns_after.len()
    );
    write_table(&table, data_dir, output)
}

fn cmd_example_plan() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", example_plan().to_json()?);
    Ok(())
}

fn write_table(
    table: &Table,
    data_dir: &DataDir,
    output: &OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut sink: Box<dyn Write> = match &output.output {
        Some(p) => Box::new(fs::File::create(p)?),
        None => Box::new(std::io::stdout().lock()),
    };

    match output.format {
        Format::Csv => {
            let delimiter = data_dir.delimiter.unwrap_or(',');
            let byte = u8::try_from(delimiter)
                .map_err(|_| format!("Delimiter '{}' is not a single byte", format_delimiter(delimiter)))?;
            table.to_csv(&mut sink, byte)?;
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&table.to_records())?;
            writeln!(sink, "{}", json)?;
        }
    }
    sink.flush()?;

    if let Some(p) = &output.output {
        eprintln!("💾 Output written to: {}", p.display());
    }
    Ok(())
}
