use clap::{ArgAction, Parser, Subcommand};
use imgbench::{synthetic, Result, Runner, Suite};
use log::{error, info, Level};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Time image header reads, resizes and transcodes
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the benchmark suite (default)
    Run(RunArgs),
    /// Print the labels of the cases that would run
    List(SuiteArgs),
    /// Write synthetic assets for the default suite
    Generate {
        /// Directory to write the assets into
        #[arg(long, default_value = ".")]
        assets_dir: PathBuf,
    },
}

#[derive(clap::Args, Default)]
struct SuiteArgs {
    /// JSON suite file, instead of the built-in suite
    #[arg(long)]
    suite: Option<PathBuf>,

    /// Only cases whose label contains this text
    #[arg(long)]
    filter: Option<String>,
}

impl SuiteArgs {
    fn load(&self) -> Result<Suite> {
        let suite = match &self.suite {
            Some(path) => Suite::load(path)?,
            None => Suite::default(),
        };
        Ok(match &self.filter {
            Some(pattern) => suite.filtered(pattern),
            None => suite,
        })
    }
}

#[derive(clap::Args)]
struct RunArgs {
    #[command(flatten)]
    suite: SuiteArgs,

    /// Directory the asset paths are relative to
    #[arg(long, default_value = ".")]
    assets_dir: PathBuf,

    /// Upper bound on iterations per case
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Write the first output of each case here
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// File name prefix for written outputs
    #[arg(long, default_value = "rs")]
    prefix: String,
}

impl Default for RunArgs {
    fn default() -> Self {
        let runner = Runner::default();
        Self {
            suite: SuiteArgs::default(),
            assets_dir: runner.assets_dir,
            max_iterations: runner.max_iterations,
            out_dir: runner.out_dir,
            prefix: runner.prefix,
        }
    }
}

fn setup_logger(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::Error,
        (false, 0) => Level::Warn,
        (false, 1) => Level::Info,
        (false, 2) => Level::Debug,
        _ => Level::Trace,
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("logger: {e}");
    }
}

/// Returns the number of failed cases.
fn run(args: RunArgs) -> Result<usize> {
    let suite = args.suite.load()?;
    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)?;
    }
    let runner = Runner {
        assets_dir: args.assets_dir,
        out_dir: args.out_dir,
        prefix: args.prefix,
        max_iterations: args.max_iterations,
    };

    let mut failed = 0;
    for case in &suite.cases {
        info!("running {}", case.label());
        match runner.run(case) {
            Ok(report) => println!("{report}"),
            Err(e) => {
                error!("{}: {}: {e}", case.label(), case.path.display());
                failed += 1;
            }
        }
    }
    Ok(failed)
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logger(args.verbose, args.quiet);

    let result = match args.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(run_args) => run(run_args),
        Command::List(suite_args) => suite_args.load().map(|suite| {
            suite.cases.iter().for_each(|case| println!("{}", case.label()));
            0
        }),
        Command::Generate { assets_dir } => synthetic::generate_assets(&assets_dir).map(|paths| {
            paths.iter().for_each(|p| println!("{}", p.display()));
            0
        }),
    };

    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(failed) => {
            error!("{failed} case(s) failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
