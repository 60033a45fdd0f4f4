use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;
use xlate_config::Backend;
use xlate_driver::{load_unit, render, write_artifacts, BatchReport, Driver, SourceUnit, UnitOutcome};

#[derive(Parser)]
#[command(name = "xlate")]
#[command(author, version, about = "Source-preserving translator to C++, C# and Swift")]
struct Cli {
    /// Raise the log level (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate unit documents and write the artifacts
    Translate {
        /// Unit documents produced by the front end
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Target language
        #[arg(short, long)]
        target: Target,

        /// Configuration file overriding the built-in profile
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory; artifacts go to stdout without it
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Translate without writing anything
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        target: Target,

        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the tree of a unit document
    Dump {
        file: PathBuf,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Target {
    /// Header and source file pair
    Cpp,
    Csharp,
    Swift,
}

impl From<Target> for Backend {
    fn from(target: Target) -> Self {
        match target {
            Target::Cpp => Backend::Cpp,
            Target::Csharp => Backend::CSharp,
            Target::Swift => Backend::Swift,
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Translate {
            files,
            target,
            config,
            out,
        } => {
            let driver = Driver::from_config(target.into(), config.as_deref())?;
            let (units, report) = driver.translate_files(&files)?;
            report_diagnostics(&units, &report);

            match out {
                Some(dir) => {
                    for path in write_artifacts(&dir, &report)? {
                        println!("Wrote {}", path.display());
                    }
                }
                None => print_artifacts(&report),
            }
            report.check()?;
        }

        Commands::Check {
            files,
            target,
            config,
        } => {
            let driver = Driver::from_config(target.into(), config.as_deref())?;
            let (units, report) = driver.translate_files(&files)?;
            report_diagnostics(&units, &report);
            for (unit, outcome) in units.iter().zip(&report.outcomes) {
                match outcome.location(unit) {
                    Some((line, column)) => println!("{}:{line}:{column}: {}", outcome.name, status(outcome)),
                    None => println!("{}: {}", outcome.name, status(outcome)),
                }
            }
            report.check()?;
        }

        Commands::Dump { file } => {
            let unit = load_unit(&file)?;
            println!("{:#?}", unit);
        }
    }

    Ok(())
}

fn status(outcome: &UnitOutcome) -> &'static str {
    if outcome.is_fatal() {
        "Error"
    } else if outcome.is_unsupported() {
        "Skipped"
    } else {
        "OK"
    }
}

fn report_diagnostics(units: &[SourceUnit], report: &BatchReport) {
    for (unit, outcome) in units.iter().zip(&report.outcomes) {
        for diagnostic in outcome.diagnostics() {
            eprintln!("{:?}", render(unit, diagnostic));
        }
    }
}

fn print_artifacts(report: &BatchReport) {
    for outcome in &report.outcomes {
        let Ok(translated) = &outcome.result else {
            continue;
        };
        for artifact in &translated.artifacts {
            println!("// ==> {}", artifact.path);
            print!("{}", artifact.text);
        }
    }
}
