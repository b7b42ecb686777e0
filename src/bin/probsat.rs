use clap::{ArgGroup, Parser};
use probsat::{batch, Error, RunPlan, SolverConfig, Strategy, Weights};
use rand::Rng;
use std::{path::PathBuf, time::Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// probSAT local search over DIMACS CNF formulas
#[derive(Parser, Debug)]
#[command(name = "probsat", version)]
#[command(group(ArgGroup::new("input").required(true).args(["data", "files"])))]
struct Args {
    /// Input formula in DIMACS CNF
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Directory of DIMACS CNF formulas; results go to `<DIR>-out`
    #[arg(long, value_name = "DIR")]
    files: Option<PathBuf>,

    /// Random restarts per run
    #[arg(long = "max_tries", visible_alias = "max-tries", env = "PROBSAT_MAX_TRIES",
          default_value_t = SolverConfig::DEFAULT_MAX_TRIES)]
    max_tries: usize,

    /// Flips per restart
    #[arg(long = "max_flips", visible_alias = "max-flips", env = "PROBSAT_MAX_FLIPS",
          default_value_t = SolverConfig::DEFAULT_MAX_FLIPS)]
    max_flips: usize,

    /// Exponent of the make count
    #[arg(long, env = "PROBSAT_CM", default_value_t = Weights::DEFAULT_CM, allow_negative_numbers = true)]
    cm: f64,

    /// Exponent of the break count
    #[arg(long, env = "PROBSAT_CB", default_value_t = Weights::DEFAULT_CB, allow_negative_numbers = true)]
    cb: f64,

    /// Runs per formula; with more than one, results are written to a file
    #[arg(short = 'r', long, env = "PROBSAT_REPEAT", default_value_t = 1)]
    repeat: usize,

    /// Process directory files in the order of the number in their names
    #[arg(short = 's', long)]
    sort: bool,

    /// Seed of the first run (random when omitted)
    #[arg(long, env = "PROBSAT_SEED")]
    seed: Option<u64>,

    /// Clause bookkeeping: `incremental` or `recompute`
    #[arg(long, env = "PROBSAT_STRATEGY", default_value_t = Strategy::Incremental)]
    strategy: Strategy,

    /// Worker threads for repeated runs (defaults to one per core)
    #[arg(short = 'j', long, env = "PROBSAT_JOBS")]
    jobs: Option<usize>,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Args) -> Result<(), Error> {
    let config = SolverConfig::new(args.max_tries, args.max_flips, args.cm, args.cb)?;
    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let plan = RunPlan::new(config, args.strategy, seed, args.repeat)?;

    if let Some(jobs) = args.jobs {
        if jobs == 0 {
            return Err(Error::config("jobs", jobs, "must be positive"));
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .map_err(|_| Error::config("jobs", jobs, "thread pool already initialized"))?;
    }

    info!(
        seed,
        max_tries = config.max_tries,
        max_flips = config.max_flips,
        cm = config.weights.cm(),
        cb = config.weights.cb(),
        strategy = %plan.strategy,
        repeat = plan.repeat,
        "starting"
    );
    let start = Instant::now();

    if let Some(path) = &args.data {
        let outcome = batch::run_file(path, &plan)?;
        print_outcome(&outcome);
    }

    if let Some(dir) = &args.files {
        let report = batch::run_directory(dir, &plan, args.sort)?;
        for outcome in report.completed.iter() {
            print_outcome(outcome);
        }
        if !report.failed.is_empty() {
            error!(
                "{} of {} files failed",
                report.failed.len(),
                report.failed.len() + report.completed.len()
            );
        }
    }

    info!("finished in {:.2} s", start.elapsed().as_secs_f64());
    Ok(())
}

fn print_outcome(outcome: &batch::FileOutcome) {
    match (&outcome.output, outcome.results.as_slice()) {
        (Some(output), results) => {
            let solved = results.iter().filter(|r| r.is_satisfied()).count();
            println!(
                "c {}: {}/{} runs satisfied, results in {}",
                outcome.input.display(),
                solved,
                results.len(),
                output.display()
            );
        }
        (None, [result]) => {
            println!("c {}", outcome.input.display());
            // The last try's final flip can satisfy the formula without a
            // further check, so trust the clause count over the status
            if result.satisfied_clauses == result.total_clauses {
                println!("s SATISFIABLE");
                if let Some(model) = &outcome.model {
                    print!("v");
                    for literal in model.literals() {
                        print!(" {}", literal);
                    }
                    println!(" 0");
                }
            } else {
                println!("s UNKNOWN");
            }
            println!("c flips {}", result.flips);
            println!(
                "c clauses {}/{}",
                result.satisfied_clauses, result.total_clauses
            );
            println!("c solved in {} ms", outcome.elapsed.as_millis());
        }
        (None, _) => (),
    }
}
