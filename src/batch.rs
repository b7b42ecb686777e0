//! Repeated runs over one formula, directory mode and result files
//!
//! With `repeat > 1` every run's result is written as one
//! `<flips>;<satisfied>;<total>` line. A single input `foo.cnf` produces
//! `foo.cnf_out.txt` next to it; directory mode over `dir` writes
//! `dir-out/<file>_out.txt`.

use crate::{
    config::RunPlan,
    error::{Error, Result},
    solver::{solve_seeded, SearchResult},
    Assignment, Formula,
};
use rayon::prelude::*;
use std::{
    ffi::OsString,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};
use tracing::{info, warn};

/// Completed runs between two progress messages
pub const PROGRESS_INTERVAL: usize = 100;

/// Everything produced for one input file
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    /// One result per run, in run order
    pub results: Vec<SearchResult>,
    /// Final assignment of a single run
    pub model: Option<Assignment>,
    /// Where the results were written, for repeated runs
    pub output: Option<PathBuf>,
    /// Time spent searching, parsing excluded
    pub elapsed: Duration,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: Vec<FileOutcome>,
    pub failed: Vec<(PathBuf, Error)>,
}

/// Runs the search `plan.repeat` times in parallel. Run `i` owns a generator
/// seeded with `plan.seed + i`, so the results don't depend on scheduling.
pub fn run_repeated(formula: &Formula, plan: &RunPlan, label: &str) -> Vec<SearchResult> {
    let completed = AtomicUsize::new(0);

    (0..plan.repeat)
        .into_par_iter()
        .map(|run| {
            let seed = plan.seed.wrapping_add(run as u64);
            let (result, _) = solve_seeded(formula, plan.config, plan.strategy, seed);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if done % PROGRESS_INTERVAL == 0 && done < plan.repeat {
                info!(
                    "{}: {}/{} runs ({:.1}%)",
                    label,
                    done,
                    plan.repeat,
                    100.0 * done as f64 / plan.repeat as f64
                );
            }
            result
        })
        .collect()
}

/// Runs one formula according to `plan`, keeping the model of a single run
fn run_formula(formula: &Formula, plan: &RunPlan, label: &str) -> (Vec<SearchResult>, Option<Assignment>) {
    if plan.repeat == 1 {
        let (result, model) = solve_seeded(formula, plan.config, plan.strategy, plan.seed);
        (vec![result], Some(model))
    } else {
        let results = run_repeated(formula, plan, label);
        info!("{}: 100%", label);
        (results, None)
    }
}

/// Single-file mode: any error aborts
pub fn run_file(input: &Path, plan: &RunPlan) -> Result<FileOutcome> {
    let formula = Formula::parse_file(input)?;
    let label = input.display().to_string();
    let start = Instant::now();
    let (results, model) = run_formula(&formula, plan, &label);
    let elapsed = start.elapsed();

    let output = if plan.repeat > 1 {
        let mut name = input.as_os_str().to_owned();
        name.push("_out.txt");
        let path = PathBuf::from(name);
        write_results(&path, &results)?;
        Some(path)
    } else {
        None
    };

    Ok(FileOutcome {
        input: input.to_path_buf(),
        results,
        model,
        output,
        elapsed,
    })
}

/// Directory mode: files that fail to load or write are recorded and skipped
pub fn run_directory(dir: &Path, plan: &RunPlan, sort_numeric: bool) -> Result<BatchReport> {
    let inputs = list_inputs(dir, sort_numeric)?;
    let out_dir = output_dir(dir);
    fs::create_dir_all(&out_dir).map_err(|e| Error::io(&out_dir, e))?;

    let mut report = BatchReport::default();
    for input in inputs {
        match run_in_directory(&input, &out_dir, plan) {
            Ok(outcome) => report.completed.push(outcome),
            Err(e) => {
                warn!("skipping {}: {}", input.display(), e);
                report.failed.push((input, e));
            }
        }
    }
    Ok(report)
}

fn run_in_directory(input: &Path, out_dir: &Path, plan: &RunPlan) -> Result<FileOutcome> {
    let formula = Formula::parse_file(input)?;
    let label = file_name(input).to_string_lossy().into_owned();
    let start = Instant::now();
    let (results, model) = run_formula(&formula, plan, &label);
    let elapsed = start.elapsed();

    let output = if plan.repeat > 1 {
        let path = out_dir.join(result_file_name(input));
        write_results(&path, &results)?;
        Some(path)
    } else {
        None
    };

    Ok(FileOutcome {
        input: input.to_path_buf(),
        results,
        model,
        output,
        elapsed,
    })
}

pub fn write_results(path: &Path, results: &[SearchResult]) -> Result<()> {
    let io_err = |e| Error::io(path, e);
    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    for result in results {
        writeln!(out, "{}", result).map_err(io_err)?;
    }
    out.flush().map_err(io_err)
}

/// `<file name>_out.txt`
pub fn result_file_name(input: &Path) -> OsString {
    let mut name = file_name(input).to_owned();
    name.push("_out.txt");
    name
}

/// Sibling directory `<dir>-out`
pub fn output_dir(dir: &Path) -> PathBuf {
    let mut name = dir.components().as_path().as_os_str().to_owned();
    name.push("-out");
    PathBuf::from(name)
}

/// Regular files of `dir`, by name, or by the number in their name
pub fn list_inputs(dir: &Path, sort_numeric: bool) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        if path.is_file() {
            inputs.push(path);
        }
    }

    inputs.sort();
    if sort_numeric {
        // Files without a number go last, still in name order
        inputs.sort_by_key(|path| (numeric_key(path).is_none(), numeric_key(path)));
    }
    Ok(inputs)
}

/// The last run of digits in the file stem, e.g. 17 for `uf20-017.cnf`
pub fn numeric_key(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let end = stem.rfind(|c: char| c.is_ascii_digit())? + 1;
    let start = stem[..end]
        .rfind(|c: char| !c.is_ascii_digit())
        .map(|idx| idx + 1)
        .unwrap_or(0);
    stem[start..end].parse().ok()
}

fn file_name(path: &Path) -> &std::ffi::OsStr {
    path.file_name().unwrap_or_else(|| path.as_os_str())
}

#[cfg(test)]
use crate::{config::SolverConfig, config::Strategy};

#[cfg(test)]
fn plan(repeat: usize) -> RunPlan {
    let config = SolverConfig {
        max_tries: 10,
        max_flips: 50,
        ..SolverConfig::default()
    };
    RunPlan::new(config, Strategy::Incremental, 42, repeat).unwrap()
}

#[test]
fn numeric_keys() {
    assert_eq!(numeric_key(Path::new("uf20-017.cnf")), Some(17));
    assert_eq!(numeric_key(Path::new("dir/uf20-9.cnf")), Some(9));
    assert_eq!(numeric_key(Path::new("1234")), Some(1234));
    assert_eq!(numeric_key(Path::new("plain.cnf")), None);
}

#[test]
fn output_names() {
    assert_eq!(output_dir(Path::new("data")), PathBuf::from("data-out"));
    assert_eq!(output_dir(Path::new("data/")), PathBuf::from("data-out"));
    assert_eq!(
        output_dir(Path::new("bench/uf20")),
        PathBuf::from("bench/uf20-out")
    );
    assert_eq!(
        result_file_name(Path::new("bench/uf20-01.cnf")),
        OsString::from("uf20-01.cnf_out.txt")
    );
}

#[test]
fn repeated_runs_are_reproducible() -> Result<()> {
    let formula = Formula::parse_str("p cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n")?;
    let first = run_repeated(&formula, &plan(250), "example");
    let second = run_repeated(&formula, &plan(250), "example");

    assert_eq!(first.len(), 250);
    assert_eq!(first, second);
    assert!(first.iter().all(|result| result.total_clauses == 3));
    Ok(())
}

#[test]
fn single_file_writes_results_beside_input() -> Result<()> {
    let dir = tempfile::tempdir().map_err(|e| Error::io("tempdir", e))?;
    let input = dir.path().join("example.cnf");
    fs::write(&input, "c example\np cnf 2 2\n1 2 0\n-1 0\n").map_err(|e| Error::io(&input, e))?;

    let outcome = run_file(&input, &plan(3))?;
    let output = dir.path().join("example.cnf_out.txt");
    assert_eq!(outcome.output.as_ref(), Some(&output));
    assert!(outcome.model.is_none());

    let written = fs::read_to_string(&output).map_err(|e| Error::io(&output, e))?;
    let lines = written.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 3);
    for (line, result) in lines.iter().zip(outcome.results.iter()) {
        assert_eq!(*line, result.to_string());
        assert!(line.ends_with(";2;2"));
    }

    let single = run_file(&input, &plan(1))?;
    assert_eq!(single.results.len(), 1);
    assert!(single.output.is_none());
    let model = single.model.as_ref().map(|model| model.values().collect::<Vec<_>>());
    assert_eq!(model, Some(vec![false, true]));
    Ok(())
}

#[test]
fn directory_mode_skips_bad_files() -> Result<()> {
    let root = tempfile::tempdir().map_err(|e| Error::io("tempdir", e))?;
    let dir = root.path().join("school");
    fs::create_dir(&dir).map_err(|e| Error::io(&dir, e))?;

    let write = |name: &str, content: &str| {
        let path = dir.join(name);
        fs::write(&path, content).map_err(|e| Error::io(&path, e))
    };
    write("uf20-10.cnf", "p cnf 2 1\n1 2 0\n")?;
    write("uf20-2.cnf", "p cnf 2 1\n-1 -2 0\n")?;
    write("uf20-3.cnf", "p cnf 2 1\n1 5 0\n")?;

    let names = |paths: Vec<PathBuf>| {
        paths
            .iter()
            .map(|path| result_file_name(path).to_string_lossy().into_owned())
            .collect::<Vec<_>>()
    };
    assert_eq!(
        names(list_inputs(&dir, true)?),
        vec![
            "uf20-2.cnf_out.txt",
            "uf20-3.cnf_out.txt",
            "uf20-10.cnf_out.txt"
        ]
    );

    let report = run_directory(&dir, &plan(2), true)?;
    assert_eq!(report.completed.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0].1, Error::InputFormat(_)));

    let out_dir = root.path().join("school-out");
    assert!(out_dir.join("uf20-2.cnf_out.txt").is_file());
    assert!(out_dir.join("uf20-10.cnf_out.txt").is_file());
    assert!(!out_dir.join("uf20-3.cnf_out.txt").exists());
    Ok(())
}
