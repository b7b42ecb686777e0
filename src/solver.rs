use crate::{
    config::{SolverConfig, Strategy},
    select,
    tracker::{Counters, Recompute, Tracker},
    Assignment, Formula, Variable,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

/// How a search run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Every clause is satisfied by the final assignment
    Satisfied,
    /// The `max_tries × max_flips` budget ran out
    Exhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub status: Status,
    /// Flips performed over all tries
    pub flips: u64,
    pub satisfied_clauses: usize,
    pub total_clauses: usize,
}

impl SearchResult {
    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.status == Status::Satisfied
    }
}

/// `<flips>;<satisfied>;<total>`, one line of a repeat-run result file
impl std::fmt::Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{};{};{}",
            self.flips, self.satisfied_clauses, self.total_clauses
        )
    }
}

/// A single probSAT run over a shared formula. The assignment, bookkeeping and
/// random source belong to the run alone.
pub struct Solver<'f, T = Counters, R = StdRng> {
    formula: &'f Formula,
    config: SolverConfig,
    assignment: Assignment,
    tracker: T,
    rng: R,
    probabilities: Vec<f64>,
}

impl<'f, T: Tracker, R: Rng> Solver<'f, T, R> {
    pub fn new(formula: &'f Formula, config: SolverConfig, rng: R) -> Self {
        let assignment = Assignment::new(formula.num_variables());
        let tracker = T::new(formula, &assignment);
        Self {
            formula,
            config,
            assignment,
            tracker,
            rng,
            probabilities: Vec::new(),
        }
    }

    #[inline]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn into_assignment(self) -> Assignment {
        self.assignment
    }

    /// Replaces the current assignment, e.g. to start from a known point
    ///
    /// # Panics
    ///
    /// If `assignment` does not cover exactly the formula's variables.
    pub fn set_assignment(&mut self, assignment: Assignment) {
        assert_eq!(assignment.len(), self.formula.num_variables());
        self.assignment = assignment;
        self.tracker.reset(self.formula, &self.assignment);
    }

    /// Draws a fresh uniformly random assignment
    pub fn randomize(&mut self) {
        self.assignment.randomize(&mut self.rng);
        self.tracker.reset(self.formula, &self.assignment);
    }

    #[inline]
    pub fn is_fully_satisfied(&self) -> bool {
        self.tracker.is_satisfied()
    }

    #[inline]
    pub fn satisfied_clause_count(&self) -> usize {
        self.formula.num_clauses() - self.tracker.unsatisfied_count()
    }

    pub fn clauses_evaluation(&self) -> Vec<bool> {
        self.formula.clauses_evaluation(&self.assignment)
    }

    /// One weighted flip; `None` if the assignment already satisfies everything
    pub fn step(&mut self) -> Option<Variable> {
        select::weighted_flip(
            self.formula,
            &mut self.assignment,
            &mut self.tracker,
            &self.config.weights,
            &mut self.rng,
            &mut self.probabilities,
        )
    }

    /// Restarts from a random assignment up to `max_tries` times, flipping up
    /// to `max_flips` times after each restart. The flip count accumulates
    /// across tries.
    ///
    /// Satisfaction is only checked before a flip. A try whose last flip
    /// satisfies the formula is followed by a restart, and if that was the
    /// last try the result is `Exhausted` with every clause satisfied.
    pub fn solve(&mut self) -> SearchResult {
        let mut flips = 0;

        for attempt in 1..=self.config.max_tries {
            self.randomize();
            for _ in 0..self.config.max_flips {
                if self.is_fully_satisfied() {
                    return self.result(Status::Satisfied, flips);
                }
                self.step();
                flips += 1;
            }
            debug!(
                attempt,
                flips,
                unsatisfied = self.tracker.unsatisfied_count(),
                "try exhausted"
            );
        }

        self.result(Status::Exhausted, flips)
    }

    fn result(&self, status: Status, flips: u64) -> SearchResult {
        SearchResult {
            status,
            flips,
            satisfied_clauses: self.satisfied_clause_count(),
            total_clauses: self.formula.num_clauses(),
        }
    }
}

/// Runs one search with its own `StdRng` seeded from `seed` and returns the
/// result together with the final assignment
pub fn solve_seeded(
    formula: &Formula,
    config: SolverConfig,
    strategy: Strategy,
    seed: u64,
) -> (SearchResult, Assignment) {
    let rng = StdRng::seed_from_u64(seed);
    match strategy {
        Strategy::Incremental => run(Solver::<Counters, _>::new(formula, config, rng)),
        Strategy::Recompute => run(Solver::<Recompute, _>::new(formula, config, rng)),
    }
}

fn run<T: Tracker, R: Rng>(mut solver: Solver<T, R>) -> (SearchResult, Assignment) {
    let result = solver.solve();
    (result, solver.into_assignment())
}

/// Random 3-SAT instance satisfied by a hidden assignment
#[cfg(test)]
fn planted_3sat(num_vars: usize, num_clauses: usize, seed: u64) -> Formula {
    let mut rng = StdRng::seed_from_u64(seed);
    let hidden = (0..num_vars).map(|_| rng.gen()).collect::<Vec<bool>>();

    let mut clauses = Vec::with_capacity(num_clauses);
    for _ in 0..num_clauses {
        let mut clause = (0..3)
            .map(|_| {
                let var = rng.gen_range(1, num_vars as isize + 1);
                if rng.gen() {
                    var
                } else {
                    -var
                }
            })
            .collect::<Vec<_>>();
        let satisfied = clause
            .iter()
            .any(|x| hidden[x.unsigned_abs() - 1] == (*x > 0));
        if !satisfied {
            clause[0] = -clause[0];
        }
        clauses.push(clause);
    }
    Formula::new(num_vars, clauses).unwrap()
}

#[cfg(test)]
fn config(max_tries: usize, max_flips: usize) -> SolverConfig {
    SolverConfig {
        max_tries,
        max_flips,
        ..SolverConfig::default()
    }
}

#[test]
fn unit_clause() -> Result<(), crate::error::FormatError> {
    let formula = Formula::new(1, vec![vec![1]])?;
    let mut solver = Solver::<Counters, _>::new(&formula, config(1, 1), StdRng::seed_from_u64(5));

    solver.set_assignment(Assignment::from(vec![false]));
    assert!(!solver.is_fully_satisfied());
    assert_eq!(solver.step(), Some(0));
    assert!(solver.is_fully_satisfied());
    assert_eq!(solver.clauses_evaluation(), vec![true]);

    for seed in 0..20 {
        let (result, model) = solve_seeded(&formula, config(1, 1), Strategy::Incremental, seed);
        match result.flips {
            0 => assert_eq!(result.status, Status::Satisfied),
            1 => assert_eq!(result.status, Status::Exhausted),
            flips => panic!("{} flips in a single one-flip try", flips),
        }
        assert_eq!(result.satisfied_clauses, 1);
        assert_eq!(model, Assignment::from(vec![true]));
    }
    Ok(())
}

#[test]
fn satisfaction_is_checked_before_each_flip() -> Result<(), crate::error::FormatError> {
    // Two one-flip tries over x1. A try that starts false flips once; the next
    // try re-randomizes, so a second false draw costs a second flip and ends
    // the budget with the clause satisfied.
    let formula = Formula::new(1, vec![vec![1]])?;
    let mut histogram = [0; 3];

    for seed in 0..400 {
        let (result, model) = solve_seeded(&formula, config(2, 1), Strategy::Incremental, seed);
        assert!(result.flips <= 2);
        histogram[result.flips as usize] += 1;

        let expected = if result.flips == 2 {
            Status::Exhausted
        } else {
            Status::Satisfied
        };
        assert_eq!(result.status, expected);
        assert_eq!(result.satisfied_clauses, 1);
        assert_eq!(model, Assignment::from(vec![true]));
    }

    // Roughly 1/2, 1/4 and 1/4 of the runs
    assert!(histogram[0] > 150 && histogram[0] < 250, "{:?}", histogram);
    assert!(histogram[2] > 60 && histogram[2] < 140, "{:?}", histogram);
    Ok(())
}

#[test]
#[should_panic]
fn set_assignment_rejects_wrong_length() {
    let formula = Formula::new(2, vec![vec![1, 2]]).unwrap();
    let mut solver = Solver::<Counters, _>::new(&formula, config(1, 1), StdRng::seed_from_u64(0));
    solver.set_assignment(Assignment::from(vec![true]));
}

#[test]
fn satisfiable_example() -> Result<(), crate::error::FormatError> {
    let formula = Formula::new(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]])?;

    let solved = (0..200)
        .filter(|seed| {
            let (result, model) =
                solve_seeded(&formula, config(50, 50), Strategy::Incremental, *seed);
            if result.is_satisfied() {
                assert_eq!(result.satisfied_clauses, 3);
                assert_eq!(result.total_clauses, 3);
                assert!(formula.is_satisfied_by(&model));
            }
            result.is_satisfied()
        })
        .count();
    assert!(solved >= 195, "solved {} of 200", solved);
    Ok(())
}

#[test]
fn unsatisfiable_exhausts_budget() -> Result<(), crate::error::FormatError> {
    let formula = Formula::new(1, vec![vec![1], vec![-1]])?;

    for seed in 0..20 {
        for strategy in [Strategy::Incremental, Strategy::Recompute].iter() {
            let (result, _) = solve_seeded(&formula, config(5, 7), *strategy, seed);
            assert_eq!(result.status, Status::Exhausted);
            assert_eq!(result.flips, 35);
            assert_eq!(result.satisfied_clauses, 1);
            assert_eq!(result.total_clauses, 2);
            assert_eq!(result.to_string(), "35;1;2");
        }
    }
    Ok(())
}

#[test]
fn formula_without_clauses_is_satisfied() -> Result<(), crate::error::FormatError> {
    let formula = Formula::new(2, Vec::<Vec<isize>>::new())?;
    let (result, _) = solve_seeded(&formula, SolverConfig::default(), Strategy::Incremental, 0);
    assert_eq!(
        result,
        SearchResult {
            status: Status::Satisfied,
            flips: 0,
            satisfied_clauses: 0,
            total_clauses: 0
        }
    );
    Ok(())
}

#[test]
fn strategies_agree_for_equal_seeds() {
    let formula = planted_3sat(30, 128, 17);

    for seed in 0..10 {
        let incremental = solve_seeded(&formula, config(10, 200), Strategy::Incremental, seed);
        let recompute = solve_seeded(&formula, config(10, 200), Strategy::Recompute, seed);
        assert_eq!(incremental, recompute);
    }
}

#[test]
fn solves_random_underconstrained_instances() {
    // Planted instances at clause/variable ratio 3 are easy for local search
    for seed in 0..5 {
        let formula = planted_3sat(40, 120, seed);
        let (result, model) = solve_seeded(&formula, config(20, 1000), Strategy::Incremental, seed);
        assert!(result.is_satisfied(), "instance {} unsolved: {}", seed, result);
        assert!(formula.is_satisfied_by(&model));
    }
}

#[test]
fn explicit_generator() -> Result<(), crate::error::FormatError> {
    use rand::rngs::mock::StepRng;

    // The driver accepts any random source, including a deterministic mock
    let formula = Formula::new(2, vec![vec![1, 2]])?;
    let mut solver = Solver::<Recompute, _>::new(&formula, config(3, 3), StepRng::new(0, 1));
    let result = solver.solve();
    assert!(result.flips <= 9);
    assert!(result.satisfied_clauses <= result.total_clauses);
    Ok(())
}
