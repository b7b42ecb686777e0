use super::{MakeBreak, Tracker};
use crate::{Assignment, ClauseIdx, Formula, Variable};
use fixedbitset::FixedBitSet;

pub type Count = u32;

/// Incremental bookkeeping: only clauses containing the flipped variable are
/// revisited, through the formula's occurrence lists
#[derive(Clone, Debug)]
pub struct Counters {
    /// Number of true literals in each clause
    true_literals: Vec<Count>,
    /// Clauses whose count is zero
    unsatisfied: FixedBitSet,
    num_unsatisfied: usize,
}

impl Tracker for Counters {
    fn new(formula: &Formula, assignment: &Assignment) -> Self {
        let mut counters = Self {
            true_literals: vec![0; formula.num_clauses()],
            unsatisfied: FixedBitSet::with_capacity(formula.num_clauses()),
            num_unsatisfied: 0,
        };
        counters.reset(formula, assignment);
        counters
    }

    fn reset(&mut self, formula: &Formula, assignment: &Assignment) {
        self.unsatisfied.clear();
        self.num_unsatisfied = 0;

        for (idx, clause) in formula.clauses().iter().enumerate() {
            let count = clause.true_literals(assignment) as Count;
            self.true_literals[idx] = count;
            if count == 0 {
                self.unsatisfied.insert(idx);
                self.num_unsatisfied += 1;
            }
        }
    }

    #[inline]
    fn unsatisfied_count(&self) -> usize {
        self.num_unsatisfied
    }

    fn nth_unsatisfied(&self, n: usize) -> Option<ClauseIdx> {
        self.unsatisfied.ones().nth(n)
    }

    fn make_break(
        &mut self,
        formula: &Formula,
        assignment: &mut Assignment,
        var: Variable,
    ) -> MakeBreak {
        let value = assignment[var];
        let mut counts = MakeBreak::default();

        for occurrence in formula.occurrences()[var].iter() {
            let before = self.true_literals[occurrence.clause];
            let after =
                before - occurrence.true_literals(value) + occurrence.true_literals(!value);
            match (before, after) {
                (0, after) if after > 0 => counts.make += 1,
                (before, 0) if before > 0 => counts.breaks += 1,
                _ => (),
            }
        }
        counts
    }

    fn flip(&mut self, formula: &Formula, assignment: &mut Assignment, var: Variable) {
        let value = assignment[var];
        assignment.flip(var);

        for occurrence in formula.occurrences()[var].iter() {
            let clause = occurrence.clause;
            let before = self.true_literals[clause];
            let after =
                before - occurrence.true_literals(value) + occurrence.true_literals(!value);
            self.true_literals[clause] = after;

            match (before, after) {
                (0, after) if after > 0 => {
                    self.unsatisfied.set(clause, false);
                    self.num_unsatisfied -= 1;
                }
                (before, 0) if before > 0 => {
                    self.unsatisfied.insert(clause);
                    self.num_unsatisfied += 1;
                }
                _ => (),
            }
        }

        debug_assert_eq!(self.num_unsatisfied, self.unsatisfied.count_ones(..));
    }
}

#[test]
fn counters_follow_flips() -> Result<(), crate::error::FormatError> {
    // x1 appears twice in the last clause, so a single flip moves its count by two
    let formula = Formula::new(2, vec![vec![1, 2], vec![-1], vec![1, -2, 1]])?;
    let mut assignment = Assignment::from(vec![false, false]);
    let mut counters = Counters::new(&formula, &assignment);

    assert_eq!(counters.true_literals, vec![0, 1, 1]);
    assert_eq!(counters.unsatisfied_count(), 1);
    assert_eq!(counters.nth_unsatisfied(0), Some(0));

    assert_eq!(
        counters.make_break(&formula, &mut assignment, 0),
        MakeBreak { make: 1, breaks: 1 }
    );
    counters.flip(&formula, &mut assignment, 0);
    assert_eq!(counters.true_literals, vec![1, 0, 3]);
    assert_eq!(counters.nth_unsatisfied(0), Some(1));

    counters.flip(&formula, &mut assignment, 0);
    assert_eq!(counters.true_literals, vec![0, 1, 1]);
    assert_eq!(counters.unsatisfied_count(), 1);
    Ok(())
}
