//! Bookkeeping of which clauses are satisfied while the assignment changes
//!
//! Two implementations are provided. [`Recompute`] re-evaluates every clause
//! after each (tentative) flip. [`Counters`] keeps a count of true literals per
//! clause and only touches the clauses a flipped variable occurs in. Both
//! produce the same make/break counts and enumerate unsatisfied clauses in the
//! same order, so a search driven by the same random source behaves
//! identically with either.

mod counters;
mod recompute;

pub use counters::Counters;
pub use recompute::Recompute;

use crate::{Assignment, ClauseIdx, Formula, Variable};

/// Effect of flipping one variable
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MakeBreak {
    /// Clauses that go from unsatisfied to satisfied
    pub make: usize,
    /// Clauses that go from satisfied to unsatisfied
    pub breaks: usize,
}

pub trait Tracker {
    fn new(formula: &Formula, assignment: &Assignment) -> Self
    where
        Self: Sized;

    /// Resynchronizes with an assignment that was replaced wholesale
    fn reset(&mut self, formula: &Formula, assignment: &Assignment);

    fn unsatisfied_count(&self) -> usize;

    #[inline]
    fn is_satisfied(&self) -> bool {
        self.unsatisfied_count() == 0
    }

    /// The `n`th unsatisfied clause, counting in ascending clause order
    fn nth_unsatisfied(&self, n: usize) -> Option<ClauseIdx>;

    /// Make and break counts of flipping `var`. `assignment` is left as it was.
    fn make_break(
        &mut self,
        formula: &Formula,
        assignment: &mut Assignment,
        var: Variable,
    ) -> MakeBreak;

    /// Flips `var` in `assignment` and updates the bookkeeping
    fn flip(&mut self, formula: &Formula, assignment: &mut Assignment, var: Variable);
}

#[cfg(test)]
mod properties {
    use super::{Counters, Recompute, Tracker};
    use crate::{arbitrary::Instance, Variable};
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn counters_agree_with_recompute(instance: Instance, flips: Vec<Variable>) -> bool {
        let Instance {
            formula,
            assignment,
        } = instance;
        let num_vars = formula.num_variables();

        let mut reference_assignment = assignment.clone();
        let mut reference = Recompute::new(&formula, &reference_assignment);
        let mut incremental_assignment = assignment;
        let mut incremental = Counters::new(&formula, &incremental_assignment);

        for var in flips.into_iter().map(|var| var % num_vars) {
            for candidate in 0..num_vars {
                let expected = reference.make_break(&formula, &mut reference_assignment, candidate);
                let actual =
                    incremental.make_break(&formula, &mut incremental_assignment, candidate);
                if expected != actual {
                    return false;
                }
            }

            reference.flip(&formula, &mut reference_assignment, var);
            incremental.flip(&formula, &mut incremental_assignment, var);

            let count = reference.unsatisfied_count();
            if count != incremental.unsatisfied_count()
                || reference_assignment != incremental_assignment
                || (0..=count).any(|n| reference.nth_unsatisfied(n) != incremental.nth_unsatisfied(n))
            {
                return false;
            }
        }
        true
    }

    #[quickcheck]
    fn make_break_leaves_assignment_untouched(instance: Instance, var: Variable) -> bool {
        let Instance {
            formula,
            mut assignment,
        } = instance;
        let var = var % formula.num_variables();
        let before = assignment.clone();

        let mut reference = Recompute::new(&formula, &assignment);
        reference.make_break(&formula, &mut assignment, var);
        let mut incremental = Counters::new(&formula, &assignment);
        incremental.make_break(&formula, &mut assignment, var);

        assignment == before
            && reference.unsatisfied_count()
                == formula.num_clauses() - formula.satisfied_clause_count(&assignment)
    }
}
