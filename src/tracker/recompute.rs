use super::{MakeBreak, Tracker};
use crate::{Assignment, ClauseIdx, Formula, Variable};

/// Re-evaluates the whole formula for every tentative flip.
/// Cost per candidate is the total number of literals.
#[derive(Clone, Debug)]
pub struct Recompute {
    evaluation: Vec<bool>,
    scratch: Vec<bool>,
    unsatisfied: usize,
}

impl Recompute {
    fn recount(&mut self) {
        self.unsatisfied = self.evaluation.iter().filter(|sat| !**sat).count();
    }
}

impl Tracker for Recompute {
    fn new(formula: &Formula, assignment: &Assignment) -> Self {
        let mut tracker = Self {
            evaluation: Vec::with_capacity(formula.num_clauses()),
            scratch: Vec::with_capacity(formula.num_clauses()),
            unsatisfied: 0,
        };
        tracker.reset(formula, assignment);
        tracker
    }

    fn reset(&mut self, formula: &Formula, assignment: &Assignment) {
        formula.clauses_evaluation_into(assignment, &mut self.evaluation);
        self.recount();
    }

    #[inline]
    fn unsatisfied_count(&self) -> usize {
        self.unsatisfied
    }

    fn nth_unsatisfied(&self, n: usize) -> Option<ClauseIdx> {
        self.evaluation
            .iter()
            .enumerate()
            .filter(|(_, sat)| !**sat)
            .nth(n)
            .map(|(idx, _)| idx)
    }

    fn make_break(
        &mut self,
        formula: &Formula,
        assignment: &mut Assignment,
        var: Variable,
    ) -> MakeBreak {
        assignment.flip(var);
        formula.clauses_evaluation_into(assignment, &mut self.scratch);
        assignment.flip(var);

        let mut counts = MakeBreak::default();
        for (after, before) in self.scratch.iter().zip(self.evaluation.iter()) {
            match (before, after) {
                (false, true) => counts.make += 1,
                (true, false) => counts.breaks += 1,
                _ => (),
            }
        }
        counts
    }

    fn flip(&mut self, formula: &Formula, assignment: &mut Assignment, var: Variable) {
        assignment.flip(var);
        formula.clauses_evaluation_into(assignment, &mut self.evaluation);
        self.recount();
    }
}

#[test]
fn make_break_example() -> Result<(), crate::error::FormatError> {
    // (x1 v x2) ^ (-x1 v x3) ^ (-x2 v -x3)
    let formula = Formula::new(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]])?;
    let mut assignment = Assignment::from(vec![true, true, true]);
    let mut tracker = Recompute::new(&formula, &assignment);

    assert_eq!(tracker.unsatisfied_count(), 1);
    assert_eq!(tracker.nth_unsatisfied(0), Some(2));
    assert_eq!(tracker.nth_unsatisfied(1), None);

    // Flipping x2 repairs clause 2 and breaks nothing: clause 0 still has x1
    assert_eq!(
        tracker.make_break(&formula, &mut assignment, 1),
        MakeBreak { make: 1, breaks: 0 }
    );
    // Flipping x3 repairs clause 2 but breaks clause 1
    assert_eq!(
        tracker.make_break(&formula, &mut assignment, 2),
        MakeBreak { make: 1, breaks: 1 }
    );

    tracker.flip(&formula, &mut assignment, 1);
    assert!(tracker.is_satisfied());
    assert_eq!(assignment, Assignment::from(vec![true, false, true]));
    Ok(())
}
