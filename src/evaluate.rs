use crate::{Assignment, Evaluate, Formula};

impl Evaluate for Formula {
    fn evaluate(&self, assignment: &Assignment) -> bool {
        self.clauses()
            .iter()
            .all(|clause| clause.evaluate(assignment))
    }
}

impl Formula {
    /// Whether each clause, in order, has at least one true literal
    pub fn clauses_evaluation(&self, assignment: &Assignment) -> Vec<bool> {
        let mut evaluation = Vec::with_capacity(self.num_clauses());
        self.clauses_evaluation_into(assignment, &mut evaluation);
        evaluation
    }

    /// Same as [`clauses_evaluation`](Self::clauses_evaluation), reusing `out`
    pub fn clauses_evaluation_into(&self, assignment: &Assignment, out: &mut Vec<bool>) {
        debug_assert_eq!(assignment.len(), self.num_variables());
        out.clear();
        out.extend(
            self.clauses()
                .iter()
                .map(|clause| clause.evaluate(assignment)),
        );
    }

    pub fn satisfied_clause_count(&self, assignment: &Assignment) -> usize {
        self.clauses()
            .iter()
            .filter(|clause| clause.evaluate(assignment))
            .count()
    }

    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.evaluate(assignment)
    }
}

#[test]
fn evaluate_example() -> Result<(), crate::error::FormatError> {
    let formula = Formula::new(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]])?;

    let model = Assignment::from(vec![true, false, true]);
    assert_eq!(formula.clauses_evaluation(&model), vec![true, true, true]);
    assert!(formula.is_satisfied_by(&model));

    let all_true = Assignment::from(vec![true, true, true]);
    assert_eq!(formula.clauses_evaluation(&all_true), vec![true, true, false]);
    assert_eq!(formula.satisfied_clause_count(&all_true), 2);
    assert!(!formula.is_satisfied_by(&all_true));
    Ok(())
}

#[cfg(test)]
mod properties {
    use crate::{arbitrary::Instance, Variable};
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn clause_satisfied_iff_some_literal_true(instance: Instance) -> bool {
        let Instance {
            formula,
            assignment,
        } = instance;
        let values = assignment.values().collect::<Vec<_>>();

        formula
            .clauses_evaluation(&assignment)
            .into_iter()
            .zip(formula.clauses())
            .all(|(satisfied, clause)| {
                let expected = clause.literals().iter().any(|literal| {
                    let value = values[literal.var()];
                    if literal.to_dimacs() > 0 {
                        value
                    } else {
                        !value
                    }
                });
                satisfied == expected
            })
    }

    #[quickcheck]
    fn double_flip_preserves_evaluation(instance: Instance, var: Variable) -> bool {
        let Instance {
            formula,
            mut assignment,
        } = instance;
        let var = var % formula.num_variables();
        let before = formula.clauses_evaluation(&assignment);

        assignment.flip(var);
        assignment.flip(var);
        formula.clauses_evaluation(&assignment) == before
    }

    #[quickcheck]
    fn full_count_iff_satisfied(instance: Instance) -> bool {
        let Instance {
            formula,
            assignment,
        } = instance;
        (formula.satisfied_clause_count(&assignment) == formula.num_clauses())
            == formula.is_satisfied_by(&assignment)
    }
}
