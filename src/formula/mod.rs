pub mod clause;
pub mod dimacs;

use crate::{error::FormatError, occurrences::Occurrences, ClauseIdx, Literal, Variable};
pub use clause::Clause;
use std::ops::Index;

/// An immutable CNF formula over variables `0..num_variables`
#[derive(Clone, Debug)]
pub struct Formula {
    num_variables: Variable,
    clauses: Vec<Clause>,
    occurrences: Occurrences,
}

impl Formula {
    /// Largest number of variables a formula may declare
    pub const MAX_VARIABLES: Variable = 1 << 26;

    /// Builds a formula from DIMACS-numbered clauses, rejecting empty clauses
    /// and literals outside `1..=num_variables`
    pub fn new(
        num_variables: Variable,
        clauses: impl IntoIterator<Item = impl IntoIterator<Item = isize>>,
    ) -> Result<Self, FormatError> {
        check_variables(num_variables)?;

        let clauses = clauses
            .into_iter()
            .enumerate()
            .map(|(idx, clause)| -> Result<Clause, FormatError> {
                let literals = clause
                    .into_iter()
                    .map(|x| Literal::from_dimacs(x, num_variables))
                    .collect::<Result<Vec<_>, _>>()?;
                if literals.is_empty() {
                    Err(FormatError::EmptyClause { clause: idx })
                } else {
                    Ok(Clause::new(literals))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_clauses(num_variables, clauses))
    }

    pub(crate) fn from_clauses(num_variables: Variable, clauses: Vec<Clause>) -> Self {
        let occurrences = Occurrences::new(num_variables, &clauses);
        Self {
            num_variables,
            clauses,
            occurrences,
        }
    }

    #[inline]
    pub fn num_variables(&self) -> Variable {
        self.num_variables
    }

    #[inline]
    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    #[inline]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    #[inline]
    pub(crate) fn occurrences(&self) -> &Occurrences {
        &self.occurrences
    }
}

/// Rejects empty and oversized variable ranges before anything is allocated
pub(crate) fn check_variables(num_variables: Variable) -> Result<(), FormatError> {
    if num_variables == 0 {
        return Err(FormatError::NoVariables);
    }
    if num_variables > Formula::MAX_VARIABLES {
        return Err(FormatError::TooManyVariables {
            num_variables,
            max: Formula::MAX_VARIABLES,
        });
    }
    Ok(())
}

impl Index<ClauseIdx> for Formula {
    type Output = Clause;

    fn index(&self, idx: ClauseIdx) -> &Self::Output {
        &self.clauses[idx]
    }
}

#[test]
fn new_formula() -> Result<(), FormatError> {
    let formula = Formula::new(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]])?;
    assert_eq!(formula.num_variables(), 3);
    assert_eq!(formula.num_clauses(), 3);
    assert_eq!(formula[1].literals(), &[Literal::new(0, false), Literal::new(2, true)]);
    assert_eq!(formula.occurrences()[2].len(), 2);
    Ok(())
}

#[test]
fn rejects_invalid_formulas() {
    assert_eq!(
        Formula::new(0, Vec::<Vec<isize>>::new()).err(),
        Some(FormatError::NoVariables)
    );
    assert_eq!(
        Formula::new(2, vec![vec![1], vec![]]).err(),
        Some(FormatError::EmptyClause { clause: 1 })
    );
    assert_eq!(
        Formula::new(2, vec![vec![1, 3]]).err(),
        Some(FormatError::LiteralOutOfRange {
            literal: 3,
            num_variables: 2
        })
    );
    assert_eq!(
        Formula::new(2, vec![vec![0]]).err(),
        Some(FormatError::ZeroLiteral)
    );
    assert_eq!(
        Formula::new(Formula::MAX_VARIABLES + 1, vec![vec![1]]).err(),
        Some(FormatError::TooManyVariables {
            num_variables: Formula::MAX_VARIABLES + 1,
            max: Formula::MAX_VARIABLES
        })
    );
}

#[test]
fn formula_without_clauses() -> Result<(), FormatError> {
    let formula = Formula::new(4, Vec::<Vec<isize>>::new())?;
    assert_eq!(formula.num_clauses(), 0);
    assert!(formula.occurrences()[3].is_empty());
    Ok(())
}
