use crate::{formula::Clause, ClauseIdx, Variable};
use std::ops::Index;

/// How often a single variable appears in a single clause
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occurrence {
    pub clause: ClauseIdx,
    pub positive: u32,
    pub negative: u32,
}

impl Occurrence {
    /// Literals of the variable in this clause that are true when it holds `value`
    #[inline]
    pub fn true_literals(&self, value: bool) -> u32 {
        if value {
            self.positive
        } else {
            self.negative
        }
    }
}

/// For each variable, the clauses it occurs in, in ascending clause order
#[derive(Clone, Debug)]
pub struct Occurrences {
    occurrences: Vec<Vec<Occurrence>>,
}

impl Occurrences {
    pub fn new(num_vars: Variable, clauses: &[Clause]) -> Self {
        let mut occurrences = vec![Vec::<Occurrence>::new(); num_vars];

        for (clause, literals) in clauses.iter().enumerate() {
            for literal in literals.literals() {
                let list = &mut occurrences[literal.var()];
                // Repeated variables within a clause share one entry
                if !matches!(list.last(), Some(last) if last.clause == clause) {
                    list.push(Occurrence {
                        clause,
                        positive: 0,
                        negative: 0,
                    });
                }
                if let Some(entry) = list.last_mut() {
                    if literal.is_positive() {
                        entry.positive += 1;
                    } else {
                        entry.negative += 1;
                    }
                }
            }
        }

        Self { occurrences }
    }
}

impl Index<Variable> for Occurrences {
    type Output = [Occurrence];

    #[inline]
    fn index(&self, var: Variable) -> &Self::Output {
        &self.occurrences[var]
    }
}

#[test]
fn repeated_variables_are_merged() {
    use crate::Literal;

    let clauses = vec![
        Clause::new(vec![Literal::new(0, true), Literal::new(1, false)]),
        Clause::new(vec![
            Literal::new(0, true),
            Literal::new(0, false),
            Literal::new(0, true),
        ]),
    ];
    let occurrences = Occurrences::new(3, &clauses);

    assert_eq!(
        occurrences[0],
        [
            Occurrence {
                clause: 0,
                positive: 1,
                negative: 0
            },
            Occurrence {
                clause: 1,
                positive: 2,
                negative: 1
            }
        ]
    );
    assert_eq!(occurrences[1].len(), 1);
    assert_eq!(occurrences[1][0].true_literals(false), 1);
    assert!(occurrences[2].is_empty());
}
