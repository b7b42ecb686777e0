//! Random small formulas and assignments for property tests

use crate::{Assignment, Formula};
use quickcheck::{Arbitrary, Gen};
use rand::Rng;

#[derive(Clone, Debug)]
pub struct Instance {
    pub formula: Formula,
    pub assignment: Assignment,
}

impl Arbitrary for Instance {
    fn arbitrary<G: Gen>(g: &mut G) -> Self {
        let num_variables = g.gen_range(1, 8);
        let num_clauses = g.gen_range(0, 16);

        let mut clauses = Vec::with_capacity(num_clauses);
        for _ in 0..num_clauses {
            let len = g.gen_range(1, 5);
            let mut clause = Vec::with_capacity(len);
            for _ in 0..len {
                let var = g.gen_range(1, num_variables as isize + 1);
                clause.push(if g.gen() { var } else { -var });
            }
            clauses.push(clause);
        }

        let values = (0..num_variables).map(|_| g.gen()).collect::<Vec<bool>>();

        Self {
            formula: Formula::new(num_variables, clauses)
                .expect("generated literals are always in range"),
            assignment: Assignment::from(values),
        }
    }
}
