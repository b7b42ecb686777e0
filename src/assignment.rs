use crate::{Literal, Variable};
use fixedbitset::FixedBitSet;
use rand::Rng;
use std::ops::Index;

/// A total truth assignment: bit `var` holds the value of variable `var`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    values: FixedBitSet,
}

impl Assignment {
    /// All variables false
    pub fn new(num_vars: Variable) -> Self {
        Self {
            values: FixedBitSet::with_capacity(num_vars),
        }
    }

    pub fn random(num_vars: Variable, rng: &mut impl Rng) -> Self {
        let mut assignment = Self::new(num_vars);
        assignment.randomize(rng);
        assignment
    }

    /// Draws every variable independently and uniformly
    pub fn randomize(&mut self, rng: &mut impl Rng) {
        for var in 0..self.values.len() {
            self.values.set(var, rng.gen());
        }
    }

    #[inline]
    pub fn flip(&mut self, var: Variable) {
        let value = self.values[var];
        self.values.set(var, !value);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.len() == 0
    }

    pub fn values<'a>(&'a self) -> impl Iterator<Item = bool> + 'a {
        (0..self.values.len()).map(move |var| self.values[var])
    }

    /// The assignment as one satisfied literal per variable
    pub fn literals<'a>(&'a self) -> impl Iterator<Item = Literal> + 'a {
        self.values()
            .enumerate()
            .map(|(var, value)| Literal::new(var, value))
    }
}

impl From<Vec<bool>> for Assignment {
    fn from(values: Vec<bool>) -> Self {
        let mut assignment = Self::new(values.len());
        for (var, value) in values.into_iter().enumerate() {
            assignment.values.set(var, value);
        }
        assignment
    }
}

impl Index<Variable> for Assignment {
    type Output = bool;

    #[inline]
    fn index(&self, var: Variable) -> &Self::Output {
        &self.values[var]
    }
}

#[test]
fn flip_is_self_inverse() {
    let mut assignment = Assignment::from(vec![true, false, true]);
    let before = assignment.clone();

    assignment.flip(1);
    assert!(assignment[1]);
    assert_ne!(assignment, before);

    assignment.flip(1);
    assert_eq!(assignment, before);
}

#[test]
fn randomize_is_seeded() {
    use rand::{rngs::StdRng, SeedableRng};

    let a = Assignment::random(64, &mut StdRng::seed_from_u64(7));
    let b = Assignment::random(64, &mut StdRng::seed_from_u64(7));
    assert_eq!(a, b);
    assert_eq!(a.len(), 64);

    // 64 fair coins all landing the same way would be a broken generator
    let ones = a.values().filter(|x| *x).count();
    assert!(ones > 0 && ones < 64);
}

#[test]
fn model_literals() {
    let assignment = Assignment::from(vec![true, false]);
    let model = assignment.literals().map(Literal::to_dimacs).collect::<Vec<_>>();
    assert_eq!(model, vec![1, -2]);
}
