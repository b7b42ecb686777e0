use crate::{Assignment, Evaluate, Literal};

/// A nonempty disjunction of literals
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
    literals: Vec<Literal>,
}

impl Clause {
    pub(crate) fn new(literals: Vec<Literal>) -> Self {
        debug_assert!(!literals.is_empty());
        Self { literals }
    }

    #[inline]
    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Number of literals made true by `assignment`
    pub fn true_literals(&self, assignment: &Assignment) -> usize {
        self.literals
            .iter()
            .filter(|literal| literal.evaluate(assignment))
            .count()
    }
}

impl Evaluate for Clause {
    fn evaluate(&self, assignment: &Assignment) -> bool {
        self.literals
            .iter()
            .any(|literal| literal.evaluate(assignment))
    }
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for literal in self.literals.iter() {
            write!(f, "{} ", literal)?;
        }
        write!(f, "0")
    }
}

#[test]
fn evaluate_clause() {
    let clause = Clause::new(vec![Literal::new(0, true), Literal::new(1, false)]);

    assert!(clause.evaluate(&Assignment::from(vec![true, true])));
    assert!(clause.evaluate(&Assignment::from(vec![false, false])));
    assert!(!clause.evaluate(&Assignment::from(vec![false, true])));

    assert_eq!(clause.true_literals(&Assignment::from(vec![true, false])), 2);
    assert_eq!(format!("{}", clause), "1 -2 0");
}
