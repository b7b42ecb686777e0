use crate::{error::FormatError, Assignment, Evaluate, Sign, Variable};

/// A variable (0-based) and its polarity, packed as `var << 1 | positive`
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Literal {
    code: Variable,
}

impl Literal {
    #[inline]
    pub fn new(var: Variable, sign: impl Into<Sign>) -> Self {
        assert!(var < (Variable::max_value() >> 1));
        let sign = sign.into();
        Literal {
            code: (var << 1) | matches!(sign, Sign::Positive) as Variable,
        }
    }

    /// Converts a signed DIMACS literal (1-based, negative when negated)
    pub fn from_dimacs(x: isize, num_variables: Variable) -> Result<Self, FormatError> {
        if x == 0 {
            return Err(FormatError::ZeroLiteral);
        }
        let var = x.unsigned_abs();
        if var > num_variables {
            return Err(FormatError::LiteralOutOfRange {
                literal: x,
                num_variables,
            });
        }
        Ok(Self::new(var - 1, x > 0))
    }

    #[inline]
    pub fn to_dimacs(self) -> isize {
        let var = (self.var() + 1) as isize;
        match self.sign() {
            Sign::Positive => var,
            Sign::Negative => -var,
        }
    }

    #[inline]
    pub fn var(self) -> Variable {
        self.code >> 1
    }

    #[inline]
    pub fn sign(self) -> Sign {
        ((self.code & 1) == 1).into()
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        (self.code & 1) == 1
    }
}

impl Evaluate for Literal {
    #[inline]
    fn evaluate(&self, assignment: &Assignment) -> bool {
        self.sign().satisfied_by(assignment[self.var()])
    }
}

impl std::ops::Not for Literal {
    type Output = Literal;

    #[inline]
    fn not(self) -> Self::Output {
        Literal {
            code: self.code ^ 1,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_dimacs())
    }
}

impl std::fmt::Debug for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}{}", self.sign(), self.var() + 1)
    }
}

#[test]
fn dimacs_conversion() -> Result<(), FormatError> {
    let pos = Literal::from_dimacs(3, 5)?;
    assert_eq!(pos.var(), 2);
    assert_eq!(pos.sign(), Sign::Positive);
    assert_eq!(pos.to_dimacs(), 3);

    let neg = Literal::from_dimacs(-5, 5)?;
    assert_eq!(neg.var(), 4);
    assert_eq!(neg.sign(), Sign::Negative);
    assert_eq!(neg.to_dimacs(), -5);
    assert_eq!(!neg, Literal::new(4, true));
    assert_eq!(format!("{}", neg), "-5");

    assert_eq!(Literal::from_dimacs(0, 5), Err(FormatError::ZeroLiteral));
    assert_eq!(
        Literal::from_dimacs(-6, 5),
        Err(FormatError::LiteralOutOfRange {
            literal: -6,
            num_variables: 5
        })
    );
    Ok(())
}

#[test]
fn evaluate_literal() {
    let assignment = Assignment::from(vec![true, false]);
    assert!(Literal::new(0, true).evaluate(&assignment));
    assert!(!Literal::new(0, false).evaluate(&assignment));
    assert!(!Literal::new(1, true).evaluate(&assignment));
    assert!(Literal::new(1, false).evaluate(&assignment));
}
