#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    /// Whether a variable holding `value` satisfies a literal of this sign
    #[inline]
    pub fn satisfied_by(self, value: bool) -> bool {
        value == (self == Sign::Positive)
    }
}

impl From<bool> for Sign {
    #[inline]
    fn from(x: bool) -> Self {
        if x {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

impl std::ops::Not for Sign {
    type Output = Sign;

    #[inline]
    fn not(self) -> Self::Output {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

impl std::fmt::Display for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", if self == &Sign::Negative { "-" } else { "" },)
    }
}

impl std::fmt::Debug for Sign {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", if self == &Sign::Positive { "+" } else { "-" },)
    }
}

#[test]
fn satisfied_by() {
    assert!(Sign::Positive.satisfied_by(true));
    assert!(!Sign::Positive.satisfied_by(false));
    assert!(Sign::Negative.satisfied_by(false));
    assert!(!Sign::Negative.satisfied_by(true));
    assert_eq!(!Sign::Positive, Sign::Negative);
}
