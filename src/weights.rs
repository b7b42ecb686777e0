//! probSAT scoring: `make^cm / (break + eps)^cb`, normalized over a clause

use crate::{
    error::Error,
    tracker::{MakeBreak, Tracker},
    Assignment, ClauseIdx, Formula,
};
use ordered_float::{NotNan, OrderedFloat};

/// Keeps a zero break count from dividing by zero
pub const EPSILON: f64 = f64::EPSILON;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Weights {
    cm: NotNan<f64>,
    cb: NotNan<f64>,
}

impl Weights {
    pub const DEFAULT_CM: f64 = 0.0;
    pub const DEFAULT_CB: f64 = 2.3;

    pub fn new(cm: f64, cb: f64) -> Result<Self, Error> {
        Ok(Self {
            cm: exponent("cm", cm)?,
            cb: exponent("cb", cb)?,
        })
    }

    #[inline]
    pub fn cm(&self) -> f64 {
        self.cm.into_inner()
    }

    #[inline]
    pub fn cb(&self) -> f64 {
        self.cb.into_inner()
    }

    #[inline]
    pub fn score(&self, counts: MakeBreak) -> f64 {
        (counts.make as f64).powf(self.cm()) / (counts.breaks as f64 + EPSILON).powf(self.cb())
    }

    /// Fills `out` with the probability of picking each literal of `clause`
    pub fn distribution<T: Tracker>(
        &self,
        formula: &Formula,
        clause: ClauseIdx,
        assignment: &mut Assignment,
        tracker: &mut T,
        out: &mut Vec<f64>,
    ) {
        out.clear();
        for literal in formula[clause].literals() {
            let counts = tracker.make_break(formula, assignment, literal.var());
            out.push(self.score(counts));
        }
        normalize(out);
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CM, Self::DEFAULT_CB).expect("default exponents are finite")
    }
}

fn exponent(flag: &'static str, value: f64) -> Result<NotNan<f64>, Error> {
    if !value.is_finite() {
        return Err(Error::config(flag, value, "exponent must be a finite number"));
    }
    NotNan::new(value).map_err(|_| Error::config(flag, value, "exponent must be a number"))
}

/// Scales `weights` in place into a probability distribution.
///
/// NaN counts as zero. When the total is not a positive finite number the
/// mass goes to the infinite weights if there are any, otherwise the weights
/// are rescaled by their maximum, and if every weight vanished the result is
/// uniform.
pub fn normalize(weights: &mut [f64]) {
    if weights.is_empty() {
        return;
    }
    for weight in weights.iter_mut() {
        if weight.is_nan() {
            *weight = 0.0;
        }
    }

    let total: f64 = weights.iter().sum();
    if total.is_finite() && total > 0.0 {
        weights.iter_mut().for_each(|weight| *weight /= total);
        return;
    }

    let max = weights
        .iter()
        .copied()
        .map(OrderedFloat)
        .max()
        .map(OrderedFloat::into_inner)
        .unwrap_or(0.0);

    if max.is_infinite() {
        let infinite = weights.iter().filter(|w| w.is_infinite()).count() as f64;
        for weight in weights.iter_mut() {
            *weight = if weight.is_infinite() { 1.0 / infinite } else { 0.0 };
        }
    } else if max > 0.0 {
        weights.iter_mut().for_each(|weight| *weight /= max);
        let total: f64 = weights.iter().sum();
        weights.iter_mut().for_each(|weight| *weight /= total);
    } else {
        let uniform = 1.0 / weights.len() as f64;
        weights.iter_mut().for_each(|weight| *weight = uniform);
    }
}

#[test]
fn default_exponents() {
    let weights = Weights::default();
    assert_eq!(weights.cm(), 0.0);
    assert_eq!(weights.cb(), 2.3);
}

#[test]
fn rejects_non_finite_exponents() {
    assert!(matches!(
        Weights::new(f64::NAN, 2.3),
        Err(Error::Config { flag: "cm", .. })
    ));
    assert!(matches!(
        Weights::new(0.0, f64::INFINITY),
        Err(Error::Config { flag: "cb", .. })
    ));
    assert!(Weights::new(1.0, 3.0).is_ok());
}

#[test]
fn break_only_scoring() -> Result<(), Error> {
    let weights = Weights::new(0.0, 2.3)?;

    // make^0 == 1, so only the break count matters
    let a = weights.score(MakeBreak { make: 1, breaks: 2 });
    let b = weights.score(MakeBreak { make: 7, breaks: 2 });
    assert_eq!(a, b);

    let fewer = weights.score(MakeBreak { make: 1, breaks: 1 });
    assert!(fewer > a);

    let none = weights.score(MakeBreak { make: 1, breaks: 0 });
    assert!(none.is_finite() && none > fewer);
    Ok(())
}

#[test]
fn make_exponent() -> Result<(), Error> {
    let weights = Weights::new(1.0, 0.0)?;
    let low = weights.score(MakeBreak { make: 1, breaks: 3 });
    let high = weights.score(MakeBreak { make: 4, breaks: 3 });
    assert!((high / low - 4.0).abs() < 1e-9);
    Ok(())
}

#[test]
fn normalize_weights() {
    let mut weights = vec![1.0, 3.0];
    normalize(&mut weights);
    assert_eq!(weights, vec![0.25, 0.75]);

    let mut weights = vec![f64::INFINITY, 2.0, f64::INFINITY];
    normalize(&mut weights);
    assert_eq!(weights, vec![0.5, 0.0, 0.5]);

    let mut weights = vec![f64::MAX, f64::MAX];
    normalize(&mut weights);
    assert_eq!(weights, vec![0.5, 0.5]);

    let mut weights = vec![0.0, f64::NAN, 0.0, 0.0];
    normalize(&mut weights);
    assert_eq!(weights, vec![0.25; 4]);
}

#[test]
fn distribution_over_clause() -> Result<(), Error> {
    use crate::tracker::Counters;

    // (x1 v x2) ^ (-x1 v x3) ^ (-x2 v -x3), clause 2 unsatisfied
    let formula = Formula::new(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]])?;
    let mut assignment = Assignment::from(vec![true, true, true]);
    let mut tracker = Counters::new(&formula, &assignment);
    let mut probabilities = Vec::new();

    Weights::default().distribution(&formula, 2, &mut assignment, &mut tracker, &mut probabilities);

    // -x2 breaks nothing, -x3 breaks clause 1
    assert_eq!(probabilities.len(), 2);
    assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    assert!(probabilities[0] > 0.999_999);
    assert!(probabilities[1] > 0.0);
    assert_eq!(assignment, Assignment::from(vec![true, true, true]));
    Ok(())
}

#[cfg(test)]
mod properties {
    use super::Weights;
    use crate::{
        arbitrary::Instance,
        tracker::{Counters, Tracker},
    };
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn probabilities_sum_to_one(instance: Instance, cm: u8, cb: u8) -> bool {
        let Instance {
            formula,
            mut assignment,
        } = instance;
        let weights = match Weights::new(cm as f64 / 16.0, cb as f64 / 16.0) {
            Ok(weights) => weights,
            Err(_) => return false,
        };
        let mut tracker = Counters::new(&formula, &assignment);
        let mut probabilities = Vec::new();

        (0..tracker.unsatisfied_count()).all(|n| match tracker.nth_unsatisfied(n) {
            Some(clause) => {
                weights.distribution(
                    &formula,
                    clause,
                    &mut assignment,
                    &mut tracker,
                    &mut probabilities,
                );
                probabilities.len() == formula[clause].len()
                    && probabilities.iter().all(|p| *p >= 0.0)
                    && (probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9
            }
            None => false,
        })
    }
}
