/// A scalar objective over a real-valued parameter vector.
///
/// Evaluations are assumed deterministic and side-effect free; the engine never catches,
/// retries or caches them.
pub trait Objective {
    fn evaluate(&self, params: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64,
{
    #[inline]
    fn evaluate(&self, params: &[f64]) -> f64 {
        self(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Maximize,
    #[default]
    Minimize,
}

impl Direction {
    pub fn from_maximize(maximize: bool) -> Self {
        if maximize {
            Self::Maximize
        } else {
            Self::Minimize
        }
    }

    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Maximize => 1.0,
            Self::Minimize => -1.0,
        }
    }
}

/// Wraps an external objective so that the engine always maximizes.
///
/// The true objective value is recovered only at reporting boundaries through
/// [`SignedObjective::objective_value`].
pub(crate) struct SignedObjective<'a, O: ?Sized> {
    inner: &'a O,
    sign: f64,
}

impl<'a, O> SignedObjective<'a, O>
where
    O: Objective + ?Sized,
{
    pub(crate) fn new(inner: &'a O, direction: Direction) -> Self {
        Self {
            inner,
            sign: direction.sign(),
        }
    }

    #[inline]
    pub(crate) fn fitness(&self, params: &[f64]) -> f64 {
        self.sign * self.inner.evaluate(params)
    }

    #[inline]
    pub(crate) fn objective_value(&self, fitness: f64) -> f64 {
        self.sign * fitness
    }
}
