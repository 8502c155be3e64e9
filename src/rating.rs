use std::ops::{AddAssign, Mul, Sub};

/// Number representing team strength, such that the difference between two
/// powers can be used to predict the outcome of a game. Higher is better.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct Power(pub f64);

impl From<Power> for f64 {
    #[inline]
    fn from(Power(power): Power) -> f64 {
        power
    }
}

impl Power {
    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Sub<Power> for Power {
    type Output = PowerDifference;

    #[inline]
    fn sub(self, rhs: Power) -> PowerDifference {
        PowerDifference(self.0 - rhs.0)
    }
}

impl AddAssign<PowerDifference> for Power {
    #[inline]
    fn add_assign(&mut self, PowerDifference(difference): PowerDifference) {
        self.0 += difference;
    }
}

/// A difference between two powers, or an adjustment to a power.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct PowerDifference(pub f64);

impl From<PowerDifference> for f64 {
    #[inline]
    fn from(PowerDifference(difference): PowerDifference) -> f64 {
        difference
    }
}

impl Mul<PowerDifference> for f64 {
    type Output = PowerDifference;

    #[inline]
    fn mul(self, PowerDifference(difference): PowerDifference) -> PowerDifference {
        PowerDifference(self * difference)
    }
}
