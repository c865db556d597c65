//! Scalar newtypes for the dimensional quantities used throughout the
//! simulation: length, mass, time instants, durations, and 1-D velocity
//! components.
//!
//! These mirror the `Position`/`Displacement`/`Velocity`/`Date`/`Duration`
//! operator overloads of the original implementation, but as scalar
//! components rather than 2-D vector structs, since `Marble` stores its
//! baseline as independent `x0`/`y0`/`vx`/`vy` scalars (see `marble.rs`).

use std::ops::{Add, Div, Mul, Neg, Sub};

macro_rules! scalar_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
        pub struct $name(pub f64);

        impl $name {
            pub fn new(value: f64) -> Self {
                Self(value)
            }

            pub fn get(self) -> f64 {
                self.0
            }
        }

        impl From<f64> for $name {
            fn from(value: f64) -> Self {
                Self(value)
            }
        }

        impl Neg for $name {
            type Output = $name;
            fn neg(self) -> $name {
                $name(-self.0)
            }
        }
    };
}

scalar_newtype!(Length);
scalar_newtype!(Mass);
scalar_newtype!(TimePoint);
scalar_newtype!(Duration);
scalar_newtype!(Speed);

// Length <-> Length
impl Add for Length {
    type Output = Length;
    fn add(self, rhs: Length) -> Length {
        Length(self.0 + rhs.0)
    }
}
impl Sub for Length {
    type Output = Length;
    fn sub(self, rhs: Length) -> Length {
        Length(self.0 - rhs.0)
    }
}

// Speed * Duration = Length
impl Mul<Duration> for Speed {
    type Output = Length;
    fn mul(self, rhs: Duration) -> Length {
        Length(self.0 * rhs.0)
    }
}

// Length / Duration = Speed
impl Div<Duration> for Length {
    type Output = Speed;
    fn div(self, rhs: Duration) -> Speed {
        Speed(self.0 / rhs.0)
    }
}

// Length / Speed = Duration (distance to close at a given rate)
impl Div<Speed> for Length {
    type Output = Duration;
    fn div(self, rhs: Speed) -> Duration {
        Duration(self.0 / rhs.0)
    }
}

// TimePoint - TimePoint = Duration
impl Sub for TimePoint {
    type Output = Duration;
    fn sub(self, rhs: TimePoint) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

// TimePoint + Duration = TimePoint
impl Add<Duration> for TimePoint {
    type Output = TimePoint;
    fn add(self, rhs: Duration) -> TimePoint {
        TimePoint(self.0 + rhs.0)
    }
}

// Duration <-> Duration
impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration(self.0 + rhs.0)
    }
}
impl Sub for Duration {
    type Output = Duration;
    fn sub(self, rhs: Duration) -> Duration {
        Duration(self.0 - rhs.0)
    }
}
