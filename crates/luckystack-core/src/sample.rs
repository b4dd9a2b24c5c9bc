//! Pixel sample representations.
//!
//! All numerical work runs in `f64`. A [`Sample`] knows how to widen itself
//! into that working precision and how to come back, rounding and saturating
//! for integer types.

use std::fmt::Debug;

use num_traits::{Bounded, NumCast, ToPrimitive};

pub trait Sample: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Widen to the working precision.
    fn to_working(self) -> f64;

    /// Narrow from the working precision. Integer types round half away from
    /// zero and saturate at their bounds; NaN becomes zero.
    fn from_working(value: f64) -> Self;
}

macro_rules! integer_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn to_working(self) -> f64 {
                    ToPrimitive::to_f64(&self).unwrap_or(0.0)
                }

                #[inline]
                fn from_working(value: f64) -> Self {
                    let lo = ToPrimitive::to_f64(&<$t as Bounded>::min_value()).unwrap_or(0.0);
                    let hi = ToPrimitive::to_f64(&<$t as Bounded>::max_value()).unwrap_or(0.0);
                    <$t as NumCast>::from(value.round().clamp(lo, hi)).unwrap_or_default()
                }
            }
        )*
    };
}

integer_sample!(u8, u16, u32);

impl Sample for f32 {
    #[inline]
    fn to_working(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_working(value: f64) -> Self {
        value as f32
    }
}

impl Sample for f64 {
    #[inline]
    fn to_working(self) -> f64 {
        self
    }

    #[inline]
    fn from_working(value: f64) -> Self {
        value
    }
}
