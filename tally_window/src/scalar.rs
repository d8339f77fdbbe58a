// Copyright 2025 the Tally Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scalar abstraction for row heights, offsets, and scroll positions.

use core::fmt::Debug;
use core::ops::{Add, Div, Mul, Sub};

/// A floating point type usable as a pixel coordinate.
///
/// Implemented for `f32` and `f64`. All operations are available in `core`,
/// so the crate stays `no_std` without pulling in `libm`.
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// The additive identity.
    fn zero() -> Self;

    /// Converts a row count or index into this scalar.
    fn from_usize(value: usize) -> Self;

    /// Returns `true` if the value is neither infinite nor NaN.
    fn is_finite(self) -> bool;

    /// Returns `true` for negative values, including `-0.0`.
    fn is_sign_negative(self) -> bool;

    /// The larger of `self` and `other`.
    #[must_use]
    fn max(self, other: Self) -> Self;

    /// The smaller of `self` and `other`.
    #[must_use]
    fn min(self, other: Self) -> Self;

    /// Rounds toward negative infinity and converts to `isize`, saturating.
    fn floor_to_isize(self) -> isize;
}

macro_rules! impl_scalar {
    ($ty:ty) => {
        impl Scalar for $ty {
            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            #[allow(
                clippy::cast_precision_loss,
                reason = "Row counts beyond the mantissa range are not meaningful pixel positions"
            )]
            fn from_usize(value: usize) -> Self {
                value as $ty
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$ty>::is_finite(self)
            }

            #[inline]
            fn is_sign_negative(self) -> bool {
                <$ty>::is_sign_negative(self)
            }

            #[inline]
            fn max(self, other: Self) -> Self {
                <$ty>::max(self, other)
            }

            #[inline]
            fn min(self, other: Self) -> Self {
                <$ty>::min(self, other)
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                reason = "`as` saturates and callers clamp the result to a row range"
            )]
            fn floor_to_isize(self) -> isize {
                let truncated = self as isize;
                if (truncated as $ty) > self {
                    truncated.saturating_sub(1)
                } else {
                    truncated
                }
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);
