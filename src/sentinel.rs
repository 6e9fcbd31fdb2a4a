// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Poison values: one canonical "impossible" value per element type.
//!
//! Every slot past the live prefix of a stack holds its type's poison value.
//! If anything writes past the top of the stack, or a popped slot is touched
//! after the fact, the next validation pass sees a slot that no longer matches
//! and reports it.
//!
//! Selection is static. A type opts in by implementing [`Sentinel`], either by
//! hand or through the [`sentinel!`](crate::sentinel!) macro. There is no
//! runtime type inspection, so an element type without a registration simply
//! doesn't compile.
//!
//! # Built-in registrations
//!
//! | Types                                 | Poison      | Comparison           |
//! |---------------------------------------|-------------|----------------------|
//! | `i16` `i32` `i64` `i128` `isize`      | `-661`      | exact                |
//! | `i8`                                  | `i8::MIN`   | exact                |
//! | `u16` `u32` `u64` `usize`             | `MAX`       | exact                |
//! | `u8`                                  | `0`         | exact                |
//! | `char`                                | `'\0'`      | exact                |
//! | `f32` `f64`                           | `1111.1111` | within `1e-6`        |
//! | `String` `&'static str`               | `""`        | empty string         |

use std::fmt;

/// Poison for signed integers wide enough to hold it.
pub const POISON_INT: i16 = -661;

/// Poison for floating point element types.
pub const POISON_FLOAT: f64 = 1111.1111;

/// Tolerance used when comparing floats against their poison.
pub const FLOAT_EPSILON: f64 = 1e-6;

/// An element type with a registered poison value.
///
/// `TYPE_TAG` names the type for diagnostics and feeds the checksum
/// signature, so two registrations should not share a tag.
pub trait Sentinel: Clone + fmt::Debug {
    /// Stable identity string for this element type.
    const TYPE_TAG: &'static str;

    /// The value written into every unused slot.
    fn poison() -> Self;

    /// Whether `self` matches the poison value (with tolerance where the type needs it).
    fn is_poison(&self) -> bool;

    /// Checksum signature derived from [`Self::TYPE_TAG`].
    fn signature() -> u64 {
        type_signature(Self::TYPE_TAG)
    }
}

/// CRC32 of a type tag, widened to the checksum word.
pub fn type_signature(tag: &str) -> u64 {
    u64::from(crc32fast::hash(tag.as_bytes()))
}

/// Tolerant float comparison: `|a - b| < epsilon`.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// Register a [`Sentinel`] implementation for a type.
///
/// ```
/// #[derive(Debug, Clone, PartialEq)]
/// struct Ticket(u32);
///
/// guardstack::sentinel!(Ticket => Ticket(u32::MAX));
///
/// use guardstack::Sentinel;
/// assert!(Ticket(u32::MAX).is_poison());
/// assert!(!Ticket(7).is_poison());
/// ```
///
/// Numeric types that convert losslessly into `f64` can use an epsilon match:
///
/// ```ignore
/// guardstack::sentinel!(Celsius => Celsius(-999.0), within 1e-3);
/// ```
#[macro_export]
macro_rules! sentinel {
    ($ty:ty => $poison:expr) => {
        impl $crate::Sentinel for $ty {
            const TYPE_TAG: &'static str = stringify!($ty);

            fn poison() -> Self {
                $poison
            }

            fn is_poison(&self) -> bool {
                *self == <Self as $crate::Sentinel>::poison()
            }
        }
    };
    ($ty:ty => $poison:expr, within $epsilon:expr) => {
        impl $crate::Sentinel for $ty {
            const TYPE_TAG: &'static str = stringify!($ty);

            fn poison() -> Self {
                $poison
            }

            fn is_poison(&self) -> bool {
                $crate::sentinel::approx_eq(
                    f64::from(*self),
                    f64::from(<Self as $crate::Sentinel>::poison()),
                    $epsilon,
                )
            }
        }
    };
}

sentinel!(i8 => i8::MIN);
sentinel!(i16 => POISON_INT);
sentinel!(i32 => i32::from(POISON_INT));
sentinel!(i64 => i64::from(POISON_INT));
sentinel!(i128 => i128::from(POISON_INT));
sentinel!(isize => isize::from(POISON_INT));

sentinel!(u8 => 0);
sentinel!(u16 => u16::MAX);
sentinel!(u32 => u32::MAX);
sentinel!(u64 => u64::MAX);
sentinel!(usize => usize::MAX);

sentinel!(char => '\0');

sentinel!(f32 => POISON_FLOAT as f32, within FLOAT_EPSILON);
sentinel!(f64 => POISON_FLOAT, within FLOAT_EPSILON);

impl Sentinel for String {
    const TYPE_TAG: &'static str = "String";

    fn poison() -> Self {
        String::new()
    }

    fn is_poison(&self) -> bool {
        self.is_empty()
    }
}

impl Sentinel for &'static str {
    const TYPE_TAG: &'static str = "&str";

    fn poison() -> Self {
        ""
    }

    fn is_poison(&self) -> bool {
        self.is_empty()
    }
}
