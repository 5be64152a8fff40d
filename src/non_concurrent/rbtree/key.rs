use std::cmp::Ordering;
use std::fmt::Debug;

/// An unsigned integer usable as a tree key.
///
/// Besides the usual magnitude ordering (from [`Ord`]), every key type knows how to compare
/// itself against another key as a *wrapping counter*: `a` comes before `b` iff the
/// two's-complement difference `a - b`, reinterpreted as a signed integer of the same width,
/// is negative. This is what lets a monotonically increasing clock keep its order after it
/// wraps around `MAX`, as long as all live keys are within half the domain of each other.
pub trait RbKey: Copy + Ord + Default + Debug {
    /// Compare `self` against `other` as wrapping counters.
    fn wrapping_cmp(self, other: Self) -> Ordering;
}

macro_rules! impl_rb_key {
    ($($unsigned:ty => $signed:ty),* $(,)?) => {
        $(
            impl RbKey for $unsigned {
                #[inline]
                fn wrapping_cmp(self, other: Self) -> Ordering {
                    // the `as` cast reinterprets the bits, it never saturates
                    (self.wrapping_sub(other) as $signed).cmp(&0)
                }
            }
        )*
    };
}

impl_rb_key! {
    u8 => i8,
    u16 => i16,
    u32 => i32,
    u64 => i64,
    u128 => i128,
    usize => isize,
}
