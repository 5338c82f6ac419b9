/*
 * disperse: information dispersal for fault-tolerant storage and routing
 * Copyright (C) 2024-2026 The disperse authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::{
    fmt,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};

use once_cell::sync::Lazy;
use rand::Rng;

/// Primitive uint type for FieldElems.
pub type FieldPrimitive = u32;

/// Order of the field. 65537 is the prime Rabin suggests for the dispersal
/// construction: the smallest prime above `2^16`, so every 16-bit data word
/// is a distinct field value and every element fits in 17 bits.
pub const PRIME: FieldPrimitive = 65537;

/// The largest element value, `PRIME - 1`.
pub const MAX_VAL: FieldPrimitive = PRIME - 1;

// Multiplicative inverses of every element, with 0 mapped to the 0 sentinel.
// Built with the prefix recurrence: writing PRIME = q*a + r with 0 < r < a
// and reducing mod PRIME gives q*a == -r, so inv(a) == -q * inv(r), and
// r < a means inv(r) is already in the table.
static INVTAB: Lazy<Vec<FieldPrimitive>> = Lazy::new(|| {
    let p = PRIME as u64;
    let mut tab = vec![0; PRIME as usize];
    tab[1] = 1;
    for a in 2..PRIME as usize {
        let q = p / a as u64;
        let r = (p % a as u64) as usize;
        tab[a] = ((p - q) * tab[r] as u64 % p) as FieldPrimitive;
    }
    tab
});

/// An element of `GF(65537)`, the prime field underlying the dispersal
/// arithmetic.
///
/// Canonical values live in `[0, MAX_VAL]` and fit in 17 bits, so a `u32`
/// holds any element; products are widened to 64 bits before reduction. The
/// arithmetic operators expect canonical operands, so raw values restored
/// via [`FieldElem::from_inner`] must pass through [`consistent`] before
/// being fed to anything that computes.
///
/// [`consistent`]: crate::consistent
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub struct FieldElem(FieldPrimitive);

impl FieldElem {
    /// Additive identity.
    pub const ZERO: FieldElem = FieldElem(0);

    /// Multiplicative identity.
    pub const ONE: FieldElem = FieldElem(1);

    /// The largest element, `MAX_VAL`. It is its own multiplicative inverse.
    pub const MAX: FieldElem = FieldElem(MAX_VAL);

    /// A uniformly random element in `[0, MAX_VAL]`.
    pub fn new_rand<R: Rng + ?Sized>(r: &mut R) -> Self {
        Self(r.gen_range(0..PRIME))
    }

    pub fn inner(&self) -> FieldPrimitive {
        self.0
    }

    /// Wraps a raw integer without reduction, so that marshalling code can
    /// restore stored values verbatim. Out-of-range values are implausible
    /// rather than unrepresentable; [`consistent`](crate::consistent)
    /// rejects fragments carrying them.
    pub fn from_inner(v: FieldPrimitive) -> Self {
        Self(v)
    }

    /// Multiplicative inverse, from the one-time table.
    ///
    /// Zero has no inverse; the table holds 0 there as a sentinel, so a
    /// division by zero yields a zero product instead of a panic. Callers
    /// are expected never to divide by zero in the first place.
    pub fn inverse(self) -> Self {
        Self(INVTAB[self.0 as usize])
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for FieldElem {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        Self(FieldPrimitive::arbitrary(g) % PRIME)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

impl fmt::Display for FieldElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Add for FieldElem {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for FieldElem {
    fn add_assign(&mut self, rhs: Self) {
        // Canonical operands sum to at most 2 * MAX_VAL, well within u32.
        self.0 = (self.0 + rhs.0) % PRIME;
    }
}

impl Sub for FieldElem {
    type Output = Self;
    fn sub(mut self, rhs: Self) -> Self::Output {
        self -= rhs;
        self
    }
}

impl SubAssign for FieldElem {
    fn sub_assign(&mut self, rhs: Self) {
        // Adding PRIME first keeps the difference non-negative.
        self.0 = (self.0 + PRIME - rhs.0) % PRIME;
    }
}

impl Neg for FieldElem {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self((PRIME - self.0) % PRIME)
    }
}

impl Mul for FieldElem {
    type Output = Self;
    fn mul(mut self, rhs: Self) -> Self::Output {
        self *= rhs;
        self
    }
}

impl MulAssign for FieldElem {
    fn mul_assign(&mut self, rhs: Self) {
        // Products need up to 34 bits before reduction.
        self.0 = (u64::from(self.0) * u64::from(rhs.0) % u64::from(PRIME)) as FieldPrimitive;
    }
}

impl Div for FieldElem {
    type Output = Self;
    fn div(mut self, rhs: Self) -> Self::Output {
        self /= rhs;
        self
    }
}

impl DivAssign for FieldElem {
    fn div_assign(&mut self, rhs: Self) {
        #![allow(clippy::suspicious_op_assign_impl)]
        *self *= rhs.inverse()
    }
}
