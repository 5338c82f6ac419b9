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

#![forbid(unsafe_code)]

#[cfg(test)]
extern crate quickcheck;
#[cfg(test)]
#[macro_use]
extern crate quickcheck_macros;

/// Implementation of Rabin's Information Dispersal Algorithm.
pub mod ida;

pub use ida::{
    consistent, fragment, fragment_with,
    gf::{FieldElem, FieldPrimitive, MAX_VAL, PRIME},
    matrix::Matrix,
    reconstruct, Error, Frag,
};
