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

use crate::ida::gf::{FieldElem, FieldPrimitive, MAX_VAL};

/// One fragment of a dispersed byte buffer.
///
/// A fragment is produced by a single [`fragment`](crate::fragment) call and
/// never mutated afterwards. Every field is public so that any marshalling
/// scheme can store and restore a fragment verbatim; all four fields must
/// survive the round trip for [`reconstruct`](crate::reconstruct) to work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frag {
    /// Byte length of the original data.
    pub len: usize,

    /// Minimum number of distinct fragments needed for reconstruction.
    pub m: u32,

    /// This fragment's row of the encoding matrix, `m` values in
    /// `[1, MAX_VAL]`.
    pub a: Vec<FieldElem>,

    /// Encoded words, `ceil(ceil(len / 2) / m)` of them, each in
    /// `[0, MAX_VAL]`.
    pub enc: Vec<FieldPrimitive>,
}

impl Frag {
    /// Number of encoded words a fragment with this `len` and `m` carries.
    pub fn expected_enc_len(&self) -> usize {
        if self.m == 0 {
            return 0;
        }
        let nw = (self.len + 1) / 2;
        (nw + self.m as usize - 1) / self.m as usize
    }

    // Implausible element values mark a fragment that cannot have come out
    // of the encoder: a short or long coefficient row, a zero or
    // out-of-range coefficient, or an encoded word outside the field.
    pub(crate) fn plausible(&self) -> bool {
        self.a.len() == self.m as usize
            && self.a.iter().all(|x| (1..=MAX_VAL).contains(&x.inner()))
            && self.enc.iter().all(|&v| v <= MAX_VAL)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Frag {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let m = u32::arbitrary(g) % 9;
        Self {
            len: usize::arbitrary(g) % 1024,
            m,
            a: (0..u8::arbitrary(g) % 9)
                .map(|_| FieldElem::arbitrary(g))
                .collect(),
            enc: Vec::arbitrary(g),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn expected_enc_len_rounds_up_twice() {
        let frag = |len, m| Frag {
            len,
            m,
            a: vec![],
            enc: vec![],
        };
        assert_eq!(frag(0, 3).expected_enc_len(), 0);
        assert_eq!(frag(1, 1).expected_enc_len(), 1);
        assert_eq!(frag(5, 2).expected_enc_len(), 2);
        assert_eq!(frag(1024, 7).expected_enc_len(), 74);
        assert_eq!(frag(1023, 7).expected_enc_len(), 74);
    }

    #[test]
    fn plausibility_checks_ranges() {
        let good = Frag {
            len: 4,
            m: 2,
            a: vec![FieldElem::ONE, FieldElem::MAX],
            enc: vec![0, MAX_VAL],
        };
        assert!(good.plausible());

        let mut zero_coeff = good.clone();
        zero_coeff.a[0] = FieldElem::ZERO;
        assert!(!zero_coeff.plausible());

        let mut wide_coeff = good.clone();
        wide_coeff.a[0] = FieldElem::from_inner(MAX_VAL + 1);
        assert!(!wide_coeff.plausible());

        let mut wide_word = good.clone();
        wide_word.enc[0] = MAX_VAL + 1;
        assert!(!wide_word.plausible());

        let mut short_row = good;
        short_row.a.pop();
        assert!(!short_row.plausible());
    }
}
