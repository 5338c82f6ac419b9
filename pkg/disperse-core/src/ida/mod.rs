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

//! Rabin's Information Dispersal Algorithm (IDA) over the prime field
//! `GF(65537)`.
//!
//! [`fragment`] encodes a byte buffer into one [`Frag`]; calling it `n`
//! times yields `n` independent fragments, and any `m` distinct ones passed
//! to [`reconstruct`] rebuild the original bytes exactly. Each fragment
//! carries roughly `1/m` of the data volume, so the scheme tolerates the
//! loss of `n - m` fragments at a storage overhead of `n / m`. Dispersal is
//! not encryption: a lone fragment reveals no individual plaintext byte,
//! but no confidentiality guarantee is made.
//!
//! [`consistent`] filters a bag of fragments of mixed provenance down to a
//! subset that agrees on the encoding parameters, dropping garbled and
//! implausible entries along the way.
//!
//! The construction is from M. Rabin, "Efficient Dispersal of Information
//! for Security, Load Balancing, and Fault Tolerance", JACM 36(2), April
//! 1989; the field order 65537 is the prime suggested there.

mod frag;
pub mod gf;
pub mod matrix;

pub use self::frag::Frag;

use self::gf::{FieldElem, FieldPrimitive};
use self::matrix::Matrix;

use rand::Rng;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("too few fragments")]
    TooFewFragments,

    #[error("inconsistent encoding matrix for reconstruction")]
    InconsistentMatrix,

    #[error("inconsistent fragment")]
    InconsistentFragment,

    #[error("corrupt output: impossible value")]
    CorruptOutput,

    #[error("cannot find stable parameter values in this set")]
    UnstableParameters,

    #[error("no consistent set found")]
    NoConsistency,

    #[error("invalid decoding matrix: {0}")]
    InvalidMatrix(#[from] matrix::Error),
}

/// Encodes `data` into a single fragment, of which at least `m` distinct
/// ones will be needed to reconstruct the original bytes.
///
/// Every call draws a fresh random coefficient row, so redundancy comes
/// from calling this repeatedly: produce as many fragments as there are
/// independent channels or stores, and any `m` of them suffice.
///
/// Coefficients come from [`rand::thread_rng`]; use [`fragment_with`] to
/// pin the generator instead.
///
/// # Panics
/// Panics if `m` is zero.
pub fn fragment(data: &[u8], m: u32) -> Frag {
    fragment_with(data, m, &mut rand::thread_rng())
}

/// Exactly [`fragment`], drawing coefficients from the supplied generator.
///
/// The generator does not need to be cryptographically strong; the scheme
/// only needs the coefficient rows of distinct fragments to be independent.
///
/// # Panics
/// Panics if `m` is zero.
pub fn fragment_with<R: Rng + ?Sized>(data: &[u8], m: u32, rng: &mut R) -> Frag {
    assert!(m > 0, "reconstruction threshold must be at least 1");
    let rows = m as usize;

    // A zero coefficient would blind the fragment to one word in every
    // group, so zeros are redrawn.
    let a = (0..rows)
        .map(|_| {
            let mut elem = FieldElem::ZERO;
            while elem == FieldElem::ZERO {
                elem = FieldElem::new_rand(rng);
            }
            elem
        })
        .collect::<Vec<_>>();

    // The data is a stream of 16-bit big-endian words; an odd final byte
    // occupies the high half of the last word.
    let mut words = data.chunks(2).map(|pair| {
        let hi = (pair[0] as FieldPrimitive) << 8;
        let lo = pair.get(1).copied().unwrap_or(0) as FieldPrimitive;
        FieldElem::from_inner(hi | lo)
    });

    let nw = (data.len() + 1) / 2;
    let nenc = (nw + rows - 1) / rows;
    let mut enc = Vec::with_capacity(nenc);
    for _ in 0..nenc {
        // Each encoded word is the dot product of the coefficient row with
        // the next group of m data words, zero past the end of the data.
        let mut c = FieldElem::ZERO;
        for &aj in &a {
            match words.next() {
                Some(w) => c += w * aj,
                None => break,
            }
        }
        enc.push(c.inner());
    }

    Frag {
        len: data.len(),
        m,
        a,
        enc,
    }
}

/// Rebuilds the original byte buffer from a consistent set of fragments.
///
/// The first `m` fragments (`m` as declared by the first one) supply the
/// encoding matrix and the encoded words; any further fragments are spare.
/// The set is assumed to be mutually consistent and is only shallowly
/// validated here; pass collections of doubtful provenance through
/// [`consistent`] first.
pub fn reconstruct(frags: &[Frag]) -> Result<Vec<u8>, Error> {
    let first = frags.first().ok_or(Error::TooFewFragments)?;
    let m = first.m as usize;
    if frags.len() < m {
        return Err(Error::TooFewFragments);
    }
    let fraglen = first.enc.len();
    let dlen = first.len;

    let used = &frags[..m];
    for f in used {
        if f.a.len() != m {
            return Err(Error::InconsistentMatrix);
        }
        if f.enc.len() != fraglen || f.len != dlen {
            return Err(Error::InconsistentFragment);
        }
    }

    let encoding = Matrix::from_rows(used.iter().map(|f| f.a.as_slice()))?;
    let inverse = encoding.invert()?;

    let mut out = Vec::with_capacity(fraglen * 2 * m);
    for k in 0..fraglen {
        for i in 0..m {
            let mut b = FieldElem::ZERO;
            for (j, f) in used.iter().enumerate() {
                b += FieldElem::from_inner(f.enc[k]) * inverse.get(i, j);
            }
            let w = b.inner();
            // Source words are 16 bits, so a 17-bit result means at least
            // one encoded value is inconsistent with any valid original.
            if w >> 16 != 0 {
                return Err(Error::CorruptOutput);
            }
            out.push((w >> 8) as u8);
            out.push(w as u8);
        }
    }
    out.truncate(dlen);
    Ok(out)
}

// Parameter occurrence counts. A healthy fragment set agrees on one value
// per parameter and a damaged one splits across a handful, so a linear scan
// over a short vector suffices. Ties go to the value that reached the top
// count first, making the vote deterministic for a given input order.
fn tally(counts: &mut Vec<(usize, usize)>, v: usize) {
    for entry in counts.iter_mut() {
        if entry.0 == v {
            entry.1 += 1;
            return;
        }
    }
    counts.push((v, 1));
}

fn majority(counts: &[(usize, usize)]) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for &(v, n) in counts {
        if best.map_or(true, |(_, bn)| n > bn) {
            best = Some((v, n));
        }
    }
    best.map(|(v, _)| v)
}

/// Returns the subset of `frags` that agrees with the majority on every
/// encoding parameter, with implausible fragments dropped.
///
/// Missing entries (`None`) are tolerated and skipped. The majority vote
/// covers the original length, the threshold `m`, and the encoded-word
/// count; a surviving fragment matches all three and carries only in-range
/// element values. The input is never mutated, and survivors keep their
/// input order.
///
/// Survival does not by itself guarantee reconstructibility: fewer than `m`
/// fragments may survive, in which case [`reconstruct`] reports
/// [`Error::TooFewFragments`].
pub fn consistent(frags: &[Option<Frag>]) -> Result<Vec<Frag>, Error> {
    let mut lens = Vec::new();
    let mut ms = Vec::new();
    let mut enc_lens = Vec::new();
    for f in frags.iter().flatten() {
        tally(&mut lens, f.len);
        tally(&mut ms, f.m as usize);
        tally(&mut enc_lens, f.enc.len());
    }

    let (dlen, m, enc_len) = match (majority(&lens), majority(&ms), majority(&enc_lens)) {
        (Some(d), Some(m), Some(e)) => (d, m, e),
        _ => return Err(Error::UnstableParameters),
    };

    let survivors = frags
        .iter()
        .flatten()
        .filter(|f| f.len == dlen && f.m as usize == m && f.enc.len() == enc_len && f.plausible())
        .cloned()
        .collect::<Vec<_>>();
    if survivors.is_empty() {
        return Err(Error::NoConsistency);
    }
    Ok(survivors)
}
