//! Component E: rejection sampling of short secrets, ported from
//! `sample_secret` in the reference source. Consumes random 64-bit
//! words `LOG2B` bits at a time, refreshing once a word is exhausted.

use crate::params::ParamSet;
use crate::rand_source::RandomSource;

/// Fill `out` (length `p.n`) with coefficients drawn uniform in
/// `[-B, B]`, represented as residues mod `q`. For odd (prime) `n`
/// the last coefficient is pinned to zero to stay in the cyclotomic
/// subspace.
pub fn sample_secret(out: &mut [u64], p: &ParamSet, rng: &mut dyn RandomSource) {
    debug_assert_eq!(out.len(), p.n);

    let loop_limit = if p.n % 2 == 1 {
        out[p.n - 1] = 0;
        p.n - 1
    } else {
        p.n
    };

    let log2b = p.sampler.log2b as u64;
    let draws_per_word = 64 / log2b;

    let mut i = 0usize;
    let mut r = rng.next_word();
    let mut drawn = 0u64;

    while i < loop_limit {
        let l = r & p.sampler.bmask;
        if l < p.sampler.bb {
            out[i] = p.sampler.small_coeff_table[l as usize];
            i += 1;
        }
        drawn += 1;
        if drawn >= draws_per_word {
            r = rng.next_word();
            drawn = 0;
        } else {
            r >>= log2b;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn sampled_coefficients_are_canonical_and_bounded() {
        let p = ParamSet::get(ParamId::N256Q15361);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut s = vec![0u64; p.n];
        sample_secret(&mut s, p, &mut rng);

        for &c in &s {
            assert!(c < p.q);
            assert!(c <= 2 || c >= p.q - 2);
        }
    }

    #[test]
    fn odd_n_pins_last_coefficient() {
        let p = ParamSet::get(ParamId::N337Q32353);
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut s = vec![0u64; p.n];
        sample_secret(&mut s, p, &mut rng);
        assert_eq!(s[p.n - 1], 0);
    }

    #[test]
    fn all_zero_stream_fills_every_coefficient_with_table_zero() {
        struct AllZero;
        impl RandomSource for AllZero {
            fn next_word(&mut self) -> u64 {
                0
            }
        }
        let p = ParamSet::get(ParamId::N256Q15361);
        let mut rng = AllZero;
        let mut s = vec![1u64; p.n];
        sample_secret(&mut s, p, &mut rng);
        assert!(s.iter().all(|&c| c == p.sampler.small_coeff_table[0]));
    }
}
