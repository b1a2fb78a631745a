//! Component H: the parameter registry. Every `(n, q)` pair this crate
//! supports is enumerated in `ParamId`; `ParamSet::get` builds (once)
//! and returns the immutable record of tables and constants that
//! drives every other component.

use std::sync::OnceLock;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_core::RngCore;
use sha1::{Digest, Sha1};

use crate::arith::CongruenceClass;
use crate::bluestein::BluesteinEngine;
use crate::twisted::TwistedEngine;

/// The nine supported `(n, q)` pairs. Even `n` uses the twisted NTT;
/// odd (prime) `n` uses Bluestein and requires the cyclotomic fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    N256Q15361,
    N337Q32353,
    N433Q35507,
    N512Q25601,
    N541Q41117,
    N631Q44171,
    N739Q47297,
    N821Q49261,
    N1024Q40961,
}

impl ParamId {
    pub const ALL: [ParamId; 9] = [
        ParamId::N256Q15361,
        ParamId::N337Q32353,
        ParamId::N433Q35507,
        ParamId::N512Q25601,
        ParamId::N541Q41117,
        ParamId::N631Q44171,
        ParamId::N739Q47297,
        ParamId::N821Q49261,
        ParamId::N1024Q40961,
    ];

    fn nq(self) -> (usize, u64) {
        match self {
            ParamId::N256Q15361 => (256, 15361),
            ParamId::N337Q32353 => (337, 32353),
            ParamId::N433Q35507 => (433, 35507),
            ParamId::N512Q25601 => (512, 25601),
            ParamId::N541Q41117 => (541, 41117),
            ParamId::N631Q44171 => (631, 44171),
            ParamId::N739Q47297 => (739, 47297),
            ParamId::N821Q49261 => (821, 49261),
            ParamId::N1024Q40961 => (1024, 40961),
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|id| *id == self).unwrap()
    }

    /// Recover a `ParamId` from the `(n, q)` pair carried in a wire
    /// descriptor. Returns `None` for anything this build doesn't
    /// recognize.
    pub fn from_nq(n: u32, q: u32) -> Option<ParamId> {
        Self::ALL.into_iter().find(|id| {
            let (tn, tq) = id.nq();
            tn as u32 == n && tq as u32 == q
        })
    }
}

/// Forward/inverse NTT dispatch. Replaces the reference's per-parameter
/// function pointer pair with a sum type, so callers monomorphize on a
/// closed set of variants instead of paying an indirect call.
#[derive(Debug, Clone)]
pub enum NttEngine {
    Twisted(TwistedEngine),
    Bluestein(BluesteinEngine),
}

impl NttEngine {
    pub fn forward(&self, x: &mut [u64]) {
        match self {
            NttEngine::Twisted(e) => e.forward(x),
            NttEngine::Bluestein(e) => e.forward(x),
        }
    }

    pub fn inverse(&self, x: &mut [u64]) {
        match self {
            NttEngine::Twisted(e) => e.inverse(x),
            NttEngine::Bluestein(e) => e.inverse(x),
        }
    }
}

/// Rejection-sampling parameters for secrets drawn uniform in
/// `[-B, B]`. `B` is fixed across parameter sets rather than tuned per
/// `q` — the reference's per-set `B` table was not part of the
/// retrieved source, so this build picks the smallest bound wide
/// enough to support meaningful Ring-LWE noise (`B = 2`) and documents
/// the choice instead of inventing per-parameter numbers with no
/// grounding.
#[derive(Debug, Clone)]
pub struct SamplerParams {
    pub log2b: u32,
    pub bmask: u64,
    /// number of accepted residues `l < bb` out of `2^log2b`
    pub bb: u64,
    /// maps accepted index `l` to its residue `(l as i64 - B) mod q`
    pub small_coeff_table: Vec<u64>,
}

/// Reconciliation thresholds, all derived arithmetically from `q`
/// (see DESIGN.md for the derivation of the `3q/8`-style fractions).
#[derive(Debug, Clone, Copy)]
pub struct ReconcileParams {
    pub qmod4: u64,
    pub q_1_4: u64,
    pub q_2_4: u64,
    pub q_3_4: u64,
    pub r0_l: u64,
    pub r0_u: u64,
    pub r1_l: u64,
    pub r1_u: u64,
}

#[derive(Debug, Clone)]
pub struct ParamSet {
    pub id: ParamId,
    pub n: usize,
    pub q: u64,
    pub class: CongruenceClass,
    pub engine: NttEngine,
    /// fixed public polynomial, already in Fourier domain
    pub a: Vec<u64>,
    pub sampler: SamplerParams,
    pub reconcile: ReconcileParams,
    pub muwords: usize,
    pub descriptor: [u8; 32],
}

const SAMPLER_B: i64 = 2;

fn build_sampler_params(q: u64) -> SamplerParams {
    let width = (2 * SAMPLER_B + 1) as u64; // number of accepted residues
    let mut log2b = 0u32;
    while (1u64 << log2b) < width {
        log2b += 1;
    }
    let bmask = (1u64 << log2b) - 1;
    let mut small_coeff_table = vec![0u64; 1usize << log2b];
    for l in 0..width {
        let signed = l as i64 - SAMPLER_B;
        let residue = if signed < 0 { q as i64 + signed } else { signed };
        small_coeff_table[l as usize] = residue as u64;
    }
    SamplerParams { log2b, bmask, bb: width, small_coeff_table }
}

fn build_reconcile_params(q: u64) -> ReconcileParams {
    let qmod4 = q % 4;
    let q_1_4 = q / 4;
    let q_2_4 = q / 2;
    let q_3_4 = (3 * q) / 4;
    ReconcileParams {
        qmod4,
        q_1_4,
        q_2_4,
        q_3_4,
        r0_l: (3 * q) / 8,
        r0_u: (7 * q) / 8,
        r1_l: q / 8,
        r1_u: (5 * q) / 8,
    }
}

fn derive_a(id: ParamId, n: usize, q: u64, class: &CongruenceClass, engine: &NttEngine) -> Vec<u64> {
    let mut seed = [0u8; 32];
    seed[0..4].copy_from_slice(b"RLWA");
    seed[4..8].copy_from_slice(&(n as u32).to_be_bytes());
    seed[8..12].copy_from_slice(&(q as u32).to_be_bytes());
    seed[12] = id.index() as u8;

    let mut rng = ChaCha20Rng::from_seed(seed);
    let mut a = vec![0u64; n];
    for c in a.iter_mut() {
        *c = rng.next_u64() % class.q();
    }
    if n % 2 == 1 {
        a[n - 1] = 0;
    }
    engine.forward(&mut a);
    a
}

fn build_descriptor(n: usize, q: u64, a: &[u64]) -> [u8; 32] {
    let mut hasher = Sha1::new();
    for &c in a {
        hasher.update(c.to_le_bytes());
    }
    let digest = hasher.finalize();

    let mut descriptor = [0u8; 32];
    descriptor[0..4].copy_from_slice(b"RLWE");
    descriptor[4..8].copy_from_slice(&(n as u32).to_be_bytes());
    descriptor[8..12].copy_from_slice(&(q as u32).to_be_bytes());
    descriptor[12..32].copy_from_slice(&digest);
    descriptor
}

fn build(id: ParamId) -> ParamSet {
    let (n, q) = id.nq();
    log::debug!("building parameter set {id:?} (n={n}, q={q})");
    let class = CongruenceClass::new(q);

    let engine = if n % 2 == 0 {
        NttEngine::Twisted(TwistedEngine::new(n, q))
    } else {
        NttEngine::Bluestein(BluesteinEngine::new(n, q))
    };

    let a = derive_a(id, n, q, &class, &engine);
    let descriptor = build_descriptor(n, q, &a);
    let muwords = n.div_ceil(64);

    ParamSet {
        id,
        n,
        q,
        class,
        engine,
        a,
        sampler: build_sampler_params(q),
        reconcile: build_reconcile_params(q),
        muwords,
        descriptor,
    }
}

macro_rules! param_slot {
    () => {
        OnceLock::new()
    };
}

static SLOTS: [OnceLock<ParamSet>; 9] = [
    param_slot!(),
    param_slot!(),
    param_slot!(),
    param_slot!(),
    param_slot!(),
    param_slot!(),
    param_slot!(),
    param_slot!(),
    param_slot!(),
];

impl ParamSet {
    pub fn get(id: ParamId) -> &'static ParamSet {
        SLOTS[id.index()].get_or_init(|| build(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_param_set_builds_and_caches() {
        for id in ParamId::ALL {
            let p1 = ParamSet::get(id);
            let p2 = ParamSet::get(id);
            assert!(std::ptr::eq(p1, p2));
            assert_eq!(p1.a.len(), p1.n);
        }
    }

    #[test]
    fn descriptor_round_trips_through_from_nq() {
        let p = ParamSet::get(ParamId::N337Q32353);
        let recovered = ParamId::from_nq(p.n as u32, p.q as u32).unwrap();
        assert_eq!(recovered, ParamId::N337Q32353);
    }

    #[test]
    fn sampler_table_covers_expected_residues() {
        let p = ParamSet::get(ParamId::N256Q15361);
        let expected: Vec<u64> = vec![p.q - 2, p.q - 1, 0, 1, 2];
        assert_eq!(&p.sampler.small_coeff_table[..5], &expected[..]);
    }
}
