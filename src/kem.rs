//! Component G: KEM orchestration plus the session layer from
//! `ringlwe_key.c` (`RINGLWE_compute_key_alice`/`_bob`), wiring
//! sampling, NTT multiplication, and reconciliation together behind
//! `ParamSet::generate`/`encapsulate`/`KeyPair::decapsulate`.

use zeroize::Zeroize;

use crate::error::{Result, RlweError};
use crate::params::{ParamId, ParamSet};
use crate::rand_source::RandomSource;
use crate::reconcile::{rec, round_and_cross_round};
use crate::sampler::sample_secret;

/// Maps an inverse-NTT'd ring element out of `Z[x]/(x^n-1)` into
/// `Z[x]/Phi_n(x)` when `n` is prime, per spec §4.G: subtract the
/// last coefficient from every other one, then pin it to zero.
fn map_to_cyclotomic(v: &mut [u64], p: &ParamSet) {
    if p.n % 2 == 0 {
        return;
    }
    let last = v[p.n - 1];
    for c in v[..p.n - 1].iter_mut() {
        *c = p.class.modsub(*c, last);
    }
    v[p.n - 1] = 0;
}

fn pointwise_mul_add(out: &mut [u64], a: &[u64], x: &[u64], y: &[u64], p: &ParamSet) {
    for i in 0..p.n {
        out[i] = p.class.modadd(p.class.modmul(a[i], x[i]), y[i]);
    }
}

fn pointwise_mul(out: &mut [u64], a: &[u64], b: &[u64], p: &ParamSet) {
    for i in 0..p.n {
        out[i] = p.class.modmul(a[i], b[i]);
    }
}

fn pointwise_add_assign(v: &mut [u64], add: &[u64], p: &ParamSet) {
    for i in 0..p.n {
        v[i] = p.class.modadd(v[i], add[i]);
    }
}

/// Injectable key-derivation hook, standing in for the reference's
/// `void *(*KDF)(...)` callback.
pub trait Kdf {
    fn derive(&self, ikm: &[u8], out: &mut [u8]) -> Result<()>;
}

/// No-op KDF: truncates or zero-pads the raw shared secret, mirroring
/// the C fallback path taken when no KDF is supplied.
pub struct IdentityKdf;

impl Kdf for IdentityKdf {
    fn derive(&self, ikm: &[u8], out: &mut [u8]) -> Result<()> {
        let len = out.len().min(ikm.len());
        out[..len].copy_from_slice(&ikm[..len]);
        for b in out[len..].iter_mut() {
            *b = 0;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Zeroize)]
pub struct SharedSecret(pub Vec<u8>);

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Alice's public key: the fixed-point ring element `b = s1*a + s0` in
/// Fourier domain.
#[derive(Clone, Debug)]
pub struct PublicKey {
    pub id: ParamId,
    pub b: Vec<u64>,
}

/// Bob's public key plus the reconciliation hint.
#[derive(Clone)]
pub struct Encapsulation {
    pub id: ParamId,
    pub u: Vec<u64>,
    pub cr: Vec<u64>,
}

/// Alice's key pair. The secret halves are zeroized on drop.
pub struct KeyPair {
    pub id: ParamId,
    s0: Vec<u64>,
    s1: Vec<u64>,
    pub public: PublicKey,
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.s0.zeroize();
        self.s1.zeroize();
    }
}

impl KeyPair {
    /// `Generate(P)`: sample s0, s1, transform each independently
    /// (spec §9's second Open Question — no pointer-cast aliasing
    /// between the two halves), then b <- s1*a + s0.
    pub fn generate(id: ParamId, rng: &mut dyn RandomSource) -> Self {
        let p = ParamSet::get(id);

        let mut s0 = vec![0u64; p.n];
        let mut s1 = vec![0u64; p.n];
        sample_secret(&mut s0, p, rng);
        sample_secret(&mut s1, p, rng);
        p.engine.forward(&mut s0);
        p.engine.forward(&mut s1);

        let mut b = vec![0u64; p.n];
        pointwise_mul_add(&mut b, &p.a, &s1, &s0, p);

        log::trace!("generated key pair for {id:?}");
        KeyPair { id, s0, s1, public: PublicKey { id, b } }
    }

    /// `Decapsulate(P, u, s1, cr)`: Alice's side.
    pub fn decapsulate(&self, enc: &Encapsulation, kdf: &dyn Kdf, out_len: usize) -> Result<SharedSecret> {
        if self.id != enc.id {
            return Err(RlweError::ParameterMismatch);
        }
        let p = ParamSet::get(self.id);

        let mut w = vec![0u64; p.n];
        pointwise_mul(&mut w, &self.s1, &enc.u, p);
        p.engine.inverse(&mut w);
        map_to_cyclotomic(&mut w, p);

        let mu = rec(&w, &enc.cr, p);
        w.zeroize();

        let ikm: Vec<u8> = mu.iter().flat_map(|word| word.to_le_bytes()).collect();
        let mut out = vec![0u8; out_len];
        kdf.derive(&ikm, &mut out)?;
        Ok(SharedSecret(out))
    }
}

/// `Encapsulate(P, b_alice)`: Bob's side. Returns Bob's public key,
/// the reconciliation hint, and the derived shared secret.
pub fn encapsulate(
    peer: &PublicKey,
    rng: &mut dyn RandomSource,
    kdf: &dyn Kdf,
    out_len: usize,
) -> Result<(Encapsulation, SharedSecret)> {
    let p = ParamSet::get(peer.id);

    let mut e0 = vec![0u64; p.n];
    let mut e1 = vec![0u64; p.n];
    let mut e2 = vec![0u64; p.n];
    sample_secret(&mut e0, p, rng);
    sample_secret(&mut e1, p, rng);
    sample_secret(&mut e2, p, rng);
    p.engine.forward(&mut e0);
    p.engine.forward(&mut e1);

    let mut u = vec![0u64; p.n];
    pointwise_mul_add(&mut u, &p.a, &e0, &e1, p);

    let mut v = vec![0u64; p.n];
    pointwise_mul(&mut v, &peer.b, &e0, p);
    p.engine.inverse(&mut v);
    map_to_cyclotomic(&mut v, p);
    pointwise_add_assign(&mut v, &e2, p);

    e0.zeroize();
    e1.zeroize();
    e2.zeroize();

    let (mu, cr) = round_and_cross_round(&v, p, rng);
    v.zeroize();

    let ikm: Vec<u8> = mu.iter().flat_map(|word| word.to_le_bytes()).collect();
    let mut out = vec![0u8; out_len];
    kdf.derive(&ikm, &mut out)?;

    Ok((Encapsulation { id: peer.id, u, cr }, SharedSecret(out)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn shared_secret(id: ParamId, rng: &mut dyn RandomSource) -> (Vec<u8>, Vec<u8>) {
        let p = ParamSet::get(id);
        let alice = KeyPair::generate(id, rng);

        let (enc, bob_secret) = encapsulate(&alice.public, rng, &IdentityKdf, p.muwords * 8).unwrap();
        let alice_secret = alice.decapsulate(&enc, &IdentityKdf, p.muwords * 8).unwrap();

        (alice_secret.0.clone(), bob_secret.0.clone())
    }

    #[test]
    fn round_trip_agrees_even_n() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let (a, b) = shared_secret(ParamId::N256Q15361, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn round_trip_agrees_odd_n() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let (a, b) = shared_secret(ParamId::N337Q32353, &mut rng);
        assert_eq!(a, b);
    }

    #[test]
    fn mismatched_parameter_sets_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let alice = KeyPair::generate(ParamId::N256Q15361, &mut rng);
        let bob_pub = PublicKey { id: ParamId::N512Q25601, b: vec![0u64; ParamSet::get(ParamId::N512Q25601).n] };
        let enc = Encapsulation { id: ParamId::N512Q25601, u: bob_pub.b.clone(), cr: vec![0u64; 8] };
        let err = alice.decapsulate(&enc, &IdentityKdf, 32).unwrap_err();
        assert_eq!(err, RlweError::ParameterMismatch);
    }
}
