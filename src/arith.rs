//! Scalar modular arithmetic shared by every NTT engine.
//!
//! `CongruenceClass` is the crate's Barrett-reduction context, carried
//! over from a plain modulus-and-multiply design: a modulus is loaded
//! once, the Barrett constant `mu` is derived, and every multiply
//! after that is a pair of 128-bit widenings and a conditional
//! subtraction instead of a division.

use primal::{Sieve, is_prime};

#[derive(Debug, Clone, Copy)]
pub struct CongruenceClass {
    mu: u64,
    q: u64,
    logq: u64,
}

impl CongruenceClass {
    pub fn new(q: u64) -> Self {
        assert!(q >= 2, "modulus must be >= 2");
        assert!(q < (1u64 << 63), "modulus must be < 2^63");

        let logq: u64 = 64 - (q.leading_zeros() as u64);
        let mu: u64 = ((1u128 << (2 * logq)) / (q as u128)) as u64;

        Self { q, mu, logq }
    }

    #[inline]
    pub fn q(&self) -> u64 {
        self.q
    }

    #[inline]
    pub fn modmul(&self, a: u64, b: u64) -> u64 {
        let mul = (a as u128) * (b as u128);

        let tmp1 = mul >> (self.logq - 2);
        let tmp2 = (tmp1 * (self.mu as u128)) >> (self.logq + 2);

        let r = (mul.wrapping_sub(tmp2 * (self.q as u128))) as u64;

        if r < self.q { r } else { r.wrapping_sub(self.q) }
    }

    #[inline]
    pub fn modadd(&self, a: u64, b: u64) -> u64 {
        let t = a + b;
        if t < self.q { t } else { t.wrapping_sub(self.q) }
    }

    #[inline]
    pub fn modsub(&self, a: u64, b: u64) -> u64 {
        if a >= b {
            a.wrapping_sub(b)
        } else {
            (self.q + a).wrapping_sub(b)
        }
    }

    #[inline]
    pub fn modneg(&self, a: u64) -> u64 {
        if a == 0 { 0 } else { self.q.wrapping_sub(a) }
    }

    #[inline]
    pub fn modexp(&self, a: u64, e: u64) -> u64 {
        let mut base = a;
        let mut exp = e;
        let mut result = 1u64;

        while exp > 0 {
            if exp & 1 == 1 {
                result = self.modmul(result, base);
            }
            base = self.modmul(base, base);
            exp >>= 1;
        }

        result
    }

    pub fn modinv(&self, a: u64) -> u64 {
        self.modexp(a, self.q - 2)
    }
}

/// Index arithmetic helper for twiddle-table lookups: `(a - b) mod n`.
/// Distinct from `modsub` because `n` here is a table length, not a
/// ring modulus.
#[inline]
pub fn sub_modn(a: u64, b: u64, n: u64) -> u64 {
    let t = a + (n - b);
    if t >= n { t - n } else { t }
}

/** naive references, used only to cross-check the Barrett path in tests **/
#[inline]
pub fn modadd_naive(a: u64, b: u64, q: u64) -> u64 {
    (a + b) % q
}

#[inline]
pub fn modsub_naive(a: u64, b: u64, q: u64) -> u64 {
    (q + a - b) % q
}

#[inline]
pub fn modmul_naive(a: u64, b: u64, q: u64) -> u64 {
    (((a as u128) * (b as u128)) % (q as u128)) as u64
}

pub fn find_first_prime_up(logq: usize, n: usize) -> u64 {
    let m: u64 = (n as u64) << 1;
    let mut q: u64 = (1u64 << logq) + 1;

    while !is_prime(q) {
        q += m;
    }

    q
}

pub fn find_first_prime_down(logq: usize, n: usize) -> u64 {
    let m: u64 = (n as u64) << 1;
    let mut q: u64 = (1u64 << logq) + 1 - m;

    while !is_prime(q) {
        q -= m;
    }

    q
}

/// Find a generator of the unique cyclic subgroup of order `m` in
/// `(Z/qZ)^*`, i.e. a primitive `m`-th root of unity mod `q`.
fn find_primitive_root(q: u64) -> u64 {
    assert!(is_prime(q), "primitive root search: modulus must be prime");

    let phi = q - 1;
    let logq = 64 - q.leading_zeros();

    let sieve = Sieve::new(1usize << (1 + logq / 2));
    let class = CongruenceClass::new(q);

    let phi_factorized = sieve.factor(phi as usize).unwrap();

    let mut r = 1u64;
    loop {
        r += 1;
        let is_generator = phi_factorized
            .iter()
            .all(|(prime, _)| class.modexp(r, phi / (*prime as u64)) != 1);
        if is_generator {
            return r;
        }
    }
}

/// Primitive `2n`-th root of unity mod `q` (`q` must satisfy
/// `q ≡ 1 (mod 2n)`). Used both to build negacyclic twiddle tables
/// (component C) and Bluestein chirp sequences (component D), which
/// are themselves powers of a `2n`-th root.
pub fn find_generator(q: u64, n: usize) -> u64 {
    let class = CongruenceClass::new(q);
    let m = (n << 1) as u64;

    let g0 = find_primitive_root(q);
    class.modexp(g0, (q - 1) / m)
}
