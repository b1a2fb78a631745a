//! Component D: Bluestein's algorithm, for the ring dimensions that
//! are prime rather than a power of two. A length-`n` DFT over a
//! modulus `q` that has no usable `n`-th root of unity is rewritten,
//! via the chirp identity `jk = C(j) + C(k) - C(j-k)`, as a linear
//! convolution of length `2n-1`; that convolution is padded to the
//! next power of two `big_n` and computed exactly over two auxiliary
//! NTT-friendly primes, recombined with CRT, and only then reduced
//! mod `q`.
//!
//! The auxiliary primes are fixed for the whole crate, not derived
//! per parameter set — they just need to support a `big_n`-length
//! cyclic NTT and be large enough that no convolution entry can ever
//! wrap around `Q0 * Q1`.

use crate::arith::{CongruenceClass, find_generator};
use crate::pow2ntt::Pow2NttTable;

pub const Q0: u64 = 8_816_641;
pub const Q1: u64 = 17_633_281;
const H0: u128 = 17_633_282;
const H1: u128 = 17_633_281;
const Q0Q1: u128 = 155_466_308_229_121;

/// Exact-integer CRT recombination of a value known mod `Q0` and mod
/// `Q1` into its representative in `[0, Q0*Q1)`. Valid only when the
/// true integer value is known to lie in that range already, which
/// holds here because every convolution entry is a sum of at most
/// `big_n` products of residues below `max(Q0, Q1)`.
fn crt_combine(r0: u64, r1: u64) -> u128 {
    let term1 = (H0 * (r1 as u128)) % Q0Q1;
    let term2 = (H1 * (r0 as u128)) % Q0Q1;
    (term1 + Q0Q1 - term2) % Q0Q1
}

#[derive(Debug, Clone)]
pub struct BluesteinEngine {
    n: usize,
    class: CongruenceClass,
    n_inv: u64,
    chirp: Vec<u64>,
    chirp_inv: Vec<u64>,
    aux0: Pow2NttTable,
    aux1: Pow2NttTable,
    /// forward-NTT image, in each auxiliary field, of the symmetric
    /// convolution kernel built from `chirp_inv` (used when running
    /// the transform with root `psi^2`).
    kernel_fwd_q0: Vec<u64>,
    kernel_fwd_q1: Vec<u64>,
    /// same, built from `chirp` (used when running the transform with
    /// root `psi^-2`, i.e. the inverse direction).
    kernel_inv_q0: Vec<u64>,
    kernel_inv_q1: Vec<u64>,
}

impl BluesteinEngine {
    pub fn new(n: usize, q: u64) -> Self {
        let class = CongruenceClass::new(q);
        let psi = find_generator(q, n);
        let psi_inv = class.modinv(psi);

        let two_n = (2 * n) as u64;
        let mut chirp = vec![0u64; n];
        let mut chirp_inv = vec![0u64; n];
        for j in 0..n {
            let e = ((j as u64) * (j as u64)) % two_n;
            chirp[j] = class.modexp(psi, e);
            chirp_inv[j] = class.modexp(psi_inv, e);
        }

        let big_n = (2 * n - 1).next_power_of_two();
        let aux0 = Pow2NttTable::new(big_n, Q0);
        let aux1 = Pow2NttTable::new(big_n, Q1);

        let build_kernel = |src: &[u64], table: &Pow2NttTable| -> Vec<u64> {
            let mut kernel = vec![0u64; big_n];
            kernel[0] = src[0] % table.class().q();
            for k in 1..n {
                let v = src[k] % table.class().q();
                kernel[k] = v;
                kernel[big_n - k] = v;
            }
            table.forward(&mut kernel);
            kernel
        };

        let kernel_fwd_q0 = build_kernel(&chirp_inv, &aux0);
        let kernel_fwd_q1 = build_kernel(&chirp_inv, &aux1);
        let kernel_inv_q0 = build_kernel(&chirp, &aux0);
        let kernel_inv_q1 = build_kernel(&chirp, &aux1);

        let n_inv = class.modinv(n as u64);

        Self {
            n,
            class,
            n_inv,
            chirp,
            chirp_inv,
            aux0,
            aux1,
            kernel_fwd_q0,
            kernel_fwd_q1,
            kernel_inv_q0,
            kernel_inv_q1,
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn class(&self) -> &CongruenceClass {
        &self.class
    }

    fn run(&self, x: &[u64], a_mult: &[u64], post_mult: &[u64], kq0: &[u64], kq1: &[u64]) -> Vec<u64> {
        let n = self.n;
        let big_n = self.aux0.len();
        let q = self.class.q();

        let mut a0 = vec![0u64; big_n];
        let mut a1 = vec![0u64; big_n];
        for j in 0..n {
            let weighted = self.class.modmul(x[j], a_mult[j]);
            a0[j] = weighted % Q0;
            a1[j] = weighted % Q1;
        }

        self.aux0.forward(&mut a0);
        self.aux1.forward(&mut a1);

        let c0 = CongruenceClass::new(Q0);
        let c1 = CongruenceClass::new(Q1);
        for k in 0..big_n {
            a0[k] = c0.modmul(a0[k], kq0[k]);
            a1[k] = c1.modmul(a1[k], kq1[k]);
        }

        self.aux0.inverse(&mut a0);
        self.aux1.inverse(&mut a1);

        let mut out = vec![0u64; n];
        for k in 0..n {
            let exact = crt_combine(a0[k], a1[k]);
            let reduced = (exact % (q as u128)) as u64;
            out[k] = self.class.modmul(reduced, post_mult[k]);
        }
        out
    }

    pub fn forward(&self, x: &mut [u64]) {
        let out = self.run(x, &self.chirp, &self.chirp, &self.kernel_fwd_q0, &self.kernel_fwd_q1);
        x.copy_from_slice(&out);
    }

    pub fn inverse(&self, x: &mut [u64]) {
        let mut out = self.run(
            x,
            &self.chirp_inv,
            &self.chirp_inv,
            &self.kernel_inv_q0,
            &self.kernel_inv_q1,
        );
        for c in out.iter_mut() {
            *c = self.class.modmul(*c, self.n_inv);
        }
        x.copy_from_slice(&out);
    }
}
