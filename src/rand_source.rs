//! The randomness contract (spec §6's `RANDOM64` oracle): a stream of
//! independent uniform 64-bit words. Blanket-implemented over
//! `rand_core::RngCore` so any CSPRNG from the `rand` ecosystem
//! satisfies it without an adapter.

use rand_core::RngCore;

pub trait RandomSource {
    fn next_word(&mut self) -> u64;
}

impl<T: RngCore + ?Sized> RandomSource for T {
    fn next_word(&mut self) -> u64 {
        self.next_u64()
    }
}
