pub mod arith;
pub mod bluestein;
pub mod error;
pub mod kem;
pub mod params;
pub mod pow2ntt;
pub mod rand_source;
pub mod reconcile;
pub mod sampler;
pub mod serialize;
pub mod twisted;

pub use arith::CongruenceClass;
pub use bluestein::BluesteinEngine;
pub use error::{Result, RlweError};
pub use kem::{Encapsulation, IdentityKdf, Kdf, KeyPair, PublicKey, SharedSecret, encapsulate};
pub use params::{NttEngine, ParamId, ParamSet};
pub use pow2ntt::Pow2NttTable;
pub use rand_source::RandomSource;
pub use twisted::TwistedEngine;
