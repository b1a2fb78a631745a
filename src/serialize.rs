//! Component §6: wire formats. A public key or secret ring element is
//! the 32-byte parameter descriptor followed by `n` big-endian
//! coefficients (2 bytes when `q < 2^16`, else 4); a reconciliation
//! vector is a 4-byte big-endian `muwords` count followed by that many
//! little-endian 64-bit words.

use crate::error::{Result, RlweError};
use crate::kem::{Encapsulation, PublicKey};
use crate::params::{ParamId, ParamSet};

fn coeff_width(q: u64) -> usize {
    if q < (1 << 16) { 2 } else { 4 }
}

fn write_coeff(buf: &mut Vec<u8>, c: u64, width: usize) {
    if width == 2 {
        buf.extend_from_slice(&(c as u16).to_be_bytes());
    } else {
        buf.extend_from_slice(&(c as u32).to_be_bytes());
    }
}

fn read_coeff(bytes: &[u8], width: usize) -> u64 {
    if width == 2 {
        u16::from_be_bytes([bytes[0], bytes[1]]) as u64
    } else {
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64
    }
}

/// Parse the 32-byte descriptor prefix and recover the matching
/// `ParamSet`, rejecting anything whose `(n, q)` this build doesn't
/// recognize or whose hash of `a` doesn't match (spec §8 property 6).
fn parse_descriptor(bytes: &[u8]) -> Result<&'static ParamSet> {
    if bytes.len() < 32 || &bytes[0..4] != b"RLWE" {
        return Err(RlweError::InvalidFormat);
    }
    let n = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    let q = u32::from_be_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
    let id = ParamId::from_nq(n, q).ok_or(RlweError::UnknownParameter)?;
    let p = ParamSet::get(id);
    if p.descriptor[12..32] != bytes[12..32] {
        return Err(RlweError::UnknownParameter);
    }
    Ok(p)
}

pub fn write_public_key(pk: &PublicKey) -> Vec<u8> {
    let p = ParamSet::get(pk.id);
    let width = coeff_width(p.q);
    let mut buf = Vec::with_capacity(32 + p.n * width);
    buf.extend_from_slice(&p.descriptor);
    for &c in &pk.b {
        write_coeff(&mut buf, c, width);
    }
    buf
}

pub fn read_public_key(bytes: &[u8]) -> Result<PublicKey> {
    let p = parse_descriptor(bytes)?;
    let width = coeff_width(p.q);
    if bytes.len() != 32 + p.n * width {
        return Err(RlweError::InvalidFormat);
    }
    let mut b = vec![0u64; p.n];
    for (i, c) in b.iter_mut().enumerate() {
        let off = 32 + i * width;
        *c = read_coeff(&bytes[off..off + width], width);
    }
    Ok(PublicKey { id: p.id, b })
}

pub fn write_ring_element(id: ParamId, coeffs: &[u64]) -> Vec<u8> {
    let p = ParamSet::get(id);
    let width = coeff_width(p.q);
    let mut buf = Vec::with_capacity(32 + p.n * width);
    buf.extend_from_slice(&p.descriptor);
    for &c in coeffs {
        write_coeff(&mut buf, c, width);
    }
    buf
}

pub fn read_ring_element(bytes: &[u8]) -> Result<(ParamId, Vec<u64>)> {
    let p = parse_descriptor(bytes)?;
    let width = coeff_width(p.q);
    if bytes.len() != 32 + p.n * width {
        return Err(RlweError::InvalidFormat);
    }
    let mut coeffs = vec![0u64; p.n];
    for (i, c) in coeffs.iter_mut().enumerate() {
        let off = 32 + i * width;
        *c = read_coeff(&bytes[off..off + width], width);
    }
    Ok((p.id, coeffs))
}

pub fn write_reconciliation(enc: &Encapsulation) -> Vec<u8> {
    let p = ParamSet::get(enc.id);
    let mut buf = Vec::with_capacity(4 + p.muwords * 8);
    buf.extend_from_slice(&(p.muwords as u32).to_be_bytes());
    for &w in &enc.cr {
        buf.extend_from_slice(&w.to_le_bytes());
    }
    buf
}

pub fn read_reconciliation(id: ParamId, bytes: &[u8]) -> Result<Vec<u64>> {
    let p = ParamSet::get(id);
    if bytes.len() != 4 + p.muwords * 8 {
        return Err(RlweError::InvalidFormat);
    }
    let muwords = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
    if muwords != p.muwords {
        return Err(RlweError::InvalidFormat);
    }
    let mut cr = vec![0u64; muwords];
    for (i, w) in cr.iter_mut().enumerate() {
        let off = 4 + i * 8;
        *w = u64::from_le_bytes(bytes[off..off + 8].try_into().unwrap());
    }
    Ok(cr)
}
