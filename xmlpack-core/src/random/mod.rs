//! Every value drawn here comes from the operating system CSPRNG.

use crate::error::{Result, XmlpackError};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

pub fn fill(buf: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buf)?;
    Ok(())
}

/// `nbytes` random bytes, hex encoded (`2 * nbytes` chars).
pub fn token_hex(nbytes: usize) -> Result<String> {
    let mut raw = vec![0u8; nbytes];
    fill(&mut raw)?;
    Ok(hex::encode(raw))
}

/// `nbytes` random bytes, base64url encoded without padding.
pub fn token_urlsafe(nbytes: usize) -> Result<String> {
    let mut raw = vec![0u8; nbytes];
    fill(&mut raw)?;
    Ok(URL_SAFE_NO_PAD.encode(raw))
}

/// Uniform integer in `[0, n)`. Rejection sampling keeps the draw unbiased.
pub fn below(n: u32) -> Result<u32> {
    if n == 0 {
        return Err(XmlpackError::Config("random bound must be at least 1".into()));
    }
    let limit = u32::MAX - u32::MAX % n;
    loop {
        let mut b = [0u8; 4];
        fill(&mut b)?;
        let v = u32::from_le_bytes(b);
        if v < limit {
            return Ok(v % n);
        }
    }
}

/// Uniform integer in `[1, max]`.
pub fn one_to(max: u32) -> Result<u32> {
    Ok(below(max)? + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_token_length_and_alphabet() {
        let t = token_hex(64).unwrap();
        assert_eq!(t.len(), 128);
        assert!(t.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn urlsafe_token_alphabet() {
        let t = token_urlsafe(32).unwrap();
        // 32 bytes -> ceil(32 * 4 / 3) chars, no padding
        assert_eq!(t.len(), 43);
        assert!(
            t.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn consecutive_tokens_differ() {
        assert_ne!(token_hex(16).unwrap(), token_hex(16).unwrap());
    }

    #[test]
    fn bounded_draws_stay_in_range() {
        for _ in 0..2000 {
            let v = one_to(7).unwrap();
            assert!((1..=7).contains(&v));
        }
        assert_eq!(below(1).unwrap(), 0);
        assert!(below(0).is_err());
    }
}
