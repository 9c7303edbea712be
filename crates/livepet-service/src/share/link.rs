//! Share token and access code generation.

use rand::rngs::OsRng;
use rand::{Rng, RngCore};

/// Bytes of entropy in a share token.
pub const TOKEN_BYTES: usize = 32;
/// Digits in an access code.
pub const ACCESS_CODE_DIGITS: usize = 6;

/// Generates tokens and codes from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkService;

impl LinkService {
    /// Creates a new link service.
    pub fn new() -> Self {
        Self
    }

    /// 32 random bytes, lowercase hex.
    pub fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Uniform in `000000..=999999`, zero-padded.
    pub fn generate_access_code(&self) -> String {
        let code: u32 = OsRng.gen_range(0..1_000_000);
        format!("{code:06}")
    }

    /// Whether `token` has the shape of an issued token.
    pub fn is_well_formed_token(token: &str) -> bool {
        token.len() == TOKEN_BYTES * 2
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    /// Compares a supplied code with the stored one without short-circuiting
    /// on the first differing byte.
    pub fn codes_match(expected: &str, supplied: &str) -> bool {
        let expected = expected.as_bytes();
        let supplied = supplied.as_bytes();
        if expected.len() != supplied.len() {
            return false;
        }
        expected
            .iter()
            .zip(supplied)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }
}
