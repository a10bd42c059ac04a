//! Join-code generation for sessions.
//!
//! Codes are short, shouted-across-a-bar strings printed on the
//! jumbotron, so the alphabet drops lookalike characters (0/O, 1/I/L).
//! Uniqueness is enforced by the caller against the persisted sessions,
//! retrying up to [`MAX_CODE_ATTEMPTS`] times.

use rand::Rng;

/// Length of a session join code.
pub const CODE_LENGTH: usize = 6;

/// Attempts at a unique code before session creation gives up.
pub const MAX_CODE_ATTEMPTS: usize = 15;

/// Unambiguous uppercase alphabet (no 0/O, 1/I/L).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Generate one candidate join code.
pub fn generate_session_code(rng: &mut impl Rng) -> String {
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn code_has_expected_length_and_alphabet() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let code = generate_session_code(&mut rng);
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn codes_vary_across_draws() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = generate_session_code(&mut rng);
        let b = generate_session_code(&mut rng);
        assert_ne!(a, b);
    }
}
