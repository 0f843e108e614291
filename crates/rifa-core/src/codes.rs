//! Identifier and participation code generation

use chrono::{DateTime, Utc};
use rand::Rng;

/// Prefix of every participation code
pub const CODE_PREFIX: &str = "TRD-";

const CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random participation code, e.g. `TRD-AB12CD`
pub fn participation_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut code = String::with_capacity(CODE_PREFIX.len() + CODE_LEN);
    code.push_str(CODE_PREFIX);
    for _ in 0..CODE_LEN {
        let index = rng.random_range(0..CODE_ALPHABET.len());
        code.push(char::from(CODE_ALPHABET[index]));
    }
    code
}

/// Participation code not already taken
///
/// `taken` is consulted for every candidate.
pub fn unique_participation_code<R, F>(rng: &mut R, mut taken: F) -> String
where
    R: Rng + ?Sized,
    F: FnMut(&str) -> bool,
{
    loop {
        let code = participation_code(rng);
        if !taken(&code) {
            return code;
        }
    }
}

/// Cycle identity, `RFL-YYYYMMDD-NNN`
pub fn raffle_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    format!("RFL-{}-{}", now.format("%Y%m%d"), rng.random_range(0..1000))
}

/// Normalize a code typed by a user: trimmed, upper case
#[must_use]
pub fn normalize_code(input: &str) -> String {
    input.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn code_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let code = participation_code(&mut rng);
        assert_eq!(code.len(), 10);
        assert!(code.starts_with("TRD-"));
        assert!(code[4..]
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn unique_code_skips_taken() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = participation_code(&mut StdRng::seed_from_u64(1));
        let code = unique_participation_code(&mut rng, |c| c == first);
        assert_ne!(code, first);
    }

    #[test]
    fn raffle_id_embeds_date() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        assert!(raffle_id(now, &mut rng).starts_with("RFL-20261019-"));
    }

    #[test]
    fn normalize() {
        assert_eq!(normalize_code("  trd-ab12cd \n"), "TRD-AB12CD");
    }
}
