//! Random password assembly from fixed alphabets.

use crate::constants;
use crate::models::record::Strength;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use zeroize::Zeroizing;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("'{0}' is not a preset strength (use strong, medium or weak)")]
    NotAPreset(Strength),
    #[error("at most {max} characters per class (got {count})")]
    CountTooLarge { count: usize, max: usize },
}

/// Number of characters drawn per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composition {
    pub upper: usize,
    pub lower: usize,
    pub digits: usize,
    pub symbols: usize,
}

impl Composition {
    /// `None` when the counts do not fit in a `usize`.
    pub fn total(&self) -> Option<usize> {
        self.upper
            .checked_add(self.lower)?
            .checked_add(self.digits)?
            .checked_add(self.symbols)
    }

    pub fn check(&self) -> Result<(), GenerateError> {
        for count in [self.upper, self.lower, self.digits, self.symbols] {
            if count > constants::MAX_CLASS_COUNT {
                return Err(GenerateError::CountTooLarge {
                    count,
                    max: constants::MAX_CLASS_COUNT,
                });
            }
        }
        Ok(())
    }
}

struct Preset {
    lower: usize,
    upper: usize,
    digits: usize,
    symbols: usize,
    length: usize,
}

fn preset(strength: Strength) -> Result<Preset, GenerateError> {
    match strength {
        Strength::Strong => Ok(Preset {
            lower: 2,
            upper: 2,
            digits: 2,
            symbols: 2,
            length: constants::STRONG_LENGTH,
        }),
        Strength::Medium => Ok(Preset {
            lower: 1,
            upper: 1,
            digits: 1,
            symbols: 1,
            length: constants::MEDIUM_LENGTH,
        }),
        // Weak passwords carry no uppercase or symbols.
        Strength::Weak => Ok(Preset {
            lower: 1,
            upper: 0,
            digits: 1,
            symbols: 0,
            length: constants::WEAK_LENGTH,
        }),
        Strength::Custom => Err(GenerateError::NotAPreset(strength)),
    }
}

fn push_random<R: Rng + ?Sized>(out: &mut String, rng: &mut R, alphabet: &[u8], count: usize) {
    for _ in 0..count {
        if let Some(&b) = alphabet.choose(rng) {
            out.push(char::from(b));
        }
    }
}

/// Generate a preset password: lowercase, uppercase, digits, symbols, then
/// `key`, cut to the preset's target length.
pub fn generate<R: Rng + ?Sized>(
    strength: Strength,
    key: &str,
    rng: &mut R,
) -> Result<Zeroizing<String>, GenerateError> {
    let p = preset(strength)?;
    let mut pass = Zeroizing::new(String::with_capacity(p.length + key.len()));
    push_random(&mut pass, rng, constants::LOWERCASE, p.lower);
    push_random(&mut pass, rng, constants::UPPERCASE, p.upper);
    push_random(&mut pass, rng, constants::DIGITS, p.digits);
    push_random(&mut pass, rng, constants::SYMBOLS, p.symbols);
    pass.push_str(key);
    if let Some((idx, _)) = pass.char_indices().nth(p.length) {
        pass.truncate(idx);
    }
    Ok(pass)
}

/// Generate a password from explicit class counts: uppercase, lowercase,
/// digits, symbols, then `key`. Never truncated.
pub fn generate_custom<R: Rng + ?Sized>(
    key: &str,
    composition: &Composition,
    rng: &mut R,
) -> Result<Zeroizing<String>, GenerateError> {
    composition.check()?;
    let capacity = composition
        .total()
        .and_then(|n| n.checked_add(key.len()))
        .unwrap_or(0);
    let mut pass = Zeroizing::new(String::with_capacity(capacity));
    push_random(&mut pass, rng, constants::UPPERCASE, composition.upper);
    push_random(&mut pass, rng, constants::LOWERCASE, composition.lower);
    push_random(&mut pass, rng, constants::DIGITS, composition.digits);
    push_random(&mut pass, rng, constants::SYMBOLS, composition.symbols);
    pass.push_str(key);
    Ok(pass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn in_set(c: char, set: &[u8]) -> bool {
        c.is_ascii() && set.contains(&(c as u8))
    }

    #[test]
    fn test_symbol_set_size() {
        assert_eq!(constants::SYMBOLS.len(), 29);
    }

    #[test]
    fn test_preset_lengths() {
        let mut rng = rng();
        assert_eq!(generate(Strength::Strong, "ABCD", &mut rng).unwrap().len(), 12);
        assert_eq!(generate(Strength::Medium, "ABCD", &mut rng).unwrap().len(), 8);
        assert_eq!(generate(Strength::Weak, "ABCD", &mut rng).unwrap().len(), 6);
    }

    #[test]
    fn test_strong_class_order_and_key() {
        let pass = generate(Strength::Strong, "ABCD", &mut rng()).unwrap();
        let chars: Vec<char> = pass.chars().collect();
        assert!(chars[0..2].iter().all(|&c| in_set(c, constants::LOWERCASE)));
        assert!(chars[2..4].iter().all(|&c| in_set(c, constants::UPPERCASE)));
        assert!(chars[4..6].iter().all(|&c| in_set(c, constants::DIGITS)));
        assert!(chars[6..8].iter().all(|&c| in_set(c, constants::SYMBOLS)));
        assert!(pass.ends_with("ABCD"));
    }

    #[test]
    fn test_weak_has_no_upper_or_symbols() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pass = generate(Strength::Weak, "wxyz", &mut rng).unwrap();
            let chars: Vec<char> = pass.chars().collect();
            assert!(in_set(chars[0], constants::LOWERCASE));
            assert!(in_set(chars[1], constants::DIGITS));
            assert_eq!(&pass[2..], "wxyz");
        }
    }

    #[test]
    fn test_long_key_is_truncated() {
        let pass = generate(Strength::Medium, "LONGKEY", &mut rng()).unwrap();
        assert_eq!(pass.len(), 8);
        assert!(pass.ends_with("LONG"));
    }

    #[test]
    fn test_short_key_gives_shorter_password() {
        let pass = generate(Strength::Strong, "", &mut rng()).unwrap();
        assert_eq!(pass.len(), 8);
    }

    #[test]
    fn test_custom_is_not_a_preset() {
        assert_eq!(
            generate(Strength::Custom, "ABCD", &mut rng()),
            Err(GenerateError::NotAPreset(Strength::Custom))
        );
    }

    #[test]
    fn test_generate_custom_composition() {
        let composition = Composition {
            upper: 2,
            lower: 3,
            digits: 1,
            symbols: 0,
        };
        let pass = generate_custom("k3y!", &composition, &mut rng()).unwrap();
        assert_eq!(pass.len(), 2 + 3 + 1 + 0 + 4);
        let chars: Vec<char> = pass.chars().collect();
        assert!(chars[0..2].iter().all(|&c| in_set(c, constants::UPPERCASE)));
        assert!(chars[2..5].iter().all(|&c| in_set(c, constants::LOWERCASE)));
        assert!(in_set(chars[5], constants::DIGITS));
        assert_eq!(&pass[6..], "k3y!");
    }

    #[test]
    fn test_generate_custom_zero_counts() {
        let pass = generate_custom("ABCD", &Composition::default(), &mut rng()).unwrap();
        assert_eq!(pass.as_str(), "ABCD");
    }

    #[test]
    fn test_generate_custom_not_truncated() {
        let composition = Composition {
            upper: 10,
            lower: 10,
            digits: 10,
            symbols: 10,
        };
        let pass = generate_custom("ABCD", &composition, &mut rng()).unwrap();
        assert_eq!(pass.len(), 44);
    }

    #[test]
    fn test_generate_custom_rejects_huge_count() {
        let composition = Composition {
            upper: usize::MAX,
            lower: 1,
            digits: 1,
            symbols: 1,
        };
        assert_eq!(
            generate_custom("ABCD", &composition, &mut rng()),
            Err(GenerateError::CountTooLarge {
                count: usize::MAX,
                max: constants::MAX_CLASS_COUNT,
            })
        );
    }

    #[test]
    fn test_generate_custom_at_count_limit() {
        let composition = Composition {
            symbols: constants::MAX_CLASS_COUNT,
            ..Composition::default()
        };
        let pass = generate_custom("ABCD", &composition, &mut rng()).unwrap();
        assert_eq!(pass.len(), constants::MAX_CLASS_COUNT + 4);
    }

    #[test]
    fn test_composition_total_overflow() {
        let composition = Composition {
            upper: usize::MAX,
            lower: 1,
            ..Composition::default()
        };
        assert_eq!(composition.total(), None);
        assert_eq!(
            Composition {
                upper: 2,
                lower: 3,
                digits: 1,
                symbols: 0
            }
            .total(),
            Some(6)
        );
    }
}
