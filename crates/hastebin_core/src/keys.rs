//! Document key generators.
//!
//! Generators carry no state: every call draws fresh randomness and knows
//! nothing about keys issued earlier. Uniqueness is the handler's job, checked
//! against the store.

use crate::config::KeyGeneratorKind;
use rand::Rng;
use std::sync::Arc;

const KEYSPACE: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CONSONANTS: &[u8] = b"bcdfghjklmnpqrstvwxyz";
const VOWELS: &[u8] = b"aeiou";

/// Source of candidate document keys.
pub trait KeyGenerator: Send + Sync {
    /// Produce a key of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Uniform draw from the 62-symbol alphanumeric alphabet.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomKeyGenerator;

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| KEYSPACE[rng.gen_range(0..KEYSPACE.len())] as char)
            .collect()
    }
}

/// Pronounceable lowercase keys alternating consonants and vowels.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhoneticKeyGenerator;

impl KeyGenerator for PhoneticKeyGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::thread_rng();
        let mut use_consonant = rng.gen_bool(0.5);
        let mut key = String::with_capacity(length);
        for _ in 0..length {
            let pool = if use_consonant { CONSONANTS } else { VOWELS };
            key.push(pool[rng.gen_range(0..pool.len())] as char);
            use_consonant = !use_consonant;
        }
        key
    }
}

/// Build the generator selected by configuration.
pub fn key_generator_for(kind: KeyGeneratorKind) -> Arc<dyn KeyGenerator> {
    match kind {
        KeyGeneratorKind::Random => Arc::new(RandomKeyGenerator),
        KeyGeneratorKind::Phonetic => Arc::new(PhoneticKeyGenerator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_keys_have_requested_length_and_alphabet() {
        let generator = RandomKeyGenerator;
        for length in [0, 1, 5, 10, 32] {
            let key = generator.generate(length);
            assert_eq!(key.len(), length);
            assert!(key.bytes().all(|b| b.is_ascii_alphanumeric()), "key: {}", key);
        }
    }

    #[test]
    fn random_keys_are_independent_across_calls() {
        let generator = RandomKeyGenerator;
        let keys: HashSet<String> = (0..500).map(|_| generator.generate(10)).collect();
        // 62^10 candidates; a repeat here means the source is not random.
        assert_eq!(keys.len(), 500);
    }

    #[test]
    fn random_keys_cover_all_character_classes() {
        let generator = RandomKeyGenerator;
        let sample = generator.generate(4096);
        assert!(sample.bytes().any(|b| b.is_ascii_lowercase()));
        assert!(sample.bytes().any(|b| b.is_ascii_uppercase()));
        assert!(sample.bytes().any(|b| b.is_ascii_digit()));
    }

    #[test]
    fn phonetic_keys_alternate_consonants_and_vowels() {
        let generator = PhoneticKeyGenerator;
        for _ in 0..50 {
            let key = generator.generate(9);
            assert_eq!(key.len(), 9);
            let is_vowel: Vec<bool> = key.bytes().map(|b| VOWELS.contains(&b)).collect();
            assert!(
                is_vowel.windows(2).all(|pair| pair[0] != pair[1]),
                "key does not alternate: {}",
                key
            );
        }
    }

    #[test]
    fn key_generator_for_honors_kind() {
        let phonetic = key_generator_for(KeyGeneratorKind::Phonetic).generate(12);
        assert!(phonetic.bytes().all(|b| b.is_ascii_lowercase()));
        assert_eq!(key_generator_for(KeyGeneratorKind::Random).generate(7).len(), 7);
    }
}
