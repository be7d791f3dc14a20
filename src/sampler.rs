use rand::Rng;
use rand::seq::SliceRandom;

/// Number of words drawn for every pull.
pub const SAMPLE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SampleError {
    #[error("not enough words in the word bank ({available} available, {required} required)")]
    InsufficientWords { available: usize, required: usize },
}

/// Draw `SAMPLE_SIZE` words uniformly without replacement.
///
/// Positions are sampled, not values, so a bank containing duplicates may
/// yield repeated words.
pub fn sample_words<R: Rng + ?Sized>(
    words: &[String],
    rng: &mut R,
) -> Result<Vec<String>, SampleError> {
    if words.len() < SAMPLE_SIZE {
        return Err(SampleError::InsufficientWords {
            available: words.len(),
            required: SAMPLE_SIZE,
        });
    }

    Ok(words.choose_multiple(rng, SAMPLE_SIZE).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn bank(size: usize) -> Vec<String> {
        (0..size).map(|i| format!("word{i}")).collect()
    }

    #[test]
    fn test_samples_ten_distinct_words_from_bank() {
        let mut rng = StdRng::seed_from_u64(7);
        for size in [10, 11, 35, 500] {
            let words = bank(size);
            for _ in 0..50 {
                let sample = sample_words(&words, &mut rng).unwrap();
                assert_eq!(sample.len(), SAMPLE_SIZE);
                let unique: HashSet<&String> = sample.iter().collect();
                assert_eq!(unique.len(), SAMPLE_SIZE);
                assert!(sample.iter().all(|w| words.contains(w)));
            }
        }
    }

    #[test]
    fn test_exact_size_bank_returns_every_word() {
        let mut rng = StdRng::seed_from_u64(1);
        let words = bank(SAMPLE_SIZE);
        let sample: HashSet<String> = sample_words(&words, &mut rng).unwrap().into_iter().collect();
        let expected: HashSet<String> = words.into_iter().collect();
        assert_eq!(sample, expected);
    }

    #[test]
    fn test_rejects_small_bank() {
        let mut rng = StdRng::seed_from_u64(1);
        for size in 0..SAMPLE_SIZE {
            let err = sample_words(&bank(size), &mut rng).unwrap_err();
            assert_eq!(
                err,
                SampleError::InsufficientWords {
                    available: size,
                    required: SAMPLE_SIZE
                }
            );
        }
    }

    #[test]
    fn test_samples_vary_between_calls() {
        let mut rng = StdRng::seed_from_u64(42);
        let words = bank(100);
        let first = sample_words(&words, &mut rng).unwrap();
        let differs = (0..20).any(|_| sample_words(&words, &mut rng).unwrap() != first);
        assert!(differs);
    }
}
