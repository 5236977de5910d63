//! Candidate generation.
//!
//! Both operators work on list structure only; they never look at what a
//! pass does.

use super::catalog::PassCatalog;
use super::list::PassList;
use crate::core::random::RandomSource;

/// `base` followed by `k` passes sampled from the catalog.
pub fn append_random<R: RandomSource + ?Sized>(
    base: &PassList,
    k: usize,
    catalog: &PassCatalog,
    rng: &mut R,
) -> PassList {
    let mut candidate = base.clone();
    candidate.extend(catalog.sample_random(k, rng).iter().cloned());
    candidate
}

/// Addition mutation: append between 1 and `max_add` random passes.
///
/// Returns the candidate together with the appended suffix.
pub fn mutate_add<R: RandomSource + ?Sized>(
    base: &PassList,
    max_add: usize,
    catalog: &PassCatalog,
    rng: &mut R,
) -> (PassList, PassList) {
    let k = 1 + rng.index(max_add.max(1));
    let added = catalog.sample_random(k, rng);
    let mut candidate = base.clone();
    candidate.extend(added.iter().cloned());
    (candidate, added)
}

/// Pruning mutation: keep each pass on an independent fair coin flip.
pub fn mutate_prune<R: RandomSource + ?Sized>(base: &PassList, rng: &mut R) -> PassList {
    base.iter().filter(|_| rng.flip()).cloned().collect::<Vec<_>>().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::StdRandom;
    use crate::core::test_utils::test::ScriptedRandom;
    use crate::passes::PassName;

    fn seed_list() -> PassList {
        ["x", "y", "z", "x"].into_iter().collect()
    }

    #[test]
    fn test_append_random_keeps_prefix() {
        let catalog = PassCatalog::llvm_legacy();
        let mut rng = StdRandom::seeded(11);
        let base = seed_list();
        for k in 1..=10 {
            let candidate = append_random(&base, k, &catalog, &mut rng);
            assert_eq!(candidate.len(), base.len() + k);
            assert_eq!(&candidate.as_slice()[..base.len()], base.as_slice());
        }
    }

    #[test]
    fn test_mutate_add_length_in_range() {
        let catalog = PassCatalog::llvm_legacy();
        let mut rng = StdRandom::seeded(5);
        let base = seed_list();
        for _ in 0..200 {
            let (candidate, added) = mutate_add(&base, 10, &catalog, &mut rng);
            assert!((1..=10).contains(&added.len()));
            assert_eq!(candidate.len(), base.len() + added.len());
            assert_eq!(&candidate.as_slice()[..base.len()], base.as_slice());
            assert_eq!(&candidate.as_slice()[base.len()..], added.as_slice());
        }
    }

    #[test]
    fn test_mutate_add_scripted() {
        let catalog = PassCatalog::from_names(["a", "b", "c"]);
        // k = 1 + 1, then catalog indices 2 and 0.
        let mut rng = ScriptedRandom::new().with_indices([1, 2, 0]);
        let (candidate, added) = mutate_add(&seed_list(), 10, &catalog, &mut rng);
        assert_eq!(added.as_slice(), &[PassName::from("c"), PassName::from("a")]);
        assert_eq!(candidate.len(), 6);
    }

    #[test]
    fn test_mutate_prune_is_subsequence() {
        let mut rng = StdRandom::seeded(9);
        let base: PassList = (0..30).map(|i| format!("p{}", i % 7)).collect();
        for _ in 0..200 {
            let pruned = mutate_prune(&base, &mut rng);
            assert!(pruned.len() <= base.len());
            assert!(pruned.is_subsequence_of(&base));
        }
    }

    #[test]
    fn test_mutate_prune_scripted() {
        let mut rng = ScriptedRandom::new().with_flips([true, false, false, true]);
        let pruned = mutate_prune(&seed_list(), &mut rng);
        let expected: PassList = ["x", "x"].into_iter().collect();
        assert_eq!(pruned, expected);
    }

    #[test]
    fn test_mutate_prune_can_empty() {
        let mut rng = ScriptedRandom::new().with_flips([false; 4]);
        assert!(mutate_prune(&seed_list(), &mut rng).is_empty());
        assert!(mutate_prune(&PassList::new(), &mut rng).is_empty());
    }
}
