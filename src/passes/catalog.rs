//! The universe of passes the search may append.
//!
//! The default catalog is the set of zero-argument pass-manager methods of the
//! LLVM legacy pass manager, minus a denylist of passes that crash the
//! benchmark build or silently change program behaviour.

use super::list::{PassList, PassName};
use crate::core::random::RandomSource;
use hashbrown::HashSet;

/// Passes that are usable as zero-argument calls and safe for the benchmark.
const LLVM_LEGACY_PASSES: &[&str] = &[
    "add_aggressive_dce_pass",
    "add_aggressive_inst_combiner_pass",
    "add_alignment_from_assumptions_pass",
    "add_always_inliner_pass",
    "add_basic_alias_analysis_pass",
    "add_bit_tracking_dce_pass",
    "add_cfg_simplification_pass",
    "add_constant_merge_pass",
    "add_correlated_value_propagation_pass",
    "add_dead_arg_elimination_pass",
    "add_dead_store_elimination_pass",
    "add_demote_memory_to_register_pass",
    "add_early_cse_mem_ssa_pass",
    "add_early_cse_pass",
    "add_function_attrs_pass",
    "add_function_inlining_pass",
    "add_global_dce_pass",
    "add_global_optimizer_pass",
    "add_ind_var_simplify_pass",
    "add_instruction_simplify_pass",
    "add_ipsccp_pass",
    "add_jump_threading_pass",
    "add_loop_deletion_pass",
    "add_loop_idiom_pass",
    "add_loop_reroll_pass",
    "add_loop_rotate_pass",
    "add_loop_unroll_and_jam_pass",
    "add_loop_unroll_pass",
    "add_loop_vectorize_pass",
    "add_lower_expect_intrinsic_pass",
    "add_lower_switch_pass",
    "add_merge_functions_pass",
    "add_merged_load_store_motion_pass",
    "add_partially_inline_lib_calls_pass",
    "add_promote_memory_to_register_pass",
    "add_prune_eh_pass",
    "add_reassociate_pass",
    "add_scalar_repl_aggregates_pass",
    "add_scalar_repl_aggregates_pass_ssa",
    "add_scalarizer_pass",
    "add_sccp_pass",
    "add_scoped_no_alias_aa_pass",
    "add_simplify_lib_calls_pass",
    "add_slp_vectorize_pass",
    "add_strip_dead_prototypes_pass",
    "add_strip_symbol_pass",
    "add_tail_call_elimination_pass",
    "add_type_based_alias_analysis_pass",
];

/// Passes never offered to the search, with the reason they are excluded.
pub const DENYLIST: &[(&str, &str)] = &[
    ("add_scalar_repl_aggregates_pass_with_threshold", "requires an argument"),
    ("add_internalize_pass", "requires an argument"),
    ("add_gvn_pass", "crashes the build"),
    ("add_instruction_combining_pass", "crashes the build"),
    ("add_memcpy_optimize_pass", "crashes the build"),
    ("add_new_gvn_pass", "miscompiles the benchmark"),
    ("add_licm_pass", "miscompiles the benchmark"),
];

/// Why `name` is denylisted, if it is.
pub fn deny_reason(name: &str) -> Option<&'static str> {
    DENYLIST
        .iter()
        .find(|(denied, _)| *denied == name)
        .map(|(_, reason)| *reason)
}

/// Immutable set of usable pass names.
#[derive(Debug, Clone)]
pub struct PassCatalog {
    passes: Vec<PassName>,
    index: HashSet<PassName>,
}

impl PassCatalog {
    /// Build a catalog from arbitrary names. Denylisted names and duplicates
    /// are dropped; the first occurrence fixes the order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut passes = Vec::new();
        let mut index = HashSet::new();
        for name in names {
            let name = name.as_ref();
            if deny_reason(name).is_some() {
                log::debug!("dropping denylisted pass {} from catalog", name);
                continue;
            }
            let pass = PassName::new(name);
            if index.insert(pass.clone()) {
                passes.push(pass);
            }
        }
        Self { passes, index }
    }

    /// The default LLVM legacy pass-manager catalog.
    pub fn llvm_legacy() -> Self {
        Self::from_names(LLVM_LEGACY_PASSES.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn contains(&self, pass: &PassName) -> bool {
        self.index.contains(pass)
    }

    pub fn passes(&self) -> &[PassName] {
        &self.passes
    }

    /// `k` passes drawn independently and uniformly, with replacement.
    ///
    /// An empty catalog yields an empty list.
    pub fn sample_random<R: RandomSource + ?Sized>(&self, k: usize, rng: &mut R) -> PassList {
        if self.passes.is_empty() {
            return PassList::new();
        }
        (0..k)
            .map(|_| self.passes[rng.index(self.passes.len())].clone())
            .collect::<Vec<_>>()
            .into()
    }
}

impl Default for PassCatalog {
    fn default() -> Self {
        Self::llvm_legacy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::StdRandom;
    use crate::core::test_utils::test::ScriptedRandom;

    #[test]
    fn test_default_catalog_excludes_denylist() {
        let catalog = PassCatalog::llvm_legacy();
        assert_eq!(catalog.len(), LLVM_LEGACY_PASSES.len());
        for (denied, _) in DENYLIST {
            assert!(!catalog.contains(&PassName::from(*denied)));
        }
        assert!(catalog.contains(&PassName::from("add_loop_rotate_pass")));
    }

    #[test]
    fn test_from_names_filters_and_dedups() {
        let catalog = PassCatalog::from_names(["add_gvn_pass", "b", "a", "b", "add_licm_pass"]);
        let names: Vec<&str> = catalog.passes().iter().map(PassName::as_str).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_deny_reason() {
        assert_eq!(deny_reason("add_gvn_pass"), Some("crashes the build"));
        assert_eq!(deny_reason("add_sccp_pass"), None);
    }

    #[test]
    fn test_sample_uses_scripted_indices() {
        let catalog = PassCatalog::from_names(["a", "b", "c"]);
        let mut rng = ScriptedRandom::new().with_indices([2, 0, 2]);
        let sample = catalog.sample_random(3, &mut rng);
        let expected: PassList = ["c", "a", "c"].into_iter().collect();
        assert_eq!(sample, expected);
    }

    #[test]
    fn test_sample_draws_from_catalog() {
        let catalog = PassCatalog::llvm_legacy();
        let mut rng = StdRandom::seeded(3);
        let sample = catalog.sample_random(500, &mut rng);
        assert_eq!(sample.len(), 500);
        assert!(sample.iter().all(|p| catalog.contains(p)));
    }

    #[test]
    fn test_sample_from_empty_catalog() {
        let catalog = PassCatalog::from_names(Vec::<String>::new());
        let mut rng = StdRandom::seeded(3);
        assert!(catalog.sample_random(4, &mut rng).is_empty());
    }
}
