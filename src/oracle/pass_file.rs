//! Pass-list source file consumed by the benchmark build.
//!
//! The file is a Rust module with a single `add_passes` function that calls
//! one pass-manager method per pass, in list order. It is rewritten before
//! every evaluation.

use crate::core::error::{OracleError, OracleResult};
use crate::passes::PassList;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const BANNER: &str = "// This source file is generated by passtune.";

/// Location and shape of the generated pass file.
#[derive(Debug, Clone)]
pub struct PassFile {
    path: PathBuf,
    pass_manager: String,
}

impl PassFile {
    pub fn new(path: impl Into<PathBuf>, pass_manager: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            pass_manager: pass_manager.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Source text for `passes`.
    pub fn render(&self, passes: &PassList) -> String {
        let pm = &self.pass_manager;
        let mut out = String::new();
        out.push_str(BANNER);
        out.push_str("\n\nuse super::*;\nuse inkwell::passes::PassManagerSubType;\n\n");
        let _ = writeln!(
            out,
            "pub fn add_passes<T: PassManagerSubType>({}: &PassManager<T>) {{",
            pm
        );
        for pass in passes {
            let _ = writeln!(out, "    {}.{}();", pm, pass);
        }
        out.push_str("}\n");
        out
    }

    /// Overwrite the file with the rendering of `passes`.
    pub fn write(&self, passes: &PassList) -> OracleResult<()> {
        log::trace!("writing {} passes to {}", passes.len(), self.path.display());
        std::fs::write(&self.path, self.render(passes)).map_err(|e| OracleError::PassFile {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render() {
        let file = PassFile::new("llvm_passes.rs", "passmgr");
        let passes: PassList = ["add_sccp_pass", "add_loop_unroll_pass", "add_sccp_pass"]
            .into_iter()
            .collect();
        let expected = "\
// This source file is generated by passtune.

use super::*;
use inkwell::passes::PassManagerSubType;

pub fn add_passes<T: PassManagerSubType>(passmgr: &PassManager<T>) {
    passmgr.add_sccp_pass();
    passmgr.add_loop_unroll_pass();
    passmgr.add_sccp_pass();
}
";
        assert_eq!(file.render(&passes), expected);
    }

    #[test]
    fn test_render_empty_list() {
        let file = PassFile::new("p.rs", "pm");
        let text = file.render(&PassList::new());
        assert!(text.ends_with("(pm: &PassManager<T>) {\n}\n"));
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let file = PassFile::new(dir.path().join("llvm_passes.rs"), "passmgr");

        let long: PassList = ["a", "b", "c"].into_iter().collect();
        let short: PassList = ["d"].into_iter().collect();
        file.write(&long).unwrap();
        file.write(&short).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(text, file.render(&short));
        assert!(!text.contains("passmgr.a();"));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = PassFile::new(dir.path().join("missing/llvm_passes.rs"), "passmgr");
        let err = file.write(&PassList::new()).unwrap_err();
        assert!(matches!(err, OracleError::PassFile { .. }));
    }
}
