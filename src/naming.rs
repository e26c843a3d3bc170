//! File-name template expansion for split output sequences (spec §6
//! "Naming"; actual filesystem/run-control conventions are an external
//! concern per spec §1 non-goals — this only fills in the placeholders a
//! caller's template names).
//!
//! Recognized placeholders: `%d` (split/file number), `%s` (a caller-
//! supplied run type string). Either, both, or neither may appear.

use std::path::PathBuf;

pub fn expand(template: &str, file_number: u32, run_type: Option<&str>) -> PathBuf {
    let mut out = template.replace("%d", &file_number.to_string());
    if let Some(rt) = run_type {
        out = out.replace("%s", rt);
    }
    PathBuf::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_file_number() {
        assert_eq!(expand("run.%d.hipo", 3, None), PathBuf::from("run.3.hipo"));
    }

    #[test]
    fn expands_run_type_and_number() {
        assert_eq!(expand("%s_run.%d.hipo", 7, Some("cosmic")), PathBuf::from("cosmic_run.7.hipo"));
    }

    #[test]
    fn leaves_template_untouched_without_placeholders() {
        assert_eq!(expand("fixed.hipo", 0, None), PathBuf::from("fixed.hipo"));
    }
}
