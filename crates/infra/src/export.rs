//! Pretty JSON output through [`write_atomically`].

use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::InfraResult;
use crate::safe_write::write_atomically;

/// Where to export the audit trail; unset means no export.
pub const AUDIT_PATH_ENV: &str = "LEDGERKIT_AUDIT_PATH";

pub fn audit_path_from_env() -> Option<PathBuf> {
    env::var_os(AUDIT_PATH_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Serialize `value` as JSON with 4-space indentation, replacing `path` atomically.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> InfraResult<()> {
    write_atomically(path, |w| {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut *w, formatter);
        value.serialize(&mut ser)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[derive(Serialize)]
    struct Entry {
        seq: u64,
        text: &'static str,
    }

    #[test]
    fn writes_indented_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");

        write_json_pretty(&path, &[Entry { seq: 1, text: "deposited" }]).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n        \"seq\": 1"));
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed[0]["text"], "deposited");
    }
}
