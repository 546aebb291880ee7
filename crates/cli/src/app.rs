//! Demo run: transcript to `out`, optional audit export.

use std::io::Write;
use std::path::Path;

use anyhow::Context;

use ledgerkit_events::AuditTrail;
use ledgerkit_infra::export;

use crate::demo;
use crate::event::LedgerEvent;
use crate::transcript::Transcript;

pub fn run<W: Write>(out: W, audit_path: Option<&Path>) -> anyhow::Result<AuditTrail<LedgerEvent>> {
    let mut transcript = Transcript::new(out);
    demo::run_all(&mut transcript).context("failed to write demo transcript")?;

    let (mut out, trail) = transcript.into_parts();
    out.flush().context("failed to flush demo transcript")?;

    if let Some(path) = audit_path {
        export::write_json_pretty(path, &trail)
            .with_context(|| format!("failed to export audit trail to {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = trail.len(), "audit trail exported");
    }

    Ok(trail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn run_without_export_only_writes_transcript() {
        let mut out = Vec::new();
        let trail = run(&mut out, None).unwrap();

        assert_eq!(trail.len(), 8);
        assert!(String::from_utf8(out).unwrap().contains("=== audit trail ==="));
    }

    #[test]
    fn run_exports_audit_trail_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");

        run(Vec::new(), Some(&path)).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let entries = json["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[0]["aggregate_type"], "account");
        assert_eq!(entries[0]["payload"]["Account"]["Deposited"]["amount"], "500");
        assert!(!dir.path().join("audit.json.tmp").exists());
    }

    #[test]
    fn export_to_missing_directory_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("audit.json");

        let err = run(Vec::new(), Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("failed to export audit trail"));
    }
}
