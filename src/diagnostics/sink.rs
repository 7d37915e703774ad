//! The diagnostics channel: a single unbounded channel, one writer (the
//! analysis thread), one reader (the calling/main thread), terminated by a
//! sentinel `None` (`spec.md` §4.6, §5, §9).

use std::sync::mpsc;

use super::entry::{DiagnosticEntry, Severity};

/// Handed to the analysis thread; the only way to produce diagnostics.
#[derive(Clone)]
pub struct DiagnosticsSink {
    tx: mpsc::Sender<Option<DiagnosticEntry>>,
}

impl DiagnosticsSink {
    pub fn emit(&self, entry: DiagnosticEntry) {
        // The channel is unbounded and the receiver always drains to the
        // terminator, so a send failure can only mean the receiver was
        // dropped early; there is nothing more useful to do than ignore it.
        let _ = self.tx.send(Some(entry));
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub notes: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl Summary {
    /// §7: "Exit non-zero iff at least one `Error` entry was emitted,
    /// regardless of warning count."
    pub fn is_failure(&self) -> bool {
        self.errors > 0
    }
}

/// Run `analysis` on a background thread with its own [`DiagnosticsSink`],
/// draining entries on the calling thread until the terminator arrives.
/// Returns every entry in emission order plus a running count, matching
/// §5's ordering guarantee.
pub fn run_with_sink<F>(analysis: F) -> (Vec<DiagnosticEntry>, Summary)
where
    F: FnOnce(DiagnosticsSink) + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<Option<DiagnosticEntry>>();
    let sink = DiagnosticsSink { tx: tx.clone() };

    let handle = std::thread::spawn(move || {
        analysis(sink);
        let _ = tx.send(None);
    });

    let mut entries = Vec::new();
    let mut summary = Summary::default();
    while let Ok(Some(entry)) = rx.recv() {
        match entry.severity {
            Severity::Note => summary.notes += 1,
            Severity::Warning => summary.warnings += 1,
            Severity::Error => summary.errors += 1,
        }
        entries.push(entry);
    }

    handle.join().expect("analysis thread panicked");
    (entries, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::Position;

    #[test]
    fn entries_arrive_in_emission_order_and_summary_counts() {
        let (entries, summary) = run_with_sink(|sink| {
            sink.emit(DiagnosticEntry::note(Position::default(), "first".into()));
            sink.emit(DiagnosticEntry::warning(Position::default(), "second".into()));
            sink.emit(DiagnosticEntry::error(
                Position::default(),
                "third".into(),
                super::super::entry::Reason::Other,
            ));
        });
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].text, "first");
        assert_eq!(entries[1].text, "second");
        assert_eq!(entries[2].text, "third");
        assert_eq!(summary, Summary { notes: 1, warnings: 1, errors: 1 });
        assert!(summary.is_failure());
    }

    #[test]
    fn no_entries_is_not_a_failure() {
        let (entries, summary) = run_with_sink(|_sink| {});
        assert!(entries.is_empty());
        assert!(!summary.is_failure());
    }
}
