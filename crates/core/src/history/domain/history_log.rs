use super::history_entry::HistoryEntry;

/// Append-only sink for qualifying detections.
pub trait HistoryLog: Send {
    fn append(&mut self, entry: HistoryEntry);
}

/// In-memory history for one running session.
///
/// Entries are kept in append order and never removed; the log is cleared
/// only by starting a new session.
#[derive(Clone, Debug, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HistoryLog for SessionHistory {
    fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }
}

/// Forwards appends to a closure, e.g. a channel sender owned by a worker.
pub struct ForwardingHistoryLog<F: FnMut(HistoryEntry) + Send> {
    forward: F,
}

impl<F: FnMut(HistoryEntry) + Send> ForwardingHistoryLog<F> {
    pub fn new(forward: F) -> Self {
        Self { forward }
    }
}

impl<F: FnMut(HistoryEntry) + Send> HistoryLog for ForwardingHistoryLog<F> {
    fn append(&mut self, entry: HistoryEntry) {
        (self.forward)(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::emotion::Emotion;
    use chrono::NaiveDate;

    fn entry(face: u32) -> HistoryEntry {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, face)
            .unwrap();
        HistoryEntry::new(ts, face, Emotion::Neutral, 70.0)
    }

    #[test]
    fn test_new_history_is_empty() {
        let history = SessionHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut history = SessionHistory::new();
        for face in 1..=3 {
            history.append(entry(face));
        }
        let faces: Vec<u32> = history.entries().iter().map(|e| e.face).collect();
        assert_eq!(faces, vec![1, 2, 3]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_forwarding_log_hands_entries_over() {
        let mut received = Vec::new();
        {
            let mut log = ForwardingHistoryLog::new(|e: HistoryEntry| received.push(e.face));
            log.append(entry(4));
            log.append(entry(5));
        }
        assert_eq!(received, vec![4, 5]);
    }
}
