//! Storage commitment bookkeeping (§4.10, additive).
//!
//! [`crate::handlers::on_n_action`]/[`crate::handlers::on_n_event_report`]
//! describe the wire handlers; "recording the transaction" and
//! "reconciling the original transaction" are left as handler
//! responsibilities. This module supplies the shared value types those
//! handlers close over, plus an in-memory reference tracker for tests and
//! embedders that don't need durability across restarts.

use std::collections::HashMap;
use std::sync::Mutex;

/// A storage commitment transaction: the UID the requester generated
/// (always prefixed `"2.25."` by this implementation) and the list of
/// SOP-class/SOP-instance pairs it covers.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StorageCommitmentTransaction {
    pub transaction_uid: String,
    pub pairs: Vec<(String, String)>,
}

/// Per-instance outcome reported on the reply path (N-EVENT-REPORT),
/// mirroring the seven-way reason enumeration of PS3.3's storage
/// commitment result sequence.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StorageCommitmentOutcome {
    Success,
    ProcessingFailure,
    NoSuchObjectInstance,
    ResourceLimitation,
    ReferencedSopClassNotSupported,
    ClassInstanceConflict,
    DuplicateTransactionUid,
}

/// A handler-facing record of a transaction's progress: the request as
/// received, plus whatever outcomes have been reported back for it so far
/// (keyed by SOP instance UID).
#[derive(Debug, Clone, Default)]
pub struct TransactionRecord {
    pub pairs: Vec<(String, String)>,
    pub outcomes: HashMap<String, StorageCommitmentOutcome>,
}

/// Records and reconciles storage commitment transactions. Implemented
/// against any backing store a handler factory chooses; persistence
/// itself is out of scope here (see the ambient stack notes), so this
/// crate ships only [`MemoryCommitmentTracker`].
pub trait StorageCommitmentTracker: Send + Sync {
    /// Record an incoming N-ACTION-RQ (storage commitment request).
    fn record_request(&self, transaction: StorageCommitmentTransaction);

    /// Record an incoming N-EVENT-REPORT-RQ (storage commitment reply)
    /// for the SOP instances it names, reconciling against whatever
    /// request was previously recorded for the same transaction UID.
    fn record_report(
        &self,
        transaction_uid: &str,
        outcomes: Vec<(String, String, StorageCommitmentOutcome)>,
    );

    /// Look up the current bookkeeping state of a transaction, if any
    /// request has been recorded for it.
    fn lookup(&self, transaction_uid: &str) -> Option<TransactionRecord>;
}

/// An in-memory, `HashMap`-backed [`StorageCommitmentTracker`].
#[derive(Debug, Default)]
pub struct MemoryCommitmentTracker {
    transactions: Mutex<HashMap<String, TransactionRecord>>,
}

impl MemoryCommitmentTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageCommitmentTracker for MemoryCommitmentTracker {
    fn record_request(&self, transaction: StorageCommitmentTransaction) {
        let mut transactions = self.transactions.lock().unwrap();
        transactions.insert(
            transaction.transaction_uid,
            TransactionRecord {
                pairs: transaction.pairs,
                outcomes: HashMap::new(),
            },
        );
    }

    fn record_report(
        &self,
        transaction_uid: &str,
        outcomes: Vec<(String, String, StorageCommitmentOutcome)>,
    ) {
        let mut transactions = self.transactions.lock().unwrap();
        let record = transactions.entry(transaction_uid.to_string()).or_default();
        for (_sop_class, sop_instance, outcome) in outcomes {
            record.outcomes.insert(sop_instance, outcome);
        }
    }

    fn lookup(&self, transaction_uid: &str) -> Option<TransactionRecord> {
        self.transactions.lock().unwrap().get(transaction_uid).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_request_then_reconciles_report() {
        let tracker = MemoryCommitmentTracker::new();
        tracker.record_request(StorageCommitmentTransaction {
            transaction_uid: "2.25.1".to_string(),
            pairs: vec![("1.2.840.10008.5.1.4.1.1.2".to_string(), "1.2.3".to_string())],
        });
        tracker.record_report(
            "2.25.1",
            vec![(
                "1.2.840.10008.5.1.4.1.1.2".to_string(),
                "1.2.3".to_string(),
                StorageCommitmentOutcome::Success,
            )],
        );
        let record = tracker.lookup("2.25.1").expect("transaction recorded");
        assert_eq!(record.pairs.len(), 1);
        assert_eq!(
            record.outcomes.get("1.2.3"),
            Some(&StorageCommitmentOutcome::Success)
        );
    }

    #[test]
    fn unknown_transaction_is_absent() {
        let tracker = MemoryCommitmentTracker::new();
        assert!(tracker.lookup("2.25.999").is_none());
    }
}
