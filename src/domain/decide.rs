//! The reconciliation decision engine
//!
//! Turns a scanned barcode sequence plus a ledger snapshot into one ordered
//! [`Action`] per barcode. Grouping buckets records by effective ISBN,
//! ranking fixes which candidate a scan matches first, and the decider pops
//! candidates off per-ISBN queues in scan order. The queues live only for
//! the duration of one [`decide_actions`] call.

use std::collections::{HashMap, VecDeque};

use super::action::Action;
use super::id::RecordId;
use super::record::{BookRecord, Existence, RecordStatus};

/// Buckets records by effective ISBN, preserving input order within a bucket
///
/// Records with no ISBN at all share the `UNKNOWN_ISBN` bucket rather than
/// being dropped.
pub fn group_by_isbn(
    records: impl IntoIterator<Item = BookRecord>,
) -> HashMap<String, Vec<BookRecord>> {
    let mut groups: HashMap<String, Vec<BookRecord>> = HashMap::new();
    for record in records {
        groups
            .entry(record.effective_isbn().to_string())
            .or_default()
            .push(record);
    }
    groups
}

/// The ranking key: ascending sort puts the best match candidate first.
///
/// 1. not-yet-counted records, so one physical book is not matched twice;
/// 2. records confirmed present, since a scan outweighs a stale absence flag;
/// 3. in-shelf before borrowed before lost, so the record that already
///    agrees with physical reality wins;
/// 4. record ID as the deterministic tie-break.
fn rank_key(record: &BookRecord) -> (bool, bool, RecordStatus, Option<RecordId>) {
    (
        record.inventoried,
        !record.exists.is_present(),
        record.status,
        record.record_id.clone(),
    )
}

/// Orders records so the best candidate for a scanned barcode comes first
pub fn rank_records(mut records: Vec<BookRecord>) -> Vec<BookRecord> {
    records.sort_by_key(rank_key);
    records
}

/// Decides one action per scanned barcode, in scan order
///
/// Records already inventoried this cycle are invisible here: they are
/// neither matched nor reported. A barcode with no un-reconciled candidate
/// left becomes a [`Action::RegisterNew`], whether the ledger never knew the
/// book or earlier scans drained the queue.
pub fn decide_actions(
    barcodes: &[String],
    records: impl IntoIterator<Item = BookRecord>,
) -> Vec<Action> {
    let mut queues: HashMap<String, VecDeque<BookRecord>> = group_by_isbn(records)
        .into_iter()
        .map(|(isbn, group)| {
            let remaining: Vec<_> = group.into_iter().filter(|r| !r.inventoried).collect();
            (isbn, VecDeque::from(rank_records(remaining)))
        })
        .collect();

    barcodes
        .iter()
        .map(|barcode| {
            let candidate = queues.get_mut(barcode).and_then(VecDeque::pop_front);
            match candidate {
                None => Action::RegisterNew {
                    isbn: barcode.clone(),
                },
                Some(record) => match (record.exists, record.status) {
                    // The scan proves the book exists; a stale absence flag
                    // means the ledger entry, not the book, is wrong.
                    (Existence::Absent, _) => Action::Discard(record),
                    (_, RecordStatus::Borrowed) => Action::Investigate(record),
                    (_, RecordStatus::Lost) => Action::Found(record),
                    (_, RecordStatus::InShelf) => Action::TakeInventory(record),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::UNKNOWN_ISBN;
    use proptest::prelude::*;

    const ISBN1: &str = "9784789849944";
    const ISBN2: &str = "9784839919849";

    fn rec(
        seq: u32,
        status: RecordStatus,
        exists: Existence,
        inventoried: bool,
        isbn13: &str,
    ) -> BookRecord {
        BookRecord {
            record_id: Some(format!("r-{:07x}", seq).parse().unwrap()),
            status,
            title: "book1".to_string(),
            isbn10: None,
            isbn13: Some(isbn13.to_string()),
            exists,
            inventoried,
            kind: "novel".to_string(),
        }
    }

    use Existence::{Absent, Present};
    use RecordStatus::{Borrowed, InShelf, Lost};

    #[test]
    fn group_buckets_by_effective_isbn() {
        let records = vec![
            rec(1, InShelf, Present, true, ISBN1),
            rec(2, InShelf, Present, false, ISBN1),
            rec(30, InShelf, Present, false, ISBN2),
        ];
        let groups = group_by_isbn(records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[ISBN1].len(), 2);
        assert_eq!(groups[ISBN2].len(), 1);
        // Insertion order within the bucket follows input order
        assert_eq!(groups[ISBN1][0].record_id, Some("r-0000001".parse().unwrap()));
        assert_eq!(groups[ISBN1][1].record_id, Some("r-0000002".parse().unwrap()));
    }

    #[test]
    fn group_collects_isbn_less_records() {
        let mut orphan = rec(5, InShelf, Present, false, ISBN1);
        orphan.isbn13 = None;
        let groups = group_by_isbn(vec![orphan]);
        assert_eq!(groups[UNKNOWN_ISBN].len(), 1);
    }

    // Each ranking key verified with a pair differing in exactly that field.

    #[test]
    fn rank_prefers_not_yet_inventoried() {
        let counted = rec(1, InShelf, Present, true, ISBN1);
        let uncounted = rec(2, InShelf, Present, false, ISBN1);
        assert_eq!(
            rank_records(vec![counted.clone(), uncounted.clone()]),
            vec![uncounted, counted]
        );
    }

    #[test]
    fn rank_prefers_confirmed_present() {
        let absent = rec(4, InShelf, Absent, false, ISBN1);
        let present = rec(2, InShelf, Present, false, ISBN1);
        assert_eq!(
            rank_records(vec![absent.clone(), present.clone()]),
            vec![present, absent]
        );
    }

    #[test]
    fn rank_prefers_in_shelf_status() {
        let borrowed = rec(12, Borrowed, Present, false, ISBN1);
        let in_shelf = rec(2, InShelf, Present, false, ISBN1);
        let lost = rec(22, Lost, Present, false, ISBN1);
        assert_eq!(
            rank_records(vec![borrowed.clone(), in_shelf.clone(), lost.clone()]),
            vec![in_shelf, borrowed, lost]
        );
    }

    #[test]
    fn rank_ties_break_on_record_id() {
        let older = rec(1, InShelf, Present, false, ISBN1);
        let newer = rec(9, InShelf, Present, false, ISBN1);
        assert_eq!(
            rank_records(vec![newer.clone(), older.clone()]),
            vec![older, newer]
        );
    }

    #[test]
    fn rank_is_stable_for_equal_records() {
        let a = rec(7, InShelf, Present, false, ISBN1);
        let b = a.clone();
        let ranked = rank_records(vec![a.clone(), b.clone()]);
        assert_eq!(ranked, vec![a, b]);
    }

    proptest! {
        #[test]
        fn rank_is_a_total_order(
            shape in prop::collection::vec((0u8..3, any::<bool>(), any::<bool>()), 0..32)
        ) {
            let records: Vec<_> = shape
                .iter()
                .enumerate()
                .map(|(i, &(s, present, inventoried))| {
                    let status = match s {
                        0 => InShelf,
                        1 => Borrowed,
                        _ => Lost,
                    };
                    let exists = if present { Present } else { Absent };
                    rec(i as u32, status, exists, inventoried, ISBN1)
                })
                .collect();

            let ranked = rank_records(records.clone());

            // Same multiset of records
            prop_assert_eq!(ranked.len(), records.len());
            let mut sorted_in: Vec<_> = records.iter().map(|r| r.record_id.clone()).collect();
            let mut sorted_out: Vec<_> = ranked.iter().map(|r| r.record_id.clone()).collect();
            sorted_in.sort();
            sorted_out.sort();
            prop_assert_eq!(sorted_in, sorted_out);

            // Non-decreasing by the ranking key, and idempotent
            for pair in ranked.windows(2) {
                prop_assert!(rank_key(&pair[0]) <= rank_key(&pair[1]));
            }
            prop_assert_eq!(rank_records(ranked.clone()), ranked);
        }
    }

    #[test]
    fn decide_matches_each_barcode_to_its_record() {
        let records = vec![
            rec(2, InShelf, Present, false, ISBN1),
            rec(30, InShelf, Present, false, ISBN2),
        ];
        let barcodes = vec![ISBN1.to_string(), ISBN2.to_string()];
        let actions = decide_actions(&barcodes, records.clone());

        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0], Action::TakeInventory(records[0].clone()));
        assert_eq!(actions[1], Action::TakeInventory(records[1].clone()));
    }

    #[test]
    fn decide_registers_unknown_barcode() {
        let actions = decide_actions(&[ISBN1.to_string()], Vec::new());
        assert_eq!(
            actions,
            vec![Action::RegisterNew {
                isbn: ISBN1.to_string()
            }]
        );
    }

    #[test]
    fn decide_excess_barcodes_fall_back_to_register() {
        let record = rec(2, InShelf, Present, false, ISBN1);
        let barcodes = vec![ISBN1.to_string(), ISBN1.to_string(), ISBN1.to_string()];
        let actions = decide_actions(&barcodes, vec![record.clone()]);

        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0], Action::TakeInventory(record));
        assert_eq!(
            actions[1],
            Action::RegisterNew {
                isbn: ISBN1.to_string()
            }
        );
        assert_eq!(actions[1], actions[2]);
    }

    #[test]
    fn decide_never_touches_inventoried_records() {
        let records = vec![
            rec(1, InShelf, Present, true, ISBN1),
            rec(3, InShelf, Absent, true, ISBN1),
            rec(11, Borrowed, Present, true, ISBN1),
            rec(13, Borrowed, Absent, true, ISBN1),
            rec(21, Lost, Present, true, ISBN1),
            rec(23, Lost, Absent, true, ISBN1),
        ];
        let actions = decide_actions(&[ISBN1.to_string()], records);

        // All candidates were already reconciled, so the barcode reads as a
        // book the ledger does not know.
        assert_eq!(
            actions,
            vec![Action::RegisterNew {
                isbn: ISBN1.to_string()
            }]
        );
    }

    #[test]
    fn decide_discards_when_marked_absent() {
        // The absence flag outranks status: whatever the ledger thought was
        // happening to the book, the scan proves the entry is stale.
        for status in [InShelf, Borrowed, Lost] {
            let record = rec(4, status, Absent, false, ISBN1);
            let actions = decide_actions(&[ISBN1.to_string()], vec![record.clone()]);
            assert_eq!(actions, vec![Action::Discard(record)]);
        }
    }

    #[test]
    fn decide_investigates_borrowed() {
        let record = rec(12, Borrowed, Present, false, ISBN1);
        let actions = decide_actions(&[ISBN1.to_string()], vec![record.clone()]);
        assert_eq!(actions, vec![Action::Investigate(record)]);
    }

    #[test]
    fn decide_found_for_lost() {
        let record = rec(22, Lost, Present, false, ISBN1);
        let actions = decide_actions(&[ISBN1.to_string()], vec![record.clone()]);
        assert_eq!(actions, vec![Action::Found(record)]);
    }

    #[test]
    fn decide_drains_ranked_candidates_in_order() {
        // Two un-inventoried records share an ISBN; the in-shelf one wins
        // the first scan, the borrowed one the second.
        let in_shelf = rec(2, InShelf, Present, false, ISBN1);
        let borrowed = rec(12, Borrowed, Present, false, ISBN1);
        let barcodes = vec![ISBN1.to_string(), ISBN1.to_string()];
        let actions = decide_actions(&barcodes, vec![borrowed.clone(), in_shelf.clone()]);

        assert_eq!(
            actions,
            vec![Action::TakeInventory(in_shelf), Action::Investigate(borrowed)]
        );
    }
}
