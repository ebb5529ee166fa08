use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use varun_core::api::AssessmentRecord;

/// Where assessment records live. Implementations must be safe to share across handlers.
pub trait AssessmentStore: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> anyhow::Result<()>;

    fn get(&self, id: &str) -> anyhow::Result<Option<AssessmentRecord>>;

    /// All records owned by `user_id`, newest first.
    fn list_for_user(&self, user_id: &str) -> anyhow::Result<Vec<AssessmentRecord>>;
}

/// In-memory store. Not durable; records are lost on restart.
#[derive(Default)]
pub struct InMemoryAssessmentStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Keyed by record id; the sequence number orders records sharing a timestamp.
    records: HashMap<String, (u64, AssessmentRecord)>,
    next_seq: u64,
}

impl InMemoryAssessmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow!("assessment store lock poisoned"))
    }
}

impl AssessmentStore for InMemoryAssessmentStore {
    fn insert(&self, record: AssessmentRecord) -> anyhow::Result<()> {
        let mut inner = self.lock()?;
        if inner.records.contains_key(&record.id) {
            return Err(anyhow!("duplicate assessment id {}", record.id));
        }
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.records.insert(record.id.clone(), (seq, record));
        Ok(())
    }

    fn get(&self, id: &str) -> anyhow::Result<Option<AssessmentRecord>> {
        let inner = self.lock()?;
        Ok(inner.records.get(id).map(|(_, r)| r.clone()))
    }

    fn list_for_user(&self, user_id: &str) -> anyhow::Result<Vec<AssessmentRecord>> {
        let inner = self.lock()?;
        let mut out: Vec<&(u64, AssessmentRecord)> = inner
            .records
            .values()
            .filter(|(_, r)| r.user_id == user_id)
            .collect();
        out.sort_by(|(sa, a), (sb, b)| {
            b.created_at_ms
                .cmp(&a.created_at_ms)
                .then_with(|| sb.cmp(sa))
        });
        Ok(out.into_iter().map(|(_, r)| r.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use varun_core::api::Location;
    use varun_core::{calculate_feasibility, AssessmentInput, RoofType, SoilType};

    fn record(id: &str, user: &str, created_at_ms: i64) -> AssessmentRecord {
        let input = AssessmentInput {
            roof_area: 100.0,
            annual_rainfall: 1000.0,
            soil_type: SoilType::Sandy,
            roof_type: RoofType::Concrete,
            number_of_people: 4,
        };
        AssessmentRecord {
            id: id.into(),
            user_id: user.into(),
            result: calculate_feasibility(&input),
            input,
            location: Location {
                latitude: 0.0,
                longitude: 0.0,
                address: None,
            },
            created_at_ms,
        }
    }

    #[test]
    fn lists_only_own_records_newest_first() {
        let store = InMemoryAssessmentStore::new();
        store.insert(record("a", "alice", 10)).unwrap();
        store.insert(record("b", "bob", 20)).unwrap();
        store.insert(record("c", "alice", 30)).unwrap();
        store.insert(record("d", "alice", 30)).unwrap();

        let ids: Vec<String> = store
            .list_for_user("alice")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["d", "c", "a"]);
        assert!(store.list_for_user("carol").unwrap().is_empty());
    }

    #[test]
    fn get_finds_by_id() {
        let store = InMemoryAssessmentStore::new();
        store.insert(record("a", "alice", 10)).unwrap();
        assert_eq!(store.get("a").unwrap().map(|r| r.user_id), Some("alice".into()));
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let store = InMemoryAssessmentStore::new();
        store.insert(record("a", "alice", 10)).unwrap();
        assert!(store.insert(record("a", "bob", 11)).is_err());
        assert_eq!(store.get("a").unwrap().map(|r| r.user_id), Some("alice".into()));
    }

    #[test]
    fn listing_ignores_insertion_order_of_timestamps() {
        let store = InMemoryAssessmentStore::new();
        store.insert(record("old", "alice", 5)).unwrap();
        store.insert(record("new", "alice", 50)).unwrap();
        store.insert(record("mid", "alice", 20)).unwrap();
        for i in 0..20 {
            store.insert(record(&format!("x{i}"), "bob", i)).unwrap();
        }

        let ids: Vec<String> = store
            .list_for_user("alice")
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(store.list_for_user("bob").unwrap().len(), 20);
    }
}
