//! In-process stores used by unit tests in place of PostgreSQL.

use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::db::models::{NewUser, User, UserChanges};
use crate::store::{Category, Record, RecordStore, StoreError, Stores, UserStore};

/// Counts every call so tests can assert a store was never touched.
#[derive(Debug, Default)]
pub struct Probe {
    calls: AtomicUsize,
    failing: AtomicBool,
    failing_categories: Mutex<BTreeSet<Category>>,
}

impl Probe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every later call fail with a storage error.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Make later calls fail only on the store holding `category`.
    pub fn fail_category(&self, category: Category) {
        self.failing_categories.lock().expect("probe lock").insert(category);
    }

    fn hit(&self, category: Option<Category>) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let category_failing = category
            .is_some_and(|c| self.failing_categories.lock().expect("probe lock").contains(&c));
        if self.failing.load(Ordering::SeqCst) || category_failing {
            return Err(StoreError::Storage("connection refused".to_string()));
        }
        Ok(())
    }
}

pub struct MemoryStore<R> {
    rows: Mutex<BTreeMap<i64, R>>,
    next_id: AtomicUsize,
    pub probe: Arc<Probe>,
}

impl<R> MemoryStore<R> {
    pub fn new(probe: Arc<Probe>) -> Self {
        MemoryStore {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicUsize::new(1),
            probe,
        }
    }
}

fn materialize<R: Record>(id: i64, new: &R::New) -> Result<R, StoreError> {
    let mut value = serde_json::to_value(new).map_err(|e| StoreError::Storage(e.to_string()))?;
    if let Value::Object(map) = &mut value {
        map.insert("id".to_string(), Value::from(id));
    }
    serde_json::from_value(value).map_err(|e| StoreError::Storage(e.to_string()))
}

impl<R: Record> RecordStore<R> for MemoryStore<R> {
    fn create(&self, new: R::New) -> Result<i64, StoreError> {
        self.probe.hit(Some(R::CATEGORY))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let record = materialize::<R>(id, &new)?;
        self.rows.lock().expect("store lock").insert(id, record);
        Ok(id)
    }

    fn list(&self) -> Result<Vec<R>, StoreError> {
        self.probe.hit(Some(R::CATEGORY))?;
        let mut rows = self.rows.lock().expect("store lock").values().cloned().collect::<Vec<_>>();
        rows.sort_by(|a, b| b.date().cmp(&a.date()).then(b.id().cmp(&a.id())));
        Ok(rows)
    }

    fn get(&self, id: i64) -> Result<R, StoreError> {
        self.probe.hit(Some(R::CATEGORY))?;
        self.rows
            .lock()
            .expect("store lock")
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: i64, record: R::New) -> Result<(), StoreError> {
        self.probe.hit(Some(R::CATEGORY))?;
        let mut rows = self.rows.lock().expect("store lock");
        let slot = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        *slot = materialize::<R>(id, &record)?;
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.probe.hit(Some(R::CATEGORY))?;
        self.rows.lock().expect("store lock").remove(&id);
        Ok(())
    }
}

pub struct MemoryUserStore {
    rows: Mutex<BTreeMap<i64, User>>,
    next_id: AtomicUsize,
    pub probe: Arc<Probe>,
}

impl UserStore for MemoryUserStore {
    fn create(&self, new: NewUser) -> Result<i64, StoreError> {
        self.probe.hit(None)?;
        let mut rows = self.rows.lock().expect("store lock");
        if rows.values().any(|u| u.email == new.email) {
            return Err(StoreError::Conflict(format!("email {} already exists", new.email)));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        let now = Utc::now();
        rows.insert(
            id,
            User {
                id,
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
                role: new.role,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.probe.hit(None)?;
        Ok(self
            .rows
            .lock()
            .expect("store lock")
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    fn list(&self) -> Result<Vec<User>, StoreError> {
        self.probe.hit(None)?;
        Ok(self.rows.lock().expect("store lock").values().cloned().collect())
    }

    fn get(&self, id: i64) -> Result<User, StoreError> {
        self.probe.hit(None)?;
        self.rows
            .lock()
            .expect("store lock")
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: i64, changes: UserChanges) -> Result<(), StoreError> {
        self.probe.hit(None)?;
        let mut rows = self.rows.lock().expect("store lock");
        if let Some(email) = &changes.email
            && rows.values().any(|u| u.id != id && &u.email == email)
        {
            return Err(StoreError::Conflict(format!("email {} already exists", email)));
        }
        let user = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(ts) = changes.updated_at {
            user.updated_at = ts;
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.probe.hit(None)?;
        self.rows.lock().expect("store lock").remove(&id);
        Ok(())
    }
}

impl Stores {
    /// Fresh, empty stores sharing one probe.
    pub fn in_memory() -> (Self, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        let stores = Stores {
            electricity: Arc::new(MemoryStore::new(probe.clone())),
            water_consumption: Arc::new(MemoryStore::new(probe.clone())),
            water_treatment: Arc::new(MemoryStore::new(probe.clone())),
            waste: Arc::new(MemoryStore::new(probe.clone())),
            transport: Arc::new(MemoryStore::new(probe.clone())),
            accommodation: Arc::new(MemoryStore::new(probe.clone())),
            food_consumption: Arc::new(MemoryStore::new(probe.clone())),
            goods_purchased: Arc::new(MemoryStore::new(probe.clone())),
            population: Arc::new(MemoryStore::new(probe.clone())),
            users: Arc::new(MemoryUserStore {
                rows: Mutex::new(BTreeMap::new()),
                next_id: AtomicUsize::new(1),
                probe: probe.clone(),
            }),
        };
        (stores, probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Electricity, NewPopulation, Population};
    use chrono::{Duration, TimeZone};

    fn population(day: u32, registered: i32) -> NewPopulation {
        NewPopulation {
            date: Utc.with_ymd_and_hms(2024, 3, day, 9, 0, 0).unwrap(),
            location: "Gate 1".into(),
            registered_count: registered,
            floating_count: 0,
            remarks: None,
        }
    }

    #[test]
    fn create_then_get_round_trips() {
        let (stores, _) = Stores::in_memory();
        let store = stores.records::<Population>();
        let new = population(1, 120);
        let id = store.create(new.clone()).unwrap();

        let got = store.get(id).unwrap();
        assert_eq!(got.id, id);
        assert_eq!(got.date, new.date);
        assert_eq!(got.registered_count, 120);
    }

    #[test]
    fn list_is_newest_first() {
        let (stores, _) = Stores::in_memory();
        let store = stores.records::<Population>();
        store.create(population(1, 1)).unwrap();
        store.create(population(3, 3)).unwrap();
        store.create(population(2, 2)).unwrap();

        let counts = store.list().unwrap().iter().map(|p| p.registered_count).collect::<Vec<_>>();
        assert_eq!(counts, vec![3, 2, 1]);
    }

    #[test]
    fn delete_is_idempotent_and_get_reports_not_found() {
        let (stores, _) = Stores::in_memory();
        let store = stores.records::<Population>();
        let id = store.create(population(1, 5)).unwrap();

        store.delete(id).unwrap();
        store.delete(id).unwrap();
        assert!(matches!(store.get(id), Err(StoreError::NotFound(missing)) if missing == id));
    }

    #[test]
    fn category_failure_leaves_other_stores_working() {
        let (stores, probe) = Stores::in_memory();
        probe.fail_category(Category::Population);

        assert!(matches!(
            stores.records::<Population>().create(population(1, 5)),
            Err(StoreError::Storage(_))
        ));
        assert!(stores.records::<Electricity>().list().unwrap().is_empty());
        assert!(stores.users.list().unwrap().is_empty());
    }

    #[test]
    fn update_of_missing_record_is_not_found() {
        let (stores, _) = Stores::in_memory();
        let store = stores.records::<Population>();
        let mut new = population(1, 5);
        new.date += Duration::hours(1);
        assert!(matches!(store.update(42, new), Err(StoreError::NotFound(42))));
    }
}
