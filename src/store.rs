//! Storage seam shared by the HTTP layer and the aggregation engine.
//!
//! Every measurement category is an independent store behind [`RecordStore`];
//! users live behind [`UserStore`]. [`Stores`] bundles one handle per store and
//! is constructed once at startup, then passed down explicitly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use thiserror::Error;

use crate::db::models::{
    Accommodation, Electricity, FoodConsumption, GoodsPurchased, NewUser, Population, Transport, User,
    UserChanges, Waste, WaterConsumption, WaterTreatment,
};

/// The closed set of measurement categories.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Electricity,
    WaterConsumption,
    WaterTreatment,
    Waste,
    Transport,
    Accommodation,
    FoodConsumption,
    GoodsPurchased,
    Population,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Electricity,
        Category::WaterConsumption,
        Category::WaterTreatment,
        Category::Waste,
        Category::Transport,
        Category::Accommodation,
        Category::FoodConsumption,
        Category::GoodsPurchased,
        Category::Population,
    ];

    /// Route prefix of the category's CRUD endpoints.
    pub const fn path(self) -> &'static str {
        match self {
            Category::Electricity => "/electric",
            Category::WaterConsumption => "/water_consumption",
            Category::WaterTreatment => "/water_treatment",
            Category::Waste => "/waste",
            Category::Transport => "/transport",
            Category::Accommodation => "/accommodation",
            Category::FoodConsumption => "/food_consumption",
            Category::GoodsPurchased => "/goods",
            Category::Population => "/population",
        }
    }

    /// Key used in the dashboard component breakdown.
    pub const fn label(self) -> &'static str {
        match self {
            Category::Electricity => "Electrical",
            Category::WaterConsumption => "Water",
            Category::WaterTreatment => "Water Treatment",
            Category::Waste => "Waste",
            Category::Transport => "Transport",
            Category::Accommodation => "Accommodation",
            Category::FoodConsumption => "Food",
            Category::GoodsPurchased => "Goods Purchased",
            Category::Population => "Population",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let noun = match self {
            Category::Electricity => "electric consumption",
            Category::WaterConsumption => "water consumption",
            Category::WaterTreatment => "water treatment",
            Category::Waste => "waste entry",
            Category::Transport => "transport entry",
            Category::Accommodation => "accommodation entry",
            Category::FoodConsumption => "food consumption",
            Category::GoodsPurchased => "goods purchased entry",
            Category::Population => "population entry",
        };
        f.write_str(noun)
    }
}

/// A stored measurement of one category.
///
/// `New` is the write shape: every column except the store-assigned `id`. It is
/// what `create` accepts and what a partial update is merged into.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type New: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    const CATEGORY: Category;

    fn id(&self) -> i64;

    fn date(&self) -> DateTime<Utc>;

    /// Applies server-side defaults and rejects values the store must never hold.
    fn prepare(new: &mut Self::New) -> Result<(), String>;

    fn store(stores: &Stores) -> &dyn RecordStore<Self>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record {0} not found")]
    NotFound(i64),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<diesel::result::Error> for StoreError {
    fn from(value: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match value {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                StoreError::Conflict(info.message().to_string())
            }
            other => StoreError::Storage(other.to_string()),
        }
    }
}

impl From<diesel::r2d2::PoolError> for StoreError {
    fn from(value: diesel::r2d2::PoolError) -> Self {
        StoreError::Storage(format!("connection pool: {}", value))
    }
}

/// CRUD over a single category's records.
pub trait RecordStore<R: Record>: Send + Sync {
    /// Persists a new record and returns its generated id.
    fn create(&self, new: R::New) -> Result<i64, StoreError>;

    /// All records, newest `date` first.
    fn list(&self) -> Result<Vec<R>, StoreError>;

    fn get(&self, id: i64) -> Result<R, StoreError>;

    /// Overwrites every column of an existing record.
    fn update(&self, id: i64, record: R::New) -> Result<(), StoreError>;

    /// Removes a record. Deleting an absent id is not an error.
    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

pub trait UserStore: Send + Sync {
    fn create(&self, new: NewUser) -> Result<i64, StoreError>;

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    fn list(&self) -> Result<Vec<User>, StoreError>;

    fn get(&self, id: i64) -> Result<User, StoreError>;

    fn update(&self, id: i64, changes: UserChanges) -> Result<(), StoreError>;

    fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// One handle per store. Cheap to clone.
#[derive(Clone)]
pub struct Stores {
    pub electricity: Arc<dyn RecordStore<Electricity>>,
    pub water_consumption: Arc<dyn RecordStore<WaterConsumption>>,
    pub water_treatment: Arc<dyn RecordStore<WaterTreatment>>,
    pub waste: Arc<dyn RecordStore<Waste>>,
    pub transport: Arc<dyn RecordStore<Transport>>,
    pub accommodation: Arc<dyn RecordStore<Accommodation>>,
    pub food_consumption: Arc<dyn RecordStore<FoodConsumption>>,
    pub goods_purchased: Arc<dyn RecordStore<GoodsPurchased>>,
    pub population: Arc<dyn RecordStore<Population>>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub fn records<R: Record>(&self) -> &dyn RecordStore<R> {
        R::store(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_paths_are_unique() {
        let mut paths = Category::ALL.iter().map(|c| c.path()).collect::<Vec<_>>();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), Category::ALL.len());
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        struct Info;
        impl diesel::result::DatabaseErrorInformation for Info {
            fn message(&self) -> &str {
                "duplicate key value violates unique constraint \"users_email_key\""
            }
            fn details(&self) -> Option<&str> {
                None
            }
            fn hint(&self) -> Option<&str> {
                None
            }
            fn table_name(&self) -> Option<&str> {
                Some("users")
            }
            fn column_name(&self) -> Option<&str> {
                None
            }
            fn constraint_name(&self) -> Option<&str> {
                Some("users_email_key")
            }
            fn statement_position(&self) -> Option<i32> {
                None
            }
        }

        let err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new(Info),
        );
        assert!(matches!(StoreError::from(err), StoreError::Conflict(_)));
        assert!(matches!(
            StoreError::from(diesel::result::Error::RollbackTransaction),
            StoreError::Storage(_)
        ));
    }
}
