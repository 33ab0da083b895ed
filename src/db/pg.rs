//! PostgreSQL-backed stores (diesel + r2d2).

use diesel::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::info;
use std::sync::Arc;

use crate::db::models::{
    Accommodation, Electricity, FoodConsumption, GoodsPurchased, NewUser, Population, Transport, User,
    UserChanges, Waste, WaterConsumption, WaterTreatment,
};
use crate::schema;
use crate::store::{Record, RecordStore, StoreError, Stores, UserStore};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub fn connect(database_url: &str, max_size: u32) -> Result<PgPool, String> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| format!("DB connection failed: {}", e))
}

pub fn apply_database_migrations(pool: &PgPool) -> Result<(), String> {
    let mut conn = pool
        .get()
        .map_err(|e| format!("DB connection for migrations failed: {}", e))?;
    match conn.run_pending_migrations(MIGRATIONS) {
        Ok(applied) => {
            if applied.is_empty() {
                info!("Database schema is up to date; no migrations were applied");
            } else {
                let names = applied.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
                info!("Applied {} database migration(s): {}", applied.len(), names);
            }
            Ok(())
        }
        Err(e) => Err(format!("Applying database migrations failed: {}", e)),
    }
}

/// Every store served from one connection pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, StoreError> {
        Ok(self.pool.get()?)
    }
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let pg = Arc::new(PgStore::new(pool));
        Stores {
            electricity: pg.clone(),
            water_consumption: pg.clone(),
            water_treatment: pg.clone(),
            waste: pg.clone(),
            transport: pg.clone(),
            accommodation: pg.clone(),
            food_consumption: pg.clone(),
            goods_purchased: pg.clone(),
            population: pg.clone(),
            users: pg,
        }
    }
}

macro_rules! pg_record_store {
    ($record:ty, $table:ident) => {
        impl RecordStore<$record> for PgStore {
            fn create(&self, new: <$record as Record>::New) -> Result<i64, StoreError> {
                use schema::$table::dsl as T;

                let mut conn = self.conn()?;
                let id = diesel::insert_into(T::$table)
                    .values(&new)
                    .returning(T::id)
                    .get_result(&mut conn)?;
                Ok(id)
            }

            fn list(&self) -> Result<Vec<$record>, StoreError> {
                use schema::$table::dsl as T;

                let mut conn = self.conn()?;
                let rows = T::$table
                    .order((T::date.desc(), T::id.desc()))
                    .select(<$record>::as_select())
                    .load(&mut conn)?;
                Ok(rows)
            }

            fn get(&self, id: i64) -> Result<$record, StoreError> {
                use schema::$table::dsl as T;

                let mut conn = self.conn()?;
                T::$table
                    .find(id)
                    .select(<$record>::as_select())
                    .first(&mut conn)
                    .optional()?
                    .ok_or(StoreError::NotFound(id))
            }

            fn update(&self, id: i64, record: <$record as Record>::New) -> Result<(), StoreError> {
                use schema::$table::dsl as T;

                let mut conn = self.conn()?;
                let changed = diesel::update(T::$table.find(id)).set(&record).execute(&mut conn)?;
                if changed == 0 {
                    return Err(StoreError::NotFound(id));
                }
                Ok(())
            }

            fn delete(&self, id: i64) -> Result<(), StoreError> {
                use schema::$table::dsl as T;

                let mut conn = self.conn()?;
                diesel::delete(T::$table.find(id)).execute(&mut conn)?;
                Ok(())
            }
        }
    };
}

pg_record_store!(Electricity, electric_consumption);
pg_record_store!(WaterConsumption, water_consumption);
pg_record_store!(WaterTreatment, water_treatment);
pg_record_store!(Waste, waste);
pg_record_store!(Transport, transport);
pg_record_store!(Accommodation, accommodation);
pg_record_store!(FoodConsumption, food_consumption);
pg_record_store!(GoodsPurchased, goods_purchased);
pg_record_store!(Population, population);

impl UserStore for PgStore {
    fn create(&self, new: NewUser) -> Result<i64, StoreError> {
        use schema::users::dsl as U;

        let mut conn = self.conn()?;
        let id = diesel::insert_into(U::users)
            .values(&new)
            .returning(U::id)
            .get_result(&mut conn)?;
        Ok(id)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        use schema::users::dsl as U;

        let mut conn = self.conn()?;
        let user = U::users
            .filter(U::email.eq(email))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(user)
    }

    fn list(&self) -> Result<Vec<User>, StoreError> {
        use schema::users::dsl as U;

        let mut conn = self.conn()?;
        let users = U::users.order(U::id.asc()).select(User::as_select()).load(&mut conn)?;
        Ok(users)
    }

    fn get(&self, id: i64) -> Result<User, StoreError> {
        use schema::users::dsl as U;

        let mut conn = self.conn()?;
        U::users
            .find(id)
            .select(User::as_select())
            .first(&mut conn)
            .optional()?
            .ok_or(StoreError::NotFound(id))
    }

    fn update(&self, id: i64, changes: UserChanges) -> Result<(), StoreError> {
        use schema::users::dsl as U;

        let mut conn = self.conn()?;
        let changed = diesel::update(U::users.find(id)).set(&changes).execute(&mut conn)?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), StoreError> {
        use schema::users::dsl as U;

        let mut conn = self.conn()?;
        diesel::delete(U::users.find(id)).execute(&mut conn)?;
        Ok(())
    }
}
