use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{Candle, Collection};
use crate::domain::errors::DomainError;
use crate::domain::ports::CatalogStore;
use crate::schema::{candles, collection_candles, collections};

use super::models::{CandleRow, CollectionRow};

pub struct DieselCatalogStore {
    pool: DbPool,
}

impl DieselCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CatalogStore for DieselCatalogStore {
    fn get_by_id(&self, id: Uuid) -> Result<Option<Candle>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = candles::table
            .filter(candles::id.eq(id))
            .select(CandleRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Candle::from))
    }

    fn list_candles(&self) -> Result<Vec<Candle>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = candles::table
            .select(CandleRow::as_select())
            .order(candles::name_en.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Candle::from).collect())
    }

    fn list_collections(&self) -> Result<Vec<Collection>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = collections::table
            .select(CollectionRow::as_select())
            .order(collections::name.asc())
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Collection::from).collect())
    }

    fn collection_candles(&self, name: &str) -> Result<Option<Vec<Candle>>, DomainError> {
        let mut conn = self.pool.get()?;

        let exists: bool = diesel::select(diesel::dsl::exists(
            collections::table.filter(collections::name.eq(name)),
        ))
        .get_result(&mut conn)?;
        if !exists {
            return Ok(None);
        }

        let rows = collection_candles::table
            .inner_join(candles::table)
            .filter(collection_candles::collection_name.eq(name))
            .select(CandleRow::as_select())
            .order(candles::name_en.asc())
            .load(&mut conn)?;
        Ok(Some(rows.into_iter().map(Candle::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::DieselCatalogStore;
    use crate::domain::ports::CatalogStore;
    use crate::infrastructure::models::CollectionRow;
    use crate::infrastructure::test_db::{seed_candle, setup_db};
    use crate::schema::{collection_candles, collections};

    #[tokio::test]
    async fn get_by_id_returns_prices() {
        let (_container, pool) = setup_db().await;
        let seeded = seed_candle(&pool, "Lavender", 2999.5);
        let store = DieselCatalogStore::new(pool);

        let candle = store
            .get_by_id(seeded.id)
            .expect("lookup failed")
            .expect("candle should exist");
        assert_eq!(candle.price_huf, 2999.5);
        assert!(store.get_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[tokio::test]
    async fn collection_lists_its_candles() {
        let (_container, pool) = setup_db().await;
        let amber = seed_candle(&pool, "Amber", 4500.0);
        seed_candle(&pool, "Lavender", 3000.0);
        {
            let mut conn = pool.get().unwrap();
            diesel::insert_into(collections::table)
                .values(&CollectionRow {
                    name: "winter".to_string(),
                    description: Some("Warm scents".to_string()),
                })
                .execute(&mut conn)
                .unwrap();
            diesel::insert_into(collection_candles::table)
                .values((
                    collection_candles::collection_name.eq("winter"),
                    collection_candles::candle_id.eq(amber.id),
                ))
                .execute(&mut conn)
                .unwrap();
        }
        let store = DieselCatalogStore::new(pool);

        assert_eq!(store.list_candles().unwrap().len(), 2);
        assert_eq!(store.list_collections().unwrap()[0].name, "winter");

        let winter = store.collection_candles("winter").unwrap().unwrap();
        assert_eq!(winter.len(), 1);
        assert_eq!(winter[0].id, amber.id);
        assert!(store.collection_candles("summer").unwrap().is_none());
    }
}
