use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::Promotion;
use crate::domain::errors::DomainError;
use crate::domain::ports::PromotionStore;
use crate::schema::{promotion_redemptions, promotions};

use super::models::{NewRedemptionRow, PromotionRow};

pub struct DieselPromotionStore {
    pool: DbPool,
}

impl DieselPromotionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl PromotionStore for DieselPromotionStore {
    fn find_by_name(&self, name: &str) -> Result<Option<Promotion>, DomainError> {
        let mut conn = self.pool.get()?;
        let row = promotions::table
            .filter(promotions::name.eq(name))
            .select(PromotionRow::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(row.map(Promotion::from))
    }

    fn is_redeemed(&self, promotion_id: Uuid, email: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        Ok(diesel::select(diesel::dsl::exists(
            promotion_redemptions::table
                .filter(promotion_redemptions::promotion_id.eq(promotion_id))
                .filter(promotion_redemptions::email.eq(email)),
        ))
        .get_result(&mut conn)?)
    }

    fn record_redemption(&self, promotion_id: Uuid, email: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        // The composite primary key makes the insert itself the uniqueness check.
        let inserted = diesel::insert_into(promotion_redemptions::table)
            .values(&NewRedemptionRow {
                promotion_id,
                email,
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)?;
        Ok(inserted == 1)
    }
}
