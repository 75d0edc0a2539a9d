//! Repository for the `property_tax_balances` table.

use async_trait::async_trait;
use iras_core::pagination::Page;
use iras_core::types::DbId;
use sqlx::PgPool;

use crate::error::RepoResult;
use crate::models::property_tax_balance::{
    CreatePropertyTaxBalance, PropertyTaxBalance, TaxBalanceFilter, UpdatePropertyTaxBalance,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, client_id, property_tax_ref, owner_tax_ref, postal_code, blk_house_no, \
    street_name, storey_no, unit_no, outstanding_balance, giro_payment, \
    deleted_at, created_at, updated_at";

#[async_trait]
pub trait PropertyTaxBalanceStore: Send + Sync {
    async fn create(&self, input: &CreatePropertyTaxBalance) -> RepoResult<PropertyTaxBalance>;

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<PropertyTaxBalance>>;

    /// Newest row matching every key present in `filter`.
    async fn search(&self, filter: &TaxBalanceFilter) -> RepoResult<Option<PropertyTaxBalance>>;

    async fn list(&self, page: &Page) -> RepoResult<(Vec<PropertyTaxBalance>, i64)>;

    async fn update(
        &self,
        id: DbId,
        input: &UpdatePropertyTaxBalance,
    ) -> RepoResult<Option<PropertyTaxBalance>>;

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool>;
}

/// PostgreSQL-backed [`PropertyTaxBalanceStore`].
pub struct PropertyTaxBalanceRepo {
    pool: PgPool,
}

impl PropertyTaxBalanceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyTaxBalanceStore for PropertyTaxBalanceRepo {
    async fn create(&self, input: &CreatePropertyTaxBalance) -> RepoResult<PropertyTaxBalance> {
        let query = format!(
            "INSERT INTO property_tax_balances
                (client_id, property_tax_ref, owner_tax_ref, postal_code, blk_house_no,
                 street_name, storey_no, unit_no, outstanding_balance, giro_payment)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PropertyTaxBalance>(&query)
            .bind(&input.client_id)
            .bind(&input.property_tax_ref)
            .bind(&input.owner_tax_ref)
            .bind(&input.postal_code)
            .bind(&input.blk_house_no)
            .bind(&input.street_name)
            .bind(&input.storey_no)
            .bind(&input.unit_no)
            .bind(input.outstanding_balance)
            .bind(input.giro_payment)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<PropertyTaxBalance>> {
        let query = format!(
            "SELECT {COLUMNS} FROM property_tax_balances WHERE id = $1 AND deleted_at IS NULL"
        );
        let row = sqlx::query_as::<_, PropertyTaxBalance>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn search(&self, filter: &TaxBalanceFilter) -> RepoResult<Option<PropertyTaxBalance>> {
        let query = format!(
            "SELECT {COLUMNS} FROM property_tax_balances
             WHERE client_id = $1
               AND ($2::TEXT IS NULL OR property_tax_ref = $2)
               AND ($3::TEXT IS NULL OR owner_tax_ref = $3)
               AND ($4::TEXT IS NULL OR postal_code = $4)
               AND ($5::TEXT IS NULL OR blk_house_no = $5)
               AND ($6::TEXT IS NULL OR street_name = $6)
               AND ($7::TEXT IS NULL OR storey_no = $7)
               AND ($8::TEXT IS NULL OR unit_no = $8)
               AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC
             LIMIT 1"
        );
        let row = sqlx::query_as::<_, PropertyTaxBalance>(&query)
            .bind(&filter.client_id)
            .bind(&filter.property_tax_ref)
            .bind(&filter.owner_tax_ref)
            .bind(&filter.postal_code)
            .bind(&filter.blk_house_no)
            .bind(&filter.street_name)
            .bind(&filter.storey_no)
            .bind(&filter.unit_no)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<PropertyTaxBalance>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM property_tax_balances WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        let query = format!(
            "SELECT {COLUMNS} FROM property_tax_balances WHERE deleted_at IS NULL
             ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        let rows = sqlx::query_as::<_, PropertyTaxBalance>(&query)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdatePropertyTaxBalance,
    ) -> RepoResult<Option<PropertyTaxBalance>> {
        let query = format!(
            "UPDATE property_tax_balances SET
                client_id = COALESCE($2, client_id),
                property_tax_ref = COALESCE($3, property_tax_ref),
                owner_tax_ref = COALESCE($4, owner_tax_ref),
                postal_code = COALESCE($5, postal_code),
                blk_house_no = COALESCE($6, blk_house_no),
                street_name = COALESCE($7, street_name),
                storey_no = COALESCE($8, storey_no),
                unit_no = COALESCE($9, unit_no),
                outstanding_balance = COALESCE($10, outstanding_balance),
                giro_payment = COALESCE($11, giro_payment)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PropertyTaxBalance>(&query)
            .bind(id)
            .bind(&input.client_id)
            .bind(&input.property_tax_ref)
            .bind(&input.owner_tax_ref)
            .bind(&input.postal_code)
            .bind(&input.blk_house_no)
            .bind(&input.street_name)
            .bind(&input.storey_no)
            .bind(&input.unit_no)
            .bind(input.outstanding_balance)
            .bind(input.giro_payment)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE property_tax_balances SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
