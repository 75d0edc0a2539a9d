//! Process-local stores.
//!
//! Every store wraps a [`MemoryTable`], a vector of rows behind a tokio
//! `RwLock`. The table applies the same rules as the PostgreSQL schema:
//! - ids come from a counter and are never reused;
//! - unique keys are checked against every row, soft-deleted ones included,
//!   and report the schema's constraint names;
//! - soft-deleted rows are invisible to reads;
//! - lists are ordered `created_at DESC, id DESC`.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use iras_core::pagination::Page;
use iras_core::types::{DbId, Timestamp};
use tokio::sync::RwLock;

use crate::error::{RepoError, RepoResult};
use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::cit_conversion::{CitConversion, CreateCitConversion, UpdateCitConversion};
use crate::models::gst_registration::{
    CreateGstRegistration, GstRegistration, UpdateGstRegistration,
};
use crate::models::product::{CreateProduct, Product, UpdateProduct};
use crate::models::property_statement::{
    CreatePropertyStatement, PropertyStatement, UpdatePropertyStatement,
};
use crate::models::property_tax_balance::{
    CreatePropertyTaxBalance, PropertyTaxBalance, TaxBalanceFilter, UpdatePropertyTaxBalance,
};
use crate::models::rental_submission::{
    CreateRentalSubmission, RentalSubmission, UpdateRentalSubmission,
};
use crate::models::singpass::{
    CreateSingPassAuthRecord, CreateSingPassTokenRecord, SingPassAuthRecord, SingPassTokenRecord,
    UpdateSingPassAuthRecord, UpdateSingPassTokenRecord,
};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::{
    CategoryStore, CitConversionStore, GstRegistrationStore, ProductStore,
    PropertyStatementStore, PropertyTaxBalanceStore, RentalSubmissionStore, SingPassAuthStore,
    SingPassTokenStore, UserStore,
};

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Row behaviour the table needs from every entity.
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> DbId;
    fn created_at(&self) -> Timestamp;
    fn is_deleted(&self) -> bool;
    fn mark_deleted(&mut self, at: Timestamp);
    fn touch(&mut self, at: Timestamp);
    /// `(constraint, key)` pairs that must be unique across the table.
    fn unique_keys(&self) -> Vec<(&'static str, String)>;
}

macro_rules! impl_record {
    ($ty:ty $(, $constraint:literal => $key:expr)* $(,)?) => {
        impl Record for $ty {
            fn id(&self) -> DbId {
                self.id
            }

            fn created_at(&self) -> Timestamp {
                self.created_at
            }

            fn is_deleted(&self) -> bool {
                self.deleted_at.is_some()
            }

            fn mark_deleted(&mut self, at: Timestamp) {
                self.deleted_at = Some(at);
                self.updated_at = at;
            }

            fn touch(&mut self, at: Timestamp) {
                self.updated_at = at;
            }

            fn unique_keys(&self) -> Vec<(&'static str, String)> {
                vec![$(($constraint, {
                    let key: fn(&$ty) -> String = $key;
                    key(self)
                })),*]
            }
        }
    };
}

impl_record!(GstRegistration, "uq_gst_registrations_registration_id" => |r| {
    r.registration_id.clone()
});
impl_record!(PropertyStatement, "uq_property_statements_ref" => |r| {
    format!("{}\u{1f}{}", r.ref_no, r.property_tax_ref)
});
impl_record!(PropertyTaxBalance);
impl_record!(RentalSubmission, "uq_rental_submissions_ref_no" => |r| r.ref_no.clone());
impl_record!(CitConversion, "uq_cit_conversions_conversion_id" => |r| r.conversion_id.clone());
impl_record!(SingPassAuthRecord, "uq_singpass_auth_records_state" => |r| r.state.clone());
impl_record!(
    SingPassTokenRecord,
    "uq_singpass_token_records_access_token" => |r| r.access_token.clone(),
);
impl_record!(
    User,
    "uq_users_username" => |r| r.username.clone(),
    "uq_users_email" => |r| r.email.clone(),
);
impl_record!(Category, "uq_categories_name" => |r| r.name.clone());
impl_record!(Product);

/// A vector of rows with an id sequence.
pub struct MemoryTable<T> {
    rows: RwLock<Vec<T>>,
    next_id: AtomicI64,
}

impl<T> Default for MemoryTable<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn check_unique<T: Record>(rows: &[T], candidate: &T) -> RepoResult<()> {
    for (constraint, key) in candidate.unique_keys() {
        let taken = rows
            .iter()
            .filter(|row| row.id() != candidate.id())
            .any(|row| row.unique_keys().contains(&(constraint, key.clone())));
        if taken {
            return Err(RepoError::UniqueViolation(constraint.to_string()));
        }
    }
    Ok(())
}

impl<T: Record> MemoryTable<T> {
    /// Build a row with the next id and the current time, then insert it.
    /// A rejected row still consumes its id, like a database sequence.
    pub async fn insert(&self, build: impl FnOnce(DbId, Timestamp) -> T) -> RepoResult<T> {
        let mut rows = self.rows.write().await;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = build(id, Utc::now());
        check_unique(&rows, &row)?;
        rows.push(row.clone());
        Ok(row)
    }

    /// Oldest live row matching `pred`.
    pub async fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let rows = self.rows.read().await;
        rows.iter().find(|r| !r.is_deleted() && pred(r)).cloned()
    }

    /// Newest live row matching `pred`.
    pub async fn find_newest(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        let rows = self.rows.read().await;
        rows.iter()
            .filter(|r| !r.is_deleted() && pred(r))
            .max_by_key(|r| (r.created_at(), r.id()))
            .cloned()
    }

    pub async fn find_by_id(&self, id: DbId) -> Option<T> {
        self.find(|r| r.id() == id).await
    }

    /// True when a row with this id exists, deleted or not.
    pub async fn exists(&self, id: DbId) -> bool {
        self.rows.read().await.iter().any(|r| r.id() == id)
    }

    pub async fn count(&self, pred: impl Fn(&T) -> bool) -> i64 {
        let rows = self.rows.read().await;
        rows.iter().filter(|r| !r.is_deleted() && pred(r)).count() as i64
    }

    pub async fn list(&self, page: &Page) -> (Vec<T>, i64) {
        let rows = self.rows.read().await;
        let mut live: Vec<&T> = rows.iter().filter(|r| !r.is_deleted()).collect();
        live.sort_by(|a, b| (b.created_at(), b.id()).cmp(&(a.created_at(), a.id())));
        let total = live.len() as i64;
        let items = live
            .into_iter()
            .skip(page.offset().max(0) as usize)
            .take(page.limit.max(0) as usize)
            .cloned()
            .collect();
        (items, total)
    }

    /// Apply `patch` to a live row. Returns `None` when the row is missing.
    pub async fn update(&self, id: DbId, patch: impl FnOnce(&mut T)) -> RepoResult<Option<T>> {
        let mut rows = self.rows.write().await;
        let Some(index) = rows.iter().position(|r| r.id() == id && !r.is_deleted()) else {
            return Ok(None);
        };
        let mut row = rows[index].clone();
        patch(&mut row);
        row.touch(Utc::now());
        check_unique(&rows, &row)?;
        rows[index] = row.clone();
        Ok(Some(row))
    }

    /// Remove a row outright, undoing an insert that has to roll back.
    pub async fn discard(&self, id: DbId) {
        self.rows.write().await.retain(|r| r.id() != id);
    }

    pub async fn soft_delete(&self, id: DbId) -> bool {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|r| r.id() == id && !r.is_deleted()) {
            Some(row) => {
                row.mark_deleted(Utc::now());
                true
            }
            None => false,
        }
    }
}

fn set<T>(field: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(v) = value {
        *field = v.clone();
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// GST registrations
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryGstRegistrationStore {
    table: MemoryTable<GstRegistration>,
}

#[async_trait]
impl GstRegistrationStore for MemoryGstRegistrationStore {
    async fn create(&self, input: &CreateGstRegistration) -> RepoResult<GstRegistration> {
        self.table
            .insert(|id, now| GstRegistration {
                id,
                client_id: input.client_id.clone(),
                registration_id: input.registration_id.clone(),
                gst_registration_number: input.gst_registration_number.clone(),
                name: input.name.clone(),
                registered_from: input.registered_from.clone(),
                registered_to: input.registered_to.clone(),
                status: input.status.clone(),
                remarks: input.remarks.clone(),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<GstRegistration>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_registration(
        &self,
        registration_id: &str,
        client_id: &str,
    ) -> RepoResult<Option<GstRegistration>> {
        Ok(self
            .table
            .find(|r| r.registration_id == registration_id && r.client_id == client_id)
            .await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<GstRegistration>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateGstRegistration,
    ) -> RepoResult<Option<GstRegistration>> {
        self.table
            .update(id, |r| {
                set(&mut r.client_id, &input.client_id);
                set(&mut r.gst_registration_number, &input.gst_registration_number);
                set(&mut r.name, &input.name);
                set(&mut r.registered_from, &input.registered_from);
                set(&mut r.registered_to, &input.registered_to);
                set(&mut r.status, &input.status);
                set(&mut r.remarks, &input.remarks);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

// ---------------------------------------------------------------------------
// Property statements
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryPropertyStatementStore {
    table: MemoryTable<PropertyStatement>,
}

#[async_trait]
impl PropertyStatementStore for MemoryPropertyStatementStore {
    async fn create(&self, input: &CreatePropertyStatement) -> RepoResult<PropertyStatement> {
        self.table
            .insert(|id, now| PropertyStatement {
                id,
                ref_no: input.ref_no.clone(),
                property_tax_ref: input.property_tax_ref.clone(),
                statement_date: input.statement_date.clone(),
                total_amount: input.total_amount.clone(),
                consolidated_data: input.consolidated_data.clone(),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<PropertyStatement>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_ref(
        &self,
        ref_no: &str,
        property_tax_ref: &str,
    ) -> RepoResult<Option<PropertyStatement>> {
        Ok(self
            .table
            .find(|r| r.ref_no == ref_no && r.property_tax_ref == property_tax_ref)
            .await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<PropertyStatement>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdatePropertyStatement,
    ) -> RepoResult<Option<PropertyStatement>> {
        self.table
            .update(id, |r| {
                set(&mut r.statement_date, &input.statement_date);
                set(&mut r.total_amount, &input.total_amount);
                set(&mut r.consolidated_data, &input.consolidated_data);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

// ---------------------------------------------------------------------------
// Property tax balances
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryPropertyTaxBalanceStore {
    table: MemoryTable<PropertyTaxBalance>,
}

#[async_trait]
impl PropertyTaxBalanceStore for MemoryPropertyTaxBalanceStore {
    async fn create(&self, input: &CreatePropertyTaxBalance) -> RepoResult<PropertyTaxBalance> {
        self.table
            .insert(|id, now| PropertyTaxBalance {
                id,
                client_id: input.client_id.clone(),
                property_tax_ref: input.property_tax_ref.clone(),
                owner_tax_ref: input.owner_tax_ref.clone(),
                postal_code: input.postal_code.clone(),
                blk_house_no: input.blk_house_no.clone(),
                street_name: input.street_name.clone(),
                storey_no: input.storey_no.clone(),
                unit_no: input.unit_no.clone(),
                outstanding_balance: input.outstanding_balance,
                giro_payment: input.giro_payment,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<PropertyTaxBalance>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn search(&self, filter: &TaxBalanceFilter) -> RepoResult<Option<PropertyTaxBalance>> {
        Ok(self.table.find_newest(|r| filter.matches(r)).await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<PropertyTaxBalance>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdatePropertyTaxBalance,
    ) -> RepoResult<Option<PropertyTaxBalance>> {
        self.table
            .update(id, |r| {
                set(&mut r.client_id, &input.client_id);
                if input.property_tax_ref.is_some() {
                    r.property_tax_ref = input.property_tax_ref.clone();
                }
                if input.owner_tax_ref.is_some() {
                    r.owner_tax_ref = input.owner_tax_ref.clone();
                }
                if input.postal_code.is_some() {
                    r.postal_code = input.postal_code.clone();
                }
                if input.blk_house_no.is_some() {
                    r.blk_house_no = input.blk_house_no.clone();
                }
                if input.street_name.is_some() {
                    r.street_name = input.street_name.clone();
                }
                if input.storey_no.is_some() {
                    r.storey_no = input.storey_no.clone();
                }
                if input.unit_no.is_some() {
                    r.unit_no = input.unit_no.clone();
                }
                set(&mut r.outstanding_balance, &input.outstanding_balance);
                set(&mut r.giro_payment, &input.giro_payment);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

// ---------------------------------------------------------------------------
// Rental submissions
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRentalSubmissionStore {
    table: MemoryTable<RentalSubmission>,
}

#[async_trait]
impl RentalSubmissionStore for MemoryRentalSubmissionStore {
    async fn create(&self, input: &CreateRentalSubmission) -> RepoResult<RentalSubmission> {
        self.table
            .insert(|id, now| RentalSubmission {
                id,
                ref_no: input.ref_no.clone(),
                assmt_year: input.assmt_year,
                authorised_person_email: input.authorised_person_email.clone(),
                authorised_person_name: input.authorised_person_name.clone(),
                development_name: input.development_name.clone(),
                submission_data: input.submission_data.clone(),
                total_properties: input.total_properties,
                status: or_default(&input.status, iras_core::rental::STATUS_SUBMITTED),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<RentalSubmission>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_ref_no(&self, ref_no: &str) -> RepoResult<Option<RentalSubmission>> {
        Ok(self.table.find(|r| r.ref_no == ref_no).await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<RentalSubmission>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateRentalSubmission,
    ) -> RepoResult<Option<RentalSubmission>> {
        self.table
            .update(id, |r| {
                set(&mut r.assmt_year, &input.assmt_year);
                set(&mut r.authorised_person_email, &input.authorised_person_email);
                set(&mut r.authorised_person_name, &input.authorised_person_name);
                set(&mut r.development_name, &input.development_name);
                set(&mut r.submission_data, &input.submission_data);
                set(&mut r.total_properties, &input.total_properties);
                set(&mut r.status, &input.status);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

// ---------------------------------------------------------------------------
// CIT conversions
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryCitConversionStore {
    table: MemoryTable<CitConversion>,
}

#[async_trait]
impl CitConversionStore for MemoryCitConversionStore {
    async fn create(&self, input: &CreateCitConversion) -> RepoResult<CitConversion> {
        self.table
            .insert(|id, now| CitConversion {
                id,
                conversion_id: input.conversion_id.clone(),
                request_id: input.request_id,
                client_id: input.client_id.clone(),
                status: input.status.clone(),
                conversion_date: input.conversion_date.clone(),
                processed_by: input.processed_by.clone(),
                conversion_result: input.conversion_result.clone(),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<CitConversion>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_conversion_id(
        &self,
        conversion_id: &str,
    ) -> RepoResult<Option<CitConversion>> {
        Ok(self.table.find(|r| r.conversion_id == conversion_id).await)
    }

    async fn find_by_request_id(&self, request_id: i64) -> RepoResult<Option<CitConversion>> {
        Ok(self.table.find(|r| r.request_id == request_id).await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<CitConversion>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateCitConversion,
    ) -> RepoResult<Option<CitConversion>> {
        self.table
            .update(id, |r| {
                set(&mut r.client_id, &input.client_id);
                set(&mut r.status, &input.status);
                set(&mut r.conversion_date, &input.conversion_date);
                set(&mut r.processed_by, &input.processed_by);
                set(&mut r.conversion_result, &input.conversion_result);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

// ---------------------------------------------------------------------------
// SingPass
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemorySingPassAuthStore {
    table: Arc<MemoryTable<SingPassAuthRecord>>,
}

impl MemorySingPassAuthStore {
    pub fn new(table: Arc<MemoryTable<SingPassAuthRecord>>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl SingPassAuthStore for MemorySingPassAuthStore {
    async fn create(&self, input: &CreateSingPassAuthRecord) -> RepoResult<SingPassAuthRecord> {
        self.table
            .insert(|id, now| SingPassAuthRecord {
                id,
                auth_url: input.auth_url.clone(),
                state: input.state.clone(),
                scope: input.scope.clone(),
                callback_url: input.callback_url.clone(),
                client_id: input.client_id.clone(),
                status: or_default(&input.status, iras_core::oauth::SINGPASS_STATUS_PENDING),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<SingPassAuthRecord>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_state(&self, state: &str) -> RepoResult<Option<SingPassAuthRecord>> {
        Ok(self.table.find(|r| r.state == state).await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<SingPassAuthRecord>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateSingPassAuthRecord,
    ) -> RepoResult<Option<SingPassAuthRecord>> {
        self.table
            .update(id, |r| {
                set(&mut r.auth_url, &input.auth_url);
                set(&mut r.scope, &input.scope);
                set(&mut r.callback_url, &input.callback_url);
                set(&mut r.client_id, &input.client_id);
                set(&mut r.status, &input.status);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

/// Shares the auth-record table with [`MemorySingPassAuthStore`] so that
/// [`SingPassTokenStore::issue`] can complete the authorisation.
#[derive(Default)]
pub struct MemorySingPassTokenStore {
    table: MemoryTable<SingPassTokenRecord>,
    auths: Arc<MemoryTable<SingPassAuthRecord>>,
}

impl MemorySingPassTokenStore {
    pub fn new(auths: Arc<MemoryTable<SingPassAuthRecord>>) -> Self {
        Self {
            table: MemoryTable::default(),
            auths,
        }
    }
}

#[async_trait]
impl SingPassTokenStore for MemorySingPassTokenStore {
    async fn create(&self, input: &CreateSingPassTokenRecord) -> RepoResult<SingPassTokenRecord> {
        self.table
            .insert(|id, now| SingPassTokenRecord {
                id,
                code: input.code.clone(),
                state: input.state.clone(),
                access_token: input.access_token.clone(),
                token_type: or_default(&input.token_type, iras_core::oauth::SINGPASS_TOKEN_TYPE),
                expires_in: if input.expires_in == 0 {
                    iras_core::oauth::SINGPASS_TOKEN_EXPIRES_IN
                } else {
                    input.expires_in
                },
                refresh_token: input.refresh_token.clone(),
                scope: input.scope.clone(),
                callback_url: input.callback_url.clone(),
                client_id: input.client_id.clone(),
                status: or_default(&input.status, iras_core::oauth::SINGPASS_TOKEN_STATUS_ACTIVE),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn issue(
        &self,
        auth_id: DbId,
        input: &CreateSingPassTokenRecord,
    ) -> RepoResult<SingPassTokenRecord> {
        let missing = || RepoError::Database(sqlx::Error::RowNotFound);
        if self.auths.find_by_id(auth_id).await.is_none() {
            return Err(missing());
        }

        let token = self.create(input).await?;
        let completed = self
            .auths
            .update(auth_id, |r| {
                r.status = iras_core::oauth::SINGPASS_STATUS_COMPLETED.to_string();
            })
            .await;
        match completed {
            Ok(Some(_)) => Ok(token),
            Ok(None) => {
                self.table.discard(token.id).await;
                Err(missing())
            }
            Err(err) => {
                self.table.discard(token.id).await;
                Err(err)
            }
        }
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<SingPassTokenRecord>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_state(&self, state: &str) -> RepoResult<Option<SingPassTokenRecord>> {
        Ok(self.table.find_newest(|r| r.state == state).await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<SingPassTokenRecord>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(
        &self,
        id: DbId,
        input: &UpdateSingPassTokenRecord,
    ) -> RepoResult<Option<SingPassTokenRecord>> {
        self.table
            .update(id, |r| {
                set(&mut r.token_type, &input.token_type);
                set(&mut r.expires_in, &input.expires_in);
                set(&mut r.refresh_token, &input.refresh_token);
                set(&mut r.scope, &input.scope);
                set(&mut r.callback_url, &input.callback_url);
                set(&mut r.client_id, &input.client_id);
                set(&mut r.status, &input.status);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryUserStore {
    table: MemoryTable<User>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, input: &CreateUser) -> RepoResult<User> {
        self.table
            .insert(|id, now| User {
                id,
                name: input.name.clone(),
                username: input.username.clone(),
                email: input.email.clone(),
                password_hash: input.password_hash.clone(),
                role: input.role.clone(),
                is_active: true,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<User>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self.table.find(|r| r.username == username).await)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.table.find(|r| r.email == email).await)
    }

    async fn find_by_login(&self, identifier: &str) -> RepoResult<Option<User>> {
        Ok(self
            .table
            .find(|r| r.username == identifier || r.email == identifier)
            .await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<User>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(&self, id: DbId, input: &UpdateUser) -> RepoResult<Option<User>> {
        self.table
            .update(id, |r| {
                set(&mut r.name, &input.name);
                set(&mut r.email, &input.email);
                set(&mut r.password_hash, &input.password_hash);
                set(&mut r.role, &input.role);
                set(&mut r.is_active, &input.is_active);
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

// ---------------------------------------------------------------------------
// Categories and products
// ---------------------------------------------------------------------------

/// Shares its table with [`MemoryProductStore`] for the category join.
pub struct MemoryCategoryStore {
    table: Arc<MemoryTable<Category>>,
}

impl MemoryCategoryStore {
    pub fn new(table: Arc<MemoryTable<Category>>) -> Self {
        Self { table }
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn create(&self, input: &CreateCategory) -> RepoResult<Category> {
        self.table
            .insert(|id, now| Category {
                id,
                name: input.name.clone(),
                description: input.description.clone(),
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Category>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<Category>, i64)> {
        Ok(self.table.list(page).await)
    }

    async fn update(&self, id: DbId, input: &UpdateCategory) -> RepoResult<Option<Category>> {
        self.table
            .update(id, |r| {
                set(&mut r.name, &input.name);
                if input.description.is_some() {
                    r.description = input.description.clone();
                }
            })
            .await
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}

pub struct MemoryProductStore {
    table: MemoryTable<Product>,
    categories: Arc<MemoryTable<Category>>,
}

impl MemoryProductStore {
    pub fn new(categories: Arc<MemoryTable<Category>>) -> Self {
        Self {
            table: MemoryTable::default(),
            categories,
        }
    }

    /// Fill `category_name` from the live category, as the SQL join does.
    async fn join(&self, mut product: Product) -> Product {
        product.category_name = self
            .categories
            .find_by_id(product.category_id)
            .await
            .map(|c| c.name);
        product
    }

    async fn check_category(&self, category_id: DbId) -> RepoResult<()> {
        if self.categories.exists(category_id).await {
            Ok(())
        } else {
            Err(RepoError::ForeignKeyViolation(
                "fk_products_category_id".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn create(&self, input: &CreateProduct) -> RepoResult<Product> {
        self.check_category(input.category_id).await?;
        let row = self
            .table
            .insert(|id, now| Product {
                id,
                name: input.name.clone(),
                description: input.description.clone(),
                price: input.price,
                stock: input.stock,
                category_id: input.category_id,
                user_id: input.user_id,
                category_name: None,
                deleted_at: None,
                created_at: now,
                updated_at: now,
            })
            .await?;
        Ok(self.join(row).await)
    }

    async fn find_by_id(&self, id: DbId) -> RepoResult<Option<Product>> {
        match self.table.find_by_id(id).await {
            Some(row) => Ok(Some(self.join(row).await)),
            None => Ok(None),
        }
    }

    async fn list(&self, page: &Page) -> RepoResult<(Vec<Product>, i64)> {
        let (rows, total) = self.table.list(page).await;
        let mut joined = Vec::with_capacity(rows.len());
        for row in rows {
            joined.push(self.join(row).await);
        }
        Ok((joined, total))
    }

    async fn count_by_category(&self, category_id: DbId) -> RepoResult<i64> {
        Ok(self.table.count(|p| p.category_id == category_id).await)
    }

    async fn update(&self, id: DbId, input: &UpdateProduct) -> RepoResult<Option<Product>> {
        if let Some(category_id) = input.category_id {
            self.check_category(category_id).await?;
        }
        let row = self
            .table
            .update(id, |r| {
                set(&mut r.name, &input.name);
                if input.description.is_some() {
                    r.description = input.description.clone();
                }
                set(&mut r.price, &input.price);
                set(&mut r.stock, &input.stock);
                set(&mut r.category_id, &input.category_id);
            })
            .await?;
        match row {
            Some(row) => Ok(Some(self.join(row).await)),
            None => Ok(None),
        }
    }

    async fn soft_delete(&self, id: DbId) -> RepoResult<bool> {
        Ok(self.table.soft_delete(id).await)
    }
}
