//! Repository layer.
//!
//! Each entity family has an object-safe store trait and a PostgreSQL
//! implementation holding a cloned pool. [`Repositories`] bundles one
//! trait object per family so handlers never name a concrete backend.

use std::sync::Arc;

use sqlx::PgPool;

pub mod category_repo;
pub mod cit_conversion_repo;
pub mod gst_registration_repo;
pub mod product_repo;
pub mod property_statement_repo;
pub mod property_tax_balance_repo;
pub mod rental_submission_repo;
pub mod singpass_auth_repo;
pub mod singpass_token_repo;
pub mod user_repo;

pub use category_repo::{CategoryRepo, CategoryStore};
pub use cit_conversion_repo::{CitConversionRepo, CitConversionStore};
pub use gst_registration_repo::{GstRegistrationRepo, GstRegistrationStore};
pub use product_repo::{ProductRepo, ProductStore};
pub use property_statement_repo::{PropertyStatementRepo, PropertyStatementStore};
pub use property_tax_balance_repo::{PropertyTaxBalanceRepo, PropertyTaxBalanceStore};
pub use rental_submission_repo::{RentalSubmissionRepo, RentalSubmissionStore};
pub use singpass_auth_repo::{SingPassAuthRepo, SingPassAuthStore};
pub use singpass_token_repo::{SingPassTokenRepo, SingPassTokenStore};
pub use user_repo::{UserRepo, UserStore};

use crate::memory;

/// One store per entity family. Cheap to clone.
#[derive(Clone)]
pub struct Repositories {
    pub gst_registrations: Arc<dyn GstRegistrationStore>,
    pub property_statements: Arc<dyn PropertyStatementStore>,
    pub property_tax_balances: Arc<dyn PropertyTaxBalanceStore>,
    pub rental_submissions: Arc<dyn RentalSubmissionStore>,
    pub cit_conversions: Arc<dyn CitConversionStore>,
    pub singpass_auth: Arc<dyn SingPassAuthStore>,
    pub singpass_tokens: Arc<dyn SingPassTokenStore>,
    pub users: Arc<dyn UserStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub products: Arc<dyn ProductStore>,
}

impl Repositories {
    /// Stores backed by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            gst_registrations: Arc::new(GstRegistrationRepo::new(pool.clone())),
            property_statements: Arc::new(PropertyStatementRepo::new(pool.clone())),
            property_tax_balances: Arc::new(PropertyTaxBalanceRepo::new(pool.clone())),
            rental_submissions: Arc::new(RentalSubmissionRepo::new(pool.clone())),
            cit_conversions: Arc::new(CitConversionRepo::new(pool.clone())),
            singpass_auth: Arc::new(SingPassAuthRepo::new(pool.clone())),
            singpass_tokens: Arc::new(SingPassTokenRepo::new(pool.clone())),
            users: Arc::new(UserRepo::new(pool.clone())),
            categories: Arc::new(CategoryRepo::new(pool.clone())),
            products: Arc::new(ProductRepo::new(pool)),
        }
    }

    /// Process-local stores with the same semantics, for tests and demos.
    pub fn in_memory() -> Self {
        let categories = Arc::new(memory::MemoryTable::default());
        let singpass_auths = Arc::new(memory::MemoryTable::default());
        Self {
            gst_registrations: Arc::new(memory::MemoryGstRegistrationStore::default()),
            property_statements: Arc::new(memory::MemoryPropertyStatementStore::default()),
            property_tax_balances: Arc::new(memory::MemoryPropertyTaxBalanceStore::default()),
            rental_submissions: Arc::new(memory::MemoryRentalSubmissionStore::default()),
            cit_conversions: Arc::new(memory::MemoryCitConversionStore::default()),
            singpass_auth: Arc::new(memory::MemorySingPassAuthStore::new(Arc::clone(
                &singpass_auths,
            ))),
            singpass_tokens: Arc::new(memory::MemorySingPassTokenStore::new(singpass_auths)),
            users: Arc::new(memory::MemoryUserStore::default()),
            categories: Arc::new(memory::MemoryCategoryStore::new(Arc::clone(&categories))),
            products: Arc::new(memory::MemoryProductStore::new(categories)),
        }
    }
}
