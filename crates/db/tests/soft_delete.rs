//! Soft-delete behaviour of the PostgreSQL stores.
//!
//! - Soft-deleted rows are hidden from `find_by_id`, natural-key lookups and lists
//! - A second soft delete returns `false`
//! - Unique keys stay reserved by deleted rows

use iras_core::pagination::Page;
use iras_db::models::gst_registration::CreateGstRegistration;
use iras_db::models::rental_submission::CreateRentalSubmission;
use iras_db::repositories::{
    GstRegistrationRepo, GstRegistrationStore, RentalSubmissionRepo, RentalSubmissionStore,
};
use sqlx::PgPool;

fn new_registration(registration_id: &str) -> CreateGstRegistration {
    CreateGstRegistration {
        client_id: "C1".to_string(),
        registration_id: registration_id.to_string(),
        gst_registration_number: "M90312345A".to_string(),
        name: "Acme Pte Ltd".to_string(),
        registered_from: "2020-01-01".to_string(),
        registered_to: String::new(),
        status: "Registered".to_string(),
        remarks: String::new(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_hides_from_reads(pool: PgPool) {
    let repo = GstRegistrationRepo::new(pool);
    let row = repo.create(&new_registration("R1")).await.unwrap();

    assert!(repo.soft_delete(row.id).await.unwrap());

    assert!(repo.find_by_id(row.id).await.unwrap().is_none());
    assert!(repo
        .find_by_registration("R1", "C1")
        .await
        .unwrap()
        .is_none());
    let (rows, total) = repo.list(&Page::default()).await.unwrap();
    assert!(rows.is_empty());
    assert_eq!(total, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_second_soft_delete_returns_false(pool: PgPool) {
    let repo = GstRegistrationRepo::new(pool);
    let row = repo.create(&new_registration("R1")).await.unwrap();

    assert!(repo.soft_delete(row.id).await.unwrap());
    assert!(!repo.soft_delete(row.id).await.unwrap());
    assert!(!repo.soft_delete(row.id + 1000).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_ignores_deleted_rows(pool: PgPool) {
    let repo = RentalSubmissionRepo::new(pool);
    let row = repo
        .create(&CreateRentalSubmission {
            ref_no: "RNT20250101120000".to_string(),
            assmt_year: 2025,
            authorised_person_email: "owner@example.com".to_string(),
            authorised_person_name: "Owner".to_string(),
            development_name: "Marina".to_string(),
            submission_data: "[]".to_string(),
            total_properties: 0,
            status: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(row.status, "submitted");

    repo.soft_delete(row.id).await.unwrap();

    let patch = Default::default();
    assert!(repo.update(row.id, &patch).await.unwrap().is_none());
    assert!(repo
        .find_by_ref_no("RNT20250101120000")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_deleted_row_keeps_its_natural_key(pool: PgPool) {
    let repo = GstRegistrationRepo::new(pool);
    let row = repo.create(&new_registration("R1")).await.unwrap();
    repo.soft_delete(row.id).await.unwrap();

    let err = repo.create(&new_registration("R1")).await.unwrap_err();
    assert!(err.is_unique_violation_of("uq_gst_registrations_registration_id"));
}
