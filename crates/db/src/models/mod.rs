//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod category;
pub mod cit_conversion;
pub mod gst_registration;
pub mod product;
pub mod property_statement;
pub mod property_tax_balance;
pub mod rental_submission;
pub mod singpass;
pub mod user;
