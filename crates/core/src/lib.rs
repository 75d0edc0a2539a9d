//! Domain logic for the IRAS gateway.
//!
//! Everything here is pure: validation rules, stamp-duty formulas,
//! reference generators and the static lookup tables the handlers consult.
//! No module in this crate performs I/O.

pub mod ais;
pub mod error;
pub mod oauth;
pub mod pagination;
pub mod property;
pub mod reference;
pub mod rental;
pub mod roles;
pub mod stamp_duty;
pub mod types;
pub mod validation;
