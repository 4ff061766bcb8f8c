// @generated by phasegen from schema canvas 1.0. Do not edit.
//! Table bindings for phase0

pub mod tables;
pub mod people;
pub mod users;

pub use tables::{PhaseTable, IDENTITY_TABLES};
pub use people::People;
pub use users::Users;
