// @generated by phasegen from schema canvas 1.0. Do not edit.
//! Table bindings for phase2

pub mod tables;
pub mod persons;
pub mod users;
pub mod users_extra;

pub use tables::{PhaseTable, IDENTITY_TABLES};
pub use persons::Persons;
pub use users::Users;
pub use users_extra::UsersExtra;
