// @generated by phasegen from schema canvas 1.0. Do not edit.
//! Generated table bindings, one module per phase

pub mod phase0;
pub mod phase1;
pub mod phase2;
