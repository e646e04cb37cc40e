//! # trestle-script
//!
//! Script template engine for the automation runtime. Turns structured
//! requests into executable program text: `{{identifier}}` placeholder
//! binding through a safe encoder, constant helper preludes with separate
//! size accounting, and the generated query/mutation script builders.
//!
//! Everything here is pure and stateless; execution belongs to
//! `trestle-engine`.

pub mod builder;
pub mod encode;
pub mod helpers;
pub mod template;

pub use encode::encode_value;
pub use helpers::{HelperBundle, Script};
pub use template::{
    declare_parameters, extract_placeholders, render, validate, Params, ValidationReport,
};
