//! User interface components shared between pages.

pub mod actions;
pub mod alert;
