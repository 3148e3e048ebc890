//! HTTP handlers

pub mod form;
pub mod health;
pub mod model;
pub mod page;
pub mod predict;
