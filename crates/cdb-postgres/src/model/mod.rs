//! Database models for the catalog tables.
//!
//! Each table has a queryable model, an insertable model, and where rows can
//! change, a changeset model.

mod company;
mod computer;

pub use company::{Company, NewCompany};
pub use computer::{Computer, ComputerView, NewComputer, UpdateComputer};
