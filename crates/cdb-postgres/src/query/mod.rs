//! Database query repositories for the catalog tables.
//!
//! Repository traits are implemented on [`PgConnection`] so any pooled
//! connection can run them.
//!
//! [`PgConnection`]: crate::PgConnection

pub mod company;
pub mod computer;

pub use company::CompanyRepository;
pub use computer::{ComputerListing, ComputerRepository};
