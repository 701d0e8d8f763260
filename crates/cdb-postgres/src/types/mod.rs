//! Pagination, sorting, filtering and constraint types.

mod constraints;
mod filtering;
mod pagination;
mod sorting;

pub use constraints::{
    CompanyConstraints, ComputerConstraints, ConstraintCategory, ConstraintViolation,
};
pub use filtering::ComputerFilter;
pub use pagination::{OffsetPagination, Page, PageRequest, count_pages, offset};
pub use sorting::{ComputerSortBy, ComputerSortField, SortBy, SortOrder};
