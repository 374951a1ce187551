pub mod pagination;
pub mod search_filter;
pub mod validation;
pub mod wizard;
