/// State management module
///
/// This module handles all catalog and browsing state:
/// - Shared data structures (data.rs)
/// - Database connection and queries (library.rs)
/// - Filter to SQL translation (query.rs)
/// - Result cache, paging and the browse session (session.rs)

pub mod data;
pub mod library;
pub mod query;
pub mod session;
