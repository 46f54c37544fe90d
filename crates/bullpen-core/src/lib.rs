// Shared infrastructure for the bullpen grader: configuration, storage record
// shapes, and the SQLite session store.

pub mod config;
pub mod db;
pub mod records;
