pub mod backup_exchange;
pub mod core;
pub mod form;
pub mod students;
pub mod table;
