pub mod catalog;
pub mod entities;
pub mod error;
pub mod modifier_engine;
