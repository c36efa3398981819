pub mod entities;
pub mod errors;
pub mod helpers;
pub mod operation_result;
pub mod settings;
pub mod stores;
