pub mod error;
pub mod navigation;
pub mod session;
pub mod snapshot;
pub mod steps;
pub mod stores;
pub mod validation;
