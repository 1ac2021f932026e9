pub mod device;
pub mod documents;
pub mod keys;
pub mod store;
