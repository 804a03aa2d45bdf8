pub mod dir_store;

pub use dir_store::DirStore;
