pub mod sources;
pub mod summary;
pub mod timeline;
