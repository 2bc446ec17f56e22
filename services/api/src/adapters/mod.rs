pub mod db;
pub mod memory;

pub use db::PgPageArchive;
pub use memory::InMemorySessionStore;
