pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::{PgPostStore, PgUserStore};
pub use store::{PostStore, UserStore};
