/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - repository                                           |
/// |   - mysql_repository                                     |
/// |   - memory_repository                                    |
/// +----------------------------------------------------------+

/// Repository abstraction over the persisted Order entity.
pub mod repository;

/// Production implementation backed by MySQL through sqlx.
pub mod mysql_repository;

/// In-memory double used by tests and local runs.
pub mod memory_repository;

pub use memory_repository::InMemoryOrderRepository;
pub use mysql_repository::MySqlOrderRepository;
pub use repository::{OrderRepository, RepositoryError};
