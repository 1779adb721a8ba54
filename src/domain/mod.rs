/// +----------------------------------------------------------+
/// | MODULES                                                  |
/// +----------+-------+-------+------------------------------+
/// | Exports:                                                 |
/// |   - models                                               |
/// |   - services                                             |
/// +----------------------------------------------------------+

/// Domain entities (Order and its status enumerations).
pub mod models;

/// Domain-facing service traits and implementations.
pub mod services;
