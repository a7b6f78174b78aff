//! Types used throughout the banking system.

/// Money type, representing an exact decimal monetary value.
///
/// Backed by `rust_decimal::Decimal`: sums never accumulate binary
/// floating-point rounding error, and values render in their canonical
/// minimal form ("2000", never "2000.00").
pub type Money = rust_decimal::Decimal;

/// Account ID type, a process-unique identifier assigned at construction.
/// Serves only as the stable lock-ordering key for transfers; it takes no
/// part in account equality.
pub type AccountId = u64;
