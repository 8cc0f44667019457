use uuid::Uuid;

// Envelopes shared by every endpoint
pub mod api;

// Resources
pub mod catalogs;
pub mod link_analysis;
pub mod products;
pub mod reports;
pub mod subscriptions;
pub mod users;

/// A type alias that represents any resource's id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
