pub mod apify;
#[cfg(test)]
pub mod fake;
pub mod traits;
pub mod types;

pub use apify::ApifyClient;
pub use traits::ActorPlatform;
