/// Roster discovery module
///
/// This module handles:
/// - Building and reading the roster manifest (manifest.rs)
/// - Fetching listings and images from disk or HTTP (fetch.rs)
/// - Pulling image links out of directory listings (listing.rs)
/// - Resolving a roster name to its image paths (resolver.rs)

pub mod fetch;
pub mod listing;
pub mod manifest;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use fetch::{Fetch, FetchResponse, HttpFetch, LocalFetch, RosterSource};
pub use manifest::{RosterEntry, RosterManifest};
pub use resolver::{ResolvedRoster, RosterResolver};
