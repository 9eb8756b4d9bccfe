//! Listing module: the upstream platform's item model and REST client
//!
//! The platform wraps every response in a nested envelope
//! (`{data: {children: [{kind, data}, ...]}}`); this module flattens those
//! envelopes into ordered sequences of typed [`ListingItem`]s and exposes
//! the listing operations over an authenticated session.

mod client;
mod item;

pub use client::{ListingClient, SortMode};
pub use item::{Channel, Comment, Kind, Listing, ListingItem, Post};
