pub mod bids;
pub mod gigs;
pub mod notifications;
