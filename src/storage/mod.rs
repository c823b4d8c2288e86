//! User profile persistence module.
//!
//! Stores all user profiles as a single JSON document that is read in
//! full at the start of handling an event and rewritten in full when
//! mutated.

mod profiles;

pub use profiles::{
    HistoryEntry, ProfileMap, QueryOutcome, StoreError, UserProfile, UserStore, ensure,
};
