//! Wire and domain types shared between the review analyzer backend contract and its clients.

pub mod domain;
pub mod error;
pub mod protocol;
