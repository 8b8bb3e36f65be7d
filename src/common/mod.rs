//! Common, shared types.

pub mod contact;
pub mod despawn;
pub mod layers;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
