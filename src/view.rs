//! Read-only projections of the exercise for each audience.
//!
//! Both views are built from the same state snapshot and catalog. The player
//! projection copies only public fields out of the scenario, so
//! facilitator-only text cannot reach it.

mod facilitator;
mod player;

pub use facilitator::FacilitatorView;
pub use player::PlayerView;
