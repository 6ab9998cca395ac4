//! Two-tower CHIMPS (2TC) combos.
//!
//! Combos are maintained by an external scraper that dumps the community
//! spreadsheet into a JSON file. This module loads that file
//! ([`ComboLoader`]) and narrows it down to what a `2tc` query asks for
//! ([`filter_combos`]).

mod combo;
mod combo_loader;
mod filter;

pub use crate::combos::{
    combo::{Combo, ComboTower, Completion},
    combo_loader::ComboLoader,
    filter::{ComboQuery, filter_combos},
};
