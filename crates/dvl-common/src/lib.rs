#![allow(clippy::needless_return, clippy::too_many_arguments, clippy::collapsible_if,
         clippy::collapsible_else_if, clippy::manual_range_contains, clippy::single_match,
         clippy::comparison_chain, clippy::float_cmp, clippy::match_single_binding)]

// Shared vocabulary for the input core: key codes, modifiers, logging and cvars.

pub mod common;
pub mod cvar;
pub mod keys;
