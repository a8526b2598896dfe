#![allow(clippy::needless_return, clippy::too_many_arguments, clippy::collapsible_if,
         clippy::collapsible_else_if, clippy::manual_range_contains, clippy::single_match,
         clippy::comparison_chain, clippy::float_cmp, clippy::match_single_binding)]

// Input core: backend event translation, text and number entry, controller
// normalization and the blocking movie loop.

pub mod compat;
pub mod controls;
pub mod event;
pub mod event_queue;
pub mod input;
pub mod movie;
pub mod number_input;
pub mod platform;
pub mod scripted;
pub mod text_input;
