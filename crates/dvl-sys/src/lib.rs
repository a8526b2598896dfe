#![allow(clippy::needless_return, clippy::too_many_arguments, clippy::collapsible_if,
         clippy::collapsible_else_if, clippy::single_match, clippy::match_single_binding)]

// Platform layer: winit window and event pump, system clipboard.

pub mod in_win;
pub mod sys_win;
