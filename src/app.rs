//! Application module: the `App` model the terminal UI renders and the
//! event loop mutates.
//!
//! `App` owns the transport controller plus the view state around it
//! (selection, popups, import queue, column widths, status line).

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
