//! Presentation seam.
//!
//! The session drives whatever UI hosts it through this trait; the core
//! never renders anything itself.

use quoteoff_types::Quote;

/// Display surface for a voting session.
pub trait Presenter: Send {
    /// A fresh pair is ready for display.
    fn render_pair(&mut self, left: &Quote, right: &Quote);

    /// A leaderboard snapshot is ready for display.
    fn render_leaderboard(&mut self, entries: &[Quote]);

    /// Work is in flight and nothing is displayable yet.
    fn show_loading(&mut self);

    /// An operation failed in a way the user must see.
    fn show_error(&mut self, message: &str);
}
