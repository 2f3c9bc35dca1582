/// Receives state-flag changes from a `Game`.
///
/// Each method fires only when the value actually changes. All methods
/// default to no-ops.
pub trait GameListener {
    fn won_changed(&mut self, _won: bool) {}

    fn can_undo_changed(&mut self, _can_undo: bool) {}

    fn can_redo_changed(&mut self, _can_redo: bool) {}

    fn games_started_changed(&mut self, _games_started: u32) {}

    fn games_won_changed(&mut self, _games_won: u32) {}
}
