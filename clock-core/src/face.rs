//! Display collaborator trait

use crate::controller::View;

/// Something that can show the clock
///
/// Render failures are the implementor's business: the controller never
/// sees them, so callers log and move on.
pub trait ClockFace {
    type Error;

    /// Shows `view`. With `redraw` set the whole face is rewritten, otherwise
    /// only the parts that changed since the last call.
    fn render(&mut self, view: View, redraw: bool) -> Result<(), Self::Error>;
}
