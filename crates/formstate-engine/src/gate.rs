//! # Update Gate
//!
//! Decides whether a recomputed [`FormState`] must be handed to the
//! rendering layer. Two states that agree on the resolved schema, the
//! rendering hints, the form data and the error tree render identically,
//! so the second one is dropped. This is what breaks the loop of a
//! listener that feeds every notification straight back into the engine.

use tracing::debug;

use crate::state::FormState;

/// Whether `next` differs observably from `prev`.
pub fn should_notify(prev: Option<&FormState>, next: &FormState) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    let changed = prev.resolved != next.resolved
        || prev.ui != next.ui
        || prev.form_data != next.form_data
        || prev.error_schema != next.error_schema;
    debug!(changed, "update gate");
    changed
}
