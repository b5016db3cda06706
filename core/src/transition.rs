//! The state transition resolver: deciding the next fact for a scan.
//!
//! A scan either carries an explicit action (which must parse to one of the
//! five fact kinds) or no action, in which case the next kind is resolved by
//! a deterministic toggle against the last recorded fact. The toggle has no
//! terminal state: a checkout is always re-enterable.

use crate::fact::{FactKind, ParseFactKindError};

/// Resolve the kind of the next fact for a scan.
///
/// With an explicit `action`, the action string is parsed as a wire-form
/// [`FactKind`] and used verbatim; an unparseable action fails with
/// [`ParseFactKindError`] (the `InvalidAction` client error). Without one,
/// the toggle rule applies:
///
/// - no prior fact → `CheckIn`
/// - last is `CheckIn` or `Resume` → `Pause`
/// - last is `Pause` → `Resume`
/// - last is `CheckOut` → `CheckIn` (re-entry after checkout is permitted)
/// - last is `Manual` → `CheckIn`
///
/// # Examples
///
/// ```
/// use attendance_core::fact::FactKind;
/// use attendance_core::transition::resolve_next_kind;
///
/// assert_eq!(resolve_next_kind(None, None), Ok(FactKind::CheckIn));
/// assert_eq!(
///     resolve_next_kind(Some(FactKind::CheckIn), None),
///     Ok(FactKind::Pause),
/// );
/// assert_eq!(
///     resolve_next_kind(Some(FactKind::Pause), Some("CHECKOUT")),
///     Ok(FactKind::CheckOut),
/// );
/// assert!(resolve_next_kind(None, Some("bogus")).is_err());
/// ```
pub fn resolve_next_kind(
    last: Option<FactKind>,
    action: Option<&str>,
) -> Result<FactKind, ParseFactKindError> {
    if let Some(action) = action {
        return action.parse();
    }

    Ok(match last {
        None => FactKind::CheckIn,
        Some(FactKind::CheckIn | FactKind::Resume) => FactKind::Pause,
        Some(FactKind::Pause) => FactKind::Resume,
        Some(FactKind::CheckOut | FactKind::Manual) => FactKind::CheckIn,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_scan_checks_in() {
        assert_eq!(resolve_next_kind(None, None), Ok(FactKind::CheckIn));
    }

    #[test]
    fn toggle_alternates_pause_resume() {
        // CHECKIN → PAUSE → RESUME → PAUSE → ...
        let mut last = resolve_next_kind(None, None).ok();
        assert_eq!(last, Some(FactKind::CheckIn));

        let expected = [
            FactKind::Pause,
            FactKind::Resume,
            FactKind::Pause,
            FactKind::Resume,
        ];
        for kind in expected {
            last = resolve_next_kind(last, None).ok();
            assert_eq!(last, Some(kind));
        }
    }

    #[test]
    fn checkout_is_re_enterable() {
        assert_eq!(
            resolve_next_kind(Some(FactKind::CheckOut), None),
            Ok(FactKind::CheckIn)
        );
    }

    #[test]
    fn manual_toggles_back_to_checkin() {
        assert_eq!(
            resolve_next_kind(Some(FactKind::Manual), None),
            Ok(FactKind::CheckIn)
        );
    }

    #[test]
    fn explicit_action_overrides_toggle() {
        assert_eq!(
            resolve_next_kind(Some(FactKind::CheckIn), Some("CHECKOUT")),
            Ok(FactKind::CheckOut)
        );
        assert_eq!(
            resolve_next_kind(None, Some("MANUAL")),
            Ok(FactKind::Manual)
        );
    }

    #[test]
    fn unparseable_action_is_rejected() {
        let result = resolve_next_kind(Some(FactKind::CheckIn), Some("LUNCH"));
        assert_eq!(result, Err(ParseFactKindError("LUNCH".to_string())));
    }
}
