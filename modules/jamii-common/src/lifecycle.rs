//! Status transition guard for the report lifecycle.
//!
//! One state machine, with targets tagged by the capability of the actor
//! applying the change. The observed flow is
//! `pending → assigned → in_progress → awaiting_verification → resolved`,
//! but transitions are validated against the target only: an admin triages
//! freely within the full whitelist, while a department may only advance
//! work it is doing. `resolved` is terminal in every observed flow;
//! re-opening is undefined and deliberately unsupported.

use crate::error::{JamiiError, Result};
use crate::types::ReportStatus;

/// Who is applying a status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    /// Broad triage: the admin dashboard.
    Admin,
    /// The municipal unit working the report. Narrower whitelist — it may
    /// advance work in progress but never jump to `resolved` or `assigned`.
    Department,
}

impl Actor {
    /// The statuses this actor is allowed to set.
    pub fn allowed_targets(self) -> &'static [ReportStatus] {
        match self {
            Actor::Admin => &[
                ReportStatus::Pending,
                ReportStatus::Assigned,
                ReportStatus::InProgress,
                ReportStatus::AwaitingVerification,
                ReportStatus::Resolved,
            ],
            Actor::Department => &[
                ReportStatus::InProgress,
                ReportStatus::AwaitingVerification,
            ],
        }
    }

    pub fn may_set(self, target: ReportStatus) -> bool {
        self.allowed_targets().contains(&target)
    }
}

/// Reject a target status outside the actor's whitelist. Never mutates
/// anything; callers apply the change only after this returns `Ok`.
pub fn authorize_transition(actor: Actor, target: ReportStatus) -> Result<()> {
    if actor.may_set(target) {
        Ok(())
    } else {
        Err(JamiiError::validation(format!(
            "status {target} is not allowed for this update"
        )))
    }
}

/// Parse a raw wire status and authorize it for the actor in one step.
/// Unknown values fail before any whitelist check.
pub fn parse_transition(actor: Actor, raw: &str) -> Result<ReportStatus> {
    let target = ReportStatus::parse(raw)
        .ok_or_else(|| JamiiError::validation(format!("unrecognized status: {raw}")))?;
    authorize_transition(actor, target)?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_may_set_every_lifecycle_status() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::Assigned,
            ReportStatus::InProgress,
            ReportStatus::AwaitingVerification,
            ReportStatus::Resolved,
        ] {
            assert!(Actor::Admin.may_set(status), "admin blocked from {status}");
        }
    }

    #[test]
    fn department_whitelist_is_narrower() {
        assert!(Actor::Department.may_set(ReportStatus::InProgress));
        assert!(Actor::Department.may_set(ReportStatus::AwaitingVerification));

        assert!(!Actor::Department.may_set(ReportStatus::Resolved));
        assert!(!Actor::Department.may_set(ReportStatus::Assigned));
        assert!(!Actor::Department.may_set(ReportStatus::Pending));
    }

    #[test]
    fn department_whitelist_is_subset_of_admin() {
        for status in Actor::Department.allowed_targets() {
            assert!(Actor::Admin.may_set(*status));
        }
    }

    #[test]
    fn parse_transition_rejects_unknown_status() {
        let err = parse_transition(Actor::Admin, "reopened").unwrap_err();
        assert!(matches!(err, JamiiError::Validation(m) if m.contains("unrecognized status")));
    }

    #[test]
    fn parse_transition_rejects_resolved_for_department() {
        // The same value succeeds for an admin.
        assert_eq!(
            parse_transition(Actor::Admin, "resolved").unwrap(),
            ReportStatus::Resolved
        );
        let err = parse_transition(Actor::Department, "resolved").unwrap_err();
        assert!(matches!(err, JamiiError::Validation(_)));
    }

    #[test]
    fn parse_transition_accepts_department_progress() {
        assert_eq!(
            parse_transition(Actor::Department, "in_progress").unwrap(),
            ReportStatus::InProgress
        );
        assert_eq!(
            parse_transition(Actor::Department, "awaiting_verification").unwrap(),
            ReportStatus::AwaitingVerification
        );
    }
}
