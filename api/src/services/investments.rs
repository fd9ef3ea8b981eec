//! Administrator actions on a user's investment position.

use chrono::{DateTime, Utc};
use shared::entity::investments;
use shared::PlanStatus;

use crate::error::{AppError, AppResult};

/// Pauses or resumes an open position. Completion is reserved for the ROI job.
pub fn set_status(
    position: &mut investments::Model,
    status: PlanStatus,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if status == PlanStatus::Completed {
        return Err(AppError::validation("status must be active or paused"));
    }
    if !position.has_active_plan || position.plan_status() == Some(PlanStatus::Completed) {
        return Err(AppError::validation("Investment plan is not running"));
    }
    position.status = status.as_str().to_string();
    position.updated_at = Some(now);
    Ok(())
}

/// Starts the plan over from day zero. Balances and payout history are kept.
pub fn restart(position: &mut investments::Model, now: DateTime<Utc>) {
    position.days_completed = 0;
    position.is_active = true;
    position.has_active_plan = true;
    position.status = PlanStatus::Active.as_str().to_string();
    position.plan_started_at = Some(now);
    position.plan_completed_at = None;
    position.last_roi_paid_at = Some(now);
    position.updated_at = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::accrual::tests::position;
    use rust_decimal_macros::dec;

    #[test]
    fn test_pause_and_resume() {
        let mut p = position("u1", dec!(1000), dec!(0.04), 2, 7);
        set_status(&mut p, PlanStatus::Paused, Utc::now()).unwrap();
        assert_eq!(p.status, "paused");
        set_status(&mut p, PlanStatus::Active, Utc::now()).unwrap();
        assert_eq!(p.status, "active");
    }

    #[test]
    fn test_completed_positions_cannot_be_paused() {
        let mut p = position("u1", dec!(1000), dec!(0.04), 7, 7);
        p.status = "completed".to_string();
        p.has_active_plan = false;
        assert!(matches!(
            set_status(&mut p, PlanStatus::Paused, Utc::now()),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            set_status(&mut p, PlanStatus::Completed, Utc::now()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_restart_reopens_completed_position() {
        let mut p = position("u1", dec!(1000), dec!(0.04), 7, 7);
        p.is_active = false;
        p.has_active_plan = false;
        p.status = "completed".to_string();
        p.plan_completed_at = Some(Utc::now());
        p.total_earned = dec!(280);

        restart(&mut p, Utc::now());

        assert_eq!(p.days_completed, 0);
        assert!(p.is_active);
        assert!(p.has_active_plan);
        assert_eq!(p.status, "active");
        assert!(p.plan_completed_at.is_none());
        assert_eq!(p.total_earned, dec!(280));
    }
}
