// libs/scheduling-cell/src/services/lifecycle.rs
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::models::{AppointmentRecord, AppointmentStatus, SchedulingError, StatusCounts};

#[derive(Debug, Clone, Copy, Default)]
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !current_status.can_transition_to(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(SchedulingError::InvalidTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    /// Apply a staff action, returning the new status.
    pub fn transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<AppointmentStatus, SchedulingError> {
        self.validate_status_transition(current_status, new_status)?;
        info!("Status transition accepted: {} -> {}", current_status, new_status);
        Ok(new_status)
    }

    pub fn get_valid_transitions(&self, current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        current_status.valid_transitions().to_vec()
    }

    /// Whether an appointment on `appointment_day` with this status keeps its
    /// interval off-limits for new reservations.
    ///
    /// Completed visits only block while their day has not passed yet.
    pub fn blocks_calendar(
        &self,
        status: AppointmentStatus,
        appointment_day: NaiveDate,
        today: NaiveDate,
    ) -> bool {
        match status {
            AppointmentStatus::Pending | AppointmentStatus::Confirmed => true,
            AppointmentStatus::Completed => appointment_day >= today,
            AppointmentStatus::Cancelled | AppointmentStatus::Missed => false,
        }
    }
}

/// Tally appointments per status for dashboard widgets.
pub fn count_by_status<'a, I>(appointments: I) -> StatusCounts
where
    I: IntoIterator<Item = &'a AppointmentRecord>,
{
    let mut counts: StatusCounts = AppointmentStatus::ALL
        .iter()
        .map(|status| (*status, 0))
        .collect();

    for appointment in appointments {
        *counts.entry(appointment.status).or_insert(0) += 1;
    }

    counts
}
