pub mod calendar;
pub mod lifecycle;
pub mod slots;

pub use calendar::{range_for_view, resolve_date_range};
pub use lifecycle::{count_by_status, AppointmentLifecycleService};
pub use slots::{available_slots_for_day, generate_slots, is_slot_available, SlotGenerator, Slots};
