pub mod appointment;
pub mod slots;

pub use appointment::Appointment;
pub use slots::DayType;
