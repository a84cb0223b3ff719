pub mod appointments;
pub mod treated_patients;
