use crate::schema::appointments;
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
pub struct Appointment {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub treated: bool,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointment {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
}
