use crate::schema::treated_patients;
use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = treated_patients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
pub struct TreatedPatient {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub treated_at: NaiveDateTime,
}

/// `treated_at` is stamped by the server, never taken from the request.
#[derive(Debug, Insertable)]
#[diesel(table_name = treated_patients)]
pub struct NewTreatedPatient {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub treated_at: NaiveDateTime,
}
