use diesel::prelude::*;

use crate::{
    database::{appointments, dispatch, DbConnection},
    models::treated_patients::{NewTreatedPatient, TreatedPatient},
    schema::treated_patients,
};

pub fn insert(conn: &mut DbConnection, data: &NewTreatedPatient) -> QueryResult<i32> {
    dispatch!(conn, c => diesel::insert_into(treated_patients::table)
        .values(data)
        .returning(treated_patients::id)
        .get_result(c))
}

/// Most recently treated first. Rows stamped within the same tick list the
/// later insert first.
pub fn list(conn: &mut DbConnection) -> QueryResult<Vec<TreatedPatient>> {
    dispatch!(conn, c => treated_patients::table
        .select(TreatedPatient::as_select())
        .order((treated_patients::treated_at.desc(), treated_patients::id.desc()))
        .load(c))
}

pub fn delete_all(conn: &mut DbConnection) -> QueryResult<usize> {
    dispatch!(conn, c => diesel::delete(treated_patients::table).execute(c))
}

/// Stores the treated patient and flags the originating appointment, if any.
///
/// There is no foreign key between the two tables: an `appointment_id` that
/// matches nothing still records the patient and leaves appointments alone.
pub fn record_treatment(
    conn: &mut DbConnection,
    appointment_id: Option<i32>,
    data: &NewTreatedPatient,
) -> QueryResult<i32> {
    conn.transaction(|conn| {
        let id = insert(conn, data)?;

        let appointment = match appointment_id {
            Some(appointment_id) => appointments::find(conn, appointment_id)?,
            None => None,
        };
        match appointment {
            Some(appointment) => {
                appointments::set_treated(conn, appointment.id)?;
            }
            None => tracing::debug!(?appointment_id, "no appointment to flag as treated"),
        }

        Ok(id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_db_conn, testing::*};
    use chrono::{Duration, Utc};

    #[test]
    fn list_is_most_recent_first() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();
        let now = Utc::now().naive_utc();

        insert(&mut conn, &new_treated_patient("old", now - Duration::hours(2))).unwrap();
        insert(&mut conn, &new_treated_patient("new", now)).unwrap();
        insert(&mut conn, &new_treated_patient("mid", now - Duration::hours(1))).unwrap();

        let names: Vec<_> = list(&mut conn)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["new", "mid", "old"]);
    }

    #[test]
    fn same_timestamp_keeps_insertion_order() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();
        let now = Utc::now().naive_utc();

        insert(&mut conn, &new_treated_patient("first", now)).unwrap();
        insert(&mut conn, &new_treated_patient("second", now)).unwrap();

        let names: Vec<_> = list(&mut conn)
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["second", "first"]);
    }

    #[test]
    fn record_treatment_flags_matching_appointment() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();
        let apt = appointments::insert(&mut conn, &new_appointment("a")).unwrap();
        let other = appointments::insert(&mut conn, &new_appointment("b")).unwrap();

        let now = Utc::now().naive_utc();
        record_treatment(&mut conn, Some(apt), &new_treated_patient("a", now)).unwrap();

        assert!(appointments::find(&mut conn, apt).unwrap().unwrap().treated);
        assert!(!appointments::find(&mut conn, other).unwrap().unwrap().treated);
        assert_eq!(list(&mut conn).unwrap().len(), 1);
    }

    #[test]
    fn record_treatment_without_appointment_still_inserts() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();
        let apt = appointments::insert(&mut conn, &new_appointment("a")).unwrap();

        let now = Utc::now().naive_utc();
        record_treatment(&mut conn, Some(apt + 100), &new_treated_patient("x", now)).unwrap();
        record_treatment(&mut conn, None, &new_treated_patient("y", now)).unwrap();

        assert_eq!(list(&mut conn).unwrap().len(), 2);
        assert!(!appointments::find(&mut conn, apt).unwrap().unwrap().treated);
    }
}
