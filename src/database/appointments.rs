use diesel::prelude::*;

use crate::{
    database::{dispatch, DbConnection},
    models::appointments::{Appointment, NewAppointment},
    schema::appointments,
};

pub fn insert(conn: &mut DbConnection, data: &NewAppointment) -> QueryResult<i32> {
    dispatch!(conn, c => diesel::insert_into(appointments::table)
        .values(data)
        .returning(appointments::id)
        .get_result(c))
}

/// Newest first.
pub fn list(conn: &mut DbConnection) -> QueryResult<Vec<Appointment>> {
    dispatch!(conn, c => appointments::table
        .select(Appointment::as_select())
        .order(appointments::id.desc())
        .load(c))
}

pub fn find(conn: &mut DbConnection, id: i32) -> QueryResult<Option<Appointment>> {
    dispatch!(conn, c => appointments::table
        .find(id)
        .select(Appointment::as_select())
        .first(c)
        .optional())
}

pub fn set_treated(conn: &mut DbConnection, id: i32) -> QueryResult<usize> {
    dispatch!(conn, c => diesel::update(appointments::table.find(id))
        .set(appointments::treated.eq(true))
        .execute(c))
}

pub fn delete_all(conn: &mut DbConnection) -> QueryResult<usize> {
    dispatch!(conn, c => diesel::delete(appointments::table).execute(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{get_db_conn, testing::*};

    #[test]
    fn ids_are_never_reused() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();

        let first = insert(&mut conn, &new_appointment("a")).unwrap();
        let second = insert(&mut conn, &new_appointment("b")).unwrap();
        assert!(second > first);

        delete_all(&mut conn).unwrap();
        let third = insert(&mut conn, &new_appointment("c")).unwrap();
        assert!(third > second);
    }

    #[test]
    fn list_is_newest_first() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();
        for name in ["a", "b", "c"] {
            insert(&mut conn, &new_appointment(name)).unwrap();
        }

        let names: Vec<_> = list(&mut conn)
            .unwrap()
            .into_iter()
            .map(|apt| apt.name)
            .collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn new_appointments_start_untreated() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();
        let id = insert(&mut conn, &new_appointment("a")).unwrap();

        let apt = find(&mut conn, id).unwrap().unwrap();
        assert!(!apt.treated);
        assert_eq!(apt.message, "");

        assert_eq!(set_treated(&mut conn, id).unwrap(), 1);
        assert!(find(&mut conn, id).unwrap().unwrap().treated);
    }

    #[test]
    fn find_missing_is_none() {
        let (pool, _dir) = temp_pool();
        let mut conn = get_db_conn(&pool).unwrap();
        assert!(find(&mut conn, 42).unwrap().is_none());
        assert_eq!(set_treated(&mut conn, 42).unwrap(), 0);
    }
}
