diesel::table! {
    appointments (id) {
        id -> Integer,
        name -> Text,
        phone -> Text,
        email -> Text,
        service -> Text,
        message -> Text,
        treated -> Bool,
    }
}

diesel::table! {
    treated_patients (id) {
        id -> Integer,
        name -> Text,
        phone -> Text,
        email -> Text,
        service -> Text,
        message -> Text,
        treated_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(appointments, treated_patients,);
