pub fn is_foreign_key_violation_on_product(e: &sqlx::Error) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_foreign_key_violation() {
        return false;
    }

    matches!(db_err.constraint(), Some("reviews_product_id_fkey"))
}
