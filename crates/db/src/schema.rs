use shelf_kernel::Migration;

/// Schema backing [`crate::PgCatalog`], in application order.
pub fn books_migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_create_books",
        up: r#"
            CREATE TABLE IF NOT EXISTS books (
                seq        BIGSERIAL NOT NULL UNIQUE,
                id         TEXT PRIMARY KEY,
                title      TEXT NOT NULL CHECK (title <> ''),
                price      DOUBLE PRECISION NOT NULL,
                genre      TEXT NOT NULL CHECK (genre <> ''),
                image_key  TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL,
                created_by TEXT NOT NULL,
                updated_by TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS books_created_at_idx ON books (created_at DESC, seq DESC);
            "#,
    }]
}
