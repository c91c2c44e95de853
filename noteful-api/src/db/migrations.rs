use lazy_static::lazy_static;
use rusqlite_migration::{Migrations, M};

lazy_static! {
    pub static ref MIGRATIONS: Migrations<'static> = Migrations::new(vec![
        M::up(
            r#"
            CREATE TABLE folders (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                folder_name TEXT NOT NULL CHECK(length(folder_name) > 0)
            );
        "#
        ),
        M::up(
            r#"
            CREATE TABLE notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,

                note_name TEXT NOT NULL CHECK(length(note_name) > 0),
                content TEXT NOT NULL,
                date_modified DATETIME NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),

                folder_id INTEGER NOT NULL,

                FOREIGN KEY (folder_id) REFERENCES folders (id) ON DELETE CASCADE
            );
        "#
        ),
        M::up("CREATE INDEX notes_folder_id ON notes (folder_id);"),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_valid() {
        assert!(MIGRATIONS.validate().is_ok());
    }
}
