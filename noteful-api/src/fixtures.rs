//! Deterministic sample data for tests.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::{
    db::{self, DB},
    folders::Folder,
    notes::Note,
    Error, Result,
};

pub const DATE_MODIFIED: &str = "2019-03-17T21:22:26.221Z";

fn date_modified() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(DATE_MODIFIED)
        .map(|date| date.with_timezone(&Utc))
        .unwrap()
}

pub fn make_folders_array() -> Vec<Folder> {
    ["Important", "Super", "Spangley"]
        .into_iter()
        .zip(1..)
        .map(|(folder_name, id)| Folder {
            id,
            folder_name: folder_name.into(),
        })
        .collect()
}

pub fn make_notes_array() -> Vec<Note> {
    [1, 3, 1, 2]
        .into_iter()
        .zip(1..)
        .map(|(folder_id, id)| Note {
            id,
            note_name: format!("Test Note {id}"),
            content: format!("This is a test for note {id}"),
            date_modified: date_modified(),
            folder_id,
        })
        .collect()
}

pub async fn seed_folders(db: &DB) -> Result<()> {
    let folders = make_folders_array();
    db.call(move |conn| {
        let mut stmt = conn.prepare("INSERT INTO folders (id, folder_name) VALUES (?, ?)")?;
        for folder in folders {
            stmt.execute(params![folder.id, folder.folder_name])?;
        }
        Ok(())
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn seed_notes(db: &DB) -> Result<()> {
    let notes = make_notes_array();
    db.call(move |conn| {
        let mut stmt = conn.prepare(
            "INSERT INTO notes (id, note_name, content, date_modified, folder_id) VALUES (?, ?, ?, ?, ?)",
        )?;
        for note in notes {
            stmt.execute(params![
                note.id,
                note.note_name,
                note.content,
                note.date_modified,
                note.folder_id
            ])?;
        }
        Ok(())
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

/// Folders first, notes reference them.
pub async fn seed(db: &DB) -> Result<()> {
    seed_folders(db).await?;
    seed_notes(db).await
}

pub async fn count_rows(db: &DB, table: &'static str) -> Result<u32> {
    db.call(move |conn| {
        conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |row| row.get(0))
            .map_err(|e| e.into())
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}
