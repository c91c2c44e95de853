use rusqlite::Row;
use sea_query::{Expr, Iden, Order, Query, SimpleExpr, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use crate::{ctx::BaseParams, db, Error, Result};

use super::{NewNote, Note, NoteChanges, NoteId};

pub const NOT_FOUND: &str = "Note does not exist";

#[derive(Iden, Clone, Copy)]
pub enum Notes {
    Table,
    Id,
    NoteName,
    Content,
    DateModified,
    FolderId,
}

fn note_columns() -> [Notes; 5] {
    use Notes::*;
    [Id, NoteName, Content, DateModified, FolderId]
}

impl<'a> TryFrom<&Row<'a>> for Note {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            note_name: row.get(1)?,
            content: row.get(2)?,
            date_modified: row.get(3)?,
            folder_id: row.get(4)?,
        })
    }
}

pub async fn find_notes(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Note>> {
    tracing::debug!(request_id = ?ctx.request_id, "find notes");

    let (sql, values) = Query::select()
        .columns(note_columns())
        .from(Notes::Table)
        .order_by(Notes::Id, Order::Asc)
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        let notes = conn
            .prepare(&sql)?
            .query_map(&*values.as_params(), |row| Note::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notes)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn get_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<Note> {
    tracing::debug!(request_id = ?ctx.request_id, note_id, "get note");

    let (sql, values) = Query::select()
        .columns(note_columns())
        .from(Notes::Table)
        .and_where(Expr::col(Notes::Id).eq(note_id))
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        let note = conn.query_row(&sql, &*values.as_params(), |row| Note::try_from(row))?;
        Ok(note)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, NOT_FOUND))
    .map_err(Error::from)
}

pub async fn insert_note(
    NewNote {
        note_name,
        content,
        folder_id,
        date_modified,
    }: NewNote,
    BaseParams { db, ctx }: BaseParams,
) -> Result<Note> {
    tracing::debug!(request_id = ?ctx.request_id, folder_id, "insert note");

    let mut columns = vec![Notes::NoteName, Notes::Content, Notes::FolderId];
    let mut row: Vec<SimpleExpr> = vec![note_name.into(), content.into(), folder_id.into()];
    // date_modified falls back to the column default
    if let Some(date_modified) = date_modified {
        columns.push(Notes::DateModified);
        row.push(date_modified.into());
    }

    let (sql, values) = Query::insert()
        .into_table(Notes::Table)
        .columns(columns)
        .values(row)
        .map_err(db::Error::from)?
        .returning(Query::returning().columns(note_columns()))
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        let note = conn.query_row(&sql, &*values.as_params(), |row| Note::try_from(row))?;
        Ok(note)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn update_note(
    note_id: NoteId,
    NoteChanges {
        note_name,
        content,
        folder_id,
    }: NoteChanges,
    BaseParams { db, ctx }: BaseParams,
) -> Result<()> {
    tracing::debug!(request_id = ?ctx.request_id, note_id, "update note");

    let mut changes: Vec<(Notes, SimpleExpr)> = Vec::new();
    if let Some(note_name) = note_name {
        changes.push((Notes::NoteName, note_name.into()));
    }
    if let Some(content) = content {
        changes.push((Notes::Content, content.into()));
    }
    if let Some(folder_id) = folder_id {
        changes.push((Notes::FolderId, folder_id.into()));
    }

    let (sql, values) = Query::update()
        .table(Notes::Table)
        .values(changes)
        .and_where(Expr::col(Notes::Id).eq(note_id))
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        if conn.execute(&sql, &*values.as_params())? == 0 {
            return Err(rusqlite::Error::QueryReturnedNoRows.into());
        }
        Ok(())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, NOT_FOUND))
    .map_err(Error::from)
}

pub async fn delete_note(note_id: NoteId, BaseParams { db, ctx }: BaseParams) -> Result<()> {
    tracing::debug!(request_id = ?ctx.request_id, note_id, "delete note");

    let (sql, values) = Query::delete()
        .from_table(Notes::Table)
        .and_where(Expr::col(Notes::Id).eq(note_id))
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        if conn.execute(&sql, &*values.as_params())? == 0 {
            return Err(rusqlite::Error::QueryReturnedNoRows.into());
        }
        Ok(())
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, NOT_FOUND))
    .map_err(Error::from)
}
