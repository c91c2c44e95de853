use rusqlite::Row;
use sea_query::{Expr, Iden, Order, Query, SqliteQueryBuilder};
use sea_query_rusqlite::RusqliteBinder;

use crate::{ctx::BaseParams, db, Error, Result};

use super::{Folder, FolderId};

pub const NOT_FOUND: &str = "Folder does not exist";

#[derive(Iden, Clone, Copy)]
pub enum Folders {
    Table,
    Id,
    FolderName,
}

impl<'a> TryFrom<&Row<'a>> for Folder {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            folder_name: row.get(1)?,
        })
    }
}

pub async fn find_folders(BaseParams { db, ctx }: BaseParams) -> Result<Vec<Folder>> {
    tracing::debug!(request_id = ?ctx.request_id, "find folders");

    let (sql, values) = Query::select()
        .columns([Folders::Id, Folders::FolderName])
        .from(Folders::Table)
        .order_by(Folders::Id, Order::Asc)
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        let folders = conn
            .prepare(&sql)?
            .query_map(&*values.as_params(), |row| Folder::try_from(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(folders)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn get_folder(folder_id: FolderId, BaseParams { db, ctx }: BaseParams) -> Result<Folder> {
    tracing::debug!(request_id = ?ctx.request_id, folder_id, "get folder");

    let (sql, values) = Query::select()
        .columns([Folders::Id, Folders::FolderName])
        .from(Folders::Table)
        .and_where(Expr::col(Folders::Id).eq(folder_id))
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        let folder = conn.query_row(&sql, &*values.as_params(), |row| Folder::try_from(row))?;
        Ok(folder)
    })
    .await
    .map_err(db::Error::from)
    .map_err(|e| db::Error::not_found_message(e, NOT_FOUND))
    .map_err(Error::from)
}

pub async fn insert_folder(folder_name: String, BaseParams { db, ctx }: BaseParams) -> Result<Folder> {
    tracing::debug!(request_id = ?ctx.request_id, "insert folder");

    let (sql, values) = Query::insert()
        .into_table(Folders::Table)
        .columns([Folders::FolderName])
        .values([folder_name.into()])
        .map_err(db::Error::from)?
        .returning(Query::returning().columns([Folders::Id, Folders::FolderName]))
        .build_rusqlite(SqliteQueryBuilder);

    db.call(move |conn| {
        let folder = conn.query_row(&sql, &*values.as_params(), |row| Folder::try_from(row))?;
        Ok(folder)
    })
    .await
    .map_err(db::Error::from)
    .map_err(Error::from)
}

pub async fn update_folder(folder_id: FolderId, folder_name: String, BaseParams { db, ctx }: BaseParams) -> Result<()> {
    tracing::debug!(request_id = ?ctx.request_id, folder_id, "update folder");

    let (sql, values) = Query::update()
        .table(Folders::Table)
        .value(Folders::FolderName, folder_name)
        .and_where(Expr::col(Folders::Id).eq(folder_id))
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

/// Notes in the folder go with it.
pub async fn delete_folder(folder_id: FolderId, BaseParams { db, ctx }: BaseParams) -> Result<()> {
    tracing::debug!(request_id = ?ctx.request_id, folder_id, "delete folder");

    let (sql, values) = Query::delete()
        .from_table(Folders::Table)
        .and_where(Expr::col(Folders::Id).eq(folder_id))
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
