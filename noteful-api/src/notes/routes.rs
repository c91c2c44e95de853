use crate::{
    ctx::BaseParams,
    openapi::{
        aide::{
            axum::{routing::get_with, ApiRouter, IntoApiResponse},
            NoApi,
        },
        Created, DeferredJson, Json, NoContent, Path,
    },
    state::AppState,
    Result,
};

use schemars::JsonSchema;

use serde::Deserialize;

use super::{CreateNote, Note, NoteId, UpdateNote};

use super::handlers;

#[derive(Debug, Deserialize, JsonSchema)]
struct NoteIdPath {
    note_id: NoteId,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/notes",
            get_with(find_notes, |t| t.summary("List all notes")).post_with(create_note, |t| {
                t.summary("Create a note")
                    .description("Responds with the stored note and its location.")
            }),
        )
        .api_route(
            "/api/notes/:note_id",
            get_with(get_note, |t| t.summary("Get a note"))
                .patch_with(update_note, |t| {
                    t.summary("Update some fields of a note")
                        .description("Fields absent from the body keep their stored value.")
                })
                .delete_with(delete_note, |t| t.summary("Delete a note")),
        )
        .with_state(state)
}

pub fn location(note_id: NoteId) -> String {
    format!("/api/notes/{note_id}")
}

async fn find_notes(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::find_notes(base).await.map(Json)
}

async fn create_note(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateNote>) -> Result<Created<Note>> {
    let note = handlers::insert_note(args.into_new_note()?, base).await?;
    Ok(Created {
        location: location(note.id),
        body: note,
    })
}

async fn get_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_note(note_id, base).await.map(Json)
}

async fn update_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
    body: DeferredJson<UpdateNote>,
) -> Result<NoContent> {
    handlers::get_note(note_id, base.clone()).await?;
    let changes = body.parse()?.into_changes()?;
    handlers::update_note(note_id, changes, base).await?;
    Ok(NoContent)
}

async fn delete_note(
    Path(NoteIdPath { note_id }): Path<NoteIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> Result<NoContent> {
    handlers::delete_note(note_id, base).await?;
    Ok(NoContent)
}
