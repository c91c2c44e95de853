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

use super::{handlers, CreateFolder, Folder, FolderId, UpdateFolder};

#[derive(Debug, Deserialize, JsonSchema)]
struct FolderIdPath {
    folder_id: FolderId,
}

pub fn router(state: AppState) -> ApiRouter {
    ApiRouter::new()
        .api_route(
            "/api/folders",
            get_with(find_folders, |t| t.summary("List all folders"))
                .post_with(create_folder, |t| t.summary("Create a folder")),
        )
        .api_route(
            "/api/folders/:folder_id",
            get_with(get_folder, |t| t.summary("Get a folder"))
                .patch_with(update_folder, |t| t.summary("Rename a folder"))
                .delete_with(delete_folder, |t| {
                    t.summary("Delete a folder").description("Deletes the notes in it as well.")
                }),
        )
        .with_state(state)
}

async fn find_folders(NoApi(base): NoApi<BaseParams>) -> impl IntoApiResponse {
    handlers::find_folders(base).await.map(Json)
}

async fn create_folder(NoApi(base): NoApi<BaseParams>, Json(args): Json<CreateFolder>) -> Result<Created<Folder>> {
    let folder = handlers::insert_folder(args.into_folder_name()?, base).await?;
    Ok(Created {
        location: format!("/api/folders/{}", folder.id),
        body: folder,
    })
}

async fn get_folder(
    Path(FolderIdPath { folder_id }): Path<FolderIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> impl IntoApiResponse {
    handlers::get_folder(folder_id, base).await.map(Json)
}

async fn update_folder(
    Path(FolderIdPath { folder_id }): Path<FolderIdPath>,
    NoApi(base): NoApi<BaseParams>,
    body: DeferredJson<UpdateFolder>,
) -> Result<NoContent> {
    handlers::get_folder(folder_id, base.clone()).await?;
    let folder_name = body.parse()?.into_folder_name()?;
    handlers::update_folder(folder_id, folder_name, base).await?;
    Ok(NoContent)
}

async fn delete_folder(
    Path(FolderIdPath { folder_id }): Path<FolderIdPath>,
    NoApi(base): NoApi<BaseParams>,
) -> Result<NoContent> {
    handlers::delete_folder(folder_id, base).await?;
    Ok(NoContent)
}

#[cfg(test)]
mod tests {
    use crate::{
        db::{init_test_db, DB},
        errors::Result,
        fixtures::{make_folders_array, seed, seed_folders},
        folders::Folder,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;

    #[tokio::test]
    async fn find_folders() -> Result<()> {
        let db = init_test_db().await?;
        seed_folders(&db).await?;

        let server = test_server(db).await?;
        let response = server.get("/api/folders").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Vec<Folder>>(), make_folders_array());
        Ok(())
    }

    #[tokio::test]
    async fn create_folder() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.post("/api/folders").json(&json!({ "folder_name": "Inbox" })).await;

        assert_eq!(response.status_code(), StatusCode::CREATED);
        let folder = response.json::<Folder>();
        assert_eq!(folder.folder_name, "Inbox");
        assert_eq!(response.header("location"), format!("/api/folders/{}", folder.id).as_str());
        Ok(())
    }

    #[tokio::test]
    async fn create_folder_without_name() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.post("/api/folders").json(&json!({})).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": { "message": "Missing folder_name in request" } }));
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_folder() -> Result<()> {
        let db = init_test_db().await?;

        let server = test_server(db).await?;
        let response = server.get("/api/folders/12345").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        response.assert_json(&json!({ "error": { "message": "Folder does not exist" } }));
        Ok(())
    }

    #[tokio::test]
    async fn rename_folder() -> Result<()> {
        let db = init_test_db().await?;
        seed_folders(&db).await?;

        let server = test_server(db).await?;
        let response = server.patch("/api/folders/2").json(&json!({ "folder_name": "Renamed" })).await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        let folder = server.get("/api/folders/2").await.json::<Folder>();
        assert_eq!(folder.folder_name, "Renamed");

        let response = server.patch("/api/folders/2").json(&json!({ "name": "x" })).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        Ok(())
    }

    #[tokio::test]
    async fn delete_folder_removes_its_notes() -> Result<()> {
        let db = init_test_db().await?;
        seed(&db).await?;

        let server = test_server(db).await?;
        let response = server.delete("/api/folders/3").await;
        assert_eq!(response.status_code(), StatusCode::NO_CONTENT);

        // note 2 lived in folder 3
        assert_eq!(server.get("/api/notes/2").await.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(server.delete("/api/folders/3").await.status_code(), StatusCode::NOT_FOUND);
        Ok(())
    }

    async fn test_server(db: DB) -> Result<TestServer> {
        crate::tests::test_server(db, |state| {
            super::router(state.clone()).merge(crate::notes::router(state))
        })
        .await
    }
}
