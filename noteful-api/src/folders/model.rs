use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    validation::{required, supplied},
    Error, Result,
};

pub type FolderId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Folder {
    pub id: FolderId,
    pub folder_name: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreateFolder {
    pub folder_name: Option<String>,
}

impl CreateFolder {
    pub fn into_folder_name(self) -> Result<String> {
        required("folder_name", self.folder_name)
    }
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdateFolder {
    pub folder_name: Option<String>,
}

impl UpdateFolder {
    pub fn into_folder_name(self) -> Result<String> {
        supplied(self.folder_name).ok_or_else(|| Error::Validation("Request body must contain 'folder_name'".into()))
    }
}
