use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ListRemoteFilesQuery {
    #[validate(length(min = 1))]
    pub owner: String,
    #[validate(length(min = 1))]
    pub repo: String,
    #[serde(default)]
    pub path: String,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoteFileRef {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(url)]
    pub download_url: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportRemoteFilesPayload {
    #[validate(length(min = 1, message = "Select at least one file to import"))]
    pub files: Vec<RemoteFileRef>,
}
