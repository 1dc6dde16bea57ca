use std::path::PathBuf;

use serde::Deserialize;

use crate::app::App;
use crate::db::SqliteStorage;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub app: Option<App<SqliteStorage>>,
}
