//! HTTP DTOs for the public board.

use serde::Deserialize;

use crate::application::BoardQuery;
use crate::domain::foundation::UserId;

/// `?limit=&offset=` paging shared by the feed and both searches.
///
/// Search filters are read from the same query string by a second
/// extractor.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

impl WindowQuery {
    pub fn for_viewer(self, viewer: Option<UserId>) -> BoardQuery {
        BoardQuery {
            viewer,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
