use actix_web::HttpRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// Limit/offset window over a list. Only built when the client asks for a
/// positive `limit`; otherwise the list is returned whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl LimitOffset {
    pub fn from_query(query: &PaginationQuery) -> Option<Self> {
        let limit = query
            .limit
            .as_deref()
            .and_then(|limit| limit.trim().parse::<i64>().ok())
            .filter(|limit| *limit > 0)?;
        let offset = query
            .offset
            .as_deref()
            .and_then(|offset| offset.trim().parse::<i64>().ok())
            .filter(|offset| *offset >= 0)
            .unwrap_or(0);

        Some(Self { limit, offset })
    }

    pub fn paginate<T>(&self, req: &HttpRequest, count: i64, results: Vec<T>) -> Paginated<T> {
        let base = {
            let info = req.connection_info();
            format!("{}://{}{}", info.scheme(), info.host(), req.path())
        };
        let query = req.query_string();

        Paginated {
            count,
            next: self.next_offset(count).map(|offset| page_link(&base, query, self.limit, Some(offset))),
            previous: self
                .previous_offset()
                .map(|offset| page_link(&base, query, self.limit, offset)),
            results,
        }
    }

    fn next_offset(&self, count: i64) -> Option<i64> {
        self.offset
            .checked_add(self.limit)
            .filter(|next| *next < count)
    }

    /// `Some(None)` is the first page, linked without an offset.
    fn previous_offset(&self) -> Option<Option<i64>> {
        if self.offset <= 0 {
            None
        } else if self.offset - self.limit <= 0 {
            Some(None)
        } else {
            Some(Some(self.offset - self.limit))
        }
    }
}

fn page_link(base: &str, query: &str, limit: i64, offset: Option<i64>) -> String {
    let mut params: Vec<String> = query
        .split('&')
        .filter(|param| !param.is_empty())
        .filter(|param| {
            let key = param.split('=').next().unwrap_or_default();
            key != "limit" && key != "offset"
        })
        .map(str::to_string)
        .collect();

    params.push(format!("limit={}", limit));
    if let Some(offset) = offset {
        params.push(format!("offset={}", offset));
    }

    format!("{}?{}", base, params.join("&"))
}
