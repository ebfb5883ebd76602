/// Represents pagination parameters for compiled queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    /// Create pagination with page number (1-indexed) and per-page count
    pub fn new(page: u64, per_page: u64) -> Self {
        let offset = if page > 0 {
            Some((page - 1) * per_page)
        } else {
            None
        };
        Self {
            limit: Some(per_page),
            offset,
        }
    }

    /// Create pagination with only limit
    pub fn limit_only(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        let mut sql = String::new();

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        sql
    }

    /// Calculate total pages given a total count
    pub fn total_pages(&self, total_count: u64) -> u64 {
        match self.limit {
            Some(limit) if limit > 0 => total_count.div_ceil(limit).max(1),
            _ => 1,
        }
    }

    /// Slice bounds into a result set of `len` rows
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = self.offset.map_or(0, |o| o as usize).min(len);
        let end = match self.limit {
            Some(limit) => start.saturating_add(limit as usize).min(len),
            None => len,
        };
        (start, end)
    }
}
