use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated `LIMIT`/`OFFSET` pair handed to the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 100;

    pub fn validate(&self) -> Result<Page, ApiError> {
        let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT);
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::BadRequest("offset must not be negative".to_string()));
        }
        Ok(Page { limit, offset })
    }
}

impl Page {
    /// Applies the page to an already ordered in-memory listing.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let page = Pagination::default().validate().unwrap();
        assert_eq!(page, Page { limit: 100, offset: 0 });
    }

    #[test]
    fn bounds_are_enforced() {
        let too_big = Pagination { limit: Some(101), offset: None };
        assert!(too_big.validate().is_err());
        let zero = Pagination { limit: Some(0), offset: None };
        assert!(zero.validate().is_err());
        let negative = Pagination { limit: None, offset: Some(-1) };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn slice_skips_and_takes() {
        let page = Page { limit: 2, offset: 1 };
        assert_eq!(page.slice(vec![1, 2, 3, 4]), vec![2, 3]);
    }
}
