//! Statically typed configuration of one CRUD page.
//!
//! Produced by the routing layer, validated once at construction and immutable
//! afterwards. Construction fails fast with [`ConfigError`]; nothing is checked
//! again at render time.

use std::collections::HashSet;
use std::num::NonZeroUsize;

use bon::bon;

use crate::{Column, ConfigError, Permission};

/// Uid field used when the route does not name one.
pub const DEFAULT_UID_FIELD: &str = "id";

#[derive(Debug, Clone)]
pub struct PageConfig {
    title: String,
    columns: Vec<Column>,
    endpoint: String,
    uid_field: String,
    is_editable: Permission,
    is_deletable: Permission,
    page_size: Option<NonZeroUsize>,
}

#[bon]
impl PageConfig {
    #[builder]
    pub fn new(
        #[builder(into)] title: String,
        columns: Vec<Column>,
        #[builder(into)] endpoint: String,
        #[builder(into, default = DEFAULT_UID_FIELD.to_owned())] uid_field: String,
        #[builder(default)] is_editable: Permission,
        #[builder(default)] is_deletable: Permission,
        page_size: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let title = title.trim().to_owned();
        if title.is_empty() {
            return Err(ConfigError::MissingTitle);
        }

        let endpoint = endpoint.trim().trim_matches('/').to_owned();
        if endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }

        let uid_field = uid_field.trim().to_owned();
        if uid_field.is_empty() {
            return Err(ConfigError::MissingUidField);
        }

        if columns.is_empty() {
            return Err(ConfigError::NoColumns);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.field()) {
                return Err(ConfigError::DuplicateColumn(column.field().to_owned()));
            }
        }

        let page_size = match page_size {
            Some(size) => Some(NonZeroUsize::new(size).ok_or(ConfigError::InvalidPageSize)?),
            None => None,
        };

        Ok(Self {
            title,
            columns,
            endpoint,
            uid_field,
            is_editable,
            is_deletable,
            page_size,
        })
    }
}

impl PageConfig {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Resource path relative to the API base, without surrounding slashes.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn uid_field(&self) -> &str {
        &self.uid_field
    }

    pub fn is_editable(&self) -> &Permission {
        &self.is_editable
    }

    pub fn is_deletable(&self) -> &Permission {
        &self.is_deletable
    }

    /// `None` means the endpoint returns the whole collection in one response.
    pub fn page_size(&self) -> Option<NonZeroUsize> {
        self.page_size
    }
}
