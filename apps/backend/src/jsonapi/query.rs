//! Query parameter parsing (`filter[..]`, `sort`, `include`, `page[..]`).
//!
//! Parsing checks syntax and page bounds only. Field names are checked by
//! the relationship reader against the related type.

use crate::error::AppError;
use crate::errors::ErrorCode;

pub const DEFAULT_PAGE_SIZE: u64 = 15;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub descending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// `(field, value)` in request order.
    pub filters: Vec<(String, String)>,
    pub sort: Vec<SortField>,
    pub include: Vec<String>,
    pub page: Option<Page>,
}

/// `family[key]` -> `(family, key)`
fn bracketed(name: &str) -> Option<(&str, &str)> {
    let open = name.find('[')?;
    let inner = name[open + 1..].strip_suffix(']')?;
    if inner.is_empty() || inner.contains(['[', ']']) {
        return None;
    }
    Some((&name[..open], inner))
}

fn comma_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn page_value(key: &str, raw: &str, range: std::ops::RangeInclusive<u64>) -> Result<u64, AppError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|n| range.contains(n))
        .ok_or_else(|| {
            let detail = if *range.end() == u64::MAX {
                format!("The page.{key} field must be an integer of at least {}.", range.start())
            } else {
                format!(
                    "The page.{key} field must be an integer between {} and {}.",
                    range.start(),
                    range.end()
                )
            };
            AppError::invalid_parameter(ErrorCode::InvalidPage, detail, format!("page.{key}"))
        })
}

impl QueryParams {
    pub fn parse(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let mut params = QueryParams::default();
        let mut number = None;
        let mut size = None;

        for (name, value) in pairs {
            match (name.as_str(), bracketed(name)) {
                ("sort", _) => {
                    params.sort = comma_list(value)
                        .map(|field| match field.strip_prefix('-') {
                            Some(rest) => SortField {
                                field: rest.to_string(),
                                descending: true,
                            },
                            None => SortField {
                                field: field.to_string(),
                                descending: false,
                            },
                        })
                        .collect();
                }
                ("include", _) => {
                    params.include = comma_list(value).map(str::to_string).collect();
                }
                (_, Some(("filter", field))) => {
                    params.filters.push((field.to_string(), value.clone()));
                }
                (_, Some(("page", "number"))) => {
                    number = Some(page_value("number", value, 1..=u64::MAX)?);
                }
                (_, Some(("page", "size"))) => {
                    size = Some(page_value("size", value, 1..=MAX_PAGE_SIZE)?);
                }
                (_, Some(("page", key))) => {
                    return Err(AppError::invalid_parameter(
                        ErrorCode::InvalidPage,
                        format!("Page parameter {key} is not allowed."),
                        format!("page.{key}"),
                    ));
                }
                // sparse fieldsets are accepted and ignored
                (_, Some(("fields", _))) => {}
                (other, _) => {
                    return Err(AppError::invalid_parameter(
                        ErrorCode::InvalidQueryParameter,
                        format!("Query parameter {other} is not allowed."),
                        other,
                    ));
                }
            }
        }

        if number.is_some() || size.is_some() {
            params.page = Some(Page {
                number: number.unwrap_or(1),
                size: size.unwrap_or(DEFAULT_PAGE_SIZE),
            });
        }
        Ok(params)
    }
}
