//! Request descriptors and query-string serialization
//!
//! Pure functions that turn a structured request (pagination, sort, nested
//! filters, relations to populate) into the bracketed query string Strapi
//! understands, and parse such a query string back into a filter tree.
//!
//! Serialization order is fixed: pagination, sort, filters (in insertion
//! order), populate. Null values never reach the wire.

use std::fmt;
use std::str::FromStr;

/// Error type for query construction
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QueryError {
    #[error("Invalid sort expression: {0}")]
    InvalidSort(String),

    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),
}

// ============================================================================
// Operators
// ============================================================================

/// Strapi filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
    NotIn,
    Contains,
    Containsi,
    NotContainsi,
    Null,
    NotNull,
    Or,
    And,
}

impl Operator {
    const ALL: [Operator; 15] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Lte,
        Operator::Gt,
        Operator::Gte,
        Operator::In,
        Operator::NotIn,
        Operator::Contains,
        Operator::Containsi,
        Operator::NotContainsi,
        Operator::Null,
        Operator::NotNull,
        Operator::Or,
        Operator::And,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::In => "$in",
            Operator::NotIn => "$notIn",
            Operator::Contains => "$contains",
            Operator::Containsi => "$containsi",
            Operator::NotContainsi => "$notContainsi",
            Operator::Null => "$null",
            Operator::NotNull => "$notNull",
            Operator::Or => "$or",
            Operator::And => "$and",
        }
    }

    /// Look up an operator by its wire name (`$eq`, `$containsi`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

// ============================================================================
// Filter tree
// ============================================================================

/// A filter value: a scalar, a positional list, or a nested mapping of
/// field names / operators to further values.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<FilterValue>),
    Map(Filters),
}

impl FilterValue {
    /// Single-operator mapping, e.g. `{ "$lte": "2024-01-01T00:00:00.000Z" }`
    pub fn op(operator: Operator, value: impl Into<FilterValue>) -> Self {
        FilterValue::Map(Filters::new().with(operator, value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Text form of a scalar value, `None` for null and compound values
    pub fn as_scalar_text(&self) -> Option<String> {
        match self {
            FilterValue::Bool(b) => Some(b.to_string()),
            FilterValue::Int(n) => Some(n.to_string()),
            FilterValue::Float(n) => Some(n.to_string()),
            FilterValue::Text(s) => Some(s.clone()),
            FilterValue::Null | FilterValue::List(_) | FilterValue::Map(_) => None,
        }
    }

    /// Nested mapping, if this value is one
    pub fn as_map(&self) -> Option<&Filters> {
        match self {
            FilterValue::Map(filters) => Some(filters),
            _ => None,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Int(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Int(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Int(value.into())
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        FilterValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<Filters> for FilterValue {
    fn from(value: Filters) -> Self {
        FilterValue::Map(value)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Insertion-ordered mapping of filter keys to values.
///
/// Keys are unique: inserting an existing key replaces its value in place,
/// keeping the original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filters {
    entries: Vec<(String, FilterValue)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge `other` into `self`; keys from `other` win.
    pub fn extend(&mut self, other: Filters) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    fn entry_mut(&mut self, key: &str) -> &mut FilterValue {
        let index = match self.entries.iter().position(|(k, _)| k == key) {
            Some(index) => index,
            None => {
                self.entries.push((key.to_string(), FilterValue::Null));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }

    /// Flatten into `(key, value)` pairs under the given prefix.
    ///
    /// `filters[<key>]` for scalars, `filters[<key>][<op>]` for nested
    /// mappings, `filters[<key>][<index>]` for list items. Nulls are skipped.
    pub fn to_pairs(&self, prefix: &str) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in self.iter() {
            flatten_into(format!("{prefix}[{key}]"), value, &mut pairs);
        }
        pairs
    }

    /// Rebuild a filter tree from decoded query pairs.
    ///
    /// Only keys under `filters[...]` are considered. Scalars come back as
    /// [`FilterValue::Text`]; numeric segments become list positions and
    /// must address an existing item or the next one, otherwise the pair is
    /// skipped.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = Filters::new();
        for (key, value) in pairs {
            let Some(rest) = key.strip_prefix("filters") else {
                continue;
            };
            let Some(path) = parse_segments(rest) else {
                continue;
            };
            if let Some((first, tail)) = path.split_first() {
                insert_path(filters.entry_mut(first), tail, value);
            }
        }
        filters.entries.retain(|(_, value)| !value.is_null());
        filters
    }
}

fn flatten_into(key: String, value: &FilterValue, out: &mut Vec<(String, String)>) {
    match value {
        FilterValue::Null => {}
        FilterValue::List(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(format!("{key}[{index}]"), item, out);
            }
        }
        FilterValue::Map(nested) => {
            for (nested_key, nested_value) in nested.iter() {
                flatten_into(format!("{key}[{nested_key}]"), nested_value, out);
            }
        }
        scalar => {
            if let Some(text) = scalar.as_scalar_text() {
                out.push((key, text));
            }
        }
    }
}

/// Split `[a][b][0]` into `["a", "b", "0"]`
fn parse_segments(mut rest: &str) -> Option<Vec<String>> {
    let mut segments = Vec::new();
    while !rest.is_empty() {
        let inner = rest.strip_prefix('[')?;
        let end = inner.find(']')?;
        segments.push(inner[..end].to_string());
        rest = &inner[end + 1..];
    }
    Some(segments)
}

fn insert_path(slot: &mut FilterValue, path: &[String], value: &str) {
    let Some((segment, tail)) = path.split_first() else {
        *slot = FilterValue::Text(value.to_string());
        return;
    };

    if let Ok(index) = segment.parse::<usize>() {
        let len = match slot {
            FilterValue::List(items) => items.len(),
            _ => 0,
        };
        // Indexes may only address an existing item or append the next one
        if index > len {
            return;
        }
        if !matches!(slot, FilterValue::List(_)) {
            *slot = FilterValue::List(Vec::new());
        }
        if let FilterValue::List(items) = slot {
            if index == items.len() {
                items.push(FilterValue::Null);
            }
            insert_path(&mut items[index], tail, value);
        }
    } else {
        if !matches!(slot, FilterValue::Map(_)) {
            *slot = FilterValue::Map(Filters::new());
        }
        if let FilterValue::Map(nested) = slot {
            insert_path(nested.entry_mut(segment), tail, value);
        }
    }
}

// ============================================================================
// Sort and pagination
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(QueryError::InvalidDirection(other.to_string())),
        }
    }
}

/// Sort expression, serialized verbatim as `field:direction`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

/// Parses `field` (ascending) or `field:asc|desc`
impl FromStr for Sort {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field, direction.parse()?),
            None => (s, SortDirection::Asc),
        };
        let field = field.trim();
        if field.is_empty() {
            return Err(QueryError::InvalidSort(s.to_string()));
        }
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Page request; both values are at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }
}

// ============================================================================
// Request descriptor
// ============================================================================

/// Structured description of a collection request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestDescriptor {
    pub pagination: Option<PageRequest>,
    pub sort: Option<Sort>,
    pub filters: Filters,
    pub populate: Vec<String>,
}

impl RequestDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paginate(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Some(PageRequest::new(page, page_size));
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key, value);
        self
    }

    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters.extend(filters);
        self
    }

    pub fn populate<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.populate = relations.into_iter().map(Into::into).collect();
        self
    }

    /// Decoded `(key, value)` pairs in wire order
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        if let Some(pagination) = &self.pagination {
            pairs.push(("pagination[page]".to_string(), pagination.page.to_string()));
            pairs.push((
                "pagination[pageSize]".to_string(),
                pagination.page_size.to_string(),
            ));
        }

        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.to_string()));
        }

        pairs.extend(self.filters.to_pairs("filters"));

        if !self.populate.is_empty() {
            pairs.push(("populate".to_string(), self.populate.join(",")));
        }

        pairs
    }

    /// Encoded query string without the leading `?`
    pub fn to_query_string(&self) -> String {
        self.to_query_pairs()
            .iter()
            .map(|(key, value)| format!("{}={}", encode_key(key), encode_value(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Fully-qualified URL for `path` under `base_url`
    pub fn build_url(&self, base_url: &str, path: &str) -> String {
        let base_url = base_url.trim_end_matches('/');
        let query = self.to_query_string();
        if query.is_empty() {
            format!("{base_url}{path}")
        } else {
            format!("{base_url}{path}?{query}")
        }
    }
}

/// Percent-encode a key, keeping the bracket syntax and `$` operators readable
pub fn encode_key(key: &str) -> String {
    urlencoding::encode(key)
        .replace("%5B", "[")
        .replace("%5D", "]")
        .replace("%24", "$")
}

/// Percent-encode a value, keeping `:` and `,` literal
pub fn encode_value(value: &str) -> String {
    urlencoding::encode(value)
        .replace("%3A", ":")
        .replace("%2C", ",")
}

/// Decode a query string into `(key, value)` pairs.
///
/// Accepts an optional leading `?` or a full URL. `+` decodes to a space.
/// Pairs that are not valid UTF-8 after decoding are dropped.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = match query.split_once('?') {
        Some((_, query)) => query,
        None => query,
    };

    query
        .split('&')
        .filter(|part| !part.is_empty())
        .filter_map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " "))
                .ok()?
                .into_owned();
            Some((key, value))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
