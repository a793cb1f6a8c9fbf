//! PostgREST query construction.
//!
//! Builds the filter/select/order query strings understood by the Supabase
//! REST endpoint (`rest/v1/{table}?...`). Values are percent-encoded; the
//! PostgREST operator prefixes (`eq.`, `ilike.`, ...) ride inside the value.

// ============================================================================
// Query Builder
// ============================================================================

/// Ordered query parameters for a PostgREST request.
#[derive(Debug, Clone, Default)]
pub struct Query {
    params: Vec<(String, String)>,
}

impl Query {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose the columns to return (`select=col,other(nested)`).
    pub fn select(mut self, columns: &str) -> Self {
        self.params.push(("select".to_string(), columns.to_string()));
        self
    }

    /// Equality filter.
    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "eq", &value.to_string())
    }

    /// Inequality filter.
    pub fn neq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "neq", &value.to_string())
    }

    /// Greater-than filter.
    pub fn gt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gt", &value.to_string())
    }

    /// Greater-than-or-equal filter.
    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gte", &value.to_string())
    }

    /// Less-than filter.
    pub fn lt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lt", &value.to_string())
    }

    /// Less-than-or-equal filter.
    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lte", &value.to_string())
    }

    /// Case-insensitive pattern match; `*` is the wildcard.
    pub fn ilike(self, column: &str, pattern: &str) -> Self {
        self.filter(column, "ilike", pattern)
    }

    /// Array-contains filter for array columns (`cs.{a,b}`).
    pub fn contains(mut self, column: &str, values: &[&str]) -> Self {
        let elements: Vec<String> = values.iter().map(|v| quote_element(v)).collect();
        self.params.push((
            column.to_string(),
            format!("cs.{{{}}}", elements.join(",")),
        ));
        self
    }

    /// Membership filter (`in.(a,b)`).
    pub fn in_list(mut self, column: &str, values: &[&str]) -> Self {
        let elements: Vec<String> = values.iter().map(|v| quote_element(v)).collect();
        self.params.push((
            column.to_string(),
            format!("in.({})", elements.join(",")),
        ));
        self
    }

    /// Null check.
    pub fn is_null(mut self, column: &str) -> Self {
        self.params.push((column.to_string(), "is.null".to_string()));
        self
    }

    /// Not-null check.
    pub fn not_null(mut self, column: &str) -> Self {
        self.params
            .push((column.to_string(), "not.is.null".to_string()));
        self
    }

    /// Sort order. Repeated calls append to a single comma-separated
    /// `order` parameter, which is how PostgREST expects multi-column sorts.
    pub fn order(mut self, column: &str, descending: bool) -> Self {
        let direction = if descending { "desc" } else { "asc" };
        let term = format!("{}.{}", column, direction);
        if let Some(existing) = self.params.iter_mut().find(|(k, _)| k == "order") {
            existing.1 = format!("{},{}", existing.1, term);
        } else {
            self.params.push(("order".to_string(), term));
        }
        self
    }

    /// Maximum number of rows to return.
    pub fn limit(mut self, n: u32) -> Self {
        self.params.push(("limit".to_string(), n.to_string()));
        self
    }

    /// Whether no parameters have been added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Whether any row-restricting filter is present. `select`, `order`,
    /// and `limit` shape the response but do not restrict rows, so a
    /// mutation with only those would hit the whole table.
    pub fn has_filters(&self) -> bool {
        self.params
            .iter()
            .any(|(k, _)| k != "select" && k != "order" && k != "limit")
    }

    /// Render as a URL query string.
    pub fn build(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn filter(mut self, column: &str, op: &str, value: &str) -> Self {
        self.params
            .push((column.to_string(), format!("{}.{}", op, value)));
        self
    }
}

/// Quote an array/list element when it contains PostgREST delimiters.
fn quote_element(value: &str) -> String {
    let needs_quoting = value
        .chars()
        .any(|c| matches!(c, ',' | '{' | '}' | '(' | ')' | '"' | ' '));
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        let q = Query::new();
        assert!(q.is_empty());
        assert!(!q.has_filters());
        assert_eq!(q.build(), "");
    }

    #[test]
    fn test_basic_filters() {
        let q = Query::new()
            .select("*")
            .eq("user_id", "abc-123")
            .order("updated_at", true)
            .limit(5);
        assert_eq!(
            q.build(),
            "select=%2A&user_id=eq.abc-123&order=updated_at.desc&limit=5"
        );
        assert!(q.has_filters());
    }

    #[test]
    fn test_numeric_and_comparison_filters() {
        let q = Query::new().gte("price", 1000).lt("price", 5000);
        assert_eq!(q.build(), "price=gte.1000&price=lt.5000");
    }

    #[test]
    fn test_null_checks() {
        let q = Query::new()
            .not_null("intro_video_url")
            .is_null("deleted_at");
        assert_eq!(
            q.build(),
            "intro_video_url=not.is.null&deleted_at=is.null"
        );
    }

    #[test]
    fn test_contains_quotes_elements_with_delimiters() {
        let q = Query::new().contains("desired_roles", &["Delivery Driver"]);
        // Spaces force quoting; the whole value is then percent-encoded
        assert_eq!(
            q.build(),
            "desired_roles=cs.%7B%22Delivery%20Driver%22%7D"
        );

        let plain = Query::new().contains("desired_roles", &["driver"]);
        assert_eq!(plain.build(), "desired_roles=cs.%7Bdriver%7D");
    }

    #[test]
    fn test_in_list() {
        let q = Query::new().in_list("job_id", &["a1", "b2", "c3"]);
        assert_eq!(q.build(), "job_id=in.%28a1%2Cb2%2Cc3%29");
    }

    #[test]
    fn test_order_merges_into_single_param() {
        let q = Query::new()
            .order("created_at", true)
            .order("id", false);
        assert_eq!(q.build(), "order=created_at.desc%2Cid.asc");
    }

    #[test]
    fn test_select_only_is_not_a_filter() {
        let q = Query::new().select("id,title").order("id", false).limit(10);
        assert!(!q.has_filters());
    }

    #[test]
    fn test_ilike_pattern() {
        let q = Query::new().ilike("desired_location", "*bangalore*");
        assert_eq!(q.build(), "desired_location=ilike.%2Abangalore%2A");
    }
}
