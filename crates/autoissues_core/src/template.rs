//! Display text templates.
//!
//! Reference texts may contain `{issue.id}`, `{issue.title}`, `{issue.url}`
//! and `{issue.closed}`, which are replaced with the fields of the resolved
//! issue. `{issue}` is the issue id. `{{` and `}}` are literal braces.
//! Other `{...}` sequences are kept as written.

use autoissues_tracker::Issue;

/// Formats `template` with the fields of `issue`.
///
/// # Example
///
/// ```rust
/// use autoissues_core::format_issue;
/// use autoissues_tracker::Issue;
///
/// let issue = Issue::new("10", "Crash on start", "https://example.com/10", true);
/// assert_eq!(format_issue("{issue.title} (#{issue.id})", &issue), "Crash on start (#10)");
/// ```
pub fn format_issue(template: &str, issue: &Issue) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if tail.starts_with('{')
            && let Some(end) = tail.find('}')
            && let Some(value) = field(&tail[1..end], issue)
        {
            out.push_str(&value);
            rest = &tail[end + 1..];
            continue;
        }

        out.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

fn field(name: &str, issue: &Issue) -> Option<String> {
    let value = match name.trim() {
        "issue" | "issue.id" => issue.id.clone(),
        "issue.title" => issue.title.clone(),
        "issue.url" => issue.url.clone(),
        "issue.closed" => issue.closed.to_string(),
        _ => return None,
    };
    Some(value)
}
