//! Deep-link resolution: pull a quiz id out of an externally supplied link
//! or invocation payload.
//!
//! Contract: an explicit `quiz_id` parameter wins; otherwise the last path
//! segment of the link. Produces a string or absence, nothing else — a miss
//! downstream renders as a not-found state, never an error.

/// Extract a quiz id. Empty strings count as absent.
pub fn extract_quiz_id(link: Option<&str>, quiz_id: Option<&str>) -> Option<String> {
  if let Some(id) = quiz_id {
    let id = id.trim();
    if !id.is_empty() {
      return Some(id.to_string());
    }
  }
  link.and_then(last_path_segment)
}

/// Last non-empty path segment of a URL-shaped string, with any query
/// string or fragment stripped first. Tolerates bare paths and trailing
/// slashes; does not insist on a scheme.
fn last_path_segment(link: &str) -> Option<String> {
  let link = link.trim();
  let without_query = link.split(['?', '#']).next().unwrap_or(link);
  // Strip scheme + authority when present; a link with no path yields nothing.
  let path = match without_query.find("://") {
    Some(i) => {
      let rest = &without_query[i + 3..];
      match rest.find('/') {
        Some(j) => &rest[j + 1..],
        None => return None, // no path at all
      }
    }
    None => without_query,
  };
  path
    .rsplit('/')
    .find(|seg| !seg.is_empty())
    .map(|seg| seg.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn explicit_parameter_wins_over_link() {
    assert_eq!(
      extract_quiz_id(Some("https://ltquiz.vercel.app/quiz/world-history"), Some("basic-math")),
      Some("basic-math".into())
    );
  }

  #[test]
  fn falls_back_to_last_path_segment() {
    assert_eq!(
      extract_quiz_id(Some("https://ltquiz.vercel.app/quiz/basic-science"), None),
      Some("basic-science".into())
    );
    assert_eq!(
      extract_quiz_id(Some("https://ltquiz.vercel.app/quiz/basic-science/"), None),
      Some("basic-science".into())
    );
    assert_eq!(
      extract_quiz_id(Some("/quiz/world-history?ref=share#top"), None),
      Some("world-history".into())
    );
  }

  #[test]
  fn blank_inputs_are_absent() {
    assert_eq!(extract_quiz_id(None, None), None);
    assert_eq!(extract_quiz_id(Some(""), Some("  ")), None);
    assert_eq!(extract_quiz_id(Some("https://ltquiz.vercel.app"), None), None);
    assert_eq!(extract_quiz_id(Some("https://ltquiz.vercel.app/"), None), None);
  }
}
