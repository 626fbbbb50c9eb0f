/* src/cli/compiler/src/route/pattern.rs */

use std::cmp::Ordering;

use super::path::{RoutePath, Segment};

/// Compile a route into an anchored pattern string.
///
/// Literals are escaped, `[name]` matches one non-empty segment and a
/// trailing `[...name]` matches one or more segments. One trailing slash is
/// tolerated. The output avoids named groups and escaped slashes so that both
/// the `regex` crate and JavaScript's `RegExp` accept it unchanged.
pub fn compile_pattern(route: &RoutePath) -> String {
  let mut pattern = String::from("^");
  for segment in route.segments() {
    pattern.push('/');
    match segment {
      Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
      Segment::Param(_) => pattern.push_str("([^/]+?)"),
      Segment::CatchAll(_) => pattern.push_str("(.+?)"),
    }
  }
  pattern.push_str("(?:/)?$");
  pattern
}

/// Specificity order for dynamic routes: compared segment by segment,
/// literals before parameters before catch-alls, then a shorter route first.
pub fn compare_specificity(a: &RoutePath, b: &RoutePath) -> Ordering {
  for (left, right) in a.segments().iter().zip(b.segments()) {
    let ord = left.rank().cmp(&right.rank()).then_with(|| match (left, right) {
      (Segment::Literal(l), Segment::Literal(r)) => l.cmp(r),
      _ => Ordering::Equal,
    });
    if ord != Ordering::Equal {
      return ord;
    }
  }
  a.segments().len().cmp(&b.segments().len())
}
