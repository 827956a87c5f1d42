//! Locating the pending version in a changelog
//!
//! The newest entry sits at the top. Its header is `# <version>`, optionally
//! followed by decoration such as an existing `(api=..., abi=...)` annotation,
//! which is ignored so that parsing an already annotated changelog gives the
//! same version back.

use crate::release::version::Version;
use regex::Regex;
use std::sync::LazyLock;

/// Optional `#` markers, then a digits-and-dots token ending the line or
/// followed by whitespace or `(`.
static VERSION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[ \t]*#*[ \t]*(?P<version>\d+(?:\.\d+)*)(?:[ \t(].*)?$").expect("valid header regex")
});

/// A line of text split from its terminator
pub(crate) struct Line<'a> {
  pub content: &'a str,
  pub ending: &'a str,
}

/// Split text into lines while keeping each terminator (`\n`, `\r\n` or none)
pub(crate) fn lines_with_endings(text: &str) -> impl Iterator<Item = Line<'_>> {
  text.split_inclusive('\n').map(|raw| {
    let content_len = if raw.ends_with("\r\n") {
      raw.len() - 2
    } else if raw.ends_with('\n') {
      raw.len() - 1
    } else {
      raw.len()
    };
    let (content, ending) = raw.split_at(content_len);
    Line { content, ending }
  })
}

/// Version token of a header line, if the line is one
pub(crate) fn header_version(line: &str) -> Option<Version> {
  let captures = VERSION_HEADER.captures(line)?;
  captures.name("version")?.as_str().parse().ok()
}

/// Find the version of the first header line in the changelog
pub fn find_pending_version(changelog: &str) -> Option<Version> {
  lines_with_endings(changelog).find_map(|line| header_version(line.content))
}
