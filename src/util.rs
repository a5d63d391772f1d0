//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
/// This is intentionally simple (no nested/conditional logic).
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Log-safe truncation for large strings.
/// Cuts on a char boundary; Arabic text is multi-byte.
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  match s.char_indices().nth(max_chars) {
    None => s.to_string(),
    Some((idx, _)) => format!("{}… ({} bytes total)", &s[..idx], s.len()),
  }
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for ch in s.chars() {
    match ch {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(ch),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fill_template_replaces_every_occurrence() {
    let out = fill_template("{a}-{b}-{a}", &[("a", "1"), ("b", "2")]);
    assert_eq!(out, "1-2-1");
  }

  #[test]
  fn fill_template_leaves_unknown_placeholders() {
    assert_eq!(fill_template("{x} {y}", &[("x", "ok")]), "ok {y}");
  }

  #[test]
  fn trunc_for_log_respects_char_boundaries() {
    let s = "دورة الماء في الطبيعة";
    let t = trunc_for_log(s, 4);
    assert!(t.starts_with("دورة"));
    assert!(t.contains("bytes total"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }

  #[test]
  fn escape_html_handles_markup() {
    assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
  }
}
