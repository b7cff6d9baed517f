use time::OffsetDateTime;
use time::macros::format_description;

pub(in crate::tui) fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index.min(len - 1) }
}

pub(in crate::tui) fn adjust_scroll(
    selected: usize,
    scroll: usize,
    height: usize,
    len: usize,
) -> usize {
    if len == 0 || height == 0 {
        return 0;
    }
    if selected < scroll {
        return selected;
    }
    let last_visible = scroll.saturating_add(height).saturating_sub(1);
    if selected > last_visible {
        return selected.saturating_sub(height - 1).min(len.saturating_sub(1));
    }
    scroll.min(len.saturating_sub(1))
}

pub(in crate::tui) fn truncate_with_ellipsis(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut truncated = value.chars().take(max - 1).collect::<String>();
    truncated.push('…');
    truncated
}

pub(in crate::tui) fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

pub(in crate::tui) fn format_epoch(seconds: u64) -> String {
    if seconds == 0 {
        return "-".to_string();
    }
    let Ok(seconds) = i64::try_from(seconds) else {
        return seconds.to_string();
    };
    OffsetDateTime::from_unix_timestamp(seconds)
        .ok()
        .and_then(|timestamp| {
            timestamp
                .format(format_description!("[year]-[month]-[day] [hour]:[minute] UTC"))
                .ok()
        })
        .unwrap_or_else(|| seconds.to_string())
}

/// Folder name for a repo under the chosen parent directory.
pub(crate) fn folder_name(repo_name: &str) -> String {
    let cleaned: String = repo_name
        .trim()
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect();
    if cleaned.is_empty() || cleaned == "." || cleaned == ".." {
        "library".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_follows_selection() {
        assert_eq!(adjust_scroll(0, 0, 5, 0), 0);
        assert_eq!(adjust_scroll(7, 0, 5, 10), 3);
        assert_eq!(adjust_scroll(2, 4, 5, 10), 2);
        assert_eq!(adjust_scroll(5, 3, 5, 10), 3);
    }

    #[test]
    fn truncation_marks_cut_text() {
        assert_eq!(truncate_with_ellipsis("library", 10), "library");
        assert_eq!(truncate_with_ellipsis("library", 4), "lib…");
        assert_eq!(truncate_with_ellipsis("library", 0), "");
    }

    #[test]
    fn sizes_use_binary_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn epoch_zero_is_unknown() {
        assert_eq!(format_epoch(0), "-");
        assert_eq!(format_epoch(86_400), "1970-01-02 00:00 UTC");
    }

    #[test]
    fn folder_names_drop_path_separators() {
        assert_eq!(folder_name("My Docs"), "My Docs");
        assert_eq!(folder_name("a/b:c"), "a_b_c");
        assert_eq!(folder_name(" .. "), "library");
    }
}
