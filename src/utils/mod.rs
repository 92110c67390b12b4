pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1000 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1000.0 {
            break;
        }
        value /= 1000.0;
        unit = next;
    }

    format!("{:.1} {}", value, unit)
}

/// Last path segment of an `at://` post URI, used as the post id.
pub fn post_id_from_uri(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(999), "999 B");
        assert_eq!(format_bytes(1000), "1.0 KB");
        assert_eq!(format_bytes(1_500_000), "1.5 MB");
        assert_eq!(format_bytes(2_340_000_000), "2.3 GB");
    }

    #[test]
    fn test_post_id_from_uri() {
        assert_eq!(
            post_id_from_uri("at://did:plc:abc/app.bsky.feed.post/3kxyz"),
            "3kxyz"
        );
        assert_eq!(post_id_from_uri("plain"), "plain");
        assert_eq!(post_id_from_uri("trailing/"), "");
    }
}
