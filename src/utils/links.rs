use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const GCS_SCHEME: &str = "gs://";
const GCS_BROWSE_PREFIX: &str = "https://storage.cloud.google.com/";

/// Everything except alphanumerics, the RFC 3986 unreserved marks and the
/// structural URL characters `/:?=&#` gets percent-encoded.
const LINK_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b':')
    .remove(b'?')
    .remove(b'=')
    .remove(b'&')
    .remove(b'#')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Rewrites an object-storage link to its public browsing URL and
/// percent-encodes it for embedding in markdown. Only the `gs://` scheme
/// prefix is substituted; the object path is left untouched. Empty links
/// stay empty.
pub fn normalize_link(link: &str) -> String {
    if link.is_empty() {
        return String::new();
    }
    let rewritten = if let Some(path) = link.strip_prefix(GCS_SCHEME) {
        format!("{}{}", GCS_BROWSE_PREFIX, path)
    } else {
        link.to_string()
    };
    utf8_percent_encode(&rewritten, LINK_ENCODE_SET).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn rewrites_object_storage_scheme() {
        assert_eq!(
            normalize_link("gs://bucket/doc.pdf"),
            "https://storage.cloud.google.com/bucket/doc.pdf"
        );
    }

    #[test]
    fn rewrites_scheme_prefix_only_once() {
        // A path segment that happens to contain the scheme is untouched.
        assert_eq!(
            normalize_link("gs://bucket/gs://nested"),
            "https://storage.cloud.google.com/bucket/gs://nested"
        );
    }

    #[rstest]
    #[case("https://example.com/a/b?x=1&y=2#frag")]
    #[case("https://example.com/path.with-marks_~ok")]
    fn structural_characters_survive_encoding(#[case] link: &str) {
        assert_eq!(normalize_link(link), link);
    }

    #[test]
    fn encodes_spaces_and_non_ascii() {
        assert_eq!(
            normalize_link("gs://bucket/案件 資料.pdf"),
            "https://storage.cloud.google.com/bucket/%E6%A1%88%E4%BB%B6%20%E8%B3%87%E6%96%99.pdf"
        );
    }

    #[test]
    fn http_links_pass_through() {
        assert_eq!(
            normalize_link("https://example.com/doc"),
            "https://example.com/doc"
        );
    }

    #[test]
    fn empty_link_stays_empty() {
        assert_eq!(normalize_link(""), "");
    }
}
