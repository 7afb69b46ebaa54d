// Marker-delimited fragment extraction over raw SOAP text
//
// No XML parsing happens here. An empty result means "fragment not present".

pub const BODY_OPEN: &str = "<soap-env:Body>";
pub const BODY_CLOSE: &str = "</soap-env:Body>";

pub const FAULT_OPEN: &str = "<faultstring>";
pub const FAULT_CLOSE: &str = "</faultstring>";

pub const ERROR_OPEN: &str = "<stl:Error>";
pub const ERROR_CLOSE: &str = "</stl:Error>";

pub const MESSAGE_OPEN: &str = "<stl:Message>";
pub const MESSAGE_CLOSE: &str = "</stl:Message>";

pub const TOKEN_OPEN: &str =
    r#"<wsse:BinarySecurityToken valueType="String" EncodingType="wsse:Base64Binary">"#;
pub const TOKEN_CLOSE: &str = "</wsse:BinarySecurityToken>";

/// Returns the text between the first `open` marker and the first `close` marker
/// following it, optionally with both markers included.
///
/// Matching is literal and case-sensitive. If either marker is missing the result
/// is an empty string.
///
/// ```
/// use legacy_sabre::extract::sub_string;
///
/// let xml = "<a><b>value</b></a>";
/// assert_eq!(sub_string(xml, "<b>", "</b>", false), "value");
/// assert_eq!(sub_string(xml, "<b>", "</b>", true), "<b>value</b>");
/// assert_eq!(sub_string(xml, "<c>", "</c>", false), "");
/// ```
pub fn sub_string<'a>(source: &'a str, open: &str, close: &str, include_markers: bool) -> &'a str {
    let Some(start) = source.find(open) else {
        return "";
    };
    let inner_start = start + open.len();
    let Some(inner_len) = source[inner_start..].find(close) else {
        return "";
    };
    let inner_end = inner_start + inner_len;

    if include_markers {
        &source[start..inner_end + close.len()]
    } else {
        &source[inner_start..inner_end]
    }
}

pub fn soap_body(raw: &str) -> &str {
    sub_string(raw, BODY_OPEN, BODY_CLOSE, false)
}

pub fn fault_string(raw: &str) -> &str {
    sub_string(raw, FAULT_OPEN, FAULT_CLOSE, false)
}

pub fn error_block(body: &str) -> &str {
    sub_string(body, ERROR_OPEN, ERROR_CLOSE, false)
}

pub fn error_message(error: &str) -> &str {
    sub_string(error, MESSAGE_OPEN, MESSAGE_CLOSE, false)
}

pub fn security_token(raw: &str) -> &str {
    sub_string(raw, TOKEN_OPEN, TOKEN_CLOSE, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("no markers at all"; "both absent")]
    #[test_case("value</b> trailing"; "open absent")]
    #[test_case("<b>value without end"; "close absent")]
    #[test_case("</b> before <b> only"; "close only before open")]
    #[test_case(""; "empty source")]
    fn test_absent_markers_yield_empty(source: &str) {
        assert_eq!(sub_string(source, "<b>", "</b>", false), "");
        assert_eq!(sub_string(source, "<b>", "</b>", true), "");
    }

    #[test_case("", "", ""; "all empty")]
    #[test_case("prefix ", "value", " suffix"; "plain text")]
    #[test_case("<x>", "<inner attr=\"1\"/>", "</x>"; "nested xml")]
    #[test_case("ü", "ĝrüße", "ß"; "multibyte")]
    fn test_extracts_between_markers(a: &str, x: &str, b: &str) {
        let source = format!("{a}<b>{x}</b>{b}");
        assert_eq!(sub_string(&source, "<b>", "</b>", false), x);
        assert_eq!(
            sub_string(&source, "<b>", "</b>", true),
            format!("<b>{x}</b>")
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let source = "<b>one</b><b>two</b>";
        assert_eq!(sub_string(source, "<b>", "</b>", false), "one");
    }

    #[test]
    fn test_close_marker_after_open_is_used() {
        let source = "</b><b>inner</b>";
        assert_eq!(sub_string(source, "<b>", "</b>", false), "inner");
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let source = "<FaultString>BAD</FaultString>";
        assert_eq!(fault_string(source), "");
    }

    #[test]
    fn test_progressive_narrowing() {
        let raw = concat!(
            "<soap-env:Envelope><soap-env:Body>",
            "<QueueCountRS><stl:Error><stl:Message>NOPE</stl:Message></stl:Error></QueueCountRS>",
            "</soap-env:Body></soap-env:Envelope>"
        );
        let body = soap_body(raw);
        assert!(body.starts_with("<QueueCountRS>"));
        assert_eq!(error_message(error_block(body)), "NOPE");
    }

    // Text drawn from an alphabet that never forms a marker
    fn random_text(rng: &mut impl rand::Rng) -> String {
        const ALPHABET: &[char] = &['a', 'Z', '0', '9', ' ', '=', '"', '\n', 'é', '€'];
        let len = rng.gen_range(0..40);
        (0..len)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())])
            .collect()
    }

    #[test]
    fn test_random_fragments_round_trip() {
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let before = random_text(&mut rng);
            let inner = random_text(&mut rng);
            let after = random_text(&mut rng);
            let source = format!("{before}<m>{inner}</m>{after}");

            assert_eq!(sub_string(&source, "<m>", "</m>", false), inner);
            assert_eq!(
                sub_string(&source, "<m>", "</m>", true),
                format!("<m>{inner}</m>")
            );

            let unmarked = format!("{before}{inner}{after}");
            assert_eq!(sub_string(&unmarked, "<m>", "</m>", false), "");
        }
    }

    #[test]
    fn test_security_token() {
        let raw = format!("<wsse:Security>{TOKEN_OPEN}T123{TOKEN_CLOSE}</wsse:Security>");
        assert_eq!(security_token(&raw), "T123");
    }
}
