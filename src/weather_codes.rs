// 🌤️ Weather Code Table - Codes as Data
// JMA 3-digit forecast codes → Japanese forecast phrases

// ============================================================================
// CODE TABLE
// ============================================================================

/// JMA forecast codes, sorted ascending by code so lookups can binary search.
///
/// Families:
/// - 1xx: 晴れ (clear) and clear-then-X variants
/// - 2xx: 曇り (cloudy)
/// - 3xx: 雨 (rain)
/// - 4xx: 雪 (snow)
const WEATHER_CODES: &[(&str, &str)] = &[
    ("100", "晴れ"),
    ("101", "晴れ時々曇り"),
    ("102", "晴れ一時雨"),
    ("103", "晴れ時々雨"),
    ("104", "晴れ一時雪"),
    ("105", "晴れ時々雪"),
    ("106", "晴れ一時雨か雪"),
    ("107", "晴れ時々雨か雪"),
    ("108", "晴れ一時雨か雷雨"),
    ("110", "晴れ後時々曇り"),
    ("111", "晴れ後曇り"),
    ("112", "晴れ後一時雨"),
    ("113", "晴れ後時々雨"),
    ("114", "晴れ後雨"),
    ("115", "晴れ後一時雪"),
    ("116", "晴れ後時々雪"),
    ("117", "晴れ後雪"),
    ("118", "晴れ後雨か雪"),
    ("119", "晴れ後雨か雷雨"),
    ("120", "晴れ朝夕一時雨"),
    ("121", "晴れ朝の内一時雨"),
    ("122", "晴れ夕方一時雨"),
    ("123", "晴れ山沿い雷雨"),
    ("124", "晴れ山沿い雪"),
    ("125", "晴れ午後は雷雨"),
    ("126", "晴れ午後は雪"),
    ("130", "朝の内霧後晴れ"),
    ("131", "晴れ明け方霧"),
    ("132", "晴れ朝夕曇り"),
    ("140", "晴れ時々雨で雷を伴う"),
    ("200", "曇り"),
    ("201", "曇り時々晴れ"),
    ("202", "曇り一時雨"),
    ("203", "曇り時々雨"),
    ("204", "曇り一時雪"),
    ("205", "曇り時々雪"),
    ("206", "曇り一時雨か雪"),
    ("207", "曇り時々雨か雪"),
    ("208", "曇り一時雨か雷雨"),
    ("209", "霧"),
    ("210", "曇り後時々晴れ"),
    ("211", "曇り後晴れ"),
    ("212", "曇り後一時雨"),
    ("213", "曇り後時々雨"),
    ("214", "曇り後雨"),
    ("215", "曇り後一時雪"),
    ("216", "曇り後時々雪"),
    ("217", "曇り後雪"),
    ("218", "曇り後雨か雪"),
    ("219", "曇り後雨か雷雨"),
    ("220", "曇り朝夕一時雨"),
    ("221", "曇り朝の内一時雨"),
    ("222", "曇り夕方一時雨"),
    ("223", "曇り日中時々晴れ"),
    ("224", "曇り昼頃から雨"),
    ("225", "曇り夕方から雨"),
    ("226", "曇り夜は雨"),
    ("227", "曇り夜半から雨"),
    ("228", "曇り昼頃から雪"),
    ("229", "曇り夕方から雪"),
    ("230", "曇り夜は雪"),
    ("231", "曇り海上海岸は霧か霧雨"),
    ("300", "雨"),
    ("301", "雨時々晴れ"),
    ("302", "雨時々止む"),
    ("303", "雨時々雪"),
    ("304", "雨か雪"),
    ("306", "大雨"),
    ("308", "雨で暴風を伴う"),
    ("309", "雨一時雪"),
    ("311", "雨後晴れ"),
    ("313", "雨後曇り"),
    ("314", "雨後時々雪"),
    ("315", "雨後雪"),
    ("316", "雨か雪後晴れ"),
    ("317", "雨か雪後曇り"),
    ("320", "朝の内雨後晴れ"),
    ("321", "朝の内雨後曇り"),
    ("322", "雨朝晩一時雪"),
    ("323", "雨昼頃から晴れ"),
    ("324", "雨夕方から晴れ"),
    ("325", "雨夜は晴れ"),
    ("326", "雨夕方から雪"),
    ("327", "雨夜は雪"),
    ("328", "雨一時強く降る"),
    ("329", "雨一時みぞれ"),
    ("340", "雪か雨"),
    ("350", "雨で雷を伴う"),
    ("361", "雪か雨後晴れ"),
    ("371", "雪か雨後曇り"),
    ("400", "雪"),
    ("401", "雪時々晴れ"),
    ("402", "雪時々止む"),
    ("403", "雪時々雨"),
    ("405", "大雪"),
    ("406", "風雪強い"),
    ("407", "暴風雪"),
    ("409", "雪一時雨"),
    ("411", "雪後晴れ"),
    ("413", "雪後曇り"),
    ("414", "雪後雨"),
    ("420", "朝の内雪後晴れ"),
    ("421", "朝の内雪後曇り"),
    ("422", "雪昼頃から雨"),
    ("423", "雪夕方から雨"),
    ("425", "雪一時強く降る"),
    ("426", "雪後みぞれ"),
    ("427", "雪一時みぞれ"),
    ("450", "雪で雷を伴う"),
];

// ============================================================================
// LOOKUP
// ============================================================================

/// Look up the phrase for a known code
pub fn lookup(code: &str) -> Option<&'static str> {
    WEATHER_CODES
        .binary_search_by(|(known, _)| (*known).cmp(code))
        .ok()
        .map(|idx| WEATHER_CODES[idx].1)
}

/// Describe a weather code in natural language.
///
/// Unknown codes never fail; they come back as `unknown(<code>)`.
pub fn describe(code: &str) -> String {
    match lookup(code) {
        Some(phrase) => phrase.to_string(),
        None => format!("unknown({})", code),
    }
}

/// All known codes in ascending order
pub fn known_codes() -> impl Iterator<Item = &'static str> {
    WEATHER_CODES.iter().map(|(code, _)| *code)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        for pair in WEATHER_CODES.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} must sort before {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_every_known_code_has_a_phrase() {
        for code in known_codes() {
            let text = describe(code);
            assert!(!text.is_empty());
            assert!(!text.starts_with("unknown("), "code {} fell through", code);
        }
    }

    #[test]
    fn test_common_codes() {
        assert_eq!(describe("100"), "晴れ");
        assert_eq!(describe("200"), "曇り");
        assert_eq!(describe("308"), "雨で暴風を伴う");
        assert_eq!(describe("450"), "雪で雷を伴う");
    }

    #[test]
    fn test_unknown_code_fallback() {
        assert_eq!(describe("999"), "unknown(999)");
        assert_eq!(describe("305"), "unknown(305)");
        assert_eq!(describe(""), "unknown()");
        assert_eq!(lookup("999"), None);
    }

    #[test]
    fn test_table_size() {
        assert_eq!(known_codes().count(), 109);
    }
}
