//! crates/trivia_core/src/text.rs
//!
//! HTML entity decoding for trivia text. The trivia API encodes quotes,
//! ampersands and accented letters as entities.

/// Decodes named (`&quot;`, `&egrave;`) and numeric (`&#039;`, `&#x27;`)
/// entities against the full HTML entity table.
pub fn decode_html_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(decode_html_entities("What is 2 + 2?"), "What is 2 + 2?");
        assert_eq!(decode_html_entities("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
    }

    #[test]
    fn decodes_common_api_entities() {
        assert_eq!(
            decode_html_entities("Who wrote &quot;Hamlet&quot;? It&#039;s easy &amp; quick"),
            "Who wrote \"Hamlet\"? It's easy & quick"
        );
        assert_eq!(decode_html_entities("Pok&eacute;mon"), "Pokémon");
        assert_eq!(decode_html_entities("&#x27;hex&#x27;"), "'hex'");
    }

    #[test]
    fn decodes_accented_letters_outside_the_basic_set() {
        let cases = [
            ("Cr&egrave;me br&ucirc;l&eacute;e", "Crème brûlée"),
            ("H&ocirc;tel", "Hôtel"),
            ("Na&iuml;ve", "Naïve"),
            ("&Agrave; la carte", "À la carte"),
            ("S&atilde;o Paulo", "São Paulo"),
            ("&lrm;Isra&euml;l", "\u{200e}Israël"),
        ];
        for (raw, decoded) in cases {
            assert_eq!(decode_html_entities(raw), decoded, "decoding {raw}");
        }
    }
}
