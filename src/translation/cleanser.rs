/*!
 * Removal of provider-injected commentary from translations.
 *
 * Models sometimes append remarks such as `(Note: the source was in Dutch.)`
 * either inline or on their own line. Those spans are stripped before the
 * translation is measured or emitted.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static PROVIDER_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?\(Note: .*?\.\)").expect("note pattern must compile"));

/// Remove every `(Note: ... .)` span, with its leading newline if any.
///
/// Removal is repeated until nothing matches so that spans joined by an
/// earlier removal are stripped too, which makes the function idempotent.
pub fn cleanse(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = PROVIDER_NOTE.replace_all(&current, "");
        if next.len() == current.len() {
            return current;
        }
        current = next.into_owned();
    }
}

/// Whether `text` still contains provider commentary
pub fn has_provider_note(text: &str) -> bool {
    PROVIDER_NOTE.is_match(text)
}
