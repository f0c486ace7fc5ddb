/// Clean a raw deck title as it appears in the listing.
///
/// Strips parenthetical annotations (together with the whitespace run
/// preceding them), literal ellipsis markers left by truncated rendering,
/// and surrounding whitespace. Idempotent: cleaning a cleaned name is a
/// no-op.
pub fn clean_deck_name(raw: &str) -> String {
    let mut kept = String::with_capacity(raw.len());
    let mut in_paren = false;
    for ch in raw.chars() {
        match ch {
            '(' if !in_paren => {
                while kept.ends_with(char::is_whitespace) {
                    kept.pop();
                }
                in_paren = true;
            }
            ')' if in_paren => in_paren = false,
            _ if in_paren => {}
            _ => kept.push(ch),
        }
    }

    kept.replace("...", "").replace('\u{2026}', "").trim().to_string()
}
