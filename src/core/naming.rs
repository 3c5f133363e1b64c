//type name -> table name

/// Convert a CamelCase type name into a snake_case table name.
///
/// An underscore goes between every lower-upper and upper-upper pair, then
/// everything is lowercased. Pairs are matched left to right without overlap, so
/// the insertion runs twice to split runs of capitals (`ABC` -> `A_BC` -> `A_B_C`).
pub fn to_snake_case(identifier: &str) -> String {
    let once = split_case_pairs(identifier);
    split_case_pairs(&once).to_lowercase()
}

fn split_case_pairs(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + chars.len() / 2);

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match chars.get(i + 1) {
            Some(&next) if c.is_ascii_alphabetic() && next.is_ascii_uppercase() => {
                out.push(c);
                out.push('_');
                out.push(next);
                i += 2;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}
