/// Convert a free-text application name into a lowercase snake_case slug.
///
/// Words are split on hyphens, whitespace, underscores and capital-letter
/// boundaries (`NetApp` → `net_app`, `HTTPServer` → `http_server`), then
/// joined with underscores.
pub fn snake_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == '_' || c.is_whitespace() {
            flush(&mut current, &mut words);
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let starts_word = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if starts_word {
                flush(&mut current, &mut words);
            }
        }

        current.extend(c.to_lowercase());
    }
    flush(&mut current, &mut words);

    words.join("_")
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}
