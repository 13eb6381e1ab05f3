//! Top-level argument splitting for function calls.

/// Split a function argument list on commas that are neither nested in
/// parentheses nor inside a quoted string. Pieces are returned untrimmed
/// with their quotes intact. A blank list yields no arguments.
pub fn split_arguments(source: &str) -> Vec<String> {
    if source.trim().is_empty() {
        return Vec::new();
    }

    let mut tokens = Vec::new();
    let mut current = String::with_capacity(source.len());
    let mut depth: usize = 0;
    let mut in_single = false;
    let mut in_double = false;

    for c in source.chars() {
        match c {
            '\'' if !in_double => in_single = !in_single,
            '"' if !in_single => in_double = !in_double,
            '(' if !in_single && !in_double => depth += 1,
            ')' if !in_single && !in_double => depth = depth.saturating_sub(1),
            ',' if depth == 0 && !in_single && !in_double => {
                tokens.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    tokens.push(current);
    tokens
}
