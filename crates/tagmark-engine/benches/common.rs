// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("Line {i} with some words to format"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[allow(dead_code)]
pub fn generate_markup(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 4 {
            0 => format!("<h2>Heading {i}</h2>"),
            1 => format!("Plain <strong>bold {i}</strong> and <em>italic</em>"),
            2 => format!("<u>under</u> <s>struck {i}</s>"),
            _ => format!("<annotation>note</annotation> tail {i}"),
        })
        .collect::<Vec<_>>()
        .join("<br />")
}
