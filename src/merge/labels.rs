/// Function words kept lowercase unless they open the label.
const LOWERCASE_WORDS: [&str; 16] = [
    "a", "an", "the", "and", "but", "or", "for", "nor", "on", "at", "to", "from", "by", "of", "in",
    "with",
];

fn is_separator(ch: char) -> bool {
    matches!(ch, '_' | '-' | ' ')
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

/// Normalizes a class label to title case, keeping the original separators.
///
/// Every word is capitalized except short function words ("of", "the", ...),
/// which are lowercased unless they are the first word.
///
/// ```
/// use owl_merge::merge::format_label;
///
/// assert_eq!(format_label("disease_of_the_liver"), "Disease_of_the_Liver");
/// ```
#[must_use]
pub fn format_label(label: &str) -> String {
    let mut formatted = String::with_capacity(label.len());
    let mut word = String::new();
    let mut first_word = true;

    let mut flush = |formatted: &mut String, word: &mut String| {
        if word.is_empty() {
            return;
        }
        let lower = word.to_lowercase();
        if !first_word && LOWERCASE_WORDS.contains(&lower.as_str()) {
            formatted.push_str(&lower);
        } else {
            formatted.push_str(&capitalize(word));
        }
        first_word = false;
        word.clear();
    };

    for ch in label.trim().chars() {
        if is_separator(ch) {
            flush(&mut formatted, &mut word);
            formatted.push(ch);
        } else {
            word.push(ch);
        }
    }
    flush(&mut formatted, &mut word);
    formatted
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::format_label;

    #[rstest]
    #[case("chronic_kidney_disease", "Chronic_Kidney_Disease")]
    #[case("disease_of_the_liver", "Disease_of_the_Liver")]
    #[case("the_flu", "The_Flu")]
    #[case("Infection_With_A_Virus", "Infection_with_a_Virus")]
    #[case("DNA virus", "Dna Virus")]
    #[case("post-infectious_arthritis", "Post-Infectious_Arthritis")]
    #[case("  padded_label ", "Padded_Label")]
    #[case("_of_leading", "_Of_Leading")]
    #[case("", "")]
    fn formats_labels(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(format_label(input), expected);
    }
}
