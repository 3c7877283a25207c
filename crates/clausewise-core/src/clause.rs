//! Candidate-clause derivation from extracted document text.
//!
//! A "clause" here is a syntactic heuristic, not a legal parse: any line of
//! the document whose trimmed length exceeds [`MIN_CLAUSE_CHARS`]. Legal
//! drafting tends to put one operative sentence per line or paragraph, so
//! the length cut-off discards headings, page furniture, and signature
//! blocks while keeping the dense operative text.

/// Minimum trimmed length (in characters) for a line to count as a clause.
pub const MIN_CLAUSE_CHARS: usize = 50;

/// How many clauses are rendered in the breakdown section.
pub const CLAUSE_DISPLAY_LIMIT: usize = 5;

/// How many clauses are sent through the simplifier.
pub const SIMPLIFY_LIMIT: usize = 3;

/// Split extracted text into candidate clauses.
///
/// Splits on line breaks, trims each line, and keeps lines longer than
/// [`MIN_CLAUSE_CHARS`] characters, preserving source order. Clauses borrow
/// from the input; they are recomputed on every submission rather than
/// cached.
pub fn split_clauses(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_CLAUSE_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_A: &str =
        "This clause limits liability to direct damages only, excluding indirect losses.";
    const LONG_B: &str =
        "The receiving party shall keep all disclosed information strictly confidential.";

    #[test]
    fn keeps_only_lines_over_threshold() {
        let text = format!("{LONG_A}\nShort line.\n{LONG_B}");
        let clauses = split_clauses(&text);
        assert_eq!(clauses, vec![LONG_A, LONG_B]);
    }

    #[test]
    fn every_clause_exceeds_minimum_length() {
        let text = format!("heading\n{LONG_A}\n   {LONG_B}   \nsigned\n");
        for clause in split_clauses(&text) {
            assert!(
                clause.chars().count() > MIN_CLAUSE_CHARS,
                "clause too short: {clause:?}"
            );
        }
    }

    #[test]
    fn preserves_source_order() {
        let text = format!("{LONG_B}\nshort\n{LONG_A}");
        assert_eq!(split_clauses(&text), vec![LONG_B, LONG_A]);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let text = format!("   {LONG_A}\t");
        assert_eq!(split_clauses(&text), vec![LONG_A]);
    }

    #[test]
    fn splitting_is_idempotent() {
        let text = format!("{LONG_A}\nshort\n{LONG_B}\n\n{LONG_A}");
        let first = split_clauses(&text);
        let rejoined = first.join("\n");
        assert_eq!(split_clauses(&rejoined), first);
    }

    #[test]
    fn empty_and_short_inputs_yield_nothing() {
        assert!(split_clauses("").is_empty());
        assert!(split_clauses("short\nlines\nonly").is_empty());
    }

    #[test]
    fn boundary_length_is_exclusive() {
        let exactly_50: String = "x".repeat(MIN_CLAUSE_CHARS);
        let fifty_one: String = "x".repeat(MIN_CLAUSE_CHARS + 1);
        assert!(split_clauses(&exactly_50).is_empty());
        assert_eq!(split_clauses(&fifty_one), vec![fifty_one.as_str()]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 50 two-byte characters: 100 bytes but only 50 chars — excluded.
        let fifty_wide: String = "é".repeat(MIN_CLAUSE_CHARS);
        assert!(split_clauses(&fifty_wide).is_empty());
    }
}
