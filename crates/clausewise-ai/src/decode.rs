//! Pure decoding logic shared by the ONNX pipelines.
//!
//! Everything here operates on plain slices of logits and token metadata,
//! independent of any runtime, so the span selection and grouping rules can
//! be unit-tested without model files.

/// Numerically stable softmax.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    if logits.is_empty() {
        return Vec::new();
    }
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Index of the largest value, if any.
pub fn argmax(xs: &[f32]) -> Option<usize> {
    xs.iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// A selected answer span in token indices (inclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub score: f32,
}

/// Pick the best extractive-QA answer span.
///
/// Start and end probabilities are softmaxed over the `allowed` positions
/// only (context tokens); the span score is `p(start) * p(end)`, maximised
/// over `end >= start` with span length capped at `max_answer_tokens`.
/// Returns `None` when no position is allowed.
pub fn best_span(
    start_logits: &[f32],
    end_logits: &[f32],
    allowed: &[bool],
    max_answer_tokens: usize,
) -> Option<TokenSpan> {
    let n = start_logits.len().min(end_logits.len()).min(allowed.len());
    if n == 0 || !allowed[..n].iter().any(|&a| a) {
        return None;
    }

    let mask = |logits: &[f32]| -> Vec<f32> {
        logits[..n]
            .iter()
            .zip(&allowed[..n])
            .map(|(&l, &a)| if a { l } else { f32::NEG_INFINITY })
            .collect()
    };

    let p_start = softmax(&mask(start_logits));
    let p_end = softmax(&mask(end_logits));

    let mut best: Option<TokenSpan> = None;
    for start in 0..n {
        if !allowed[start] {
            continue;
        }
        let last = (start + max_answer_tokens).min(n);
        for end in start..last {
            if !allowed[end] {
                continue;
            }
            let score = p_start[start] * p_end[end];
            if best.is_none_or(|b| score > b.score) {
                best = Some(TokenSpan { start, end, score });
            }
        }
    }
    best
}

/// One classified token, pre-grouping.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedToken<'a> {
    /// Raw model tag: `O`, `B-PER`, `I-ORG`, ...
    pub tag: &'a str,
    pub score: f32,
    /// Byte offsets into the source text.
    pub start: usize,
    pub end: usize,
}

/// A merged entity span with byte offsets into the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSpan {
    pub group: String,
    pub score: f32,
    pub start: usize,
    pub end: usize,
}

/// Merge adjacent tokens that share an entity type into one span.
///
/// `O` tokens break groups; a `B-` tag always starts a new group; an `I-`
/// tag (or a bare type tag) continues the current group when the type
/// matches. The span score is the mean of its token scores.
pub fn group_entities(tokens: &[TaggedToken]) -> Vec<GroupedSpan> {
    struct Acc {
        group: String,
        score_sum: f32,
        count: usize,
        start: usize,
        end: usize,
    }

    let mut out = Vec::new();
    let mut acc: Option<Acc> = None;

    let flush = |acc: &mut Option<Acc>, out: &mut Vec<GroupedSpan>| {
        if let Some(a) = acc.take() {
            out.push(GroupedSpan {
                group: a.group,
                score: a.score_sum / a.count as f32,
                start: a.start,
                end: a.end,
            });
        }
    };

    for token in tokens {
        let (begins, group) = match token.tag.split_once('-') {
            Some(("B", ty)) => (true, ty),
            Some(("I", ty)) => (false, ty),
            _ if token.tag == "O" || token.tag.is_empty() => {
                flush(&mut acc, &mut out);
                continue;
            }
            _ => (false, token.tag),
        };

        let continues = !begins && acc.as_ref().is_some_and(|a| a.group == group);
        if continues {
            let a = acc.as_mut().unwrap();
            a.score_sum += token.score;
            a.count += 1;
            a.end = token.end;
        } else {
            flush(&mut acc, &mut out);
            acc = Some(Acc {
                group: group.to_string(),
                score_sum: token.score,
                count: 1,
                start: token.start,
                end: token.end,
            });
        }
    }
    flush(&mut acc, &mut out);
    out
}

/// Per-label entailment probability for zero-shot classification.
///
/// Softmax over the (contradiction, entailment) logits only, discarding the
/// neutral class — each label is scored independently, so scores across
/// labels are not renormalised.
pub fn entailment_score(logits: &[f32], contradiction_idx: usize, entailment_idx: usize) -> f32 {
    match (logits.get(contradiction_idx), logits.get(entailment_idx)) {
        (Some(&c), Some(&e)) => {
            let p = softmax(&[c, e]);
            p[1]
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── softmax / argmax ──

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0, 3.0]);
        let b = softmax(&[1001.0, 1002.0, 1003.0]);
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-6);
        }
    }

    #[test]
    fn softmax_empty() {
        assert!(softmax(&[]).is_empty());
    }

    #[test]
    fn argmax_picks_largest() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    // ── best_span ──

    #[test]
    fn span_picks_peak_start_and_end() {
        // Position 2 dominates start, position 4 dominates end.
        let start = [0.0, 0.0, 10.0, 0.0, 0.0, 0.0];
        let end = [0.0, 0.0, 0.0, 0.0, 10.0, 0.0];
        let allowed = [true; 6];
        let span = best_span(&start, &end, &allowed, 30).unwrap();
        assert_eq!((span.start, span.end), (2, 4));
        assert!(span.score > 0.9);
    }

    #[test]
    fn span_never_starts_after_end() {
        // End peak before start peak: the best legal span degenerates.
        let start = [0.0, 0.0, 0.0, 0.0, 10.0];
        let end = [0.0, 10.0, 0.0, 0.0, 0.0];
        let allowed = [true; 5];
        let span = best_span(&start, &end, &allowed, 30).unwrap();
        assert!(span.start <= span.end);
    }

    #[test]
    fn span_respects_allowed_mask() {
        let start = [10.0, 0.0, 1.0, 0.0];
        let end = [10.0, 0.0, 0.0, 1.0];
        // Question tokens (positions 0-1) are masked out.
        let allowed = [false, false, true, true];
        let span = best_span(&start, &end, &allowed, 30).unwrap();
        assert_eq!((span.start, span.end), (2, 3));
    }

    #[test]
    fn span_respects_length_cap() {
        let start = [10.0, 0.0, 0.0, 0.0, 0.0];
        let end = [0.0, 0.0, 0.0, 0.0, 10.0];
        let allowed = [true; 5];
        let span = best_span(&start, &end, &allowed, 2).unwrap();
        // A 5-token span is out of reach with a 2-token cap.
        assert!(span.end - span.start < 2);
    }

    #[test]
    fn span_none_when_nothing_allowed() {
        assert_eq!(best_span(&[1.0], &[1.0], &[false], 30), None);
        assert_eq!(best_span(&[], &[], &[], 30), None);
    }

    // ── group_entities ──

    fn tok(tag: &str, score: f32, start: usize, end: usize) -> TaggedToken<'_> {
        TaggedToken {
            tag,
            score,
            start,
            end,
        }
    }

    #[test]
    fn adjacent_same_type_merges() {
        let tokens = [
            tok("B-PER", 0.9, 0, 4),
            tok("I-PER", 0.7, 5, 10),
            tok("O", 0.99, 11, 13),
            tok("B-ORG", 0.8, 14, 20),
        ];
        let spans = group_entities(&tokens);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].group, "PER");
        assert_eq!((spans[0].start, spans[0].end), (0, 10));
        assert!((spans[0].score - 0.8).abs() < 1e-6);
        assert_eq!(spans[1].group, "ORG");
    }

    #[test]
    fn begin_tag_splits_consecutive_entities() {
        // Two people back to back: B-PER I-PER B-PER.
        let tokens = [
            tok("B-PER", 0.9, 0, 4),
            tok("I-PER", 0.9, 5, 9),
            tok("B-PER", 0.9, 10, 14),
        ];
        let spans = group_entities(&tokens);
        assert_eq!(spans.len(), 2);
        assert_eq!((spans[0].start, spans[0].end), (0, 9));
        assert_eq!((spans[1].start, spans[1].end), (10, 14));
    }

    #[test]
    fn type_change_splits_without_begin_tag() {
        let tokens = [tok("I-PER", 0.9, 0, 4), tok("I-ORG", 0.9, 5, 9)];
        let spans = group_entities(&tokens);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].group, "PER");
        assert_eq!(spans[1].group, "ORG");
    }

    #[test]
    fn outside_tokens_produce_nothing() {
        let tokens = [tok("O", 0.99, 0, 4), tok("O", 0.99, 5, 9)];
        assert!(group_entities(&tokens).is_empty());
    }

    #[test]
    fn source_order_is_preserved() {
        let tokens = [
            tok("B-LOC", 0.9, 0, 6),
            tok("O", 0.9, 7, 8),
            tok("B-PER", 0.9, 9, 14),
            tok("O", 0.9, 15, 16),
            tok("B-ORG", 0.9, 17, 25),
        ];
        let grouped = group_entities(&tokens);
        let groups: Vec<&str> = grouped
            .iter()
            .map(|s| s.group.as_str())
            .collect::<Vec<_>>();
        assert_eq!(groups, vec!["LOC", "PER", "ORG"]);
    }

    // ── entailment_score ──

    #[test]
    fn entailment_dominates_when_logit_higher() {
        // logits: [contradiction, neutral, entailment]
        let score = entailment_score(&[-2.0, 0.0, 3.0], 0, 2);
        assert!(score > 0.9);
    }

    #[test]
    fn contradiction_dominates_when_logit_higher() {
        let score = entailment_score(&[3.0, 0.0, -2.0], 0, 2);
        assert!(score < 0.1);
    }

    #[test]
    fn neutral_logit_is_ignored() {
        let a = entailment_score(&[1.0, -50.0, 2.0], 0, 2);
        let b = entailment_score(&[1.0, 50.0, 2.0], 0, 2);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_indices_score_zero() {
        assert_eq!(entailment_score(&[1.0], 0, 2), 0.0);
    }
}
