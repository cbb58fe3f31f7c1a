/// Final tally shown on the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub xp: u32,
    pub passed: bool,
    pub timed_out: bool,
}

impl QuizScore {
    #[must_use]
    pub fn new(correct: usize, total: usize, xp: u32, passing_score: u32, timed_out: bool) -> Self {
        let percentage = percentage(correct, total);
        Self {
            correct,
            total,
            percentage,
            xp,
            passed: percentage >= passing_score,
            timed_out,
        }
    }
}

/// `round(100 * correct / total)`, halves rounding up. Zero when `total` is zero.
#[must_use]
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    let rounded = (200 * correct + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(percentage(2, 4), 50);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn percentage_matches_float_rounding_for_small_quizzes() {
        for total in 1..=25_usize {
            for correct in 0..=total {
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let expected = ((100.0 * correct as f64) / total as f64).round() as u32;
                assert_eq!(percentage(correct, total), expected, "{correct}/{total}");
            }
        }
    }

    #[test]
    fn empty_quiz_scores_zero() {
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn pass_is_inclusive_of_threshold() {
        assert!(QuizScore::new(7, 10, 70, 70, false).passed);
        assert!(!QuizScore::new(2, 4, 20, 70, false).passed);
    }
}
