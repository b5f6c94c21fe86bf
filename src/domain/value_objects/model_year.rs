//! # Model Year Codes
//!
//! The 10th VIN character encodes the model year on a 30-year cycle, so each
//! code stands for two candidate years (for example `A` is 1980 or 2010).
//! Both candidates are kept and the choice is made at lookup time against the
//! current year.
//!
//! # Examples
//!
//! ```
//! use protection_quote::domain::value_objects::model_year::{resolve_model_year, YearCandidates};
//!
//! assert_eq!(YearCandidates::for_code('A'), Some(YearCandidates::new(1980)));
//! assert_eq!(resolve_model_year('A', 2026), Some(2010));
//! assert_eq!(resolve_model_year('3', 2026), Some(2003));
//! ```

/// Length of the model-year cycle.
pub const CYCLE_YEARS: i32 = 30;

/// Age beyond which the later candidate is preferred.
pub const DISAMBIGUATION_AGE: i32 = 20;

/// Codes in cycle order, starting at 1980.
const YEAR_CODES: [char; 30] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'R', 'S', 'T', 'V',
    'W', 'X', 'Y', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];

const FIRST_CYCLE_START: i32 = 1980;

/// First model year covered by 17-character VINs.
pub const EARLIEST_MODEL_YEAR: i32 = FIRST_CYCLE_START;

/// The two years a model-year code can stand for, 30 years apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearCandidates {
    earlier: i32,
}

impl YearCandidates {
    /// Creates candidates from the earlier year.
    #[must_use]
    pub const fn new(earlier: i32) -> Self {
        Self { earlier }
    }

    /// Looks up the candidates for a code, or `None` if the character is not
    /// a model-year code (`I`, `O`, `Q`, `U`, `Z`, `0`).
    #[must_use]
    pub fn for_code(code: char) -> Option<Self> {
        let upper = code.to_ascii_uppercase();
        YEAR_CODES
            .iter()
            .position(|c| *c == upper)
            .and_then(|offset| i32::try_from(offset).ok())
            .map(|offset| Self::new(FIRST_CYCLE_START + offset))
    }

    /// The earlier candidate.
    #[inline]
    #[must_use]
    pub const fn earlier(&self) -> i32 {
        self.earlier
    }

    /// The later candidate.
    #[inline]
    #[must_use]
    pub const fn later(&self) -> i32 {
        self.earlier + CYCLE_YEARS
    }

    /// Picks the candidate that makes sense relative to `current_year`.
    ///
    /// The earlier year wins unless it is more than 20 years old and the
    /// later year is no further out than next year's model line.
    #[must_use]
    pub const fn resolve(&self, current_year: i32) -> i32 {
        let too_old = current_year - self.earlier > DISAMBIGUATION_AGE;
        let later_is_plausible = self.later() <= current_year + 1;
        if too_old && later_is_plausible {
            self.later()
        } else {
            self.earlier
        }
    }
}

/// Whether `year` is a model year a vehicle can carry as of `current_year`:
/// no earlier than 1980 and no later than next year's model line.
#[must_use]
pub fn is_plausible_model_year(year: i32, current_year: i32) -> bool {
    (EARLIEST_MODEL_YEAR..=current_year.saturating_add(1)).contains(&year)
}

/// Whole years between `model_year` and `current_year`, clamped at zero.
#[must_use]
pub fn age_in_years(model_year: i32, current_year: i32) -> u32 {
    u32::try_from(current_year.saturating_sub(model_year)).unwrap_or(0)
}

/// Decodes a model-year code against the current year.
#[must_use]
pub fn resolve_model_year(code: char, current_year: i32) -> Option<i32> {
    YearCandidates::for_code(code).map(|candidates| candidates.resolve(current_year))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn every_code_has_two_candidates() {
        for (offset, code) in YEAR_CODES.iter().enumerate() {
            let candidates = YearCandidates::for_code(*code).unwrap();
            assert_eq!(candidates.earlier(), 1980 + offset as i32);
            assert_eq!(candidates.later(), candidates.earlier() + 30);
        }
    }

    #[test]
    fn excluded_characters_have_no_year() {
        for code in ['I', 'O', 'Q', 'U', 'Z', '0'] {
            assert_eq!(YearCandidates::for_code(code), None);
        }
    }

    #[test]
    fn lowercase_codes_are_accepted() {
        assert_eq!(resolve_model_year('a', 2026), Some(2010));
    }

    #[test]
    fn old_earlier_year_moves_to_later_cycle() {
        assert_eq!(resolve_model_year('A', 2026), Some(2010));
        assert_eq!(resolve_model_year('L', 2026), Some(2020));
        assert_eq!(resolve_model_year('T', 2026), Some(2026));
    }

    #[test]
    fn next_model_year_is_allowed() {
        assert_eq!(resolve_model_year('V', 2026), Some(2027));
    }

    #[test]
    fn future_later_year_keeps_earlier_candidate() {
        assert_eq!(resolve_model_year('3', 2026), Some(2003));
        assert_eq!(resolve_model_year('W', 2026), Some(1998));
        assert_eq!(resolve_model_year('9', 2026), Some(2009));
    }

    #[test]
    fn plausible_window_follows_current_year() {
        assert!(is_plausible_model_year(1980, 2026));
        assert!(is_plausible_model_year(2027, 2026));
        assert!(!is_plausible_model_year(2028, 2026));
        assert!(!is_plausible_model_year(1979, 2026));
        assert!(is_plausible_model_year(2031, 2030));
        assert!(!is_plausible_model_year(i32::MIN, 2026));
        assert!(!is_plausible_model_year(i32::MAX, i32::MAX));
    }

    #[test]
    fn age_saturates_instead_of_overflowing() {
        assert_eq!(age_in_years(2016, 2026), 10);
        assert_eq!(age_in_years(2027, 2026), 0);
        assert_eq!(age_in_years(i32::MIN, 2026), u32::try_from(i32::MAX).unwrap());
        assert_eq!(age_in_years(i32::MAX, i32::MIN), 0);
    }

    #[test]
    fn recent_earlier_year_is_kept() {
        assert_eq!(resolve_model_year('7', 2010), Some(2007));
        assert_eq!(resolve_model_year('A', 1995), Some(1980));
    }
}
