use rust_decimal::Decimal;
use std::str::FromStr;

/// Width of the score prefix in the rating widget text ("4.7" followed by the count)
const SCORE_WIDTH: usize = 3;

/// A product's rating as shown on its detail page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rating {
    /// Average score, 0 to 5
    pub score: Option<Decimal>,
    /// Number of ratings behind the score
    pub count: Option<u32>,
}

/// Splits the rating text into score prefix and count remainder
fn split_rating(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    let boundary = text
        .char_indices()
        .nth(SCORE_WIDTH)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    if boundary == 0 {
        return None;
    }

    Some(text.split_at(boundary))
}

/// Parses the score prefix; anything unparseable or outside 0..=5 is absent
pub fn parse_rating_score(text: &str) -> Option<Decimal> {
    let (score, _) = split_rating(text)?;
    Decimal::from_str(score.trim())
        .ok()
        .filter(|score| *score >= Decimal::ZERO && *score <= Decimal::from(5))
}

/// Parses the count remainder; anything unparseable is absent
pub fn parse_rating_count(text: &str) -> Option<u32> {
    let (_, count) = split_rating(text)?;
    count.trim().parse().ok()
}

/// Parses a combined score+count string such as "4.61234"
///
/// The widget renders the score and count back to back, so the first three
/// characters are the score and the remainder is the count. Either half that does
/// not parse is left absent rather than reported.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use shelf_scout::extract::parse_rating;
///
/// let rating = parse_rating("4.61234");
/// assert_eq!(rating.score, Some(Decimal::new(46, 1)));
/// assert_eq!(rating.count, Some(1234));
/// ```
pub fn parse_rating(text: &str) -> Rating {
    Rating {
        score: parse_rating_score(text),
        count: parse_rating_count(text),
    }
}
