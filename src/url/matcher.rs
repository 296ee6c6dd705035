/// Checks if a host matches a glob pattern
///
/// `*` matches any run of characters (including none) and `?` matches exactly one.
/// Matching is case-insensitive, so `*noon.*` covers `www.noon.com`, `NOON.ae` and
/// `noon.com` alike.
///
/// # Examples
///
/// ```
/// use shelf_scout::url::matches_glob;
///
/// assert!(matches_glob("*noon.*", "www.noon.com"));
/// assert!(matches_glob("*noon.*", "noon.com"));
/// assert!(!matches_glob("*noon.*", "amazon.ae"));
/// ```
pub fn matches_glob(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.to_lowercase().chars().collect();
    let candidate: Vec<char> = candidate.to_lowercase().chars().collect();

    let (mut p, mut c) = (0, 0);
    // Position of the last `*` seen and the candidate index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while c < candidate.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == candidate[c]) {
            p += 1;
            c += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, c));
            p += 1;
        } else if let Some((star, tried)) = backtrack {
            // Let the star swallow one more character
            p = star + 1;
            c = tried + 1;
            backtrack = Some((star, tried + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}
