//! Player-name normalization and fuzzy matching for prop markets (§6).
//!
//! The odds aggregator and the exchange rarely spell a player's name
//! identically ("A.J. Green" vs "AJ Green" vs "Aj Green Jr"). Matching
//! goes: normalize both sides the same way, try a nickname map, then fall
//! back to edit distance with a length-scaled tolerance and a substring
//! check.

use std::collections::HashMap;

fn nickname_map() -> &'static HashMap<&'static str, &'static str> {
    use std::sync::OnceLock;
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert("nick", "nicholas");
        map.insert("mike", "michael");
        map.insert("alex", "alexander");
        map.insert("cam", "cameron");
        map.insert("zach", "zachary");
        map.insert("steph", "stephen");
        map
    })
}

/// Lowercases, strips periods/apostrophes, maps hyphens to spaces,
/// strips common diacritics, collapses whitespace, and expands any
/// leading nickname token found in the nickname map.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let ascii_folded: String = name
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        })
        .collect();

    let stripped: String = ascii_folded
        .to_lowercase()
        .chars()
        .filter(|c| *c != '.' && *c != '\'')
        .map(|c| if c == '-' { ' ' } else { c })
        .collect();

    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut tokens: Vec<String> = collapsed.split(' ').map(String::from).collect();
    if let Some(first) = tokens.first_mut() {
        if let Some(expanded) = nickname_map().get(first.as_str()) {
            *first = (*expanded).to_string();
        }
    }
    tokens.join(" ")
}

/// Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Matches `candidate` against `target`, both normalized first. Allows
/// edit distance up to 2 (3 for names longer than 15 characters), with a
/// substring fallback for cases like "Jr"/"Sr" suffixes that distort edit
/// distance more than they should.
#[must_use]
pub fn normalize_and_match(candidate: &str, target: &str) -> bool {
    let a = normalize_name(candidate);
    let b = normalize_name(target);

    if a == b {
        return true;
    }

    let tolerance = if a.len() > 15 || b.len() > 15 { 3 } else { 2 };
    if edit_distance(&a, &b) <= tolerance {
        return true;
    }

    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_periods_and_apostrophes() {
        assert_eq!(normalize_name("A.J. O'Brien"), "aj obrien");
    }

    #[test]
    fn hyphens_become_spaces() {
        assert_eq!(normalize_name("Jean-Pierre"), "jean pierre");
    }

    #[test]
    fn diacritics_are_folded() {
        assert_eq!(normalize_name("Luka Dončić"), "luka doncic");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_name("  Lebron   James  "), "lebron james");
    }

    #[test]
    fn nickname_expands() {
        assert_eq!(normalize_name("Mike Jones"), "michael jones");
    }

    #[test]
    fn exact_match_after_normalization() {
        assert!(normalize_and_match("LeBron James", "lebron james"));
    }

    #[test]
    fn small_typo_matches_within_edit_distance() {
        assert!(normalize_and_match("Jokic", "Jokci"));
    }

    #[test]
    fn long_name_gets_wider_tolerance() {
        assert!(normalize_and_match("Giannis Antetokounmpo", "Giannis Antetokounmpoo"));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        assert!(!normalize_and_match("LeBron James", "Kevin Durant"));
    }

    #[test]
    fn substring_fallback_catches_suffix() {
        assert!(normalize_and_match("Gary Trent", "Gary Trent Jr"));
    }
}
