//! "Did you mean" suggestions for unresolved command names.
//!
//! A candidate matches when one string strictly contains the other: a longer
//! candidate containing the input, or a longer input containing the candidate.
//! Equal-length strings never match, so transposition typos such as `buidl`
//! for `build` produce no suggestion. Results keep encounter order, are not
//! ranked, and are not de-duplicated between the name and alias passes.

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Scans `names` then `aliases` and returns up to [`MAX_SUGGESTIONS`] matches.
pub fn find_similar<'a, N, A>(input: &str, names: N, aliases: A) -> Vec<String>
where
    N: IntoIterator<Item = &'a str>,
    A: IntoIterator<Item = &'a str>,
{
    let mut found = Vec::new();

    for name in names {
        if is_similar(input, name) {
            found.push(name.to_string());
        }
        if found.len() == MAX_SUGGESTIONS {
            return found;
        }
    }

    for alias in aliases {
        if found.len() >= MAX_SUGGESTIONS {
            break;
        }
        if is_similar(input, alias) {
            found.push(alias.to_string());
        }
    }

    found
}

/// Strict substring containment in either direction.
pub fn is_similar(input: &str, candidate: &str) -> bool {
    let (input_len, cand_len) = (input.len(), candidate.len());
    (cand_len > input_len && candidate.contains(input))
        || (input_len > cand_len && input.contains(candidate))
}
