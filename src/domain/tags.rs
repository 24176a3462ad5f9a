use std::collections::HashSet;

/// Builds the existing-tag suggestion list for a tag input field.
///
/// Walks every tag list in first-seen order, keeps each tag string at most
/// once (case-sensitive), and drops tags already attached to the entity
/// being edited.
pub fn suggestions<'a, I>(pools: I, exclude: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for pool in pools {
        for tag in pool {
            if exclude.iter().any(|t| t == tag) {
                continue;
            }
            if seen.insert(tag.as_str()) {
                out.push(tag.clone());
            }
        }
    }
    out
}
