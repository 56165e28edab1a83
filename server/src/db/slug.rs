use anyhow::Result;

/// Converts a display name into a URL-friendly slug: lowercase, with
/// alphanumeric runs joined by single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Generates a slug for `name` that is unique within its owning scope.
///
/// The base slug is tried first; on conflict `-2`, `-3`, ... suffixes are
/// appended until `exists` reports no conflict.
pub fn generate_unique_slug<F>(name: &str, mut exists: F) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    let base = slugify(name);

    if !exists(&base)? {
        return Ok(base);
    }

    let mut suffix = 2u64;
    loop {
        let candidate = format!("{base}-{suffix}");
        if !exists(&candidate)? {
            return Ok(candidate);
        }
        suffix += 1;
    }
}
