use thiserror::Error;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const MAX_SLUG_LENGTH: usize = 100;
pub const MAX_SLUG_ATTEMPTS: u32 = 500;

/// Used when a title yields no usable characters at all.
const FALLBACK_SLUG: &str = "article";

/// Answers "is this slug already taken?", optionally ignoring one article's
/// own row so an article can keep (or regenerate) its own slug on update.
pub trait SlugStore {
    fn slug_exists(&self, candidate: &str, exclude_id: Option<i64>) -> anyhow::Result<bool>;
}

#[derive(Debug, Error)]
pub enum SlugError {
    #[error("could not allocate a unique slug for \"{base}\" after {attempts} attempts")]
    Exhausted { base: String, attempts: u32 },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Converts a free-text title into a URL-safe slug: lowercase, diacritics
/// stripped via canonical decomposition, everything outside `[a-z0-9]`
/// dropped, separator runs collapsed to single hyphens, capped at
/// [`MAX_SLUG_LENGTH`]. A title with nothing usable becomes `"article"`.
pub fn normalize(title: &str) -> String {
    if title.trim().is_empty() {
        return FALLBACK_SLUG.to_string();
    }

    let lowered = title.to_lowercase();
    let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut slug = String::with_capacity(stripped.len());
    let mut prev_separator = false;
    for ch in stripped.chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            slug.push(ch);
            prev_separator = false;
        } else if (ch.is_whitespace() || ch == '-') && !prev_separator && !slug.is_empty() {
            slug.push('-');
            prev_separator = true;
        }
    }

    // Only ASCII [a-z0-9-] remains, so byte indexing is safe here.
    let mut slug = slug.trim_end_matches('-').to_string();
    if slug.len() > MAX_SLUG_LENGTH {
        slug.truncate(MAX_SLUG_LENGTH);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Resolves a unique slug for `title` by probing `base`, `base-1`, `base-2`,
/// ... and returning the first candidate the store does not know. The probe
/// is advisory only; the articles table's UNIQUE constraint is what actually
/// holds the invariant under concurrent writers.
///
/// Store failures propagate; after [`MAX_SLUG_ATTEMPTS`] probes the loop
/// gives up with [`SlugError::Exhausted`] rather than spinning forever.
pub fn generate_unique<S>(
    store: &S,
    title: &str,
    exclude_id: Option<i64>,
) -> Result<String, SlugError>
where
    S: SlugStore + ?Sized,
{
    let base = normalize(title);
    let mut candidate = base.clone();

    for counter in 1..=MAX_SLUG_ATTEMPTS {
        if !store.slug_exists(&candidate, exclude_id)? {
            return Ok(candidate);
        }
        candidate = format!("{base}-{counter}");
    }

    Err(SlugError::Exhausted {
        base,
        attempts: MAX_SLUG_ATTEMPTS,
    })
}
