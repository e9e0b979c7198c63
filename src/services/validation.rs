use crate::models::{ArticleStatus, ArticleSubmission, Image, LanguageCode, User};
use anyhow::Result;
use serde::Serialize;

pub const MAX_SEO_TITLE_LENGTH: usize = 70;
pub const MAX_SEO_DESCRIPTION_LENGTH: usize = 160;

pub trait UserLookup {
    fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;
}

pub trait ImageLookup {
    fn find_image_by_id(&self, id: i64) -> Result<Option<Image>>;
}

/// Validation failures are data, not errors: the caller renders the whole
/// list back to the editor in one round trip.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationOutcome {
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a submission against every publish rule, collecting all violations
/// instead of stopping at the first. Only lookup failures (store unreachable)
/// surface as `Err`.
pub fn validate<U, I>(
    submission: &ArticleSubmission,
    users: &U,
    images: &I,
) -> Result<ValidationOutcome>
where
    U: UserLookup + ?Sized,
    I: ImageLookup + ?Sized,
{
    let mut errors = Vec::new();

    if submission.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }

    let language = submission.language_code.trim();
    if language.is_empty() {
        errors.push("Language code is required".to_string());
    } else if language.parse::<LanguageCode>().is_err() {
        errors.push("Language code must be 'en' or 'np'".to_string());
    }

    let status = submission.status.trim();
    if status.is_empty() {
        errors.push("Status is required".to_string());
    } else if status.parse::<ArticleStatus>().is_err() {
        errors.push("Status must be 'draft' or 'published'".to_string());
    }

    if submission.author_id <= 0 {
        errors.push("Author ID is required".to_string());
    } else if users.find_user_by_id(submission.author_id)?.is_none() {
        errors.push("Author not found".to_string());
    }

    if let Some(reporter_id) = submission.reporter_id {
        if reporter_id > 0 && users.find_user_by_id(reporter_id)?.is_none() {
            errors.push("Reporter not found".to_string());
        }
    }

    if let Some(image_id) = submission.cover_image_id {
        if image_id > 0 && images.find_image_by_id(image_id)?.is_none() {
            errors.push("Cover image not found".to_string());
        }
    }

    if let Some(seo_title) = &submission.seo_title {
        if !seo_title.trim().is_empty() && seo_title.chars().count() > MAX_SEO_TITLE_LENGTH {
            errors.push(format!(
                "SEO title must be {MAX_SEO_TITLE_LENGTH} characters or less"
            ));
        }
    }

    if let Some(seo_description) = &submission.seo_description {
        if !seo_description.trim().is_empty()
            && seo_description.chars().count() > MAX_SEO_DESCRIPTION_LENGTH
        {
            errors.push(format!(
                "SEO description must be {MAX_SEO_DESCRIPTION_LENGTH} characters or less"
            ));
        }
    }

    Ok(ValidationOutcome { errors })
}
