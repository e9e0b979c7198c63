#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::services::slug::{normalize, MAX_SLUG_LENGTH};

        #[test]
        fn test_normalize_basic() {
            assert_eq!(normalize("Hello World"), "hello-world");
        }

        #[test]
        fn test_normalize_special_characters() {
            assert_eq!(normalize("Héllo World!!"), "hello-world");
        }

        #[test]
        fn test_normalize_diacritics() {
            assert_eq!(normalize("Café au lait"), "cafe-au-lait");
        }

        #[test]
        fn test_normalize_numbers() {
            assert_eq!(normalize("Article 123"), "article-123");
        }

        #[test]
        fn test_normalize_multiple_spaces() {
            assert_eq!(normalize("Hello   World"), "hello-world");
        }

        #[test]
        fn test_normalize_leading_trailing_spaces() {
            assert_eq!(normalize("  Hello World  "), "hello-world");
        }

        #[test]
        fn test_normalize_hyphen_runs() {
            assert_eq!(normalize("one -- two --- three"), "one-two-three");
        }

        #[test]
        fn test_normalize_empty_falls_back() {
            assert_eq!(normalize(""), "article");
            assert_eq!(normalize("   "), "article");
            assert_eq!(normalize("!!!"), "article");
        }

        #[test]
        fn test_normalize_idempotent() {
            for title in ["Héllo World!!", "Breaking News: Election Results!", "!!!", "a-b-c"] {
                let once = normalize(title);
                assert_eq!(normalize(&once), once);
            }
        }

        #[test]
        fn test_normalize_output_alphabet() {
            let slug = normalize("Ünïcode & Emoji 🎉 — with, punctuation?!");
            assert!(!slug.is_empty());
            assert!(!slug.starts_with('-'));
            assert!(!slug.ends_with('-'));
            assert!(!slug.contains("--"));
            assert!(slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        }

        #[test]
        fn test_normalize_truncates_long_titles() {
            let long = "word ".repeat(50);
            let slug = normalize(&long);
            assert!(slug.len() <= MAX_SLUG_LENGTH);
            assert!(!slug.ends_with('-'));
        }

        #[test]
        fn test_normalize_truncation_trims_cut_hyphen() {
            // 99 chars of 'a', then a separator right at the cut point
            let title = format!("{} {}", "a".repeat(99), "b".repeat(20));
            let slug = normalize(&title);
            assert_eq!(slug, "a".repeat(99));
        }
    }

    mod generate_unique_tests {
        use crate::services::slug::{generate_unique, SlugError, SlugStore, MAX_SLUG_ATTEMPTS};
        use anyhow::Result;

        struct FixedSlugs {
            taken: Vec<(String, i64)>,
        }

        impl SlugStore for FixedSlugs {
            fn slug_exists(&self, candidate: &str, exclude_id: Option<i64>) -> Result<bool> {
                Ok(self
                    .taken
                    .iter()
                    .any(|(slug, id)| slug == candidate && exclude_id != Some(*id)))
            }
        }

        struct EverythingTaken;

        impl SlugStore for EverythingTaken {
            fn slug_exists(&self, _candidate: &str, _exclude_id: Option<i64>) -> Result<bool> {
                Ok(true)
            }
        }

        struct BrokenStore;

        impl SlugStore for BrokenStore {
            fn slug_exists(&self, _candidate: &str, _exclude_id: Option<i64>) -> Result<bool> {
                anyhow::bail!("connection refused")
            }
        }

        #[test]
        fn test_free_base_is_returned() {
            let store = FixedSlugs { taken: vec![] };
            assert_eq!(
                generate_unique(&store, "Hello World", None).unwrap(),
                "hello-world"
            );
        }

        #[test]
        fn test_collision_appends_counter() {
            let store = FixedSlugs {
                taken: vec![("hello-world".to_string(), 1)],
            };
            assert_eq!(
                generate_unique(&store, "Hello World", None).unwrap(),
                "hello-world-1"
            );
        }

        #[test]
        fn test_counter_takes_first_gap() {
            let store = FixedSlugs {
                taken: vec![
                    ("hello-world".to_string(), 1),
                    ("hello-world-1".to_string(), 2),
                ],
            };
            assert_eq!(
                generate_unique(&store, "Hello World", None).unwrap(),
                "hello-world-2"
            );
        }

        #[test]
        fn test_exclude_id_ignores_own_slug() {
            let store = FixedSlugs {
                taken: vec![("hello-world".to_string(), 5)],
            };
            assert_eq!(
                generate_unique(&store, "Hello World", Some(5)).unwrap(),
                "hello-world"
            );
        }

        #[test]
        fn test_exclude_id_still_sees_other_rows() {
            let store = FixedSlugs {
                taken: vec![("hello-world".to_string(), 7)],
            };
            assert_eq!(
                generate_unique(&store, "Hello World", Some(5)).unwrap(),
                "hello-world-1"
            );
        }

        #[test]
        fn test_gives_up_after_attempt_cap() {
            let err = generate_unique(&EverythingTaken, "Hello World", None).unwrap_err();
            match err {
                SlugError::Exhausted { base, attempts } => {
                    assert_eq!(base, "hello-world");
                    assert_eq!(attempts, MAX_SLUG_ATTEMPTS);
                }
                other => panic!("expected Exhausted, got {other:?}"),
            }
        }

        #[test]
        fn test_store_failure_propagates() {
            let err = generate_unique(&BrokenStore, "Hello World", None).unwrap_err();
            assert!(matches!(err, SlugError::Store(_)));
        }
    }

    mod validation_tests {
        use crate::models::{ArticleSubmission, Image, User, UserRole};
        use crate::services::validation::{validate, ImageLookup, UserLookup};
        use anyhow::Result;

        struct Directory {
            user_ids: Vec<i64>,
            image_ids: Vec<i64>,
        }

        impl UserLookup for Directory {
            fn find_user_by_id(&self, id: i64) -> Result<Option<User>> {
                Ok(self.user_ids.contains(&id).then(|| User {
                    id,
                    username: format!("user{id}"),
                    email: format!("user{id}@example.com"),
                    role: UserRole::Reporter,
                    created_at: String::new(),
                }))
            }
        }

        impl ImageLookup for Directory {
            fn find_image_by_id(&self, id: i64) -> Result<Option<Image>> {
                Ok(self.image_ids.contains(&id).then(|| Image {
                    id,
                    filename: format!("{id}.jpg"),
                    original_name: format!("{id}.jpg"),
                    mime_type: "image/jpeg".to_string(),
                    size_bytes: 0,
                    alt_text: String::new(),
                    uploaded_by: None,
                    created_at: String::new(),
                }))
            }
        }

        fn directory() -> Directory {
            Directory {
                user_ids: vec![1, 2],
                image_ids: vec![10],
            }
        }

        fn minimal_submission() -> ArticleSubmission {
            ArticleSubmission {
                title: "Hello".to_string(),
                language_code: "en".to_string(),
                status: "draft".to_string(),
                author_id: 1,
                ..Default::default()
            }
        }

        #[test]
        fn test_minimal_valid_submission() {
            let dir = directory();
            let outcome = validate(&minimal_submission(), &dir, &dir).unwrap();
            assert!(outcome.is_valid());
            assert!(outcome.errors.is_empty());
        }

        #[test]
        fn test_collects_all_errors_without_short_circuiting() {
            let dir = directory();
            let submission = ArticleSubmission {
                title: String::new(),
                language_code: "fr".to_string(),
                status: "draft".to_string(),
                author_id: 0,
                ..Default::default()
            };
            let outcome = validate(&submission, &dir, &dir).unwrap();
            assert!(!outcome.is_valid());
            assert_eq!(
                outcome.errors,
                vec![
                    "Title is required",
                    "Language code must be 'en' or 'np'",
                    "Author ID is required",
                ]
            );
        }

        #[test]
        fn test_missing_language_and_status() {
            let dir = directory();
            let submission = ArticleSubmission {
                title: "Hello".to_string(),
                author_id: 1,
                ..Default::default()
            };
            let outcome = validate(&submission, &dir, &dir).unwrap();
            assert_eq!(
                outcome.errors,
                vec!["Language code is required", "Status is required"]
            );
        }

        #[test]
        fn test_invalid_status_value() {
            let dir = directory();
            let submission = ArticleSubmission {
                status: "archived".to_string(),
                ..minimal_submission()
            };
            let outcome = validate(&submission, &dir, &dir).unwrap();
            assert_eq!(
                outcome.errors,
                vec!["Status must be 'draft' or 'published'"]
            );
        }

        #[test]
        fn test_unknown_author_is_reported() {
            let dir = directory();
            let submission = ArticleSubmission {
                author_id: 99,
                ..minimal_submission()
            };
            let outcome = validate(&submission, &dir, &dir).unwrap();
            assert_eq!(outcome.errors, vec!["Author not found"]);
        }

        #[test]
        fn test_unknown_reporter_and_cover_image() {
            let dir = directory();
            let submission = ArticleSubmission {
                reporter_id: Some(99),
                cover_image_id: Some(99),
                ..minimal_submission()
            };
            let outcome = validate(&submission, &dir, &dir).unwrap();
            assert_eq!(
                outcome.errors,
                vec!["Reporter not found", "Cover image not found"]
            );
        }

        #[test]
        fn test_known_reporter_and_cover_image() {
            let dir = directory();
            let submission = ArticleSubmission {
                reporter_id: Some(2),
                cover_image_id: Some(10),
                ..minimal_submission()
            };
            assert!(validate(&submission, &dir, &dir).unwrap().is_valid());
        }

        #[test]
        fn test_seo_title_boundary() {
            let dir = directory();

            let at_limit = ArticleSubmission {
                seo_title: Some("x".repeat(70)),
                ..minimal_submission()
            };
            assert!(validate(&at_limit, &dir, &dir).unwrap().is_valid());

            let over_limit = ArticleSubmission {
                seo_title: Some("x".repeat(71)),
                ..minimal_submission()
            };
            let outcome = validate(&over_limit, &dir, &dir).unwrap();
            assert_eq!(
                outcome.errors,
                vec!["SEO title must be 70 characters or less"]
            );
        }

        #[test]
        fn test_seo_description_boundary() {
            let dir = directory();

            let at_limit = ArticleSubmission {
                seo_description: Some("x".repeat(160)),
                ..minimal_submission()
            };
            assert!(validate(&at_limit, &dir, &dir).unwrap().is_valid());

            let over_limit = ArticleSubmission {
                seo_description: Some("x".repeat(161)),
                ..minimal_submission()
            };
            let outcome = validate(&over_limit, &dir, &dir).unwrap();
            assert_eq!(
                outcome.errors,
                vec!["SEO description must be 160 characters or less"]
            );
        }

        #[test]
        fn test_blank_seo_fields_are_ignored() {
            let dir = directory();
            let submission = ArticleSubmission {
                seo_title: Some("   ".to_string()),
                seo_description: Some(String::new()),
                ..minimal_submission()
            };
            assert!(validate(&submission, &dir, &dir).unwrap().is_valid());
        }
    }

    mod unique_violation_tests {
        use crate::services::article::is_unique_violation;

        fn sqlite_failure(extended_code: i32) -> rusqlite::Error {
            rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(extended_code), None)
        }

        #[test]
        fn test_unique_constraint_is_recognized() {
            let err = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE);
            assert!(is_unique_violation(&err));
        }

        #[test]
        fn test_foreign_key_violation_is_not_a_slug_collision() {
            let err = sqlite_failure(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY);
            assert!(!is_unique_violation(&err));
        }

        #[test]
        fn test_other_errors_are_not_slug_collisions() {
            assert!(!is_unique_violation(&rusqlite::Error::QueryReturnedNoRows));
        }
    }

    mod language_code_tests {
        use crate::models::LanguageCode;
        use std::str::FromStr;

        #[test]
        fn test_language_code_from_str() {
            assert_eq!(LanguageCode::from_str("en").unwrap(), LanguageCode::En);
            assert_eq!(LanguageCode::from_str("np").unwrap(), LanguageCode::Np);
        }

        #[test]
        fn test_language_code_from_str_invalid() {
            assert!(LanguageCode::from_str("fr").is_err());
            assert!(LanguageCode::from_str("").is_err());
        }

        #[test]
        fn test_language_code_to_string() {
            assert_eq!(LanguageCode::En.to_string(), "en");
            assert_eq!(LanguageCode::Np.to_string(), "np");
        }
    }

    mod article_status_tests {
        use crate::models::ArticleStatus;
        use std::str::FromStr;

        #[test]
        fn test_article_status_from_str() {
            assert_eq!(
                ArticleStatus::from_str("draft").unwrap(),
                ArticleStatus::Draft
            );
            assert_eq!(
                ArticleStatus::from_str("published").unwrap(),
                ArticleStatus::Published
            );
        }

        #[test]
        fn test_article_status_invalid() {
            assert!(ArticleStatus::from_str("archived").is_err());
        }

        #[test]
        fn test_article_status_default() {
            assert_eq!(ArticleStatus::default(), ArticleStatus::Draft);
        }
    }

    mod config_tests {
        use crate::Config;
        use std::path::Path;

        #[test]
        fn test_config_load_missing_file() {
            let result = Config::load(Path::new("/nonexistent/path.toml"));
            assert!(result.is_err());
        }

        #[test]
        fn test_config_load_valid_toml() {
            use std::io::Write;
            let temp_dir = std::env::temp_dir();
            let config_path = temp_dir.join("test_khabar_config.toml");

            let config_content = r#"
[site]
title = "Test Portal"
url = "http://localhost:3000"

[database]
path = "data/khabar.db"

[content]
articles_per_page = 12
"#;

            let mut file = std::fs::File::create(&config_path).unwrap();
            file.write_all(config_content.as_bytes()).unwrap();

            let config = Config::load(&config_path).unwrap();
            assert_eq!(config.site.title, "Test Portal");
            assert_eq!(config.site.default_language, "en");
            assert_eq!(config.database.pool_size, 10);
            assert_eq!(config.content.articles_per_page, 12);

            std::fs::remove_file(&config_path).ok();
        }
    }
}
