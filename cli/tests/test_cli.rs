//! Integration tests: test_cli.

#[cfg(test)]
mod tests {
    use clap::Parser;
    use content_hub_cli::cli::{Cli, Commands};
    use content_hub_gateway::{
        model::{Collection, SessionActionKind},
        FieldFilter, FilterOperator,
    };

    #[test]
    fn list_accepts_repeated_filters() {
        let cli = Cli::try_parse_from([
            "hub-cli",
            "list",
            "articles",
            "--page",
            "2",
            "--page-size",
            "5",
            "--sort",
            "rating:desc",
            "--filter",
            "category.slug:eq:tech",
            "--filter",
            "publishedAt:$gte:2024-01-01T00:00:00Z",
        ])
        .expect("parse list");

        match cli.command {
            Commands::List {
                collection,
                page,
                page_size,
                sort,
                filters,
                matching,
            } => {
                assert_eq!(collection, Collection::Articles);
                assert_eq!((page, page_size), (Some(2), Some(5)));
                assert_eq!(sort.as_deref(), Some("rating:desc"));
                assert_eq!(filters, vec![
                    FieldFilter::equals("category.slug", "tech"),
                    FieldFilter::new("publishedAt", FilterOperator::Gte, "2024-01-01T00:00:00Z"),
                ]);
                assert!(matching.is_none());
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_collection_is_rejected() {
        assert!(Cli::try_parse_from(["hub-cli", "get", "podcasts", "intro"]).is_err());
        assert!(Cli::try_parse_from(["hub-cli", "list", "news", "--filter", "views:between:1"]).is_err());
    }

    #[test]
    fn search_splits_collections() {
        let cli = Cli::try_parse_from([
            "hub-cli",
            "search",
            "react",
            "--collections",
            "news,videos",
            "--base-url",
            "http://cms.local:1337",
        ])
        .expect("parse search");

        assert_eq!(cli.base_url.as_deref(), Some("http://cms.local:1337"));
        match cli.command {
            Commands::Search {
                query,
                collections,
            } => {
                assert_eq!(query, "react");
                assert_eq!(collections, vec![Collection::News, Collection::Videos]);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn track_parses_action_and_ids() {
        let cli = Cli::try_parse_from([
            "hub-cli",
            "track",
            "session-1",
            "like",
            "stories",
            "42",
            "--metadata",
            r#"{"from":"feed"}"#,
            "--best-effort",
        ])
        .expect("parse track");

        match cli.command {
            Commands::Track {
                session_id,
                action,
                collection,
                content_id,
                metadata,
                best_effort,
            } => {
                assert_eq!(session_id, "session-1");
                assert_eq!(action, SessionActionKind::Like);
                assert_eq!(collection, Collection::Stories);
                assert_eq!(content_id, 42);
                assert_eq!(metadata.as_deref(), Some(r#"{"from":"feed"}"#));
                assert!(best_effort);
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn reset_password_confirmation_is_optional() {
        let cli = Cli::try_parse_from([
            "hub-cli",
            "reset-password",
            "--code",
            "abc",
            "--password",
            "new-pass",
        ])
        .expect("parse reset-password");

        match cli.command {
            Commands::ResetPassword {
                code,
                password,
                confirmation,
            } => {
                assert_eq!((code.as_str(), password.as_str()), ("abc", "new-pass"));
                assert!(confirmation.is_none());
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
