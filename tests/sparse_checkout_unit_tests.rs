//! Unit tests for Git sparse checkout utilities

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

    use docsync::config::RetryConfig;
    use docsync::git::sparse_checkout::{
        FetchRequest, SparseCheckout, check_git_availability, parse_git_version, sparse_pattern,
    };
    use docsync::system::{CommandOutput, MockSystem, System as _};
    use std::path::PathBuf;
    use std::time::Duration;

    fn request() -> FetchRequest {
        FetchRequest {
            url: "https://github.com/acme/handbook.git".to_owned(),
            branch: "main".to_owned(),
            source: "docs".to_owned(),
            clone_dir: PathBuf::from("/work/handbook"),
        }
    }

    #[test]
    fn parse_git_version_tst() {
        assert_eq!(parse_git_version("2.34.1").unwrap(), (2, 34, 1));
        assert_eq!(parse_git_version("2.25.0").unwrap(), (2, 25, 0));
        parse_git_version("invalid").unwrap_err();
    }

    #[test]
    fn sparse_pattern_tst() {
        assert_eq!(sparse_pattern(""), "*");
        assert_eq!(sparse_pattern("."), "*");
        assert_eq!(sparse_pattern("docs"), "docs/**/*");
        assert_eq!(sparse_pattern("./docs/guide/"), "docs/guide/**/*");
    }

    #[test]
    fn git_version_check_tst() {
        let modern = MockSystem::new().with_command_handler(|_, _| {
            Ok(CommandOutput::success("git version 2.43.0"))
        });
        check_git_availability(&modern).unwrap();

        let ancient = MockSystem::new().with_command_handler(|_, _| {
            Ok(CommandOutput::success("git version 2.17.1"))
        });
        let err = check_git_availability(&ancient).unwrap_err();
        assert!(err.to_string().contains("2.25"));
    }

    #[test]
    fn retry_budget_is_bounded_tst() {
        // Clone "succeeds" but never produces the directory
        let system = MockSystem::new();
        let retry = RetryConfig {
            max_retries: 3,
            delay_ms: 3_000,
        };

        let outcome = SparseCheckout::new(&system, retry).fetch(&request());

        assert!(!outcome.success);
        assert_eq!(outcome.attempts, 4);
        assert_eq!(system.sleeps(), vec![Duration::from_millis(3_000); 3]);
        assert!(!system.exists(&request().clone_dir));
    }

    #[test]
    fn successful_fresh_clone_tst() {
        let system = MockSystem::new().with_command_handler(|sys, invocation| {
            if invocation.subcommand() == Some("clone") {
                sys.put_dir("/work/handbook/.git")?;
            }
            Ok(CommandOutput::success(""))
        });

        let outcome = SparseCheckout::new(&system, RetryConfig::default()).fetch(&request());

        assert!(outcome.success);
        assert_eq!(outcome.attempts, 1);
        assert!(system.sleeps().is_empty());
        assert_eq!(
            system
                .read_to_string(&PathBuf::from("/work/handbook/.git/info/sparse-checkout"))
                .unwrap(),
            "docs/**/*\n"
        );
    }
}
