//! Integration tests for the builder crate

#[cfg(test)]
mod tests {
    use exbuild_builder::*;
    use exbuild_errors::{ConfigError, Error};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;

    const EXPECTED_GN_ARGS: &str =
        r#"--args=target_os="tizen" target_cpu="arm" sysroot="/opt/tizen""#;

    #[tokio::test]
    async fn test_dry_run_script_for_tizen_target() {
        let temp = tempdir().unwrap();
        let runner = Arc::new(PrintOnlyRunner::new());
        let env = Arc::new(MapEnvironment::from_pairs([(TIZEN_HOME_VAR, "/opt/tizen")]));

        let mut ctx = BuildContext::new("/src/chip", temp.path(), runner.clone())
            .with_environment(env);
        ctx.setup_builders(&["tizen-arm-light"]).unwrap();
        ctx.build().await.unwrap();

        let out_dir = temp.path().join("tizen-arm-light");
        let commands = runner.commands();
        assert_eq!(
            commands[0].get_args(),
            &[
                "gen".to_string(),
                "--check".to_string(),
                "--fail-on-unused-args".to_string(),
                "--root=/src/chip/examples/lighting-app/linux".to_string(),
                EXPECTED_GN_ARGS.to_string(),
                out_dir.display().to_string(),
            ]
        );
        assert_eq!(
            commands[1].get_args(),
            &["-C".to_string(), out_dir.display().to_string()]
        );

        let script = runner.script();
        assert!(script.starts_with("# Generating tizen-arm-light\n"));
        assert!(script.contains("# Building tizen-arm-light\n"));
    }

    #[tokio::test]
    async fn test_environment_change_between_builds() {
        let env = Arc::new(MapEnvironment::new());
        let builder = TizenBuilder::new(
            Path::new("/src/chip"),
            Arc::new(PrintOnlyRunner::new()),
            TizenApp::Light,
            TizenBoard::Arm,
        )
        .with_environment(env.clone());

        assert!(matches!(
            builder.gn_build_args(),
            Err(Error::Config(ConfigError::EnvVarNotFound { .. }))
        ));

        env.set(TIZEN_HOME_VAR, "/sdk/7.0");
        assert_eq!(
            builder.gn_build_args().unwrap(),
            vec![
                r#"target_os="tizen""#.to_string(),
                r#"target_cpu="arm""#.to_string(),
                r#"sysroot="/sdk/7.0""#.to_string(),
            ]
        );
    }

    #[test]
    fn test_registry_lists_tizen() {
        let names: Vec<&str> = all_targets().iter().map(Target::name).collect();
        assert!(names.contains(&"tizen-arm-light"));
        assert!(all_targets()
            .iter()
            .all(|target| target.platform() == Platform::Tizen));
    }
}
